use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entry point that produced an experience row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Query,
    Recommend,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Recommend => "recommend",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "recommend" => Ok(Self::Recommend),
            other => Err(format!("unknown experience source: {other}")),
        }
    }
}

/// Field values supplied by the orchestrator; identity and timestamp are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExperience {
    pub source: Source,
    pub prompt: String,
    pub generated_query: String,
    pub execution_result: String,
}

impl NewExperience {
    pub fn new(
        source: Source,
        prompt: impl Into<String>,
        generated_query: impl Into<String>,
        execution_result: impl Into<String>,
    ) -> Self {
        Self {
            source,
            prompt: prompt.into(),
            generated_query: generated_query.into(),
            execution_result: execution_result.into(),
        }
    }
}

/// One durable record of an orchestration attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub source: Source,
    pub prompt: String,
    pub generated_query: String,
    pub execution_result: String,
    /// 0 = none, 1 = good, -1 = bad
    pub user_feedback: i64,
}

impl Experience {
    pub fn from_new(id: i64, timestamp: DateTime<Utc>, record: NewExperience) -> Self {
        Self {
            id,
            timestamp,
            source: record.source,
            prompt: record.prompt,
            generated_query: record.generated_query,
            execution_result: record.execution_result,
            user_feedback: 0,
        }
    }
}
