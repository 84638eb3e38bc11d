//! Wire types shared by the Zenith service and its clients

use serde::{Deserialize, Serialize};

/// Body of `POST /query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Natural-language question about the system
    pub query: String,
}

/// Response of `POST /query` and `/recommend`
///
/// Exactly one of `answer` and `error` is set. `interaction_id` is omitted
/// when the outcome could not be written to the experience log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Experience row to attach feedback to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_id: Option<i64>,
    /// Natural-language explanation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    /// Failure description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResponse {
    /// Build a successful response
    pub fn answer(interaction_id: Option<i64>, answer: impl Into<String>) -> Self {
        Self {
            interaction_id,
            answer: Some(answer.into()),
            error: None,
        }
    }

    /// Build a failed response
    pub fn error(interaction_id: Option<i64>, error: impl Into<String>) -> Self {
        Self {
            interaction_id,
            answer: None,
            error: Some(error.into()),
        }
    }

    /// Whether the response carries an error
    pub fn is_error(&self) -> bool {
        self.error.as_deref().is_some_and(|e| !e.is_empty())
    }
}

/// Feedback judgment, either as a literal (`"good"`/`"bad"`) or a score (`1`/`-1`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedbackValue {
    /// Integer score
    Score(i64),
    /// Literal label
    Label(String),
}

impl FeedbackValue {
    /// Positive feedback
    pub fn good() -> Self {
        Self::Label("good".to_string())
    }

    /// Negative feedback
    pub fn bad() -> Self {
        Self::Label("bad".to_string())
    }

    /// Map to the stored score. Only `1`, `-1`, `"good"` and `"bad"` are valid.
    pub fn score(&self) -> Option<i64> {
        match self {
            Self::Score(v @ (1 | -1)) => Some(*v),
            Self::Score(_) => None,
            Self::Label(label) => match label.as_str() {
                "good" => Some(1),
                "bad" => Some(-1),
                _ => None,
            },
        }
    }
}

impl std::fmt::Display for FeedbackValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score(v) => write!(f, "{v}"),
            Self::Label(label) => write!(f, "{label:?}"),
        }
    }
}

/// Body of `POST /feedback`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// Interaction id previously returned by `/query` or `/recommend`
    pub interaction_id: i64,
    /// Correctness judgment
    pub feedback: FeedbackValue,
}

/// Response of `POST /feedback`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    /// Always `"ok"` on success
    pub status: String,
}

impl FeedbackResponse {
    /// Acknowledgement
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
