//! VictoriaMetrics / VictoriaLogs HTTP client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use super::TelemetryStore;
use crate::errors::{Result, SdkError};

const METRICS_SERVICE: &str = "victoria metrics";
const LOGS_SERVICE: &str = "victoria logs";

#[derive(Debug, Clone)]
pub struct VictoriaConfig {
    pub metrics_url: String,
    pub logs_url: String,
    pub timeout: Duration,
}

impl Default for VictoriaConfig {
    fn default() -> Self {
        Self {
            metrics_url: "http://localhost:8428".to_string(),
            logs_url: "http://localhost:9428".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// One log record as ingested into VictoriaLogs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    #[serde(rename = "processID")]
    pub process_id: i64,
    #[serde(rename = "processName")]
    pub process_name: String,
    pub subsystem: String,
    pub category: String,
    #[serde(rename = "messageType")]
    pub log_level: String,
    #[serde(rename = "eventMessage")]
    pub event_message: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<QueryData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    result_type: String,
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    metric: BTreeMap<String, String>,
    #[serde(default)]
    value: Option<Vec<Value>>,
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

#[derive(Clone)]
pub struct VictoriaClient {
    client: reqwest::Client,
    config: VictoriaConfig,
}

impl VictoriaClient {
    pub fn new(config: VictoriaConfig) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn metrics_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.metrics_url.trim_end_matches('/'), path)
    }

    fn logs_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.logs_url.trim_end_matches('/'), path)
    }

    /// Write one sample using the Influx line protocol
    pub async fn insert_metric(
        &self,
        name: &str,
        value: f64,
        labels: &BTreeMap<String, String>,
    ) -> Result<()> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let line = influx_line(name, value, labels, timestamp);

        let response = self
            .client
            .post(self.metrics_endpoint("/write"))
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(line)
            .send()
            .await?;

        ensure_written(response, METRICS_SERVICE).await
    }

    /// Write a batch of log records as JSON lines. An empty batch is a no-op.
    pub async fn insert_logs(&self, entries: &[LogEntry]) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut body = String::new();
        for entry in entries {
            body.push_str(&serde_json::to_string(entry)?);
            body.push('\n');
        }

        let response = self
            .client
            .post(self.logs_endpoint("/insert/jsonline"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        ensure_written(response, LOGS_SERVICE).await
    }
}

#[async_trait]
impl TelemetryStore for VictoriaClient {
    async fn query_metrics(&self, query: &str) -> Result<String> {
        debug!(query, "Querying VictoriaMetrics");
        let response = self
            .client
            .get(self.metrics_endpoint("/api/v1/query"))
            .query(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SdkError::api(METRICS_SERVICE, status.as_u16(), body));
        }

        let parsed: QueryResponse = serde_json::from_str(&body)?;
        if parsed.status != "success" {
            return Err(SdkError::backend(
                METRICS_SERVICE,
                parsed.error.unwrap_or(parsed.status),
            ));
        }

        match parsed.data {
            Some(data) => format_metric_result(&data),
            None => Ok(String::new()),
        }
    }

    async fn query_logs(&self, query: &str) -> Result<String> {
        debug!(query, "Querying VictoriaLogs");
        let response = self
            .client
            .get(self.logs_endpoint("/select/logsql/query"))
            .query(&[("query", query)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(SdkError::api(LOGS_SERVICE, status.as_u16(), body));
        }

        format_log_lines(&body)
    }
}

async fn ensure_written(response: reqwest::Response, service: &str) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(SdkError::api(service, status.as_u16(), body))
}

fn influx_line(
    name: &str,
    value: f64,
    labels: &BTreeMap<String, String>,
    timestamp_ns: u128,
) -> String {
    let mut line = escape_influx(name);
    for (key, val) in labels {
        let _ = write!(line, ",{}={}", escape_influx(key), escape_influx(val));
    }
    let _ = writeln!(line, " value={value} {timestamp_ns}");
    line
}

fn escape_influx(s: &str) -> String {
    s.replace(',', "\\,").replace('=', "\\=").replace(' ', "\\ ")
}

fn render_labels(labels: &BTreeMap<String, String>) -> String {
    let pairs: Vec<String> = labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", pairs.join(", "))
}

fn render_sample(sample: &[Value]) -> String {
    let parts: Vec<String> = sample
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    format!("[{}]", parts.join(", "))
}

fn format_metric_result(data: &QueryData) -> Result<String> {
    let mut out = String::new();
    match data.result_type.as_str() {
        "scalar" | "string" => {
            let sample: Vec<Value> = serde_json::from_value(data.result.clone())?;
            let _ = writeln!(out, "Value: {}", render_sample(&sample));
        },
        _ => {
            let series: Vec<Series> = serde_json::from_value(data.result.clone())?;
            for s in series {
                let labels = render_labels(&s.metric);
                if let Some(value) = s.value {
                    let _ = writeln!(out, "Metric: {labels} Value: {}", render_sample(&value));
                } else if let Some(values) = s.values {
                    let rendered: Vec<String> = values.iter().map(|v| render_sample(v)).collect();
                    let _ = writeln!(out, "Metric: {labels} Values: [{}]", rendered.join(", "));
                }
            }
        },
    }
    Ok(out)
}

fn format_log_lines(body: &str) -> Result<String> {
    let mut out = String::new();
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        let entry: Value = serde_json::from_str(line)?;
        out.push_str(&serde_json::to_string(&entry)?);
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_influx_line_escapes_and_orders_labels() {
        let mut labels = BTreeMap::new();
        labels.insert("process_name".to_string(), "Google Chrome".to_string());
        labels.insert("host".to_string(), "mac".to_string());

        let line = influx_line("process_cpu_pct", 12.5, &labels, 42);
        assert_eq!(
            line,
            "process_cpu_pct,host=mac,process_name=Google\\ Chrome value=12.5 42\n"
        );
    }

    #[test]
    fn test_vector_result_rendering() {
        let data: QueryData = serde_json::from_value(serde_json::json!({
            "resultType": "vector",
            "result": [
                {"metric": {}, "value": [0, "12.5"]},
                {"metric": {"process_name": "ollama"}, "value": [1700000000, "3"]}
            ]
        }))
        .unwrap();

        let text = format_metric_result(&data).unwrap();
        assert_eq!(
            text,
            "Metric: {} Value: [0, 12.5]\nMetric: {process_name=ollama} Value: [1700000000, 3]\n"
        );
    }

    #[test]
    fn test_matrix_and_scalar_rendering() {
        let data: QueryData = serde_json::from_value(serde_json::json!({
            "resultType": "matrix",
            "result": [{"metric": {"a": "b"}, "values": [[1, "1"], [2, "2"]]}]
        }))
        .unwrap();
        assert_eq!(
            format_metric_result(&data).unwrap(),
            "Metric: {a=b} Values: [[1, 1], [2, 2]]\n"
        );

        let data: QueryData = serde_json::from_value(serde_json::json!({
            "resultType": "scalar",
            "result": [5, "0.25"]
        }))
        .unwrap();
        assert_eq!(format_metric_result(&data).unwrap(), "Value: [5, 0.25]\n");
    }

    #[test]
    fn test_empty_vector_is_empty_string() {
        let data: QueryData =
            serde_json::from_value(serde_json::json!({"resultType": "vector", "result": []}))
                .unwrap();
        assert_eq!(format_metric_result(&data).unwrap(), "");
    }

    #[test]
    fn test_log_lines_are_compacted() {
        let body = "{\"processName\": \"wifid\",  \"eventMessage\": \"up\"}\n\n";
        assert_eq!(
            format_log_lines(body).unwrap(),
            "{\"eventMessage\":\"up\",\"processName\":\"wifid\"}\n"
        );
    }

    #[test]
    fn test_log_entry_field_names() {
        let entry = LogEntry {
            process_name: "kernel".to_string(),
            log_level: "error".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["processName"], "kernel");
        assert_eq!(json["messageType"], "error");
        assert_eq!(json["processID"], 0);
    }
}
