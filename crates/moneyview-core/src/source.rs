//! Remote row source

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Something that can produce the raw row set
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch every row as received on the wire
    async fn fetch(&self) -> CoreResult<Vec<Value>>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Extract the row array from a response body.
///
/// Accepts `{"status": "success", "data": [...]}` or a bare array.
pub fn decode_payload(payload: Value) -> CoreResult<Vec<Value>> {
    match payload {
        Value::Array(rows) => Ok(rows),
        Value::Object(mut object) => {
            let status = object.get("status").and_then(Value::as_str).unwrap_or_default();
            if status != "success" {
                return Err(CoreError::UnexpectedPayload {
                    message: format!("status is '{}'", status),
                });
            }
            match object.remove("data") {
                Some(Value::Array(rows)) => Ok(rows),
                Some(_) => Err(CoreError::UnexpectedPayload {
                    message: "'data' is not an array".to_string(),
                }),
                None => Err(CoreError::UnexpectedPayload {
                    message: "missing 'data'".to_string(),
                }),
            }
        }
        other => Err(CoreError::UnexpectedPayload {
            message: format!("expected an object or array, got {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// HTTP GET source
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: &str, timeout: Duration) -> CoreResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::FetchFailed {
                message: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            http,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch(&self) -> CoreResult<Vec<Value>> {
        let fetch_failed = |e: reqwest::Error| CoreError::FetchFailed {
            message: format!("GET {} failed: {}", self.url, e),
        };

        let payload: Value = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(fetch_failed)?
            .error_for_status()
            .map_err(fetch_failed)?
            .json()
            .await
            .map_err(fetch_failed)?;

        decode_payload(payload)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_wrapped() {
        let rows = decode_payload(json!({
            "status": "success",
            "data": [["2023-01-10", "Depositos", "", "1000,00", "Salary"]]
        }))
        .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_decode_bare_array() {
        let rows = decode_payload(json!([[1], [2]])).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_decode_error_status() {
        let err = decode_payload(json!({"status": "error", "data": []})).unwrap_err();
        assert!(matches!(err, CoreError::UnexpectedPayload { .. }));
    }

    #[test]
    fn test_decode_other_shapes() {
        assert!(decode_payload(json!({"status": "success"})).is_err());
        assert!(decode_payload(json!({"status": "success", "data": {}})).is_err());
        assert!(decode_payload(json!("rows")).is_err());
        assert!(decode_payload(Value::Null).is_err());
    }
}
