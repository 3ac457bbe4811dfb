use crate::error::AppError;
use crate::types::Record;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Anything that can hand back a bounded batch of complaint records.
pub trait RecordSource {
    fn fetch(&self, limit: usize) -> Result<Vec<Record>, AppError>;
}

/// Fetches records from a Socrata-style open-data endpoint.
pub struct HttpSource {
    endpoint: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

impl RecordSource for HttpSource {
    fn fetch(&self, limit: usize) -> Result<Vec<Record>, AppError> {
        let unavailable = |e: reqwest::Error| AppError::SourceUnavailable(e.to_string());

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(unavailable)?;

        info!("Fetching up to {} records from {}", limit, self.endpoint);
        let response = client
            .get(&self.endpoint)
            .query(&[("$limit", limit.to_string())])
            .send()
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;

        let payload: Value = response.json().map_err(unavailable)?;
        records_from_payload(payload, limit)
    }
}

/// Turn a decoded response body into records.
///
/// The body must be a JSON array whose elements are all objects. Anything
/// beyond `limit` is dropped.
pub fn records_from_payload(payload: Value, limit: usize) -> Result<Vec<Record>, AppError> {
    let Value::Array(items) = payload else {
        return Err(AppError::SourceUnavailable(
            "response is not a list of records".to_string(),
        ));
    };
    let total = items.len();
    let mut records = Vec::with_capacity(total.min(limit));
    for (i, item) in items.into_iter().take(limit).enumerate() {
        match item {
            Value::Object(map) => records.push(map),
            other => {
                return Err(AppError::SourceUnavailable(format!(
                    "element {} is not a record: {}",
                    i, other
                )))
            }
        }
    }
    if total > limit {
        debug!("Truncated payload from {} to {} records", total, limit);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_of_objects_accepted() {
        let payload = json!([
            {"complaint_type": "Noise", "borough": "BROOKLYN"},
            {"complaint_type": "Parking"}
        ]);
        let records = records_from_payload(payload, 10).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["borough"], json!("BROOKLYN"));
    }

    #[test]
    fn test_truncates_to_limit() {
        let payload = json!([{"a": 1}, {"a": 2}, {"a": 3}]);
        let records = records_from_payload(payload, 2).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["a"], json!(2));
    }

    #[test]
    fn test_non_array_payload_is_unavailable() {
        let payload = json!({"error": true, "message": "query timeout"});
        let err = records_from_payload(payload, 10).unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }

    #[test]
    fn test_non_object_element_is_unavailable() {
        let payload = json!([{"a": 1}, "oops"]);
        let err = records_from_payload(payload, 10).unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }

    #[test]
    fn test_unreachable_endpoint_is_unavailable() {
        // Port 9 on localhost is the discard port; nothing should answer HTTP.
        let source = HttpSource::new("http://127.0.0.1:9/resource.json", Duration::from_secs(2));
        let err = source.fetch(5).unwrap_err();
        assert!(matches!(err, AppError::SourceUnavailable(_)));
    }
}
