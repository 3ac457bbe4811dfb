// In-memory tabular view over the fetched records.
//
// The dataset is read-only once built; every accessor returns a fresh vector.
use crate::error::AppError;
use crate::types::{Record, UNKNOWN};
use crate::util::parse_timestamp;
use chrono::NaiveDateTime;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Raw values aligned with record order; `None` where the key is absent.
    pub fn column(&self, name: &str) -> Vec<Option<&Value>> {
        self.records.iter().map(|r| r.get(name)).collect()
    }

    /// String values with null or absent entries replaced by `"Unknown"`.
    pub fn categorical_column(&self, name: &str) -> Result<Vec<String>, AppError> {
        self.require(name)?;
        Ok(self
            .column(name)
            .into_iter()
            .map(|v| match v {
                None | Some(Value::Null) => UNKNOWN.to_string(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            })
            .collect())
    }

    /// Parsed timestamps; rows that are missing or fail to parse are skipped.
    pub fn temporal_column(&self, name: &str) -> Result<Vec<NaiveDateTime>, AppError> {
        self.require(name)?;
        Ok(self
            .column(name)
            .into_iter()
            .filter_map(|v| v.and_then(Value::as_str).and_then(parse_timestamp))
            .collect())
    }

    // A column exists when at least one record carries the key, even as null.
    fn require(&self, name: &str) -> Result<(), AppError> {
        if self.records.iter().any(|r| r.contains_key(name)) {
            Ok(())
        } else {
            Err(AppError::ColumnMissing(name.to_string()))
        }
    }
}
