use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tabled::Tabled;

/// One complaint as received from the open-data API.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Placeholder for a missing categorical value.
pub const UNKNOWN: &str = "Unknown";

/// One exported / previewed line of a summary.
#[derive(Debug, Serialize, Deserialize, Tabled, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Count")]
    pub count: u64,
}

/// Ordered count-per-key result of one aggregation.
///
/// Keys are unique. The ordering is decided by the constructor and never
/// changes afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    entries: Vec<(String, u64)>,
}

impl Summary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Count occurrences and order them by descending count. Ties keep the
    /// order in which each key was first seen; `limit` truncates after
    /// sorting.
    pub fn ranked<I, S>(values: I, limit: Option<usize>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut entries: Vec<(String, u64)> = Vec::new();
        for v in values {
            let key = v.into();
            match index.get(&key) {
                Some(&i) => entries[i].1 += 1,
                None => {
                    index.insert(key.clone(), entries.len());
                    entries.push((key, 1));
                }
            }
        }
        // `sort_by` is stable, which preserves first-seen order among ties.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(n) = limit {
            entries.truncate(n);
        }
        Summary { entries }
    }

    /// Build from entries that are already ordered and unique.
    pub fn from_entries(entries: Vec<(String, u64)>) -> Self {
        Summary { entries }
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| *c).sum()
    }

    pub fn rows(&self) -> Vec<SummaryRow> {
        self.entries
            .iter()
            .map(|(key, count)| SummaryRow {
                key: key.clone(),
                count: *count,
            })
            .collect()
    }
}
