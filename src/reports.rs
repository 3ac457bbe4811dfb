use crate::dataset::Dataset;
use crate::error::AppError;
use crate::types::Summary;
use std::collections::BTreeMap;
use tracing::{debug, warn};

const TOP_CATEGORIES: usize = 10;

/// The dimension a report is aggregated along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorKind {
    Category,
    Region,
    Time,
}

/// Result of one aggregation. `missing` is set when the source column was
/// absent, in which case `summary` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub summary: Summary,
    pub missing: Option<AppError>,
    pub dropped_rows: usize,
}

impl AggregatorKind {
    pub const ALL: [AggregatorKind; 3] = [
        AggregatorKind::Category,
        AggregatorKind::Region,
        AggregatorKind::Time,
    ];

    /// Map a menu entry ("1".."3") to a kind.
    pub fn from_choice(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(AggregatorKind::Category),
            "2" => Some(AggregatorKind::Region),
            "3" => Some(AggregatorKind::Time),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AggregatorKind::Category => "Complaint type (top 10)",
            AggregatorKind::Region => "Borough",
            AggregatorKind::Time => "Creation date",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AggregatorKind::Category => "Top 10 Complaint Types",
            AggregatorKind::Region => "Complaints by Borough",
            AggregatorKind::Time => "Complaints per Day",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            AggregatorKind::Category => "complaint_type",
            AggregatorKind::Region => "borough",
            AggregatorKind::Time => "created_date",
        }
    }

    pub fn aggregate(self, data: &Dataset) -> Aggregation {
        let result = match self {
            AggregatorKind::Category => by_category(data).map(|s| (s, 0)),
            AggregatorKind::Region => by_region(data).map(|s| (s, 0)),
            AggregatorKind::Time => by_time(data),
        };
        match result {
            Ok((summary, dropped_rows)) => {
                debug!(
                    "{:?} aggregation produced {} keys over {} rows",
                    self,
                    summary.len(),
                    summary.total()
                );
                if dropped_rows > 0 {
                    warn!(
                        "{} rows dropped: '{}' missing or unparseable",
                        dropped_rows,
                        self.column()
                    );
                }
                Aggregation {
                    summary,
                    missing: None,
                    dropped_rows,
                }
            }
            Err(e) => {
                warn!("{:?} aggregation skipped: {}", self, e);
                Aggregation {
                    summary: Summary::empty(),
                    missing: Some(e),
                    dropped_rows: 0,
                }
            }
        }
    }
}

fn by_category(data: &Dataset) -> Result<Summary, AppError> {
    let col = data.categorical_column(AggregatorKind::Category.column())?;
    Ok(Summary::ranked(col, Some(TOP_CATEGORIES)))
}

fn by_region(data: &Dataset) -> Result<Summary, AppError> {
    let col = data.categorical_column(AggregatorKind::Region.column())?;
    Ok(Summary::ranked(col, None))
}

/// Daily counts in chronological order, plus the number of rows that had no
/// usable timestamp.
fn by_time(data: &Dataset) -> Result<(Summary, usize), AppError> {
    let col = data.temporal_column(AggregatorKind::Time.column())?;
    let dropped = data.len() - col.len();
    let mut per_day: BTreeMap<chrono::NaiveDate, u64> = BTreeMap::new();
    for ts in col {
        *per_day.entry(ts.date()).or_insert(0) += 1;
    }
    let entries = per_day
        .into_iter()
        .map(|(day, n)| (day.format("%Y-%m-%d").to_string(), n))
        .collect();
    Ok((Summary::from_entries(entries), dropped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::dataset;
    use crate::types::UNKNOWN;
    use serde_json::{json, Value};

    fn pairs(summary: &Summary) -> Vec<(&str, u64)> {
        summary
            .entries()
            .iter()
            .map(|(k, c)| (k.as_str(), *c))
            .collect()
    }

    #[test]
    fn test_category_scenario() {
        let ds = dataset(vec![
            json!({"complaint_type": "Noise"}),
            json!({"complaint_type": "Noise"}),
            json!({"complaint_type": "Parking"}),
            json!({"complaint_type": "Noise"}),
            json!({"complaint_type": null}),
        ]);
        let agg = AggregatorKind::Category.aggregate(&ds);
        assert_eq!(agg.missing, None);
        assert_eq!(
            pairs(&agg.summary),
            vec![("Noise", 3), ("Parking", 1), (UNKNOWN, 1)]
        );
    }

    #[test]
    fn test_category_capped_at_ten_and_non_increasing() {
        let mut rows: Vec<Value> = Vec::new();
        for i in 0..15 {
            for _ in 0..=(i % 4) {
                rows.push(json!({ "complaint_type": format!("Type {}", i) }));
            }
        }
        let ds = dataset(rows);
        let summary = AggregatorKind::Category.aggregate(&ds).summary;
        assert_eq!(summary.len(), 10);
        let counts: Vec<u64> = summary.entries().iter().map(|(_, c)| *c).collect();
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_region_keeps_every_distinct_label() {
        let mut rows: Vec<Value> = (0..12)
            .map(|i| json!({ "borough": format!("Region {}", i) }))
            .collect();
        rows.push(json!({"borough": null}));
        rows.push(json!({"complaint_type": "Noise"}));
        let ds = dataset(rows);
        let summary = AggregatorKind::Region.aggregate(&ds).summary;
        assert_eq!(summary.len(), 13);
        assert_eq!(summary.entries()[0], (UNKNOWN.to_string(), 2));
        assert_eq!(summary.total(), ds.len() as u64);
    }

    #[test]
    fn test_region_missing_column_signals() {
        let ds = dataset(vec![json!({"complaint_type": "Noise"})]);
        let agg = AggregatorKind::Region.aggregate(&ds);
        assert!(agg.summary.is_empty());
        assert_eq!(
            agg.missing,
            Some(AppError::ColumnMissing("borough".to_string()))
        );
    }

    #[test]
    fn test_time_scenario_drops_bad_rows() {
        let ds = dataset(vec![
            json!({"created_date": "2024-01-02T10:00:00"}),
            json!({"created_date": "2024-01-01T09:00:00"}),
            json!({"created_date": "bad-date"}),
        ]);
        let agg = AggregatorKind::Time.aggregate(&ds);
        assert_eq!(
            pairs(&agg.summary),
            vec![("2024-01-01", 1), ("2024-01-02", 1)]
        );
        assert_eq!(agg.dropped_rows, 1);
        assert_eq!(agg.summary.total(), 2);
    }

    #[test]
    fn test_time_keys_strictly_ascending() {
        let ds = dataset(vec![
            json!({"created_date": "2024-02-01T00:00:01"}),
            json!({"created_date": "2023-12-31T23:59:59"}),
            json!({"created_date": "2024-02-01T18:30:00.000"}),
            json!({"created_date": "2024-01-15T12:00:00"}),
        ]);
        let summary = AggregatorKind::Time.aggregate(&ds).summary;
        let keys: Vec<&str> = summary.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys, vec!["2023-12-31", "2024-01-15", "2024-02-01"]);
        assert_eq!(summary.entries()[2].1, 2);
    }

    #[test]
    fn test_all_unparseable_is_empty_not_missing() {
        let ds = dataset(vec![
            json!({"created_date": "nope"}),
            json!({"created_date": null}),
        ]);
        let agg = AggregatorKind::Time.aggregate(&ds);
        assert!(agg.summary.is_empty());
        assert_eq!(agg.missing, None);
        assert_eq!(agg.dropped_rows, 2);
    }

    #[test]
    fn test_from_choice() {
        assert_eq!(AggregatorKind::from_choice(" 2 "), Some(AggregatorKind::Region));
        assert_eq!(AggregatorKind::from_choice("4"), None);
        assert_eq!(AggregatorKind::from_choice(""), None);
        assert_eq!(AggregatorKind::ALL.len(), 3);
    }
}
