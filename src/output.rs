use crate::error::AppError;
use crate::types::Summary;
use crate::util::slugify;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

/// `Complaints by Borough` -> `<dir>/complaints_by_borough.csv`.
pub fn export_path(out_dir: &Path, title: &str) -> PathBuf {
    out_dir.join(format!("{}.csv", slugify(title)))
}

/// Write `summary` as `key,count` rows in summary order.
///
/// An existing file at `path` is overwritten.
pub fn export(summary: &Summary, path: &Path) -> Result<(), AppError> {
    write_csv(path, &summary.rows()).map_err(|e| AppError::write(path, e))?;
    info!("Exported {} rows to {}", summary.len(), path.display());
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    // `serialize` only emits the header alongside the first row, so an
    // empty summary needs it written by hand.
    if rows.is_empty() {
        wtr.write_record(["key", "count"])?;
    }
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render a summary as a Markdown table for the console.
pub fn summary_table(summary: &Summary) -> String {
    preview_table_rows(&summary.rows(), summary.len())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SummaryRow;
    use tempfile::TempDir;

    fn read_back(path: &Path) -> Vec<(String, u64)> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.deserialize::<SummaryRow>()
            .map(|r| {
                let r = r.unwrap();
                (r.key, r.count)
            })
            .collect()
    }

    #[test]
    fn test_export_round_trip_preserves_order() {
        let dir = TempDir::new().unwrap();
        let summary = Summary::from_entries(vec![
            ("Noise - Residential".to_string(), 12),
            ("Illegal Parking".to_string(), 9),
            ("Heat/Hot Water, Building".to_string(), 9),
            ("Unknown".to_string(), 1),
        ]);
        let path = export_path(dir.path(), "Top 10 Complaint Types");
        export(&summary, &path).unwrap();
        assert_eq!(read_back(&path), summary.entries().to_vec());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("key,count\n"));
    }

    #[test]
    fn test_export_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents\nmore\n").unwrap();
        let summary = Summary::from_entries(vec![("2024-01-01".to_string(), 4)]);
        export(&summary, &path).unwrap();
        assert_eq!(read_back(&path), vec![("2024-01-01".to_string(), 4)]);
    }

    #[test]
    fn test_empty_summary_exports_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");
        export(&Summary::empty(), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "key,count\n");
        assert!(read_back(&path).is_empty());
    }

    #[test]
    fn test_export_to_missing_directory_is_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = export(&Summary::empty(), &path).unwrap_err();
        assert!(matches!(err, AppError::WriteError { .. }));
    }

    #[test]
    fn test_export_path_is_slugged() {
        let p = export_path(Path::new("/tmp"), "Complaints by Borough");
        assert_eq!(p, PathBuf::from("/tmp/complaints_by_borough.csv"));
    }

    #[test]
    fn test_summary_table_lists_rows() {
        let summary = Summary::from_entries(vec![("BROOKLYN".to_string(), 3)]);
        let table = summary_table(&summary);
        assert!(table.contains("Key"));
        assert!(table.contains("BROOKLYN"));
        assert_eq!(summary_table(&Summary::empty()), "(no rows)");
    }
}
