// Error taxonomy for one report run.
//
// Every variant is handled at the boundary where it occurs and turned into a
// console message; only `SourceUnavailable` ends the process with a failure
// exit code.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("complaint data source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("column '{0}' is not present in the dataset")]
    ColumnMissing(String),

    #[error("nothing to plot for '{0}': the summary is empty")]
    EmptySummary(String),

    #[error("failed to write {}: {reason}", path.display())]
    WriteError { path: PathBuf, reason: String },

    #[error("invalid {menu} selection '{input}'")]
    InvalidSelection { menu: String, input: String },
}

impl AppError {
    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AppError::WriteError {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
