use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unable to parse period dates in {}", .path.display())]
    PeriodNotFound { path: PathBuf },

    #[error("unable to parse hours in {}", .path.display())]
    DurationNotFound { path: PathBuf },

    #[error("could not get text from {}: {reason}", .path.display())]
    TextExtraction { path: PathBuf, reason: String },

    #[error("unable to list directory {}: {source}", .path.display())]
    DirectoryListingFailed { path: PathBuf, source: io::Error },

    #[error("open PDFs first")]
    NothingToExport,

    #[error("unable to access {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ReportError {
    /// The document or directory the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ReportError::PeriodNotFound { path }
            | ReportError::DurationNotFound { path }
            | ReportError::TextExtraction { path, .. }
            | ReportError::DirectoryListingFailed { path, .. }
            | ReportError::Io { path, .. } => Some(path),
            ReportError::NothingToExport | ReportError::Csv(_) | ReportError::Config { .. } => {
                None
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_errors_name_the_document() {
        let err = ReportError::PeriodNotFound {
            path: PathBuf::from("/reports/2023-01.pdf"),
        };
        assert_eq!(
            err.to_string(),
            "unable to parse period dates in /reports/2023-01.pdf"
        );

        let err = ReportError::DurationNotFound {
            path: PathBuf::from("/reports/2023-01.pdf"),
        };
        assert_eq!(err.to_string(), "unable to parse hours in /reports/2023-01.pdf");
        assert_eq!(err.path(), Some(Path::new("/reports/2023-01.pdf")));
    }
}
