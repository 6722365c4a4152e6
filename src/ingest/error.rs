use thiserror::Error;

use crate::coords::CoordError;
use crate::rtml::DocumentError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{record}: {reason}")]
    RecordShapeMismatch { record: String, reason: String },
    #[error("{record}: invalid {field} '{value}'")]
    Field {
        record: String,
        field: &'static str,
        value: String,
    },
    #[error("{record}: {source}")]
    Coord {
        record: String,
        #[source]
        source: CoordError,
    },
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl IngestError {
    pub fn shape(record: impl Into<String>, reason: impl Into<String>) -> Self {
        IngestError::RecordShapeMismatch {
            record: record.into(),
            reason: reason.into(),
        }
    }
}
