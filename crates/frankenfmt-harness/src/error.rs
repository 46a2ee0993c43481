//! Harness error type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{path}: {source}")]
    FixtureFile {
        path: PathBuf,
        #[source]
        source: Box<HarnessError>,
    },
    #[error("no fixture JSON files found in {0}")]
    NoFixtures(PathBuf),
    #[error("bad input '{field}': {message}")]
    Input { field: String, message: String },
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
    #[error("bad argument '{0}': expected <kind>:<value>")]
    BadArgument(String),
    #[error(transparent)]
    Format(#[from] frankenfmt_core::FormatError),
}

impl HarnessError {
    pub(crate) fn input(field: &str, message: impl Into<String>) -> Self {
        Self::Input {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
