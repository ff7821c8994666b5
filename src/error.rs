use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `HerdsimError` and maps other errors to
/// convert to a `HerdsimError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum HerdsimError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    ReportError(String),
    HerdsimError(String),
}

impl From<io::Error> for HerdsimError {
    fn from(error: io::Error) -> Self {
        HerdsimError::IoError(error)
    }
}

impl From<serde_json::Error> for HerdsimError {
    fn from(error: serde_json::Error) -> Self {
        HerdsimError::JsonError(error)
    }
}

impl From<csv::Error> for HerdsimError {
    fn from(error: csv::Error) -> Self {
        HerdsimError::CSVError(error)
    }
}

impl From<String> for HerdsimError {
    fn from(error: String) -> Self {
        HerdsimError::HerdsimError(error)
    }
}

impl From<&str> for HerdsimError {
    fn from(error: &str) -> Self {
        HerdsimError::HerdsimError(error.to_string())
    }
}

impl std::error::Error for HerdsimError {}

impl Display for HerdsimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HerdsimError::IoError(error) => write!(f, "IO error: {error}"),
            HerdsimError::JsonError(error) => write!(f, "JSON error: {error}"),
            HerdsimError::CSVError(error) => write!(f, "CSV error: {error}"),
            HerdsimError::ReportError(message) | HerdsimError::HerdsimError(message) => {
                write!(f, "Error: {message}")
            }
        }
    }
}
