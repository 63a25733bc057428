use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure is fatal for the run; there is no partial output.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} cannot be empty")]
    MissingArgument(&'static str),

    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {} as JSON", path.display())]
    MalformedJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Top-level value of {} must be a JSON object", path.display())]
    NotAnObject { path: PathBuf },

    #[error("Failed to load env file {}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Invalid number '{value}' in ${name}")]
    InvalidNumber { name: String, value: String },

    #[error("Invalid boolean '{value}' in ${name}")]
    InvalidBoolean { name: String, value: String },

    #[error("Invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid value '{value}' for {name}; expected one of: {expected}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Failed to serialize output")]
    Serialize(#[source] serde_json::Error),
}
