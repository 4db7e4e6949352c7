use std::io;
use std::path::PathBuf;
use thiserror::Error;

// Errors raised by the stress and harvest-index routines
#[derive(Error, Debug)]
pub enum StressError {
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
    #[error("IO error reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl StressError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        StressError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, StressError>;
