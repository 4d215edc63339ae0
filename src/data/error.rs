use std::path::PathBuf;

use thiserror::Error;

/// Fatal dataset loading failures. Any of these aborts startup.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot open dataset {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("line {line}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("column '{0}' has no values to impute missing entries from")]
    NoModeValue(&'static str),
}
