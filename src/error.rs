use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("spec error: {0}")]
    Spec(String),
    #[error("something happened while trying to build this package on koji:\n{output}")]
    Build { output: String },
    #[error("something happened while uploading the files:\n{output}")]
    Upload { output: String },
    #[error("identity error: {0}")]
    Identity(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
