use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TasktrackError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
