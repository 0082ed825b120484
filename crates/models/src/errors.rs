use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("invalid recipe id: {0}")]
    InvalidId(String),
}
