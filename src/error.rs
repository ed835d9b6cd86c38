use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("ItemReader error: {0}")]
    ItemReader(String),

    #[error("ItemProcessor error: {0}")]
    ItemProcessor(String),

    #[error("ItemWriter error: {0}")]
    ItemWriter(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Step failed: {0}")]
    Step(String),
}

impl From<reqwest::Error> for BatchError {
    fn from(error: reqwest::Error) -> Self {
        BatchError::Service(error.to_string())
    }
}
