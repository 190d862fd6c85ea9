use thiserror::Error;

/// Failure taxonomy for the generation pipeline and plan store.
///
/// `Malformed` is terminal for a request (the extracted text was not JSON);
/// `Schema` means the JSON parsed but misses shapes the renderer needs.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("not configured: {0}")]
    Configuration(String),
    #[error("generation failed: {0}")]
    Generation(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("schema violation: {0}")]
    Schema(String),
    #[error("invalid profile: {0}")]
    InvalidProfile(String),
    #[error("plan name must not be empty")]
    InvalidName,
    #[error("Plan not found")]
    NotFound(i64),
    #[error("store error: {0}")]
    Store(String),
}

impl From<rusqlite::Error> for PlanError {
    fn from(e: rusqlite::Error) -> Self {
        PlanError::Store(e.to_string())
    }
}
