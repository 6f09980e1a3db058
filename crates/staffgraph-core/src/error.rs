use thiserror::Error;

/// Top-level error type for staffgraph operations.
///
/// The `Display` text of every variant except `Store` is safe to return to
/// API clients verbatim.
#[derive(Error, Debug)]
pub enum StaffError {
    #[error("Request body is empty")]
    EmptyBody,

    #[error("Not all required fields have been provided")]
    MissingFields,

    #[error("Invalid request: {0}")]
    InvalidInput(String),

    #[error("Unknown query parameter: {0}")]
    UnknownParameter(String),

    #[error("Employee already exists.")]
    DuplicateEmployee { name: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(String),
}

impl StaffError {
    pub fn employee_not_found() -> Self {
        Self::NotFound("Employee not found.".to_string())
    }
}

pub type Result<T> = std::result::Result<T, StaffError>;
