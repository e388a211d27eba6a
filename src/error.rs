use thiserror::Error;

/// Errors raised by the mappers and the API client
///
/// The normalizer itself never fails; these cover form validation and the
/// request/response cycle around it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("order has no filled line items")]
    EmptyOrder,

    #[error("invalid date `{0}`")]
    InvalidDate(String),

    #[error("HTTP transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unauthorized: session expired or token rejected")]
    Unauthorized,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
