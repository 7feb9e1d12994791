use thiserror::Error;

/// Errors returned by the vision model client.
#[derive(Debug, Error)]
pub enum VisionError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model API returned a non-2xx status with a body.
    #[error("vision API error ({status}): {detail}")]
    ApiError { status: u16, detail: String },

    /// The completion contained no message content.
    #[error("vision API returned an empty completion")]
    EmptyCompletion,

    /// A base URL or endpoint path could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The response envelope could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
