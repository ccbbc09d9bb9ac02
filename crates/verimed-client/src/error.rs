/// Client-specific result type
pub type Result<T> = std::result::Result<T, VerimedError>;

/// Errors from the `VeriMed` client
///
/// Every failing call surfaces as one of these variants. Callers that only
/// care about the HTTP outcome can branch on [`VerimedError::status_code`],
/// which is `0` whenever no usable response was received.
#[derive(Debug, thiserror::Error)]
pub enum VerimedError {
    /// Server returned a non-success status
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message from the response body, or `HTTP <status>`
        message: String,
        /// Raw response body
        body: String,
    },

    /// Request failed before a response was received
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// Success response did not match the expected shape
    #[error("failed to parse response: {message}")]
    Decode {
        /// Parser error
        message: String,
        /// Raw response body
        body: String,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl VerimedError {
    /// HTTP status of the failed call, `0` for failures without a response
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Api { status, .. } => *status,
            Self::Transport(_) | Self::Decode { .. } | Self::Config(_) => 0,
        }
    }

    /// Human-readable failure message
    pub fn message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Raw response body, when a response was received
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { body, .. } | Self::Decode { body, .. } => Some(body),
            Self::Transport(_) | Self::Config(_) => None,
        }
    }
}
