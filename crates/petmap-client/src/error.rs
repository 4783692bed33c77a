use thiserror::Error;

/// Errors returned by the facility API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("unexpected HTTP status {status} from {url}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },

    /// An authorized endpoint was called without a bearer token.
    #[error("not logged in")]
    NotAuthenticated,

    /// The backend rejected the bearer token; it has been discarded.
    #[error("session expired or token rejected (HTTP {status})")]
    AuthExpired { status: u16 },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl ClientError {
    /// Whether the user has to log in again.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            ClientError::NotAuthenticated | ClientError::AuthExpired { .. }
        )
    }

    /// Whether this is a fetch failure shown inline (network, status, or body).
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ClientError::Http(_) | ClientError::Status { .. } | ClientError::Deserialize { .. }
        )
    }
}
