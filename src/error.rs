/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum PntaError {
    /// Payload could not be encoded as a JSON object. Never retried.
    #[error("serialization error: {message}")]
    Serialization {
        /// Encoder error text.
        message: String,
        /// Debug rendering of the payload that failed to encode.
        payload: String,
    },
    /// Target URL is not an absolute `http`/`https` URL.
    #[error("invalid url '{url}': {message}")]
    InvalidUrl { url: String, message: String },
    /// Caller supplied an empty project id, device token or similar.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// Transport failure from `reqwest` on the final attempt.
    #[error("network error: {0}")]
    Network(reqwest::Error),
    /// Non-success HTTP status with best-effort response body.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
}

impl PntaError {
    /// Stable error code reported to the plugin's method channel.
    ///
    /// `HTTP_<status>`, `NETWORK_ERROR`, `SERIALIZATION_ERROR`,
    /// `INVALID_URL` or `INVALID_ARGUMENTS`.
    pub fn code(&self) -> String {
        match self {
            Self::Serialization { .. } => "SERIALIZATION_ERROR".to_owned(),
            Self::InvalidUrl { .. } => "INVALID_URL".to_owned(),
            Self::InvalidArguments(_) => "INVALID_ARGUMENTS".to_owned(),
            Self::Network(_) => "NETWORK_ERROR".to_owned(),
            Self::Http { status, .. } => format!("HTTP_{status}"),
        }
    }

    /// Human-readable message, without the details payload.
    pub fn message(&self) -> String {
        match self {
            Self::Serialization { message, .. } => {
                format!("Failed to serialize payload to JSON: {message}")
            }
            Self::InvalidUrl { message, .. } => format!("Invalid URL: {message}"),
            Self::InvalidArguments(message) => message.clone(),
            Self::Network(err) => err.to_string(),
            Self::Http { status, .. } => format!("Server returned error status code {status}"),
        }
    }

    /// Optional details: response body, offending payload or URL.
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Serialization { payload, .. } => Some(payload),
            Self::InvalidUrl { url, .. } => Some(url),
            Self::Http { body, .. } if !body.is_empty() => Some(body),
            Self::Http { .. } | Self::InvalidArguments(_) | Self::Network(_) => None,
        }
    }

    /// HTTP status for [`PntaError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
