/// Failures surfaced by the API client.
///
/// `Unauthorized` is the only kind with a global policy attached: the
/// client has already cleared the session when it is returned, and the
/// portal reacts to it by navigating to the login screen. Every other kind
/// is left to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("API returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("API is not reachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `message` field of a JSON error body, when the server sent one.
    pub fn server_message(&self) -> Option<String> {
        let ApiError::Status { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    pub(crate) fn from_transport(err: reqwest::Error, base_url: &str) -> Self {
        if err.is_connect() {
            ApiError::Connection(base_url.to_string())
        } else if err.is_decode() {
            ApiError::ResponseParsing(err.to_string())
        } else {
            ApiError::HttpClient(err.to_string())
        }
    }
}
