//! Error types for calls against remote media services.
//!
//! Every remote-call wrapper returns [`ClientError`]. The resolution and
//! workflow layers never let these escape: they log them and fall through
//! to the next tier.

/// Failure of a single remote call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response payload could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The payload parsed but lacks a value the caller needs.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl ClientError {
    /// Create a new Parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new Status error.
    pub fn status<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<quick_xml::DeError> for ClientError {
    fn from(err: quick_xml::DeError) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type alias for remote calls.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::status(404, "not here");
        assert_eq!(err.to_string(), "HTTP 404: not here");

        let err = ClientError::parse("unexpected token");
        assert_eq!(err.to_string(), "Parse error: unexpected token");

        let err = ClientError::MissingField("id");
        assert_eq!(err.to_string(), "Missing field: id");
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<Vec<i64>>("{").unwrap_err();
        let err = ClientError::from(json_err);
        assert!(matches!(err, ClientError::Parse(_)));
    }
}
