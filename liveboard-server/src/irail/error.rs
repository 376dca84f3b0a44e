//! iRail client error types.

/// Boxed transport error, so offline clients can report failures too.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from the iRail HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum IrailError {
    /// The request could not be sent or the transport failed mid-way.
    #[error("network error: {0}")]
    Network(#[source] BoxError),

    /// The API answered with a non-2xx status.
    #[error("HTTP status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The body was not valid JSON or lacked the expected shape.
    #[error("parse error: {message}")]
    Parse {
        message: String,
        body: Option<String>,
    },
}

impl From<reqwest::Error> for IrailError {
    fn from(err: reqwest::Error) -> Self {
        IrailError::Network(Box::new(err))
    }
}

impl IrailError {
    /// Build a parse error, keeping the first 500 characters of the body.
    pub(crate) fn parse(message: impl Into<String>, body: &str) -> Self {
        IrailError::Parse {
            message: message.into(),
            body: Some(body.chars().take(500).collect()),
        }
    }

    /// Build a parse error for a body that parsed but lacked a required part.
    pub(crate) fn missing(what: &str) -> Self {
        IrailError::Parse {
            message: format!("missing {what}"),
            body: None,
        }
    }
}
