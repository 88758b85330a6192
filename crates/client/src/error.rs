//! Error taxonomy for the client.
//!
//! Every failure this crate surfaces is one of the tagged variants
//! below, so callers match on discriminants instead of probing message
//! text. Transport sub-classification (timeout, connection, TLS) is
//! kept as distinct reasons inside the variants, never collapsed.

use std::error::Error as StdError;

use thiserror::Error;

use iptvportal_jsonsql::ErrorObject;

use crate::config::ConfigError;

/// JSONRPC error code the portal uses for unauthorized requests.
const UNAUTHORIZED_CODE: i64 = -32401;

pub type Result<T, E = ClientError> = core::result::Result<T, E>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),

    /// Every attempt for one request failed with a transient error; the
    /// last failure is preserved for diagnostics.
    #[error("retry budget exhausted after {attempts} attempts")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("failed to build http client")]
    Http(#[source] reqwest::Error),

    #[error("failed to start blocking runtime")]
    Runtime(#[source] std::io::Error),

    /// The client was used after `close`.
    #[error("client is closed")]
    Closed,
}

/// The portal rejected the request at the application level, or
/// answered with a non-retryable client error status.
#[derive(Debug, Error)]
#[error("api error: {message}")]
#[non_exhaustive]
pub struct ApiError {
    /// HTTP status when the rejection was a 4xx.
    pub status: Option<u16>,
    /// JSONRPC error code when the rejection came in an error body.
    pub code: Option<i64>,
    pub message: String,
}

impl ApiError {
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        Self {
            status: Some(status),
            code: None,
            message,
        }
    }

    /// Whether this rejection means the session is no longer accepted,
    /// making one re-authentication worth trying.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401) || self.code == Some(UNAUTHORIZED_CODE)
    }
}

impl From<ErrorObject> for ApiError {
    fn from(error: ErrorObject) -> Self {
        Self {
            status: None,
            code: Some(error.code),
            message: error.message,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The portal answered the authorize exchange with an error body.
    #[error("server rejected authorization: {0}")]
    Rejected(String),

    /// The authorize result carried a session id that cannot be used
    /// (empty string, null, or a non-string value).
    #[error("invalid session id ({reason})")]
    InvalidSessionId { reason: &'static str },

    /// The authorize result carried no session id at all.
    #[error("missing session id in authorize response")]
    MissingSessionId,

    /// The exchange itself failed at the transport level.
    #[error("authorization request failed: {0}")]
    Transport(#[from] TransportError),
}

/// Wire-level failures. All of these are transient from the retry
/// policy's point of view except where the transport decides otherwise.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransportError {
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("connection failed")]
    Connect(#[source] reqwest::Error),

    #[error("tls negotiation failed")]
    Tls(#[source] reqwest::Error),

    #[error("server returned status {status}")]
    Status { status: u16 },

    #[error("malformed response body")]
    Decode(#[source] reqwest::Error),

    #[error("response carried neither result nor error")]
    InvalidEnvelope,

    #[error("request failed")]
    Other(#[source] reqwest::Error),
}

impl TransportError {
    pub(crate) fn classify(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else if error.is_connect() {
            if mentions_tls(&error) {
                Self::Tls(error)
            } else {
                Self::Connect(error)
            }
        } else if error.is_decode() {
            Self::Decode(error)
        } else {
            Self::Other(error)
        }
    }
}

// reqwest does not expose a TLS discriminant; the handshake failure
// sits somewhere in the source chain.
fn mentions_tls(error: &reqwest::Error) -> bool {
    let mut source = StdError::source(error);
    while let Some(inner) = source {
        let text = inner.to_string();
        if text.contains("tls") || text.contains("TLS") || text.contains("certificate") {
            return true;
        }
        source = inner.source();
    }
    false
}
