//! Session-token authentication with TTL caching.
//!
//! The portal hands out an opaque session id from the `authorize`
//! method; that id stays good for a while, so re-authenticating on
//! every request would be wasted round-trips. [`SessionManager`] caches
//! the id with a fixed TTL and only goes back to the wire once the
//! cache is stale or explicitly invalidated.

use std::time::{Duration, Instant};

use reqwest::Client as HttpClient;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use iptvportal_jsonsql::{Envelope, Response};

use crate::config::{Secret, Settings};
use crate::error::{AuthError, TransportError};

/// How long a session id is trusted without re-authenticating. The
/// portal does not advertise an expiry; one hour is the design
/// constant.
const SESSION_TTL: Duration = Duration::from_secs(3600);

/// Key carrying the session identifier in the authorize result.
const SESSION_ID_KEY: &str = "sessionid";

#[derive(Clone, Debug)]
struct Session {
    token: String,
    issued_at: Instant,
}

impl Session {
    fn is_valid(&self, now: Instant) -> bool {
        now < self.issued_at + SESSION_TTL
    }
}

/// Owns the cached session and the authorize exchange.
///
/// The whole read-check-refresh sequence runs under one lock, so
/// concurrent callers agree on a single current token and at most one
/// authorize exchange is in flight at a time.
#[derive(Debug)]
pub(crate) struct SessionManager {
    http: HttpClient,
    endpoint: Url,
    username: String,
    password: Secret,
    session: Mutex<Option<Session>>,
}

impl SessionManager {
    pub(crate) fn new(settings: &Settings, http: HttpClient) -> Self {
        Self {
            http,
            endpoint: settings.endpoint().clone(),
            username: settings.username().to_owned(),
            password: settings.password().clone(),
            session: Mutex::new(None),
        }
    }

    /// Returns the cached token while it is fresh, re-authenticating
    /// otherwise.
    pub(crate) async fn token(&self) -> Result<String, AuthError> {
        let mut guard = self.session.lock().await;

        if let Some(session) = guard.as_ref() {
            if session.is_valid(Instant::now()) {
                return Ok(session.token.clone());
            }
        }

        debug!("no valid session cached, authorizing");
        let session = self.authenticate().await?;
        let token = session.token.clone();
        *guard = Some(session);

        Ok(token)
    }

    /// Drops the cached session unconditionally; the next [`token`]
    /// call re-authenticates.
    ///
    /// [`token`]: Self::token
    pub(crate) async fn invalidate(&self) {
        *self.session.lock().await = None;
    }

    async fn authenticate(&self) -> Result<Session, AuthError> {
        let envelope = Envelope::new(
            1,
            "authorize",
            json!({
                "user": self.username,
                "password": self.password.expose(),
            }),
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&envelope)
            .send()
            .await
            .map_err(TransportError::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Transport(TransportError::Status {
                status: status.as_u16(),
            }));
        }

        let response: Response = response.json().await.map_err(TransportError::classify)?;

        if let Some(error) = response.error {
            return Err(AuthError::Rejected(error.to_string()));
        }

        let result = response.result.unwrap_or(Value::Null);
        let token = match result.get(SESSION_ID_KEY) {
            None => return Err(AuthError::MissingSessionId),
            Some(Value::Null) => return Err(AuthError::InvalidSessionId { reason: "null" }),
            Some(Value::String(token)) if token.is_empty() => {
                return Err(AuthError::InvalidSessionId { reason: "empty" })
            }
            Some(Value::String(token)) => token.clone(),
            Some(_) => {
                return Err(AuthError::InvalidSessionId {
                    reason: "not a string",
                })
            }
        };

        debug!("authorized, caching session");
        Ok(Session {
            token,
            issued_at: Instant::now(),
        })
    }
}
