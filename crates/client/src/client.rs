//! Client facade composing authentication and transport.

use futures_util::future::try_join_all;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use iptvportal_jsonsql::Envelope;

use crate::auth::SessionManager;
use crate::config::Settings;
use crate::error::{ClientError, Result};
use crate::transport::Transport;

/// Asynchronous portal client.
///
/// [`connect`](Self::connect) builds the connection pool and the
/// authenticator without touching the network; authentication happens
/// lazily on the first [`execute`](Self::execute). Dropping the client
/// or calling [`close`](Self::close) releases the pool and forgets the
/// cached session, so scoped ownership is enough to guarantee cleanup
/// on every exit path.
///
/// One client instance is safe to share across concurrent tasks: the
/// pool is shared, the session cache is behind a single lock, and
/// backoff sleeps suspend only the operation that is retrying.
#[derive(Debug)]
pub struct Client {
    state: Option<State>,
}

#[derive(Debug)]
struct State {
    transport: Transport,
    auth: SessionManager,
}

impl Client {
    /// Binds a client to `settings`. No network traffic happens here.
    pub fn connect(settings: Settings) -> Result<Self> {
        let http = build_http(&settings)?;

        Ok(Self {
            state: Some(State {
                transport: Transport::new(&settings, http.clone()),
                auth: SessionManager::new(&settings, http),
            }),
        })
    }

    /// Executes one envelope, resolving a session token first.
    ///
    /// If the portal rejects the session as unauthorized, the cached
    /// session is invalidated and the request retried once with a fresh
    /// token; a second rejection is surfaced as-is.
    pub async fn execute<P: Serialize>(&self, envelope: &Envelope<P>) -> Result<Value> {
        let state = self.state.as_ref().ok_or(ClientError::Closed)?;

        let token = state.auth.token().await?;

        match state.transport.request(envelope, &token).await {
            Err(ClientError::Api(error)) if error.is_unauthorized() => {
                debug!("session rejected as unauthorized, re-authenticating once");
                state.auth.invalidate().await;
                let token = state.auth.token().await?;
                state.transport.request(envelope, &token).await
            }
            outcome => outcome,
        }
    }

    /// Executes envelopes concurrently over the shared pool.
    ///
    /// Results are positionally aligned with the input (empty input,
    /// empty output); completion order on the wire is unconstrained.
    /// One classified failure fails the whole batch; no partial
    /// results are returned.
    pub async fn execute_many<P: Serialize>(
        &self,
        envelopes: &[Envelope<P>],
    ) -> Result<Vec<Value>> {
        try_join_all(envelopes.iter().map(|envelope| self.execute(envelope))).await
    }

    /// Releases the connection pool and the cached session.
    ///
    /// Idempotent: closing an already-closed client is a no-op.
    /// Executing afterwards fails with [`ClientError::Closed`].
    pub fn close(&mut self) {
        self.state = None;
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.is_none()
    }
}

fn build_http(settings: &Settings) -> Result<HttpClient> {
    let mut builder = HttpClient::builder()
        .timeout(settings.timeout())
        .pool_max_idle_per_host(20);

    if !settings.verify_tls() {
        builder = builder.danger_accept_invalid_certs(true);
    }
    if !settings.allow_http2() {
        builder = builder.http1_only();
    }

    builder.build().map_err(ClientError::Http)
}
