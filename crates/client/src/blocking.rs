//! Blocking front end over the async client.
//!
//! Owns a private current-thread runtime and drives the async facade on
//! it, the same layering reqwest uses for its own blocking client. The
//! observable contract (session caching, retry policy, error taxonomy)
//! is identical to [`crate::Client`].

use serde::Serialize;
use serde_json::Value;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

use iptvportal_jsonsql::Envelope;

use crate::config::Settings;
use crate::error::{ClientError, Result};

/// Blocking portal client for one-call-at-a-time use.
#[derive(Debug)]
pub struct Client {
    inner: crate::Client,
    runtime: Runtime,
}

impl Client {
    /// Binds a client to `settings`. No network traffic happens here.
    pub fn connect(settings: Settings) -> Result<Self> {
        let runtime = RuntimeBuilder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;

        Ok(Self {
            inner: crate::Client::connect(settings)?,
            runtime,
        })
    }

    /// Executes one envelope, blocking until it resolves or fails with
    /// a classified error.
    pub fn execute<P: Serialize>(&self, envelope: &Envelope<P>) -> Result<Value> {
        self.runtime.block_on(self.inner.execute(envelope))
    }

    /// Executes envelopes concurrently and blocks for the full batch;
    /// results are positionally aligned with the input.
    pub fn execute_many<P: Serialize>(&self, envelopes: &[Envelope<P>]) -> Result<Vec<Value>> {
        self.runtime.block_on(self.inner.execute_many(envelopes))
    }

    /// Releases the connection pool and the cached session; idempotent.
    pub fn close(&mut self) {
        self.inner.close();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}
