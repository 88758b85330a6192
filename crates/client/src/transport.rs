//! HTTP transport with retry and exponential backoff.

use core::time::Duration;

use reqwest::header::COOKIE;
use reqwest::Client as HttpClient;
use serde::Serialize;
use serde_json::Value;
use tokio::time::sleep;
use tracing::warn;
use url::Url;

use iptvportal_jsonsql::{Envelope, Response};

use crate::config::Settings;
use crate::error::{ApiError, ClientError, TransportError};

/// Outcome of one attempt, deciding whether the retry loop continues.
enum Attempt {
    Fatal(ApiError),
    Transient(TransportError),
}

/// Delivers one envelope per call with the session id attached as the
/// `sid` cookie.
///
/// Client errors (4xx) and application error bodies fail immediately;
/// 5xx and wire-level failures are retried up to `max_retries` extra
/// times with a pure exponential backoff of `factor * 2^attempt`
/// seconds. The backoff sleeps suspend only the calling task.
#[derive(Debug)]
pub(crate) struct Transport {
    http: HttpClient,
    endpoint: Url,
    max_retries: u32,
    backoff_factor: f64,
}

impl Transport {
    pub(crate) fn new(settings: &Settings, http: HttpClient) -> Self {
        Self {
            http,
            endpoint: settings.endpoint().clone(),
            max_retries: settings.max_retries(),
            backoff_factor: settings.retry_backoff_factor(),
        }
    }

    pub(crate) async fn request<P: Serialize>(
        &self,
        envelope: &Envelope<P>,
        token: &str,
    ) -> Result<Value, ClientError> {
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(envelope, token).await {
                Ok(result) => return Ok(result),
                Err(Attempt::Fatal(error)) => return Err(ClientError::Api(error)),
                Err(Attempt::Transient(error)) => {
                    if attempt >= self.max_retries {
                        return Err(ClientError::RetryExhausted {
                            attempts: attempt + 1,
                            source: error,
                        });
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        delay_secs = delay.as_secs_f64(),
                        error = %error,
                        "transient failure, backing off"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let secs = self.backoff_factor * 2_f64.powf(f64::from(attempt));
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    async fn send_once<P: Serialize>(
        &self,
        envelope: &Envelope<P>,
        token: &str,
    ) -> Result<Value, Attempt> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(COOKIE, format!("sid={token}"))
            .json(envelope)
            .send()
            .await
            .map_err(|error| Attempt::Transient(TransportError::classify(error)))?;

        let status = response.status();

        // 4xx is terminal, never retried.
        if status.is_client_error() {
            let message = response.text().await.unwrap_or_default();
            return Err(Attempt::Fatal(ApiError::from_status(
                status.as_u16(),
                message,
            )));
        }

        if !status.is_success() {
            return Err(Attempt::Transient(TransportError::Status {
                status: status.as_u16(),
            }));
        }

        let response: Response = response
            .json()
            .await
            .map_err(|error| Attempt::Transient(TransportError::classify(error)))?;

        // An error body on a 2xx is an application error, never retried.
        if let Some(error) = response.error {
            return Err(Attempt::Fatal(ApiError::from(error)));
        }

        response
            .result
            .ok_or(Attempt::Transient(TransportError::InvalidEnvelope))
    }
}
