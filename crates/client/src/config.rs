//! Client configuration.
//!
//! [`Settings`] is built once, validated, and stays immutable for the
//! client's lifetime. Credential supply (environment, config files,
//! prompting) is the caller's concern; by the time a value reaches
//! [`SettingsBuilder::build`] it only has to pass the checks below.

use core::fmt;
use core::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF_FACTOR: f64 = 1.0;

/// Validation failures raised while building [`Settings`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("invalid portal domain {domain:?}")]
    InvalidDomain {
        domain: String,
        #[source]
        source: url::ParseError,
    },
}

/// A credential that never appears in `Debug` output.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The wrapped value. Call sites of this method are the only places
    /// a credential leaves the wrapper.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(*****)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Immutable client configuration.
#[derive(Clone, Debug)]
pub struct Settings {
    domain: String,
    username: String,
    password: Secret,
    endpoint: Url,
    timeout: Duration,
    max_retries: u32,
    retry_backoff_factor: f64,
    verify_tls: bool,
    allow_http2: bool,
}

impl Settings {
    /// Starts a builder with the required credentials and documented
    /// defaults for everything else.
    pub fn builder(
        domain: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<Secret>,
    ) -> SettingsBuilder {
        SettingsBuilder {
            domain: domain.into(),
            username: username.into(),
            password: password.into(),
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_factor: DEFAULT_RETRY_BACKOFF_FACTOR,
            verify_tls: true,
            allow_http2: true,
        }
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &Secret {
        &self.password
    }

    /// The API endpoint, `https://{domain}/api` unless overridden.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn retry_backoff_factor(&self) -> f64 {
        self.retry_backoff_factor
    }

    #[must_use]
    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    #[must_use]
    pub fn allow_http2(&self) -> bool {
        self.allow_http2
    }
}

#[derive(Debug)]
pub struct SettingsBuilder {
    domain: String,
    username: String,
    password: Secret,
    endpoint: Option<Url>,
    timeout: Duration,
    max_retries: u32,
    retry_backoff_factor: f64,
    verify_tls: bool,
    allow_http2: bool,
}

impl SettingsBuilder {
    /// Per-request timeout; a timed-out attempt counts as a transient
    /// transport failure.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extra attempts after the first; the transport makes up to
    /// `max_retries + 1` calls per request.
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Base of the exponential backoff: the sleep before retry `n` is
    /// `factor * 2^n` seconds.
    #[must_use]
    pub fn retry_backoff_factor(mut self, factor: f64) -> Self {
        self.retry_backoff_factor = factor;
        self
    }

    #[must_use]
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    #[must_use]
    pub fn allow_http2(mut self, allow: bool) -> Self {
        self.allow_http2 = allow;
        self
    }

    /// Replaces the derived `https://{domain}/api` endpoint. Meant for
    /// test servers and local proxies; production traffic should go
    /// through the domain.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        if self.domain.is_empty() {
            return Err(ConfigError::Empty { field: "domain" });
        }
        if self.username.is_empty() {
            return Err(ConfigError::Empty { field: "username" });
        }
        if self.password.is_empty() {
            return Err(ConfigError::Empty { field: "password" });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::NotPositive { field: "timeout" });
        }
        if self.retry_backoff_factor <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "retry_backoff_factor",
            });
        }

        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => Url::parse(&format!("https://{}/api", self.domain)).map_err(|source| {
                ConfigError::InvalidDomain {
                    domain: self.domain.clone(),
                    source,
                }
            })?,
        };

        Ok(Settings {
            domain: self.domain,
            username: self.username,
            password: self.password,
            endpoint,
            timeout: self.timeout,
            max_retries: self.max_retries,
            retry_backoff_factor: self.retry_backoff_factor,
            verify_tls: self.verify_tls,
            allow_http2: self.allow_http2,
        })
    }
}
