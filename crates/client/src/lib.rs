//! IPTVPortal API client.
//!
//! Composes session-token authentication (cached with a one-hour TTL),
//! a retrying HTTP transport with exponential backoff, and a
//! connect/execute/close facade over them. Queries are built with the
//! `iptvportal-jsonsql` crate, re-exported here as [`jsonsql`].
//!
//! ```no_run
//! use iptvportal_client::jsonsql::{cond, QueryBuilder, Select};
//! use iptvportal_client::{Client, Settings};
//!
//! # async fn run() -> iptvportal_client::Result<()> {
//! let settings = Settings::builder("demo.iptvportal.cloud", "admin", "hunter2").build()?;
//! let client = Client::connect(settings)?;
//!
//! let mut builder = QueryBuilder::new();
//! let envelope = builder.select(
//!     Select::new(["id", "name"], "tv_channel")
//!         .filter(cond::eq("enabled", true))
//!         .limit(10),
//! );
//!
//! let channels = client.execute(&envelope).await?;
//! # Ok(())
//! # }
//! ```

pub use iptvportal_jsonsql as jsonsql;

mod auth;
pub mod blocking;
mod client;
pub mod config;
pub mod error;
mod transport;

pub use client::Client;
pub use config::{ConfigError, Secret, Settings, SettingsBuilder};
pub use error::{ApiError, AuthError, ClientError, Result, TransportError};
