//! Wire-protocol primitives and query DSL for the IPTVPortal JSONSQL API.
//!
//! This crate is pure data transformation: it turns structured query
//! values into the JSONRPC envelopes the portal speaks, and it models
//! the response shapes coming back. No I/O happens here; the
//! `iptvportal-client` crate owns transmission.
//!
//! ```
//! use iptvportal_jsonsql::{cond, QueryBuilder, Select};
//!
//! let mut builder = QueryBuilder::new();
//! let envelope = builder.select(
//!     Select::new(["id", "name"], "tv_channel")
//!         .filter(cond::eq("enabled", true))
//!         .limit(10),
//! );
//! ```

pub mod builder;
pub mod cond;
pub mod envelope;
pub mod query;

pub use builder::QueryBuilder;
pub use cond::Condition;
pub use envelope::{Envelope, ErrorObject, Response, ResponseId, Version};
pub use query::{
    ConflictAction, Delete, Field, FieldList, Fields, Insert, OnConflict, Select, Source, Subquery,
    Update, Upsert,
};
