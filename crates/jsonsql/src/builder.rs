//! Request-envelope stamping for the query DSL.

use crate::envelope::Envelope;
use crate::query::{Delete, Fields, Insert, Select, Source, Subquery, Update, Upsert};

/// Stamps queries into JSONRPC envelopes.
///
/// Ids come from a builder-local counter starting at 1, incremented on
/// every stamped call. The counter is never shared between instances and
/// carries no meaning across them.
///
/// # Example
///
/// ```
/// use iptvportal_jsonsql::{QueryBuilder, Select};
///
/// let mut builder = QueryBuilder::new();
/// let envelope = builder.select(Select::new(["id", "name"], "tv_channel").limit(10));
/// assert_eq!(envelope.id, 1);
/// assert_eq!(envelope.method, "select");
/// ```
#[derive(Debug)]
pub struct QueryBuilder {
    next_id: u64,
}

impl QueryBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn select(&mut self, query: Select) -> Envelope<Select> {
        self.stamp("select", query)
    }

    pub fn insert(&mut self, query: Insert) -> Envelope<Insert> {
        self.stamp("insert", query)
    }

    pub fn update(&mut self, query: Update) -> Envelope<Update> {
        self.stamp("update", query)
    }

    pub fn delete(&mut self, query: Delete) -> Envelope<Delete> {
        self.stamp("delete", query)
    }

    /// Upserts ride the `insert` method; the `on_conflict` clause in the
    /// params is what makes them an upsert.
    pub fn upsert(&mut self, query: Upsert) -> Envelope<Upsert> {
        self.stamp("insert", query)
    }

    /// Starts a subquery fragment for nesting inside a WHERE clause.
    /// Fragments are not envelopes and never consume a request id.
    pub fn select_subquery(&self, data: impl Into<Fields>, from: impl Into<Source>) -> Subquery {
        Subquery::new(data, from)
    }

    fn stamp<P>(&mut self, method: &str, params: P) -> Envelope<P> {
        let envelope = Envelope::new(self.next_id, method, params);
        self.next_id += 1;
        envelope
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
