//! Parameter types for the five JSONSQL operations.
//!
//! Each type serializes to the exact `params` object the portal expects;
//! optional clauses are omitted entirely when unset, never emitted as
//! `null`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cond::Condition;

/// A projection list: one field name, several, or raw expression objects
/// (aliases, aggregates).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Fields {
    One(String),
    Many(Vec<Field>),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Field {
    Name(String),
    Expr(Value),
}

impl From<&str> for Fields {
    fn from(name: &str) -> Self {
        Self::One(name.to_owned())
    }
}

impl From<String> for Fields {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(names: [&str; N]) -> Self {
        Self::Many(names.into_iter().map(|name| Field::Name(name.to_owned())).collect())
    }
}

impl From<Vec<String>> for Fields {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names.into_iter().map(Field::Name).collect())
    }
}

impl From<Vec<Field>> for Fields {
    fn from(fields: Vec<Field>) -> Self {
        Self::Many(fields)
    }
}

impl From<Fields> for Value {
    fn from(fields: Fields) -> Self {
        match fields {
            Fields::One(name) => Self::String(name),
            Fields::Many(fields) => Self::Array(
                fields
                    .into_iter()
                    .map(|field| match field {
                        Field::Name(name) => Self::String(name),
                        Field::Expr(expr) => expr,
                    })
                    .collect(),
            ),
        }
    }
}

/// A query source: a table name, or an ordered list of join
/// specification objects.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Source {
    Table(String),
    Joins(Vec<Value>),
}

impl From<&str> for Source {
    fn from(table: &str) -> Self {
        Self::Table(table.to_owned())
    }
}

impl From<String> for Source {
    fn from(table: String) -> Self {
        Self::Table(table)
    }
}

impl From<Vec<Value>> for Source {
    fn from(joins: Vec<Value>) -> Self {
        Self::Joins(joins)
    }
}

impl From<Source> for Value {
    fn from(source: Source) -> Self {
        match source {
            Source::Table(table) => Self::String(table),
            Source::Joins(joins) => Self::Array(joins),
        }
    }
}

/// One field name or several, for `order_by` / `group_by` / `returning`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum FieldList {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for FieldList {
    fn from(name: &str) -> Self {
        Self::One(name.to_owned())
    }
}

impl From<String> for FieldList {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl<const N: usize> From<[&str; N]> for FieldList {
    fn from(names: [&str; N]) -> Self {
        Self::Many(names.into_iter().map(ToOwned::to_owned).collect())
    }
}

impl From<Vec<String>> for FieldList {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

fn names(columns: impl IntoIterator<Item = impl Into<String>>) -> Vec<String> {
    columns.into_iter().map(Into::into).collect()
}

/// SELECT parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Select {
    pub data: Fields,
    pub from: Source,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<FieldList>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<FieldList>,
}

impl Select {
    #[must_use]
    pub fn new(data: impl Into<Fields>, from: impl Into<Source>) -> Self {
        Self {
            data: data.into(),
            from: from.into(),
            filter: None,
            order_by: None,
            limit: None,
            offset: None,
            group_by: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }

    #[must_use]
    pub fn order_by(mut self, fields: impl Into<FieldList>) -> Self {
        self.order_by = Some(fields.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn group_by(mut self, fields: impl Into<FieldList>) -> Self {
        self.group_by = Some(fields.into());
        self
    }
}

/// INSERT parameters. Row tuples must match `columns` in length; the
/// portal, not the builder, rejects mismatches.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Insert {
    pub into: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returning: Option<FieldList>,
}

impl Insert {
    #[must_use]
    pub fn new(
        into: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Self {
        Self {
            into: into.into(),
            columns: names(columns),
            values: rows.into_iter().collect(),
            returning: None,
        }
    }

    #[must_use]
    pub fn returning(mut self, fields: impl Into<FieldList>) -> Self {
        self.returning = Some(fields.into());
        self
    }
}

/// UPDATE parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Update {
    pub table: String,
    pub set: Map<String, Value>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returning: Option<FieldList>,
}

impl Update {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            set: Map::new(),
            filter: None,
            returning: None,
        }
    }

    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(column.into(), value.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }

    #[must_use]
    pub fn returning(mut self, fields: impl Into<FieldList>) -> Self {
        self.returning = Some(fields.into());
        self
    }
}

/// DELETE parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Delete {
    pub from: String,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Condition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returning: Option<FieldList>,
}

impl Delete {
    #[must_use]
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            filter: None,
            returning: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }

    #[must_use]
    pub fn returning(mut self, fields: impl Into<FieldList>) -> Self {
        self.returning = Some(fields.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ConflictAction {
    Update,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct OnConflict {
    pub columns: Vec<String>,
    #[serde(rename = "do")]
    pub action: ConflictAction,
    pub set: Map<String, Value>,
}

/// UPSERT parameters: an INSERT carrying an `on_conflict` clause. The
/// wire protocol models this on the `insert` method, not a separate
/// server operation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Upsert {
    pub into: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Value>>,
    pub on_conflict: OnConflict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returning: Option<FieldList>,
}

impl Upsert {
    #[must_use]
    pub fn new(
        into: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
        rows: impl IntoIterator<Item = Vec<Value>>,
        conflict_columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            into: into.into(),
            columns: names(columns),
            values: rows.into_iter().collect(),
            on_conflict: OnConflict {
                columns: names(conflict_columns),
                action: ConflictAction::Update,
                set: Map::new(),
            },
            returning: None,
        }
    }

    /// Adds an on-conflict assignment; use `{"excluded": "column"}` as
    /// the value to take the incoming row's value.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.on_conflict.set.insert(column.into(), value.into());
        self
    }

    #[must_use]
    pub fn returning(mut self, fields: impl Into<FieldList>) -> Self {
        self.returning = Some(fields.into());
        self
    }
}

/// A `{select: {...}}` fragment for nesting inside another query's WHERE
/// clause (typically as the operand of `in`). Not a request envelope and
/// never assigned a request id.
#[derive(Clone, Debug, PartialEq)]
pub struct Subquery {
    data: Fields,
    from: Source,
    filter: Option<Condition>,
}

impl Subquery {
    #[must_use]
    pub fn new(data: impl Into<Fields>, from: impl Into<Source>) -> Self {
        Self {
            data: data.into(),
            from: from.into(),
            filter: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.filter = Some(condition);
        self
    }
}

impl From<Subquery> for Value {
    fn from(sub: Subquery) -> Self {
        let mut select = Map::new();
        select.insert("data".to_owned(), sub.data.into());
        select.insert("from".to_owned(), sub.from.into());
        if let Some(condition) = sub.filter {
            select.insert("where".to_owned(), condition.into());
        }

        let mut fragment = Map::new();
        fragment.insert("select".to_owned(), Self::Object(select));
        Self::Object(fragment)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::cond;

    use super::*;

    #[test]
    fn select_omits_unset_clauses() {
        let params = serde_json::to_value(Select::new(["id", "name"], "tv_channel")).unwrap();

        assert_eq!(params, json!({"data": ["id", "name"], "from": "tv_channel"}));
    }

    #[test]
    fn select_with_every_clause() {
        let query = Select::new("id", "media")
            .filter(cond::eq("status", "active"))
            .order_by(["name", "id"])
            .limit(10)
            .offset(20)
            .group_by("name");

        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({
                "data": "id",
                "from": "media",
                "where": {"eq": ["status", "active"]},
                "order_by": ["name", "id"],
                "limit": 10,
                "offset": 20,
                "group_by": "name"
            })
        );
    }

    #[test]
    fn select_from_join_list() {
        let joins = vec![
            json!("subscriber"),
            json!({"left_join": ["subscriber_package", {"eq": ["subscriber.id", "subscriber_package.subscriber_id"]}]}),
        ];
        let params = serde_json::to_value(Select::new("id", joins.clone())).unwrap();

        assert_eq!(params["from"], json!(joins));
    }

    #[test]
    fn aliased_projection() {
        let fields = Fields::Many(vec![
            Field::Name("id".to_owned()),
            Field::Expr(json!({"as": ["username", "login"]})),
        ]);
        let params = serde_json::to_value(Select::new(fields, "subscriber")).unwrap();

        assert_eq!(params["data"], json!(["id", {"as": ["username", "login"]}]));
    }

    #[test]
    fn insert_shape() {
        let query = Insert::new(
            "subscriber",
            ["username", "password"],
            vec![vec![json!("user1"), json!("pass1")]],
        )
        .returning("id");

        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({
                "into": "subscriber",
                "columns": ["username", "password"],
                "values": [["user1", "pass1"]],
                "returning": "id"
            })
        );
    }

    #[test]
    fn update_shape() {
        let query = Update::new("subscriber")
            .set("disabled", true)
            .filter(cond::eq("id", 42));

        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({
                "table": "subscriber",
                "set": {"disabled": true},
                "where": {"eq": ["id", 42]}
            })
        );
    }

    #[test]
    fn delete_shape() {
        let query = Delete::new("subscriber_package").filter(cond::eq("subscriber_id", 7));

        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({
                "from": "subscriber_package",
                "where": {"eq": ["subscriber_id", 7]}
            })
        );
    }

    #[test]
    fn upsert_shape() {
        let query = Upsert::new(
            "subscriber",
            ["username", "password"],
            vec![vec![json!("user1"), json!("pass1")]],
            ["username"],
        )
        .set("password", json!({"excluded": "password"}))
        .returning(["id"]);

        assert_eq!(
            serde_json::to_value(query).unwrap(),
            json!({
                "into": "subscriber",
                "columns": ["username", "password"],
                "values": [["user1", "pass1"]],
                "on_conflict": {
                    "columns": ["username"],
                    "do": "update",
                    "set": {"password": {"excluded": "password"}}
                },
                "returning": ["id"]
            })
        );
    }

    #[test]
    fn subquery_fragment_shape() {
        let sub = Subquery::new("id", "subscriber").filter(cond::eq("username", "test"));

        assert_eq!(
            Value::from(sub),
            json!({
                "select": {
                    "data": "id",
                    "from": "subscriber",
                    "where": {"eq": ["username", "test"]}
                }
            })
        );
    }

    #[test]
    fn subquery_nests_inside_in() {
        let sub = Subquery::new("id", "subscriber").filter(cond::eq("username", "test"));
        let condition = cond::in_("subscriber_id", sub);

        assert_eq!(
            condition.into_value(),
            json!({
                "in": [
                    "subscriber_id",
                    {"select": {"data": "id", "from": "subscriber", "where": {"eq": ["username", "test"]}}}
                ]
            })
        );
    }
}
