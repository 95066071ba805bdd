use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::Postgres;
use uuid::Uuid;

/// An owned bind argument. Parsers build these; the repository binds them
/// positionally in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    /// Nullable text column.
    OptText(Option<String>),
    Int(i64),
    Float(f64),
    Bool(bool),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    pub(crate) fn bind_to<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Query<'q, Postgres, PgArguments> {
        match self {
            Self::Text(v) => query.bind(v.clone()),
            Self::OptText(v) => query.bind(v.clone()),
            Self::Int(v) => query.bind(*v),
            Self::Float(v) => query.bind(*v),
            Self::Bool(v) => query.bind(*v),
            Self::Uuid(v) => query.bind(*v),
            Self::Timestamp(v) => query.bind(*v),
        }
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<Uuid> for SqlValue {
    fn from(v: Uuid) -> Self {
        Self::Uuid(v)
    }
}

/// SQL text plus its positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub args: Vec<SqlValue>,
}

impl SqlQuery {
    pub fn new(sql: impl Into<String>, args: Vec<SqlValue>) -> Self {
        Self { sql: sql.into(), args }
    }
}

/// The per-entity half of the persistence layer.
///
/// Implementations own every piece of SQL and the row-to-entity mapping; the
/// repository never looks inside an entity. `scan_row` failures surface as
/// internal errors on the repository side.
pub trait QueryParser: Send + Sync {
    type Entity: Serialize + Send + Sync;

    fn insert_query(&self, entity: &Self::Entity) -> SqlQuery;
    fn update_query(&self, id: &SqlValue, entity: &Self::Entity) -> SqlQuery;
    fn delete_query(&self, id: &SqlValue) -> SqlQuery;
    fn get_query(&self, id: &SqlValue) -> SqlQuery;
    fn get_all_query(&self) -> SqlQuery;

    fn scan_row(&self, row: &PgRow) -> Result<Self::Entity, sqlx::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[derive(Debug, PartialEq, Serialize)]
    struct User {
        id: Uuid,
        name: String,
        active: bool,
    }

    struct UserParser;

    impl QueryParser for UserParser {
        type Entity = User;

        fn insert_query(&self, e: &User) -> SqlQuery {
            SqlQuery::new(
                "INSERT INTO users (id, name, active) VALUES ($1, $2, $3)",
                vec![e.id.into(), e.name.clone().into(), e.active.into()],
            )
        }

        fn update_query(&self, id: &SqlValue, e: &User) -> SqlQuery {
            SqlQuery::new(
                "UPDATE users SET name = $2, active = $3 WHERE id = $1",
                vec![id.clone(), e.name.clone().into(), e.active.into()],
            )
        }

        fn delete_query(&self, id: &SqlValue) -> SqlQuery {
            SqlQuery::new("DELETE FROM users WHERE id = $1", vec![id.clone()])
        }

        fn get_query(&self, id: &SqlValue) -> SqlQuery {
            SqlQuery::new(
                "SELECT id, name, active FROM users WHERE id = $1",
                vec![id.clone()],
            )
        }

        fn get_all_query(&self) -> SqlQuery {
            SqlQuery::new("SELECT id, name, active FROM users", vec![])
        }

        fn scan_row(&self, row: &PgRow) -> Result<User, sqlx::Error> {
            Ok(User {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                active: row.try_get("active")?,
            })
        }
    }

    #[test]
    fn parser_owns_sql_and_argument_order() {
        let parser = UserParser;
        let user = User { id: Uuid::nil(), name: "Ana".into(), active: true };

        let insert = parser.insert_query(&user);
        assert!(insert.sql.starts_with("INSERT INTO users"));
        assert_eq!(insert.args[0], SqlValue::Uuid(Uuid::nil()));
        assert_eq!(insert.args[1], SqlValue::Text("Ana".into()));
        assert_eq!(insert.args[2], SqlValue::Bool(true));

        let id = SqlValue::Uuid(Uuid::nil());
        assert_eq!(parser.delete_query(&id).args, vec![id.clone()]);
        assert!(parser.get_all_query().args.is_empty());
    }

    #[test]
    fn from_impls_pick_the_right_variant() {
        assert_eq!(SqlValue::from("ana"), SqlValue::Text("ana".to_string()));
        assert_eq!(SqlValue::from(7_i64), SqlValue::Int(7));
        assert_eq!(SqlValue::from(true), SqlValue::Bool(true));
    }

    #[test]
    fn sql_query_keeps_argument_order() {
        let q = SqlQuery::new(
            "INSERT INTO users (name, active) VALUES ($1, $2)",
            vec!["ana".into(), true.into()],
        );
        assert_eq!(q.args.len(), 2);
        assert_eq!(q.args[0], SqlValue::Text("ana".to_string()));
        assert_eq!(q.args[1], SqlValue::Bool(true));
    }
}
