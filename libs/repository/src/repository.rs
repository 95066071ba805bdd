use api_response::{ApiResponse, ProblemDetails, SuccessDetails};
use sqlx::postgres::{PgArguments, PgPool};
use sqlx::query::Query;
use sqlx::Postgres;
use tracing::{error, warn};

use crate::query_parser::{QueryParser, SqlQuery};

/// Executes a parser's queries against a shared pool and folds every outcome
/// into an `ApiResponse`. Holds no per-call state; clone freely.
#[derive(Clone)]
pub struct Repository<P> {
    parser: P,
    pool: PgPool,
}

impl<P: QueryParser> Repository<P> {
    pub fn new(parser: P, pool: PgPool) -> Self {
        Self { parser, pool }
    }

    pub async fn insert(&self, entity: &P::Entity) -> ApiResponse {
        let query = self.parser.insert_query(entity);
        match build(&query).execute(&self.pool).await {
            Ok(_) => SuccessDetails::new(
                201,
                "Created",
                "Resource created successfully",
                "repository.insert",
                "",
            )
            .into(),
            Err(e) => problem(&e, "repository.insert"),
        }
    }

    /// 404 when the id matched no row.
    pub async fn update(&self, id: &crate::SqlValue, entity: &P::Entity) -> ApiResponse {
        let query = self.parser.update_query(id, entity);
        match build(&query).execute(&self.pool).await {
            Ok(result) if result.rows_affected() == 0 => {
                ProblemDetails::not_found("Resource not found", "repository.update").into()
            }
            Ok(_) => SuccessDetails::new(
                200,
                "Updated",
                "Resource updated successfully",
                "repository.update",
                "",
            )
            .into(),
            Err(e) => problem(&e, "repository.update"),
        }
    }

    pub async fn delete(&self, id: &crate::SqlValue) -> ApiResponse {
        let query = self.parser.delete_query(id);
        match build(&query).execute(&self.pool).await {
            Ok(result) if result.rows_affected() == 0 => {
                ProblemDetails::not_found("Resource not found", "repository.delete").into()
            }
            Ok(_) => SuccessDetails::new(
                200,
                "Deleted",
                "Resource deleted successfully",
                "repository.delete",
                "",
            )
            .into(),
            Err(e) => problem(&e, "repository.delete"),
        }
    }

    /// Success payload is the entity serialized as a single JSON document.
    pub async fn get(&self, id: &crate::SqlValue) -> ApiResponse {
        let query = self.parser.get_query(id);
        let row = match build(&query).fetch_optional(&self.pool).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                return ProblemDetails::not_found("Resource not found", "repository.get").into()
            }
            Err(e) => return problem(&e, "repository.get"),
        };

        match self.parser.scan_row(&row).map(|entity| serde_json::to_string(&entity)) {
            Ok(Ok(data)) => {
                SuccessDetails::new(200, "Fetched", "Resource fetched successfully", "repository.get", data)
                    .into()
            }
            Ok(Err(e)) => {
                error!(error = %e, "failed to serialize entity");
                ProblemDetails::internal_server_error(e.to_string(), "repository.get").into()
            }
            Err(e) => problem(&e, "repository.get"),
        }
    }

    /// Success payload is a JSON array; an empty table is a success with `[]`.
    pub async fn get_all(&self) -> ApiResponse {
        let query = self.parser.get_all_query();
        let rows = match build(&query).fetch_all(&self.pool).await {
            Ok(rows) => rows,
            Err(e) => return problem(&e, "repository.get_all"),
        };

        let entities: Result<Vec<P::Entity>, sqlx::Error> =
            rows.iter().map(|row| self.parser.scan_row(row)).collect();

        match entities.map(|list| serde_json::to_string(&list)) {
            Ok(Ok(data)) => SuccessDetails::new(
                200,
                "Fetched All",
                "Resources fetched successfully",
                "repository.get_all",
                data,
            )
            .into(),
            Ok(Err(e)) => {
                error!(error = %e, "failed to serialize entities");
                ProblemDetails::internal_server_error(e.to_string(), "repository.get_all").into()
            }
            Err(e) => problem(&e, "repository.get_all"),
        }
    }
}

fn build<'q>(query: &'q SqlQuery) -> Query<'q, Postgres, PgArguments> {
    let mut q = sqlx::query(&query.sql);
    for arg in &query.args {
        q = arg.bind_to(q);
    }
    q
}

/// SQLSTATE class to transport status. Codes, never message text.
fn status_for_sqlstate(code: &str) -> u16 {
    match code {
        // unique_violation
        "23505" => 409,
        // not_null_violation, check_violation, syntax_error
        "23502" | "23514" | "42601" => 400,
        // data exceptions (bad casts, overflow, malformed literals)
        _ if code.starts_with("22") => 400,
        _ => 500,
    }
}

fn problem(e: &sqlx::Error, instance: &str) -> ApiResponse {
    let status = match e {
        sqlx::Error::Database(db) => db
            .code()
            .as_deref()
            .map(status_for_sqlstate)
            .unwrap_or(500),
        _ => 500,
    };

    if status == 500 {
        error!(error = %e, instance, "database operation failed");
    } else {
        warn!(error = %e, instance, status, "database operation rejected");
    }

    ProblemDetails::from_status(status, e.to_string(), instance).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_is_conflict() {
        assert_eq!(status_for_sqlstate("23505"), 409);
    }

    #[test]
    fn constraint_and_syntax_errors_are_bad_requests() {
        assert_eq!(status_for_sqlstate("23502"), 400);
        assert_eq!(status_for_sqlstate("23514"), 400);
        assert_eq!(status_for_sqlstate("42601"), 400);
    }

    #[test]
    fn data_exception_class_is_bad_request() {
        assert_eq!(status_for_sqlstate("22001"), 400); // string too long
        assert_eq!(status_for_sqlstate("22P02"), 400); // invalid text representation
        assert_eq!(status_for_sqlstate("22003"), 400); // numeric out of range
    }

    #[test]
    fn everything_else_is_internal() {
        assert_eq!(status_for_sqlstate("23503"), 500); // foreign key: not client-correctable
        assert_eq!(status_for_sqlstate("40001"), 500);
        assert_eq!(status_for_sqlstate("57014"), 500);
    }

    #[test]
    fn non_database_errors_are_internal() {
        let resp = problem(&sqlx::Error::RowNotFound, "repository.get");
        assert_eq!(resp.status(), 500);
        assert!(!resp.is_success());
    }
}
