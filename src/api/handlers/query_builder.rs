use axum::Json;
use serde::Deserialize;

use crate::api::middleware::AppError;
use crate::models::QueryDescription;
use crate::services::QueryAssembler;
use crate::validation::SqlValidator;

/// Render SQL text from a structured query description
///
/// Best-effort by design: descriptions referencing undeclared tables still
/// render; only a missing FROM target is rejected. Callers execute the
/// result at their own risk unless they run it through the validate
/// endpoint (or an equivalent allow-list) first.
pub async fn generate_sql(
    Json(desc): Json<QueryDescription>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("Generating SQL for {} table(s)", desc.tables.len());

    let assembled = QueryAssembler::assemble(&desc)?;
    let sql = assembled.to_sql();

    tracing::debug!("Generated SQL: {}", sql);

    Ok(Json(serde_json::json!({
        "success": true,
        "sql": sql,
        "clauses": assembled.clauses(),
    })))
}

#[derive(Debug, Deserialize)]
pub struct ValidateSqlRequest {
    pub sql: String,
}

/// Check that a SQL string is a single SELECT statement
pub async fn validate_sql(
    Json(payload): Json<ValidateSqlRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let sql = payload.sql.trim();
    if sql.is_empty() {
        return Err(AppError::Validation("SQL query cannot be empty".to_string()));
    }

    SqlValidator::validate_select_only(sql)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "sql": sql,
    })))
}
