use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::api::middleware::AppError;

/// SELECT-only gate for SQL text.
///
/// The query builder renders whatever the description asked for; anything
/// that will actually be executed should pass through here first so that
/// only single read queries reach a database.
pub struct SqlValidator;

impl SqlValidator {
    /// Ensure `sql` parses as exactly one SELECT statement.
    pub fn validate_select_only(sql: &str) -> Result<(), AppError> {
        let dialect = PostgreSqlDialect {};
        let statements = Parser::new(&dialect)
            .try_with_sql(sql)
            .map_err(|e| AppError::InvalidSql(format!("SQL parsing error: {}", e)))?
            .parse_statements()
            .map_err(|e| AppError::InvalidSql(format!("SQL parsing error: {}", e)))?;

        match statements.as_slice() {
            [] => Err(AppError::InvalidSql("Empty SQL query".to_string())),
            [Statement::Query(_)] => Ok(()),
            [other] => Err(AppError::InvalidSql(format!(
                "Only SELECT statements are permitted, found {}",
                statement_kind(other)
            ))),
            _ => Err(AppError::InvalidSql(
                "Multiple statements are not permitted".to_string(),
            )),
        }
    }
}

fn statement_kind(stmt: &Statement) -> &'static str {
    match stmt {
        Statement::Insert { .. } => "INSERT",
        Statement::Update { .. } => "UPDATE",
        Statement::Delete { .. } => "DELETE",
        Statement::Drop { .. } => "DROP",
        Statement::CreateTable { .. } => "CREATE TABLE",
        Statement::AlterTable { .. } => "ALTER TABLE",
        _ => "a non-SELECT statement",
    }
}
