use axum::{extract::State, Json};

use crate::api::handlers::AppState;
use crate::api::middleware::AppError;
use crate::models::AnalyzeCsvRequest;
use crate::services::{CsvReader, SchemaInference};

const DEFAULT_TABLE_NAME: &str = "imported_data";

/// Analyze uploaded CSV content and suggest a table schema
pub async fn analyze_csv(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeCsvRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    tracing::info!("Analyzing uploaded CSV ({} bytes)", payload.content.len());

    if payload.content.trim().is_empty() {
        return Err(AppError::EmptyInput("CSV file is empty".to_string()));
    }

    let delimiter = match payload.delimiter {
        Some(c) if c.is_ascii() => c as u8,
        Some(c) => {
            return Err(AppError::Validation(format!("Unsupported delimiter: {}", c)));
        }
        None => b',',
    };

    let records = CsvReader::with_delimiter(delimiter).read_str(&payload.content)?;

    let table_name = payload
        .table_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(DEFAULT_TABLE_NAME);

    let inference = SchemaInference::with_limits(
        state.config.analyzer.sample_limit,
        state.config.analyzer.sample_values,
    );
    let analysis = inference.analyze_table(table_name, &records)?;

    tracing::info!(
        "Analyzed {} rows into {} columns",
        analysis.row_count,
        analysis.columns.len()
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "analysis": analysis,
    })))
}
