// Query Assembler - renders a structured QueryDescription into SQL text
//
// Assembly happens in two steps: `assemble` turns the description into an
// ordered list of `SqlClause` values, and `to_sql` renders those to text.
// A stricter deployment can keep the clause step and swap the renderer for
// a parameterized builder. Identifiers are double-quoted and literals
// single-quoted, but field names are otherwise trusted; callers must
// validate them against a known schema before executing the output.

use serde::Serialize;

use crate::api::middleware::AppError;
use crate::models::{
    ColumnRef, FilterOp, FilterSpec, FilterValue, JoinKind, QueryDescription,
};

/// One rendered-order clause of a SELECT statement.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum SqlClause {
    Select { distinct: bool, columns: Vec<String> },
    From { table: String },
    Join { join_type: JoinKind, table: String, on: String },
    Where { predicates: Vec<String> },
    GroupBy { columns: Vec<String> },
    OrderBy { columns: Vec<String> },
    Limit { rows: u64 },
}

impl SqlClause {
    fn render(&self) -> String {
        match self {
            SqlClause::Select { distinct, columns } => {
                let list = if columns.is_empty() {
                    "*".to_string()
                } else {
                    columns.join(", ")
                };
                if *distinct {
                    format!("SELECT DISTINCT {}", list)
                } else {
                    format!("SELECT {}", list)
                }
            }
            SqlClause::From { table } => format!("FROM {}", quote_ident(table)),
            SqlClause::Join {
                join_type,
                table,
                on,
            } => format!("{} JOIN {} ON {}", join_type.as_sql(), quote_ident(table), on),
            SqlClause::Where { predicates } => {
                format!("WHERE {}", predicates.join(" AND "))
            }
            SqlClause::GroupBy { columns } => format!("GROUP BY {}", columns.join(", ")),
            SqlClause::OrderBy { columns } => format!("ORDER BY {}", columns.join(", ")),
            SqlClause::Limit { rows } => format!("LIMIT {}", rows),
        }
    }
}

/// Structured result of assembly; render with [`AssembledQuery::to_sql`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssembledQuery {
    clauses: Vec<SqlClause>,
}

impl AssembledQuery {
    pub fn clauses(&self) -> &[SqlClause] {
        &self.clauses
    }

    /// Render the clauses into a single SELECT statement.
    ///
    /// Deterministic: the same clause list always yields the same text.
    pub fn to_sql(&self) -> String {
        self.clauses
            .iter()
            .map(SqlClause::render)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub struct QueryAssembler;

impl QueryAssembler {
    /// Build the clause list for a description.
    ///
    /// Fails only when no table is declared; everything else renders
    /// best-effort, even descriptions a database would reject.
    pub fn assemble(desc: &QueryDescription) -> Result<AssembledQuery, AppError> {
        if desc.tables.is_empty() {
            return Err(AppError::InvalidDescription(
                "At least one table is required".to_string(),
            ));
        }

        let mut clauses = vec![
            SqlClause::Select {
                distinct: desc.distinct,
                columns: desc.columns.iter().map(render_column).collect(),
            },
            SqlClause::From {
                table: desc.tables[0].clone(),
            },
        ];

        for join in &desc.joins {
            clauses.push(SqlClause::Join {
                join_type: join.join_type,
                table: join.right_table.clone(),
                on: format!(
                    "{} = {}",
                    qualify(&join.left_table, &join.left_column),
                    qualify(&join.right_table, &join.right_column)
                ),
            });
        }

        if !desc.filters.is_empty() {
            clauses.push(SqlClause::Where {
                predicates: desc.filters.iter().map(render_filter).collect(),
            });
        }

        if !desc.group_by.is_empty() {
            clauses.push(SqlClause::GroupBy {
                columns: desc
                    .group_by
                    .iter()
                    .map(|target| qualify(&target.table, &target.column))
                    .collect(),
            });
        }

        if !desc.order_by.is_empty() {
            clauses.push(SqlClause::OrderBy {
                columns: desc
                    .order_by
                    .iter()
                    .map(|order| {
                        format!(
                            "{} {}",
                            qualify(&order.table, &order.column),
                            order.direction.as_sql()
                        )
                    })
                    .collect(),
            });
        }

        if let Some(limit) = desc.limit {
            if limit > 0 {
                clauses.push(SqlClause::Limit { rows: limit });
            }
        }

        Ok(AssembledQuery { clauses })
    }
}

fn render_column(column: &ColumnRef) -> String {
    let qualified = qualify(&column.table, &column.column);
    match column.aggregate.as_deref().map(str::trim) {
        Some(func) if !func.is_empty() => {
            let alias = column
                .alias
                .clone()
                .unwrap_or_else(|| format!("{}_{}", func.to_lowercase(), column.column));
            format!("{}({}) AS {}", func.to_uppercase(), qualified, quote_ident(&alias))
        }
        _ => match &column.alias {
            Some(alias) => format!("{} AS {}", qualified, quote_ident(alias)),
            None => qualified,
        },
    }
}

fn render_filter(filter: &FilterSpec) -> String {
    let target = qualify(&filter.table, &filter.column);
    let op = filter.operator.as_sql();

    match filter.normalized_value() {
        FilterValue::Absent => format!("{} {}", target, op),
        FilterValue::List(items) => {
            let rendered: Vec<String> = items.iter().map(|item| quote_literal(item)).collect();
            format!("{} {} ({})", target, op, rendered.join(", "))
        }
        // BETWEEN bounds are assumed numeric or date and stay unquoted
        FilterValue::Range(min, max) => format!("{} BETWEEN {} AND {}", target, min, max),
        FilterValue::Scalar(value) => match filter.operator {
            FilterOp::Like | FilterOp::NotLike => {
                format!("{} {} {}", target, op, quote_literal(&format!("%{}%", value)))
            }
            _ if filter.unquoted_literal() => format!("{} {} {}", target, op, value),
            _ => format!("{} {} {}", target, op, quote_literal(&value)),
        },
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn qualify(table: &str, column: &str) -> String {
    format!("{}.{}", quote_ident(table), quote_ident(column))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnTarget, JoinSpec, OrderSpec, SortDirection};
    use serde_json::json;

    fn table_only(name: &str) -> QueryDescription {
        QueryDescription {
            tables: vec![name.to_string()],
            ..Default::default()
        }
    }

    fn sql(desc: &QueryDescription) -> String {
        QueryAssembler::assemble(desc).unwrap().to_sql()
    }

    #[test]
    fn test_bare_description_renders_select_star() {
        assert_eq!(sql(&table_only("t")), "SELECT * FROM \"t\"");
    }

    #[test]
    fn test_no_tables_is_rejected() {
        let err = QueryAssembler::assemble(&QueryDescription::default()).unwrap_err();
        assert!(err.to_string().contains("At least one table is required"));
    }

    #[test]
    fn test_assembly_is_deterministic() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["orders"],
            "columns": [{"table": "orders", "column": "id"}],
            "filters": [
                {"table": "orders", "column": "status", "operator": "=", "value": "paid"}
            ],
            "orderBy": [{"table": "orders", "column": "id", "direction": "desc"}],
            "limit": 5,
        }))
        .unwrap();

        assert_eq!(sql(&desc), sql(&desc.clone()));
    }

    #[test]
    fn test_filtered_limited_select() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["orders"],
            "columns": [{"table": "orders", "column": "id"}],
            "filters": [{
                "table": "orders", "column": "status",
                "operator": "=", "value": "paid", "dataType": "text",
            }],
            "limit": 10,
        }))
        .unwrap();

        assert_eq!(
            sql(&desc),
            "SELECT \"orders\".\"id\" FROM \"orders\" WHERE \"orders\".\"status\" = 'paid' LIMIT 10"
        );
    }

    #[test]
    fn test_column_alias_and_aggregate() {
        let mut desc = table_only("t");
        desc.columns = vec![
            ColumnRef {
                table: "t".to_string(),
                column: "name".to_string(),
                alias: Some("label".to_string()),
                aggregate: None,
            },
            ColumnRef {
                table: "t".to_string(),
                column: "amount".to_string(),
                alias: None,
                aggregate: Some("sum".to_string()),
            },
        ];

        assert_eq!(
            sql(&desc),
            "SELECT \"t\".\"name\" AS \"label\", SUM(\"t\".\"amount\") AS \"sum_amount\" FROM \"t\""
        );
    }

    #[test]
    fn test_distinct_rendering() {
        let mut desc = table_only("t");
        desc.distinct = true;
        assert_eq!(sql(&desc), "SELECT DISTINCT * FROM \"t\"");
    }

    #[test]
    fn test_join_rendering() {
        let mut desc = table_only("orders");
        desc.tables.push("customers".to_string());
        desc.joins = vec![JoinSpec {
            join_type: JoinKind::Left,
            right_table: "customers".to_string(),
            left_table: "orders".to_string(),
            left_column: "customer_id".to_string(),
            right_column: "id".to_string(),
        }];

        assert_eq!(
            sql(&desc),
            "SELECT * FROM \"orders\" LEFT JOIN \"customers\" ON \"orders\".\"customer_id\" = \"customers\".\"id\""
        );
    }

    #[test]
    fn test_between_filter() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["t"],
            "filters": [{
                "table": "t", "column": "c", "operator": "BETWEEN", "value": "10,20",
            }],
        }))
        .unwrap();

        assert_eq!(
            sql(&desc),
            "SELECT * FROM \"t\" WHERE \"t\".\"c\" BETWEEN 10 AND 20"
        );
    }

    #[test]
    fn test_in_filter_from_array() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["t"],
            "filters": [{
                "table": "t", "column": "c", "operator": "IN", "value": ["a", "b"],
            }],
        }))
        .unwrap();

        assert_eq!(sql(&desc), "SELECT * FROM \"t\" WHERE \"t\".\"c\" IN ('a', 'b')");
    }

    #[test]
    fn test_not_in_filter_from_comma_string() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["t"],
            "filters": [{
                "table": "t", "column": "c", "operator": "NOT IN", "value": "x, y",
            }],
        }))
        .unwrap();

        assert_eq!(
            sql(&desc),
            "SELECT * FROM \"t\" WHERE \"t\".\"c\" NOT IN ('x', 'y')"
        );
    }

    #[test]
    fn test_like_wraps_wildcards() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["t"],
            "filters": [{
                "table": "t", "column": "c", "operator": "LIKE", "value": "smith",
            }],
        }))
        .unwrap();

        assert_eq!(sql(&desc), "SELECT * FROM \"t\" WHERE \"t\".\"c\" LIKE '%smith%'");
    }

    #[test]
    fn test_null_checks_render_without_value() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["t"],
            "filters": [
                {"table": "t", "column": "a", "operator": "IS NULL"},
                {"table": "t", "column": "b", "operator": "IS NOT NULL"},
            ],
        }))
        .unwrap();

        assert_eq!(
            sql(&desc),
            "SELECT * FROM \"t\" WHERE \"t\".\"a\" IS NULL AND \"t\".\"b\" IS NOT NULL"
        );
    }

    #[test]
    fn test_numeric_filter_unquoted() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["t"],
            "filters": [{
                "table": "t", "column": "n", "operator": ">", "value": 5, "dataType": "number",
            }],
        }))
        .unwrap();

        assert_eq!(sql(&desc), "SELECT * FROM \"t\" WHERE \"t\".\"n\" > 5");
    }

    #[test]
    fn test_group_and_order_clauses() {
        let mut desc = table_only("t");
        desc.group_by = vec![ColumnTarget {
            table: "t".to_string(),
            column: "category".to_string(),
        }];
        desc.order_by = vec![
            OrderSpec {
                table: "t".to_string(),
                column: "category".to_string(),
                direction: SortDirection::Asc,
            },
            OrderSpec {
                table: "t".to_string(),
                column: "total".to_string(),
                direction: SortDirection::Desc,
            },
        ];

        assert_eq!(
            sql(&desc),
            "SELECT * FROM \"t\" GROUP BY \"t\".\"category\" ORDER BY \"t\".\"category\" ASC, \"t\".\"total\" DESC"
        );
    }

    #[test]
    fn test_zero_limit_is_omitted() {
        let mut desc = table_only("t");
        desc.limit = Some(0);
        assert_eq!(sql(&desc), "SELECT * FROM \"t\"");
    }

    #[test]
    fn test_quotes_in_literals_are_doubled() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["t"],
            "filters": [{
                "table": "t", "column": "name", "operator": "=", "value": "O'Brien",
            }],
        }))
        .unwrap();

        assert_eq!(
            sql(&desc),
            "SELECT * FROM \"t\" WHERE \"t\".\"name\" = 'O''Brien'"
        );
    }

    #[test]
    fn test_clause_order_is_fixed() {
        let desc: QueryDescription = serde_json::from_value(json!({
            "tables": ["a", "b"],
            "columns": [{"table": "a", "column": "x"}],
            "joins": [{
                "joinType": "INNER", "rightTable": "b",
                "leftTable": "a", "leftColumn": "id", "rightColumn": "a_id",
            }],
            "filters": [{"table": "a", "column": "x", "operator": "IS NOT NULL"}],
            "groupBy": [{"table": "a", "column": "x"}],
            "orderBy": [{"table": "a", "column": "x"}],
            "limit": 3,
        }))
        .unwrap();

        assert_eq!(
            sql(&desc),
            "SELECT \"a\".\"x\" FROM \"a\" \
             INNER JOIN \"b\" ON \"a\".\"id\" = \"b\".\"a_id\" \
             WHERE \"a\".\"x\" IS NOT NULL \
             GROUP BY \"a\".\"x\" \
             ORDER BY \"a\".\"x\" ASC \
             LIMIT 3"
        );
    }
}
