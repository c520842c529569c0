//! Statement builders for the benchmark's DDL and query steps
//!
//! All generated SQL goes through [`TableRef::qualified`] so identifier
//! formatting happens in exactly one place.

use super::types::{validate_identifier, BigQueryError, TableRef};

/// Materialize `dst` as a full copy of `src`.
pub fn create_table_as_select(dst: &TableRef, src: &TableRef) -> String {
    format!(
        "CREATE TABLE {} AS SELECT * FROM {}",
        dst.qualified(),
        src.qualified()
    )
}

/// Add a search index over all columns of `table`.
pub fn add_search_index(table: &TableRef, index_id: &str) -> Result<String, BigQueryError> {
    validate_identifier(index_id)?;
    Ok(format!(
        "ALTER TABLE {} ADD SEARCH INDEX `{}` (ALL COLUMNS)",
        table.qualified(),
        index_id
    ))
}

/// Render a query template against a resolved table reference.
///
/// Supported placeholders: `{project}`, `{dataset}`, `{table}`.
pub fn render_query(template: &str, table: &TableRef) -> String {
    template
        .replace("{project}", table.project())
        .replace("{dataset}", table.dataset())
        .replace("{table}", table.table())
}
