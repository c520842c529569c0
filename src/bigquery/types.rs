//! Shared types for the BigQuery boundary
//!
//! Defines table identifiers, index metadata, and the errors surfaced by
//! engine clients.

use serde::{Deserialize, Serialize};

/// Fully qualified reference to a table within a dataset.
///
/// Identifier components are validated at construction, so every statement
/// built from a `TableRef` goes through one trusted formatting path instead
/// of ad hoc string interpolation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    project: String,
    dataset: String,
    table: String,
}

impl TableRef {
    /// Create a table reference, validating each identifier component.
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<Self, BigQueryError> {
        let project = project.into();
        let dataset = dataset.into();
        let table = table.into();
        validate_identifier(&project)?;
        validate_identifier(&dataset)?;
        validate_identifier(&table)?;
        Ok(Self {
            project,
            dataset,
            table,
        })
    }

    /// Project component.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Dataset component.
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Table component.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Render the backquoted `` `project.dataset.table` `` form used in
    /// generated statements.
    pub fn qualified(&self) -> String {
        format!("`{}.{}.{}`", self.project, self.dataset, self.table)
    }

    /// Sibling table in the same project and dataset.
    pub fn sibling(&self, table: impl Into<String>) -> Result<Self, BigQueryError> {
        Self::new(self.project.clone(), self.dataset.clone(), table)
    }
}

impl std::fmt::Display for TableRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.project, self.dataset, self.table)
    }
}

/// Check that an identifier is safe to embed in a generated statement.
///
/// Letters, digits, underscores, and dashes only. Rejects empty strings and
/// anything that could smuggle backquotes, dots, or quotes into SQL built
/// from externally supplied names.
pub fn validate_identifier(value: &str) -> Result<(), BigQueryError> {
    if value.is_empty() {
        return Err(BigQueryError::InvalidIdentifier(value.to_string()));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(BigQueryError::InvalidIdentifier(value.to_string()));
    }
    Ok(())
}

/// Table metadata slice relevant to the benchmark: the search indexes the
/// engine reports for the table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Search indexes attached to the table, if any.
    #[serde(default)]
    pub search_indexes: Vec<SearchIndex>,
}

impl TableMetadata {
    /// True when at least one search index is present and finished building.
    pub fn has_built_index(&self) -> bool {
        self.search_indexes.iter().any(SearchIndex::is_built)
    }
}

/// A single search index as reported by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndex {
    /// Index name.
    pub name: String,
    /// Engine-reported status (e.g. `ACTIVE` once the build completes).
    pub status: String,
}

impl SearchIndex {
    /// Whether the index has finished building.
    pub fn is_built(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Errors from BigQuery client operations
#[derive(Debug, thiserror::Error)]
pub enum BigQueryError {
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("failed to launch engine tool: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("engine tool exited with status {status}: {stderr}")]
    Tool { status: i32, stderr: String },

    #[error("malformed engine tool output: {0}")]
    Malformed(#[from] serde_json::Error),
}
