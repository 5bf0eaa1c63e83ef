//! Schema value types supplied by the introspection layer.
//!
//! Tables never reference each other directly; cross-table links exist only
//! as [`Relationship`] records resolved by name at layout time, so renaming
//! or reordering tables cannot invalidate a relationship (a dangling name is
//! a handled state, not an error).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("duplicate column `{column}` in table `{table}`")]
    DuplicateColumn { table: String, column: String },
    #[error("primary key column `{column}` does not exist in table `{table}`")]
    UnknownKeyColumn { table: String, column: String },
}

/// A single table column. Key flags are derived by the owning [`Table`],
/// never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Dialect-specific type text, e.g. `VARCHAR(255)`.
    pub data_type: String,
    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
        }
    }
}

/// One foreign-key descriptor on the owning table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
    pub constraint_name: String,
}

/// A table with its ordered columns and key metadata. Column order is
/// significant: it defines the vertical row position in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Unique key used for all lookups.
    pub name: String,
    /// Rendering label, possibly schema-qualified. Falls back to `name`.
    #[serde(default)]
    pub display_name: Option<String>,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub primary_keys: HashSet<String>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        primary_keys: impl IntoIterator<Item = String>,
        foreign_keys: Vec<ForeignKey>,
    ) -> Result<Self, SchemaError> {
        let table = Self {
            name: name.into(),
            display_name: None,
            columns,
            primary_keys: primary_keys.into_iter().collect(),
            foreign_keys,
        };
        table.validate()?;
        Ok(table)
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Check structural invariants: unique column names, key columns exist.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
        for key in &self.primary_keys {
            if !seen.contains(key.as_str()) {
                return Err(SchemaError::UnknownKeyColumn {
                    table: self.name.clone(),
                    column: key.clone(),
                });
            }
        }
        Ok(())
    }

    /// Label used for rendering.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }

    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_keys.contains(column)
    }

    pub fn is_foreign_key(&self, column: &str) -> bool {
        self.foreign_keys.iter().any(|fk| fk.column == column)
    }

    /// Arity heuristic: an FK column that is also part of the primary key
    /// marks a one-to-one relationship. Cosmetic only; composite keys are
    /// not analyzed further.
    pub fn relation_kind(&self, fk_column: &str) -> RelationKind {
        if self.is_primary_key(fk_column) {
            RelationKind::OneToOne
        } else {
            RelationKind::ManyToOne
        }
    }
}

/// A relationship between two columns, by name on both ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    pub constraint_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    OneToOne,
    ManyToOne,
}
