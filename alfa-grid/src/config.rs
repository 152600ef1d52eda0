//! Table-level configuration.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::column::Column;

/// Rows per page when the configuration does not set a usable page size.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Problems found by [`TableConfiguration::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Two columns share the same key.
    #[error("duplicate column key '{key}'")]
    DuplicateKey { key: String },

    /// Page size must be positive.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Declarative configuration of a dynamic table.
///
/// Owned by the host screen. The engine reads it on every recompute and never
/// writes to it.
///
/// # Example
///
/// ```
/// use alfa_grid::{Column, TableConfiguration};
///
/// let config = TableConfiguration::new(vec![
///     Column::text("id", "ID").sortable(),
///     Column::text("aseguradora", "Aseguradora").sortable(),
/// ])
/// .paginated(10)
/// .searchable("Buscar aseguradoras...")
/// .selectable(true);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.page_size(), 10);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfiguration {
    pub columns: Vec<Column>,
    #[serde(default)]
    pub selectable: bool,
    #[serde(default)]
    pub multi_select: bool,
    #[serde(default)]
    pub paginated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_placeholder: Option<String>,
    /// Show the "showing x to y of z" line.
    #[serde(default)]
    pub show_info: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<String>,
    #[serde(default)]
    pub responsive: bool,
}

impl TableConfiguration {
    /// Create a configuration with the given columns and every option off.
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// Enable pagination with the given page size.
    pub fn paginated(mut self, page_size: usize) -> Self {
        self.paginated = true;
        self.page_size = Some(page_size);
        self
    }

    /// Enable the search box.
    pub fn searchable(mut self, placeholder: impl Into<String>) -> Self {
        self.searchable = true;
        self.search_placeholder = Some(placeholder.into());
        self
    }

    /// Enable row selection.
    pub fn selectable(mut self, multi: bool) -> Self {
        self.selectable = true;
        self.multi_select = multi;
        self
    }

    /// Show the totals line.
    pub fn show_info(mut self) -> Self {
        self.show_info = true;
        self
    }

    /// Rows per page, falling back to [`DEFAULT_PAGE_SIZE`].
    pub fn page_size(&self) -> usize {
        match self.page_size {
            Some(size) if size > 0 => size,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    /// Columns that are displayed and searched.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.hidden)
    }

    /// Find a column by key.
    pub fn column(&self, key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Check the configuration invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == Some(0) {
            return Err(ConfigError::ZeroPageSize);
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.key.as_str()) {
                return Err(ConfigError::DuplicateKey {
                    key: column.key.clone(),
                });
            }
        }
        Ok(())
    }
}
