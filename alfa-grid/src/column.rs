//! Column definitions and their type-specific configuration.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::Row;

// =============================================================================
// Column type and alignment
// =============================================================================

/// Display type of a column. Drives cell formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Raw value as text.
    #[default]
    #[serde(alias = "texto")]
    Text,
    /// Locale formatted number.
    #[serde(alias = "numero")]
    Number,
    /// `DD/MM/YYYY` date.
    #[serde(alias = "fecha")]
    Date,
    /// Label and color looked up in a status map.
    #[serde(alias = "estado")]
    Status,
    /// Row action buttons.
    #[serde(alias = "acciones")]
    Actions,
    /// Row selection checkbox.
    Checkbox,
    /// Icon looked up in an icon map.
    #[serde(alias = "icono")]
    Icon,
}

/// Horizontal alignment of a column's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    #[serde(alias = "izquierda")]
    Left,
    #[serde(alias = "centro")]
    Center,
    #[serde(alias = "derecha")]
    Right,
}

// =============================================================================
// Type-specific configuration
// =============================================================================

/// Badge color of a status cell.
///
/// Serialized with the console's color names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatusColor {
    #[serde(rename = "verde", alias = "green")]
    Green,
    #[serde(rename = "azul", alias = "blue")]
    Blue,
    #[serde(rename = "amarillo", alias = "yellow")]
    Yellow,
    #[serde(rename = "rojo", alias = "red")]
    Red,
    #[default]
    #[serde(rename = "gris", alias = "gray")]
    Gray,
}

impl StatusColor {
    /// Returns the serialized color name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusColor::Green => "verde",
            StatusColor::Blue => "azul",
            StatusColor::Yellow => "amarillo",
            StatusColor::Red => "rojo",
            StatusColor::Gray => "gris",
        }
    }
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display label and color for one status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStyle {
    pub label: String,
    pub color: StatusColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl StatusStyle {
    pub fn new(label: impl Into<String>, color: StatusColor) -> Self {
        Self {
            label: label.into(),
            color,
            icon: None,
        }
    }

    /// Set the icon shown next to the label.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Number formatting options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberFormat {
    /// Exact number of fraction digits.
    #[serde(default)]
    pub decimals: Option<u32>,
    /// Render as currency (fixed `US$`).
    #[serde(default)]
    pub currency: bool,
    /// Always group thousands.
    #[serde(default)]
    pub thousands_separator: bool,
}

/// Button color of a row action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionColor {
    #[default]
    #[serde(alias = "primario")]
    Primary,
    #[serde(alias = "secundario")]
    Secondary,
    #[serde(alias = "exito")]
    Success,
    #[serde(alias = "advertencia")]
    Warning,
    Error,
}

/// Predicate over a row, used to disable individual actions.
#[derive(Clone)]
pub struct RowPredicate(Arc<dyn Fn(&Row) -> bool + Send + Sync>);

impl RowPredicate {
    pub fn new(f: impl Fn(&Row) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn test(&self, row: &Row) -> bool {
        (self.0)(row)
    }
}

impl fmt::Debug for RowPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowPredicate(..)")
    }
}

/// A button shown in an actions column.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableAction {
    /// Identifier emitted with the row action event.
    pub id: String,
    pub label: String,
    /// Icon markup.
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: ActionColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    /// Disables the action for rows matching the predicate.
    #[serde(skip)]
    pub disabled_when: Option<RowPredicate>,
}

impl TableAction {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: String::new(),
            color: ActionColor::default(),
            tooltip: None,
            disabled_when: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn color(mut self, color: ActionColor) -> Self {
        self.color = color;
        self
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Disable this action for rows where `predicate` returns true.
    pub fn disabled_when(mut self, predicate: impl Fn(&Row) -> bool + Send + Sync + 'static) -> Self {
        self.disabled_when = Some(RowPredicate::new(predicate));
        self
    }
}

/// Icon lookup for icon columns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconConfig {
    /// Field that selects the icon. Defaults to the column key.
    #[serde(default)]
    pub field: Option<String>,
    /// Icon markup by field value.
    #[serde(default)]
    pub icons: HashMap<String, String>,
    #[serde(default)]
    pub default_color: Option<String>,
}

impl IconConfig {
    /// Resolve the icon for a row. Falls back to the raw field text when the
    /// value has no mapping, and to `None` when the field is empty.
    pub fn icon_for<'a>(&'a self, row: &'a Row, column_key: &str) -> Option<std::borrow::Cow<'a, str>> {
        let field = self.field.as_deref().unwrap_or(column_key);
        let value = row.value(field);
        if value.is_null() {
            return None;
        }
        let key = value.display();
        match self.icons.get(&key) {
            Some(icon) => Some(std::borrow::Cow::Borrowed(icon.as_str())),
            None if key.is_empty() => None,
            None => Some(std::borrow::Cow::Owned(key)),
        }
    }
}

/// Type-specific column configuration.
///
/// Only the part matching the column's [`ColumnType`] is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeConfig {
    /// Status code to label/color, for `Status` columns.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub statuses: HashMap<String, StatusStyle>,
    /// For `Number` columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_format: Option<NumberFormat>,
    /// chrono pattern for `Date` columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
    /// Buttons for `Actions` columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<TableAction>,
    /// For `Icon` columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconConfig>,
}

// =============================================================================
// Column
// =============================================================================

/// A table column definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Field key in the row. Unique within a table.
    pub key: String,
    /// Header text.
    pub title: String,
    #[serde(rename = "type", default)]
    pub column_type: ColumnType,
    /// CSS-like width hint, e.g. `"120px"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default)]
    pub sortable: bool,
    #[serde(default)]
    pub alignment: Alignment,
    /// Hidden columns are neither shown nor searched.
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_config: Option<TypeConfig>,
}

impl Column {
    /// Create a new column with the given key, header and type.
    pub fn new(key: impl Into<String>, title: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            column_type,
            width: None,
            sortable: false,
            alignment: Alignment::default(),
            hidden: false,
            type_config: None,
        }
    }

    /// Create a text column.
    pub fn text(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(key, title, ColumnType::Text)
    }

    /// Make this column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Set the content alignment.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the width hint.
    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Hide this column.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set the status map for a status column.
    pub fn statuses<K: Into<String>>(mut self, statuses: impl IntoIterator<Item = (K, StatusStyle)>) -> Self {
        self.config_mut().statuses = statuses.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// Set the number format for a number column.
    pub fn number_format(mut self, format: NumberFormat) -> Self {
        self.config_mut().number_format = Some(format);
        self
    }

    /// Set the date pattern for a date column.
    pub fn date_format(mut self, pattern: impl Into<String>) -> Self {
        self.config_mut().date_format = Some(pattern.into());
        self
    }

    /// Add a button to an actions column.
    pub fn action(mut self, action: TableAction) -> Self {
        self.config_mut().actions.push(action);
        self
    }

    /// Set the icon lookup for an icon column.
    pub fn icon(mut self, icon: IconConfig) -> Self {
        self.config_mut().icon = Some(icon);
        self
    }

    /// Returns the declared actions (empty for non-action columns).
    pub fn actions(&self) -> &[TableAction] {
        match (&self.type_config, self.column_type) {
            (Some(config), ColumnType::Actions) => &config.actions,
            _ => &[],
        }
    }

    /// Find a declared action by id.
    pub fn find_action(&self, id: &str) -> Option<&TableAction> {
        self.actions().iter().find(|a| a.id == id)
    }

    fn config_mut(&mut self) -> &mut TypeConfig {
        self.type_config.get_or_insert_with(TypeConfig::default)
    }
}
