//! Events emitted by the table to its host.
//!
//! The table pushes events onto a queue as interactions happen; the host
//! drains the queue after each interaction.

use serde::Serialize;

use crate::Row;
use crate::sort::SortDirection;

/// An action button was clicked on a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowActionEvent {
    /// Action id.
    pub action: String,
    pub row: Row,
    /// Index of the row in the current page's view.
    pub index: usize,
}

/// The row selection changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionChangedEvent {
    pub selected_rows: Vec<Row>,
    pub selected_indices: Vec<usize>,
}

/// A sort header was clicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortChangedEvent {
    pub column: String,
    /// `None` when the column went back to unsorted.
    pub direction: Option<SortDirection>,
}

/// An event to be dispatched to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TableEvent {
    RowAction(RowActionEvent),
    SelectionChanged(SelectionChangedEvent),
    SortChanged(SortChangedEvent),
}

impl TableEvent {
    /// Short name of the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TableEvent::RowAction(_) => "rowAction",
            TableEvent::SelectionChanged(_) => "selectionChanged",
            TableEvent::SortChanged(_) => "sortChanged",
        }
    }
}

impl From<RowActionEvent> for TableEvent {
    fn from(event: RowActionEvent) -> Self {
        TableEvent::RowAction(event)
    }
}

impl From<SelectionChangedEvent> for TableEvent {
    fn from(event: SelectionChangedEvent) -> Self {
        TableEvent::SelectionChanged(event)
    }
}

impl From<SortChangedEvent> for TableEvent {
    fn from(event: SortChangedEvent) -> Self {
        TableEvent::SortChanged(event)
    }
}
