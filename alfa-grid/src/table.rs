//! The dynamic table engine.
//!
//! [`DynamicTable`] owns the interaction state of one table instance (search
//! term, sort state, current page, selection) and recomputes its view after
//! every change. Interactions push [`TableEvent`]s onto a queue which the host
//! drains with [`DynamicTable::drain_events`].

use std::collections::VecDeque;

use crate::Row;
use crate::Value;
use crate::actions;
use crate::column::Column;
use crate::column::TableAction;
use crate::config::TableConfiguration;
use crate::events::SelectionChangedEvent;
use crate::events::SortChangedEvent;
use crate::events::TableEvent;
use crate::format::CellDisplay;
use crate::format::format_cell;
use crate::selection::SelectionTracker;
use crate::sort::SortState;
use crate::view::PageInfo;
use crate::view::View;
use crate::view::compute_view;

/// Message shown when the view has no rows.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No hay datos disponibles";

/// A filtered, sorted, paginated and selectable view over host records.
///
/// # Example
///
/// ```
/// use alfa_grid::{Column, DynamicTable, Row, TableConfiguration, TableEvent};
///
/// let config = TableConfiguration::new(vec![Column::text("nombre", "Nombre").sortable()]);
/// let mut table = DynamicTable::new(config);
/// table.set_records(vec![
///     Row::new().set("nombre", "Gaspar Arhanes"),
///     Row::new().set("nombre", "Dai Jiang"),
/// ]);
///
/// table.search("gaspar");
/// assert_eq!(table.view_rows().len(), 1);
///
/// assert!(table.sort_by("nombre"));
/// let events = table.drain_events();
/// assert!(matches!(events.as_slice(), [TableEvent::SortChanged(_)]));
/// ```
#[derive(Debug)]
pub struct DynamicTable {
    records: Vec<Row>,
    config: TableConfiguration,
    loading: bool,
    busy_row_id: Option<Value>,
    empty_message: String,

    search_term: String,
    sort: SortState,
    current_page: usize,
    selection: SelectionTracker,

    view: View,
    events: VecDeque<TableEvent>,
}

impl DynamicTable {
    /// Create a table with no records.
    pub fn new(config: TableConfiguration) -> Self {
        check_configuration(&config);
        let mut table = Self {
            records: Vec::new(),
            config,
            loading: false,
            busy_row_id: None,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            search_term: String::new(),
            sort: SortState::none(),
            current_page: 1,
            selection: SelectionTracker::new(),
            view: View::default(),
            events: VecDeque::new(),
        };
        table.recompute();
        table
    }

    /// Create a table over `records`.
    pub fn with_records(config: TableConfiguration, records: Vec<Row>) -> Self {
        let mut table = Self::new(config);
        table.set_records(records);
        table
    }

    // =========================================================================
    // Host inputs
    // =========================================================================

    /// Replace the source records.
    pub fn set_records(&mut self, records: Vec<Row>) {
        self.records = records;
        self.recompute();
    }

    /// Replace the configuration.
    pub fn set_configuration(&mut self, config: TableConfiguration) {
        check_configuration(&config);
        self.config = config;
        self.recompute();
    }

    /// Mark the table as loading. While loading, interactions are ignored and
    /// return `false`; host inputs still apply.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Mark one row (by its `id` field) as being mutated by the host.
    pub fn set_busy_row_id(&mut self, id: Option<Value>) {
        self.busy_row_id = id;
    }

    pub fn set_empty_message(&mut self, message: impl Into<String>) {
        self.empty_message = message.into();
    }

    // =========================================================================
    // Interactions
    // =========================================================================

    /// Set the search term and go back to the first page.
    pub fn search(&mut self, term: impl Into<String>) -> bool {
        if self.loading {
            return false;
        }
        self.search_term = term.into();
        self.current_page = 1;
        self.recompute();
        true
    }

    /// Handle a click on the header of `column_key`.
    ///
    /// Cycles the column through ascending, descending and unsorted, and
    /// emits a sort event. The current page is kept. Returns `false` without
    /// emitting for unknown or non-sortable columns.
    pub fn sort_by(&mut self, column_key: &str) -> bool {
        if self.loading {
            return false;
        }
        let sortable = self.config.column(column_key).is_some_and(|c| c.sortable);
        if !sortable {
            return false;
        }

        self.sort = self.sort.cycle(column_key);
        log::debug!(
            "Sort changed: column={} direction={:?}",
            column_key,
            self.sort.direction
        );
        self.push_event(SortChangedEvent {
            column: column_key.to_string(),
            direction: self.sort.direction,
        });
        self.recompute();
        true
    }

    /// Go to a 1-based page. Pages outside `1..=total_pages` are rejected.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if self.loading || page < 1 || page > self.view.total_pages {
            log::trace!("Rejected page {} of {}", page, self.view.total_pages);
            return false;
        }
        self.current_page = page;
        self.recompute();
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.current_page > 1 && self.go_to_page(self.current_page - 1)
    }

    /// Toggle selection of the row at `index` in the current page.
    ///
    /// Emits a selection event. Indices outside the page are ignored.
    pub fn toggle_row(&mut self, index: usize) -> bool {
        if self.loading || index >= self.view.rows.len() {
            return false;
        }
        self.selection.toggle(index);
        self.push_selection_event();
        true
    }

    /// Select every row of the current page, or clear the selection if all
    /// are already selected. Emits a selection event.
    pub fn toggle_all(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.selection.toggle_all(self.view.rows.len());
        self.push_selection_event();
        true
    }

    /// Emit a row action for the row at `index` in the current page.
    ///
    /// The disabled state is not enforced here; see [`Self::is_action_disabled`].
    /// Returns `false` if there is no row at `index`.
    pub fn execute_action(&mut self, action_id: &str, index: usize) -> bool {
        if self.loading {
            return false;
        }
        let Some(row) = self.view.rows.get(index) else {
            return false;
        };
        let event = actions::execute_action(action_id, row, index);
        log::debug!("Row action '{}' on row {}", action_id, index);
        self.push_event(event);
        true
    }

    /// Take all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<TableEvent> {
        self.events.drain(..).collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether `action` is disabled for the row at `index`.
    pub fn is_action_disabled(&self, action: &TableAction, index: usize) -> bool {
        match self.view.rows.get(index) {
            Some(row) => actions::is_disabled(action, row, self.busy_row_id.as_ref()),
            None => true,
        }
    }

    /// Whether `action` shows a busy indicator for the row at `index`.
    pub fn is_action_loading(&self, action: &TableAction, index: usize) -> bool {
        self.view
            .rows
            .get(index)
            .is_some_and(|row| actions::is_loading(action, row, self.busy_row_id.as_ref()))
    }

    /// Format the cell at `index` in the current page under `column_key`.
    pub fn format_cell(&self, index: usize, column_key: &str) -> Option<CellDisplay> {
        let row = self.view.rows.get(index)?;
        let column = self.config.column(column_key)?;
        Some(format_cell(row, column))
    }

    /// Rows of the current page.
    pub fn view_rows(&self) -> &[Row] {
        &self.view.rows
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn records(&self) -> &[Row] {
        &self.records
    }

    pub fn configuration(&self) -> &TableConfiguration {
        &self.config
    }

    pub fn visible_columns(&self) -> impl Iterator<Item = &Column> {
        self.config.visible_columns()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.view.total_pages
    }

    /// Rows matching the search, across all pages.
    pub fn filtered_count(&self) -> usize {
        self.view.filtered_count
    }

    pub fn page_info(&self) -> PageInfo {
        PageInfo::for_view(&self.view, &self.config, self.current_page)
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.selection.selected_indices()
    }

    pub fn selected_rows(&self) -> Vec<Row> {
        self.selection.selected_rows(&self.view.rows)
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.is_selected(index)
    }

    pub fn all_selected(&self) -> bool {
        self.selection.all_selected(self.view.rows.len())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn busy_row_id(&self) -> Option<&Value> {
        self.busy_row_id.as_ref()
    }

    /// `true` when the current page has no rows.
    pub fn is_empty(&self) -> bool {
        self.view.rows.is_empty()
    }

    pub fn empty_message(&self) -> &str {
        &self.empty_message
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn recompute(&mut self) {
        let mut view = self.compute();
        if self.current_page > view.total_pages {
            self.current_page = view.total_pages;
            view = self.compute();
        }

        let page_changed = view.rows != self.view.rows;
        self.view = view;

        log::debug!(
            "Table view: {} rows on page {}/{} ({} matching of {})",
            self.view.rows.len(),
            self.current_page,
            self.view.total_pages,
            self.view.filtered_count,
            self.records.len()
        );

        if page_changed && self.selection.clear() {
            self.push_selection_event();
        }
    }

    fn compute(&self) -> View {
        compute_view(
            &self.records,
            &self.config,
            &self.search_term,
            &self.sort,
            self.current_page,
        )
    }

    fn push_selection_event(&mut self) {
        let event = SelectionChangedEvent {
            selected_rows: self.selection.selected_rows(&self.view.rows),
            selected_indices: self.selection.selected_indices(),
        };
        self.push_event(event);
    }

    fn push_event(&mut self, event: impl Into<TableEvent>) {
        let event = event.into();
        log::trace!("Table event: {}", event.kind());
        self.events.push_back(event);
    }
}

fn check_configuration(config: &TableConfiguration) {
    if let Err(e) = config.validate() {
        log::warn!("Invalid table configuration: {}", e);
    }
}
