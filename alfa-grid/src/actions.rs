//! Row action state and dispatch.

use crate::Row;
use crate::Value;
use crate::column::TableAction;
use crate::events::RowActionEvent;

/// The only action that shows a busy indicator on the busy row.
pub const DELETE_ACTION_ID: &str = "delete";

fn is_busy(row: &Row, busy_row_id: Option<&Value>) -> bool {
    match (busy_row_id, row.id()) {
        (Some(busy), Some(id)) => busy == id,
        _ => false,
    }
}

/// `true` if the row is busy or the action's own predicate disables it.
pub fn is_disabled(action: &TableAction, row: &Row, busy_row_id: Option<&Value>) -> bool {
    if is_busy(row, busy_row_id) {
        return true;
    }
    action
        .disabled_when
        .as_ref()
        .is_some_and(|predicate| predicate.test(row))
}

/// `true` only for the delete action of the busy row. Other actions on a
/// busy row are disabled without a loading indicator.
pub fn is_loading(action: &TableAction, row: &Row, busy_row_id: Option<&Value>) -> bool {
    action.id == DELETE_ACTION_ID && is_busy(row, busy_row_id)
}

/// Build the outward event for a clicked action.
///
/// Does not check [`is_disabled`]; callers gate invocation themselves.
pub fn execute_action(action_id: &str, row: &Row, index: usize) -> RowActionEvent {
    RowActionEvent {
        action: action_id.to_string(),
        row: row.clone(),
        index,
    }
}
