//! Dynamic table engine
//!
//! Takes an in-memory record set plus a declarative column configuration and
//! produces a filtered, sorted, paginated and selectable view, reporting
//! sort, selection and row-action events back to the host.

pub mod actions;
pub mod column;
pub mod config;
pub mod events;
pub mod format;
pub mod selection;
pub mod sort;
pub mod view;

mod row;
mod table;
mod value;

pub use column::*;
pub use config::ConfigError;
pub use config::TableConfiguration;
pub use events::*;
pub use format::CellDisplay;
pub use row::*;
pub use sort::SortDirection;
pub use sort::SortState;
pub use table::*;
pub use value::*;
pub use view::PageInfo;
pub use view::View;
