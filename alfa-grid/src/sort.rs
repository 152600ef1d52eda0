//! Sort state and value ordering.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::Row;
use crate::Value;
use crate::column::Column;
use crate::column::ColumnType;
use crate::format::coerce_date;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

/// The active sort column and direction.
///
/// Both fields are `None` when the table is unsorted. At most one column is
/// active at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub active_column: Option<String>,
    pub direction: Option<SortDirection>,
}

impl SortState {
    /// Unsorted state.
    pub fn none() -> Self {
        Self::default()
    }

    /// Sorted by `column` in `direction`.
    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            active_column: Some(column.into()),
            direction: Some(direction),
        }
    }

    /// Returns the active column and direction, if sorted.
    pub fn active(&self) -> Option<(&str, SortDirection)> {
        match (&self.active_column, self.direction) {
            (Some(column), Some(direction)) => Some((column.as_str(), direction)),
            _ => None,
        }
    }

    /// Direction of `column`, or `None` if it is not the active column.
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        self.active()
            .filter(|(active, _)| *active == column)
            .map(|(_, direction)| direction)
    }

    /// Next state after clicking the header of `column`.
    ///
    /// The active column cycles `Asc -> Desc -> unsorted`; any other column
    /// starts at `Asc`.
    pub fn cycle(&self, column: &str) -> SortState {
        match self.direction_of(column) {
            Some(SortDirection::Asc) => SortState::by(column, SortDirection::Desc),
            Some(SortDirection::Desc) => SortState::none(),
            None => SortState::by(column, SortDirection::Asc),
        }
    }
}

// =============================================================================
// Sort keys
// =============================================================================

/// A raw cell value normalized for ordering.
///
/// Missing values order first, then numbers (including dates as timestamps),
/// then case-folded text.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Empty,
    Number(f64),
    Text(String),
}

impl SortKey {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => SortKey::Empty,
            Value::Bool(b) => SortKey::Number(if *b { 1.0 } else { 0.0 }),
            Value::Int(i) => SortKey::Number(*i as f64),
            Value::Float(f) => SortKey::Number(*f),
            Value::Decimal(_) => value.as_f64().map_or(SortKey::Empty, SortKey::Number),
            Value::Date(d) => date_key(*d),
            Value::DateTime(dt) => SortKey::Number(dt.timestamp_millis() as f64),
            Value::String(s) if s.is_empty() => SortKey::Empty,
            Value::String(s) => SortKey::Text(s.to_lowercase()),
        }
    }

    /// Key of `value` as shown in `column`.
    ///
    /// Date columns order by timestamp whatever the cell holds (date, ISO
    /// string, epoch milliseconds); cells that are not a date order as empty.
    pub fn for_column(value: &Value, column: &Column) -> Self {
        if column.column_type != ColumnType::Date {
            return SortKey::from_value(value);
        }
        match value {
            Value::DateTime(dt) => SortKey::Number(dt.timestamp_millis() as f64),
            Value::Int(ms) if *ms != 0 => SortKey::Number(*ms as f64),
            Value::Float(ms) if ms.is_finite() && *ms != 0.0 => SortKey::Number(*ms),
            _ => coerce_date(value).map_or(SortKey::Empty, date_key),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Empty => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }

    /// Total order used by the table. NaN orders after every other number.
    pub fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Midnight UTC of `date`, in milliseconds.
fn date_key(date: chrono::NaiveDate) -> SortKey {
    date.and_hms_opt(0, 0, 0)
        .map_or(SortKey::Empty, |dt| SortKey::Number(dt.and_utc().timestamp_millis() as f64))
}

/// Stable sort of `rows` by the values of `column`.
pub fn sort_rows(rows: Vec<Row>, column: &Column, direction: SortDirection) -> Vec<Row> {
    let mut keyed: Vec<(SortKey, Row)> = rows
        .into_iter()
        .map(|row| (SortKey::for_column(row.value(&column.key), column), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match direction {
        SortDirection::Asc => a.compare(b),
        SortDirection::Desc => b.compare(a),
    });

    keyed.into_iter().map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_tri_state() {
        let state = SortState::none();
        let state = state.cycle("monto");
        assert_eq!(state.active(), Some(("monto", SortDirection::Asc)));
        let state = state.cycle("monto");
        assert_eq!(state.active(), Some(("monto", SortDirection::Desc)));
        let state = state.cycle("monto");
        assert_eq!(state, SortState::none());
        let state = state.cycle("monto");
        assert_eq!(state.active(), Some(("monto", SortDirection::Asc)));
    }

    #[test]
    fn test_cycle_other_column_starts_ascending() {
        let state = SortState::by("monto", SortDirection::Desc).cycle("id");
        assert_eq!(state.active(), Some(("id", SortDirection::Asc)));
        assert_eq!(state.direction_of("monto"), None);
    }

    #[test]
    fn test_key_ordering() {
        let empty = SortKey::from_value(&Value::Null);
        let number = SortKey::from_value(&Value::from(-5i64));
        let text = SortKey::from_value(&Value::from("Abc"));

        assert_eq!(empty.compare(&number), Ordering::Less);
        assert_eq!(number.compare(&text), Ordering::Less);
        assert_eq!(text, SortKey::Text("abc".into()));
        assert_eq!(SortKey::from_value(&Value::from("")), SortKey::Empty);
    }

    #[test]
    fn test_sort_case_insensitive() {
        let rows = vec![
            Row::new().set("n", "beta"),
            Row::new().set("n", "Alpha"),
            Row::new().set("n", "gamma"),
        ];
        let rows = sort_rows(rows, &Column::text("n", "N"), SortDirection::Asc);
        let names: Vec<String> = rows.iter().map(|r| r.value("n").display()).collect();
        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_sort_date_column_with_mixed_values() {
        let date = |y, m, d| chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let rows = vec![
            Row::new().set("id", 1).set("vence", date(2024, 3, 1)),
            Row::new().set("id", 2).set("vence", "2019-07-01"),
            // 2021-06-15T00:00:00Z
            Row::new().set("id", 3).set("vence", 1_623_715_200_000i64),
            Row::new().set("id", 4).set("vence", "2023-01-10T12:00:00Z"),
            Row::new().set("id", 5).set("vence", "pendiente"),
        ];
        let column = Column::new("vence", "Vence", ColumnType::Date);

        let ids = |rows: Vec<Row>| rows.iter().map(|r| r.value("id").display()).collect::<Vec<_>>();
        assert_eq!(ids(sort_rows(rows.clone(), &column, SortDirection::Asc)), vec!["5", "2", "3", "4", "1"]);
        assert_eq!(ids(sort_rows(rows, &column, SortDirection::Desc)), vec!["1", "4", "3", "2", "5"]);
    }
}
