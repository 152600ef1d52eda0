//! Cell formatting driven by the column type.
//!
//! Formatting is total: malformed input (unknown status, unparseable date,
//! non-numeric number) degrades to a fallback display instead of failing.

use std::fmt::Write;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::Serialize;

use crate::Row;
use crate::Value;
use crate::column::Column;
use crate::column::ColumnType;
use crate::column::NumberFormat;
use crate::column::StatusColor;
use crate::column::StatusStyle;
use crate::column::TypeConfig;

/// Default date pattern (`DD/MM/YYYY`).
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

/// Suffix appended to currency amounts.
const CURRENCY_SUFFIX: &str = "\u{a0}US$";

/// A display-ready cell value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellDisplay {
    /// Plain text.
    Text(String),
    /// Status badge.
    Status(StatusStyle),
    /// Left to the presentation layer (actions, icons, checkboxes).
    Raw(Value),
}

impl CellDisplay {
    /// The text matched by the search filter.
    pub fn search_text(&self) -> String {
        match self {
            CellDisplay::Text(text) => text.clone(),
            CellDisplay::Status(status) => status.label.clone(),
            CellDisplay::Raw(value) => value.display(),
        }
    }

    /// Returns the text if this is a `Text` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellDisplay::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the status style if this is a `Status` cell.
    pub fn as_status(&self) -> Option<&StatusStyle> {
        match self {
            CellDisplay::Status(status) => Some(status),
            _ => None,
        }
    }
}

/// Format the cell of `row` under `column`.
pub fn format_cell(row: &Row, column: &Column) -> CellDisplay {
    format_value(row.value(&column.key), column)
}

/// Format a raw value as a cell of `column`.
pub fn format_value(value: &Value, column: &Column) -> CellDisplay {
    let config = column.type_config.as_ref();

    match column.column_type {
        ColumnType::Text => CellDisplay::Text(value.display()),
        ColumnType::Number => {
            let format = config.and_then(|c| c.number_format);
            CellDisplay::Text(format_number(value, format.as_ref()))
        }
        ColumnType::Date => {
            let pattern = config.and_then(|c| c.date_format.as_deref());
            CellDisplay::Text(format_date(value, pattern))
        }
        ColumnType::Status => CellDisplay::Status(format_status(value, config)),
        ColumnType::Actions | ColumnType::Icon | ColumnType::Checkbox => {
            CellDisplay::Raw(value.clone())
        }
    }
}

// =============================================================================
// Status
// =============================================================================

/// Look up a status code; unknown codes render as a gray badge with the raw text.
pub fn format_status(value: &Value, config: Option<&TypeConfig>) -> StatusStyle {
    let code = value.display();
    config
        .and_then(|c| c.statuses.get(&code))
        .cloned()
        .unwrap_or_else(|| StatusStyle::new(code, StatusColor::Gray))
}

// =============================================================================
// Dates
// =============================================================================

/// Render a date-like value, or `""` when it is absent or unparseable.
pub fn format_date(value: &Value, pattern: Option<&str>) -> String {
    let Some(date) = coerce_date(value) else {
        return String::new();
    };

    if let Some(pattern) = pattern {
        let mut out = String::new();
        if write!(out, "{}", date.format(pattern)).is_ok() {
            return out;
        }
        log::warn!("Invalid date pattern {:?}, using default", pattern);
    }

    date.format(DEFAULT_DATE_FORMAT).to_string()
}

/// Coerce a raw value into a calendar date.
///
/// Numbers are epoch milliseconds; `0` counts as absent.
pub fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Date(date) => Some(*date),
        Value::DateTime(dt) => Some(dt.date_naive()),
        Value::String(s) => parse_date_str(s.trim()),
        Value::Int(ms) => from_millis(*ms),
        Value::Float(ms) if ms.is_finite() => from_millis(*ms as i64),
        Value::Decimal(ms) => ms.trunc().to_string().parse().ok().and_then(from_millis),
        _ => None,
    }
}

fn from_millis(ms: i64) -> Option<NaiveDate> {
    if ms == 0 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

// =============================================================================
// Numbers
// =============================================================================

/// Render a number with `es-ES` conventions, or `""` when it is not numeric.
///
/// `.` groups thousands, `,` separates decimals and currency amounts carry a
/// `US$` suffix.
pub fn format_number(value: &Value, format: Option<&NumberFormat>) -> String {
    let Some(number) = to_decimal(value) else {
        return String::new();
    };
    let format = format.copied().unwrap_or_default();

    let (min_frac, max_frac) = match format.decimals {
        Some(d) => (d, d),
        None if format.currency => (2, 2),
        None => (0, 3),
    };

    let rounded = number.round_dp_with_strategy(max_frac, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().to_string();
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits.as_str(), ""),
    };

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_frac as usize {
        frac.push('0');
    }

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    if format.thousands_separator || int_part.len() >= 5 {
        out.push_str(&group_thousands(int_part));
    } else {
        out.push_str(int_part);
    }
    if !frac.is_empty() {
        out.push(',');
        out.push_str(&frac);
    }
    if format.currency {
        out.push_str(CURRENCY_SUFFIX);
    }
    out
}

fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Decimal(d) => Some(*d),
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::Float(_) | Value::String(_) => value.as_f64()?.to_string().parse().ok(),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn money(decimals: Option<u32>) -> NumberFormat {
        NumberFormat {
            decimals,
            currency: true,
            thousands_separator: true,
        }
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(format_date(&Value::from("2019-05-18"), None), "18/05/2019");
        assert_eq!(
            format_date(&Value::from("2019-05-18T23:30:00Z"), None),
            "18/05/2019"
        );
        assert_eq!(
            format_date(&Value::from(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()), None),
            "02/01/2024"
        );
        assert_eq!(format_date(&Value::from(1_558_137_600_000i64), None), "18/05/2019");
    }

    #[test]
    fn test_date_fallbacks() {
        assert_eq!(format_date(&Value::Null, None), "");
        assert_eq!(format_date(&Value::from(""), None), "");
        assert_eq!(format_date(&Value::from("not a date"), None), "");
        assert_eq!(format_date(&Value::from(0i64), None), "");
        assert_eq!(format_date(&Value::from(true), None), "");
    }

    #[test]
    fn test_date_custom_pattern() {
        let value = Value::from("2019-05-18");
        assert_eq!(format_date(&value, Some("%Y/%m/%d")), "2019/05/18");
        // Time fields cannot be rendered from a date; fall back to the default.
        assert_eq!(format_date(&value, Some("%H:%M")), "18/05/2019");
    }

    #[test]
    fn test_number_currency() {
        let format = money(Some(1));
        assert_eq!(format_number(&Value::from(2874.56), Some(&format)), "2.874,6\u{a0}US$");
        assert_eq!(format_number(&Value::from(243.12), Some(&format)), "243,1\u{a0}US$");
        assert_eq!(
            format_number(&Value::from(18789.72), Some(&format)),
            "18.789,7\u{a0}US$"
        );
        assert_eq!(format_number(&Value::from(5i64), Some(&money(None))), "5,00\u{a0}US$");
    }

    #[test]
    fn test_number_default_options() {
        assert_eq!(format_number(&Value::from(1234.5), None), "1234,5");
        assert_eq!(format_number(&Value::from(12345.6789), None), "12.345,679");
        assert_eq!(format_number(&Value::from(-0.5), None), "-0,5");
        assert_eq!(format_number(&Value::from(100i64), None), "100");
    }

    #[test]
    fn test_number_rounding_half_away_from_zero() {
        let format = NumberFormat {
            decimals: Some(0),
            ..NumberFormat::default()
        };
        assert_eq!(format_number(&Value::from(2.5), Some(&format)), "3");
        assert_eq!(format_number(&Value::from(-2.5), Some(&format)), "-3");
    }

    #[test]
    fn test_number_fallbacks() {
        assert_eq!(format_number(&Value::Null, None), "");
        assert_eq!(format_number(&Value::from("abc"), None), "");
        assert_eq!(format_number(&Value::from(f64::NAN), None), "");
        assert_eq!(format_number(&Value::from("42"), None), "42");
    }

    #[test]
    fn test_status_fallback() {
        let style = format_status(&Value::from("UNKNOWN"), None);
        assert_eq!(style.label, "UNKNOWN");
        assert_eq!(style.color.as_str(), "gris");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1.234");
        assert_eq!(group_thousands("1234567"), "1.234.567");
    }
}
