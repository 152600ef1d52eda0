//! The view pipeline: filter, sort, paginate.

use serde::Serialize;

use crate::Row;
use crate::config::TableConfiguration;
use crate::format::format_cell;
use crate::sort::SortState;
use crate::sort::sort_rows;

/// Result of running the pipeline over a record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    /// Rows of the current page, ready for display.
    pub rows: Vec<Row>,
    /// Number of rows that passed the filter, before paging.
    pub filtered_count: usize,
    /// Page count derived from `filtered_count`. Always at least 1.
    pub total_pages: usize,
}

/// Run the full pipeline.
///
/// Pure given its inputs: filter by `search_term` over visible columns, sort
/// by `sort`, then slice page `current_page` (1-based) when paginated.
pub fn compute_view(
    records: &[Row],
    config: &TableConfiguration,
    search_term: &str,
    sort: &SortState,
    current_page: usize,
) -> View {
    let mut rows = filter_rows(records, config, search_term);

    if let Some((key, direction)) = sort.active() {
        if let Some(column) = config.column(key) {
            rows = sort_rows(rows, column, direction);
        }
    }

    let filtered_count = rows.len();

    if !config.paginated {
        return View {
            rows,
            filtered_count,
            total_pages: 1,
        };
    }

    let page_size = config.page_size();
    let total_pages = total_pages(filtered_count, page_size);
    let start = current_page.saturating_sub(1).saturating_mul(page_size);
    let rows = rows.into_iter().skip(start).take(page_size).collect();

    View {
        rows,
        filtered_count,
        total_pages,
    }
}

/// Keep rows where some visible column's formatted value contains the
/// trimmed term, ignoring case. An empty term keeps everything.
pub fn filter_rows(records: &[Row], config: &TableConfiguration, search_term: &str) -> Vec<Row> {
    let term = search_term.trim().to_lowercase();
    if term.is_empty() {
        return records.to_vec();
    }

    records
        .iter()
        .filter(|row| {
            config
                .visible_columns()
                .any(|column| format_cell(row, column).search_text().to_lowercase().contains(&term))
        })
        .cloned()
        .collect()
}

/// `max(1, ceil(count / page_size))`.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// The "showing first to last of total" line. 1-based and inclusive; all
/// zeros when nothing matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub first: usize,
    pub last: usize,
    pub total: usize,
}

impl PageInfo {
    /// Describe page `current_page` of `view`.
    pub fn for_view(view: &View, config: &TableConfiguration, current_page: usize) -> Self {
        if view.rows.is_empty() {
            return Self {
                first: 0,
                last: 0,
                total: view.filtered_count,
            };
        }

        let offset = if config.paginated {
            current_page.saturating_sub(1) * config.page_size()
        } else {
            0
        };

        Self {
            first: offset + 1,
            last: offset + view.rows.len(),
            total: view.filtered_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(9, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn test_page_info() {
        let config = TableConfiguration::new(vec![Column::text("n", "N")]).paginated(2);
        let records: Vec<Row> = (0..5).map(|i| Row::new().set("n", i)).collect();

        let view = compute_view(&records, &config, "", &SortState::none(), 3);
        assert_eq!(
            PageInfo::for_view(&view, &config, 3),
            PageInfo {
                first: 5,
                last: 5,
                total: 5
            }
        );

        let view = compute_view(&[], &config, "", &SortState::none(), 1);
        assert_eq!(PageInfo::for_view(&view, &config, 1), PageInfo::default());
    }
}
