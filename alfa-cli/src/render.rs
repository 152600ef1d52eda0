//! Plain-text rendering of a [`DynamicTable`].

use alfa_grid::Alignment;
use alfa_grid::CellDisplay;
use alfa_grid::Column;
use alfa_grid::ColumnType;
use alfa_grid::DynamicTable;
use alfa_grid::IconConfig;
use alfa_grid::SortDirection;
use alfa_grid::TableEvent;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Widest a column may grow before its cells are truncated.
const MAX_COLUMN_WIDTH: usize = 32;

const COLUMN_GAP: &str = " | ";

const LOADING_MESSAGE: &str = "Cargando...";

fn display_width(s: &str) -> usize {
    s.width()
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

/// Pad `text` to `width` columns according to `alignment`.
fn pad(text: &str, width: usize, alignment: Alignment) -> String {
    let text = truncate_to_width(text, width);
    let free = width.saturating_sub(display_width(&text));
    let left = match alignment {
        Alignment::Left => 0,
        Alignment::Center => free / 2,
        Alignment::Right => free,
    };
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(free - left))
}

fn selection_marker(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

fn header_text(table: &DynamicTable, column: &Column) -> String {
    let sort = table.sort_state();
    if sort.active_column.as_deref() != Some(column.key.as_str()) {
        return column.title.clone();
    }
    match sort.direction {
        Some(SortDirection::Asc) => format!("{} ▲", column.title),
        Some(SortDirection::Desc) => format!("{} ▼", column.title),
        None => column.title.clone(),
    }
}

/// Text of one cell of the current page.
fn cell_text(table: &DynamicTable, index: usize, column: &Column) -> String {
    match column.column_type {
        ColumnType::Checkbox => selection_marker(table.is_selected(index)).to_string(),
        ColumnType::Actions => column
            .actions()
            .iter()
            .map(|action| {
                if table.is_action_loading(action, index) {
                    format!("{}…", action.label)
                } else if table.is_action_disabled(action, index) {
                    format!("({})", action.label)
                } else {
                    action.label.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        ColumnType::Icon => {
            let Some(row) = table.view_rows().get(index) else {
                return String::new();
            };
            let fallback = IconConfig::default();
            let icons = column
                .type_config
                .as_ref()
                .and_then(|config| config.icon.as_ref())
                .unwrap_or(&fallback);
            icons
                .icon_for(row, &column.key)
                .map(|icon| icon.into_owned())
                .unwrap_or_default()
        }
        _ => match table.format_cell(index, &column.key) {
            Some(CellDisplay::Text(text)) => text,
            Some(CellDisplay::Status(status)) => status.label,
            Some(CellDisplay::Raw(value)) => value.display(),
            None => String::new(),
        },
    }
}

/// Render the current page as an aligned grid followed by the footer.
pub fn render_table(table: &DynamicTable) -> String {
    let config = table.configuration();
    let columns: Vec<&Column> = table.visible_columns().collect();

    let headers: Vec<String> = columns.iter().map(|c| header_text(table, c)).collect();
    let body: Vec<Vec<String>> = if table.is_loading() {
        Vec::new()
    } else {
        (0..table.view_rows().len())
            .map(|index| columns.iter().map(|c| cell_text(table, index, c)).collect())
            .collect()
    };

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            body.iter()
                .map(|cells| display_width(&cells[i]))
                .chain(std::iter::once(display_width(header)))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut lines = Vec::new();

    if config.searchable && !table.search_term().is_empty() {
        lines.push(format!("Búsqueda: {}", table.search_term()));
    }

    let join = |marker: Option<&str>, cells: Vec<String>| {
        let mut parts = Vec::with_capacity(cells.len() + 1);
        if let Some(marker) = marker {
            parts.push(marker.to_string());
        }
        parts.extend(cells);
        parts.join(COLUMN_GAP).trim_end().to_string()
    };

    let header_marker = config.selectable.then(|| selection_marker(table.all_selected()));
    let header_cells = headers
        .iter()
        .zip(&widths)
        .zip(&columns)
        .map(|((header, width), column)| pad(header, *width, column.alignment))
        .collect();
    lines.push(join(header_marker, header_cells));

    let mut rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    if config.selectable {
        rule.insert(0, "-".repeat(3));
    }
    lines.push(rule.join("-+-"));

    if table.is_loading() {
        lines.push(LOADING_MESSAGE.to_string());
    } else if table.is_empty() {
        lines.push(table.empty_message().to_string());
    } else {
        for (index, cells) in body.into_iter().enumerate() {
            let marker = config.selectable.then(|| selection_marker(table.is_selected(index)));
            let cells = cells
                .iter()
                .zip(&widths)
                .zip(&columns)
                .map(|((cell, width), column)| pad(cell, *width, column.alignment))
                .collect();
            lines.push(join(marker, cells));
        }
    }

    if config.show_info {
        let info = table.page_info();
        lines.push(format!(
            "Mostrando {} a {} de {} registros",
            info.first, info.last, info.total
        ));
    }
    if config.paginated {
        lines.push(format!("Página {} de {}", table.current_page(), table.total_pages()));
    }

    lines.join("\n")
}

/// Render events as one JSON object per line.
pub fn render_events(events: &[TableEvent]) -> Result<String, serde_json::Error> {
    let lines = events
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use alfa_grid::Row;
    use alfa_grid::StatusColor;
    use alfa_grid::StatusStyle;
    use alfa_grid::TableAction;
    use alfa_grid::TableConfiguration;
    use alfa_grid::Value;

    use super::*;

    fn table() -> DynamicTable {
        let config = TableConfiguration::new(vec![
            Column::text("nombre", "Nombre").sortable(),
            Column::new("estado", "Estado", ColumnType::Status)
                .statuses([("OK", StatusStyle::new("Activo", StatusColor::Green))]),
            Column::new("monto", "Monto", ColumnType::Number).align(Alignment::Right),
            Column::new("acciones", "", ColumnType::Actions).action(TableAction::new("delete", "Eliminar")),
        ])
        .selectable(true)
        .paginated(2)
        .searchable("Buscar...")
        .show_info();

        let rows = vec![
            Row::new().set("id", 1).set("nombre", "Allianz").set("estado", "OK").set("monto", 1500),
            Row::new().set("id", 2).set("nombre", "Mapfre").set("estado", "OFF").set("monto", 20),
            Row::new().set("id", 3).set("nombre", "Zurich").set("estado", "OK").set("monto", 7),
        ];
        DynamicTable::with_records(config, rows)
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("Allianz", 10), "Allianz");
        assert_eq!(truncate_to_width("Allianz Seguros", 8), "Allianz…");
        assert_eq!(truncate_to_width("abc", 0), "");
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_pad_alignment() {
        assert_eq!(pad("ab", 6, Alignment::Left), "ab    ");
        assert_eq!(pad("ab", 6, Alignment::Center), "  ab  ");
        assert_eq!(pad("ab", 6, Alignment::Right), "    ab");
    }

    #[test]
    fn test_render_page() {
        let mut table = table();
        table.toggle_row(1);
        let out = render_table(&table);
        let lines: Vec<&str> = out.lines().collect();

        assert!(lines[0].starts_with("[ ] | Nombre"));
        assert!(lines[2].starts_with("[ ] | Allianz"));
        assert!(lines[2].contains("Activo"));
        assert!(lines[2].contains("1500"));
        assert!(lines[2].ends_with("Eliminar"));
        assert!(lines[3].starts_with("[x] | Mapfre"));
        assert!(lines[3].contains("OFF"));
        assert_eq!(lines[4], "Mostrando 1 a 2 de 3 registros");
        assert_eq!(lines[5], "Página 1 de 2");
    }

    #[test]
    fn test_render_sort_marker_and_busy_row() {
        let mut table = table();
        table.sort_by("nombre");
        table.sort_by("nombre");
        table.set_busy_row_id(Some(Value::from(3)));

        let out = render_table(&table);
        assert!(out.lines().next().is_some_and(|l| l.contains("Nombre ▼")));
        assert!(out.contains("Zurich"));
        assert!(out.contains("Eliminar…"));
    }

    #[test]
    fn test_render_empty_and_loading() {
        let mut table = table();
        table.search("nada");
        let out = render_table(&table);
        assert!(out.starts_with("Búsqueda: nada"));
        assert!(out.contains("No hay datos disponibles"));
        assert!(out.contains("Mostrando 0 a 0 de 0 registros"));

        table.set_loading(true);
        assert!(render_table(&table).contains(LOADING_MESSAGE));
    }

    #[test]
    fn test_render_events() {
        let mut table = table();
        table.sort_by("nombre");
        let json = render_events(&table.drain_events()).unwrap();
        let event: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(event["type"], "sortChanged");
        assert_eq!(event["column"], "nombre");
        assert_eq!(event["direction"], "asc");
    }
}
