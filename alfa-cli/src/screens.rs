//! Table configurations of the console screens.

use alfa_grid::ActionColor;
use alfa_grid::Alignment;
use alfa_grid::Column;
use alfa_grid::ColumnType;
use alfa_grid::IconConfig;
use alfa_grid::NumberFormat;
use alfa_grid::Row;
use alfa_grid::StatusColor;
use alfa_grid::StatusStyle;
use alfa_grid::TableAction;
use alfa_grid::TableConfiguration;
use alfa_grid::actions::DELETE_ACTION_ID;
use chrono::NaiveDate;

pub const VIEW_ACTION_ID: &str = "ver";

/// The insurers screen.
pub fn insurers(page_size: usize) -> TableConfiguration {
    TableConfiguration::new(vec![
        Column::new("icono", "", ColumnType::Icon)
            .width("50px")
            .align(Alignment::Center)
            .icon(IconConfig::default()),
        Column::text("id", "ID").width("120px").sortable(),
        Column::text("aseguradora", "Aseguradora").width("200px").sortable(),
        Column::new("estado", "Status", ColumnType::Status)
            .width("150px")
            .sortable()
            .align(Alignment::Center)
            .statuses([
                ("FULFILLED", StatusStyle::new("Fulfilled", StatusColor::Green)),
                ("CONFIRMED", StatusStyle::new("Confirmed", StatusColor::Blue)),
                (
                    "WAITING_SHIPMENT",
                    StatusStyle::new("Waiting Shipment", StatusColor::Yellow),
                ),
            ]),
        Column::new("monto", "Budget", ColumnType::Number)
            .width("120px")
            .sortable()
            .align(Alignment::Right)
            .number_format(NumberFormat {
                decimals: Some(1),
                currency: true,
                thousands_separator: true,
            }),
        Column::new("fechaCreacion", "Created", ColumnType::Date)
            .width("120px")
            .sortable(),
        Column::new("fechaVencimiento", "Expired", ColumnType::Date)
            .width("120px")
            .sortable(),
        Column::new("acciones", "", ColumnType::Actions)
            .width("80px")
            .align(Alignment::Center)
            .action(
                TableAction::new(VIEW_ACTION_ID, "Ver")
                    .color(ActionColor::Primary)
                    .tooltip("Ver detalles"),
            )
            .action(
                TableAction::new(DELETE_ACTION_ID, "Eliminar")
                    .color(ActionColor::Error)
                    .tooltip("Eliminar aseguradora"),
            ),
    ])
    .selectable(true)
    .paginated(page_size)
    .searchable("Buscar aseguradoras...")
    .show_info()
}

/// The insurers screen over live records, keyed by the fields of
/// [`alfa_lib::model::Insurer::to_row`].
pub fn insurer_directory(page_size: usize) -> TableConfiguration {
    let commission = NumberFormat {
        decimals: Some(1),
        currency: false,
        thousands_separator: false,
    };
    TableConfiguration::new(vec![
        Column::text("id", "ID").width("80px").sortable(),
        Column::text("aseguradora", "Aseguradora").width("200px").sortable(),
        Column::text("numeral_asistencia", "Asistencia").width("120px"),
        Column::text("correo_comercial", "Correo comercial").width("200px"),
        Column::text("contacto_asignado", "Contacto").width("160px").sortable(),
        Column::new("comision_hogar", "Com. hogar %", ColumnType::Number)
            .width("100px")
            .sortable()
            .align(Alignment::Right)
            .number_format(commission),
        Column::new("comision_vehiculo", "Com. vehículo %", ColumnType::Number)
            .width("100px")
            .sortable()
            .align(Alignment::Right)
            .number_format(commission),
        Column::new("acciones", "", ColumnType::Actions)
            .width("80px")
            .align(Alignment::Center)
            .action(
                TableAction::new(VIEW_ACTION_ID, "Ver")
                    .color(ActionColor::Primary)
                    .tooltip("Ver detalles"),
            )
            .action(
                TableAction::new(DELETE_ACTION_ID, "Eliminar")
                    .color(ActionColor::Error)
                    .tooltip("Eliminar aseguradora"),
            ),
    ])
    .selectable(true)
    .paginated(page_size)
    .searchable("Buscar aseguradoras...")
    .show_info()
}

fn date(month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2019, month, day)
}

/// Demo records for the insurers screen when no API is at hand.
pub fn sample_insurers() -> Vec<Row> {
    let today = chrono::Local::now().date_naive();
    let rows = [
        ("#SO-00003", "Gaspar Arhanes", "FULFILLED", 2874.56, date(5, 18), None),
        ("#SO-00004", "Tristique van Aertsen", "CONFIRMED", 1478.48, date(5, 12), date(5, 13)),
        ("#SO-00005", "Tristique Huitlord", "WAITING_SHIPMENT", 243.12, date(5, 14), date(6, 12)),
        ("#SO-00006", "Tongkiang Jun-Seo", "FULFILLED", 123.16, date(5, 14), date(6, 14)),
        ("#SO-00007", "Ngọ Hải Giang", "CONFIRMED", 194.76, date(5, 16), date(6, 24)),
        ("#SO-00008", "Mijenna Taotic", "CONFIRMED", 18789.72, date(5, 18), date(6, 1)),
        ("#SO-00009", "Lestée Moss", "WAITING_SHIPMENT", 457.45, date(5, 19), date(5, 12)),
        ("#SO-00010", "Jacqueline Lleski", "FULFILLED", 4411.96, date(5, 18), date(6, 8)),
        ("#SO-00011", "Dai Jiang", "FULFILLED", 2794.23, date(5, 21), date(6, 24)),
    ];

    rows.into_iter()
        .map(|(id, name, status, amount, created, expires)| {
            Row::new()
                .set("id", id)
                .set("icono", "🏢")
                .set("aseguradora", name)
                .set("estado", status)
                .set("monto", amount)
                .set("fechaCreacion", created)
                .set("fechaVencimiento", expires.unwrap_or(today))
        })
        .collect()
}
