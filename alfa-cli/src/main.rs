mod error;
mod paths;
mod render;
mod screens;
mod settings;

use std::fs;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use alfa_grid::Column;
use alfa_grid::DynamicTable;
use alfa_grid::Row;
use alfa_grid::TableConfiguration;
use alfa_grid::Value;
use alfa_lib::AlfaClient;
use alfa_lib::api::InsurerService;
use alfa_lib::auth::AuthService;
use alfa_lib::auth::FileSessionStore;
use alfa_lib::auth::MemorySessionStore;
use alfa_lib::auth::SessionStore;
use alfa_lib::error::UserFacing;
use alfa_lib::model::Credentials;
use clap::Parser as ClapParser;
use clap::Subcommand;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use crate::error::CliError;
use crate::paths::AppPaths;
use crate::settings::Settings;

const USER_VAR: &str = "ALFA_USER";
const PASSWORD_VAR: &str = "ALFA_PASSWORD";

#[derive(ClapParser)]
#[command(name = "alfa")]
#[command(about = "Brokerage admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a JSON array of records as a table
    Table {
        /// Path to the records file
        records: PathBuf,
        /// Table configuration file; columns are inferred when absent
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        interaction: Interaction,
        /// Mark the row with this id as busy
        #[arg(long)]
        busy: Option<String>,
    },
    /// List insurers
    Insurers {
        /// API base URL, overriding the settings
        #[arg(long)]
        url: Option<String>,
        /// Show demo records instead of calling the API
        #[arg(long)]
        sample: bool,
        #[command(flatten)]
        interaction: Interaction,
    },
    /// Forget the stored login session
    Logout,
}

/// Interactions replayed on the table before rendering, in this order.
#[derive(clap::Args, Debug, Default)]
struct Interaction {
    /// Search term
    #[arg(long)]
    search: Option<String>,
    /// Click the header of this column; repeat to cycle the direction
    #[arg(long = "sort")]
    sort: Vec<String>,
    /// Page to show
    #[arg(long)]
    page: Option<usize>,
    /// Toggle selection of this row of the page
    #[arg(long = "select")]
    select: Vec<usize>,
    /// Toggle selection of every row of the page
    #[arg(long)]
    select_all: bool,
    /// Run an action on a row of the page, as `ACTION:ROW`
    #[arg(long = "action", value_parser = parse_action)]
    actions: Vec<(String, usize)>,
}

fn parse_action(s: &str) -> Result<(String, usize), String> {
    let (id, index) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected ACTION:ROW, got '{}'", s))?;
    let index = index
        .parse()
        .map_err(|_| format!("invalid row index '{}'", index))?;
    Ok((id.to_string(), index))
}

impl Interaction {
    fn apply(&self, table: &mut DynamicTable) {
        if let Some(term) = &self.search {
            table.search(term.as_str());
        }
        for key in &self.sort {
            if !table.sort_by(key) {
                log::warn!("Column '{}' is not sortable", key);
            }
        }
        if let Some(page) = self.page {
            if !table.go_to_page(page) {
                log::warn!("Page {} is out of range (1-{})", page, table.total_pages());
            }
        }
        for &index in &self.select {
            if !table.toggle_row(index) {
                log::warn!("Cannot select row {}", index);
            }
        }
        if self.select_all {
            table.toggle_all();
        }
        for (action, index) in &self.actions {
            if !table.execute_action(action, *index) {
                log::warn!("Action '{}' on row {} was not run", action, index);
            }
        }
    }
}

fn init_logging(paths: Option<&AppPaths>) {
    let Some(paths) = paths else {
        return;
    };
    paths.rotate_logs();

    let path = paths.log_file();
    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Cannot create log directory {}: {}", dir.display(), e);
            return;
        }
    }
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), file);
        }
        Err(e) => eprintln!("Cannot create log file {}: {}", path.display(), e),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// One sortable text column per field of the first record, `id` first.
fn infer_configuration(records: &[Row]) -> TableConfiguration {
    let mut keys: Vec<&String> = records
        .first()
        .map(|row| row.fields().keys().collect())
        .unwrap_or_default();
    keys.sort_by(|a, b| (a.as_str() != alfa_grid::ID_FIELD, a).cmp(&(b.as_str() != alfa_grid::ID_FIELD, b)));

    let columns = keys
        .into_iter()
        .map(|key| Column::text(key.as_str(), key.as_str()).sortable())
        .collect();
    TableConfiguration::new(columns).searchable("Buscar...").show_info()
}

/// Row ids on the command line are JSON scalars; anything else is text.
fn parse_row_id(id: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(id) {
        Ok(json @ (serde_json::Value::Number(_) | serde_json::Value::String(_))) => Value::from(json),
        _ => Value::from(id),
    }
}

fn build_table(
    records: Vec<Row>,
    config: Option<TableConfiguration>,
    interaction: &Interaction,
    busy: Option<&str>,
) -> Result<DynamicTable, CliError> {
    let config = match config {
        Some(config) => {
            config.validate()?;
            config
        }
        None => infer_configuration(&records),
    };

    let mut table = DynamicTable::with_records(config, records);
    table.set_busy_row_id(busy.map(parse_row_id));
    interaction.apply(&mut table);
    Ok(table)
}

fn print_table(table: &mut DynamicTable) -> Result<(), CliError> {
    println!("{}", render::render_table(table));

    let events = table.drain_events();
    if !events.is_empty() {
        let events = render::render_events(&events).map_err(|e| CliError::Service(e.to_string()))?;
        println!();
        println!("{}", events);
    }
    Ok(())
}

fn session_store(paths: Option<&AppPaths>) -> Arc<dyn SessionStore> {
    match paths {
        Some(paths) => Arc::new(FileSessionStore::new(paths.session_file())),
        None => {
            log::warn!("No data directory, the session will not be kept");
            Arc::new(MemorySessionStore::new())
        }
    }
}

async fn fetch_insurers(api_url: &str, store: Arc<dyn SessionStore>) -> Result<Vec<Row>, CliError> {
    let client = AlfaClient::builder()
        .url(api_url)
        .build()
        .user_facing()
        .map_err(CliError::Service)?;

    let auth = Arc::new(AuthService::new(client.clone(), store));
    if !auth.is_authenticated() {
        let (Ok(user), Ok(password)) = (std::env::var(USER_VAR), std::env::var(PASSWORD_VAR)) else {
            return Err(CliError::MissingCredentials);
        };
        if !auth.login(&Credentials::new(user, password)).await {
            return Err(CliError::LoginFailed);
        }
    }

    let insurers = InsurerService::new(client.with_token_provider(auth))
        .list(false)
        .await
        .user_facing()
        .map_err(CliError::Service)?;
    Ok(insurers.iter().map(Row::from).collect())
}

async fn run(cli: Cli, paths: Option<AppPaths>, settings: Settings) -> Result<(), CliError> {
    match cli.command {
        Commands::Table {
            records,
            config,
            interaction,
            busy,
        } => {
            let rows: Vec<Row> = read_json(&records)?;
            let config = config.map(|path| read_json(&path)).transpose()?;
            let mut table = build_table(rows, config, &interaction, busy.as_deref())?;
            print_table(&mut table)
        }
        Commands::Insurers {
            url,
            sample,
            interaction,
        } => {
            let (rows, config) = if sample {
                (screens::sample_insurers(), screens::insurers(settings.page_size))
            } else {
                let url = url.as_deref().unwrap_or(&settings.api_url);
                let rows = fetch_insurers(url, session_store(paths.as_ref())).await?;
                (rows, screens::insurer_directory(settings.page_size))
            };
            let mut table = build_table(rows, Some(config), &interaction, None)?;
            print_table(&mut table)
        }
        Commands::Logout => {
            session_store(paths.as_ref())
                .clear()
                .map_err(|e| CliError::Service(e.to_string()))?;
            println!("Sesión cerrada");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    let paths = AppPaths::resolve();
    init_logging(paths.as_ref());

    let settings = match Settings::load(paths.as_ref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(cli, paths, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use alfa_grid::TableEvent;

    use super::*;

    fn records() -> Vec<Row> {
        serde_json::from_str(
            r#"[
                {"id": 1, "nombre": "Mapfre", "monto": 20},
                {"id": 2, "nombre": "Allianz", "monto": 1500},
                {"id": 3, "nombre": "Zurich", "monto": 7}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "alfa", "table", "rows.json", "--sort", "nombre", "--sort", "nombre", "--action", "delete:2",
        ])
        .unwrap();
        let Commands::Table { interaction, .. } = cli.command else {
            panic!("expected the table command");
        };
        assert_eq!(interaction.sort, vec!["nombre", "nombre"]);
        assert_eq!(interaction.actions, vec![("delete".to_string(), 2)]);

        assert!(Cli::try_parse_from(["alfa", "table", "rows.json", "--action", "delete"]).is_err());
    }

    #[test]
    fn test_infer_configuration() {
        let config = infer_configuration(&records());
        let keys: Vec<&str> = config.columns.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["id", "monto", "nombre"]);
        assert!(config.columns.iter().all(|c| c.sortable));
        assert!(config.validate().is_ok());

        assert!(infer_configuration(&[]).columns.is_empty());
    }

    #[test]
    fn test_parse_row_id() {
        assert_eq!(parse_row_id("3"), Value::Int(3));
        assert_eq!(parse_row_id("#SO-00003"), Value::from("#SO-00003"));
        assert_eq!(parse_row_id("\"7\""), Value::from("7"));
    }

    #[test]
    fn test_build_table_replays_interactions() {
        let interaction = Interaction {
            sort: vec!["nombre".into()],
            select: vec![0],
            actions: vec![("delete".into(), 1)],
            ..Default::default()
        };
        let mut table = build_table(records(), None, &interaction, Some("2")).unwrap();

        assert_eq!(table.view_rows()[0].value("nombre"), &Value::from("Allianz"));
        assert!(table.is_selected(0));

        let kinds: Vec<&str> = table.drain_events().iter().map(TableEvent::kind).collect();
        assert_eq!(kinds, vec!["sortChanged", "selectionChanged", "rowAction"]);
    }

    #[test]
    fn test_build_table_rejects_invalid_configuration() {
        let config = TableConfiguration::new(vec![Column::text("id", "ID"), Column::text("id", "Otra")]);
        let result = build_table(records(), Some(config), &Interaction::default(), None);
        assert!(matches!(result, Err(CliError::Config(_))));
    }
}
