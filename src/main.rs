use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use tooltrack::app::{App, Column};
use tooltrack::config::{Config, StorageBackend};
use tooltrack::domain::{Tool, ToolData, ToolStatus};
use tooltrack::i18n::Language;
use tooltrack::intake::IntakeParser;
use tooltrack::llm::GeminiClient;
use tooltrack::server::{self, ToolTable};
use tooltrack::storage::{LocalStorage, LocalToolStore, RemoteToolStore, ToolStore};
use tooltrack::ToolTrackError;

/// Send `log` and `tracing` output to `<data_local_dir>/tooltrack/logs/tooltrack.log`,
/// filtered by `RUST_LOG`; stdout stays free for the board.
fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(env!("CARGO_PKG_NAME"))
        .join("logs");
    fs::create_dir_all(&log_dir).context(format!("Failed to create {}", log_dir.display()))?;

    let log_file = log_dir.join(concat!(env!("CARGO_PKG_NAME"), ".log"));
    let sink = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .context(format!("Failed to open {}", log_file.display()))?;

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(sink)))
        .init();

    info!("tooltrack {} logging to {}", env!("CARGO_PKG_VERSION"), log_file.display());
    Ok(())
}

fn build_store(config: &Config, prefs: &LocalStorage) -> Result<Arc<dyn ToolStore>> {
    match config.storage.backend {
        StorageBackend::Local => Ok(Arc::new(LocalToolStore::open(prefs.clone()))),
        StorageBackend::Remote => {
            let store = RemoteToolStore::new(&config.storage.remote_url, config.storage.timeout())
                .context("Failed to set up remote tool store")?;
            Ok(Arc::new(store))
        }
    }
}

async fn build_app(config: &Config) -> Result<App> {
    let prefs = LocalStorage::new(&config.storage.data_dir).context("Failed to open local storage")?;
    let store = build_store(config, &prefs)?;
    let mut app = App::new(store, prefs);
    if let Some(language) = config.language {
        app = app.with_default_language(language);
    }
    app.load().await;
    Ok(app)
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
        println!("  Storage backend: {:?}", config.storage.backend);
    }

    match &cli.command {
        None | Some(Commands::List) => handle_list_command(config).await,
        Some(Commands::Add {
            name,
            code,
            description,
            holder,
            location,
        }) => {
            let mut data = ToolData::new(name, code);
            data.description = description.clone();
            data.current_holder = holder.clone();
            data.current_location = location.clone();
            handle_add_command(data, config).await
        }
        Some(Commands::Edit {
            id,
            name,
            code,
            description,
            holder,
            location,
            status,
        }) => {
            let edits = ToolEdits {
                name: name.clone(),
                code: code.clone(),
                description: description.clone(),
                holder: holder.clone(),
                location: location.clone(),
                status: *status,
            };
            handle_edit_command(id, edits, config).await
        }
        Some(Commands::Move { id, direction }) => {
            let mut app = build_app(config).await?;
            let before = app.get(id).map(|t| t.status);
            let tool = app.move_tool(id, *direction).await?;
            if before == Some(tool.status) {
                println!("{} {} stays {}", "Unchanged:".yellow(), tool.name, status_label(&app, tool.status));
            } else {
                println!("{} {} -> {}", "Moved:".green(), tool.name, status_label(&app, tool.status));
            }
            Ok(())
        }
        Some(Commands::Delete { id }) => {
            let mut app = build_app(config).await?;
            app.delete(id).await?;
            println!("{} {}", "Deleted:".red(), id);
            Ok(())
        }
        Some(Commands::Intake { text }) => handle_intake_command(&text.join(" "), config).await,
        Some(Commands::Lang { language }) => handle_lang_command(*language, config).await,
        Some(Commands::Serve { host, port, database }) => {
            let mut server_config = config.server.clone();
            if let Some(host) = host {
                server_config.host = host.clone();
            }
            if let Some(port) = port {
                server_config.port = *port;
            }
            if let Some(database) = database {
                server_config.database = database.clone();
            }
            handle_serve_command(server_config).await
        }
    }
}

/// Field overrides from `edit`; an empty string clears an optional field once the store normalizes it
struct ToolEdits {
    name: Option<String>,
    code: Option<String>,
    description: Option<String>,
    holder: Option<String>,
    location: Option<String>,
    status: Option<ToolStatus>,
}

impl ToolEdits {
    fn apply(self, mut tool: Tool) -> Tool {
        if let Some(name) = self.name {
            tool.name = name;
        }
        if let Some(code) = self.code {
            tool.inventory_code = code;
        }
        if let Some(description) = self.description {
            tool.description = Some(description);
        }
        if let Some(holder) = self.holder {
            tool.current_holder = Some(holder);
        }
        if let Some(location) = self.location {
            tool.current_location = Some(location);
        }
        if let Some(status) = self.status {
            tool.status = status;
        }
        tool
    }
}

fn status_label(app: &App, status: ToolStatus) -> &'static str {
    app.language().strings().status_title(status)
}

fn print_board(app: &App) {
    let strings = app.language().strings();
    println!("{}", strings.app_title.bold());

    for Column { status, title, tools } in app.columns() {
        let heading = format!("{} ({})", title, tools.len());
        let heading = match status {
            ToolStatus::InStock => heading.green(),
            ToolStatus::Issued => heading.yellow(),
            ToolStatus::InRepair => heading.red(),
        };
        println!();
        println!("{}", heading.bold());

        if tools.is_empty() {
            println!("  {}", strings.no_tools_here.dimmed());
            continue;
        }
        for tool in tools {
            print_tool(app.language(), tool);
        }
    }
}

fn print_tool(language: Language, tool: &Tool) {
    let strings = language.strings();
    println!("  {} [{}]  {}", tool.name.bold(), tool.inventory_code, tool.id.dimmed());
    if let Some(description) = &tool.description {
        println!("      {}", description);
    }
    if let Some(holder) = &tool.current_holder {
        println!("      {} {}", strings.holder_label.cyan(), holder);
    }
    if let Some(location) = &tool.current_location {
        println!("      {} {}", strings.location_label.cyan(), location);
    }
}

async fn handle_list_command(config: &Config) -> Result<()> {
    info!("Listing tools");
    let app = build_app(config).await?;
    print_board(&app);
    Ok(())
}

async fn handle_add_command(data: ToolData, config: &Config) -> Result<()> {
    info!("Adding tool: {} ({})", data.name, data.inventory_code);
    let mut app = build_app(config).await?;
    let tool = app.create(data).await?;
    println!("{} {}", "Added:".green(), tool.id);
    print_tool(app.language(), &tool);
    Ok(())
}

async fn handle_edit_command(id: &str, edits: ToolEdits, config: &Config) -> Result<()> {
    info!("Editing tool: {}", id);
    let mut app = build_app(config).await?;
    let tool = app
        .get(id)
        .cloned()
        .ok_or_else(|| ToolTrackError::ToolNotFound(id.to_string()))?;
    let updated = app.update(edits.apply(tool)).await?;
    println!("{} {}", "Updated:".green(), updated.id);
    print_tool(app.language(), &updated);
    Ok(())
}

async fn handle_intake_command(text: &str, config: &Config) -> Result<()> {
    info!("Natural-language intake: {}", text);
    let client = GeminiClient::new(config.llm.gemini()).context("Natural-language intake is unavailable")?;
    let mut app = build_app(config).await?.with_intake(IntakeParser::new(Arc::new(client)));

    println!("{}", app.language().strings().parsing.dimmed());
    match app.add_from_prompt(text).await {
        Ok(tool) => {
            println!("{} {}", "Added:".green(), tool.id);
            print_tool(app.language(), &tool);
            Ok(())
        }
        Err(ToolTrackError::Intake(e)) => {
            // Echo the input so it can be rephrased and retried
            println!("  > {}", text);
            Err(eyre::eyre!(e.message))
        }
        Err(e) => Err(e.into()),
    }
}

async fn handle_lang_command(language: Option<Language>, config: &Config) -> Result<()> {
    let mut app = build_app(config).await?;
    match language {
        Some(language) => {
            app.set_language(language).context("Failed to save language")?;
            println!("{} {}", "Language:".green(), language);
        }
        None => println!("{}", app.language()),
    }
    Ok(())
}

async fn handle_serve_command(server_config: tooltrack::config::ServerConfig) -> Result<()> {
    let addr = server_config.resolve_addr().await?;
    if let Some(parent) = server_config.database.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        log::warn!("Could not create database directory {}: {}", parent.display(), e);
    }

    info!("Serving tools from {}", server_config.database.display());
    println!("{} http://{}/api/tools", "Serving:".cyan(), addr);
    let table = Arc::new(ToolTable::file(&server_config.database));
    server::serve(addr, table).await.context("Tool API server failed")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("Config override: {:?}", cli.config);

    run_application(&cli, &config).await.context("Application failed")
}
