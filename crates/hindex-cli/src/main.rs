mod cli;
mod commands;
mod terminal;

use clap::Parser;
use cli::{Cli, Commands};
use hindex_cache::{MemorySlots, SlotDb, SlotStore};
use hindex_core::{Config, Outcome, StateStore, STORAGE_KEY};
use hindex_tui::{run_tui, App};
use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;
use terminal::TerminalPrompter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Tui);

    init_logging(command == Commands::Tui)?;

    // CLI > Env > File > Defaults; clap already merged the first two
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(db) = &cli.db {
        config.storage.db_path = Some(db.clone());
    }

    match command {
        Commands::Tui => {
            let store = open_store(&cli, &config)?;
            let app = run_tui(App::new(store, &config))?;
            tracing::info!("Leaving TUI on collection {:?}", app.store.current());
        }
        Commands::Serve { bind, root } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let root = root.unwrap_or_else(|| config.server.root.clone());
            hindex_server::serve(&bind, &root).await?;
        }
        Commands::Config { init } => show_config(&cli, &config, init)?,
        Commands::Info => show_info(&cli, &config)?,
        other => {
            let mut store = open_store(&cli, &config)?;
            let assume_yes = matches!(
                other,
                Commands::Clear { yes: true } | Commands::DeleteCollection { yes: true, .. }
            );
            let prompter = TerminalPrompter::new(assume_yes);
            let mut stdout = std::io::stdout().lock();

            let outcome = commands::run(&other, &mut store, &config, &prompter, &mut stdout)?;
            if outcome == Some(Outcome::Rejected) {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Logs go to stderr, except under the TUI where they'd draw over the screen
fn init_logging(to_file: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "hindex=info".into());

    if to_file {
        let dir = Config::data_dir()?;
        std::fs::create_dir_all(&dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("hindex.log"))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn open_store(cli: &Cli, config: &Config) -> anyhow::Result<StateStore> {
    let slots: Box<dyn SlotStore> = if cli.ephemeral {
        tracing::debug!("Using in-memory storage");
        Box::new(MemorySlots::new())
    } else {
        let path = config.storage.resolved_db_path()?;
        tracing::debug!("Opening {}", path.display());
        Box::new(SlotDb::new(&path)?)
    };

    Ok(StateStore::open(slots)?)
}

fn show_config(cli: &Cli, config: &Config, init: bool) -> anyhow::Result<()> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };

    if init {
        if path.exists() {
            anyhow::bail!("{} already exists", path.display());
        }
        Config::default().save_to(&path)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn show_info(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    println!("hindex {}", env!("CARGO_PKG_VERSION"));
    if cli.ephemeral {
        println!("Storage:    in memory");
        return Ok(());
    }

    let path = config.storage.resolved_db_path()?;
    println!("Database:   {}", path.display());
    if !path.exists() {
        println!("            (not created yet)");
        return Ok(());
    }

    let db = SlotDb::new(&path)?;
    match db.updated_at(STORAGE_KEY)? {
        Some(at) => println!("Last saved: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("Last saved: never"),
    }
    println!("Keys:       {}", db.keys()?.join(", "));

    // Reading doesn't seed or migrate anything on disk
    let state = StateStore::load(&db);
    println!("Active:     {}", state.current());
    for collection in state.collections() {
        println!("  {} ({})", collection.name, collection.articles.len());
    }
    Ok(())
}
