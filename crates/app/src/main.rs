//! giftdraw - secret gift exchange draws
//!
//! Terminal front end: build a roster, draw, hand out codes, then let each
//! person redeem their own code on the same machine.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use giftdraw_core::{Database, SessionController};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod clipboard;
mod config;
mod printer;
mod state;
mod terminal;

use config::Config;

#[derive(Parser)]
#[command(name = "giftdraw")]
#[command(about = "Draw secret gift exchange pairs and reveal them by code")]
struct Cli {
    #[arg(long, help = "Path to a TOML config file")]
    config: Option<PathBuf>,
    #[arg(long, help = "SQLite file holding the draw (overrides the config)")]
    database: Option<PathBuf>,
    #[arg(long, help = "Verbose logging", default_value_t = false)]
    verbose: bool,
}

fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref());
    let default_filter = match (&config, cli.verbose) {
        (_, true) => "debug".to_string(),
        (Ok(config), false) => config.log_filter().to_string(),
        (Err(_), false) => "info".to_string(),
    };
    init_logging(&default_filter);

    tracing::info!("Starting giftdraw");

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = match &cli.database {
        Some(path) => path.clone(),
        None => config.database_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::open(&db_path)?;
    match db.sessions().written_at(giftdraw_core::SESSION_KEY) {
        Ok(Some(written_at)) => {
            tracing::info!(%written_at, "Found a draw from an earlier session");
        }
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Could not read when the stored draw was written"),
    }

    let stdin = io::stdin();
    let mut console = terminal::Console::new(stdin.lock(), io::stdout());
    let mut session = SessionController::start_or_recover(db, &mut console)?;

    let mut term = terminal::Terminal::new(
        console,
        Box::new(clipboard::SystemClipboard::detect()),
        printer::FilePrinter::new(config.print_dir()?),
        config.copied_indicator(),
    );

    term.run(&mut session)?;
    tracing::info!("Exiting giftdraw");
    Ok(())
}
