use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use ledger_cli::config::{paths::LedgerPaths, settings::Settings};
use ledger_cli::logging;
use ledger_cli::storage::{init::initialize_storage, Storage};
use ledger_cli::tui::run_tui;

#[derive(Parser)]
#[command(
    name = "ledger",
    version,
    about = "Terminal-based double-entry bookkeeping",
    long_about = "ledger-cli is a modal, vim-style terminal application for \
                  double-entry bookkeeping. Every entry must balance to zero \
                  before it is stored."
)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI (default)
    #[command(alias = "ui")]
    Tui,

    /// Create the data directory and seed default ledgers and journals
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    paths.ensure_directories()?;
    let _log_guard = logging::init(&paths, cli.verbose)?;
    let settings = Settings::load_or_create(&paths)?;

    tracing::info!(base_dir = %paths.base_dir().display(), "ledger-cli starting");

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let storage = if paths.is_initialized() {
                Storage::open(paths.clone())?
            } else {
                let storage = initialize_storage(&paths)?;
                settings.save(&paths)?;
                storage
            };
            run_tui(Arc::new(storage), Arc::new(settings))?;
        }
        Commands::Init => {
            println!("Initializing ledger-cli at: {}", paths.base_dir().display());
            let storage = initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!(
                "{} ledger(s) and {} journal(s) are available.",
                storage.ledgers.count()?,
                storage.journals.count()?
            );
            println!("Run 'ledger' to launch the interactive interface.");
        }
        Commands::Config => {
            println!("ledger-cli Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Log directory:    {}", paths.log_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:    {}", settings.currency_symbol);
            println!("  Date format:        {}", settings.date_format);
            println!("  Tick rate:          {} ms", settings.tick_rate_ms);
            println!("  Notification time:  {} s", settings.notification_secs);
        }
    }

    Ok(())
}
