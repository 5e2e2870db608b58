use clap::Parser;
use eyre::{Result, eyre};
use std::io;
use std::path::PathBuf;
use todostore::{Config, Session, SessionOptions, TaskStore};

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - Interactive in-memory to-do list")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file (default: <config dir>/todostore/todostore.yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace (overrides config)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Print views as JSON lines
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    // Setup tracing on stderr so it never mixes with the rendered view
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    let level: tracing::Level = level.parse().map_err(|_| eyre!("Invalid log level: {}", level))?;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if cli.no_color || !config.color {
        colored::control::set_override(false);
    }

    let options = SessionOptions {
        json: cli.json,
        confirm_delete: config.confirm_delete,
    };
    let mut session = Session::new(TaskStore::with_config(&config), io::stdin().lock(), io::stdout().lock(), options);
    session.run()
}
