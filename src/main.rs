use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use worldchat::Config;
use worldchat::prompts::ResourceUrls;

#[derive(Parser)]
#[command(name = "worldchat")]
#[command(version)]
#[command(about = "Chat with an LLM world-building assistant", long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Origin the resource-listing URLs are built from
    #[arg(long, global = true)]
    origin: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rendered bootstrap prompt
    Prompt,
    /// Print the config file location
    ConfigPath,
    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Logs go to a file because the terminal belongs to the chat UI.
fn init_logging(verbose: bool) -> Result<PathBuf> {
    let log_dir = dirs::data_local_dir()
        .context("Could not determine data directory")?
        .join("worldchat");
    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_path = log_dir.join("worldchat.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let default_filter = if verbose { "worldchat=debug" } else { "worldchat=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(log_path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    match cli.command {
        Some(Commands::ConfigPath) => {
            println!("{}", config_path.display());
            return Ok(());
        }
        Some(Commands::InitConfig { force }) => {
            Config::write_default(&config_path, force)?;
            println!("Wrote {}", config_path.display());
            return Ok(());
        }
        Some(Commands::Prompt) => {
            let mut config = Config::load(Some(&config_path))?;
            if let Some(origin) = cli.origin {
                config.origin = origin;
            }
            let urls = ResourceUrls::from_origin(&config.origin);
            println!("{}", config.prompt_template()?.render(&urls));
            return Ok(());
        }
        None => {}
    }

    let log_path = init_logging(cli.verbose)?;
    tracing::info!(log = %log_path.display(), config = %config_path.display(), "worldchat starting");

    let mut config = Config::load(Some(&config_path))?;
    if let Some(origin) = cli.origin {
        config.origin = origin;
    }

    worldchat::app::run(config).await
}
