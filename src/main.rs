use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use venue_assist::cli::{CommandContext, DEFAULT_CATALOG_PATH};

#[derive(Parser)]
#[command(name = "venue-assist")]
#[command(
    version,
    about = "Venue recommendations and summaries over a retry-bounded generation client"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, help = "Config file (skips global/project lookup)")]
    config: Option<PathBuf>,

    #[arg(long)]
    verbose: bool,

    #[arg(long, short)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the recommendation assistant
    Chat {
        #[arg(long, default_value = DEFAULT_CATALOG_PATH, help = "Venue catalog (JSON array)")]
        catalog: PathBuf,
    },

    /// Summarize one or more venues
    Summary {
        #[arg(long, default_value = DEFAULT_CATALOG_PATH, help = "Venue catalog (JSON array)")]
        catalog: PathBuf,
        #[arg(long = "venue", required = true, help = "Venue id (repeatable)")]
        venues: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize project configuration
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mvenue-assist encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Chat { catalog } => {
            let ctx = CommandContext::load(config_path)?;
            let rt = Runtime::new()?;
            rt.block_on(venue_assist::cli::commands::chat::run(ctx, &catalog))?;
        }
        Commands::Summary { catalog, venues } => {
            let ctx = CommandContext::load(config_path)?;
            let rt = Runtime::new()?;
            rt.block_on(venue_assist::cli::commands::summary::run(
                ctx, &catalog, &venues,
            ))?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                venue_assist::cli::commands::config::show(config_path, &format)?;
            }
            ConfigAction::Path => {
                venue_assist::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                venue_assist::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
