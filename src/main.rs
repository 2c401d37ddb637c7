//! CLI entry point for prismo

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prismo")]
#[command(version)]
#[command(about = "A static blog generator backed by a hosted headless CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate static files from the CMS
    #[command(alias = "g")]
    Generate,

    /// Start a preview server with fallback rendering
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Skip regenerating before serving
        #[arg(long)]
        no_generate: bool,
    },

    /// Clean the public folder
    Clean,

    /// List every post in the CMS repository
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up PRISMIC_* variables from a local .env when present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "prismo=debug,info"
    } else {
        "prismo=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(cwd) => cwd,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Generate => {
            let prismo = prismo::Prismo::new(&base_dir)?;
            tracing::info!("Generating static files...");
            prismo::commands::generate::run(&prismo).await?;
            println!("Generated successfully!");
        }

        Commands::Server {
            port,
            ip,
            no_generate,
        } => {
            let prismo = prismo::Prismo::new(&base_dir)?;

            if !no_generate {
                tracing::info!("Generating static files...");
                prismo::commands::generate::run(&prismo).await?;
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            prismo::server::start(&prismo, &ip, port).await?;
        }

        Commands::Clean => {
            let prismo = prismo::Prismo::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            prismo.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let prismo = prismo::Prismo::new(&base_dir)?;
            prismo::commands::list::run(&prismo).await?;
        }

        Commands::Version => {
            println!("prismo version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
