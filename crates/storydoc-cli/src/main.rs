use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use storydoc_infrastructure::{ConfigLoader, ConfigOverrides};
use storydoc_interaction::HttpGateway;

mod commands;
mod logging;
mod presenter;

#[derive(Parser)]
#[command(name = "storydoc")]
#[command(
    about = "StoryDoc - upload user stories and a database schema, then generate a document",
    long_about = None
)]
struct Cli {
    /// Base URL of the generation service (overrides API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Fail gateway calls after this many seconds (0 = no deadline)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Log filter, e.g. "info" or "storydoc_application=debug"
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload the given files and generate the document in one go
    Run {
        /// Name sent with the generate request
        #[arg(long)]
        name: Option<String>,

        /// User story files (.txt, .md, .json, .csv), uploaded in order
        #[arg(long = "stories", required = true, num_args = 1..)]
        stories: Vec<PathBuf>,

        /// Database schema file (.sql, .json, .yaml, .txt)
        #[arg(long)]
        schema: PathBuf,

        /// Directory the generated document is saved into
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Also print the generated document
        #[arg(long)]
        preview: bool,
    },
    /// Interactive session
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        base_url: cli.base_url,
        timeout_secs: cli.timeout_secs,
        log_level: cli.log_level,
    };
    let config = ConfigLoader::from_process()
        .load(&overrides)
        .context("Invalid configuration")?;
    logging::init(&config.log_level);

    let gateway = Arc::new(
        HttpGateway::with_timeout(config.endpoints.clone(), config.timeout)
            .context("Failed to set up HTTP gateway")?,
    );
    tracing::info!(base_url = config.endpoints.base_url(), "storydoc starting");

    match cli.command {
        Commands::Run {
            name,
            stories,
            schema,
            output,
            preview,
        } => {
            commands::run::run(
                gateway,
                commands::run::RunArgs {
                    name: name.unwrap_or_default(),
                    stories,
                    schema,
                    output,
                    preview,
                },
            )
            .await?
        }
        Commands::Shell => commands::shell::run(gateway).await?,
    }

    Ok(())
}
