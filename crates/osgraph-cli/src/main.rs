// Command-line host for the OSGraph query controller

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use osgraph_app::{ControllerProps, ExecutionOutcome, QueryController};
use osgraph_http::HttpQueryService;
use tracing_subscriber::EnvFilter;

mod config;
mod host;

use config::CliConfig;
use host::ConsoleHost;

#[derive(Parser)]
#[command(name = "osgraph")]
#[command(about = "OSGraph - Open-source project graph queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults to ~/.osgraph/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Analytics service URL, overriding the config file
    #[arg(long, env = "OSGRAPH_API_URL", global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the query families the service offers
    Families,

    /// Search for targets of a family
    Search {
        /// Keyword to search for
        keyword: String,

        /// Family whose index is searched
        #[arg(short, long)]
        family: Option<String>,
    },

    /// Execute a family's template against a target
    Query {
        /// Target id (or name, for indexes keyed by name)
        target: String,

        /// Family to execute
        #[arg(short, long)]
        family: Option<String>,

        /// Search first so the result carries the target's display name
        #[arg(short, long)]
        keyword: Option<String>,

        /// Emit the embedded-host envelope
        #[arg(long)]
        embedded: bool,

        /// Pretty-print the result
        #[arg(long)]
        pretty: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.http.base_url = url;
    }
    tracing::debug!(base_url = %config.http.base_url, "analytics service");

    let services = Arc::new(
        HttpQueryService::new(config.http.clone()).context("Failed to create API client")?,
    );

    match cli.command {
        Commands::Families => {
            let controller = QueryController::builder(services)
                .with_config(config.controller)
                .build();
            controller.mount().await?;

            for family in controller.snapshot().selection.catalog {
                println!(
                    "{:<18} {:<22} template {:<4} {}",
                    family.family_id, family.query_source, family.template_id, family.display_name
                );
            }
        }

        Commands::Search { keyword, family } => {
            let controller = QueryController::builder(services)
                .with_config(config.controller)
                .build();
            controller.mount().await?;
            if let Some(family) = family {
                controller.select_family(&family).await?;
            }
            controller.search_now(&keyword).await?;

            let selection = controller.snapshot().selection;
            for hit in &selection.search_results {
                println!("{:<14} {}", hit.id, hit.name);
            }
            if selection.search_results.is_empty() {
                eprintln!("no {} matches for '{keyword}'", selection.query_source);
            }
        }

        Commands::Query {
            target,
            family,
            keyword,
            embedded,
            pretty,
        } => {
            let controller = QueryController::builder(services)
                .with_host(Arc::new(ConsoleHost { pretty }))
                .with_config(config.controller)
                .with_props(ControllerProps {
                    embedded_mode: embedded,
                    ..Default::default()
                })
                .build();
            controller.mount().await?;
            if let Some(family) = family {
                controller.select_family(&family).await?;
            }
            if let Some(keyword) = keyword {
                controller.search_now(&keyword).await?;
            }

            match controller.select_target(&target).await? {
                ExecutionOutcome::Dispatched(_) => {}
                ExecutionOutcome::Failed { message } => {
                    anyhow::bail!("query failed: {}", message.unwrap_or_else(|| "no result".into()))
                }
                ExecutionOutcome::Skipped => anyhow::bail!("target must not be empty"),
                ExecutionOutcome::Superseded => {}
            }
            controller.unmount();
        }
    }

    Ok(())
}
