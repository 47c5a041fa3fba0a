use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ghe_inventory::formatter::inventory_report_markdown;
use ghe_inventory::github::GitHubClient;
use ghe_inventory::services::{ConfigOverrides, InventoryService, TracingProgress, resolve_config};
use ghe_inventory::types::ApiVersion;

#[derive(Parser)]
#[command(name = "ghe-inventory-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lists every repository visible to a token on a GitHub Enterprise instance")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Output format for results - markdown for reading, json for programmatic use
    #[arg(long, global = true, default_value = "markdown")]
    format: OutputFormat,
    /// Path to a TOML config file (default: <config dir>/ghe-inventory/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// List repositories across organizations
    List {
        /// Which GitHub API version to use: 3 (REST API) or 4 (GraphQL). Defaults to 3
        #[arg(long)]
        api_version: Option<u8>,
        /// GitHub PAT with scopes ['read:org', 'repo:read'] (can also be set via GITHUB_TOKEN)
        #[arg(long)]
        token: Option<String>,
        /// GitHub Enterprise url, without the API path (can also be set via GITHUB_URL)
        #[arg(long)]
        url: Option<String>,
        /// Only list this organization
        #[arg(long)]
        org: Option<String>,
        /// Request timeout in seconds for GitHub API calls (default: 30 seconds)
        #[arg(long)]
        request_timeout: Option<u64>,
        /// With API version 4, also list the repositories the viewer owns
        #[arg(long)]
        include_viewer: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install the rustls crypto provider before any client is built
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("ghe_inventory=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            api_version,
            token,
            url,
            org,
            request_timeout,
            include_viewer,
        } => {
            let config = resolve_config(ConfigOverrides {
                token,
                url,
                organization: org,
                api_version,
                request_timeout_secs: request_timeout,
                include_viewer,
                config_path: cli.config,
            })
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

            let client = GitHubClient::from_config(&config)
                .map_err(|e| anyhow::anyhow!("Failed to create client: {:#}", e))?;

            match config.api_version {
                ApiVersion::V3 => println!("---- Using API Client v3 ----"),
                ApiVersion::V4 => println!("---- Using API Client v4 ----"),
            }

            let progress = TracingProgress;
            let report = InventoryService::new(&client, &progress).run(&config).await;

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                OutputFormat::Markdown => {
                    println!("{}", inventory_report_markdown(&report));
                }
            }
        }
    }

    Ok(())
}
