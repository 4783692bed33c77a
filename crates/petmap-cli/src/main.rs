mod account;
mod browse;
mod console;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use petmap_client::ApiClient;
use petmap_core::CategoryKey;
use tracing_subscriber::EnvFilter;

use account::ProfileCommands;
use browse::FilterOptions;

#[derive(Debug, Parser)]
#[command(name = "petmap")]
#[command(about = "Find pet-friendly facilities by district, category or search")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List districts and their keys
    Districts,
    /// Browse facilities by district and category
    Filter {
        /// District key (e.g. Gangnam-gu); omit for all districts
        #[arg(long, conflicts_with = "near_me")]
        district: Option<String>,
        /// Use the device location instead of a district
        #[arg(long)]
        near_me: bool,
        /// Category key; repeat for several (e.g. --category hospital --category cafe)
        #[arg(long = "category")]
        categories: Vec<CategoryKey>,
        /// Narrow the result by name, district or address
        #[arg(long)]
        query: Option<String>,
    },
    /// Free-text search around the device location
    Search { query: String },
    /// Show one facility in detail
    Facility { id: String },
    /// Log in and print a bearer token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "PETMAP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, env = "PETMAP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Manage the logged-in account
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = petmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, base_url = %config.api_base_url, "configuration loaded");

    let client = Arc::new(ApiClient::from_config(&config)?);

    match cli.command {
        Commands::Districts => browse::run_districts(&client, cli.json).await,
        Commands::Filter {
            district,
            near_me,
            categories,
            query,
        } => {
            let options = FilterOptions {
                district,
                near_me,
                categories,
                query,
            };
            browse::run_filter(&config, client, options, cli.json).await
        }
        Commands::Search { query } => browse::run_search(&config, client, query, cli.json).await,
        Commands::Facility { id } => browse::run_facility(&client, id, cli.json).await,
        Commands::Login { username, password } => {
            account::run_login(&client, &username, &password).await
        }
        Commands::Register { username, password } => {
            account::run_register(&client, &username, &password).await
        }
        Commands::Profile { command } => account::run_profile(&client, command, cli.json).await,
    }
}
