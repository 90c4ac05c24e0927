//! Training Notebook CLI
//!
//! Command-line interface for the notebook API:
//! - List sets as a table
//! - Add, show, update and delete sets
//! - Import sets from CSV
//! - Check status

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use training_notebook::api::dto::HealthResponse;
use training_notebook::api::error::ErrorResponse;
use training_notebook::client::{render, sets_url, HttpSetSource, SetList};
use training_notebook::config::{generate_default_config, Config};
use training_notebook::sets::{NewSet, Set, SetId};
use training_notebook::{import, logging};

/// Log level when neither the config file nor the environment sets one
const CLI_LOG_LEVEL: &str = "warn";

#[derive(Parser)]
#[command(name = "notebook")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Training notebook: track workout sets")]
#[command(long_about = "Training notebook keeps a list of workout sets.\nEach set records a movement, its volume and its intensity.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL (default: client.api_url from config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (table, html, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all sets
    List,

    /// Add a set
    Add {
        /// Movement name, e.g. "Bench Press"
        movement: String,
        /// Volume (repetitions)
        volume: f64,
        /// Intensity, up to 100
        intensity: f64,
    },

    /// Show one set
    Get {
        /// Set id
        id: SetId,
    },

    /// Replace a set's values
    Update {
        /// Set id
        id: SetId,
        movement: String,
        volume: f64,
        intensity: f64,
    },

    /// Delete a set
    Delete {
        /// Set id
        id: SetId,
    },

    /// Import sets from CSV (movement, volume, intensity columns)
    Import {
        /// Path to CSV file
        path: PathBuf,
        /// Dry run (don't actually import)
        #[arg(long)]
        dry_run: bool,
    },

    /// Show system status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, report) = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.client.api_url = url;
    }

    // Quiet unless a level was configured; RUST_LOG still wins
    config
        .logging
        .level
        .get_or_insert_with(|| CLI_LOG_LEVEL.to_string());
    logging::init(&config.logging).context("Failed to initialize logging")?;
    report.log();

    let api_url = config.client.api_url.trim_end_matches('/').to_string();
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_millis(config.client.request_timeout_ms))
        .build()?;

    match cli.command {
        Commands::List => {
            let source = HttpSetSource::from_config(&config.client)?;
            let list = SetList::new(Arc::new(source));

            // Fetch failures are logged by the list and leave it empty
            list.mount().await;

            match cli.format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&list.rows().await)?);
                }
                "html" => {
                    println!("{}", render::page_html(&list.render_html().await));
                }
                _ => {
                    if !list.state().await.is_loaded() {
                        eprintln!("Could not load sets from {}", sets_url(&api_url));
                    }
                    print!("{}", list.render_text().await);
                }
            }
        }

        Commands::Add {
            movement,
            volume,
            intensity,
        } => {
            let set = NewSet::new(movement, volume, intensity);
            let response = client.post(sets_url(&api_url)).json(&set).send().await?;

            let created: Set = read_json(response).await?;
            println!("Added set {}: {}", created.id, describe(&created));
        }

        Commands::Get { id } => {
            let response = client
                .get(format!("{}/{}", sets_url(&api_url), id))
                .send()
                .await?;

            let set: Set = read_json(response).await?;
            print_set(&set, &cli.format)?;
        }

        Commands::Update {
            id,
            movement,
            volume,
            intensity,
        } => {
            let set = NewSet::new(movement, volume, intensity);
            let response = client
                .put(format!("{}/{}", sets_url(&api_url), id))
                .json(&set)
                .send()
                .await?;

            let updated: Set = read_json(response).await?;
            println!("Updated set {}: {}", updated.id, describe(&updated));
        }

        Commands::Delete { id } => {
            let response = client
                .delete(format!("{}/{}", sets_url(&api_url), id))
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(api_error(response).await);
            }
            println!("Deleted set {}", id);
        }

        Commands::Import { path, dry_run } => {
            if !path.exists() {
                eprintln!("File not found: {:?}", path);
                std::process::exit(1);
            }

            let result = import::import_path(&path)?;

            println!("Import results:");
            println!("  Rows processed: {}", result.rows_processed);
            println!("  Rows failed: {}", result.rows_failed);

            if !result.errors.is_empty() {
                println!();
                println!("Errors (first 10):");
                for error in result.errors.iter().take(10) {
                    println!("  {}", error);
                }
            }

            if dry_run {
                println!();
                println!("(Dry run - no sets were imported)");
            } else if !result.sets.is_empty() {
                println!();
                println!("Importing sets...");

                let mut success = 0;
                let mut failed = 0;

                for set in &result.sets {
                    match client.post(sets_url(&api_url)).json(set).send().await {
                        Ok(resp) if resp.status().is_success() => success += 1,
                        Ok(resp) => {
                            tracing::warn!(movement = %set.movement, "Import rejected: {}", resp.status());
                            failed += 1;
                        }
                        Err(e) => {
                            tracing::warn!(movement = %set.movement, "Import failed: {}", e);
                            failed += 1;
                        }
                    }
                }

                println!("  Imported: {}", success);
                if failed > 0 {
                    println!("  Failed: {}", failed);
                }
            }
        }

        Commands::Status => {
            let response = client.get(format!("{}/health", api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: HealthResponse = resp.json().await?;

                    println!("Training Notebook v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API Status: {}", health.status);
                    println!("Server version: {}", health.version);
                    println!();
                    println!("Storage: {}", health.storage);
                    if let Some(count) = health.set_count {
                        println!("  Total sets: {}", count);
                    }
                    println!();
                    println!("Uptime: {}", format_duration(health.uptime_seconds));
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Training Notebook API at {}", api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the API server is running:");
                    eprintln!("  cargo run --bin notebook-api");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Decode a success body, or turn the error envelope into an error
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> anyhow::Result<T> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json().await?)
}

async fn api_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(body) => anyhow::anyhow!("{} ({}): {}", body.error.code, status, body.error.message),
        Err(_) => anyhow::anyhow!("Request failed ({}): {}", status, text),
    }
}

fn describe(set: &Set) -> String {
    format!(
        "{} x{} @ {}",
        set.movement, set.volume, set.intensity
    )
}

fn print_set(set: &Set, format: &str) -> anyhow::Result<()> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(set)?),
        _ => {
            println!("Set {}", set.id);
            println!("  Movement:  {}", set.movement);
            println!("  Volume:    {}", set.volume);
            println!("  Intensity: {}", set.intensity);
        }
    }
    Ok(())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
