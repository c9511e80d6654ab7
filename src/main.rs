mod analyzer;
mod api;
mod catalog;
mod config;
mod model;
mod normalizer;
mod parser;
mod service;
mod storage;
mod utils;

use api::{HypixelClient, WikiClient};
use catalog::{API_SNAPSHOT_FILE, RAW_ITEMS_FILE, WIKI_SNAPSHOT_FILE, build_api_catalog, load_catalog};
use clap::{Parser as ClapParser, Subcommand};
use config::{AppConfig, load_config};
use futures::future::join_all;
use model::{MissingItem, MuseumRequest, MuseumResponse};
use parser::{Parser, WikiParser};
use serde_json::Value;
use service::MuseumService;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use storage::{PayloadLog, write_snapshot};
use tracing::{error, info, warn};

#[derive(ClapParser)]
#[command(name = "museum-tracker", about = "Museum completion tracker", version)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch museum progress for one or more players and list missing items
    Check {
        /// API key passed through to the upstream API
        #[arg(long, env = "HYPIXEL_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Player UUIDs, hyphens optional
        #[arg(required = true)]
        uuids: Vec<String>,

        /// Print response bodies as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rebuild the wiki-derived catalog snapshot
    SyncWiki {
        /// Parse a saved copy of the wiki page instead of fetching it
        #[arg(long)]
        html: Option<PathBuf>,
    },
    /// Rebuild the API-derived catalog snapshot from the item registry
    SyncApiItems {
        /// Use a saved registry response instead of fetching it
        #[arg(long)]
        raw: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {}", panic_info);
    }));

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match HypixelClient::new(&config.user_agent, &config.api_base_url, &config.items_url) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Check {
            api_key,
            uuids,
            json,
        } => run_check(&config, client, &api_key, &uuids, json).await,
        Command::SyncWiki { html } => sync_wiki(&config, &client, html).await,
        Command::SyncApiItems { raw } => sync_api_items(&config, &client, raw).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Runs one fetch-and-reconcile cycle per player, all players concurrently.
async fn run_check(
    config: &AppConfig,
    client: HypixelClient,
    api_key: &str,
    uuids: &[String],
    print_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Arc::new(load_catalog(&config.data_dir));
    let payload_log = config
        .log_payloads
        .then(|| PayloadLog::new(config.logs_dir()));
    let service = MuseumService::new(Arc::new(client), dataset, payload_log);

    info!("Players to check: {}", uuids.len());
    let tasks: Vec<_> = uuids
        .iter()
        .map(|uuid| {
            let request = MuseumRequest {
                uuid: Some(uuid.clone()),
                api_key: Some(api_key.to_string()),
            };
            let service = &service;
            async move { (uuid, service.handle(&request).await) }
        })
        .collect();

    let mut failures = 0;
    for (uuid, response) in join_all(tasks).await {
        if response.is_success() {
            log_summary(uuid, &response);
        } else {
            failures += 1;
            warn!(
                "Museum check failed for {} [{}]: {}",
                uuid, response.status, response.body["error"]
            );
        }
        if print_json {
            println!("{}", serde_json::to_string_pretty(&response.body)?);
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} checks failed", failures, uuids.len()).into());
    }
    Ok(())
}

fn log_summary(uuid: &str, response: &MuseumResponse) {
    let body = &response.body;
    let counts = &body["counts"];
    info!(
        "{} (profile {}): donated {} / total {} ({}%)",
        uuid,
        body["profileId"].as_str().unwrap_or("?"),
        counts["donated"],
        display_or_dash(&counts["total"]),
        display_or_dash(&counts["completionPct"])
    );
    if let Some(categories) = body["categories"].as_array() {
        let names: Vec<&str> = categories.iter().filter_map(Value::as_str).collect();
        info!("Categories: {}", names.join(", "));
    }

    let missing: Vec<MissingItem> =
        serde_json::from_value(body["missing"].clone()).unwrap_or_default();
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for item in &missing {
        grouped.entry(&item.category).or_default().push(&item.name);
    }
    for (category, names) in grouped {
        info!("Missing {} ({}): {}", category, names.len(), names.join(", "));
    }

    if let Some(hints) = body["hints"].as_array() {
        for hint in hints.iter().filter_map(Value::as_str) {
            info!("Hint: {}", hint);
        }
    }
}

fn display_or_dash(value: &Value) -> String {
    if value.is_null() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

async fn sync_wiki(
    config: &AppConfig,
    client: &HypixelClient,
    html: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (page, source) = match html {
        Some(path) => (std::fs::read_to_string(&path)?, path.display().to_string()),
        None => {
            let wiki = WikiClient::new(client.client.clone(), &config.wiki_api_url);
            (wiki.fetch_page_html().await?, config.wiki_api_url.clone())
        }
    };

    let snapshot = WikiParser::new(source).parse(&page)?;
    write_snapshot(&config.data_dir.join(WIKI_SNAPSHOT_FILE), &snapshot)?;

    let names: Vec<&str> = snapshot.categories.keys().map(String::as_str).collect();
    info!(
        "Saved wiki museum dataset: {} categories, {} items",
        snapshot.category_count, snapshot.total_items
    );
    info!("Categories: {}", names.join(", "));
    info!("Aliases captured: {}", snapshot.aliases.len());
    Ok(())
}

async fn sync_api_items(
    config: &AppConfig,
    client: &HypixelClient,
    raw: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let registry: Value = match raw {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(&path)?)?,
        None => {
            let registry = client.fetch_items_resource().await?;
            write_snapshot(&config.data_dir.join(RAW_ITEMS_FILE), &registry)?;
            registry
        }
    };

    let dataset = build_api_catalog(&registry)?;
    write_snapshot(&config.data_dir.join(API_SNAPSHOT_FILE), &dataset)?;

    info!("API museum dataset created with {} categories", dataset.len());
    for (category, items) in &dataset {
        info!("- {}: {} items", category, items.as_array().map_or(0, Vec::len));
    }
    Ok(())
}
