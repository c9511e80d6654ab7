// Catalog module: reference datasets of museum items and how they are built.

pub mod api_items;
pub mod loader;

pub use api_items::build_api_catalog;
pub use loader::load_catalog;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const WIKI_SNAPSHOT_FILE: &str = "wiki_museum_items.json";
pub const API_SNAPSHOT_FILE: &str = "api_museum_items.json";
pub const MANUAL_SNAPSHOT_FILE: &str = "museum_items.json";
pub const RAW_ITEMS_FILE: &str = "raw_api_items.json";

/// Wiki-derived snapshot: categories plus the alias table scraped from the
/// notes column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WikiSnapshot {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub category_count: usize,
    #[serde(default)]
    pub total_items: usize,
    #[serde(default)]
    pub categories: Map<String, Value>,
    #[serde(default)]
    pub aliases: Map<String, Value>,
}
