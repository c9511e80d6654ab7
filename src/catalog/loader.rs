use crate::catalog::{API_SNAPSHOT_FILE, MANUAL_SNAPSHOT_FILE, WIKI_SNAPSHOT_FILE, WikiSnapshot};
use crate::model::{AliasTable, Catalog, CatalogError, CatalogKind, MuseumDataset};
use crate::normalizer::normalize_name;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// The on-disk snapshot the dataset comes from, picked by file presence.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Wiki(WikiSnapshot),
    Api(Map<String, Value>),
    Manual(Map<String, Value>),
    Empty,
}

impl CatalogSource {
    /// Picks the first snapshot present in `data_dir`: wiki, then API, then manual.
    pub fn resolve(data_dir: &Path) -> Result<Self, CatalogError> {
        let wiki_path = data_dir.join(WIKI_SNAPSHOT_FILE);
        if wiki_path.exists() {
            return Ok(CatalogSource::Wiki(read_wiki_snapshot(&wiki_path)?));
        }

        let api_path = data_dir.join(API_SNAPSHOT_FILE);
        if api_path.exists() {
            return Ok(CatalogSource::Api(read_flat_snapshot(&api_path)?));
        }

        let manual_path = data_dir.join(MANUAL_SNAPSHOT_FILE);
        if manual_path.exists() {
            return Ok(CatalogSource::Manual(read_flat_snapshot(&manual_path)?));
        }

        Ok(CatalogSource::Empty)
    }

    pub fn into_dataset(self) -> MuseumDataset {
        match self {
            CatalogSource::Wiki(snapshot) => {
                let mut aliases = AliasTable::new();
                for (alias, base) in &snapshot.aliases {
                    if let Some(base) = base.as_str() {
                        aliases.insert(normalize_name(alias), normalize_name(base));
                    }
                }
                MuseumDataset {
                    catalog: catalog_from_map(&snapshot.categories),
                    aliases,
                    kind: CatalogKind::Wiki,
                }
            }
            CatalogSource::Api(map) => MuseumDataset {
                catalog: catalog_from_map(&map),
                aliases: AliasTable::new(),
                kind: CatalogKind::Api,
            },
            CatalogSource::Manual(map) => MuseumDataset {
                catalog: catalog_from_map(&map),
                aliases: AliasTable::new(),
                kind: CatalogKind::Manual,
            },
            CatalogSource::Empty => MuseumDataset::empty(),
        }
    }
}

/// Loads the dataset once at startup. Never fails: an unreadable or absent
/// snapshot leaves the catalog empty.
pub fn load_catalog(data_dir: &Path) -> MuseumDataset {
    let dataset = match CatalogSource::resolve(data_dir) {
        Ok(source) => source.into_dataset(),
        Err(e) => {
            warn!("Failed to load museum dataset from {}: {}", data_dir.display(), e);
            MuseumDataset::empty()
        }
    };

    if dataset.kind == CatalogKind::Empty {
        warn!("No museum dataset found. Run `sync-wiki` or `sync-api-items` to populate one.");
    } else if dataset.catalog.is_empty() {
        warn!("{:?} museum dataset has no items", dataset.kind);
    } else {
        info!(
            "{:?} museum dataset loaded: {} categories, {} items, {} aliases",
            dataset.kind,
            dataset.catalog.category_count(),
            dataset.catalog.item_count(),
            dataset.aliases.len()
        );
        if dataset.kind == CatalogKind::Wiki && dataset.aliases.is_empty() {
            warn!("Wiki museum dataset has no aliases; renamed items will not be matched");
        }
    }
    dataset
}

/// Only `categories` and `aliases` matter; a missing or mistyped field is
/// read as empty instead of discarding the snapshot.
fn read_wiki_snapshot(path: &Path) -> Result<WikiSnapshot, CatalogError> {
    let document: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    let object_field = |field: &str| {
        document
            .get(field)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    };
    Ok(WikiSnapshot {
        source: document
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        categories: object_field("categories"),
        aliases: object_field("aliases"),
        ..WikiSnapshot::default()
    })
}

fn read_flat_snapshot(path: &Path) -> Result<Map<String, Value>, CatalogError> {
    match serde_json::from_str(&fs::read_to_string(path)?)? {
        Value::Object(map) => Ok(map),
        _ => Err(CatalogError::InvalidSnapshot(format!(
            "{} is not a JSON object",
            path.display()
        ))),
    }
}

/// Category arrays become catalog entries; anything else is skipped.
fn catalog_from_map(map: &Map<String, Value>) -> Catalog {
    let mut catalog = Catalog::new();
    for (category, list) in map {
        let Some(list) = list.as_array() else {
            continue;
        };
        let items = list
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        catalog.push_category(category.clone(), items);
    }
    catalog
}
