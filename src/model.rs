// Core structs: Catalog, AliasTable, DonationRecord, ReconciliationResult
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Reference catalog: category name -> item display names, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    categories: Vec<(String, Vec<String>)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends items to a category, creating it at the end if it is new.
    pub fn push_category(&mut self, name: impl Into<String>, items: Vec<String>) {
        let name = name.into();
        match self.categories.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => existing.extend(items),
            None => self.categories.push((name, items)),
        }
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// Normalized alias name -> normalized base item name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an alias. Empty keys and self-aliases are rejected, and an
    /// alias already registered keeps its first base.
    pub fn insert(&mut self, alias: String, base: String) -> bool {
        if alias.is_empty() || base.is_empty() || alias == base {
            return false;
        }
        if self.entries.contains_key(&alias) {
            return false;
        }
        self.entries.insert(alias, base);
        true
    }

    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.entries.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which snapshot file the dataset was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Wiki,
    Api,
    Manual,
    Empty,
}

/// Process-wide immutable dataset, loaded once at startup.
#[derive(Debug, Clone)]
pub struct MuseumDataset {
    pub catalog: Catalog,
    pub aliases: AliasTable,
    pub kind: CatalogKind,
}

impl MuseumDataset {
    pub fn empty() -> Self {
        Self {
            catalog: Catalog::new(),
            aliases: AliasTable::new(),
            kind: CatalogKind::Empty,
        }
    }
}

/// Everything a player has donated, as normalized keys.
#[derive(Debug, Clone, Default)]
pub struct DonationRecord {
    pub by_category: HashMap<String, HashSet<String>>,
    /// Includes the base form of every donated alias.
    pub all: HashSet<String>,
    pub donated_count: usize,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingItem {
    pub category: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Counts {
    pub donated: usize,
    pub total: Option<usize>,
    pub completion_pct: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationResult {
    pub counts: Counts,
    pub missing: Vec<MissingItem>,
    pub categories: Vec<String>,
    pub hints: Vec<String>,
}

/// Inbound request body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuseumRequest {
    pub uuid: Option<String>,
    pub api_key: Option<String>,
}

/// Successful outbound body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MuseumReport {
    pub success: bool,
    pub profile_id: String,
    pub categories: Vec<String>,
    pub counts: Counts,
    pub missing: Vec<MissingItem>,
    pub hints: Vec<String>,
    pub raw: Value,
}

/// Status code plus JSON body, ready for any HTTP layer to send.
#[derive(Debug, Clone)]
pub struct MuseumResponse {
    pub status: u16,
    pub body: Value,
}

impl MuseumResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Invalid selector: {0}")]
    Selector(String),
    #[error("No museum tables found in page")]
    NoTables,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("uuid and apiKey are required")]
    MissingInput,
    #[error("{context}")]
    Upstream { context: &'static str, details: Value },
    #[error("No profiles found for this UUID")]
    NoProfile,
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_table_rejects_self_and_empty_aliases() {
        let mut aliases = AliasTable::new();
        assert!(!aliases.insert("dragon fusion".into(), "dragon fusion".into()));
        assert!(!aliases.insert(String::new(), "dragon fusion".into()));
        assert!(aliases.insert("old dragon fusion".into(), "dragon fusion".into()));
        assert!(!aliases.insert("old dragon fusion".into(), "other".into()));
        assert_eq!(aliases.resolve("old dragon fusion"), Some("dragon fusion"));
        assert_eq!(aliases.len(), 1);
    }

    #[test]
    fn catalog_keeps_category_order_and_merges_repeats() {
        let mut catalog = Catalog::new();
        catalog.push_category("Weapons", vec!["Sword A".into()]);
        catalog.push_category("Armor Sets", vec!["Helm".into()]);
        catalog.push_category("Weapons", vec!["Sword B".into()]);

        let names: Vec<&str> = catalog.categories().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Weapons", "Armor Sets"]);
        assert_eq!(catalog.item_count(), 3);
        assert_eq!(catalog.category_count(), 2);
    }

    #[test]
    fn request_reads_camel_case_fields() {
        let request: MuseumRequest =
            serde_json::from_str(r#"{ "uuid": "abc", "apiKey": "secret" }"#).unwrap();
        assert_eq!(request.uuid.as_deref(), Some("abc"));
        assert_eq!(request.api_key.as_deref(), Some("secret"));

        let request: MuseumRequest = serde_json::from_str("{}").unwrap();
        assert!(request.uuid.is_none() && request.api_key.is_none());
    }

    #[test]
    fn counts_serialize_in_camel_case_with_nulls() {
        let counts = Counts {
            donated: 3,
            total: None,
            completion_pct: None,
        };
        let json = serde_json::to_value(&counts).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "donated": 3, "total": null, "completionPct": null })
        );
    }
}
