use crate::model::CatalogError;
use serde_json::{Map, Value};

/// Item-registry categories whose items can be donated to the museum.
pub const MUSEUM_REGISTRY_CATEGORIES: &[&str] = &[
    "SWORD", "BOW", "HELMET", "CHESTPLATE", "LEGGINGS", "BOOTS", "ACCESSORY", "WAND",
    "FISHING_ROD", "HOE", "AXE", "PICKAXE", "SHOVEL", "SHEARS", "COSMETIC", "PET_ITEM", "ARROW",
    "DEPLOYABLE",
];

/// Turns the raw item registry (`{ items: [{ name, category, .. }] }`) into a
/// flat category -> names snapshot, keyed by the lower-cased registry category.
pub fn build_api_catalog(raw: &Value) -> Result<Map<String, Value>, CatalogError> {
    let items = raw
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| CatalogError::InvalidSnapshot("`items` is not an array".into()))?;

    let mut dataset = Map::new();
    for item in items {
        let Some(category) = item.get("category").and_then(Value::as_str) else {
            continue;
        };
        if !MUSEUM_REGISTRY_CATEGORIES.contains(&category) {
            continue;
        }
        let Some(name) = item.get("name").and_then(Value::as_str) else {
            continue;
        };
        let entry = dataset
            .entry(category.to_lowercase())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(names) = entry {
            names.push(Value::String(name.to_string()));
        }
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn groups_eligible_items_by_lowercase_category() {
        let raw = json!({
            "success": true,
            "items": [
                { "id": "ASPECT_OF_THE_END", "name": "Aspect of the End", "category": "SWORD" },
                { "id": "ENCHANTED_DIAMOND", "name": "Enchanted Diamond" },
                { "id": "RUNAANS_BOW", "name": "Runaan's Bow", "category": "BOW" },
                { "id": "HYPERION", "name": "Hyperion", "category": "SWORD" },
                { "id": "STONE", "name": "Stone", "category": "BLOCK" },
                { "id": "NAMELESS", "category": "SWORD" }
            ]
        });

        let dataset = build_api_catalog(&raw).unwrap();
        assert_eq!(
            Value::Object(dataset),
            json!({
                "sword": ["Aspect of the End", "Hyperion"],
                "bow": ["Runaan's Bow"]
            })
        );
    }

    #[test]
    fn rejects_registry_without_items_array() {
        assert!(build_api_catalog(&json!({ "items": {} })).is_err());
        assert!(build_api_catalog(&json!({})).is_err());
    }
}
