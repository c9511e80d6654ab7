use crate::model::{Counts, DonationRecord, MissingItem, MuseumDataset, ReconciliationResult};
use crate::normalizer::normalize_name;
use std::collections::HashSet;

pub const EMPTY_CATALOG_HINT: &str =
    "Completion percentage requires a populated dataset; currently using raw donations only.";

/// Maps a catalog category onto the museum category it is tracked under.
/// Categories outside the tracked set return `None`.
pub fn target_category(category: &str) -> Option<&'static str> {
    match category {
        "Weapons" => Some("Weapons"),
        "Armor Sets" => Some("Armor Sets"),
        "Rarities" => Some("Rarities"),
        "Special" | "Special Items" => Some("Special"),
        _ => None,
    }
}

/// Diffs the catalog against a player's donations.
///
/// `total` counts each normalized catalog item once across all tracked
/// categories. `missing` lists the original display name once per
/// (tracked category, normalized name) pair.
pub fn reconcile(dataset: &MuseumDataset, donations: &DonationRecord) -> ReconciliationResult {
    let mut unique_items: HashSet<String> = HashSet::new();
    let mut seen_missing: HashSet<(&'static str, String)> = HashSet::new();
    let mut missing = Vec::new();

    for (category, items) in dataset.catalog.categories() {
        let Some(mapped) = target_category(category) else {
            continue;
        };
        for item in items {
            let key = normalize_name(item);
            unique_items.insert(key.clone());
            if donations.all.contains(&key) {
                continue;
            }
            if seen_missing.insert((mapped, key)) {
                missing.push(MissingItem {
                    category: mapped.to_string(),
                    name: item.clone(),
                });
            }
        }
    }

    let total = unique_items.len();
    let (total, completion_pct, hints) = if total > 0 {
        let pct = (donations.donated_count as f64 / total as f64 * 100.0).round() as u64;
        (Some(total), Some(pct), Vec::new())
    } else {
        (None, None, vec![EMPTY_CATALOG_HINT.to_string()])
    };

    ReconciliationResult {
        counts: Counts {
            donated: donations.donated_count,
            total,
            completion_pct,
        },
        missing,
        categories: donations.categories.clone(),
        hints,
    }
}
