use crate::model::{AliasTable, DonationRecord};
use crate::normalizer::normalize_opt;
use crate::utils::{is_truthy, member_key};
use serde_json::Value;
use tracing::debug;

/// Category under which `profile.special` entries are recorded.
pub const SPECIAL_CATEGORY: &str = "special";

/// Fields tried, in order, to name a donated entry.
const NAME_FIELDS: &[&str] = &["name", "display_name", "item_id", "id"];

/// Flattens a museum payload into normalized donation keys.
///
/// Understands the `profile.items` / `profile.special` layout and the
/// per-member layout (`museum.members.<id>` or `members.<id>`). An
/// unrecognized payload yields an empty record.
pub fn extract_donations(payload: &Value, uuid: &str, aliases: &AliasTable) -> DonationRecord {
    let mut record = DonationRecord::default();

    let profile = payload.get("profile");
    let items = profile.and_then(|p| p.get("items")).filter(|v| is_truthy(v));
    let special = profile.and_then(|p| p.get("special")).filter(|v| is_truthy(v));

    if items.is_some() || special.is_some() {
        debug!("Museum payload in profile shape");
        if let Some(Value::Object(categories)) = items {
            if !categories.is_empty() {
                record.categories = categories.keys().cloned().collect();
            }
            for (category, entries) in categories {
                collect_category(&mut record, aliases, category, entries);
            }
        }
        if let Some(Value::Array(entries)) = special {
            record.donated_count += entries.len();
            for entry in entries {
                let name = entry_name(entry);
                push_name(&mut record, aliases, SPECIAL_CATEGORY, name.as_deref());
            }
        }
    } else if let Some(Value::Object(member)) = find_member(payload, uuid) {
        debug!("Museum payload in member shape");
        record.categories = member.keys().cloned().collect();
        for (category, entries) in member {
            collect_category(&mut record, aliases, category, entries);
        }
    } else {
        debug!("Museum payload shape not recognized");
    }

    record
}

fn find_member<'a>(payload: &'a Value, uuid: &str) -> Option<&'a Value> {
    let key = member_key(uuid);
    payload
        .get("museum")
        .and_then(|m| m.get("members"))
        .and_then(|members| members.get(&key))
        .filter(|v| is_truthy(v))
        .or_else(|| {
            payload
                .get("members")
                .and_then(|members| members.get(&key))
                .filter(|v| is_truthy(v))
        })
}

/// A category is either an array of item-like entries or a map keyed by item.
fn collect_category(record: &mut DonationRecord, aliases: &AliasTable, category: &str, entries: &Value) {
    match entries {
        Value::Array(list) => {
            record.donated_count += list.iter().filter(|e| is_truthy(e)).count();
            for entry in list {
                let name = entry_name(entry);
                push_name(record, aliases, category, name.as_deref());
            }
        }
        Value::Object(map) => {
            record.donated_count += map.len();
            for key in map.keys() {
                push_name(record, aliases, category, Some(key));
            }
        }
        _ => {}
    }
}

/// Display name of a donated entry: the first non-empty of the known name
/// fields, or the entry itself when it is a plain string.
pub fn entry_name(entry: &Value) -> Option<String> {
    if let Value::String(s) = entry {
        return (!s.is_empty()).then(|| s.clone());
    }
    NAME_FIELDS
        .iter()
        .filter_map(|field| entry.get(field))
        .find(|v| is_truthy(v))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
}

fn push_name(record: &mut DonationRecord, aliases: &AliasTable, category: &str, name: Option<&str>) {
    let key = normalize_opt(name);
    if key.is_empty() {
        return;
    }
    record
        .by_category
        .entry(category.to_string())
        .or_default()
        .insert(key.clone());
    if let Some(base) = aliases.resolve(&key) {
        record.all.insert(base.to_string());
    }
    record.all.insert(key);
}
