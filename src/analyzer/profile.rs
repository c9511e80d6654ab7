use crate::utils::member_key;
use serde_json::Value;

/// Picks the active profile: the first one flagged `selected`, otherwise the
/// one where the player saved most recently. Earlier profiles win ties.
///
/// Returns `None` when `profiles` is not a non-empty array.
pub fn select_profile<'a>(profiles: &'a Value, uuid: &str) -> Option<&'a Value> {
    let profiles = profiles.as_array()?;

    if let Some(selected) = profiles
        .iter()
        .find(|p| p.get("selected").is_some_and(crate::utils::is_truthy))
    {
        return Some(selected);
    }

    let key = member_key(uuid);
    let mut best: Option<(&Value, f64)> = None;
    for profile in profiles {
        let last_save = last_save(profile, &key);
        match best {
            Some((_, best_save)) if last_save <= best_save => {}
            _ => best = Some((profile, last_save)),
        }
    }
    best.map(|(profile, _)| profile)
}

fn last_save(profile: &Value, member_key: &str) -> f64 {
    profile
        .get("members")
        .and_then(|members| members.get(member_key))
        .and_then(|member| member.get("last_save"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}
