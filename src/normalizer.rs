/// Marker that starts a two-character color code in game item names.
const COLOR_CODE_MARKER: char = '§';

/// Canonical comparison key for an item display name.
///
/// Lower-cases, drops `§x` color codes, turns underscores and every other
/// character outside `[a-z0-9]` into spaces, then collapses and trims
/// whitespace. Two names refer to the same collectible exactly when their
/// keys are equal.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    let mut chars = lowered.chars().peekable();

    while let Some(c) = chars.next() {
        if c == COLOR_CODE_MARKER {
            // The code character is consumed with the marker, except line breaks.
            if chars.peek().is_some_and(|next| !is_line_terminator(*next)) {
                chars.next();
                continue;
            }
        }
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            cleaned.push(c);
        } else {
            cleaned.push(' ');
        }
    }

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Same as [`normalize_name`], for optional inputs.
pub fn normalize_opt(name: Option<&str>) -> String {
    name.map(normalize_name).unwrap_or_default()
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
