/// Characters that are not allowed in a file name on at least one target platform.
pub const FORBIDDEN_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Name used when nothing usable is left after sanitizing.
pub const FALLBACK_NAME: &str = "untitled";

const PLACEHOLDER: char = '_';

/// Map an arbitrary display name to a file-system safe base name (without extension).
///
/// Names made only of forbidden characters, blanks and periods carry nothing
/// worth keeping and map to [`FALLBACK_NAME`].
pub fn sanitize_name(input: &str) -> String {
    if input.chars().all(|c| is_forbidden(c) || c.is_whitespace() || c == '.') {
        return FALLBACK_NAME.to_string();
    }
    let replaced: String = input
        .chars()
        .map(|c| if is_forbidden(c) { PLACEHOLDER } else { c })
        .collect();
    let cleaned = replaced.trim().trim_end_matches('.').trim_end();
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Base name used when `name` already exists at the destination.
pub fn disambiguated_name(name: &str, stamp: &str) -> String {
    format!("{name}-{stamp}")
}

fn is_forbidden(c: char) -> bool {
    FORBIDDEN_CHARS.contains(&c)
}
