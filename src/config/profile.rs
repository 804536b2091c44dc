const DEFAULT_PROFILE: &str = "default";

/// Profile names become file names; anything outside `[A-Za-z0-9_-]` is
/// replaced with `_`.
pub fn resolve_profile(requested: &str) -> String {
    let cleaned: String = requested
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        return DEFAULT_PROFILE.to_string();
    }

    cleaned
}
