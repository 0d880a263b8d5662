//! Line canonicalization for keyword comparison.

/// Collapse whitespace runs to a single space, trim, and lowercase.
pub fn normalize_line(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
