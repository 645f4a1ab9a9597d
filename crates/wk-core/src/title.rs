/// Normalize a title for comparison: collapse runs of whitespace to a single
/// space, trim, and lowercase.
///
/// No other folding is applied; accents and punctuation are significant.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Compare two titles case-insensitively after whitespace normalization.
pub fn titles_eq(a: &str, b: &str) -> bool {
    normalize_title(a) == normalize_title(b)
}
