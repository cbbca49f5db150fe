//! Package identity normalization
//!
//! Names are compared across artifacts, requirements files and history by
//! a canonical key: trimmed, lowercased, with every run of `-`, `_` and `.`
//! collapsed into a single `-`.

/// Normalize a package name into a comparable key.
///
/// Empty or whitespace-only input yields an empty string, which callers
/// treat as "no key".
pub fn normalize(name: &str) -> String {
    let trimmed = name.trim();
    let mut key = String::with_capacity(trimmed.len());
    let mut in_separator = false;

    for c in trimmed.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                key.push('-');
                in_separator = true;
            }
            continue;
        }
        in_separator = false;
        key.extend(c.to_lowercase());
    }

    key
}
