//! Requirements-file key extraction
//!
//! Reduces each requirement line of a pip requirements file to the
//! normalized key of the package it names.

use std::collections::BTreeSet;

use crate::identity::normalize;

/// Version operators, longest first so `===` is not read as `==`
const OPERATORS: &[&str] = &["===", "==", "~=", "!=", "<=", ">=", "<", ">", "@"];

/// Default manifest tracked in the approved-packages repository
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

/// Normalized package keys named by a requirements file.
pub fn extract_keys(content: &str) -> BTreeSet<String> {
    content.lines().filter_map(line_key).collect()
}

/// Key for one requirements line, `None` for comments, options and blanks
pub fn line_key(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }

    let token = line.split_whitespace().next()?;
    let token = cut_at(token, ";");
    let token = cut_at(token, "[");
    let token = strip_operator(token);

    let key = normalize(token);
    (!key.is_empty()).then_some(key)
}

fn cut_at<'a>(token: &'a str, marker: &str) -> &'a str {
    token.split_once(marker).map_or(token, |(head, _)| head)
}

/// Drop the first version operator and everything after it
fn strip_operator(token: &str) -> &str {
    OPERATORS
        .iter()
        .filter_map(|op| token.find(op))
        .min()
        .map_or(token, |pos| &token[..pos])
}
