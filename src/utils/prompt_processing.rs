use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use regex::{Captures, Regex};
use lazy_static::lazy_static;
use serde_json::Value;

lazy_static! {
    /// Matches `{{`, `}}` (escaped braces) and `{name}` placeholders. Names cannot contain braces or line breaks.
    pub(crate) static ref PLACEHOLDER_MATCH_RE: Regex = Regex::new(r"\{\{|\}\}|\{([^{}\n]*)\}").unwrap();
}

/// Replaces all placeholders with mappings and unescapes doubled braces.
///
/// A placeholder without a filled value in `mapping` is left as is, so callers should check for unfilled
/// placeholders first.
pub(crate) fn replace_all_placeholders(original: &str, mapping: &HashMap<String, Option<String>>) -> String {
    let new_string = PLACEHOLDER_MATCH_RE.replace_all(original, |captures: &Captures| {
        let match_text = &captures[0];
        match captures.get(1) {
            Some(key) => mapping
                .get(key.as_str())
                .and_then(Option::as_deref)
                .unwrap_or(match_text)
                .to_string(),
            // `{{` -> `{`, `}}` -> `}`
            None => match_text[..1].to_string(),
        }
    });
    new_string.into_owned()
}

pub fn get_placeholders(string: &str) -> HashSet<String> {
    PLACEHOLDER_MATCH_RE.captures_iter(string)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Renders an input value as placeholder text. Strings are inserted verbatim, everything else as JSON.
pub(crate) fn render_value(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}
