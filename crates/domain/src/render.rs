//! Placeholder rendering.
//!
//! A placeholder is a `{name}` token where `name` is made of ASCII
//! letters, digits, `_`, `-` or `.`. Rendering is a single left-to-right
//! scan: known tokens are replaced by their value, unknown tokens are kept
//! verbatim, and substituted values are never rescanned.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::recipient::Recipient;

/// A message ready for delivery to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub title: String,
    pub body: String,
    pub recipient_id: String,
}

/// Render `title` and `body` with the recipient's template values.
#[must_use]
pub fn render_message(title: &str, body: &str, recipient: &Recipient) -> RenderedMessage {
    let values = recipient.template_values();
    RenderedMessage {
        title: render(title, &values),
        body: render(body, &values),
        recipient_id: recipient.id.clone(),
    }
}

/// Substitute every `{name}` token found in `values`; leave the rest as is.
#[must_use]
pub fn render(text: &str, values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match token_len(after) {
            Some(len) => {
                let name = &after[..len];
                match values.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[len + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Distinct placeholder names in `text`, in order of first appearance.
#[must_use]
pub fn placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match token_len(after) {
            Some(len) => {
                let name = &after[..len];
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
                rest = &after[len + 1..];
            }
            None => rest = after,
        }
    }
    names
}

/// Length of the token name starting right after a `{`, if well-formed.
fn token_len(s: &str) -> Option<usize> {
    let end = s.find('}')?;
    let name = &s[..end];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    valid.then_some(end)
}
