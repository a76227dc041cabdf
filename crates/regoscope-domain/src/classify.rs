//! Action classification of rule heads.
//!
//! A rule declares an action when its rendered head starts with a lowercase name immediately
//! followed by `[msg`, e.g. `deny[msg]` or `warn[msg_text]`. This is a textual convention over
//! the canonical head rendering; other shapes such as `deny contains msg` or
//! `violation[{"msg": msg}]` do not declare an action.

use regoscope_syntax::Rule;

/// Marker that must directly follow the action name.
pub const MESSAGE_KEY_MARKER: &str = "[msg";

/// Action tags of `rules`, in rule order, duplicates kept.
pub fn classify(rules: &[Rule]) -> Vec<String> {
    rules
        .iter()
        .filter_map(|rule| action_of(&rule.head.to_string()).map(str::to_string))
        .collect()
}

/// Action tag of a rendered rule head, if it matches `^\s*([a-z]+)\[msg`.
pub fn action_of(head: &str) -> Option<&str> {
    let head = head.trim_start_matches([' ', '\t', '\n', '\r', '\u{c}']);
    let end = head
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(head.len());
    if end == 0 {
        return None;
    }
    head[end..].starts_with(MESSAGE_KEY_MARKER).then(|| &head[..end])
}
