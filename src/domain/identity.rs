//! Identity of a participant as far as the text protocol can tell.
//!
//! The message is the only storage, so there is no numeric user id to key on.
//! Identity is a normalized form of the display name: the href path segment
//! when the name is an anchor, the handle without `@` when it is a mention,
//! otherwise the lowercased tag-stripped text. Two spellings that normalize
//! identically collide; a player who renames between messages is a stranger.
//! Documented behavior, not a bug to fix here.

use std::sync::LazyLock;

use regex::Regex;

static ANCHOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a\s+href="([^"]+)"[^>]*>(.*?)</a>"#).unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Normalize a display name into its comparison key
pub fn normalize(display_name: &str) -> String {
    if let Some(caps) = ANCHOR.captures(display_name) {
        if let Some(segment) = last_path_segment(&caps[1]) {
            return segment.to_lowercase();
        }
    }

    let plain = strip_tags(display_name);
    let trimmed = plain.trim();
    match trimmed.strip_prefix('@') {
        Some(handle) => handle.to_lowercase(),
        None => trimmed.to_lowercase(),
    }
}

/// Remove markup tags, keeping inner text
pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

fn last_path_segment(url: &str) -> Option<&str> {
    let without_query = url.split(['?', '#']).next()?;
    without_query.rsplit('/').find(|segment| !segment.is_empty())
}
