//! `Link` header parsing
//!
//! GitHub advertises further pages as
//! `<https://api.github.com/...&page=2>; rel="next", <...>; rel="last"`.

use regex::Regex;
use std::sync::LazyLock;

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]+)>\s*;\s*rel="([^"]+)""#).expect("Invalid link header regex")
});

/// Returns the target of the `rel="next"` relation, if any
pub fn next_link(header: &str) -> Option<String> {
    LINK_REGEX
        .captures_iter(header)
        .find(|caps| caps[2].split_whitespace().any(|rel| rel == "next"))
        .map(|caps| caps[1].to_string())
}
