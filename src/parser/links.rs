use std::sync::LazyLock;

use regex::Regex;

/// One pattern for both extraction and stripping, so the removed spans are
/// exactly the spans that produced links.
static VIDEO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?(?:youtube\.com/watch\?v=|youtube\.com/shorts/|youtu\.be/)([A-Za-z0-9_-]{11})",
    )
    .unwrap()
});

const CANONICAL_PREFIX: &str = "https://www.youtube.com/watch?v=";

pub fn canonical_url(id: &str) -> String {
    format!("{}{}", CANONICAL_PREFIX, id)
}

/// Find every video link in `line`, left to right, in canonical form.
pub fn extract_links(line: &str) -> Vec<String> {
    VIDEO_RE
        .captures_iter(line)
        .map(|caps| canonical_url(&caps[1]))
        .collect()
}

/// Remove every video link from `line` and collapse runs of whitespace.
///
/// Matches are replaced by a space before collapsing, so two fragments on
/// either side of a removed link can never join into a new one.
pub fn strip_links(line: &str) -> String {
    let replaced = VIDEO_RE.replace_all(line, " ");
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}
