use std::sync::LazyLock;

use regex::Regex;

use super::tree::TreeBlock;
use crate::notion::RemoteKind;

static OVERALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:#{1,6}\s*)?overall:?\s*$").unwrap());
static LOWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*###\s*lower body:?\s*$").unwrap());
static UPPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*###\s*upper body:?\s*$").unwrap());

pub const OVERALL_LABEL: &str = "Overall:";
pub const LOWER_BODY_LABEL: &str = "Lower Body:";
pub const UPPER_BODY_LABEL: &str = "Upper Body:";

fn prefix(kind: &RemoteKind) -> Option<&'static str> {
    match kind {
        RemoteKind::Heading1 => Some("# "),
        RemoteKind::Heading2 => Some("## "),
        RemoteKind::Heading3 => Some("### "),
        RemoteKind::Bulleted => Some("- "),
        RemoteKind::Numbered => Some("1. "),
        RemoteKind::Paragraph => Some(""),
        // videos and embeds carry no text worth posting back
        RemoteKind::Embed => None,
        RemoteKind::ChildPage | RemoteKind::Other(_) => None,
    }
}

/// Flatten a block tree into markdown-ish lines, two spaces per depth level.
///
/// An empty paragraph still produces a (possibly indented) empty line.
pub fn to_markdown(blocks: &[TreeBlock]) -> String {
    blocks
        .iter()
        .filter_map(|t| {
            let p = prefix(&t.block.kind)?;
            Some(format!("{}{}{}", "  ".repeat(t.depth), p, t.block.text))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionNotes {
    pub overall: String,
    pub lower_body: String,
    pub upper_body: String,
}

impl SectionNotes {
    /// Non-empty buckets joined by a blank line.
    pub fn combined(&self) -> String {
        [&self.overall, &self.lower_body, &self.upper_body]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn is_empty(&self) -> bool {
        self.overall.is_empty() && self.lower_body.is_empty() && self.upper_body.is_empty()
    }
}

#[derive(Clone, Copy)]
enum Bucket {
    Overall,
    Lower,
    Upper,
}

/// Split flattened markdown into the overall / lower body / upper body notes.
///
/// Lines before the first recognized header are dropped.
pub fn split_by_sections(markdown: &str) -> SectionNotes {
    let mut buckets: [Vec<&str>; 3] = Default::default();
    let mut active: Option<Bucket> = None;

    for line in markdown.lines() {
        let switch = if OVERALL_RE.is_match(line) {
            Some((Bucket::Overall, OVERALL_LABEL))
        } else if LOWER_RE.is_match(line) {
            Some((Bucket::Lower, LOWER_BODY_LABEL))
        } else if UPPER_RE.is_match(line) {
            Some((Bucket::Upper, UPPER_BODY_LABEL))
        } else {
            None
        };

        if let Some((bucket, label)) = switch {
            let lines = &mut buckets[bucket as usize];
            if lines.is_empty() {
                lines.push(label);
            }
            active = Some(bucket);
            continue;
        }

        if let Some(bucket) = active {
            buckets[bucket as usize].push(line);
        }
    }

    let [overall, lower, upper] = buckets.map(|lines| lines.join("\n").trim().to_string());
    SectionNotes {
        overall,
        lower_body: lower,
        upper_body: upper,
    }
}
