use std::sync::LazyLock;

use regex::Regex;

use super::links::{extract_links, strip_links};

static LABELED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z][0-9]*\.").unwrap());
static GROUPED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:upper|lower) body:$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionKind {
    /// "A." / "B2." style exercise block.
    Labeled { header: String },
    /// "Upper body:" / "Lower body:" grouping.
    Grouped { header: String },
    /// Content seen before any header.
    Freeform,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub content_lines: Vec<String>,
    pub video_links: Vec<String>,
}

impl Section {
    fn open(kind: SectionKind) -> Self {
        Section {
            kind,
            content_lines: Vec::new(),
            video_links: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn header(&self) -> Option<&str> {
        match &self.kind {
            SectionKind::Labeled { header } | SectionKind::Grouped { header } => Some(header),
            SectionKind::Freeform => None,
        }
    }

    /// Pull links out of `line` and keep whatever text remains.
    fn absorb(&mut self, line: &str) {
        self.video_links.extend(extract_links(line));
        let cleaned = strip_links(line);
        if !cleaned.is_empty() {
            self.content_lines.push(cleaned);
        }
    }

    fn is_empty(&self) -> bool {
        self.content_lines.is_empty() && self.video_links.is_empty()
    }
}

fn detect_header(line: &str) -> Option<SectionKind> {
    if LABELED_RE.is_match(line) {
        Some(SectionKind::Labeled {
            header: line.to_string(),
        })
    } else if GROUPED_RE.is_match(line) {
        Some(SectionKind::Grouped {
            header: line.to_string(),
        })
    } else {
        None
    }
}

/// Split one cell's text into typed sections, in line order.
///
/// Never fails: a header with nothing under it still yields a section, and
/// lines before the first header collect into a single freeform section.
pub fn parse_cell(text: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<Section> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(kind) = detect_header(line) {
            if let Some(done) = current.take() {
                sections.push(done);
            }
            current = Some(Section::open(kind));
            continue;
        }

        match current.as_mut() {
            Some(section) => section.absorb(line),
            None => {
                let mut freeform = Section::open(SectionKind::Freeform);
                freeform.absorb(line);
                if !freeform.is_empty() {
                    current = Some(freeform);
                }
            }
        }
    }

    if let Some(done) = current {
        sections.push(done);
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<&'static str> {
        parse_cell(text)
            .iter()
            .map(|s| match s.kind {
                SectionKind::Labeled { .. } => "labeled",
                SectionKind::Grouped { .. } => "grouped",
                SectionKind::Freeform => "freeform",
            })
            .collect()
    }

    #[test]
    fn warm_up_block() {
        let sections = parse_cell("A. Warm-up\n5 min cardio\nhttps://youtu.be/abc12345678");
        assert_eq!(sections.len(), 1);
        let s = &sections[0];
        assert_eq!(s.header(), Some("A. Warm-up"));
        assert!(matches!(s.kind, SectionKind::Labeled { .. }));
        assert_eq!(s.content_lines, vec!["5 min cardio"]);
        assert_eq!(
            s.video_links,
            vec!["https://www.youtube.com/watch?v=abc12345678"]
        );
    }

    #[test]
    fn blank_input_has_no_sections() {
        assert!(parse_cell("").is_empty());
        assert!(parse_cell("  \n\n \t \n").is_empty());
    }

    #[test]
    fn headerless_text_is_one_freeform_section() {
        let sections = parse_cell("Rest day\n\nWalk 30 min\nStretch");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Freeform);
        assert_eq!(sections[0].header(), None);
        assert_eq!(
            sections[0].content_lines,
            vec!["Rest day", "Walk 30 min", "Stretch"]
        );
    }

    #[test]
    fn freeform_precedes_first_header() {
        let text = "Focus on tempo\nA. Squat\n3x5\nB1. Bench\n3x8";
        assert_eq!(kinds(text), vec!["freeform", "labeled", "labeled"]);
        let sections = parse_cell(text);
        assert_eq!(sections[0].content_lines, vec!["Focus on tempo"]);
        assert_eq!(sections[2].header(), Some("B1. Bench"));
    }

    #[test]
    fn grouped_headers_case_insensitive() {
        let text = "UPPER BODY:\nPush-ups x10\nlower body:\nSquats x10";
        assert_eq!(kinds(text), vec!["grouped", "grouped"]);
        let sections = parse_cell(text);
        assert_eq!(sections[0].header(), Some("UPPER BODY:"));
        assert_eq!(sections[1].content_lines, vec!["Squats x10"]);
    }

    #[test]
    fn grouped_label_must_stand_alone() {
        let sections = parse_cell("A. Circuit\nUpper body: push-ups");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content_lines, vec!["Upper body: push-ups"]);
    }

    #[test]
    fn lowercase_letter_is_not_a_header() {
        assert_eq!(kinds("a. not a header\nb2. nor this"), vec!["freeform"]);
    }

    #[test]
    fn empty_header_still_emitted() {
        let sections = parse_cell("A. Warm-up\nB. Main");
        assert_eq!(sections.len(), 2);
        assert!(sections[0].content_lines.is_empty());
        assert!(sections[0].video_links.is_empty());
    }

    #[test]
    fn link_only_line_becomes_freeform() {
        let sections = parse_cell("youtu.be/dQw4w9WgXcQ");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Freeform);
        assert!(sections[0].content_lines.is_empty());
        assert_eq!(sections[0].video_links.len(), 1);
    }

    #[test]
    fn inline_links_stripped_from_content() {
        let sections = parse_cell("A. Hinge\nRDL 3x8 https://youtube.com/shorts/AAAAAAAAAAA slow");
        assert_eq!(sections[0].content_lines, vec!["RDL 3x8 slow"]);
        assert_eq!(sections[0].video_links.len(), 1);
    }

    #[test]
    fn content_lines_preserve_input_order() {
        let text = "warm\nA. one\nx\ny\nUpper body:\nz\nB. two\nw";
        let flat: Vec<String> = parse_cell(text)
            .into_iter()
            .flat_map(|s| {
                s.header()
                    .map(str::to_string)
                    .into_iter()
                    .chain(s.content_lines)
                    .collect::<Vec<_>>()
            })
            .collect();
        let expected: Vec<&str> = text.lines().collect();
        assert_eq!(flat, expected);
    }

    #[test]
    fn week_fixture() {
        let text = std::fs::read_to_string("tests/fixtures/week_cell.txt").unwrap();
        let sections = parse_cell(&text);
        assert_eq!(
            kinds(&text),
            vec!["freeform", "labeled", "labeled", "grouped", "grouped"]
        );
        let links: usize = sections.iter().map(|s| s.video_links.len()).sum();
        assert_eq!(links, 3);
        assert!(sections
            .iter()
            .flat_map(|s| &s.content_lines)
            .all(|l| !l.contains("youtu")));
    }
}
