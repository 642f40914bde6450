use crate::parser::{Section, SectionKind, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    HeadingMajor(String),
    HeadingMinor(String),
    Paragraph(String),
    Bullet(String),
    Embed { url: String },
}

/// A page ready for delivery: title, optional emoji icon, flat block list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub title: String,
    pub icon: Option<String>,
    pub blocks: Vec<Block>,
}

impl RenderedPage {
    pub fn new(title: impl Into<String>, icon: Option<String>, blocks: Vec<Block>) -> Self {
        RenderedPage {
            title: title.into(),
            icon,
            blocks,
        }
    }
}

/// Render many sessions, each introduced by a `Session {n}` heading.
pub fn render_sessions(sessions: &[Session]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for session in sessions {
        blocks.push(Block::HeadingMajor(format!("Session {}", session.number)));
        push_sections(&session.sections, &mut blocks);
    }
    blocks
}

/// Render a single session without its number heading.
pub fn render_session(session: &Session) -> Vec<Block> {
    let mut blocks = Vec::new();
    push_sections(&session.sections, &mut blocks);
    blocks
}

// Header, then every content line, then every embed. Embeds are not
// interleaved with the lines they came from.
fn push_sections(sections: &[Section], blocks: &mut Vec<Block>) {
    for section in sections {
        match &section.kind {
            SectionKind::Labeled { header } => {
                blocks.push(Block::Paragraph(header.clone()));
                blocks.extend(section.content_lines.iter().cloned().map(Block::Bullet));
            }
            SectionKind::Grouped { header } => {
                blocks.push(Block::HeadingMinor(header.clone()));
                blocks.extend(section.content_lines.iter().cloned().map(Block::Bullet));
            }
            SectionKind::Freeform => {
                blocks.extend(section.content_lines.iter().cloned().map(Block::Paragraph));
            }
        }
        blocks.extend(
            section
                .video_links
                .iter()
                .map(|url| Block::Embed { url: url.clone() }),
        );
    }
}

/// Plain-text preview of a block list, one line per block.
pub fn preview(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| match b {
            Block::HeadingMajor(t) => format!("## {}", t),
            Block::HeadingMinor(t) => format!("### {}", t),
            Block::Paragraph(t) => t.clone(),
            Block::Bullet(t) => format!("- {}", t),
            Block::Embed { url } => format!("[video] {}", url),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
