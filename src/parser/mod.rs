pub mod links;
pub mod sections;

use serde_json::Value;
use tracing::debug;

pub use sections::{parse_cell, Section, SectionKind};

/// All sections parsed from one grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// 1-based, `row * row_len + col + 1`.
    pub number: usize,
    pub sections: Vec<Section>,
}

/// Parse every string cell of `grid` (row-major) into a session.
///
/// Numbering uses each row's own length, so rows of different widths can
/// produce the same number. Callers that need unique numbers must renumber.
pub fn parse_sessions(grid: &[Vec<Value>]) -> Vec<Session> {
    let mut sessions = Vec::new();
    for (row_idx, row) in grid.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let Value::String(text) = cell else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            let sections = parse_cell(text);
            if sections.is_empty() {
                continue;
            }
            let number = row_idx * row.len() + col_idx + 1;
            debug!(number, sections = sections.len(), "parsed session");
            sessions.push(Session { number, sections });
        }
    }
    sessions
}
