pub mod markdown;
pub mod tree;

use tracing::info;

use crate::error::{Result, SyncError};
use crate::notion::DocumentSink;
use markdown::{split_by_sections, to_markdown};
use tree::extract_tree;

pub use markdown::SectionNotes;

/// Resolve `parent / week / session` by page titles and split the session
/// page's text into notes.
pub async fn collect_notes<S: DocumentSink>(
    sink: &S,
    parent_id: &str,
    week_title: &str,
    session_title: &str,
) -> Result<SectionNotes> {
    let week_id = sink
        .find_child_page_by_title(parent_id, week_title)
        .await?
        .ok_or_else(|| SyncError::not_found("page", week_title))?;
    let session_id = sink
        .find_child_page_by_title(&week_id, session_title)
        .await?
        .ok_or_else(|| SyncError::not_found("page", format!("{} / {}", week_title, session_title)))?;

    let tree = extract_tree(sink, &session_id).await?;
    let md = to_markdown(&tree);
    info!(page = %session_id, blocks = tree.len(), "extracted session page");
    Ok(split_by_sections(&md))
}
