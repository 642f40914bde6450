use tracing::info;

use super::{DocumentSink, PageHandle};
use crate::error::Result;
use crate::render::RenderedPage;

/// Host limit on blocks per create or append request.
pub const MAX_BLOCKS_PER_REQUEST: usize = 100;

/// Create `page` under `parent_id`, then append the rest of its blocks in
/// order, one request per slice of at most [`MAX_BLOCKS_PER_REQUEST`].
///
/// A failing append leaves the page partially filled; the error is returned
/// as-is and nothing is rolled back.
pub async fn deliver<S: DocumentSink>(
    sink: &S,
    parent_id: &str,
    page: &RenderedPage,
) -> Result<PageHandle> {
    let split = page.blocks.len().min(MAX_BLOCKS_PER_REQUEST);
    let (first, rest) = page.blocks.split_at(split);

    let handle = sink
        .create_page(parent_id, &page.title, page.icon.as_deref(), first)
        .await?;
    info!(page = %handle.0, title = %page.title, blocks = first.len(), "created page");

    for (i, slice) in rest.chunks(MAX_BLOCKS_PER_REQUEST).enumerate() {
        sink.append_children(&handle, slice).await?;
        info!(page = %handle.0, chunk = i + 1, blocks = slice.len(), "appended blocks");
    }
    Ok(handle)
}
