use std::collections::VecDeque;

use tracing::debug;

use crate::error::Result;
use crate::notion::{DocumentSink, RemoteBlock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeBlock {
    pub block: RemoteBlock,
    pub depth: usize,
}

/// Every direct child of `block_id`, following cursors to the end.
async fn fetch_all_children<S: DocumentSink>(sink: &S, block_id: &str) -> Result<VecDeque<RemoteBlock>> {
    let mut items = VecDeque::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;
    loop {
        let page = sink.list_children(block_id, cursor.as_deref()).await?;
        pages += 1;
        items.extend(page.items);
        match page.next_cursor {
            Some(next) if page.has_more => cursor = Some(next),
            _ => break,
        }
    }
    debug!(block_id, pages, children = items.len(), "fetched children");
    Ok(items)
}

/// Walk the block tree under `root_id` in document order.
///
/// Each level is a queue of siblings; a node with children pushes its own
/// queue on the stack, so its whole subtree is emitted right after it and
/// before its next sibling. Depth of direct children is 0.
pub async fn extract_tree<S: DocumentSink>(sink: &S, root_id: &str) -> Result<Vec<TreeBlock>> {
    let mut out = Vec::new();
    let mut stack: Vec<(VecDeque<RemoteBlock>, usize)> =
        vec![(fetch_all_children(sink, root_id).await?, 0)];

    while let Some((queue, depth)) = stack.last_mut() {
        let depth = *depth;
        let Some(block) = queue.pop_front() else {
            stack.pop();
            continue;
        };
        let descend = block.has_children.then(|| block.id.clone());
        out.push(TreeBlock { block, depth });
        if let Some(id) = descend {
            let children = fetch_all_children(sink, &id).await?;
            stack.push((children, depth + 1));
        }
    }
    Ok(out)
}
