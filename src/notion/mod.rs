pub mod chunk;
pub mod client;
pub mod wire;

use crate::error::Result;
use crate::render::Block;

pub use chunk::deliver;
pub use client::NotionClient;

/// Id of a page created on the document host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHandle(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteKind {
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    Bulleted,
    Numbered,
    Embed,
    ChildPage,
    Other(String),
}

/// A block as read back from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteBlock {
    pub id: String,
    pub kind: RemoteKind,
    pub text: String,
    pub has_children: bool,
}

/// One page of a paginated children listing.
#[derive(Debug, Clone, Default)]
pub struct ChildrenPage {
    pub items: Vec<RemoteBlock>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// The document host as seen by the delivery and feedback paths.
///
/// Every method is one remote call; callers await each before issuing the
/// next.
pub trait DocumentSink {
    async fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        icon: Option<&str>,
        blocks: &[Block],
    ) -> Result<PageHandle>;

    async fn append_children(&self, page: &PageHandle, blocks: &[Block]) -> Result<()>;

    async fn list_children(&self, block_id: &str, cursor: Option<&str>) -> Result<ChildrenPage>;

    /// Id of the first direct child page of `parent_id` titled `title`.
    async fn find_child_page_by_title(
        &self,
        parent_id: &str,
        title: &str,
    ) -> Result<Option<String>> {
        let mut cursor: Option<String> = None;
        loop {
            let page = self.list_children(parent_id, cursor.as_deref()).await?;
            if let Some(found) = page
                .items
                .into_iter()
                .find(|b| b.kind == RemoteKind::ChildPage && b.text == title)
            {
                return Ok(Some(found.id));
            }
            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => return Ok(None),
            }
        }
    }
}
