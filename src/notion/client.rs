use reqwest::{Client, Method, RequestBuilder};
use serde_json::{json, Value};
use tracing::debug;

use super::{wire, ChildrenPage, DocumentSink, PageHandle};
use crate::error::{RemoteFailure, Result, SyncError};
use crate::render::Block;

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

#[derive(Clone, Debug)]
pub struct NotionClient {
    http: Client,
    base: String,
    token: String,
}

impl NotionClient {
    pub fn new(base: &str, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("workout_sync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::remote("build_client", base, e))?;
        Ok(NotionClient {
            http,
            base: base.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
    }

    async fn send(
        &self,
        req: RequestBuilder,
        operation: &'static str,
        target: &str,
    ) -> Result<Value> {
        let resp = req
            .send()
            .await
            .map_err(|e| SyncError::remote(operation, target, e))?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SyncError::remote(operation, target, e))?;
        if !status.is_success() {
            return Err(SyncError::remote(
                operation,
                target,
                RemoteFailure::Status {
                    status: status.as_u16(),
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                },
            ));
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            SyncError::remote(operation, target, RemoteFailure::Decode(e.to_string()))
        })
    }
}

impl DocumentSink for NotionClient {
    async fn create_page(
        &self,
        parent_id: &str,
        title: &str,
        icon: Option<&str>,
        blocks: &[Block],
    ) -> Result<PageHandle> {
        let body = wire::create_page_body(parent_id, title, icon, blocks);
        let req = self.request(Method::POST, "/pages").json(&body);
        let resp = self.send(req, "create_page", title).await?;
        let id = resp
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                SyncError::remote(
                    "create_page",
                    title,
                    RemoteFailure::Decode("response has no page id".into()),
                )
            })?;
        Ok(PageHandle(id.to_string()))
    }

    async fn append_children(&self, page: &PageHandle, blocks: &[Block]) -> Result<()> {
        let body = json!({ "children": wire::encode_blocks(blocks) });
        let req = self
            .request(Method::PATCH, &format!("/blocks/{}/children", page.0))
            .json(&body);
        self.send(req, "append_children", &page.0).await?;
        Ok(())
    }

    async fn list_children(&self, block_id: &str, cursor: Option<&str>) -> Result<ChildrenPage> {
        let mut req = self
            .request(Method::GET, &format!("/blocks/{}/children", block_id))
            .query(&[("page_size", "100")]);
        if let Some(c) = cursor {
            req = req.query(&[("start_cursor", c)]);
        }
        let resp = self.send(req, "list_children", block_id).await?;
        let page = wire::decode_children(&resp).ok_or_else(|| {
            SyncError::remote(
                "list_children",
                block_id,
                RemoteFailure::Decode("response has no results".into()),
            )
        })?;
        debug!(block_id, items = page.items.len(), has_more = page.has_more, "listed children");
        Ok(page)
    }
}
