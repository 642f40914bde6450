use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{CellSource, CommentSink, GoogleAuth, SheetRef};
use crate::error::{RemoteFailure, Result, SyncError};

pub const DEFAULT_SHEETS_URL: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_DRIVE_URL: &str = "https://www.googleapis.com/drive/v3";

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// Sheets + Drive REST client. Borrows the credential handle it was built with.
pub struct SheetsClient<'a> {
    http: Client,
    auth: &'a GoogleAuth,
    sheets_base: String,
    drive_base: String,
}

impl<'a> SheetsClient<'a> {
    pub fn new(auth: &'a GoogleAuth, sheets_base: &str, drive_base: &str) -> Self {
        SheetsClient {
            http: Client::new(),
            auth,
            sheets_base: sheets_base.trim_end_matches('/').to_string(),
            drive_base: drive_base.trim_end_matches('/').to_string(),
        }
    }

    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.auth.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    async fn send(&self, req: RequestBuilder, operation: &'static str, target: &str) -> Result<Value> {
        let resp = req
            .send()
            .await
            .map_err(|e| SyncError::remote(operation, target, e))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| SyncError::remote(operation, target, e))?;
        if !status.is_success() {
            return Err(SyncError::remote(
                operation,
                target,
                RemoteFailure::Status {
                    status: status.as_u16(),
                    body: text,
                },
            ));
        }
        serde_json::from_str(&text)
            .map_err(|e| SyncError::remote(operation, target, RemoteFailure::Decode(e.to_string())))
    }

    /// `base` followed by each segment, percent-encoded.
    fn url(base: &str, segments: &[&str], operation: &'static str) -> Result<Url> {
        let mut url = Url::parse(base).map_err(|e| {
            SyncError::remote(operation, base, RemoteFailure::Decode(e.to_string()))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                SyncError::remote(operation, base, RemoteFailure::Decode("base URL cannot have a path".into()))
            })?
            .extend(segments);
        Ok(url)
    }
}

impl CellSource for SheetsClient<'_> {
    async fn find_sheet(&self, owner: &str, title: &str) -> Result<SheetRef> {
        let q = format!(
            "name = '{}' and mimeType = '{}' and '{}' in owners and trashed = false",
            title.replace('\'', "\\'"),
            SPREADSHEET_MIME,
            owner.replace('\'', "\\'"),
        );
        let url = Self::url(&self.drive_base, &["files"], "find_sheet")?;
        let req = self
            .request(Method::GET, url)
            .await?
            .query(&[("q", q.as_str()), ("fields", "files(id,name,webViewLink)")]);
        let resp = self.send(req, "find_sheet", title).await?;
        let file = resp
            .get("files")
            .and_then(Value::as_array)
            .and_then(|files| files.first())
            .ok_or_else(|| SyncError::not_found("sheet", title))?;

        let field = |key: &str| {
            file.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let sheet = SheetRef {
            id: field("id"),
            name: field("name"),
            url: field("webViewLink"),
        };
        info!(id = %sheet.id, name = %sheet.name, "found sheet");
        Ok(sheet)
    }

    async fn get_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<Value>>> {
        let url = Self::url(
            &self.sheets_base,
            &["spreadsheets", spreadsheet_id, "values", range],
            "get_range",
        )?;
        let req = self
            .request(Method::GET, url)
            .await?
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE")]);
        let resp = self.send(req, "get_range", range).await?;
        // an all-empty range comes back without "values"
        let rows: Vec<Vec<Value>> = match resp.get("values") {
            Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
                SyncError::remote("get_range", range, RemoteFailure::Decode(e.to_string()))
            })?,
            None => Vec::new(),
        };
        debug!(range, rows = rows.len(), "fetched range");
        Ok(rows)
    }
}

impl CommentSink for SheetsClient<'_> {
    async fn sheet_gid(&self, spreadsheet_id: &str, tab: &str) -> Result<i64> {
        let url = Self::url(&self.sheets_base, &["spreadsheets", spreadsheet_id], "sheet_gid")?;
        let req = self
            .request(Method::GET, url)
            .await?
            .query(&[("fields", "sheets.properties")]);
        let resp = self.send(req, "sheet_gid", spreadsheet_id).await?;
        resp.get("sheets")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|s| s.get("properties"))
            .find(|p| p.get("title").and_then(Value::as_str) == Some(tab))
            .and_then(|p| p.get("sheetId"))
            .and_then(Value::as_i64)
            .ok_or_else(|| SyncError::not_found("sheet tab", tab))
    }

    async fn set_cell_note(
        &self,
        spreadsheet_id: &str,
        sheet_gid: i64,
        row: usize,
        col: usize,
        text: &str,
    ) -> Result<()> {
        let target = format!("{}:batchUpdate", spreadsheet_id);
        let url = Self::url(&self.sheets_base, &["spreadsheets", target.as_str()], "set_cell_note")?;
        let body = json!({
            "requests": [{
                "updateCells": {
                    "range": {
                        "sheetId": sheet_gid,
                        "startRowIndex": row,
                        "endRowIndex": row + 1,
                        "startColumnIndex": col,
                        "endColumnIndex": col + 1,
                    },
                    "rows": [{ "values": [{ "note": text }] }],
                    "fields": "note",
                }
            }]
        });
        let req = self.request(Method::POST, url).await?.json(&body);
        self.send(req, "set_cell_note", spreadsheet_id).await?;
        info!(spreadsheet_id, row, col, chars = text.len(), "wrote cell note");
        Ok(())
    }
}
