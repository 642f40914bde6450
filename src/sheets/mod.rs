pub mod a1;
pub mod auth;
pub mod client;

use serde_json::Value;

use crate::error::Result;

pub use a1::parse_cell_ref;
pub use auth::GoogleAuth;
pub use client::SheetsClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Where workout cells come from.
pub trait CellSource {
    /// Spreadsheet owned by `owner` titled exactly `title`.
    async fn find_sheet(&self, owner: &str, title: &str) -> Result<SheetRef>;

    /// Raw cell values; strings, numbers or null.
    async fn get_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<Value>>>;
}

/// Where feedback text is written back to.
pub trait CommentSink {
    /// Numeric id of the tab titled `tab` inside a spreadsheet.
    async fn sheet_gid(&self, spreadsheet_id: &str, tab: &str) -> Result<i64>;

    async fn set_cell_note(
        &self,
        spreadsheet_id: &str,
        sheet_gid: i64,
        row: usize,
        col: usize,
        text: &str,
    ) -> Result<()>;
}
