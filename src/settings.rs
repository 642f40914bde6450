use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Result, SyncError};
use crate::notion::client::DEFAULT_BASE_URL as DEFAULT_NOTION_URL;
use crate::sheets::auth::DEFAULT_TOKEN_URL;
use crate::sheets::client::{DEFAULT_DRIVE_URL, DEFAULT_SHEETS_URL};

pub const DEFAULT_CONFIG_PATH: &str = "workout_sync.json";
const ENV_PREFIX: &str = "WORKOUT";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub notion_token: Option<String>,
    pub notion_parent_page_id: Option<String>,
    pub sheet_owner: Option<String>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    #[serde(default = "default_range")]
    pub sheet_range: String,
    #[serde(default = "default_token_cache")]
    pub token_cache: PathBuf,
    #[serde(default = "default_week")]
    pub week: u32,
    pub icon: Option<String>,
    #[serde(default = "default_notion_url")]
    pub notion_url: String,
    #[serde(default = "default_sheets_url")]
    pub sheets_url: String,
    #[serde(default = "default_drive_url")]
    pub drive_url: String,
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

fn default_range() -> String {
    "A1:Z50".into()
}
fn default_token_cache() -> PathBuf {
    PathBuf::from("token_cache.json")
}
fn default_week() -> u32 {
    1
}
fn default_notion_url() -> String {
    DEFAULT_NOTION_URL.into()
}
fn default_sheets_url() -> String {
    DEFAULT_SHEETS_URL.into()
}
fn default_drive_url() -> String {
    DEFAULT_DRIVE_URL.into()
}
fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.into()
}

impl AppConfig {
    /// JSON file (optional) overlaid by `WORKOUT_*` environment variables.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Json).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Return a required value, or fail before any remote call is made.
    pub fn require<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str> {
        match value.as_deref() {
            Some(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(SyncError::ConfigurationMissing(field)),
        }
    }

    pub fn notion_token(&self) -> Result<&str> {
        Self::require(&self.notion_token, "notion_token")
    }

    pub fn parent_page_id(&self) -> Result<&str> {
        Self::require(&self.notion_parent_page_id, "notion_parent_page_id")
    }

    pub fn sheet_owner(&self) -> Result<&str> {
        Self::require(&self.sheet_owner, "sheet_owner")
    }

    pub fn google_client(&self) -> Result<(&str, &str)> {
        Ok((
            Self::require(&self.google_client_id, "google_client_id")?,
            Self::require(&self.google_client_secret, "google_client_secret")?,
        ))
    }
}

/// Rewrite the config file with its own `week` incremented, keeping every
/// other key. `fallback` stands in when the file has no week (or does not
/// exist yet); a `WORKOUT_WEEK` override never reaches the file.
pub fn bump_week(path: &Path, fallback: u32) -> Result<u32> {
    let mut doc: Value = if path.exists() {
        serde_json::from_str(&std::fs::read_to_string(path)?)?
    } else {
        json!({})
    };
    let stored = doc
        .get("week")
        .and_then(Value::as_u64)
        .and_then(|w| u32::try_from(w).ok())
        .unwrap_or(fallback);
    let next = stored.saturating_add(1);
    match doc.as_object_mut() {
        Some(map) => {
            map.insert("week".into(), json!(next));
        }
        None => doc = json!({ "week": next }),
    }
    std::fs::write(path, serde_json::to_string_pretty(&doc)?)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("tmp file");
        file.write_all(contents.as_bytes()).expect("write tmp");
        file
    }

    #[test]
    fn loads_file_with_defaults() {
        let file = json_file(r#"{"notion_token":"secret","week":4,"icon":"🏋️"}"#);
        let cfg = AppConfig::load(file.path()).unwrap();
        assert_eq!(cfg.notion_token().unwrap(), "secret");
        assert_eq!(cfg.week, 4);
        assert_eq!(cfg.icon.as_deref(), Some("🏋️"));
        assert_eq!(cfg.sheet_range, "A1:Z50");
        assert_eq!(cfg.notion_url, DEFAULT_NOTION_URL);
    }

    #[test]
    fn missing_file_is_all_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg.week, 1);
        assert!(matches!(
            cfg.parent_page_id(),
            Err(SyncError::ConfigurationMissing("notion_parent_page_id"))
        ));
    }

    #[test]
    fn blank_value_counts_as_missing() {
        let file = json_file(r#"{"sheet_owner":"   ","google_client_id":"id"}"#);
        let cfg = AppConfig::load(file.path()).unwrap();
        assert!(matches!(
            cfg.sheet_owner(),
            Err(SyncError::ConfigurationMissing("sheet_owner"))
        ));
        assert!(matches!(
            cfg.google_client(),
            Err(SyncError::ConfigurationMissing("google_client_secret"))
        ));
    }

    #[test]
    fn bump_week_preserves_other_keys() {
        let file = json_file(r#"{"notion_token":"secret","week":4}"#);
        assert_eq!(bump_week(file.path(), 4).unwrap(), 5);
        let doc: Value =
            serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(doc["week"], 5);
        assert_eq!(doc["notion_token"], "secret");
    }

    #[test]
    fn bump_week_increments_stored_value_not_override() {
        let file = json_file(r#"{"week":3}"#);
        assert_eq!(bump_week(file.path(), 7).unwrap(), 4);
        assert_eq!(AppConfig::load(file.path()).unwrap().week, 4);
    }

    #[test]
    fn bump_week_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new.json");
        assert_eq!(bump_week(&path, 1).unwrap(), 2);
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.week, 2);
    }

    #[test]
    fn format_forced_without_extension() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"week":9}"#).unwrap();
        assert_eq!(AppConfig::load(file.path()).unwrap().week, 9);
    }
}
