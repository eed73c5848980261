//! File-backed collaborators for local use
//!
//! Each merchant gets `<user>.json` holding the theme record and, optionally,
//! `<user>.catalog.json` holding their catalog items.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::CatalogItem;
use crate::persistence::{CatalogSource, IdentityProvider, ThemeStore, User};
use crate::tree::Node;

/// One persisted theme record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRecord {
    pub theme_config: Node,
    /// Denormalized copy of `profile.shopName`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    /// Seconds since the Unix epoch
    #[serde(default)]
    pub updated_at: u64,
}

/// Theme and catalog store over a directory of JSON files
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.dir.join(format!("{}.json", checked_id(user_id)?)))
    }

    fn catalog_path(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.dir.join(format!("{}.catalog.json", checked_id(user_id)?)))
    }

    /// Full record for `user_id`, if one exists
    pub fn read_record(&self, user_id: &str) -> Result<Option<ThemeRecord>> {
        let path = self.record_path(user_id)?;
        if !path.exists() {
            debug!(path = %path.display(), "No theme record");
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read theme record {}", path.display()))?;
        let record = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse theme record {}", path.display()))?;
        Ok(Some(record))
    }

    fn write_record(&self, user_id: &str, record: &ThemeRecord) -> Result<()> {
        let path = self.record_path(user_id)?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store directory {}", self.dir.display()))?;

        let json = serde_json::to_string_pretty(record).context("Failed to serialize theme record")?;

        // Write beside the target and rename so readers never see a partial record
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace theme record {}", path.display()))?;

        info!(path = %path.display(), "Wrote theme record");
        Ok(())
    }
}

/// User ids become file names; keep them to a single plain component
fn checked_id(user_id: &str) -> Result<&str> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        bail!("invalid user id '{user_id}'");
    }
    Ok(user_id)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl ThemeStore for JsonFileStore {
    async fn persist(&self, user_id: &str, document: &Node, display_name: Option<&str>) -> Result<()> {
        let record = ThemeRecord {
            theme_config: document.clone(),
            shop_name: display_name.map(str::to_string),
            updated_at: unix_now(),
        };
        self.write_record(user_id, &record)
    }

    async fn load(&self, user_id: &str) -> Result<Option<Node>> {
        Ok(self.read_record(user_id)?.map(|record| record.theme_config))
    }
}

impl CatalogSource for JsonFileStore {
    async fn list_items(&self, user_id: &str) -> Result<Vec<CatalogItem>> {
        let path = self.catalog_path(user_id)?;
        if !path.exists() {
            debug!(path = %path.display(), "No catalog file, using empty catalog");
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))
    }
}

/// Identity fixed at construction (CLI flag, tests)
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(pub Option<User>);

impl StaticIdentity {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self(Some(User::new(user_id)))
    }
}

impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.0.clone())
    }
}
