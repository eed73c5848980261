//! Editing session state
//!
//! One `EditorState` exists per editing session. It owns the live document,
//! the selected settings region and the save-in-flight flag. Callers share it
//! by reference; there is no process-wide instance.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use tracing::{debug, info};

use crate::catalog::CatalogItem;
use crate::path::set_at_path;
use crate::theme::{ThemeDocument, hydrate};
use crate::tree::Node;

/// Settings panel regions the editor can focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    #[default]
    Global,
    Background,
    Typography,
    CardStyling,
    SocialGlobal,
    ProfileGlobal,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::Global,
        Region::Background,
        Region::Typography,
        Region::CardStyling,
        Region::SocialGlobal,
        Region::ProfileGlobal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Region::Global => "global",
            Region::Background => "background",
            Region::Typography => "typography",
            Region::CardStyling => "card-styling",
            Region::SocialGlobal => "social-global",
            Region::ProfileGlobal => "profile-global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Region::ALL.into_iter().find(|r| r.name() == s) {
            Some(region) => Ok(region),
            None => bail!("unknown editor region '{s}'"),
        }
    }
}

/// Live state of one editing session
#[derive(Debug, Clone)]
pub struct EditorState {
    document: Node,
    selection: Region,
    saving: bool,
    /// Bumped on every document replacement
    version: u64,
    catalog: Vec<CatalogItem>,
    catalog_version: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Node::object())
    }
}

impl EditorState {
    pub fn new(document: Node) -> Self {
        Self {
            document,
            selection: Region::default(),
            saving: false,
            version: 0,
            catalog: Vec::new(),
            catalog_version: 0,
        }
    }

    /// Session over a stored document, migrated and filled from defaults
    pub fn from_stored(raw: &Node) -> Self {
        Self::new(hydrate(raw))
    }

    pub fn document(&self) -> &Node {
        &self.document
    }

    /// Typed view of the held document
    pub fn theme(&self) -> ThemeDocument {
        ThemeDocument::from_tree(&self.document)
    }

    pub fn selection(&self) -> Region {
        self.selection
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn catalog(&self) -> &[CatalogItem] {
        &self.catalog
    }

    pub fn catalog_version(&self) -> u64 {
        self.catalog_version
    }

    /// Write `value` at `path` in the held document
    pub fn update(&mut self, path: &str, value: Node) {
        debug!(path = %path, kind = %value.kind(), "Updating document");
        self.document = set_at_path(&self.document, path, value);
        self.version += 1;
    }

    /// Replace the held document outright
    pub fn load_document(&mut self, document: Node) {
        info!(previous_version = self.version, "Loading document into editor");
        self.document = document;
        self.version += 1;
    }

    pub fn set_catalog(&mut self, items: Vec<CatalogItem>) {
        debug!(count = items.len(), "Replacing catalog");
        self.catalog = items;
        self.catalog_version += 1;
    }

    pub fn select(&mut self, region: Region) {
        debug!(region = %region, "Selecting region");
        self.selection = region;
    }

    /// Select a region by name.
    ///
    /// # Panics
    /// If `name` is not a known region. Region names come from the settings
    /// panel, so an unknown one is an integration bug.
    pub fn select_named(&mut self, name: &str) {
        match name.parse() {
            Ok(region) => self.select(region),
            Err(e) => panic!("{e}"),
        }
    }

    /// Mark a save as started. Returns false when one is already in flight.
    pub fn begin_save(&mut self) -> bool {
        if self.saving {
            return false;
        }
        self.saving = true;
        true
    }

    pub fn end_save(&mut self) {
        self.saving = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::get_at_path;
    use serde_json::{Value, json};

    #[test]
    fn test_update_replaces_document_and_bumps_version() {
        let mut editor = EditorState::default();
        let before = editor.document().clone();

        editor.update("profile.bioStyle.color", Node::from("#fff"));

        assert_eq!(editor.version(), 1);
        assert_eq!(
            Value::from(editor.document().clone()),
            json!({ "profile": { "bioStyle": { "color": "#fff" } } })
        );
        assert_eq!(Value::from(before), json!({}));
    }

    #[test]
    fn test_load_document_replaces_without_merging() {
        let mut editor = EditorState::new(Node::from(json!({ "colors": { "text": "#000" } })));
        editor.load_document(Node::from(json!({ "fonts": { "body": "Lato" } })));

        assert!(editor.document().get("colors").is_none());
        assert_eq!(
            get_at_path(editor.document(), "fonts.body").and_then(Node::as_str),
            Some("Lato")
        );
        assert_eq!(editor.version(), 1);
    }

    #[test]
    fn test_from_stored_hydrates() {
        let editor = EditorState::from_stored(&Node::from(json!({ "header": { "title": { "fontFamily": "Oswald" } } })));
        let theme = editor.theme();
        let current = theme.as_current().unwrap();
        assert_eq!(current.fonts.heading.as_deref(), Some("Oswald"));
        assert_eq!(current.checkout.currency.as_deref(), Some("MXN"));
    }

    #[test]
    fn test_region_names_round_trip() {
        for region in Region::ALL {
            assert_eq!(region.name().parse::<Region>().unwrap(), region);
        }
        assert!("sidebar".parse::<Region>().is_err());
    }

    #[test]
    fn test_select_named() {
        let mut editor = EditorState::default();
        assert_eq!(editor.selection(), Region::Global);
        editor.select_named("card-styling");
        assert_eq!(editor.selection(), Region::CardStyling);
    }

    #[test]
    #[should_panic(expected = "unknown editor region 'sidebar'")]
    fn test_select_unknown_region_panics() {
        EditorState::default().select_named("sidebar");
    }

    #[test]
    fn test_save_flag() {
        let mut editor = EditorState::default();
        assert!(editor.begin_save());
        assert!(!editor.begin_save());
        assert!(editor.is_saving());
        editor.end_save();
        assert!(editor.begin_save());
    }

    #[test]
    fn test_catalog_version_tracks_replacements() {
        let mut editor = EditorState::default();
        editor.set_catalog(vec![CatalogItem::default()]);
        assert_eq!(editor.catalog_version(), 1);
        assert_eq!(editor.catalog().len(), 1);
        assert_eq!(editor.version(), 0);
    }
}
