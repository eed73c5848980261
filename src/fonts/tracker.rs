//! Load requests for resolved font families

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use tracing::{debug, info, warn};

use super::{link_id, normalize_family, resolve_fonts, stylesheet_url};
use crate::catalog::CatalogItem;
use crate::config::FontSettings;
use crate::theme::ThemeDocument;

/// Something that can make a font family available for rendering
pub trait FontLoader {
    /// Load `family` from `url`. Called at most once per normalized family.
    fn ensure_font_loaded(&mut self, family: &str, url: &str) -> Result<()>;
}

/// A stylesheet reference registered for one family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetLink {
    pub id: String,
    pub family: String,
    pub href: String,
}

/// In-memory stylesheet registry keyed by link id
#[derive(Debug, Default)]
pub struct StylesheetRegistry {
    links: BTreeMap<String, StylesheetLink>,
}

impl StylesheetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, family: &str) -> bool {
        self.links.contains_key(&link_id(family))
    }

    pub fn links(&self) -> impl Iterator<Item = &StylesheetLink> {
        self.links.values()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl FontLoader for StylesheetRegistry {
    fn ensure_font_loaded(&mut self, family: &str, url: &str) -> Result<()> {
        let id = link_id(family);
        if self.links.contains_key(&id) {
            debug!(id = %id, "Stylesheet already registered");
            return Ok(());
        }
        info!(family = %family, id = %id, "Registering font stylesheet");
        self.links.insert(
            id.clone(),
            StylesheetLink {
                id,
                family: family.to_string(),
                href: url.to_string(),
            },
        );
        Ok(())
    }
}

/// Keeps the set of requested families in step with the editor state.
///
/// Resolution reruns only when the document or catalog version changes, and
/// each normalized family is handed to the loader once. A failed load is
/// logged and not retried.
#[derive(Debug)]
pub struct FontTracker {
    settings: FontSettings,
    seen_versions: Option<(u64, u64)>,
    requested: BTreeSet<String>,
    failed: BTreeSet<String>,
}

impl FontTracker {
    pub fn new(settings: FontSettings) -> Self {
        Self {
            settings,
            seen_versions: None,
            requested: BTreeSet::new(),
            failed: BTreeSet::new(),
        }
    }

    /// Request any families not yet requested. Returns the families newly
    /// handed to the loader, in resolution order.
    pub fn sync<L: FontLoader>(
        &mut self,
        loader: &mut L,
        document: &ThemeDocument,
        document_version: u64,
        items: &[CatalogItem],
        catalog_version: u64,
    ) -> Vec<String> {
        let versions = (document_version, catalog_version);
        if self.seen_versions == Some(versions) {
            return Vec::new();
        }
        self.seen_versions = Some(versions);

        let mut newly_requested = Vec::new();
        for family in resolve_fonts(document, items) {
            let key = normalize_family(&family);
            if !self.requested.insert(key.clone()) {
                continue;
            }

            let url = stylesheet_url(&family, &self.settings);
            if let Err(e) = loader.ensure_font_loaded(&family, &url) {
                warn!(family = %family, error = %e, "Failed to load font family");
                self.failed.insert(key);
            }
            newly_requested.push(family);
        }

        if !newly_requested.is_empty() {
            debug!(count = newly_requested.len(), "Requested font families");
        }
        newly_requested
    }

    /// Normalized keys of every family requested so far
    pub fn requested(&self) -> &BTreeSet<String> {
        &self.requested
    }

    /// Normalized keys whose load failed
    pub fn failed(&self) -> &BTreeSet<String> {
        &self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ItemStyle;
    use crate::theme::{CurrentTheme, Fonts};

    /// Records every call and fails for one family
    #[derive(Default)]
    struct RecordingLoader {
        calls: Vec<String>,
        fail_on: Option<String>,
    }

    impl FontLoader for RecordingLoader {
        fn ensure_font_loaded(&mut self, family: &str, _url: &str) -> Result<()> {
            self.calls.push(family.to_string());
            if self.fail_on.as_deref() == Some(family) {
                anyhow::bail!("network unreachable");
            }
            Ok(())
        }
    }

    fn doc(body: &str, heading: &str) -> ThemeDocument {
        ThemeDocument::Current(CurrentTheme {
            fonts: Fonts {
                body: Some(body.to_string()),
                heading: Some(heading.to_string()),
            },
            ..CurrentTheme::default()
        })
    }

    fn styled_item(font: &str) -> CatalogItem {
        CatalogItem {
            id: font.to_string(),
            name: font.to_string(),
            style: Some(ItemStyle {
                title_font: Some(font.to_string()),
                ..ItemStyle::default()
            }),
        }
    }

    #[test]
    fn test_registry_registers_once_per_family() {
        let mut registry = StylesheetRegistry::new();
        registry.ensure_font_loaded("Open Sans", "https://a").unwrap();
        registry.ensure_font_loaded("Open Sans", "https://b").unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("open  sans"));
        let link = registry.links().next().unwrap();
        assert_eq!(link.id, "font-open-sans");
        assert_eq!(link.href, "https://a");
    }

    #[test]
    fn test_no_duplicate_loads_across_edits() {
        let mut tracker = FontTracker::new(FontSettings::default());
        let mut loader = RecordingLoader::default();

        tracker.sync(&mut loader, &doc("Inter", "Oswald"), 1, &[], 1);
        tracker.sync(&mut loader, &doc("Inter", "Lobster"), 2, &[], 1);
        tracker.sync(&mut loader, &doc("inter", "Oswald"), 3, &[], 1);

        assert_eq!(loader.calls, ["Inter", "Oswald", "Lobster"]);
        assert_eq!(tracker.requested().len(), 3);
    }

    #[test]
    fn test_unchanged_versions_skip_resolution() {
        let mut tracker = FontTracker::new(FontSettings::default());
        let mut loader = RecordingLoader::default();

        tracker.sync(&mut loader, &doc("Inter", "Inter"), 1, &[], 1);
        // Same versions: the new family is not seen until a version moves.
        let skipped = tracker.sync(&mut loader, &doc("Inter", "Anton"), 1, &[], 1);
        assert!(skipped.is_empty());

        let added = tracker.sync(&mut loader, &doc("Inter", "Anton"), 1, &[styled_item("Lobster")], 2);
        assert_eq!(added, ["Anton", "Lobster"]);
    }

    #[test]
    fn test_failure_is_isolated_and_not_retried() {
        let mut tracker = FontTracker::new(FontSettings::default());
        let mut loader = RecordingLoader {
            fail_on: Some("Lobster".to_string()),
            ..RecordingLoader::default()
        };

        let items = [styled_item("Lobster"), styled_item("Pacifico")];
        let requested = tracker.sync(&mut loader, &doc("Inter", "Inter"), 1, &items, 1);
        assert_eq!(requested, ["Inter", "Lobster", "Pacifico"]);
        assert!(tracker.failed().contains("lobster"));

        tracker.sync(&mut loader, &doc("Inter", "Inter"), 2, &items, 1);
        assert_eq!(loader.calls.iter().filter(|f| *f == "Lobster").count(), 1);
    }

    #[test]
    fn test_tracker_feeds_registry_urls() {
        let mut tracker = FontTracker::new(FontSettings::default());
        let mut registry = StylesheetRegistry::new();

        tracker.sync(&mut registry, &doc("Playfair Display", "Inter"), 1, &[], 1);

        let hrefs: Vec<_> = registry.links().map(|l| l.href.as_str()).collect();
        assert!(hrefs.contains(
            &"https://fonts.googleapis.com/css2?family=Playfair+Display:wght@400;700&display=swap"
        ));
    }
}
