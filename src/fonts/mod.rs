//! Font families used by a storefront
//!
//! Resolve which web-font families a theme and its catalog reference, and
//! build the stylesheet requests that load them.

mod tracker;

pub use tracker::{FontLoader, FontTracker, StylesheetLink, StylesheetRegistry};

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::CatalogItem;
use crate::config::FontSettings;
use crate::constants::fonts::{LINK_ID_PREFIX, NORMALIZED_SEPARATOR};
use crate::theme::ThemeDocument;

/// Web-font families offered by the font picker
pub const AVAILABLE_FONTS: &[&str] = &[
    "Roboto", "Open Sans", "Lato", "Montserrat", "Oswald", "Raleway", "Merriweather",
    "Nunito", "Playfair Display", "Rubik", "Poppins", "Lobster", "Pacifico", "Dancing Script",
    "Abril Fatface", "Bebas Neue", "Anton", "Gloria Hallelujah", "Indie Flower", "Titan One",
    "Inter", "Roboto Condensed", "Slabo 27px", "Source Sans Pro", "PT Sans", "Noto Sans",
    "Ubuntu", "Roboto Slab", "PT Serif", "Arimo", "Bitter", "Muli", "Dosis", "Josefin Sans",
    "Oxygen", "Cabin", "Inconsolata", "Fira Sans", "Crimson Text", "Asap", "Quicksand",
    "Karla", "Hind", "Barlow", "Maven Pro", "Vollkorn", "Bree Serif", "Comfortaa", "Exo 2",
    "Righteous", "Fredoka One", "Permanent Marker", "Shadows Into Light", "Amatic SC",
    "Cinzel", "Courgette", "Great Vibes", "Sacramento", "Satisfy", "Yellowtail",
];

/// Sorted, deduplicated picker list
pub fn list_fonts() -> Vec<&'static str> {
    let fonts: BTreeSet<_> = AVAILABLE_FONTS.iter().copied().collect();
    fonts.into_iter().collect()
}

/// Every distinct font family the document and catalog reference.
///
/// Sources: body and heading fonts, profile title/bio styles, then each
/// item's title and price overrides. Legacy documents contribute their page
/// font and header/card families. Blank names are skipped.
pub fn resolve_fonts(document: &ThemeDocument, items: &[CatalogItem]) -> BTreeSet<String> {
    let mut fonts = BTreeSet::new();
    let mut add = |name: &str| {
        let name = name.trim();
        if !name.is_empty() {
            fonts.insert(name.to_string());
        }
    };

    match document {
        ThemeDocument::Current(theme) => {
            let profile = theme.profile.as_ref();
            [
                theme.fonts.body.as_deref(),
                theme.fonts.heading.as_deref(),
                profile
                    .and_then(|p| p.title_style.as_ref())
                    .and_then(|s| s.font_family.as_deref()),
                profile
                    .and_then(|p| p.bio_style.as_ref())
                    .and_then(|s| s.font_family.as_deref()),
            ]
            .into_iter()
            .flatten()
            .for_each(&mut add);
        }
        ThemeDocument::Legacy(theme) => theme.font_families().for_each(&mut add),
    }

    items
        .iter()
        .flat_map(CatalogItem::font_overrides)
        .for_each(&mut add);

    debug!(count = fonts.len(), "Resolved font families");
    fonts
}

/// Deduplication key for a family: lowercase, whitespace runs joined by `-`
/// (`"Playfair  Display"` -> `playfair-display`)
pub fn normalize_family(family: &str) -> String {
    family
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(&NORMALIZED_SEPARATOR.to_string())
        .to_lowercase()
}

/// Resource id a family's stylesheet is registered under
pub fn link_id(family: &str) -> String {
    format!("{LINK_ID_PREFIX}{}", normalize_family(family))
}

/// Stylesheet URL loading `family` at the configured weights
pub fn stylesheet_url(family: &str, settings: &FontSettings) -> String {
    let family_param = family.split_whitespace().collect::<Vec<_>>().join("+");
    let weights = settings
        .weights
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(";");
    format!(
        "{}?family={family_param}:wght@{weights}&display=swap",
        settings.css_base
    )
}
