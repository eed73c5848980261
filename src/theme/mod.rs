//! Theme configuration documents
//!
//! Two shapes exist in stored data:
//! - **legacy**: header/cards/global blocks with a flat page font
//! - **current**: profile, social links, checkout and card style blocks
//!
//! Current documents carry an explicit `schemaVersion`. Older documents have no
//! version and their shape is inferred from which blocks are present; they are
//! migrated once, when an editing session loads them.

pub mod current;
pub mod legacy;
mod merge;

pub use current::{
    AvatarShape, BorderRadius, ButtonPlacement, CardStyle, Checkout, Colors, CurrentTheme, Fonts,
    LinkItem, Platform, Profile, SocialStyle, TextAlign, TextStyle,
};
pub use legacy::{LegacyTheme, primary_family};
pub use merge::merge_defaults;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::constants::schema;
use crate::path::{remove_at_path, set_at_path};
use crate::tree::Node;

/// Top-level blocks that only exist in the current shape
const CURRENT_KEYS: &[&str] = &[
    "profile",
    "socialLinks",
    "socialStyle",
    "checkout",
    "cardStyle",
    "fonts",
    "colors",
];

/// Top-level blocks that only exist in the legacy shape
const LEGACY_KEYS: &[&str] = &["header", "cards", "global", "font"];

/// Decode a field, falling back to its default when the stored value has the
/// wrong type. One malformed field never discards the rest of a document.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode a schema version. Anything that is not a whole number in range
/// reads as the current version.
pub(crate) fn lenient_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(schema::CURRENT))
}

/// Which schema a raw document follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Legacy,
    Current,
    /// Unversioned document holding blocks of both shapes
    Mixed,
}

/// Classify a raw document. An explicit `schemaVersion` wins; otherwise the
/// shape is inferred from the top-level blocks present. Empty documents are
/// current.
pub fn detect_shape(tree: &Node) -> Shape {
    match tree.get(schema::VERSION_FIELD).and_then(Node::as_u64) {
        Some(v) if v == u64::from(schema::LEGACY) => return Shape::Legacy,
        Some(v) if v >= u64::from(schema::CURRENT) => return Shape::Current,
        _ => {}
    }

    let has = |keys: &[&str]| keys.iter().any(|k| tree.get(k).is_some());
    match (has(CURRENT_KEYS), has(LEGACY_KEYS)) {
        (true, true) => Shape::Mixed,
        (false, true) => Shape::Legacy,
        _ => Shape::Current,
    }
}

/// A theme document in one of its two shapes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ThemeDocument {
    Legacy(LegacyTheme),
    Current(CurrentTheme),
}

impl ThemeDocument {
    /// Fresh legacy default instance
    pub fn default_legacy() -> Self {
        ThemeDocument::Legacy(LegacyTheme::defaults())
    }

    /// Fresh current default instance
    pub fn default_current() -> Self {
        ThemeDocument::Current(CurrentTheme::defaults())
    }

    /// Typed view of a raw document, without filling defaults.
    ///
    /// Mixed documents are read as current; run [`migrate`] first to carry
    /// their legacy blocks over.
    pub fn from_tree(tree: &Node) -> Self {
        let value = match Value::from(tree.clone()) {
            obj @ Value::Object(_) => obj,
            other => {
                warn!(kind = %Node::from(other).kind(), "Theme root is not an object, reading as empty");
                Value::Object(Default::default())
            }
        };

        match detect_shape(tree) {
            Shape::Legacy => ThemeDocument::Legacy(decode(value)),
            Shape::Current | Shape::Mixed => ThemeDocument::Current(decode(value)),
        }
    }

    /// Raw tree form of this document
    pub fn to_tree(&self) -> Node {
        let value = match self {
            ThemeDocument::Legacy(legacy) => serde_json::to_value(legacy),
            ThemeDocument::Current(current) => serde_json::to_value(current),
        };
        // Plain data structs with string keys always serialize.
        value.map(Node::from).unwrap_or_default()
    }

    pub fn shape(&self) -> Shape {
        match self {
            ThemeDocument::Legacy(_) => Shape::Legacy,
            ThemeDocument::Current(_) => Shape::Current,
        }
    }

    pub fn as_current(&self) -> Option<&CurrentTheme> {
        match self {
            ThemeDocument::Current(current) => Some(current),
            ThemeDocument::Legacy(_) => None,
        }
    }

    /// Current-shape view, migrating legacy documents on the fly
    pub fn to_current(&self) -> CurrentTheme {
        match self {
            ThemeDocument::Current(current) => current.clone(),
            ThemeDocument::Legacy(legacy) => legacy.to_current(),
        }
    }

    /// Shop name from the profile block, when set and non-empty
    pub fn shop_name(&self) -> Option<&str> {
        self.as_current().and_then(CurrentTheme::shop_name)
    }

    /// Legacy tree built from the flat design columns of older profile
    /// records, for merchants that never saved a theme document.
    pub fn from_legacy_profile_columns(
        bg_color: Option<&str>,
        title_color: Option<&str>,
        font: Option<&str>,
    ) -> Node {
        let family = primary_family(font.unwrap_or("Inter")).unwrap_or("Inter");

        let mut tree = Node::object();
        if let Some(bg) = bg_color {
            tree = set_at_path(&tree, "global.backgroundValue", Node::from(bg));
        }
        if let Some(color) = title_color {
            tree = set_at_path(&tree, "header.title.color", Node::from(color));
        }
        tree = set_at_path(&tree, "header.title.fontFamily", Node::from(family));
        set_at_path(&tree, "header.subtitle.fontFamily", Node::from(family))
    }
}

fn decode<T: DeserializeOwned + Default>(value: Value) -> T {
    serde_json::from_value(value).unwrap_or_else(|err| {
        warn!(error = %err, "Failed to decode theme document, using empty document");
        T::default()
    })
}

/// Bring a raw document to the current shape.
///
/// Legacy blocks are mapped onto current fields and dropped; when a mixed
/// document has both, the current fields win. The result is stamped with the
/// current `schemaVersion`. Already-current documents only gain the stamp; a
/// version that is neither legacy nor current is overwritten.
pub fn migrate(tree: &Node) -> Node {
    let shape = detect_shape(tree);
    let stamped = tree.get(schema::VERSION_FIELD).and_then(Node::as_u64)
        == Some(u64::from(schema::CURRENT));

    let migrated = match shape {
        Shape::Current if stamped => return tree.clone(),
        Shape::Current => tree.clone(),
        Shape::Legacy | Shape::Mixed => {
            let legacy: LegacyTheme = decode(Value::from(tree.clone()));
            let carried = ThemeDocument::Current(legacy.to_current()).to_tree();
            let remaining = LEGACY_KEYS
                .iter()
                .chain(std::iter::once(&schema::VERSION_FIELD))
                .fold(tree.clone(), |t, key| remove_at_path(&t, key));
            info!(shape = ?shape, "Migrating legacy theme document");
            merge_defaults(&carried, &remaining)
        }
    };

    debug!(shape = ?shape, "Stamping schema version");
    set_at_path(
        &migrated,
        schema::VERSION_FIELD,
        Node::from(u64::from(schema::CURRENT)),
    )
}

/// Prepare a stored document for an editing session: migrate it, then merge
/// it over the current defaults so every block the editor draws exists.
pub fn hydrate(raw: &Node) -> Node {
    let defaults = ThemeDocument::default_current().to_tree();
    let raw = if raw.is_object() { raw.clone() } else { Node::object() };
    merge_defaults(&defaults, &migrate(&raw))
}
