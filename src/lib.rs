//! Theme configuration core of a storefront builder
//!
//! Documents live as persistent value trees ([`tree::Node`]) and are edited
//! through dotted paths ([`path::set_at_path`]). Typed views ([`theme`]) are
//! rebuilt at the load and save edges. Saves are sanitized before they reach a
//! store, and the set of web fonts a storefront needs is derived from the
//! document and its catalog.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod constants;
pub mod editor;
pub mod fonts;
pub mod path;
pub mod persistence;
pub mod sanitize;
pub mod store;
pub mod theme;
pub mod tree;

pub use catalog::{CatalogItem, ItemStyle};
pub use config::{FontSettings, Settings};
pub use editor::{EditorState, Region};
pub use fonts::{FontLoader, FontTracker, StylesheetRegistry, normalize_family, resolve_fonts};
pub use path::{get_at_path, remove_at_path, set_at_path};
pub use persistence::{
    CatalogSource, IdentityProvider, SaveError, SaveReceipt, ThemeStore, User, open_session, save,
};
pub use sanitize::{Sanitized, sanitize};
pub use store::{JsonFileStore, StaticIdentity, ThemeRecord};
pub use theme::{Shape, ThemeDocument, detect_shape, hydrate, migrate};
pub use tree::Node;
