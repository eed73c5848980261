//! Fixed names and values shared by the theme modules
//!
//! Grouped by the module that consumes them: settings file location, path
//! syntax, schema versions, sanitizer replacements and web-font requests.

/// Settings file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "storefront-theme";

    /// Settings file name
    pub const FILENAME: &str = "settings.json";

    /// Subdirectory holding persisted theme records
    pub const STORE_DIR: &str = "themes";
}

/// Path mutation constants
pub mod path {
    /// Separator between segments of a dotted path (`cards.productPrice.color`)
    pub const SEPARATOR: char = '.';
}

/// Schema versions stamped into theme documents
pub mod schema {
    /// Field carrying the explicit schema version
    pub const VERSION_FIELD: &str = "schemaVersion";

    /// Pre-profile shape (header/cards/global blocks)
    pub const LEGACY: u32 = 1;

    /// Current shape (profile, social links, checkout, card style)
    pub const CURRENT: u32 = 2;
}

/// Sanitization constants
pub mod sanitize {
    /// Replacement corner radius for wrong-typed `cardStyle.borderRadius`
    pub const DEFAULT_BORDER_RADIUS: u64 = 16;

    /// Scheme prefix a background image reference must start with
    pub const IMAGE_SCHEME_PREFIX: &str = "http";
}

/// Web-font constants
pub mod fonts {
    /// Stylesheet endpoint for hosted web fonts
    pub const CSS_BASE: &str = "https://fonts.googleapis.com/css2";

    /// Weights requested for every family
    pub const WEIGHTS: &[u16] = &[400, 700];

    /// Prefix of the resource id a loaded family is registered under
    pub const LINK_ID_PREFIX: &str = "font-";

    /// Separator replacing whitespace in normalized family names
    pub const NORMALIZED_SEPARATOR: char = '-';
}
