//! Pre-save scrubbing of theme documents
//!
//! A deny-list of known-dangerous field shapes. Malformed values are corrected
//! in place of rejecting the save; fields without a rule pass through as-is.

use tracing::warn;

use crate::constants::sanitize::{DEFAULT_BORDER_RADIUS, IMAGE_SCHEME_PREFIX};
use crate::path::{get_at_path, remove_at_path, set_at_path};
use crate::tree::Node;

/// Paths holding background image references
const IMAGE_PATHS: &[&str] = &["backgroundImage", "global.backgroundImageUrl"];

const CARD_STYLE: &str = "cardStyle";
const BORDER_RADIUS_PATH: &str = "cardStyle.borderRadius";
const SHOP_NAME_PATH: &str = "profile.shopName";

/// A document ready to cross to persistence
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub document: Node,
    /// Shop name copied out of the profile block for listing/search
    pub display_name: Option<String>,
}

/// Scrub `document` for persistence. Never fails and is idempotent.
pub fn sanitize(document: &Node) -> Sanitized {
    let mut doc = document.clone();

    for path in IMAGE_PATHS {
        if let Some(value) = get_at_path(&doc, path) {
            if !is_safe_image_ref(value) {
                warn!(path = %path, kind = %value.kind(), "Dropping unsafe background image reference");
                doc = remove_at_path(&doc, path);
            }
        }
    }

    if doc.get(CARD_STYLE).is_some_and(Node::is_object) {
        let radius = get_at_path(&doc, BORDER_RADIUS_PATH);
        if !matches!(radius, Some(Node::Number(_) | Node::String(_))) {
            warn!(
                kind = %radius.map_or("absent", Node::kind),
                "Replacing card border radius with default"
            );
            doc = set_at_path(&doc, BORDER_RADIUS_PATH, Node::from(DEFAULT_BORDER_RADIUS));
        }
    }

    let display_name = display_name(&doc);
    Sanitized { document: doc, display_name }
}

fn is_safe_image_ref(value: &Node) -> bool {
    value.as_str().is_some_and(|s| s.starts_with(IMAGE_SCHEME_PREFIX))
}

/// Denormalized display name: `profile.shopName` when a non-empty string
pub fn display_name(document: &Node) -> Option<String> {
    get_at_path(document, SHOP_NAME_PATH)
        .and_then(Node::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_script_background_image_is_dropped() {
        let result = sanitize(&Node::from(json!({ "backgroundImage": "javascript:alert(1)" })));
        assert!(result.document.get("backgroundImage").is_none());
    }

    #[test]
    fn test_http_background_image_is_kept() {
        let input = Node::from(json!({ "backgroundImage": "https://cdn.example.com/bg.jpg" }));
        let result = sanitize(&input);
        assert!(result.document.same_ref(&input));
    }

    #[test]
    fn test_non_string_background_image_is_dropped() {
        let result = sanitize(&Node::from(json!({
            "backgroundImage": { "url": "https://x" },
            "global": { "backgroundImageUrl": 5, "backgroundType": "image" }
        })));
        assert_eq!(
            Value::from(result.document),
            json!({ "global": { "backgroundType": "image" } })
        );
    }

    #[test]
    fn test_bool_border_radius_becomes_default() {
        let result = sanitize(&Node::from(json!({ "cardStyle": { "borderRadius": true } })));
        assert_eq!(
            get_at_path(&result.document, "cardStyle.borderRadius").and_then(Node::as_u64),
            Some(16)
        );
    }

    #[test]
    fn test_absent_border_radius_in_card_style_becomes_default() {
        let result = sanitize(&Node::from(json!({ "cardStyle": { "priceColor": "#000" } })));
        assert_eq!(
            Value::from(result.document),
            json!({ "cardStyle": { "priceColor": "#000", "borderRadius": 16 } })
        );
    }

    #[test]
    fn test_number_and_string_border_radius_pass_through() {
        for radius in [json!(4), json!("0.75rem")] {
            let input = Node::from(json!({ "cardStyle": { "borderRadius": radius.clone() } }));
            let result = sanitize(&input);
            assert!(result.document.same_ref(&input), "radius {radius} was rewritten");
        }
    }

    #[test]
    fn test_missing_card_style_is_left_alone() {
        let input = Node::from(json!({ "fonts": { "body": "Inter" } }));
        assert!(sanitize(&input).document.same_ref(&input));
    }

    #[test]
    fn test_uncovered_fields_pass_through() {
        let input = Node::from(json!({
            "colors": { "background": 12345 },
            "socialLinks": "weird",
            "unknownBlock": { "x": [1, 2, 3] }
        }));
        let result = sanitize(&input);
        assert_eq!(result.document, input);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let input = Node::from(json!({
            "backgroundImage": "ftp://nope",
            "cardStyle": { "borderRadius": [1] },
            "profile": { "shopName": "Acme" }
        }));
        let once = sanitize(&input);
        let twice = sanitize(&once.document);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_display_name_from_shop_name() {
        let result = sanitize(&Node::from(json!({ "profile": { "shopName": "Acme" } })));
        assert_eq!(result.display_name.as_deref(), Some("Acme"));

        let empty = sanitize(&Node::from(json!({ "profile": { "shopName": "" } })));
        assert_eq!(empty.display_name, None);

        let missing = sanitize(&Node::from(json!({})));
        assert_eq!(missing.display_name, None);
    }
}
