//! Catalog items as seen by the theme core (read-only)

use serde::{Deserialize, Serialize};

use crate::theme::lenient;

/// Per-item style overrides set from the product styling toolbar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title_font: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub price_font: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub price_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub cart_btn_background: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub cart_btn_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub card_background: Option<String>,
}

/// A product listed on the storefront
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(rename = "style_config", default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub style: Option<ItemStyle>,
}

impl CatalogItem {
    /// Font overrides this item carries (title, then price)
    pub fn font_overrides(&self) -> impl Iterator<Item = &str> {
        self.style
            .iter()
            .flat_map(|s| [s.title_font.as_deref(), s.price_font.as_deref()])
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_without_style_block() {
        let item: CatalogItem = serde_json::from_value(json!({ "id": "p1", "name": "Gorra" })).unwrap();
        assert_eq!(item.style, None);
        assert_eq!(item.font_overrides().count(), 0);
    }

    #[test]
    fn test_partial_style_block() {
        let item: CatalogItem = serde_json::from_value(json!({
            "id": "p2",
            "style_config": { "priceFont": "Bebas Neue", "titleColor": 7 }
        }))
        .unwrap();
        let style = item.style.as_ref().unwrap();
        assert_eq!(style.title_color, None);
        assert_eq!(item.font_overrides().collect::<Vec<_>>(), ["Bebas Neue"]);
    }

    #[test]
    fn test_malformed_style_block_is_ignored() {
        let item: CatalogItem =
            serde_json::from_value(json!({ "id": "p3", "style_config": "bad" })).unwrap();
        assert_eq!(item.style, None);
    }
}
