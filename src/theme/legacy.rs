//! Legacy theme shape: header/cards/global blocks with flat font names
//!
//! Documents saved before the profile block existed. They are read, migrated
//! once into the current shape, and never written back in this form.

use serde::{Deserialize, Serialize};

use super::current::{CardStyle, Colors, CurrentTheme, Fonts, LinkItem, Platform, Profile, TextStyle};
use super::lenient;

/// Header/card text style of the legacy shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyText {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Named size step (`sm`, `lg`, `2xl`, ...)
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
}

/// Button look of a legacy social link
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyLinkStyle {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
}

/// Social link kept inside the legacy header block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacySocialLink {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    /// `x` reads as [`Platform::Twitter`]; tags outside the set read as `Other`
    #[serde(default, deserialize_with = "lenient")]
    pub platform: Platform,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub style: Option<LegacyLinkStyle>,
}

impl LegacySocialLink {
    fn to_link_item(&self) -> LinkItem {
        LinkItem {
            id: self.id.clone(),
            platform: self.platform,
            url: self.url.clone(),
            color: self.style.as_ref().and_then(|s| s.background_color.clone()),
            ..LinkItem::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyHeader {
    #[serde(default, deserialize_with = "lenient")]
    pub title: LegacyText,
    #[serde(default, deserialize_with = "lenient")]
    pub subtitle: LegacyText,
    #[serde(default, deserialize_with = "lenient")]
    pub bio: LegacyText,
    #[serde(default, deserialize_with = "lenient")]
    pub social_links: Vec<LegacySocialLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddButton {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

/// Oldest button block (`cards.button`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyButton {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitySelector {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCards {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub border: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub product_title: LegacyText,
    #[serde(default, deserialize_with = "lenient")]
    pub product_price: LegacyText,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub product_name: Option<LegacyText>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub add_button: Option<AddButton>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub button: Option<LegacyButton>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub quantity_selector: Option<QuantitySelector>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    Solid,
    Image,
    Gradient,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyGlobal {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background_type: Option<BackgroundType>,
    /// Hex color, CSS gradient, or image URL depending on `background_type`
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background_value: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background_image_url: Option<String>,
}

/// Legacy-shape theme document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyTheme {
    #[serde(default, deserialize_with = "lenient")]
    pub header: LegacyHeader,
    #[serde(default, deserialize_with = "lenient")]
    pub cards: LegacyCards,
    #[serde(default, deserialize_with = "lenient")]
    pub global: LegacyGlobal,
    /// CSS font stack applied to the whole page (`"Inter, sans-serif"`)
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

fn text(font_family: &str, color: &str, font_size: Option<&str>, bold: Option<bool>) -> LegacyText {
    LegacyText {
        font_family: Some(font_family.to_string()),
        color: Some(color.to_string()),
        font_size: font_size.map(str::to_string),
        bold,
        font_weight: None,
    }
}

impl LegacyTheme {
    /// Defaults of the legacy storefront
    pub fn defaults() -> Self {
        Self {
            header: LegacyHeader {
                title: text("Inter", "#000000", Some("2xl"), Some(true)),
                subtitle: text("Inter", "#666666", Some("lg"), Some(false)),
                bio: text("Roboto", "#666666", Some("sm"), None),
                social_links: Vec::new(),
            },
            cards: LegacyCards {
                background: Some("#ffffff".to_string()),
                border: Some(true),
                product_title: LegacyText {
                    font_weight: Some("bold".to_string()),
                    ..text("Inter", "#000000", None, None)
                },
                product_price: text("Inter", "#000000", None, None),
                product_name: Some(text("Inter", "#000000", None, None)),
                add_button: Some(AddButton {
                    bg_color: Some("#000000".to_string()),
                    icon_color: Some("#ffffff".to_string()),
                    shape: Some("circle".to_string()),
                }),
                button: Some(LegacyButton {
                    bg: Some("#000000".to_string()),
                    text: Some("#ffffff".to_string()),
                }),
                quantity_selector: Some(QuantitySelector {
                    bg_color: Some("#f3f4f6".to_string()),
                    text_color: Some("#111827".to_string()),
                    border_color: Some("transparent".to_string()),
                }),
            },
            global: LegacyGlobal {
                background_type: Some(BackgroundType::Solid),
                background_value: Some("#f3f4f6".to_string()),
                background_image_url: None,
            },
            font: None,
        }
    }

    /// Every font family this document names
    pub fn font_families(&self) -> impl Iterator<Item = &str> {
        let flat = self.font.as_deref().and_then(primary_family);
        let named = [
            &self.header.title,
            &self.header.subtitle,
            &self.header.bio,
            &self.cards.product_title,
            &self.cards.product_price,
        ]
        .into_iter()
        .chain(self.cards.product_name.as_ref())
        .filter_map(|t| t.font_family.as_deref());
        flat.into_iter().chain(named)
    }

    /// Map this document onto the current shape
    pub fn to_current(&self) -> CurrentTheme {
        let header = &self.header;
        let cards = &self.cards;

        let flat_font = self.font.as_deref().and_then(primary_family).map(str::to_string);
        let heading = flat_font.clone().or_else(|| header.title.font_family.clone());
        let body = flat_font
            .or_else(|| header.subtitle.font_family.clone())
            .or_else(|| header.bio.font_family.clone());

        let (background, background_image) = match self.global.background_type {
            Some(BackgroundType::Image) => (
                None,
                self.global
                    .background_value
                    .clone()
                    .or_else(|| self.global.background_image_url.clone()),
            ),
            _ => (
                self.global.background_value.clone(),
                self.global.background_image_url.clone(),
            ),
        };

        let add_button = cards.add_button.as_ref();
        let button = cards.button.as_ref();
        let card_style = CardStyle {
            border_radius: None,
            button_color: add_button
                .and_then(|b| b.bg_color.clone())
                .or_else(|| button.and_then(|b| b.bg.clone())),
            button_text_color: add_button
                .and_then(|b| b.icon_color.clone())
                .or_else(|| button.and_then(|b| b.text.clone())),
            price_color: cards.product_price.color.clone(),
            title_color: cards
                .product_title
                .color
                .clone()
                .or_else(|| cards.product_name.as_ref().and_then(|n| n.color.clone())),
            title_font: cards.product_title.font_family.clone(),
            price_font: cards.product_price.font_family.clone(),
            shadow: None,
            opacity: None,
        };

        CurrentTheme {
            colors: Colors {
                background,
                text: header.title.color.clone(),
                primary: None,
                card_background: cards.background.clone(),
            },
            fonts: Fonts { heading, body },
            profile: Some(Profile {
                title_style: Some(text_style(&header.title)),
                bio_style: Some(text_style(&header.bio)),
                ..Profile::default()
            }),
            social_links: header.social_links.iter().map(LegacySocialLink::to_link_item).collect(),
            card_style: Some(card_style),
            background_image,
            ..CurrentTheme::default()
        }
    }
}

fn text_style(legacy: &LegacyText) -> TextStyle {
    TextStyle {
        font_family: legacy.font_family.clone(),
        bold: legacy.bold,
        color: legacy.color.clone(),
        ..TextStyle::default()
    }
}

/// First family of a CSS font stack, quotes stripped (`"'Open Sans', serif"` -> `Open Sans`)
pub fn primary_family(stack: &str) -> Option<&str> {
    let first = stack.split(',').next()?;
    let family = first.trim().trim_matches(|c: char| c == '"' || c == '\'').trim();
    (!family.is_empty()).then_some(family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_family() {
        assert_eq!(primary_family("Inter, sans-serif"), Some("Inter"));
        assert_eq!(primary_family("'Open Sans', serif"), Some("Open Sans"));
        assert_eq!(primary_family("\"Playfair Display\""), Some("Playfair Display"));
        assert_eq!(primary_family("  , serif"), None);
        assert_eq!(primary_family(""), None);
    }

    #[test]
    fn test_to_current_maps_solid_background_and_fonts() {
        let legacy: LegacyTheme = serde_json::from_value(json!({
            "font": "Lobster, cursive",
            "header": { "title": { "color": "#123456", "bold": true } },
            "cards": { "background": "#eeeeee", "button": { "bg": "#ff0000", "text": "#00ff00" } },
            "global": { "backgroundType": "solid", "backgroundValue": "#fafafa" }
        }))
        .unwrap();

        let current = legacy.to_current();
        assert_eq!(current.fonts.heading.as_deref(), Some("Lobster"));
        assert_eq!(current.fonts.body.as_deref(), Some("Lobster"));
        assert_eq!(current.colors.background.as_deref(), Some("#fafafa"));
        assert_eq!(current.colors.card_background.as_deref(), Some("#eeeeee"));
        assert_eq!(current.background_image, None);

        let card = current.card_style.unwrap();
        assert_eq!(card.button_color.as_deref(), Some("#ff0000"));
        assert_eq!(card.button_text_color.as_deref(), Some("#00ff00"));

        let title = current.profile.unwrap().title_style.unwrap();
        assert_eq!(title.color.as_deref(), Some("#123456"));
        assert_eq!(title.bold, Some(true));
    }

    #[test]
    fn test_to_current_image_background() {
        let legacy: LegacyTheme = serde_json::from_value(json!({
            "global": { "backgroundType": "image", "backgroundValue": "https://cdn/bg.png" }
        }))
        .unwrap();
        let current = legacy.to_current();
        assert_eq!(current.background_image.as_deref(), Some("https://cdn/bg.png"));
        assert_eq!(current.colors.background, None);
    }

    #[test]
    fn test_to_current_carries_header_social_links() {
        let legacy: LegacyTheme = serde_json::from_value(json!({
            "header": {
                "socialLinks": [
                    { "id": "a", "platform": "instagram", "url": "https://instagram.com/acme",
                      "style": { "backgroundColor": "#e1306c", "iconColor": "#fff", "borderRadius": "full" } },
                    { "id": "b", "platform": "x", "url": "https://x.com/acme" },
                    { "id": "c", "platform": "youtube", "url": "https://youtube.com/@acme" }
                ]
            }
        }))
        .unwrap();

        let links = legacy.to_current().social_links;
        let ids: Vec<_> = links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(links[0].platform, Platform::Instagram);
        assert_eq!(links[0].color.as_deref(), Some("#e1306c"));
        assert_eq!(links[1].platform, Platform::Twitter);
        assert_eq!(links[1].color, None);
        assert_eq!(links[2].platform, Platform::Other);
        assert_eq!(links[2].url, "https://youtube.com/@acme");
        assert!(links.iter().all(LinkItem::is_active));
    }

    #[test]
    fn test_add_button_wins_over_oldest_button_block() {
        let legacy = LegacyTheme::defaults();
        let mut cards = legacy.cards.clone();
        cards.add_button = Some(AddButton { bg_color: Some("#222222".to_string()), ..AddButton::default() });
        let legacy = LegacyTheme { cards, ..legacy };

        let card = legacy.to_current().card_style.unwrap();
        assert_eq!(card.button_color.as_deref(), Some("#222222"));
        // icon color missing on addButton, so the oldest block fills it
        assert_eq!(card.button_text_color.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn test_font_families_lists_every_source() {
        let legacy = LegacyTheme {
            font: Some("Pacifico, cursive".to_string()),
            ..LegacyTheme::defaults()
        };
        let families: Vec<_> = legacy.font_families().collect();
        assert!(families.contains(&"Pacifico"));
        assert!(families.contains(&"Roboto"));
        assert!(families.contains(&"Inter"));
    }
}
