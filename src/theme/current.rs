//! Current theme shape: profile block, social links, checkout and card style

use serde::{Deserialize, Serialize};

use super::{lenient, lenient_version};
use crate::constants::schema;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Per-field text style; every field inherits from the nearest default when absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub uppercase: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub card_background: Option<String>,
}

/// Global font families
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fonts {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarShape {
    Circle,
    Rounded,
    Square,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub avatar_shape: Option<AvatarShape>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub avatar_border_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title_style: Option<TextStyle>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub bio_style: Option<TextStyle>,
}

/// Social platforms a link can point at. Unrecognized tags decode as `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Tiktok,
    #[serde(alias = "x")]
    Twitter,
    Facebook,
    Website,
    Whatsapp,
    Telegram,
    Onlyfans,
    #[default]
    #[serde(other)]
    Other,
}

/// One social link; list position is display order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub platform: Platform,
    #[serde(default, deserialize_with = "lenient")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl LinkItem {
    /// Links without an explicit flag are shown
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialStyle {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

/// Where the cart button sits on the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonPlacement {
    Floating,
    Fixed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    /// Contact handle orders are sent to
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub whatsapp_number: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub show_quantity_selector: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub cart_button_text: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub button_style: Option<ButtonPlacement>,
}

/// Card corner radius: pixels, or any CSS length string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BorderRadius {
    Pixels(f64),
    Css(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStyle {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<BorderRadius>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub button_text_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub price_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title_color: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title_font: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub price_font: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Current-shape theme document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentTheme {
    #[serde(default = "current_version", deserialize_with = "lenient_version")]
    pub schema_version: u32,
    #[serde(default, deserialize_with = "lenient")]
    pub colors: Colors,
    #[serde(default, deserialize_with = "lenient")]
    pub fonts: Fonts,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(default, deserialize_with = "lenient")]
    pub social_links: Vec<LinkItem>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub social_style: Option<SocialStyle>,
    #[serde(default, deserialize_with = "lenient")]
    pub checkout: Checkout,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub card_style: Option<CardStyle>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub background_opacity: Option<f64>,
}

fn current_version() -> u32 {
    schema::CURRENT
}

impl Default for CurrentTheme {
    fn default() -> Self {
        Self {
            schema_version: current_version(),
            colors: Colors::default(),
            fonts: Fonts::default(),
            profile: None,
            social_links: Vec::new(),
            social_style: None,
            checkout: Checkout::default(),
            card_style: None,
            background_image: None,
            background_opacity: None,
        }
    }
}

impl CurrentTheme {
    /// Storefront defaults for a new merchant
    pub fn defaults() -> Self {
        Self {
            schema_version: current_version(),
            colors: Colors {
                background: Some("#ffffff".to_string()),
                text: Some("#000000".to_string()),
                primary: Some("#000000".to_string()),
                card_background: Some("#f3f4f6".to_string()),
            },
            fonts: Fonts {
                heading: Some("Inter".to_string()),
                body: Some("Inter".to_string()),
            },
            profile: Some(Profile {
                display_name: Some(String::new()),
                shop_name: Some(String::new()),
                bio: Some(String::new()),
                avatar_url: Some(String::new()),
                avatar_shape: Some(AvatarShape::Circle),
                avatar_border_color: None,
                title_style: None,
                bio_style: None,
            }),
            social_links: Vec::new(),
            social_style: None,
            checkout: Checkout {
                whatsapp_number: Some(String::new()),
                currency: Some("MXN".to_string()),
                show_quantity_selector: Some(true),
                cart_button_text: Some("Enviar Pedido".to_string()),
                button_style: Some(ButtonPlacement::Floating),
            },
            card_style: Some(CardStyle {
                border_radius: Some(BorderRadius::Pixels(12.0)),
                button_color: Some("#000000".to_string()),
                button_text_color: Some("#ffffff".to_string()),
                price_color: Some("#000000".to_string()),
                title_color: Some("#000000".to_string()),
                ..CardStyle::default()
            }),
            background_image: None,
            background_opacity: None,
        }
    }

    /// Shop name when set and non-empty
    pub fn shop_name(&self) -> Option<&str> {
        self.profile
            .as_ref()
            .and_then(|p| p.shop_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Links shown on the storefront, in display order
    pub fn active_links(&self) -> impl Iterator<Item = &LinkItem> {
        self.social_links.iter().filter(|link| link.is_active())
    }
}
