// ABOUTME: Defines the Item struct, a single content unit (slide or subtitle line) within a container.
// ABOUTME: Items carry text content, an enabled flag, and opaque style attributes used only by rendering.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Visual attributes for rendering an item. The core logic never inspects
/// these beyond passing them to the renderer; every field has a default so
/// older records deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStyle {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default = "default_align")]
    pub align: String,
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    48
}

fn default_color() -> String {
    "#ffffff".to_string()
}

fn default_background() -> String {
    "#00000000".to_string()
}

fn default_align() -> String {
    "center".to_string()
}

impl Default for ItemStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            color: default_color(),
            background: default_background(),
            bold: false,
            italic: false,
            align: default_align(),
        }
    }
}

/// A single content unit owned by a container: one slide or one subtitle
/// line. Disabled items still exist in the list but render as empty output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: Ulid,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub style: ItemStyle,
}

fn default_enabled() -> bool {
    true
}

impl Item {
    /// Create an enabled item with default styling.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Ulid::new(),
            title: title.into(),
            content: content.into(),
            enabled: true,
            style: ItemStyle::default(),
        }
    }

    /// Copy of this item under a fresh id, title marked as a copy.
    pub fn duplicate(&self) -> Self {
        let mut copy = self.clone();
        copy.id = Ulid::new();
        copy.title = format!("{} (copy)", self.title);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_defaults_to_enabled() {
        let item = Item::new("Verse 1", "Amazing grace");

        assert_eq!(item.title, "Verse 1");
        assert_eq!(item.content, "Amazing grace");
        assert!(item.enabled);
        assert_eq!(item.style, ItemStyle::default());
    }

    #[test]
    fn item_serde_round_trip() {
        let mut item = Item::new("Chorus", "How sweet the sound");
        item.enabled = false;
        item.style.font_size = 64;
        item.style.bold = true;

        let json = serde_json::to_string(&item).expect("serialize");
        let back: Item = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back.id, item.id);
        assert_eq!(back.title, "Chorus");
        assert!(!back.enabled);
        assert_eq!(back.style.font_size, 64);
        assert!(back.style.bold);
    }

    #[test]
    fn item_uses_camel_case_fields() {
        let item = Item::new("t", "c");
        let json = serde_json::to_value(&item).unwrap();

        assert!(json.get("enabled").is_some());
        let style = json.get("style").unwrap();
        assert!(style.get("fontFamily").is_some());
        assert!(style.get("fontSize").is_some());
    }

    #[test]
    fn sparse_record_fills_defaults() {
        let json = format!(r#"{{"id": "{}"}}"#, Ulid::new());
        let item: Item = serde_json::from_str(&json).expect("sparse item should parse");

        assert!(item.enabled);
        assert!(item.title.is_empty());
        assert_eq!(item.style.font_family, "Arial");
        assert_eq!(item.style.font_size, 48);
    }

    #[test]
    fn record_without_id_is_rejected() {
        let result: Result<Item, _> = serde_json::from_str(r#"{"title": "no id"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_gets_fresh_id_and_marked_title() {
        let item = Item::new("Verse 2", "Through many dangers");
        let copy = item.duplicate();

        assert_ne!(copy.id, item.id);
        assert_eq!(copy.title, "Verse 2 (copy)");
        assert_eq!(copy.content, item.content);
    }
}
