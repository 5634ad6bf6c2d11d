// ABOUTME: Flat import/export document for bulk transfer of one container's items.
// ABOUTME: Independent of the per-container record format; parsed in full before any state is touched.

use serde::{Deserialize, Serialize};
use slidecast_core::Item;

pub const DOCUMENT_VERSION: &str = "1.0";

/// One entry in the interchange document. Only the textual payload and the
/// enabled flag travel; ids and styling are regenerated on import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// The `{version, items}` interchange document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDocument {
    pub version: String,
    pub items: Vec<ItemEntry>,
}

impl ItemDocument {
    pub fn from_items(items: &[Item]) -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            items: items
                .iter()
                .map(|item| ItemEntry {
                    title: item.title.clone(),
                    content: item.content.clone(),
                    enabled: item.enabled,
                })
                .collect(),
        }
    }

    /// Materialize the entries as fresh items with default styling.
    pub fn into_items(self) -> Vec<Item> {
        self.items
            .into_iter()
            .map(|entry| {
                let mut item = Item::new(entry.title, entry.content);
                item.enabled = entry.enabled;
                item
            })
            .collect()
    }

    /// Parse a document, failing before any mutation can happen.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_then_import_preserves_payload() {
        let mut items = vec![Item::new("Verse 1", "Amazing grace"), Item::new("Verse 2", "Twas grace")];
        items[1].enabled = false;

        let doc = ItemDocument::from_items(&items);
        assert_eq!(doc.version, "1.0");

        let json = doc.to_json().unwrap();
        let back = ItemDocument::parse(&json).unwrap().into_items();

        assert_eq!(back.len(), 2);
        assert_eq!(back[0].title, "Verse 1");
        assert_eq!(back[0].content, "Amazing grace");
        assert!(back[0].enabled);
        assert!(!back[1].enabled);
        // Fresh identities, not copies of the originals.
        assert_ne!(back[0].id, items[0].id);
    }

    #[test]
    fn entries_default_enabled_to_true() {
        let doc = ItemDocument::parse(
            r#"{"version": "1.0", "items": [{"title": "t", "content": "c"}]}"#,
        )
        .unwrap();

        assert!(doc.items[0].enabled);
    }

    #[test]
    fn malformed_document_fails_to_parse() {
        assert!(ItemDocument::parse("{ nope").is_err());
        assert!(ItemDocument::parse(r#"{"items": "not an array"}"#).is_err());
    }
}
