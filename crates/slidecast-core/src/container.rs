// ABOUTME: Defines the Container struct: a named group (project or worship folder) owning ordered items.
// ABOUTME: Serializes to the per-container durable record format with camelCase fields and a -1 index sentinel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::item::Item;

/// A top-level content group: a slide project or a worship folder. The id is
/// immutable after creation and doubles as the durable record's file name.
/// `current_item_index` remembers the last selection so switching back to a
/// container restores the operator's place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: Ulid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(rename = "createdDate", default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "modifiedDate", default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
    #[serde(default, with = "index_sentinel")]
    pub current_item_index: Option<usize>,
}

impl Container {
    /// Create an empty container with fresh timestamps and no selection.
    pub fn new(
        name: impl Into<String>,
        date: impl Into<String>,
        theme: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Ulid::new(),
            name: name.into(),
            date: date.into(),
            theme: theme.into(),
            items: Vec::new(),
            created_at: now,
            modified_at: now,
            current_item_index: None,
        }
    }

    /// Operator-facing label: "date | theme" when both are set, otherwise
    /// whichever of date or name is available.
    pub fn display_name(&self) -> String {
        if !self.date.is_empty() && !self.theme.is_empty() {
            format!("{} | {}", self.date, self.theme)
        } else if !self.date.is_empty() {
            self.date.clone()
        } else {
            self.name.clone()
        }
    }

    /// Mark the container as modified now.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }

    /// Reset a persisted selection that no longer fits the item list.
    /// Records written by an older session may point past the end after
    /// items were removed elsewhere.
    pub fn clamp_index(&mut self) {
        if let Some(idx) = self.current_item_index
            && idx >= self.items.len()
        {
            self.current_item_index = None;
        }
    }
}

/// Serializes `Option<usize>` as the record format's integer index, with -1
/// standing for "no selection". Any negative value deserializes to None.
mod index_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(idx) => ser.serialize_i64(*idx as i64),
            None => ser.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(de)?;
        if raw < 0 {
            Ok(None)
        } else {
            Ok(Some(raw as usize))
        }
    }
}
