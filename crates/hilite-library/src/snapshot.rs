//! JSON snapshots of a library: items, note bodies, and annotations.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use hilite_core::{Annotation, Error, Item, ItemId, ItemKind, Result};

fn default_editable() -> bool {
    true
}

/// Serializable library state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    /// Whether the library accepts edits.
    #[serde(default = "default_editable")]
    pub editable: bool,
    /// Currently selected item.
    #[serde(default)]
    pub selected: Option<ItemId>,
    pub items: Vec<Item>,
    /// Note bodies keyed by note item id.
    #[serde(default)]
    pub notes: BTreeMap<ItemId, String>,
    /// Annotations keyed by attachment item id.
    #[serde(default)]
    pub annotations: BTreeMap<ItemId, Vec<Annotation>>,
    /// Items in the trash.
    #[serde(default)]
    pub trashed: BTreeSet<ItemId>,
}

impl LibrarySnapshot {
    /// Read a snapshot from a JSON file.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let snapshot: Self = serde_json::from_str(&content)?;
        snapshot.validate()?;
        debug!(
            path = %path.display(),
            items = snapshot.items.len(),
            "Loaded library snapshot"
        );
        Ok(snapshot)
    }

    /// Write the snapshot as pretty JSON, replacing the file atomically.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!(path = %path.display(), "Saved library snapshot");
        Ok(())
    }

    /// Check referential integrity.
    pub fn validate(&self) -> Result<()> {
        let mut kinds = BTreeMap::new();
        for item in &self.items {
            if kinds.insert(item.id, item.kind).is_some() {
                return Err(Error::InvalidInput(format!("duplicate item id {}", item.id)));
            }
        }

        for item in &self.items {
            if let Some(parent_id) = item.parent_id {
                match kinds.get(&parent_id) {
                    Some(ItemKind::Regular) => {}
                    Some(_) => {
                        return Err(Error::InvalidInput(format!(
                            "item {} has a parent {} that is not a regular item",
                            item.id, parent_id
                        )))
                    }
                    None => return Err(Error::ItemNotFound(parent_id)),
                }
            }
            if item.kind == ItemKind::Attachment && item.attachment_kind.is_none() {
                return Err(Error::InvalidInput(format!(
                    "attachment {} has no attachment_kind",
                    item.id
                )));
            }
        }

        for id in self.notes.keys() {
            if kinds.get(id) != Some(&ItemKind::Note) {
                return Err(Error::InvalidInput(format!(
                    "note body given for item {} which is not a note",
                    id
                )));
            }
        }

        for id in self.annotations.keys() {
            if kinds.get(id) != Some(&ItemKind::Attachment) {
                return Err(Error::InvalidInput(format!(
                    "annotations given for item {} which is not an attachment",
                    id
                )));
            }
        }

        if let Some(selected) = self.selected {
            if !kinds.contains_key(&selected) {
                return Err(Error::ItemNotFound(selected));
            }
        }

        Ok(())
    }
}
