//! Host library abstraction.
//!
//! Every read and mutation of the reference library goes through
//! [`LibraryHost`]. Implementations own storage, transactions, and the
//! item/annotation relationships; hilite only issues calls in sequence.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

/// The reference-library host.
///
/// Mutating calls (`trash`, `save_note`) are all-or-nothing transactions.
#[async_trait]
pub trait LibraryHost: Send + Sync {
    /// Whether the active library pane accepts edits.
    async fn is_editable(&self) -> bool;

    /// The single currently selected item, if any.
    async fn selected_item(&self) -> Result<Option<Item>>;

    /// Fetch an item by id.
    async fn item(&self, id: ItemId) -> Result<Item>;

    /// Child attachments of a regular item, in host order.
    async fn attachments(&self, parent: ItemId) -> Result<Vec<Item>>;

    /// Child notes of a regular item, in host order.
    async fn notes(&self, parent: ItemId) -> Result<Vec<Item>>;

    /// HTML body of a note. `None` when the note has no body.
    async fn note_body(&self, note: ItemId) -> Result<Option<String>>;

    /// All annotations on an attachment.
    async fn annotations(&self, attachment: ItemId) -> Result<Vec<Annotation>>;

    /// Stable URI opening `annotation` inside `attachment`.
    fn annotation_uri(&self, attachment: &Item, annotation: &Annotation) -> String;

    /// Move items to the trash in a single transaction.
    async fn trash(&self, ids: &[ItemId]) -> Result<()>;

    /// Create a child note in a single transaction, returning its id.
    async fn save_note(&self, req: CreateNoteRequest) -> Result<ItemId>;

    /// Select items in the host pane. Hosts without a pane ignore this.
    async fn select_items(&self, _ids: &[ItemId]) -> Result<()> {
        Ok(())
    }
}
