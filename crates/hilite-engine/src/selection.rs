//! Resolution of the parent item and candidate attachments from the host selection.

use tracing::{debug, instrument, warn};

use hilite_core::{Item, LibraryHost, Result};

/// Parent item plus the attachments to summarize.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub parent: Item,
    pub attachments: Vec<Item>,
}

/// Why no selection could be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    /// The host pane does not accept edits.
    NotEditable,
    /// Nothing selected, or a note / top-level attachment was selected.
    NoParent,
    /// A parent was found but it has no PDF, EPUB, or snapshot attachment.
    NoAttachments,
}

/// Resolve the current host selection.
///
/// - Regular item: it is the parent; candidates are its annotatable attachments.
/// - Child attachment: its parent is the parent; candidates are the attachment
///   itself when annotatable.
/// - Anything else resolves no parent.
#[instrument(skip(host), fields(subsystem = "engine", component = "selection", op = "resolve"))]
pub async fn resolve_selection(
    host: &dyn LibraryHost,
) -> Result<std::result::Result<Selection, Unresolved>> {
    if !host.is_editable().await {
        debug!("Library pane is not editable");
        return Ok(Err(Unresolved::NotEditable));
    }

    let Some(selected) = host.selected_item().await? else {
        debug!("Nothing selected");
        return Ok(Err(Unresolved::NoParent));
    };

    let (parent, attachments) = if selected.is_regular() {
        let attachments = host
            .attachments(selected.id)
            .await?
            .into_iter()
            .filter(Item::is_annotatable_attachment)
            .collect::<Vec<_>>();
        (selected, attachments)
    } else if selected.is_attachment() && !selected.is_top_level() {
        let Some(parent_id) = selected.parent_id else {
            return Ok(Err(Unresolved::NoParent));
        };
        let parent = host.item(parent_id).await?;
        let attachments = if selected.is_annotatable_attachment() {
            vec![selected]
        } else {
            Vec::new()
        };
        (parent, attachments)
    } else {
        debug!(item_id = selected.id, kind = ?selected.kind, "Selection has no parent item");
        return Ok(Err(Unresolved::NoParent));
    };

    if attachments.is_empty() {
        warn!(item_id = parent.id, "No PDF, EPUB, or snapshot attachments found");
        return Ok(Err(Unresolved::NoAttachments));
    }

    debug!(
        item_id = parent.id,
        attachment_count = attachments.len(),
        "Resolved selection"
    );
    Ok(Ok(Selection {
        parent,
        attachments,
    }))
}
