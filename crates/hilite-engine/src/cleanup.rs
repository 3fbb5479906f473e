//! Removal of previous summary notes and host-generated annotation notes.

use tracing::{debug, info, instrument, warn};

use hilite_core::{Item, ItemId, LibraryHost, Result, SummaryConfig};

use crate::marker::{classify, NoteClass};

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Notes moved to the trash.
    pub deleted: Vec<ItemId>,
    /// Notes that matched but could not be trashed.
    pub failed: Vec<ItemId>,
}

/// Trash every child note of `parent` that is a host annotation note or a
/// prior summary for the configured color.
///
/// Listing the notes is the only fallible step surfaced to the caller;
/// unreadable bodies and failed deletions are logged and skipped.
#[instrument(
    skip(host, parent, config),
    fields(subsystem = "engine", component = "cleanup", op = "remove_previous", item_id = parent.id)
)]
pub async fn remove_previous_notes(
    host: &dyn LibraryHost,
    parent: &Item,
    config: &SummaryConfig,
) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();

    for note in host.notes(parent.id).await? {
        let body = match host.note_body(note.id).await {
            Ok(Some(body)) if !body.is_empty() => body,
            Ok(_) => {
                debug!(note_id = note.id, "Skipping note without body");
                continue;
            }
            Err(e) => {
                warn!(note_id = note.id, error = %e, "Could not read note body, skipping");
                continue;
            }
        };

        let class = classify(&body, config);
        if !class.is_removable() {
            continue;
        }

        match host.trash(&[note.id]).await {
            Ok(()) => {
                match class {
                    NoteClass::HostAnnotations => {
                        info!(note_id = note.id, "Removed host annotation note")
                    }
                    _ => info!(note_id = note.id, color = %config.target_color, "Removed previous summary note"),
                }
                report.deleted.push(note.id);
            }
            Err(e) => {
                warn!(note_id = note.id, error = %e, "Failed to trash note");
                report.failed.push(note.id);
            }
        }
    }

    Ok(report)
}
