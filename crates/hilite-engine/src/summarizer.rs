//! The summary run: resolve selection, clean up, extract, render, save.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use hilite_core::{CreateNoteRequest, Item, ItemId, LibraryHost, Result, SummaryConfig};

use crate::cleanup::remove_previous_notes;
use crate::filter::select_annotations;
use crate::render::{render_summary, SummaryRow};
use crate::report::{RunOutcome, RunReport, SkipReason};
use crate::selection::{resolve_selection, Selection, Unresolved};

/// Drives one summary run against a library host.
///
/// Host calls are awaited strictly in sequence. Only the editability and
/// selection checks can end a run early; every later failure is logged and
/// recorded in the [`RunReport`].
pub struct Summarizer {
    host: Arc<dyn LibraryHost>,
    config: SummaryConfig,
}

impl Summarizer {
    pub fn new(host: Arc<dyn LibraryHost>, config: SummaryConfig) -> Self {
        Self { host, config }
    }

    pub fn config(&self) -> &SummaryConfig {
        &self.config
    }

    /// Run against the host's current selection.
    #[instrument(
        skip(self),
        fields(subsystem = "engine", component = "summarizer", op = "run", color = %self.config.target_color)
    )]
    pub async fn run(&self) -> RunReport {
        let selection = match resolve_selection(self.host.as_ref()).await {
            Ok(Ok(selection)) => selection,
            Ok(Err(unresolved)) => {
                info!(reason = ?unresolved, "Nothing to summarize");
                return RunReport::stopped(unresolved.into());
            }
            Err(e) => {
                warn!(error = %e, "Could not resolve selection");
                return RunReport::stopped(Unresolved::NoParent.into());
            }
        };

        self.summarize(&selection).await
    }

    /// Clean up and summarize an already resolved selection.
    pub async fn summarize(&self, selection: &Selection) -> RunReport {
        let parent = &selection.parent;
        let mut report = RunReport::completed(parent.id);

        match remove_previous_notes(self.host.as_ref(), parent, &self.config).await {
            Ok(cleanup) => report.deleted_notes = cleanup.deleted,
            Err(e) => warn!(item_id = parent.id, error = %e, "Could not list notes for cleanup"),
        }

        for attachment in &selection.attachments {
            match self.summarize_attachment(parent, attachment).await {
                Ok(note_id) => report.created_notes.push(note_id),
                Err(reason) => report.skipped.push((attachment.id, reason)),
            }
        }

        if self.config.select_created && !report.created_notes.is_empty() {
            if let Err(e) = self.host.select_items(&report.created_notes).await {
                warn!(error = %e, "Could not select created notes");
            }
        }

        info!(
            item_id = parent.id,
            created = report.created_notes.len(),
            deleted = report.deleted_notes.len(),
            skipped = report.skipped.len(),
            "Summary run finished"
        );
        report
    }

    /// Build and save the note for one attachment.
    async fn summarize_attachment(
        &self,
        parent: &Item,
        attachment: &Item,
    ) -> std::result::Result<ItemId, SkipReason> {
        let annotations = match self.host.annotations(attachment.id).await {
            Ok(annotations) => annotations,
            Err(e) => {
                warn!(attachment_id = attachment.id, error = %e, "Could not fetch annotations");
                return Err(SkipReason::AnnotationFetchFailed);
            }
        };

        if annotations.is_empty() {
            debug!(attachment_id = attachment.id, "No annotations found");
            return Err(SkipReason::NoAnnotations);
        }

        let selected = select_annotations(&annotations, &self.config.target_color);
        if selected.is_empty() {
            debug!(
                attachment_id = attachment.id,
                annotation_count = annotations.len(),
                "No annotations match the target color"
            );
            return Err(SkipReason::NoMatchingAnnotations);
        }

        let rows: Vec<SummaryRow> = selected
            .into_iter()
            .map(|annotation| {
                let uri = self.host.annotation_uri(attachment, annotation);
                SummaryRow::from_annotation(annotation, uri)
            })
            .collect();

        let body = render_summary(&self.config, attachment.display_title(), &rows);

        match self.save(parent.id, body).await {
            Ok(note_id) => {
                info!(
                    attachment_id = attachment.id,
                    note_id,
                    row_count = rows.len(),
                    "Created summary note"
                );
                Ok(note_id)
            }
            Err(e) => {
                warn!(attachment_id = attachment.id, error = %e, "Failed to save summary note");
                Err(SkipReason::SaveFailed)
            }
        }
    }

    async fn save(&self, parent_id: ItemId, body: String) -> Result<ItemId> {
        self.host
            .save_note(CreateNoteRequest { parent_id, body })
            .await
    }
}
