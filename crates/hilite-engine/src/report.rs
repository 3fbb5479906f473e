//! Run report returned by [`crate::Summarizer::run`].

use std::fmt;

use hilite_core::ItemId;

use crate::selection::Unresolved;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Cleanup and extraction ran for the resolved parent.
    Completed,
    /// The pane was read-only; nothing was touched.
    NotEditable,
    /// The selection did not resolve to a parent item.
    NoParent,
    /// The parent had no PDF, EPUB, or snapshot attachments.
    NoAttachments,
}

impl From<Unresolved> for RunOutcome {
    fn from(value: Unresolved) -> Self {
        match value {
            Unresolved::NotEditable => Self::NotEditable,
            Unresolved::NoParent => Self::NoParent,
            Unresolved::NoAttachments => Self::NoAttachments,
        }
    }
}

/// Why an attachment produced no note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoAnnotations,
    NoMatchingAnnotations,
    AnnotationFetchFailed,
    SaveFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAnnotations => write!(f, "no annotations"),
            Self::NoMatchingAnnotations => write!(f, "no matching annotations"),
            Self::AnnotationFetchFailed => write!(f, "annotation fetch failed"),
            Self::SaveFailed => write!(f, "save failed"),
        }
    }
}

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Parent item the run worked on, when resolved.
    pub parent_id: Option<ItemId>,
    pub deleted_notes: Vec<ItemId>,
    pub created_notes: Vec<ItemId>,
    pub skipped: Vec<(ItemId, SkipReason)>,
}

impl RunReport {
    /// Report for a run that stopped before touching anything.
    pub fn stopped(outcome: RunOutcome) -> Self {
        Self {
            outcome,
            parent_id: None,
            deleted_notes: Vec::new(),
            created_notes: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn completed(parent_id: ItemId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::stopped(RunOutcome::Completed)
        }
    }

    /// Whether the run changed the library.
    pub fn has_changes(&self) -> bool {
        !self.deleted_notes.is_empty() || !self.created_notes.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            RunOutcome::Completed => write!(
                f,
                "created {} note(s), deleted {} note(s), skipped {} attachment(s)",
                self.created_notes.len(),
                self.deleted_notes.len(),
                self.skipped.len()
            ),
            RunOutcome::NotEditable => write!(f, "library is not editable, nothing done"),
            RunOutcome::NoParent => write!(f, "selection has no parent item, nothing done"),
            RunOutcome::NoAttachments => {
                write!(f, "no PDF, EPUB, or snapshot attachments, nothing done")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stopped_report_has_no_changes() {
        let report = RunReport::stopped(RunOutcome::NoParent);
        assert!(!report.has_changes());
        assert_eq!(report.parent_id, None);
        assert_eq!(report.to_string(), "selection has no parent item, nothing done");
    }

    #[test]
    fn test_completed_display() {
        let mut report = RunReport::completed(7);
        report.created_notes.push(10);
        report.deleted_notes.extend([8, 9]);
        report.skipped.push((3, SkipReason::NoAnnotations));

        assert!(report.has_changes());
        assert_eq!(
            report.to_string(),
            "created 1 note(s), deleted 2 note(s), skipped 1 attachment(s)"
        );
    }

    #[test]
    fn test_outcome_from_unresolved() {
        assert_eq!(RunOutcome::from(Unresolved::NotEditable), RunOutcome::NotEditable);
        assert_eq!(RunOutcome::from(Unresolved::NoAttachments), RunOutcome::NoAttachments);
    }
}
