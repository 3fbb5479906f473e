//! # hilite-engine
//!
//! Builds per-attachment summary notes from colored highlight and underline
//! annotations.
//!
//! A run has three sequential phases against a [`LibraryHost`]:
//!
//! 1. [`resolve_selection`] finds the parent item and candidate attachments.
//! 2. [`remove_previous_notes`] trashes earlier summaries for the target color
//!    and host-generated annotation notes.
//! 3. [`Summarizer`] filters each attachment's annotations, renders an HTML
//!    table, and saves it as a child note of the parent.
//!
//! [`LibraryHost`]: hilite_core::LibraryHost

pub mod cleanup;
pub mod filter;
pub mod marker;
pub mod render;
pub mod report;
pub mod selection;
pub mod summarizer;

pub use cleanup::{remove_previous_notes, CleanupReport};
pub use filter::{is_summary_annotation, select_annotations};
pub use marker::{classify, NoteClass, SummaryMarker};
pub use render::{escape_html, page_number, render_summary, SummaryRow};
pub use report::{RunOutcome, RunReport, SkipReason};
pub use selection::{resolve_selection, Selection, Unresolved};
pub use summarizer::Summarizer;
