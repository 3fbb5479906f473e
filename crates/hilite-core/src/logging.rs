//! Structured logging field name constants for hilite.
//!
//! All crates use these constants for consistent structured logging fields,
//! so a JSON log stream can be filtered by the same keys everywhere.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Run cannot proceed at all (CLI startup, unreadable library) |
//! | WARN  | Recovered failure: save/trash/fetch failed, malformed position |
//! | INFO  | Run lifecycle, notes created and deleted |
//! | DEBUG | Decision points: skipped attachments, note classification |
//! | TRACE | Per-annotation filtering and rendering |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "engine", "library", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "selection", "cleanup", "render", "summarizer"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "resolve", "trash", "save_note", "fetch_annotations"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Item id being operated on (regular item or parent).
pub const ITEM_ID: &str = "item_id";

/// Attachment item id.
pub const ATTACHMENT_ID: &str = "attachment_id";

/// Note item id.
pub const NOTE_ID: &str = "note_id";

/// Annotation key.
pub const ANNOTATION_KEY: &str = "annotation_key";

/// Target color of the run.
pub const COLOR: &str = "color";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of annotations fetched for an attachment.
pub const ANNOTATION_COUNT: &str = "annotation_count";

/// Number of table rows rendered into a note.
pub const ROW_COUNT: &str = "row_count";

/// Number of notes deleted or created.
pub const NOTE_COUNT: &str = "note_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
