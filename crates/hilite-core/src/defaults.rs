//! Centralized default constants for hilite.
//!
//! Every crate and the CLI reference these constants instead of repeating
//! literals. The summary header and citation marker are part of the note
//! format consulted by cleanup, so changing them orphans older notes.

// =============================================================================
// SUMMARY NOTE
// =============================================================================

/// Default annotation color collected into summary notes (the host's yellow).
pub const TARGET_COLOR: &str = "#ffd400";

/// Default summary title. Rendered as `<h2>{title} ({color}) from ...`.
pub const SUMMARY_TITLE: &str = "Ord og forkortelser";

/// Label used in the header when an attachment has no title.
pub const ATTACHMENT_FALLBACK_TITLE: &str = "attachment";

/// Prefix of notes the host generates from annotations ("Add Note from Annotations").
pub const HOST_CITATION_MARKER: &str = "<div data-citation-items";

/// Substring that must also appear in a host-generated annotation note.
pub const HOST_ANNOTATIONS_LABEL: &str = "Annotations";

/// Name used in the structured tag appended to every generated note.
pub const SUMMARY_TAG_NAME: &str = "hilite:summary";

/// Remove host-generated annotation notes during cleanup.
pub const REMOVE_HOST_ANNOTATION_NOTES: bool = true;

/// Ask the host to select created notes after a run.
pub const SELECT_CREATED: bool = true;

// =============================================================================
// HOST URIS
// =============================================================================

/// Scheme used for annotation links.
pub const URI_SCHEME: &str = "zotero";

/// Library path segment for the user's personal library.
pub const URI_LIBRARY_PATH: &str = "library/items";

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Environment variable pointing to a TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "HILITE_CONFIG";

/// Prefix for per-field environment overrides.
pub const ENV_PREFIX: &str = "HILITE_";

/// Default tracing filter for the CLI.
pub const LOG_FILTER: &str = "hilite_cli=info,hilite_engine=info,hilite_library=info,hilite_core=info";
