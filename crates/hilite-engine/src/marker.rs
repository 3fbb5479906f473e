//! Recognition of notes produced by earlier runs or by the host.
//!
//! Summary notes are recognized two ways: the legacy header prefix
//! `<h2>{title} ({color}`, matched byte-exactly, and the structured tag
//! `<!-- hilite:summary color="#rrggbb" -->` appended to every note this
//! crate renders.

use once_cell::sync::Lazy;
use regex::Regex;

use hilite_core::defaults::{HOST_ANNOTATIONS_LABEL, SUMMARY_TAG_NAME};
use hilite_core::SummaryConfig;

use crate::filter::colors_match;

static SUMMARY_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<!--\s*hilite:summary\s+color="(#[0-9A-Fa-f]{3}(?:[0-9A-Fa-f]{3})?)"\s*-->\s*\z"#)
        .expect("summary tag pattern is valid")
});

/// What cleanup should make of an existing note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteClass {
    /// Note the host generated from annotations.
    HostAnnotations,
    /// Summary for the run's target color from an earlier run.
    PriorSummary,
    /// Anything else; left alone.
    Unrelated,
}

impl NoteClass {
    pub fn is_removable(&self) -> bool {
        !matches!(self, Self::Unrelated)
    }
}

/// Structured tag carried by generated notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryMarker {
    /// Lowercase color recorded in the tag.
    pub color: String,
}

impl SummaryMarker {
    pub fn new(color: &str) -> Self {
        Self {
            color: color.to_ascii_lowercase(),
        }
    }

    /// Read the tag closing a note body. A tag followed by other content is ignored.
    pub fn parse(body: &str) -> Option<Self> {
        SUMMARY_TAG
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|color| Self::new(color.as_str()))
    }

    /// HTML comment form appended to rendered notes.
    pub fn to_html(&self) -> String {
        format!("<!-- {} color=\"{}\" -->", SUMMARY_TAG_NAME, self.color)
    }
}

/// Host "Add Note from Annotations" output: citation prefix plus the label.
pub fn is_host_annotation_note(body: &str, config: &SummaryConfig) -> bool {
    body.starts_with(&config.host_citation_marker) && body.contains(HOST_ANNOTATIONS_LABEL)
}

/// Summary for the configured color, by legacy prefix or structured tag.
pub fn is_prior_summary(body: &str, config: &SummaryConfig) -> bool {
    if body.starts_with(&config.header_prefix()) {
        return true;
    }
    SummaryMarker::parse(body)
        .is_some_and(|marker| colors_match(&marker.color, &config.target_color))
}

/// Classify a note body for cleanup.
pub fn classify(body: &str, config: &SummaryConfig) -> NoteClass {
    if config.remove_host_annotation_notes && is_host_annotation_note(body, config) {
        NoteClass::HostAnnotations
    } else if is_prior_summary(body, config) {
        NoteClass::PriorSummary
    } else {
        NoteClass::Unrelated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SummaryConfig {
        SummaryConfig::for_color("#ffd400")
    }

    #[test]
    fn test_host_annotation_note_detected() {
        let body = r#"<div data-citation-items="%5B%5D" data-schema-version="9"><h1>Annotations<br/>(10/3/2026)</h1></div>"#;
        assert_eq!(classify(body, &config()), NoteClass::HostAnnotations);
    }

    #[test]
    fn test_citation_marker_without_label_is_unrelated() {
        let body = r#"<div data-citation-items="%5B%5D"><p>Reading notes</p></div>"#;
        assert_eq!(classify(body, &config()), NoteClass::Unrelated);
    }

    #[test]
    fn test_label_without_citation_prefix_is_unrelated() {
        let body = "<p>Annotations I want to keep</p>";
        assert_eq!(classify(body, &config()), NoteClass::Unrelated);
    }

    #[test]
    fn test_host_notes_kept_when_disabled() {
        let config = SummaryConfig {
            remove_host_annotation_notes: false,
            ..config()
        };
        let body = r#"<div data-citation-items="x"><h1>Annotations</h1></div>"#;
        assert_eq!(classify(body, &config), NoteClass::Unrelated);
    }

    #[test]
    fn test_legacy_prefix_for_target_color() {
        let body = "<h2>Ord og forkortelser (#ffd400) from Paper.pdf</h2><table></table>";
        assert_eq!(classify(body, &config()), NoteClass::PriorSummary);
    }

    #[test]
    fn test_legacy_prefix_for_other_color_is_unrelated() {
        let body = "<h2>Ord og forkortelser (#ff6666) from Paper.pdf</h2><table></table>";
        assert_eq!(classify(body, &config()), NoteClass::Unrelated);
    }

    #[test]
    fn test_legacy_prefix_is_case_sensitive() {
        let body = "<h2>Ord og forkortelser (#FFD400) from Paper.pdf</h2>";
        assert_eq!(classify(body, &config()), NoteClass::Unrelated);

        let body = "<H2>Ord og forkortelser (#ffd400) from Paper.pdf</H2>";
        assert_eq!(classify(body, &config()), NoteClass::Unrelated);
    }

    #[test]
    fn test_legacy_prefix_must_start_body() {
        let body = "<p>x</p><h2>Ord og forkortelser (#ffd400) from Paper.pdf</h2>";
        assert_eq!(classify(body, &config()), NoteClass::Unrelated);
    }

    #[test]
    fn test_structured_tag_matches_any_case() {
        let body = "<h2>Renamed</h2><table></table><!-- hilite:summary color=\"#FFD400\" -->";
        assert_eq!(classify(body, &config()), NoteClass::PriorSummary);
    }

    #[test]
    fn test_structured_tag_other_color_is_unrelated() {
        let body = "<h2>Renamed</h2><!-- hilite:summary color=\"#5fb236\" -->";
        assert_eq!(classify(body, &config()), NoteClass::Unrelated);
    }

    #[test]
    fn test_marker_round_trip() {
        let marker = SummaryMarker::new("#FFD400");
        let html = marker.to_html();
        assert_eq!(html, "<!-- hilite:summary color=\"#ffd400\" -->");
        assert_eq!(SummaryMarker::parse(&html), Some(marker));
    }

    #[test]
    fn test_tag_inside_user_note_is_unrelated() {
        let body = "<p>Copied from last week:</p><h2>Renamed</h2><!-- hilite:summary color=\"#ffd400\" --><p>My own thoughts</p>";
        assert_eq!(SummaryMarker::parse(body), None);
        assert_eq!(classify(body, &config()), NoteClass::Unrelated);
    }

    #[test]
    fn test_tag_with_trailing_whitespace() {
        let body = "<table></table>\n<!-- hilite:summary color=\"#ffd400\" -->\n";
        assert_eq!(classify(body, &config()), NoteClass::PriorSummary);
    }

    #[test]
    fn test_marker_parse_rejects_malformed() {
        assert_eq!(SummaryMarker::parse("<!-- hilite:summary color=\"yellow\" -->"), None);
        assert_eq!(SummaryMarker::parse("<p>no tag</p>"), None);
    }

    #[test]
    fn test_removable() {
        assert!(NoteClass::HostAnnotations.is_removable());
        assert!(NoteClass::PriorSummary.is_removable());
        assert!(!NoteClass::Unrelated.is_removable());
    }
}
