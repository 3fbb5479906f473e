//! Library data model: items, attachments, annotations, and notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric item id assigned by the host library.
pub type ItemId = i64;

// =============================================================================
// ITEMS
// =============================================================================

/// Top-level classification of a library item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Bibliographic record (book, article, ...).
    Regular,
    /// File or link attached to a regular item (or standalone).
    Attachment,
    /// HTML note, standalone or child of a regular item.
    Note,
}

/// Content kind of an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Pdf,
    Epub,
    /// Saved web page snapshot.
    Snapshot,
    /// Any other file type; never summarized.
    Other,
}

impl AttachmentKind {
    /// Whether annotations on this kind of attachment can be summarized.
    pub fn supports_annotations(&self) -> bool {
        matches!(self, Self::Pdf | Self::Epub | Self::Snapshot)
    }

    /// Reader route used in annotation URIs (`open-pdf`, `open-epub`, ...).
    pub fn reader_route(&self) -> &'static str {
        match self {
            Self::Pdf => "open-pdf",
            Self::Epub => "open-epub",
            Self::Snapshot => "open-snapshot",
            Self::Other => "select",
        }
    }
}

/// A library item as seen through the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Stable 8-character library key.
    pub key: String,
    pub kind: ItemKind,
    /// Parent item for child attachments and child notes.
    #[serde(default)]
    pub parent_id: Option<ItemId>,
    #[serde(default)]
    pub title: Option<String>,
    /// Set for attachments only.
    #[serde(default)]
    pub attachment_kind: Option<AttachmentKind>,
    pub date_added: DateTime<Utc>,
}

impl Item {
    /// Create a regular (bibliographic) item.
    pub fn regular(id: ItemId, key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            kind: ItemKind::Regular,
            parent_id: None,
            title: Some(title.into()),
            attachment_kind: None,
            date_added: Utc::now(),
        }
    }

    /// Create an attachment item, optionally under a parent.
    pub fn attachment(
        id: ItemId,
        key: impl Into<String>,
        parent_id: Option<ItemId>,
        kind: AttachmentKind,
        title: Option<String>,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            kind: ItemKind::Attachment,
            parent_id,
            title,
            attachment_kind: Some(kind),
            date_added: Utc::now(),
        }
    }

    /// Create a note item under a parent.
    pub fn note(id: ItemId, key: impl Into<String>, parent_id: Option<ItemId>) -> Self {
        Self {
            id,
            key: key.into(),
            kind: ItemKind::Note,
            parent_id,
            title: None,
            attachment_kind: None,
            date_added: Utc::now(),
        }
    }

    pub fn is_regular(&self) -> bool {
        self.kind == ItemKind::Regular
    }

    pub fn is_attachment(&self) -> bool {
        self.kind == ItemKind::Attachment
    }

    pub fn is_note(&self) -> bool {
        self.kind == ItemKind::Note
    }

    /// Top-level items have no parent.
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// A PDF, EPUB, or snapshot attachment.
    pub fn is_annotatable_attachment(&self) -> bool {
        self.is_attachment()
            && self
                .attachment_kind
                .is_some_and(|kind| kind.supports_annotations())
    }

    /// Title to show in a summary header, with a fallback for untitled files.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => crate::defaults::ATTACHMENT_FALLBACK_TITLE,
        }
    }
}

// =============================================================================
// ANNOTATIONS
// =============================================================================

/// Annotation type as reported by the host reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    Highlight,
    Underline,
    Note,
    Text,
    Image,
    Ink,
    #[serde(other)]
    Other,
}

impl AnnotationType {
    /// Text-marking annotations (the only ones with extracted text).
    pub fn marks_text(&self) -> bool {
        matches!(self, Self::Highlight | Self::Underline)
    }
}

/// One annotation on an attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Stable annotation key.
    pub key: String,
    #[serde(rename = "type")]
    pub annotation_type: AnnotationType,
    /// Hex color, compared case-insensitively.
    pub color: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub comment: String,
    /// Reader position as a JSON string, e.g. `{"pageIndex":4,"rects":[...]}`.
    #[serde(default)]
    pub position: String,
}

impl Annotation {
    /// Convenience constructor used by hosts and tests.
    pub fn new(
        key: impl Into<String>,
        annotation_type: AnnotationType,
        color: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            annotation_type,
            color: color.into(),
            text: text.into(),
            comment: String::new(),
            position: String::new(),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    /// Position on page `page_index` (zero-based), in the host's JSON encoding.
    pub fn with_page_index(self, page_index: u32) -> Self {
        let position = serde_json::json!({ "pageIndex": page_index, "rects": [] }).to_string();
        self.with_position(position)
    }
}

/// Decoded annotation position. Only the page index is consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AnnotationPosition {
    #[serde(rename = "pageIndex")]
    pub page_index: Option<u32>,
}

impl AnnotationPosition {
    /// Decode the host's JSON position string.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// 1-based page label; saturates at `u32::MAX` instead of overflowing.
    pub fn page_number(&self) -> Option<u32> {
        self.page_index.map(|index| index.saturating_add(1))
    }
}

// =============================================================================
// NOTES
// =============================================================================

/// Request for creating a child note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    pub parent_id: ItemId,
    /// HTML body.
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotatable_attachment_predicate() {
        let pdf = Item::attachment(2, "AAAA2222", Some(1), AttachmentKind::Pdf, None);
        let png = Item::attachment(3, "AAAA3333", Some(1), AttachmentKind::Other, None);
        let regular = Item::regular(1, "AAAA1111", "Book");

        assert!(pdf.is_annotatable_attachment());
        assert!(!png.is_annotatable_attachment());
        assert!(!regular.is_annotatable_attachment());
    }

    #[test]
    fn test_display_title_fallback() {
        let untitled = Item::attachment(2, "AAAA2222", Some(1), AttachmentKind::Pdf, None);
        let blank = Item::attachment(3, "AAAA3333", Some(1), AttachmentKind::Pdf, Some("  ".into()));
        let titled =
            Item::attachment(4, "AAAA4444", Some(1), AttachmentKind::Pdf, Some("Full Text".into()));

        assert_eq!(untitled.display_title(), "attachment");
        assert_eq!(blank.display_title(), "attachment");
        assert_eq!(titled.display_title(), "Full Text");
    }

    #[test]
    fn test_top_level() {
        let child = Item::attachment(2, "AAAA2222", Some(1), AttachmentKind::Pdf, None);
        let standalone = Item::attachment(3, "AAAA3333", None, AttachmentKind::Pdf, None);
        assert!(!child.is_top_level());
        assert!(standalone.is_top_level());
    }

    #[test]
    fn test_annotation_type_deserializes_unknown_as_other() {
        let t: AnnotationType = serde_json::from_str("\"squiggle\"").unwrap();
        assert_eq!(t, AnnotationType::Other);
        let t: AnnotationType = serde_json::from_str("\"underline\"").unwrap();
        assert_eq!(t, AnnotationType::Underline);
    }

    #[test]
    fn test_annotation_json_uses_type_field() {
        let json = r##"{"key":"ANNO0001","type":"highlight","color":"#FFD400","text":"word"}"##;
        let annotation: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(annotation.annotation_type, AnnotationType::Highlight);
        assert_eq!(annotation.comment, "");
        assert_eq!(annotation.position, "");
    }

    #[test]
    fn test_with_page_index_round_trips_through_position() {
        let annotation =
            Annotation::new("ANNO0001", AnnotationType::Highlight, "#ffd400", "x").with_page_index(4);
        let position: AnnotationPosition = serde_json::from_str(&annotation.position).unwrap();
        assert_eq!(position.page_index, Some(4));
    }

    #[test]
    fn test_page_number_is_one_based() {
        let position = AnnotationPosition::parse(r#"{"pageIndex": 0, "rects": []}"#).unwrap();
        assert_eq!(position.page_number(), Some(1));
    }

    #[test]
    fn test_page_number_saturates_at_last_index() {
        let position = AnnotationPosition::parse(r#"{"pageIndex": 4294967295}"#).unwrap();
        assert_eq!(position.page_number(), Some(u32::MAX));
    }

    #[test]
    fn test_page_number_without_index() {
        let position = AnnotationPosition::parse(r#"{"rects": []}"#).unwrap();
        assert_eq!(position.page_number(), None);
    }
}
