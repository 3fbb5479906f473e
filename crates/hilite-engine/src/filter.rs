//! Annotation selection by type and color.

use hilite_core::Annotation;

/// Case-insensitive, exact color comparison.
pub fn colors_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Whether an annotation belongs in a summary for `target_color`.
///
/// Only highlights and underlines qualify; their color must equal the
/// target exactly, ignoring ASCII case.
pub fn is_summary_annotation(annotation: &Annotation, target_color: &str) -> bool {
    annotation.annotation_type.marks_text() && colors_match(&annotation.color, target_color)
}

/// Qualifying annotations in their original order.
pub fn select_annotations<'a>(
    annotations: &'a [Annotation],
    target_color: &str,
) -> Vec<&'a Annotation> {
    annotations
        .iter()
        .filter(|annotation| is_summary_annotation(annotation, target_color))
        .collect()
}
