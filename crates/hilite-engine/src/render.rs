//! HTML rendering of summary notes.
//!
//! A summary note is a header, one table row per annotation, and the
//! structured [`SummaryMarker`] tag:
//!
//! ```text
//! <h2>Ord og forkortelser (#ffd400) from Paper.pdf</h2>
//! <table>
//! <tr><td>text</td><td>comment</td><td><a href="zotero://...">5</a></td></tr>
//! </table>
//! <!-- hilite:summary color="#ffd400" -->
//! ```

use tracing::{trace, warn};

use hilite_core::{Annotation, AnnotationPosition, SummaryConfig};

use crate::marker::SummaryMarker;

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub text: String,
    pub comment: String,
    pub uri: String,
    /// 1-based page number, `None` when the position could not be read.
    pub page: Option<u32>,
}

impl SummaryRow {
    /// Build a row from an annotation and its host URI.
    pub fn from_annotation(annotation: &Annotation, uri: String) -> Self {
        Self {
            text: annotation.text.clone(),
            comment: annotation.comment.clone(),
            uri,
            page: page_number(annotation),
        }
    }
}

/// Replace `&`, `<`, `>` with their entities, in that order.
pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// 1-based page number decoded from the annotation's JSON position.
///
/// Malformed positions are logged and yield `None`.
pub fn page_number(annotation: &Annotation) -> Option<u32> {
    match AnnotationPosition::parse(&annotation.position) {
        Ok(position) => position.page_number(),
        Err(e) => {
            warn!(
                annotation_key = %annotation.key,
                error = %e,
                "Could not parse annotation position, leaving page empty"
            );
            None
        }
    }
}

/// Header line; its prefix is what cleanup matches on later runs.
pub fn render_header(config: &SummaryConfig, attachment_title: &str) -> String {
    format!("{}) from {}</h2>", config.header_prefix(), attachment_title)
}

fn render_row(row: &SummaryRow) -> String {
    let page = row.page.map(|p| p.to_string()).unwrap_or_default();
    format!(
        "<tr><td>{}</td><td>{}</td><td><a href=\"{}\">{}</a></td></tr>",
        escape_html(&row.text),
        escape_html(&row.comment),
        row.uri,
        page
    )
}

/// Full note body for one attachment.
pub fn render_summary(
    config: &SummaryConfig,
    attachment_title: &str,
    rows: &[SummaryRow],
) -> String {
    let mut html = render_header(config, attachment_title);
    html.push('\n');
    html.push_str("<table>\n");
    for row in rows {
        trace!(page = ?row.page, "Rendering summary row");
        html.push_str(&render_row(row));
        html.push('\n');
    }
    html.push_str("</table>\n");
    html.push_str(&SummaryMarker::new(&config.normalized_color()).to_html());
    html
}

/// Number of table rows in a rendered summary body.
pub fn count_rows(body: &str) -> usize {
    body.matches("<tr>").count()
}
