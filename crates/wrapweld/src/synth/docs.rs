//! Doc string propagation

/// Marker appended to truncated docs
pub const ELLIPSIS: &str = "...";

/// Bound a doc string and make it safe inside a block comment
///
/// Absent docs become an empty string. Docs longer than `max_chars`
/// characters are cut and suffixed with [`ELLIPSIS`]; carriage returns are
/// dropped. Backslashes become `&#92;` so no `\uXXXX` escape survives into
/// host source, then `*/` is replaced so it cannot close the comment early.
pub fn sanitize_doc(doc: Option<&str>, max_chars: usize) -> String {
    let Some(doc) = doc else {
        return String::new();
    };

    let bounded = if doc.chars().count() > max_chars {
        let mut cut: String = doc.chars().take(max_chars).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        doc.to_string()
    };

    bounded
        .replace('\r', "")
        .replace('\\', "&#92;")
        .replace("*/", "*&#47;")
}
