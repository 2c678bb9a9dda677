//! Document pass: keyword-triggered long-form documents.
//!
//! The first case-insensitive occurrence of a document keyword claims
//! everything from the keyword to the end of the text, provided at least
//! [`MIN_BODY_CHARS`] characters follow it. Because the span runs to the end
//! of the buffer, a keyword that shows up mid-stream absorbs whatever
//! arrives after it.

use lexchat_core::Artifact;

pub(crate) const DOCUMENT_MARKER: &str = "[Document shown in artifact]";

const KEYWORDS: [&str; 5] = ["CONTRACT", "AGREEMENT", "MEMO", "POLICY", "PROCEDURE"];

/// Characters that must follow the keyword for the span to count.
pub(crate) const MIN_BODY_CHARS: usize = 200;

fn keyword_at(bytes: &[u8]) -> Option<&'static str> {
    KEYWORDS
        .into_iter()
        .find(|kw| bytes.len() >= kw.len() && bytes[..kw.len()].eq_ignore_ascii_case(kw.as_bytes()))
}

/// Pull at most one document out of `text`.
pub(crate) fn extract_document(text: &str, artifacts: &mut Vec<Artifact>) -> String {
    let bytes = text.as_bytes();

    for start in 0..bytes.len() {
        // Keywords are ASCII, so a match always begins on a char boundary.
        let Some(keyword) = keyword_at(&bytes[start..]) else {
            continue;
        };
        let body = &text[start + keyword.len()..];

        // Later occurrences have even less text after them.
        if body.chars().nth(MIN_BODY_CHARS - 1).is_none() {
            break;
        }

        artifacts.push(Artifact::document(&text[start..]));
        let mut out = String::with_capacity(start + DOCUMENT_MARKER.len());
        out.push_str(&text[..start]);
        out.push_str(DOCUMENT_MARKER);
        return out;
    }

    text.to_string()
}
