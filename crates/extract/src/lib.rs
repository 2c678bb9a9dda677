//! Artifact extraction for streamed bot messages.
//!
//! [`extract`] splits a message's raw text into a conversational remainder
//! and an ordered list of artifacts. It is a pure function of its input: the
//! session calls it again over the whole accumulated buffer on every
//! fragment, so nothing carries over between calls.
//!
//! # Passes
//!
//! ```text
//! raw text ──▶ code pass ──▶ table pass ──▶ document pass ──▶ tidy ──▶ fallback
//!              (remove)      (marker)       (marker)          │
//!                                                             └─ collapse \n{3,}, drop
//!                                                                placeholder lines,
//!                                                                collapse again, trim
//! ```
//!
//! Each pass works on what the previous passes left, so a span is never
//! classified twice. Artifacts are ordered by pass, then by position.
//!
//! Every pass is a single forward scan over the working text. Re-running
//! all of them per fragment makes a full streamed response quadratic in its
//! length, which is fine at chat-message scale.

mod cleanup;
mod code;
mod document;
mod table;

use lexchat_core::{ArtifactKind, ExtractionResult};
use tracing::trace;

/// Left in the working text where a table was removed.
pub const TABLE_MARKER: &str = table::TABLE_MARKER;
/// Left in the working text where a document was removed.
pub const DOCUMENT_MARKER: &str = document::DOCUMENT_MARKER;

pub const TABLE_FALLBACK: &str = "I've created a table with the requested information.";
pub const CODE_FALLBACK: &str = "I've created the code for you.";
pub const DOCUMENT_FALLBACK: &str = "I've prepared the document as requested.";

/// Classify `text` into artifacts plus a conversational remainder.
///
/// Never fails; the empty string yields no artifacts and an empty remainder.
pub fn extract(text: &str) -> ExtractionResult {
    let mut artifacts = Vec::new();

    let working = code::extract_code_blocks(text, &mut artifacts);
    let working = table::extract_tables(&working, &mut artifacts);
    let working = document::extract_document(&working, &mut artifacts);

    let mut result = ExtractionResult {
        artifacts,
        conversational_content: cleanup::tidy(&working),
    };
    if result.conversational_content.is_empty() {
        if let Some(sentence) = fallback_sentence(&result) {
            result.conversational_content = sentence.to_string();
        }
    }

    trace!(
        input_len = text.len(),
        code = result.count(ArtifactKind::Code),
        tables = result.count(ArtifactKind::Table),
        documents = result.count(ArtifactKind::Document),
        remainder_len = result.conversational_content.len(),
        "Extraction complete"
    );

    result
}

/// Canned remainder for a message that is all artifact. Tables win over
/// code, code over documents.
fn fallback_sentence(result: &ExtractionResult) -> Option<&'static str> {
    if result.has_kind(ArtifactKind::Table) {
        Some(TABLE_FALLBACK)
    } else if result.has_kind(ArtifactKind::Code) {
        Some(CODE_FALLBACK)
    } else if result.has_kind(ArtifactKind::Document) {
        Some(DOCUMENT_FALLBACK)
    } else {
        None
    }
}
