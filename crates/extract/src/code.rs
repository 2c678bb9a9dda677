//! Code pass: triple-backtick fenced blocks.
//!
//! ```text
//! fence    = "```" [tag] body "```"
//! tag      = word-char+            (same line, directly after the fence)
//! body     = any text, shortest match up to the next fence
//! ```
//!
//! An opening fence with no closing fence yet is left alone; it becomes a
//! code artifact once a later fragment delivers the closing fence.

use lexchat_core::Artifact;

pub(crate) const FENCE: &str = "```";

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Pull every closed fenced block out of `text`.
///
/// Returns the text with each matched span (fences included) removed.
pub(crate) fn extract_code_blocks(text: &str, artifacts: &mut Vec<Artifact>) -> String {
    let mut remaining = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(rel) = text[cursor..].find(FENCE) {
        let open = cursor + rel;
        let tag_start = open + FENCE.len();
        let tag_len = text.as_bytes()[tag_start..]
            .iter()
            .take_while(|b| is_word_byte(**b))
            .count();
        let tag_end = tag_start + tag_len;

        // No closing fence after this opening means none after any later
        // opening either, so the rest of the text is prose.
        let Some(close_rel) = text[tag_end..].find(FENCE) else {
            break;
        };
        let close = tag_end + close_rel;

        let tag = &text[tag_start..tag_end];
        artifacts.push(Artifact::code(Some(tag), text[tag_end..close].trim()));

        remaining.push_str(&text[cursor..open]);
        cursor = close + FENCE.len();
    }

    remaining.push_str(&text[cursor..]);
    remaining
}
