//! Presentation transforms for LexChat messages.
//!
//! Everything here is a pure function from extracted content to a
//! structured view:
//! - table artifacts → [`TableView`] (header + rows of trimmed cells)
//! - code artifacts → [`CodeView`] (content + language tag)
//! - documents and conversational remainders → [`Block`]s of [`Inline`] runs
//!
//! [`render_text`] turns a [`MessageView`] into terminal text.

mod inline;
mod render;
mod table;
mod view;

pub use inline::{Block, Inline, format_text, parse_inline};
pub use render::{RenderOptions, render_artifact, render_blocks, render_table, render_text};
pub use table::{TableView, format_table, is_separator_row, split_row};
pub use view::{ArtifactView, CodeView, MessageView, format_artifact, format_message};
