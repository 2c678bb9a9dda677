//! Plain-terminal rendering of message views.

use crate::inline::{Block, Inline};
use crate::table::{TableView, is_separator_row};
use crate::view::{ArtifactView, MessageView};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render styling options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI escapes for bold text
    pub ansi: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { ansi: true }
    }
}

pub fn render_inlines(inlines: &[Inline], opts: RenderOptions) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(s) => out.push_str(s),
            Inline::Code(s) => {
                out.push('`');
                out.push_str(s);
                out.push('`');
            }
            Inline::Bold(s) if opts.ansi => {
                out.push_str(BOLD);
                out.push_str(s);
                out.push_str(RESET);
            }
            Inline::Bold(s) => out.push_str(s),
        }
    }
    out
}

pub fn render_blocks(blocks: &[Block], opts: RenderOptions) -> String {
    let mut lines = Vec::new();
    for block in blocks {
        match block {
            Block::Paragraph(inlines) => lines.push(render_inlines(inlines, opts)),
            Block::List(items) => {
                for item in items {
                    lines.push(format!("  • {}", render_inlines(item, opts)));
                }
            }
            Block::Blank => lines.push(String::new()),
        }
    }
    lines.join("\n")
}

/// Aligned columns under a header rule; markdown separator rows are dropped.
pub fn render_table(table: &TableView) -> String {
    let widths = table.column_widths();
    let render_row = |row: &[String]| -> String {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                format!("{cell:<w$}")
            })
            .collect();
        format!("| {} |", cells.join(" | "))
    };
    let rule = format!(
        "|{}|",
        widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("|")
    );

    let mut lines = vec![render_row(&table.header), rule];
    for row in &table.rows {
        if is_separator_row(row) {
            // The header rule already separates; skip the markdown one.
            continue;
        }
        lines.push(render_row(row));
    }
    lines.join("\n")
}

pub fn render_artifact(artifact: &ArtifactView, opts: RenderOptions) -> String {
    let heading = if opts.ansi {
        format!("{BOLD}── {} ──{RESET}", artifact.title())
    } else {
        format!("── {} ──", artifact.title())
    };
    let body = match artifact {
        ArtifactView::Code { code, .. } => {
            format!("```{}\n{}\n```", code.language, code.content)
        }
        ArtifactView::Table { table, .. } => render_table(table),
        ArtifactView::Document { blocks, .. } => render_blocks(blocks, opts),
    };
    format!("{heading}\n{body}")
}

/// Remainder first, then each artifact under its title.
pub fn render_text(view: &MessageView, opts: RenderOptions) -> String {
    let mut sections = Vec::new();
    let body = render_blocks(&view.body, opts);
    if !body.is_empty() {
        sections.push(body);
    }
    for artifact in &view.artifacts {
        sections.push(render_artifact(artifact, opts));
    }
    sections.join("\n\n")
}
