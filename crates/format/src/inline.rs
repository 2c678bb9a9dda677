//! Light markup for prose: inline code, bold, and dash lists.
//!
//! Transforms run in a fixed order. Backtick spans are cut out first, so
//! `**` inside a code span stays literal. Bold is only recognized within a
//! single line; so are code spans.

use serde::Serialize;

/// A run of styled text within one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Code(String),
    Bold(String),
}

/// One rendered line, or a group of list lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Block {
    Paragraph(Vec<Inline>),
    /// Adjacent `- ` lines, one entry per item.
    List(Vec<Vec<Inline>>),
    Blank,
}

const LIST_PREFIX: &str = "- ";

/// Format prose (a conversational remainder or a document body).
pub fn format_text(text: &str) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();

    for line in text.lines() {
        if let Some(item) = line.strip_prefix(LIST_PREFIX) {
            let item = parse_inline(item);
            match blocks.last_mut() {
                Some(Block::List(items)) => items.push(item),
                _ => blocks.push(Block::List(vec![item])),
            }
        } else if line.trim().is_empty() {
            blocks.push(Block::Blank);
        } else {
            blocks.push(Block::Paragraph(parse_inline(line)));
        }
    }

    blocks
}

/// Split one line into text, code and bold runs.
pub fn parse_inline(line: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut pending = String::new();
    let mut i = 0;

    while let Some(rel) = line[i..].find('`') {
        let open = i + rel;
        match line[open + 1..].find('`') {
            Some(len) if len > 0 => {
                pending.push_str(&line[i..open]);
                push_bold_runs(&pending, &mut out);
                pending.clear();
                out.push(Inline::Code(line[open + 1..open + 1 + len].to_string()));
                i = open + len + 2;
            }
            // "``": the first backtick is literal, the second may still open a span
            Some(_) => {
                pending.push_str(&line[i..=open]);
                i = open + 1;
            }
            None => break,
        }
    }
    pending.push_str(&line[i..]);
    push_bold_runs(&pending, &mut out);

    out
}

/// Split plain text on `**…**` pairs with a non-empty inside.
fn push_bold_runs(text: &str, out: &mut Vec<Inline>) {
    let mut plain = String::new();
    let mut i = 0;

    while let Some(rel) = text[i..].find("**") {
        let open = i + rel;
        match text[open + 2..].find("**") {
            Some(len) if len > 0 => {
                plain.push_str(&text[i..open]);
                push_text(&mut plain, out);
                out.push(Inline::Bold(text[open + 2..open + 2 + len].to_string()));
                i = open + len + 4;
            }
            Some(_) => {
                plain.push_str(&text[i..=open]);
                i = open + 1;
            }
            None => break,
        }
    }
    plain.push_str(&text[i..]);
    push_text(&mut plain, out);
}

fn push_text(plain: &mut String, out: &mut Vec<Inline>) {
    if plain.is_empty() {
        return;
    }
    // Keep adjacent text runs merged.
    if let Some(Inline::Text(prev)) = out.last_mut() {
        prev.push_str(plain);
    } else {
        out.push(Inline::Text(plain.clone()));
    }
    plain.clear();
}
