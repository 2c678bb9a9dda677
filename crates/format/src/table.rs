//! Table artifacts as header + rows of trimmed cells.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableView {
    pub header: Vec<String>,
    /// Every line after the first, markdown separator rows included.
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Widest cell per column across header and rows, in chars.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        for row in std::iter::once(&self.header).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                let w = cell.chars().count();
                match widths.get_mut(i) {
                    Some(existing) => *existing = (*existing).max(w),
                    None => widths.push(w),
                }
            }
        }
        widths
    }
}

/// Split a table artifact's content: first line header, the rest body rows.
pub fn format_table(content: &str) -> TableView {
    let mut lines = content.lines();
    let header = lines.next().map(split_row).unwrap_or_default();
    let rows = lines.map(split_row).collect();
    TableView { header, rows }
}

/// Split one line on `|` and trim each cell.
///
/// The empty cell produced by a leading pipe and the one produced by a
/// trailing pipe are dropped; empty cells in between are real, empty columns.
pub fn split_row(line: &str) -> Vec<String> {
    let mut cells: Vec<String> = line.split('|').map(|c| c.trim().to_string()).collect();
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    cells
}

/// `---`, `:--`, `--:` style markdown alignment row.
pub fn is_separator_row(row: &[String]) -> bool {
    !row.is_empty()
        && row
            .iter()
            .all(|c| !c.is_empty() && c.contains('-') && c.chars().all(|ch| matches!(ch, '-' | ':')))
}
