//! Post-processing of the working text once all passes have run.

/// Collapse every run of three or more `\n` to exactly two.
pub(crate) fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut newlines = 0;
    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines <= 2 {
                out.push(ch);
            }
        } else {
            newlines = 0;
            out.push(ch);
        }
    }
    out
}

/// `[anything without brackets]`, alone on its line.
fn is_placeholder(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .is_some_and(|inner| !inner.contains(['[', ']']))
}

/// Drop placeholder lines along with their line terminators.
pub(crate) fn remove_placeholder_lines(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !is_placeholder(line))
        .collect()
}

/// The full post-processing chain: collapse, drop placeholders, trim.
///
/// Dropping a placeholder line can join two blank-line runs, so the
/// collapse runs again afterwards.
pub(crate) fn tidy(text: &str) -> String {
    let collapsed = collapse_newlines(text);
    let removed = remove_placeholder_lines(&collapsed);
    collapse_newlines(&removed).trim().to_string()
}
