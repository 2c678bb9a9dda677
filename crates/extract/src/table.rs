//! Table pass: runs of pipe-delimited lines.
//!
//! A table is a maximal run of consecutive lines that each contain at least
//! one `|`. A lone pipe line is prose; two or more make a table.

use lexchat_core::Artifact;

pub(crate) const TABLE_MARKER: &str = "[Table shown in artifact]";

const MIN_TABLE_LINES: usize = 2;

/// A run of pipe lines: byte span (final line terminator excluded) and size.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: usize,
    end: usize,
    lines: usize,
}

/// Pull every qualifying table out of `text`, leaving a marker in its place.
pub(crate) fn extract_tables(text: &str, artifacts: &mut Vec<Artifact>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut run: Option<Run> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let body = line.strip_suffix('\n').unwrap_or(line);
        let (start, end) = (offset, offset + body.len());
        offset += line.len();

        if body.contains('|') {
            run = Some(match run {
                Some(r) => Run { end, lines: r.lines + 1, ..r },
                None => Run { start, end, lines: 1 },
            });
        } else if let Some(r) = run.take() {
            copied = flush(text, r, copied, &mut out, artifacts);
        }
    }
    if let Some(r) = run {
        copied = flush(text, r, copied, &mut out, artifacts);
    }

    out.push_str(&text[copied..]);
    out
}

/// Emit one finished run. Returns the new copy position.
fn flush(text: &str, run: Run, copied: usize, out: &mut String, artifacts: &mut Vec<Artifact>) -> usize {
    if run.lines < MIN_TABLE_LINES {
        return copied;
    }
    artifacts.push(Artifact::table(text[run.start..run.end].trim()));
    out.push_str(&text[copied..run.start]);
    out.push_str(TABLE_MARKER);
    run.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexchat_core::ArtifactKind;

    fn run(text: &str) -> (Vec<Artifact>, String) {
        let mut artifacts = Vec::new();
        let rest = extract_tables(text, &mut artifacts);
        (artifacts, rest)
    }

    #[test]
    fn two_line_table() {
        let (artifacts, rest) = run("| a | b |\n| 1 | 2 |");
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].kind, ArtifactKind::Table);
        assert_eq!(artifacts[0].content, "| a | b |\n| 1 | 2 |");
        assert_eq!(artifacts[0].title, "Data Table");
        assert_eq!(rest, TABLE_MARKER);
    }

    #[test]
    fn single_pipe_line_is_prose() {
        let text = "Use a | b to pipe output.\nThen carry on.";
        let (artifacts, rest) = run(text);
        assert!(artifacts.is_empty());
        assert_eq!(rest, text);
    }

    #[test]
    fn marker_keeps_its_own_line() {
        let (artifacts, rest) = run("Intro:\n|A|B|\n|-|-|\n|1|2|\nOutro");
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].content, "|A|B|\n|-|-|\n|1|2|");
        assert_eq!(rest, format!("Intro:\n{TABLE_MARKER}\nOutro"));
    }

    #[test]
    fn trailing_newline_survives() {
        let (_, rest) = run("|A|B|\n|1|2|\n");
        assert_eq!(rest, format!("{TABLE_MARKER}\n"));
    }

    #[test]
    fn separate_runs_make_separate_tables() {
        let (artifacts, rest) = run("|a|\n|b|\n\n|c|\n|d|\n|e|");
        assert_eq!(artifacts.len(), 2);
        assert_eq!(artifacts[0].content, "|a|\n|b|");
        assert_eq!(artifacts[1].content, "|c|\n|d|\n|e|");
        assert_eq!(rest, format!("{TABLE_MARKER}\n\n{TABLE_MARKER}"));
    }

    #[test]
    fn short_run_between_tables_is_kept() {
        let (artifacts, rest) = run("|a|\n|b|\nx\n|lonely|\ny");
        assert_eq!(artifacts.len(), 1);
        assert_eq!(rest, format!("{TABLE_MARKER}\nx\n|lonely|\ny"));
    }

    #[test]
    fn content_is_trimmed() {
        let (artifacts, _) = run("   |a|\n|b|   ");
        assert_eq!(artifacts[0].content, "|a|\n|b|");
    }

    #[test]
    fn pipes_without_edges_still_count() {
        let (artifacts, _) = run("name | role\nAda | engineer");
        assert_eq!(artifacts.len(), 1);
    }
}
