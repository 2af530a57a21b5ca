//! Schema-less parsing of the agent tool's `|`-delimited tables.
//!
//! The tool prints human-oriented tables whose columns change between
//! versions and commands. [`parse`] finds the header line, drops border and
//! separator noise, keeps a bounded window of rows and styles each cell via
//! [`super::styling`]. Input that does not look like a table degrades to an
//! [`EmptyNotice`] instead of an error.

use super::styling::{style_cell, StyledCell};

/// Column delimiter used by the agent tool.
pub const DELIMITER: char = '|';

/// Notice shown when a probe returned nothing at all.
pub const NO_DATA: &str = "No data available";

/// Which end of the row list survives truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepMode {
    /// Keep the trailing rows (append-only event streams).
    Latest,
    /// Keep the leading rows (task queues sorted by priority/id).
    Earliest,
}

/// Fallback for input that cannot be read as a table.
///
/// Rendered as dim, unstructured text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyNotice {
    pub text: String,
}

/// A parsed table. Every row holds exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<StyledCell>>,
}

impl ParsedTable {
    /// Look up a cell by row index and column name (first column with that name).
    pub fn cell(&self, row: usize, column: &str) -> Option<&StyledCell> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of parsing a raw table blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Table(ParsedTable),
    Empty(EmptyNotice),
}

impl Parsed {
    fn notice(text: impl Into<String>) -> Self {
        Parsed::Empty(EmptyNotice { text: text.into() })
    }

    /// Returns the table, if the input parsed as one.
    pub fn as_table(&self) -> Option<&ParsedTable> {
        match self {
            Parsed::Table(t) => Some(t),
            Parsed::Empty(_) => None,
        }
    }
}

/// Parse `text` into at most `max_rows` styled rows.
pub fn parse(text: &str, max_rows: usize, keep: KeepMode) -> Parsed {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Parsed::notice(NO_DATA);
    }

    let lines: Vec<&str> = trimmed.lines().map(str::trim).collect();

    let Some(header_idx) = lines.iter().position(|l| is_header(l)) else {
        return Parsed::notice(trimmed);
    };

    let header = lines[header_idx];
    let bordered = header.starts_with(DELIMITER) && header.ends_with(DELIMITER);
    let columns = split_cells(header, bordered);

    let data: Vec<&str> = lines[header_idx + 1..]
        .iter()
        .copied()
        .filter(|l| l.contains(DELIMITER) && !is_separator(l))
        .collect();

    let window = match keep {
        KeepMode::Latest => &data[data.len().saturating_sub(max_rows)..],
        KeepMode::Earliest => &data[..data.len().min(max_rows)],
    };

    let rows = window
        .iter()
        .map(|line| split_cells(line, bordered))
        .filter(|cells| cells.len() == columns.len())
        .map(|cells| {
            columns
                .iter()
                .zip(cells)
                .map(|(col, cell)| style_cell(col, &cell))
                .collect()
        })
        .collect();

    Parsed::Table(ParsedTable { columns, rows })
}

fn is_header(line: &str) -> bool {
    line.contains(DELIMITER) && line.chars().any(char::is_alphabetic)
}

/// A line made only of rule characters (`---+---`, `|===|`, `├──┼──┤`).
///
/// At least one dash, equals, plus or box-drawing character is required, so
/// a row of empty cells (`|  |  |`) is still data.
fn is_separator(line: &str) -> bool {
    let is_rule =
        |c: char| matches!(c, '-' | '+' | '=') || ('\u{2500}'..='\u{257F}').contains(&c);
    line.chars().any(is_rule)
        && line
            .chars()
            .all(|c| c == DELIMITER || c == ':' || c.is_whitespace() || is_rule(c))
}

/// Split a line on the delimiter.
///
/// In a bordered table (header framed by `|` on both sides) one outer border
/// is ignored on each side; otherwise every delimiter separates cells, so an
/// empty first or last cell survives.
fn split_cells(line: &str, bordered: bool) -> Vec<String> {
    let inner = if bordered {
        let inner = line.strip_prefix(DELIMITER).unwrap_or(line);
        inner.strip_suffix(DELIMITER).unwrap_or(inner)
    } else {
        line
    };
    inner.split(DELIMITER).map(|c| c.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::styling::CellTag;

    fn table(parsed: &Parsed) -> &ParsedTable {
        parsed.as_table().expect("expected a table")
    }

    fn column_values(t: &ParsedTable, column: &str) -> Vec<String> {
        (0..t.len())
            .map(|i| t.cell(i, column).unwrap().text.clone())
            .collect()
    }

    #[test]
    fn test_task_queue_scenario() {
        let input = "ID | Status\n1 | open\n2 | closed\n3 | open";
        let parsed = parse(input, 2, KeepMode::Earliest);
        let t = table(&parsed);

        assert_eq!(t.columns, vec!["ID", "Status"]);
        assert_eq!(column_values(t, "ID"), vec!["1", "2"]);
        assert_eq!(column_values(t, "Status"), vec!["open", "closed"]);
        assert_eq!(t.cell(1, "Status").unwrap().tag, CellTag::Positive);
        assert_eq!(t.cell(0, "Status").unwrap().tag, CellTag::Pending);
    }

    #[test]
    fn test_latest_keeps_trailing_rows() {
        let input = "ID | Topic\n1 | a\n2 | b\n3 | c\n4 | d";
        let parsed = parse(input, 2, KeepMode::Latest);
        assert_eq!(column_values(table(&parsed), "ID"), vec!["3", "4"]);
    }

    #[test]
    fn test_row_count_is_min_of_rows_and_cap() {
        let input = "A | B\n1 | x\n2 | y\n3 | z";
        for max in 0..6 {
            for keep in [KeepMode::Latest, KeepMode::Earliest] {
                let parsed = parse(input, max, keep);
                assert_eq!(table(&parsed).len(), max.min(3));
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("", 10, KeepMode::Latest), Parsed::notice(NO_DATA));
        assert_eq!(parse("  \n\n \t", 10, KeepMode::Latest), Parsed::notice(NO_DATA));
    }

    #[test]
    fn test_no_delimiter_falls_back_to_notice() {
        let input = "ralph: no loop running\n";
        assert_eq!(
            parse(input, 10, KeepMode::Earliest),
            Parsed::notice("ralph: no loop running")
        );
    }

    #[test]
    fn test_delimiter_without_letters_is_not_a_header() {
        let input = "1 | 2\n3 | 4";
        assert!(matches!(parse(input, 10, KeepMode::Earliest), Parsed::Empty(_)));
    }

    #[test]
    fn test_header_only() {
        let parsed = parse("Time | Topic | Payload", 10, KeepMode::Latest);
        let t = table(&parsed);
        assert_eq!(t.columns.len(), 3);
        assert!(t.is_empty());
    }

    #[test]
    fn test_trailing_delimiter_without_border_adds_a_column() {
        let parsed = parse("Events |\nsomething happened", 10, KeepMode::Latest);
        let t = table(&parsed);
        assert_eq!(t.columns, vec!["Events", ""]);
        assert!(t.is_empty());
    }

    #[test]
    fn test_empty_edge_cells_in_unbordered_table() {
        let input = "\
Time | Topic | Payload
10:00 | task.close | done
10:01 | loop.start |
| task.start | orphan
";
        let parsed = parse(input, 10, KeepMode::Latest);
        let t = table(&parsed);
        assert_eq!(t.len(), 3);
        assert_eq!(t.cell(1, "Topic").unwrap().text, "loop.start");
        assert_eq!(t.cell(1, "Payload").unwrap().text, "");
        assert_eq!(t.cell(2, "Time").unwrap().text, "");
        assert_eq!(t.cell(2, "Payload").unwrap().text, "orphan");
    }

    #[test]
    fn test_empty_last_cell_in_bordered_table() {
        let input = "| Time | Topic | Payload |\n| 10:01 | loop.start |  |";
        let parsed = parse(input, 10, KeepMode::Latest);
        let t = table(&parsed);
        assert_eq!(t.columns, vec!["Time", "Topic", "Payload"]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.cell(0, "Payload").unwrap().text, "");
    }

    #[test]
    fn test_row_of_empty_cells_is_not_a_separator() {
        let input = "| ID | Status |\n|----|--------|\n|    |        |\n| 2  | open   |";
        let parsed = parse(input, 10, KeepMode::Earliest);
        assert_eq!(column_values(table(&parsed), "ID"), vec!["", "2"]);
    }

    #[test]
    fn test_malformed_rows_are_dropped() {
        let input = "ID | Status | Title\n\
                     1 | open | first\n\
                     2 | closed\n\
                     3 | open | third | extra\n\
                     4 | ready | fourth";
        let parsed = parse(input, 10, KeepMode::Earliest);
        assert_eq!(column_values(table(&parsed), "ID"), vec!["1", "4"]);
    }

    #[test]
    fn test_truncation_happens_before_malformed_rows_are_dropped() {
        let input = "ID | Status\n1 | open\nbroken|row|here\n3 | open";
        let parsed = parse(input, 2, KeepMode::Earliest);
        assert_eq!(column_values(table(&parsed), "ID"), vec!["1"]);
    }

    #[test]
    fn test_separators_and_borders_are_skipped() {
        let input = "\
+----+--------+
| ID | Status |
+----+--------+
| 7  | closed |
|----|--------|
| 8  | open   |
+----+--------+
";
        let parsed = parse(input, 10, KeepMode::Earliest);
        let t = table(&parsed);
        assert_eq!(t.columns, vec!["ID", "Status"]);
        assert_eq!(column_values(t, "ID"), vec!["7", "8"]);
    }

    #[test]
    fn test_box_drawing_separator_is_skipped() {
        let input = "Time │ Topic\nTime | Topic\n───┼───\n10:00 | task.close";
        // The first line uses a box-drawing bar, not the delimiter, so the
        // second line is the header.
        let parsed = parse(input, 10, KeepMode::Latest);
        let t = table(&parsed);
        assert_eq!(t.columns, vec!["Time", "Topic"]);
        assert_eq!(column_values(t, "Topic"), vec!["task.close"]);
    }

    #[test]
    fn test_preamble_before_header_is_ignored() {
        let input = "Loaded 3 tasks\n\nID | Title\n1 | write intro";
        let parsed = parse(input, 10, KeepMode::Earliest);
        assert_eq!(column_values(table(&parsed), "Title"), vec!["write intro"]);
    }

    #[test]
    fn test_lines_without_delimiter_after_header_are_ignored() {
        let input = "ID | Status\n1 | open\n(2 more hidden)\n3 | closed";
        let parsed = parse(input, 10, KeepMode::Earliest);
        assert_eq!(column_values(table(&parsed), "ID"), vec!["1", "3"]);
    }

    #[test]
    fn test_cell_text_is_not_altered_by_styling() {
        let title = "A title that is definitely longer than sixty characters in total";
        let input = format!("ID | Title\n1 | {}", title);
        let parsed = parse(&input, 10, KeepMode::Earliest);
        let cell = table(&parsed).cell(0, "Title").unwrap();
        assert_eq!(cell.text, title);
        assert_eq!(cell.tag, CellTag::Muted);
        assert!(cell.display().ends_with("..."));
    }

    #[test]
    fn test_event_stream_styling() {
        let input = "\
Time     | Hat        | Topic          | Payload
10:00:01 | architect  | plan.ready     | outline
10:00:05 | writer     | draft.written  | chapter 1
10:00:09 | reviewer   | review.reject  | needs work
";
        let parsed = parse(input, 15, KeepMode::Latest);
        let t = table(&parsed);
        assert_eq!(t.cell(0, "Hat").unwrap().tag, CellTag::EmphasisA);
        assert_eq!(t.cell(0, "Topic").unwrap().tag, CellTag::Pending);
        assert_eq!(t.cell(1, "Topic").unwrap().tag, CellTag::Info);
        assert_eq!(t.cell(2, "Hat").unwrap().tag, CellTag::EmphasisC);
        assert_eq!(t.cell(2, "Topic").unwrap().tag, CellTag::Negative);
        assert_eq!(t.cell(2, "Payload").unwrap().tag, CellTag::Muted);
    }
}
