//! Heuristic cell styling keyed by column name.
//!
//! The agent tool's table output has no published schema, so cells are
//! classified by matching substrings of the column name and the cell text
//! against an ordered rule table. Tags are presentation-only: the cell text
//! is never rewritten, which keeps exact-text consumers working.

/// Maximum number of characters shown for free-text columns.
pub const MAX_FREE_TEXT_CHARS: usize = 60;

/// Presentation tag attached to a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellTag {
    /// No rule matched.
    #[default]
    Plain,
    /// Architect hat.
    EmphasisA,
    /// Writer hat.
    EmphasisB,
    /// Reviewer hat.
    EmphasisC,
    /// Coordinator hat.
    EmphasisD,
    /// Failures and rejections.
    Negative,
    /// Successes, approvals, closed tasks.
    Positive,
    /// Informational progress (e.g. "written").
    Info,
    /// Ready or open work.
    Pending,
    /// Upcoming work.
    NeutralHighlight,
    /// Free-text payloads and titles, shown dimmed.
    Muted,
}

/// A cell value together with its presentation tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledCell {
    /// Exact text as it appeared in the source table (trimmed).
    pub text: String,
    pub tag: CellTag,
}

impl StyledCell {
    /// Create an unstyled cell.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: CellTag::Plain,
        }
    }

    /// Text to draw on screen.
    ///
    /// Muted free-text cells are cut to [`MAX_FREE_TEXT_CHARS`] characters
    /// with a trailing ellipsis; everything else is shown verbatim.
    pub fn display(&self) -> String {
        if self.tag == CellTag::Muted && self.text.chars().count() > MAX_FREE_TEXT_CHARS {
            let head: String = self.text.chars().take(MAX_FREE_TEXT_CHARS).collect();
            format!("{}...", head)
        } else {
            self.text.clone()
        }
    }
}

/// Content rule inside a column category: any needle matches → tag.
struct ContentRule {
    needles: &'static [&'static str],
    tag: CellTag,
}

/// A column category and its ordered content rules.
///
/// An empty `content` list with `fallback` set tags every cell in the column.
struct ColumnRule {
    columns: &'static [&'static str],
    content: &'static [ContentRule],
    fallback: Option<CellTag>,
}

/// Ordered rule table. The first column category whose name matches wins,
/// even when none of its content rules apply.
const RULES: &[ColumnRule] = &[
    ColumnRule {
        columns: &["hat", "role"],
        content: &[
            ContentRule { needles: &["architect"], tag: CellTag::EmphasisA },
            ContentRule { needles: &["writer"], tag: CellTag::EmphasisB },
            ContentRule { needles: &["reviewer"], tag: CellTag::EmphasisC },
            ContentRule { needles: &["coordinator"], tag: CellTag::EmphasisD },
        ],
        fallback: None,
    },
    ColumnRule {
        columns: &["topic", "status"],
        content: &[
            ContentRule { needles: &["fail", "reject", "error"], tag: CellTag::Negative },
            ContentRule {
                needles: &["ok", "approve", "success", "closed"],
                tag: CellTag::Positive,
            },
            ContentRule { needles: &["written"], tag: CellTag::Info },
            ContentRule { needles: &["ready", "open"], tag: CellTag::Pending },
            ContentRule { needles: &["next"], tag: CellTag::NeutralHighlight },
        ],
        fallback: None,
    },
    ColumnRule {
        columns: &["payload", "title"],
        content: &[],
        fallback: Some(CellTag::Muted),
    },
];

/// Classify a cell by its column name and content.
pub fn classify(column: &str, text: &str) -> CellTag {
    let column = column.to_lowercase();
    let Some(rule) = RULES
        .iter()
        .find(|r| r.columns.iter().any(|c| column.contains(c)))
    else {
        return CellTag::Plain;
    };

    let text = text.to_lowercase();
    rule.content
        .iter()
        .find(|c| c.needles.iter().any(|n| text.contains(n)))
        .map(|c| c.tag)
        .or(rule.fallback)
        .unwrap_or(CellTag::Plain)
}

/// Build a styled cell for `text` under `column`.
pub fn style_cell(column: &str, text: &str) -> StyledCell {
    StyledCell {
        text: text.to_string(),
        tag: classify(column, text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hat_roles() {
        assert_eq!(classify("Hat", "Architect"), CellTag::EmphasisA);
        assert_eq!(classify("hat", "lead-writer"), CellTag::EmphasisB);
        assert_eq!(classify("Role", "REVIEWER"), CellTag::EmphasisC);
        assert_eq!(classify("HAT", "coordinator"), CellTag::EmphasisD);
        assert_eq!(classify("hat", "janitor"), CellTag::Plain);
    }

    #[test]
    fn test_status_negative_wins_over_positive() {
        // "error" and "ok" both appear; negative rules are checked first
        assert_eq!(classify("Status", "ok_with_error"), CellTag::Negative);
        assert_eq!(classify("topic", "review.rejected"), CellTag::Negative);
    }

    #[test]
    fn test_status_tags() {
        assert_eq!(classify("Status", "closed"), CellTag::Positive);
        assert_eq!(classify("Topic", "build.success"), CellTag::Positive);
        assert_eq!(classify("Topic", "draft.written"), CellTag::Info);
        assert_eq!(classify("Status", "open"), CellTag::Pending);
        assert_eq!(classify("Status", "Ready"), CellTag::Pending);
        assert_eq!(classify("topic", "task.next"), CellTag::NeutralHighlight);
        assert_eq!(classify("status", "blocked"), CellTag::Plain);
    }

    #[test]
    fn test_first_column_category_wins() {
        // "hat_status" matches the hat category first; status rules never apply
        assert_eq!(classify("hat_status", "closed"), CellTag::Plain);
    }

    #[test]
    fn test_free_text_columns_are_muted() {
        assert_eq!(classify("Title", "short"), CellTag::Muted);
        assert_eq!(classify("payload", ""), CellTag::Muted);
    }

    #[test]
    fn test_unknown_column_is_plain() {
        assert_eq!(classify("ID", "closed"), CellTag::Plain);
    }

    #[test]
    fn test_display_truncates_long_muted_text() {
        let long = "x".repeat(75);
        let cell = style_cell("Title", &long);
        assert_eq!(cell.text, long);
        assert_eq!(cell.display(), format!("{}...", "x".repeat(60)));
    }

    #[test]
    fn test_display_keeps_exactly_sixty_chars() {
        let text = "é".repeat(60);
        let cell = style_cell("title", &text);
        assert_eq!(cell.display(), text);
    }

    #[test]
    fn test_display_does_not_truncate_other_tags() {
        let long = "closed ".repeat(20);
        let cell = style_cell("status", &long);
        assert_eq!(cell.display(), long);
    }

    #[test]
    fn test_styling_is_idempotent_and_preserves_text() {
        let cases = [
            ("Status", "closed"),
            ("Hat", "architect"),
            ("Payload", "a very long payload that keeps going and going past sixty chars"),
            ("ID", "42"),
        ];
        for (col, text) in cases {
            let once = style_cell(col, text);
            let twice = style_cell(col, &once.text);
            assert_eq!(once, twice);
            assert_eq!(once.text, text);
        }
    }
}
