//! Header strip with workspace counters and the credit balance.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::Theme;
use crate::app::DashboardState;
use crate::data::duration::format_age;

/// Shown until the first balance fetch finishes.
pub const BALANCE_PENDING: &str = "Checking...";

/// Render the header strip.
///
/// Displays: title, file and word counts, balance coloured by tier.
pub fn render_header(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let bold = |c: Color| Style::default().fg(c).add_modifier(Modifier::BOLD);

    let balance = match &state.balance {
        Some(snapshot) => {
            let style = snapshot
                .reading
                .tier()
                .map_or(theme.muted, |t| theme.status_style(t));
            Span::styled(snapshot.reading.label(), style)
        }
        None => Span::styled(BALANCE_PENDING, theme.muted),
    };

    let mut spans = vec![
        Span::styled(" RALPH HUB ", bold(theme.highlight)),
        Span::raw("| "),
        Span::styled("Files: ", bold(theme.healthy)),
        Span::raw(format!("{} | ", state.stats.files)),
        Span::styled("Words: ", bold(Color::Blue)),
        Span::raw(format!("{} | ", state.stats.words)),
        Span::styled("OR Balance: ", bold(theme.warning)),
        balance,
    ];

    if let Some(updated) = state.updated_at {
        spans.push(Span::styled(
            format!("  (updated {} ago)", format_age(updated.elapsed())),
            theme.muted,
        ));
    }

    let block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(theme.muted);

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
