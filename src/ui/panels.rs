//! Task and event panels.
//!
//! Each panel hosts a parsed table, its dim notice fallback, or a probe
//! failure placeholder.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::Theme;
use crate::app::{DashboardState, PanelContent};
use crate::data::{CellTag, Parsed, ParsedTable};

/// Render the task queue panel.
pub fn render_tasks(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let title = format!(
        " Task Queue ({}, {} Todo) ",
        state.counts.done_label(),
        state.counts.todo
    );
    let block = panel_block(title, theme.tasks, theme);
    render_content(frame, &state.tasks, block, theme, area);
}

/// Render the event timeline panel.
pub fn render_events(frame: &mut Frame, state: &DashboardState, theme: &Theme, area: Rect) {
    let block = panel_block(" Timeline Events ".to_string(), theme.highlight, theme);
    render_content(frame, &state.events, block, theme, area);
}

fn panel_block(title: String, color: ratatui::style::Color, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(color))
}

fn render_content(
    frame: &mut Frame,
    content: &PanelContent,
    block: Block<'_>,
    theme: &Theme,
    area: Rect,
) {
    match content {
        PanelContent::Parsed(Parsed::Table(table)) => {
            frame.render_widget(build_table(table, theme).block(block), area);
        }
        PanelContent::Parsed(Parsed::Empty(notice)) => {
            let paragraph = Paragraph::new(notice.text.as_str())
                .style(theme.muted)
                .wrap(Wrap { trim: false })
                .block(block);
            frame.render_widget(paragraph, area);
        }
        PanelContent::Failed(reason) => {
            let line = Line::from(vec![
                Span::styled("Error", Style::default().fg(theme.critical)),
                Span::styled(format!(": {}", reason), theme.muted),
            ]);
            let paragraph = Paragraph::new(line).wrap(Wrap { trim: true }).block(block);
            frame.render_widget(paragraph, area);
        }
    }
}

/// Build a ratatui table from parsed rows.
///
/// Free-text columns get a triple share of the width.
pub fn build_table<'a>(table: &'a ParsedTable, theme: &Theme) -> Table<'a> {
    let header = Row::new(table.columns.iter().map(|c| Cell::from(c.as_str())))
        .height(1)
        .style(theme.header);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|cells| {
            Row::new(
                cells
                    .iter()
                    .map(|cell| Cell::from(cell.display()).style(theme.tag_style(cell.tag))),
            )
        })
        .collect();

    let widths: Vec<Constraint> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, _)| {
            let free_text = table
                .rows
                .first()
                .and_then(|r| r.get(i))
                .is_some_and(|c| c.tag == CellTag::Muted);
            if free_text {
                Constraint::Fill(3)
            } else {
                Constraint::Fill(1)
            }
        })
        .collect();

    Table::new(rows, widths).header(header).column_spacing(1)
}
