//! Terminal UI rendering using ratatui.
//!
//! The compositor is stateless: [`draw`] takes the dashboard state and a
//! [`Theme`] and lays out a fixed three-region screen.
//!
//! ## Submodules
//!
//! - [`header`]: counters and balance strip
//! - [`panels`]: task queue and event timeline panels
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Header (header::render_header)      height 3 │
//! ├──────────────────┬───────────────────────────┤
//! │ Task Queue       │ Timeline Events           │
//! │ (panels::        │ (panels::render_events)   │
//! │  render_tasks)   │                           │
//! │      2/5         │          3/5              │
//! └──────────────────┴───────────────────────────┘
//! ```

pub mod header;
pub mod panels;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use crate::app::DashboardState;

/// Minimum terminal size for usable display.
pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 10;

/// Height of the header strip.
pub const HEADER_HEIGHT: u16 = 3;

/// Draw one full frame.
pub fn draw(frame: &mut Frame, state: &DashboardState, theme: &Theme) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, theme, area);
        return;
    }

    let [header_area, body] =
        Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)]).areas(area);
    let [tasks_area, events_area] =
        Layout::horizontal([Constraint::Fill(2), Constraint::Fill(3)]).areas(body);

    header::render_header(frame, state, theme, header_area);
    panels::render_tasks(frame, state, theme, tasks_area);
    panels::render_events(frame, state, theme, events_area);
}

fn render_too_small(frame: &mut Frame, theme: &Theme, area: Rect) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(ratatui::style::Style::default().fg(theme.warning));
    let height = 5.min(area.height);
    let centered = Rect::new(
        area.x,
        area.y + area.height.saturating_sub(height) / 2,
        area.width,
        height,
    );
    frame.render_widget(paragraph, centered);
}
