//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::{CellTag, HealthStatus};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
/// The theme is a plain value handed to the render functions; nothing reads
/// it from global state.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for the title and the event panel.
    pub highlight: Color,
    /// Color for the task panel border and title.
    pub tasks: Color,
    /// Color for warning-level tiers.
    pub warning: Color,
    /// Color for critical-level tiers.
    pub critical: Color,
    /// Color for healthy tiers.
    pub healthy: Color,
    /// Foreground for bold neutral text (the "next" tag).
    pub strong: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for unparsed text and placeholders.
    pub muted: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            tasks: Color::Yellow,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            strong: Color::White,
            header: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            muted: Style::default().add_modifier(Modifier::DIM),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            tasks: Color::Rgb(0xb5, 0x89, 0x00),
            warning: Color::Rgb(0xb5, 0x89, 0x00),
            critical: Color::Red,
            healthy: Color::Green,
            strong: Color::Black,
            header: Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a health tier
    pub fn status_style(&self, status: HealthStatus) -> Style {
        let color = match status {
            HealthStatus::Healthy => self.healthy,
            HealthStatus::Warning => self.warning,
            HealthStatus::Critical => self.critical,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    /// Get style for a table cell tag
    pub fn tag_style(&self, tag: CellTag) -> Style {
        let bold = |c: Color| Style::default().fg(c).add_modifier(Modifier::BOLD);
        match tag {
            CellTag::Plain => Style::default(),
            CellTag::EmphasisA => bold(Color::Magenta),
            CellTag::EmphasisB => bold(self.warning),
            CellTag::EmphasisC => bold(Color::Cyan),
            CellTag::EmphasisD => bold(self.healthy),
            CellTag::Negative => bold(self.critical),
            CellTag::Positive => bold(self.healthy),
            CellTag::Info => bold(Color::Blue),
            CellTag::Pending => bold(self.warning),
            CellTag::NeutralHighlight => bold(self.strong),
            CellTag::Muted => Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM),
        }
    }
}
