//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

/// Central theme — change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    pub const ACCENT: Color = Color::Rgb(0xa2, 0x85, 0xe6);
    pub const TEXT: Color = Color::Rgb(0xff, 0xff, 0xff);
    pub const TEXT_TRANSLUCENT: Color = Color::Rgb(0x88, 0x88, 0x88);
    pub const BACKGROUND: Color = Color::Rgb(0x00, 0x00, 0x00);
    pub const SECONDARY: Color = Color::Rgb(0x11, 0x11, 0x11);
    /// Card fill: the accent at roughly a quarter opacity over black.
    pub const CARD_FILL: Color = Color::Rgb(0x28, 0x21, 0x39);

    // ── cards ──────────────────────────────────────────────────
    pub fn card_border_style(active: bool) -> Style {
        if active {
            Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Self::TEXT_TRANSLUCENT)
        }
    }

    pub fn card_name_style() -> Style {
        Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
    }

    pub fn card_id_style() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn card_balance_style() -> Style {
        Style::default().fg(Self::TEXT).add_modifier(Modifier::BOLD)
    }

    pub fn create_card_style(focused: bool) -> Style {
        let style = Style::default().fg(Self::TEXT);
        if focused {
            style
        } else {
            style.add_modifier(Modifier::DIM)
        }
    }

    // ── action chips ───────────────────────────────────────────
    pub fn chip_style() -> Style {
        Style::default().bg(Self::ACCENT).fg(Self::BACKGROUND)
    }

    // ── history ────────────────────────────────────────────────
    pub fn amount_style() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn description_style() -> Style {
        Style::default()
            .fg(Self::TEXT_TRANSLUCENT)
            .add_modifier(Modifier::ITALIC)
    }

    // ── forms ──────────────────────────────────────────────────
    pub fn error_style() -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Self::TEXT_TRANSLUCENT)
    }

    pub fn title_style() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn navbar_style() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Self::SECONDARY).fg(Self::TEXT)
    }
}
