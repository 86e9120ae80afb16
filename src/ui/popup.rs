//! Popup overlay widgets for the settings menu and controls submenu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::settings::SETTINGS_ITEMS;
use crate::app::state::AppState;
use crate::config::{Action, AppConfig};
use crate::core::account::{format_currency, CURRENCY};
use crate::core::transfer::{SendFlow, SendStage};

use super::theme::Theme;

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_style())
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

// ───────────────────────────────────────── settings popup ────

/// Settings menu popup overlay.
pub struct SettingsPopup<'a> {
    pub selected: usize,
    pub state: &'a AppState,
}

impl Widget for SettingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (SETTINGS_ITEMS.len() as u16) + 6;
        let popup = centered_fixed(44, height, area);
        Clear.render(popup, buf);

        let block = popup_block(" Settings ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let prefix = if i == self.selected { " ▸ " } else { "   " };
            let label = format!("{prefix}{:<20}", item.label());
            let mut spans = vec![Span::styled(label, row_style(i == self.selected))];

            if let Some(value) = item.value(self.state) {
                let value_style = match value.as_str() {
                    "ON" => Style::default().fg(Color::Green),
                    "OFF" => Style::default().fg(Color::DarkGray),
                    _ => Style::default().fg(Theme::ACCENT),
                };
                spans.push(Span::styled(format!("  [{value}]"), value_style));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter/Space: change  Esc: close",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── controls popup ────

/// Interactive controls / keybinding popup overlay.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
    pub selected: usize,
    pub awaiting_rebind: bool,
}

impl Widget for ControlsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + 2 blanks + reset + hint + 2 border + 1 top pad
        let height = (Action::ALL.len() as u16) + 7;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = popup_block(" Controls ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let mut lines = vec![Line::raw("")];

        for (i, &action) in Action::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let prefix = if is_selected { " ▸ " } else { "   " };

            let keys_display = if is_selected && self.awaiting_rebind {
                "Press a key…".to_string()
            } else {
                self.config.display_bindings(action)
            };

            let key_style = if is_selected {
                Style::default().fg(Color::Yellow).bg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Yellow)
            };

            // Fixed-width columns: label left-aligned, keys right-aligned.
            let label_col = format!("{prefix}{:<22}", action.label());
            let keys_width = (inner.width as usize)
                .saturating_sub(label_col.chars().count())
                .max(1);
            let keys_col = format!("{keys_display:>keys_width$}");

            lines.push(Line::from(vec![
                Span::styled(label_col, row_style(is_selected)),
                Span::styled(keys_col, key_style),
            ]));
        }

        let reset_selected = self.selected == Action::ALL.len();
        let reset_prefix = if reset_selected { " ▸ " } else { "   " };
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            format!("{reset_prefix}⟳ Reset to defaults"),
            row_style(reset_selected),
        )));

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter: add key  Del: clear  Esc: back",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── send popup ────────

/// Send-money form: origin, destination picker and amount field.
pub struct SendPopup<'a> {
    pub flow: &'a SendFlow,
}

impl Widget for SendPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let flow = self.flow;
        let picking = flow.stage() == SendStage::AccountSelection;
        let shown = if picking { flow.destinations().len() } else { 1 };
        // from + to headers, rows, amount block, status, hint, borders
        let height = (shown as u16) + 12;
        let popup = centered_fixed(48, height, area);
        Clear.render(popup, buf);

        let block = popup_block(" Send ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let muted = Style::default().fg(Theme::TEXT_TRANSLUCENT);
        let origin = flow.origin();
        let mut lines = vec![
            Line::from(Span::styled(" from", muted)),
            Line::from(vec![
                Span::styled(format!("   {:<16}", origin.name), row_style(false)),
                Span::styled(origin.display_id(), muted),
                Span::raw("  "),
                Span::styled(origin.display_balance(), Style::default().fg(Theme::ACCENT)),
            ]),
            Line::raw(""),
            Line::from(Span::styled(" to", muted)),
        ];

        for (i, account) in flow.destinations().iter().enumerate() {
            let is_selected = i == flow.selected();
            if !picking && !is_selected {
                continue;
            }
            let prefix = if is_selected { " ▸ " } else { "   " };
            lines.push(Line::from(vec![
                Span::styled(format!("{prefix}{:<16}", account.name), row_style(is_selected)),
                Span::styled(account.display_id(), muted),
            ]));
        }

        lines.push(Line::raw(""));
        if picking {
            lines.push(Line::raw(""));
        } else {
            let amount = if flow.amount().is_empty() { "0" } else { flow.amount() };
            lines.push(Line::from(vec![
                Span::styled(" enter amount: ", muted),
                Span::styled(format!("{CURRENCY} "), Theme::title_style()),
                Span::styled(format!("{amount}▏"), Style::default().fg(Color::White)),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(match flow.status() {
            Some(message) => Line::from(Span::styled(format!(" {message}"), Theme::error_style())),
            None if !picking => Line::from(Span::styled(
                format!(" available {}", format_currency(origin.balance)),
                muted,
            )),
            None => Line::raw(""),
        });
        lines.push(Line::raw(""));
        let hint = if picking {
            "  ↑/↓: pick  Enter: select  Esc: close"
        } else {
            "  Enter: transfer  Esc: back"
        };
        lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::Ledger;

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn centered_rect_is_clamped() {
        let r = centered_fixed(50, 10, Rect::new(0, 0, 20, 5));
        assert_eq!(r, Rect::new(0, 0, 20, 5));
        let r = centered_fixed(10, 4, Rect::new(0, 0, 20, 10));
        assert_eq!(r, Rect::new(5, 3, 10, 4));
    }

    #[test]
    fn settings_show_current_values() {
        let state = AppState::new(Ledger::demo(), None, AppConfig::default(), true);
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);
        SettingsPopup {
            selected: 0,
            state: &state,
        }
        .render(area, &mut buf);
        let out = text(&buf);
        assert!(out.contains("[ON]"));
        assert!(out.contains("[36 cols]"));
    }

    fn send_text(flow: &SendFlow) -> String {
        let area = Rect::new(0, 0, 60, 24);
        let mut buf = Buffer::empty(area);
        SendPopup { flow }.render(area, &mut buf);
        text(&buf)
    }

    #[test]
    fn send_picker_lists_other_accounts() {
        let accounts = Ledger::demo().accounts;
        let flow = SendFlow::new(accounts[0].clone(), &accounts);
        let out = send_text(&flow);

        assert!(out.contains("Savings"));
        assert!(out.contains("▸ Allowance"));
        assert!(out.contains("Travel"));
        assert!(out.contains("Rainy Day"));
        assert!(!out.contains("enter amount"));
    }

    #[test]
    fn send_amount_stage_shows_only_destination_and_status() {
        let accounts = Ledger::demo().accounts;
        let mut flow = SendFlow::new(accounts[0].clone(), &accounts);
        flow.confirm();
        for c in "99".chars() {
            flow.push_char(c);
        }
        flow.confirm();
        let out = send_text(&flow);

        assert!(out.contains("Allowance"));
        assert!(!out.contains("Travel"));
        assert!(out.contains("MYR 99"));
        assert!(out.contains("Insufficient balance"));
    }

    #[test]
    fn controls_list_every_action() {
        let config = AppConfig::default();
        let area = Rect::new(0, 0, 60, 30);
        let mut buf = Buffer::empty(area);
        ControlsPopup {
            config: &config,
            selected: 0,
            awaiting_rebind: true,
        }
        .render(area, &mut buf);
        let out = text(&buf);
        for action in Action::ALL {
            assert!(out.contains(action.label()), "missing {}", action.label());
        }
        assert!(out.contains("Press a key"));
    }
}
