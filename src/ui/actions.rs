//! Contextual action chips under the carousel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::config::{Action, AppConfig};

use super::theme::Theme;

/// Actions offered for the active account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionChip {
    Send,
    Request,
    Scan,
}

impl ActionChip {
    pub const ALL: [ActionChip; 3] = [ActionChip::Send, ActionChip::Request, ActionChip::Scan];

    pub fn label(self) -> &'static str {
        match self {
            ActionChip::Send => "Send",
            ActionChip::Request => "Request",
            ActionChip::Scan => "Scan",
        }
    }

    fn action(self) -> Action {
        match self {
            ActionChip::Send => Action::Send,
            ActionChip::Request => Action::Request,
            ActionChip::Scan => Action::Scan,
        }
    }
}

/// Row of chips; renders nothing while no account is active.
pub struct ActionsWidget<'a> {
    pub visible: bool,
    pub config: &'a AppConfig,
}

impl Widget for ActionsWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible {
            return;
        }
        let mut spans = vec![Span::raw("  ")];
        for chip in ActionChip::ALL {
            let key = self
                .config
                .bindings
                .get(&chip.action())
                .and_then(|b| b.first())
                .map(|b| format!(" [{}]", b.display()))
                .unwrap_or_default();
            spans.push(Span::styled(
                format!(" {}{key} ", chip.label()),
                Theme::chip_style(),
            ));
            spans.push(Span::raw("  "));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(buf: &Buffer) -> String {
        (0..buf.area.width).map(|x| buf[(x, 0)].symbol()).collect()
    }

    #[test]
    fn chips_show_bound_keys() {
        let config = AppConfig::default();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        ActionsWidget {
            visible: true,
            config: &config,
        }
        .render(area, &mut buf);
        let out = text(&buf);
        assert!(out.contains("Send [s]"));
        assert!(out.contains("Request [r]"));
        assert!(out.contains("Scan [c]"));
    }

    #[test]
    fn hidden_without_active_account() {
        let config = AppConfig::default();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        ActionsWidget {
            visible: false,
            config: &config,
        }
        .render(area, &mut buf);
        assert_eq!(text(&buf).trim(), "");
    }
}
