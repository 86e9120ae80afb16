//! Transaction history for the active account.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::core::{
    account::{format_account_id, format_currency, Account},
    transaction::Transaction,
};

use super::theme::Theme;

/// Renders the history list, or an empty-state hint when no account is
/// active.
pub struct HistoryWidget<'a> {
    account: Option<&'a Account>,
    history: &'a [Transaction],
    offset: usize,
    block: Option<Block<'a>>,
}

impl<'a> HistoryWidget<'a> {
    pub fn new(account: Option<&'a Account>, history: &'a [Transaction]) -> Self {
        Self {
            account,
            history,
            offset: 0,
            block: None,
        }
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Two lines per entry: amount + counterparty, then the timestamp.
    fn entry_lines(account_id: i64, t: &Transaction) -> [Line<'static>; 2] {
        let direction = t.direction(account_id);
        let counterparty = match t.counterparty(account_id) {
            Some(id) => format_account_id(id),
            None => "bank".to_string(),
        };
        let auto = if t.is_automatic() { " (auto)" } else { "" };

        let first = Line::from(vec![
            Span::styled(format!("{} ", direction.arrow()), Theme::title_style()),
            Span::styled(format_currency(t.balance), Theme::amount_style()),
            Span::styled(auto.to_string(), Theme::description_style()),
            Span::styled(
                format!("  {} {counterparty}", direction.preposition()),
                Theme::amount_style(),
            ),
        ]);
        let second = Line::from(Span::styled(
            format!("  {}  {}", t.timestamp_local(), t.state),
            Theme::description_style(),
        ));
        [first, second]
    }
}

impl Widget for HistoryWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let lines: Vec<Line> = match self.account {
            None => vec![Line::from(Span::styled(
                "No account selected. Scroll to the + card to open one in the Plutus app.",
                Theme::description_style(),
            ))],
            Some(_) if self.history.is_empty() => vec![Line::from(Span::styled(
                "No transactions yet.",
                Theme::description_style(),
            ))],
            Some(account) => self
                .history
                .iter()
                .skip(self.offset)
                .flat_map(|t| Self::entry_lines(account.id, t))
                .collect(),
        };

        Paragraph::new(lines).render(inner, buf);
    }
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
    fn lists_entries_relative_to_account() {
        let ledger = Ledger::demo();
        let account = &ledger.accounts[1];
        let history = ledger.history_for(account.id);

        let area = Rect::new(0, 0, 70, 8);
        let mut buf = Buffer::empty(area);
        HistoryWidget::new(Some(account), &history).render(area, &mut buf);
        let out = text(&buf);

        assert!(out.contains("MYR 25.00 (auto)  to 3ade-68b1"));
        assert!(out.contains("MYR 50.00  to 8e5b-ba32"));
    }

    #[test]
    fn offset_skips_entries() {
        let ledger = Ledger::demo();
        let account = &ledger.accounts[1];
        let history = ledger.history_for(account.id);

        let area = Rect::new(0, 0, 70, 2);
        let mut buf = Buffer::empty(area);
        HistoryWidget::new(Some(account), &history)
            .offset(3)
            .render(area, &mut buf);
        assert!(text(&buf).contains("MYR 500.00  from bank"));
    }

    #[test]
    fn idle_selection_shows_hint() {
        let area = Rect::new(0, 0, 80, 2);
        let mut buf = Buffer::empty(area);
        HistoryWidget::new(None, &[]).render(area, &mut buf);
        assert!(text(&buf).contains("No account selected"));
    }
}
