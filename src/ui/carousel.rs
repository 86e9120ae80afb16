//! Horizontal account carousel.
//!
//! Cards are laid out on a strip `step` columns apart; the strip is shifted
//! by the synchronizer's current offset so that the card at
//! `offset_of(i)` sits centred in the viewport.  A dashed "create" card
//! follows the last account when the trailing affordance is enabled.

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::core::{
    account::Account,
    carousel::CarouselSync,
    circles::{CircleCache, CircleField},
};

use super::layout::CARD_HEIGHT;
use super::theme::Theme;

/// The carousel widget — created fresh each frame.
pub struct CarouselWidget<'a> {
    carousel: &'a CarouselSync<Account>,
    card_width: u16,
    elapsed: Duration,
    circles: Option<&'a CircleCache>,
}

impl<'a> CarouselWidget<'a> {
    pub fn new(carousel: &'a CarouselSync<Account>, card_width: u16) -> Self {
        Self {
            carousel,
            card_width,
            elapsed: Duration::ZERO,
            circles: None,
        }
    }

    /// Time since start, drives the background circles.
    pub fn elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Pre-built card backgrounds; plain fill without them.
    pub fn circles(mut self, circles: &'a CircleCache) -> Self {
        self.circles = Some(circles);
        self
    }

    /// Screen column of card `index`'s left edge (may be off-screen).
    fn card_left(&self, area: Rect, index: usize) -> i32 {
        let geometry = self.carousel.geometry();
        let centre = area.x as f64 + area.width as f64 / 2.0;
        let shift = index as f64 * geometry.step() - (self.carousel.offset() + geometry.inset());
        (centre + shift - self.card_width as f64 / 2.0).round() as i32
    }
}

impl Widget for CarouselWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let top = area.y + area.height.saturating_sub(CARD_HEIGHT) / 2;
        let height = CARD_HEIGHT.min(area.height);
        let active = self.carousel.active_index();
        let count = self.carousel.len() + usize::from(self.carousel.has_trailing());
        let plain = CircleField::default();

        for index in 0..count {
            let left = self.card_left(area, index);
            let right = left + self.card_width as i32;
            if right <= area.x as i32 || left >= area.right() as i32 {
                continue;
            }
            let card = CardCanvas {
                area,
                left,
                top,
                width: self.card_width,
                height,
            };
            match self.carousel.items().get(index) {
                Some(account) => {
                    let field = self
                        .circles
                        .and_then(|c| c.get(account.id))
                        .unwrap_or(&plain);
                    card.draw_account(buf, account, field, self.elapsed, active == Some(index));
                }
                None => card.draw_create(buf, self.carousel.is_sentinel_focused()),
            }
        }
    }
}

// ───────────────────────────────────────── drawing ───────────

/// One card's placement; all writes are clipped to `area`.
struct CardCanvas {
    area: Rect,
    left: i32,
    top: u16,
    width: u16,
    height: u16,
}

impl CardCanvas {
    fn put(&self, buf: &mut Buffer, col: u16, row: u16, symbol: &str, style: Style) {
        let x = self.left + col as i32;
        let y = self.top + row;
        if x < self.area.x as i32 || x >= self.area.right() as i32 || y >= self.area.bottom() {
            return;
        }
        if let Some(cell) = buf.cell_mut((x as u16, y)) {
            cell.set_symbol(symbol).set_style(style);
        }
    }

    fn put_str(&self, buf: &mut Buffer, col: u16, row: u16, text: &str, style: Style) {
        let max = self.width.saturating_sub(col + 2) as usize;
        let mut tmp = [0u8; 4];
        for (i, ch) in text.chars().take(max).enumerate() {
            self.put(buf, col + i as u16, row, ch.encode_utf8(&mut tmp), style);
        }
    }

    fn frame(&self, buf: &mut Buffer, style: Style, dashed: bool) {
        let (h, v) = if dashed { ("╌", "┆") } else { ("─", "│") };
        let last_col = self.width.saturating_sub(1);
        let last_row = self.height.saturating_sub(1);
        for col in 0..self.width {
            for row in [0, last_row] {
                let symbol = match (col, row) {
                    (0, 0) => "╭",
                    (c, 0) if c == last_col => "╮",
                    (0, _) => "╰",
                    (c, _) if c == last_col => "╯",
                    _ => h,
                };
                self.put(buf, col, row, symbol, style);
            }
        }
        for row in 1..last_row {
            self.put(buf, 0, row, v, style);
            self.put(buf, last_col, row, v, style);
        }
    }

    fn draw_account(
        &self,
        buf: &mut Buffer,
        account: &Account,
        field: &CircleField,
        elapsed: Duration,
        active: bool,
    ) {
        for row in 1..self.height.saturating_sub(1) {
            for col in 1..self.width.saturating_sub(1) {
                let bg = match field.color_at(col - 1, row - 1, elapsed) {
                    Some((r, g, b)) => Color::Rgb(r, g, b),
                    None => Theme::CARD_FILL,
                };
                self.put(buf, col, row, " ", Style::default().bg(bg));
            }
        }
        self.frame(buf, Theme::card_border_style(active), false);

        let text_row = |buf: &mut Buffer, row: u16, text: &str, style: Style| {
            self.put_str(buf, 2, row, text, style);
        };
        text_row(buf, 1, &account.name, Theme::card_name_style());
        text_row(buf, 2, &account.display_id(), Theme::card_id_style());
        text_row(
            buf,
            self.height.saturating_sub(3),
            &account.display_balance(),
            Theme::card_balance_style(),
        );
    }

    fn draw_create(&self, buf: &mut Buffer, focused: bool) {
        let style = Theme::create_card_style(focused);
        self.frame(buf, style, true);

        let mid = self.height / 2;
        let centre = self.width / 2;
        self.put(buf, centre, mid.saturating_sub(1), "+", style);
        let label = "New account";
        let start = centre.saturating_sub(label.len() as u16 / 2);
        self.put_str(buf, start, mid + 1, label, style);
    }
}
