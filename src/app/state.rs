//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::PathBuf;
use std::time::Instant;

use tracing::debug;

use crate::config::AppConfig;
use crate::core::{
    account::Account,
    carousel::{CarouselGeometry, CarouselSync, SelectionChange, SelectionEffects},
    circles::CircleCache,
    ledger::Ledger,
    transaction::Transaction,
    transfer::{SendFlow, TransferRequest},
};
use crate::ui::{layout::CARD_HEIGHT, smooth_scroll::SmoothScroll};

/// Idle frames after a drag before the carousel snaps to the nearest card.
pub const SNAP_AFTER_IDLE_TICKS: u32 = 6;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Home,
    SettingsMenu,
    ControlsSubmenu,
    /// Send-money form over the active account.
    Send,
}

/// Side effects of a carousel selection change on the home screen: queue a
/// bell and refetch the history of the newly active account.
struct HomeEffects<'a> {
    ledger: &'a Ledger,
    history: &'a mut Vec<Transaction>,
    history_offset: &'a mut usize,
    bell: &'a mut bool,
    haptics: bool,
}

impl SelectionEffects<Account> for HomeEffects<'_> {
    fn haptic(&mut self) {
        if self.haptics {
            *self.bell = true;
        }
    }

    fn on_select(&mut self, item: &Account) {
        *self.history = self.ledger.history_for(item.id);
        *self.history_offset = 0;
        debug!(
            account = %item.display_id(),
            entries = self.history.len(),
            "history refetched for active account"
        );
    }
}

/// Top-level application state.
pub struct AppState {
    /// Current accounts/transactions snapshot.
    pub ledger: Ledger,
    /// Where the snapshot came from (`None` = built-in demo data).
    pub data_path: Option<PathBuf>,
    /// Account carousel selection.
    pub carousel: CarouselSync<Account>,
    /// Offset animation feeding the carousel.
    pub scroll: SmoothScroll,
    /// Transactions of the active account, newest first.
    pub history: Vec<Transaction>,
    /// First visible history row.
    pub history_offset: usize,
    /// User configuration.
    pub config: AppConfig,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the controls submenu.
    pub controls_selected: usize,
    /// When `true`, the controls submenu is waiting for a key to bind.
    pub awaiting_rebind: bool,
    /// Open send form, present while `active_view` is `Send`.
    pub send: Option<SendFlow>,
    /// The last transfer request the send form produced.
    pub last_request: Option<TransferRequest>,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Set by the haptic side effect; the main loop rings the bell.
    pub pending_bell: bool,
    /// Frames since the carousel last moved.
    pub idle_ticks: u32,
    /// Card backgrounds, rebuilt when accounts, seed or card size change.
    pub circles: CircleCache,
    /// Animation clock for card backgrounds.
    pub started: Instant,
}

impl AppState {
    pub fn new(ledger: Ledger, data_path: Option<PathBuf>, config: AppConfig, trailing: bool) -> Self {
        let geometry = geometry_for(&config);
        let carousel = CarouselSync::new(ledger.accounts.clone(), geometry).with_trailing(trailing);
        let scroll = SmoothScroll::new(carousel.offset(), config.scroll_speed);
        let (width, height) = card_interior(&config);
        let circles = CircleCache::build(0, &ledger.accounts, width, height);

        let mut state = Self {
            ledger,
            data_path,
            carousel,
            scroll,
            history: Vec::new(),
            history_offset: 0,
            config,
            active_view: ActiveView::default(),
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            send: None,
            last_request: None,
            status_message: None,
            should_quit: false,
            pending_bell: false,
            idle_ticks: 0,
            circles,
            started: Instant::now(),
        };

        // Resolve the first card without a bell.
        let initial = state.carousel.offset();
        let haptics = std::mem::replace(&mut state.config.haptics, false);
        state.feed_offset(initial);
        state.config.haptics = haptics;
        state
    }

    /// Re-seed the card backgrounds.
    pub fn set_circle_seed(&mut self, seed: u64) {
        let (width, height) = card_interior(&self.config);
        self.circles
            .reconfigure(seed, width, height, &self.ledger.accounts);
    }

    /// Deliver one scroll offset to the carousel, running selection effects.
    pub fn feed_offset(&mut self, x: f64) -> Option<SelectionChange<Account>> {
        let mut fx = HomeEffects {
            ledger: &self.ledger,
            history: &mut self.history,
            history_offset: &mut self.history_offset,
            bell: &mut self.pending_bell,
            haptics: self.config.haptics,
        };
        self.carousel.scroll_to(x, &mut fx)
    }

    /// Start an animated scroll to card `index` (clamped to the snap range).
    pub fn animate_to(&mut self, index: usize) {
        let index = index.min(self.carousel.max_index());
        self.scroll.set_target(self.carousel.geometry().offset_of(index));
        self.idle_ticks = 0;
    }

    /// Index the carousel is heading to (the animation target).
    pub fn target_index(&self) -> usize {
        let geometry = self.carousel.geometry();
        geometry
            .index_at(self.scroll.target())
            .unwrap_or(0)
            .clamp(0, self.carousel.max_index() as i64) as usize
    }

    /// Drag the carousel by `dx` columns without snapping.
    pub fn nudge(&mut self, dx: f64) {
        self.scroll.shift_target(dx);
        self.idle_ticks = 0;
    }

    /// Advance animations by one frame.
    pub fn tick(&mut self) {
        if let Some(x) = self.scroll.tick() {
            self.feed_offset(x);
            self.idle_ticks = 0;
            return;
        }

        self.idle_ticks = self.idle_ticks.saturating_add(1);
        if self.idle_ticks == SNAP_AFTER_IDLE_TICKS {
            // Released between two cards: settle on the nearest one.
            let nearest = self.carousel.nearest_index();
            let aligned = self.carousel.geometry().offset_of(nearest);
            if aligned != self.scroll.position() {
                self.scroll.set_target(aligned);
            }
        }
    }

    /// Replace the data snapshot, keeping the carousel position.
    pub fn replace_ledger(&mut self, ledger: Ledger) {
        self.ledger = ledger;
        self.circles.rebuild(&self.ledger.accounts);
        let accounts = self.ledger.accounts.clone();
        let mut fx = HomeEffects {
            ledger: &self.ledger,
            history: &mut self.history,
            history_offset: &mut self.history_offset,
            bell: &mut self.pending_bell,
            haptics: self.config.haptics,
        };
        let changed = self.carousel.set_items(accounts, &mut fx);
        if changed.is_some() {
            return;
        }

        match self.carousel.active().map(|a| a.id) {
            // Same account still active: its history may have grown.
            Some(id) => {
                self.history = self.ledger.history_for(id);
                self.history_offset = self.history_offset.min(self.history.len().saturating_sub(1));
            }
            // Active account was removed: settle on the nearest one left.
            None => {
                self.history.clear();
                self.history_offset = 0;
                if !self.carousel.is_empty() {
                    let index = self.carousel.nearest_index().min(self.carousel.len() - 1);
                    let aligned = self.carousel.geometry().offset_of(index);
                    self.scroll.jump_to(aligned);
                    self.feed_offset(aligned);
                }
            }
        }
    }

    /// Re-apply card geometry after a settings change.
    pub fn apply_geometry(&mut self) {
        let geometry = geometry_for(&self.config);
        let mut fx = HomeEffects {
            ledger: &self.ledger,
            history: &mut self.history,
            history_offset: &mut self.history_offset,
            bell: &mut self.pending_bell,
            haptics: self.config.haptics,
        };
        self.carousel.set_geometry(geometry, &mut fx);
        self.scroll.jump_to(self.carousel.offset());
        self.scroll.set_speed(self.config.scroll_speed);

        let (width, height) = card_interior(&self.config);
        let seed = self.circles.seed();
        self.circles
            .reconfigure(seed, width, height, &self.ledger.accounts);
    }

    /// Account under the selection, if any.
    pub fn active_account(&self) -> Option<&Account> {
        self.carousel.active()
    }

    pub fn scroll_history(&mut self, down: bool) {
        if down {
            if self.history_offset + 1 < self.history.len() {
                self.history_offset += 1;
            }
        } else {
            self.history_offset = self.history_offset.saturating_sub(1);
        }
    }
}

/// Columns and rows inside a card's border.
fn card_interior(config: &AppConfig) -> (u16, u16) {
    (config.card_width.saturating_sub(2), CARD_HEIGHT.saturating_sub(2))
}

/// Carousel geometry for the configured card size.  Leading inset is half a
/// gap so the first card sits centred at the initial offset.
pub fn geometry_for(config: &AppConfig) -> CarouselGeometry {
    CarouselGeometry::from_card(
        config.card_width as f64,
        config.card_gap as f64,
        config.card_gap as f64 / 2.0,
    )
}
