//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::{ActiveView, AppState};

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    /// Boolean toggle — reads/writes via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Cycles through a finite set of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }

    /// Current value shown next to the label.
    pub fn value(&self, state: &AppState) -> Option<String> {
        match self {
            Self::Submenu { .. } => None,
            Self::Toggle { get, .. } => Some(if get(state) { "ON" } else { "OFF" }.to_string()),
            Self::Cycle { value, .. } => Some(value(state)),
        }
    }
}

const CARD_WIDTHS: &[u16] = &[28, 32, 36, 40, 48];
const SCROLL_SPEEDS: &[f64] = &[0.2, 0.35, 0.5, 0.7];

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Toggle {
        label: "Haptic Bell",
        get: |s| s.config.haptics,
        set: |s, v| {
            s.config.haptics = v;
            s.config.save_or_warn();
        },
    },
    SettingsItem::Cycle {
        label: "Card Width",
        value: |s| format!("{} cols", s.config.card_width),
        cycle: |s| {
            let idx = CARD_WIDTHS
                .iter()
                .position(|&w| w == s.config.card_width)
                .unwrap_or(1);
            s.config.card_width = CARD_WIDTHS[(idx + 1) % CARD_WIDTHS.len()];
            s.config.save_or_warn();
            s.apply_geometry();
            s.status_message = Some(format!("Card width: {} cols", s.config.card_width));
        },
    },
    SettingsItem::Cycle {
        label: "Scroll Speed",
        value: |s| format!("{:.2}", s.config.scroll_speed),
        cycle: |s| {
            let idx = SCROLL_SPEEDS
                .iter()
                .position(|&v| (v - s.config.scroll_speed).abs() < 1e-9)
                .unwrap_or(0);
            s.config.scroll_speed = SCROLL_SPEEDS[(idx + 1) % SCROLL_SPEEDS.len()];
            s.config.save_or_warn();
            s.scroll.set_speed(s.config.scroll_speed);
            s.status_message = Some(format!("Scroll speed: {:.2}", s.config.scroll_speed));
        },
    },
];
