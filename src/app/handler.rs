//! Input handling — maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tracing::{info, warn};

use crate::config::{Action, KeyBind};
use crate::core::ledger::Ledger;
use crate::core::transfer::{SendFlow, SendStep};
use crate::ui::actions::ActionChip;

use super::settings::{SettingsItem, SETTINGS_ITEMS};
use super::state::{ActiveView, AppState};

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Home => handle_home_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::Send => handle_send_key(state, key),
        ActiveView::ControlsSubmenu => {
            if state.awaiting_rebind {
                handle_rebind_key(state, key);
            } else {
                handle_controls_key(state, key);
            }
        }
    }
}

/// Horizontal wheel drags the carousel; vertical wheel scrolls history.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Home {
        return;
    }
    let nudge = state.config.nudge_cells as f64;
    match mouse.kind {
        MouseEventKind::ScrollRight => state.nudge(nudge),
        MouseEventKind::ScrollLeft => state.nudge(-nudge),
        MouseEventKind::ScrollDown if mouse.modifiers.contains(KeyModifiers::SHIFT) => {
            state.nudge(nudge)
        }
        MouseEventKind::ScrollUp if mouse.modifiers.contains(KeyModifiers::SHIFT) => {
            state.nudge(-nudge)
        }
        MouseEventKind::ScrollDown => state.scroll_history(true),
        MouseEventKind::ScrollUp => state.scroll_history(false),
        _ => {}
    }
}

// ── Home screen (configurable bindings) ─────────────────────────

fn handle_home_key(state: &mut AppState, key: KeyEvent) {
    let Some(action) = state.config.match_key(key) else {
        return;
    };
    state.status_message = None;

    match action {
        Action::Quit => state.should_quit = true,
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::NextCard => {
            let next = state.target_index() + 1;
            state.animate_to(next);
        }
        Action::PrevCard => {
            let prev = state.target_index().saturating_sub(1);
            state.animate_to(prev);
        }
        Action::NudgeRight => state.nudge(state.config.nudge_cells as f64),
        Action::NudgeLeft => state.nudge(-(state.config.nudge_cells as f64)),
        Action::FirstAccount => state.animate_to(0),
        Action::LastAccount => state.animate_to(state.carousel.len().saturating_sub(1)),
        Action::HistoryUp => state.scroll_history(false),
        Action::HistoryDown => state.scroll_history(true),
        Action::Send => press_chip(state, ActionChip::Send),
        Action::Request => press_chip(state, ActionChip::Request),
        Action::Scan => press_chip(state, ActionChip::Scan),
        Action::Reload => reload_data(state),
    }
}

/// Contextual chips only exist while an account is active.
fn press_chip(state: &mut AppState, chip: ActionChip) {
    let Some(account) = state.active_account() else {
        state.status_message = Some("Create an account first".into());
        return;
    };
    let id = account.display_id();

    let message = match chip {
        ActionChip::Send => {
            let flow = SendFlow::new(account.clone(), &state.ledger.accounts);
            if flow.destinations().is_empty() {
                "No other account to send to".to_string()
            } else {
                state.send = Some(flow);
                state.active_view = ActiveView::Send;
                return;
            }
        }
        ActionChip::Request => {
            state.animate_to(0);
            format!("Request to {id}: share this account id with the payer")
        }
        ActionChip::Scan => "Scan needs a camera; not available in the terminal".to_string(),
    };
    state.status_message = Some(message);
}

/// Re-read the data snapshot (or the demo data) and swap it in.
pub fn reload_data(state: &mut AppState) {
    let loaded = match &state.data_path {
        Some(path) => Ledger::load(path),
        None => Ok(Ledger::demo()),
    };
    match loaded {
        Ok(ledger) => {
            let count = ledger.accounts.len();
            state.replace_ledger(ledger);
            info!(accounts = count, "ledger reloaded");
            state.status_message = Some(format!("Reloaded {count} accounts"));
        }
        Err(e) => {
            warn!("ledger reload failed: {e}");
            state.status_message = Some(format!("Reload failed: {e}"));
        }
    }
}

// ── Send form ───────────────────────────────────────────────────

fn handle_send_key(state: &mut AppState, key: KeyEvent) {
    let Some(flow) = state.send.as_mut() else {
        state.active_view = ActiveView::Home;
        return;
    };

    match key.code {
        KeyCode::Esc => {
            if !flow.cancel() {
                close_send(state, None);
            }
        }
        KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => flow.select_prev(),
        KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => flow.select_next(),
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => flow.push_char(c),
        KeyCode::Backspace => flow.pop_char(),
        KeyCode::Enter => match flow.confirm() {
            SendStep::Ready(request) => {
                let summary = flow.describe(&request);
                let body = serde_json::to_string(&request).unwrap_or_default();
                info!(endpoint = %request.endpoint(), %body, "transfer request prepared");
                state.last_request = Some(request);
                close_send(state, Some(format!("Transfer ready: {summary}")));
            }
            SendStep::Rejected(outcome) => {
                info!(?outcome, "transfer request rejected");
            }
            SendStep::Advanced | SendStep::Unchanged => {}
        },
        _ => {}
    }
}

fn close_send(state: &mut AppState, message: Option<String>) {
    state.send = None;
    state.active_view = ActiveView::Home;
    state.status_message = message;
}

// ── Settings menu (hardcoded navigation) ────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Home;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected < SETTINGS_ITEMS.len() - 1 {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                match item {
                    SettingsItem::Submenu { view, .. } => {
                        state.active_view = *view;
                        state.controls_selected = 0;
                    }
                    SettingsItem::Toggle { get, set, .. } => {
                        let current = get(state);
                        set(state, !current);
                    }
                    SettingsItem::Cycle { cycle, .. } => {
                        cycle(state);
                    }
                }
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    let item_count = controls_item_count();

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Home;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected < item_count - 1 {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => {
            if state.controls_selected < Action::ALL.len() {
                state.awaiting_rebind = true;
            } else {
                state.config.reset_defaults();
                state.config.save_or_warn();
                state.status_message = Some("Key bindings reset to defaults".into());
            }
        }
        KeyCode::Delete | KeyCode::Backspace => {
            if let Some(&action) = Action::ALL.get(state.controls_selected) {
                state.config.clear_bindings(action);
                state.config.save_or_warn();
            }
        }
        _ => {}
    }
}

fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    state.awaiting_rebind = false;
    if key.code == KeyCode::Esc {
        return;
    }
    if let Some(&action) = Action::ALL.get(state.controls_selected) {
        let bind = KeyBind::from_key_event(key);
        state.status_message = Some(format!("{} → {}", action.label(), bind.display()));
        state.config.add_binding(action, bind);
        state.config.save_or_warn();
    }
}
