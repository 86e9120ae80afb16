//! User configuration — keybindings, carousel geometry and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/plutus-tui/config.toml` (default `~/.config/plutus-tui/config.toml`).

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NextCard,
    PrevCard,
    NudgeRight,
    NudgeLeft,
    FirstAccount,
    LastAccount,
    HistoryUp,
    HistoryDown,
    Send,
    Request,
    Scan,
    Reload,
    OpenSettings,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the controls menu).
    pub const ALL: &[Action] = &[
        Action::NextCard,
        Action::PrevCard,
        Action::NudgeRight,
        Action::NudgeLeft,
        Action::FirstAccount,
        Action::LastAccount,
        Action::HistoryUp,
        Action::HistoryDown,
        Action::Send,
        Action::Request,
        Action::Scan,
        Action::Reload,
        Action::OpenSettings,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::NextCard => "Next Account",
            Action::PrevCard => "Previous Account",
            Action::NudgeRight => "Drag Right",
            Action::NudgeLeft => "Drag Left",
            Action::FirstAccount => "First Account",
            Action::LastAccount => "Last Account",
            Action::HistoryUp => "History Up",
            Action::HistoryDown => "History Down",
            Action::Send => "Send",
            Action::Request => "Request",
            Action::Scan => "Scan",
            Action::Reload => "Reload Data",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::NextCard => "next_card",
            Action::PrevCard => "prev_card",
            Action::NudgeRight => "nudge_right",
            Action::NudgeLeft => "nudge_left",
            Action::FirstAccount => "first_account",
            Action::LastAccount => "last_account",
            Action::HistoryUp => "history_up",
            Action::HistoryDown => "history_down",
            Action::Send => "send",
            Action::Request => "request",
            Action::Scan => "scan",
            Action::Reload => "reload",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Modifiers that take part in matching.  For printable characters the
    /// shift state is already encoded in the character itself (`L` vs `l`).
    fn mask(code: KeyCode) -> KeyModifiers {
        match code {
            KeyCode::Char(_) => KeyModifiers::CONTROL | KeyModifiers::ALT,
            _ => KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT,
        }
    }

    /// Does this binding match a key event?
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = Self::mask(self.code);
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// Create a binding from a raw key event (used during rebinding).
    pub fn from_key_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers & Self::mask(event.code),
        }
    }

    fn key_name(&self, arrows: bool) -> String {
        match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up if arrows => "↑".into(),
            KeyCode::Down if arrows => "↓".into(),
            KeyCode::Left if arrows => "←".into(),
            KeyCode::Right if arrows => "→".into(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        }
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Shift+→"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        format!("{}{}", self.modifier_prefix(), self.key_name(true))
    }

    /// Serialise to config-file format (e.g. `"Shift+Right"`, `"q"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), self.key_name(false))
    }

    /// Parse a key string like `"Ctrl+c"`, `"Shift+Left"`, `"L"`, `"F5"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = *parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        // Single characters keep their case: `L` and `l` are different keys.
        let mut chars = key_part.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyBind::new(KeyCode::Char(c), modifiers));
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Card width bounds, in terminal columns.
pub const CARD_WIDTH_RANGE: (u16, u16) = (20, 80);
/// Gap between cards, in terminal columns.
pub const CARD_GAP_RANGE: (u16, u16) = (0, 8);

/// Application configuration — keybindings and carousel settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Width of one account card in columns.
    pub card_width: u16,
    /// Columns between neighbouring cards.
    pub card_gap: u16,
    /// Ring the terminal bell when the active account changes.
    pub haptics: bool,
    /// Fraction of the remaining distance covered per animation tick.
    pub scroll_speed: f64,
    /// Columns moved by a single drag nudge.
    pub nudge_cells: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            card_width: 36,
            card_gap: 2,
            haptics: true,
            scroll_speed: 0.35,
            nudge_cells: 6,
        }
    }
}

impl AppConfig {
    /// Hard-coded default bindings.
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let mut m = HashMap::new();

        m.insert(NextCard, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(PrevCard, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(NudgeRight, vec![KeyBind::new(Right, shift), KeyBind::new(Char('L'), n)]);
        m.insert(NudgeLeft, vec![KeyBind::new(Left, shift), KeyBind::new(Char('H'), n)]);
        m.insert(FirstAccount, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(LastAccount, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), n)]);
        m.insert(HistoryUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(HistoryDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Send, vec![KeyBind::new(Char('s'), n)]);
        m.insert(Request, vec![KeyBind::new(Char('r'), n)]);
        m.insert(Scan, vec![KeyBind::new(Char('c'), n)]);
        m.insert(Reload, vec![KeyBind::new(F(5), n), KeyBind::new(Char('R'), n)]);
        m.insert(OpenSettings, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Add a binding for `action`.  Removes this key from any other action
    /// to prevent conflicts, then appends it to `action`'s bindings.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    /// Remove every binding of `action`.
    pub fn clear_bindings(&mut self, action: Action) {
        self.bindings.insert(action, Vec::new());
    }

    /// Restore all bindings to the built-in defaults.
    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// Format the binding list for a given action (e.g. `"→/l"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: accounts | {}: drag | {}: history | {}: settings | {}: quit",
            self.short_binding(Action::PrevCard),
            self.short_binding(Action::NextCard),
            self.short_binding(Action::NudgeRight),
            self.short_binding(Action::HistoryDown),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(e) => {
                tracing::debug!("no config at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Persist current config to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(())
    }

    /// Save, logging instead of failing; used from settings toggles.
    pub fn save_or_warn(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("failed to save config: {e:#}");
        }
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            // Carousel settings.
            match key {
                "card_width" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.card_width = v.clamp(CARD_WIDTH_RANGE.0, CARD_WIDTH_RANGE.1);
                    }
                    continue;
                }
                "card_gap" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.card_gap = v.clamp(CARD_GAP_RANGE.0, CARD_GAP_RANGE.1);
                    }
                    continue;
                }
                "haptics" => {
                    config.haptics = value == "true";
                    continue;
                }
                "scroll_speed" => {
                    if let Ok(v) = value.parse::<f64>() {
                        if v.is_finite() {
                            config.scroll_speed = v.clamp(0.05, 0.95);
                        }
                    }
                    continue;
                }
                "nudge_cells" => {
                    if let Ok(v) = value.parse::<u16>() {
                        config.nudge_cells = v.clamp(1, 20);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# plutus-tui configuration".to_string(),
            String::new(),
            "# Carousel".to_string(),
            format!("card_width = {}", self.card_width),
            format!("card_gap = {}", self.card_gap),
            format!("haptics = {}", self.haptics),
            format!("scroll_speed = {}", self.scroll_speed),
            format!("nudge_cells = {}", self.nudge_cells),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/plutus-tui/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("plutus-tui").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn defaults_resolve_arrow_keys() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Right, KeyModifiers::NONE)),
            Some(Action::NextCard)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Right, KeyModifiers::SHIFT)),
            Some(Action::NudgeRight)
        );
    }

    #[test]
    fn shifted_letters_match_by_case() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Char('L'), KeyModifiers::SHIFT)),
            Some(Action::NudgeRight)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char('l'), KeyModifiers::NONE)),
            Some(Action::NextCard)
        );
    }

    #[test]
    fn parses_settings_and_bindings() {
        let config = AppConfig::parse_config(
            "# comment\n\
             card_width = 500\n\
             card_gap = 3\n\
             haptics = false\n\
             scroll_speed = 0.5\n\
             quit = Ctrl+x, Q\n\
             unknown_key = whatever\n",
        );
        assert_eq!(config.card_width, CARD_WIDTH_RANGE.1);
        assert_eq!(config.card_gap, 3);
        assert!(!config.haptics);
        assert_eq!(config.scroll_speed, 0.5);
        assert_eq!(
            config.bindings[&Action::Quit],
            vec![
                KeyBind::new(KeyCode::Char('x'), KeyModifiers::CONTROL),
                KeyBind::new(KeyCode::Char('Q'), KeyModifiers::NONE),
            ]
        );
    }

    #[test]
    fn serialised_config_parses_back() {
        let mut config = AppConfig::default();
        config.card_width = 44;
        config.haptics = false;
        config.add_binding(Action::Scan, KeyBind::new(KeyCode::F(2), KeyModifiers::ALT));

        let reparsed = AppConfig::parse_config(&config.serialise());
        assert_eq!(reparsed.card_width, 44);
        assert!(!reparsed.haptics);
        for &action in Action::ALL {
            assert_eq!(reparsed.bindings.get(&action), config.bindings.get(&action));
        }
    }

    #[test]
    fn add_binding_steals_key_from_other_action() {
        let mut config = AppConfig::default();
        config.add_binding(Action::Quit, KeyBind::new(KeyCode::Char('s'), KeyModifiers::NONE));
        assert_eq!(
            config.match_key(key(KeyCode::Char('s'), KeyModifiers::NONE)),
            Some(Action::Quit)
        );
        assert!(!config.bindings[&Action::Send]
            .iter()
            .any(|b| b.code == KeyCode::Char('s')));
    }
}
