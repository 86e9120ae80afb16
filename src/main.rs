//! A terminal account carousel for the Plutus finance backend.
//!
//! Run the binary with a JSON ledger snapshot to browse its accounts, or
//! without arguments to browse the built-in demo data.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use tracing::info;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::core::{account::format_account_id, ledger::Ledger};
use crate::ui::{
    actions::ActionsWidget, carousel::CarouselWidget, history::HistoryWidget, layout::AppLayout,
    popup, theme::Theme,
};

/// ~30 fps keeps the carousel animation smooth without busy-looping.
const FRAME_TIME: Duration = Duration::from_millis(33);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Account carousel and transaction history")]
struct Cli {
    /// Ledger snapshot (JSON) to display; demo data when omitted.
    data: Option<PathBuf>,

    /// Hide the trailing "new account" card.
    #[arg(long = "no-trailing")]
    no_trailing: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Seed for card background patterns.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    // ── load data ─────────────────────────────────────────────
    let ledger = match &cli.data {
        Some(path) => Ledger::load(path)?,
        None => Ledger::demo(),
    };
    info!(
        user = %ledger.user,
        accounts = ledger.accounts.len(),
        transactions = ledger.transactions.len(),
        "ledger loaded"
    );

    let user_config = config::AppConfig::load();
    let mut state = AppState::new(ledger, cli.data.clone(), user_config, !cli.no_trailing);
    state.set_circle_seed(cli.seed);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
) -> Result<()> {
    let mut events = spawn_event_reader(FRAME_TIME);

    loop {
        terminal.draw(|frame| draw(frame, state))?;

        if state.pending_bell {
            state.pending_bell = false;
            let mut out = stderr();
            out.write_all(b"\x07")?;
            out.flush()?;
        }

        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(k) => handler::handle_key(state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(state, m),
            AppEvent::Resize(_, _) => {}
            AppEvent::Tick => {}
        }
        // Every event advances the animation so held keys don't stall it.
        state.tick();

        if state.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut ratatui::Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area());

    // ── navbar ────────────────────────────────────────────────
    let navbar = Line::from(vec![
        Span::styled("  ● ", Theme::title_style()),
        Span::styled(state.ledger.user.as_str(), Theme::navbar_style()),
    ]);
    frame.render_widget(Paragraph::new(navbar), layout.navbar_area);

    // ── carousel ──────────────────────────────────────────────
    let carousel = CarouselWidget::new(&state.carousel, state.config.card_width)
        .elapsed(state.started.elapsed())
        .circles(&state.circles);
    frame.render_widget(carousel, layout.carousel_area);

    frame.render_widget(
        ActionsWidget {
            visible: state.active_account().is_some(),
            config: &state.config,
        },
        layout.actions_area,
    );

    // ── history ───────────────────────────────────────────────
    let title = match state.active_account() {
        Some(account) => format!(" History · {} ", format_account_id(account.id)),
        None => " History ".to_string(),
    };
    let history_block = Block::default()
        .title(title)
        .title_style(Theme::title_style())
        .borders(Borders::TOP)
        .border_style(Theme::border_style());
    let history = HistoryWidget::new(state.active_account(), &state.history)
        .offset(state.history_offset)
        .block(history_block);
    frame.render_widget(history, layout.history_area);

    // ── status bar ────────────────────────────────────────────
    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Home if state.carousel.is_sentinel_focused() => {
            "Open a new account in the Plutus app, then reload"
        }
        ActiveView::Home => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu | ActiveView::Send => "",
    };
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    match state.active_view {
        ActiveView::SettingsMenu => {
            frame.render_widget(
                popup::SettingsPopup {
                    selected: state.settings_selected,
                    state,
                },
                frame.area(),
            );
        }
        ActiveView::ControlsSubmenu => {
            frame.render_widget(
                popup::ControlsPopup {
                    config: &state.config,
                    selected: state.controls_selected,
                    awaiting_rebind: state.awaiting_rebind,
                },
                frame.area(),
            );
        }
        ActiveView::Send => {
            if let Some(flow) = &state.send {
                frame.render_widget(popup::SendPopup { flow }, frame.area());
            }
        }
        ActiveView::Home => {}
    }
}
