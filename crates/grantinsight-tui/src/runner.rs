// TUI event loop and terminal management
use crate::app::Screen;
use crate::{App, InputMode};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use grantinsight_core::dashboard::DashboardModule;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

pub fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app);

    // Restore terminal even when the loop bailed out
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| crate::ui::render(f, app))?;

        if let Event::Key(key) = event::read()? {
            handle_key(app, key);
        }

        if app.should_quit {
            tracing::info!("Leaving dashboard");
            return Ok(());
        }
    }
}

/// Apply one key press to the app state
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    // Help overlay swallows everything but its own close keys
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
            app.toggle_help();
        }
        return;
    }

    if app.screen == Screen::Landing {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => app.enter_dashboard(),
            KeyCode::Char('?') => app.toggle_help(),
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            _ => {}
        }
        return;
    }

    match app.input_mode {
        InputMode::Searching => match key.code {
            KeyCode::Enter | KeyCode::Esc => app.enter_normal_mode(),
            KeyCode::Backspace => app.pop_search_char(),
            KeyCode::Down => app.next_result(),
            KeyCode::Up => app.previous_result(),
            KeyCode::Char(c) => app.push_search_char(c),
            _ => {}
        },
        InputMode::Normal => {
            app.clear_messages();
            match key.code {
                KeyCode::Char('q') => app.quit(),
                KeyCode::Esc => app.back_to_landing(),
                KeyCode::Char('?') => app.toggle_help(),
                KeyCode::Char(c @ '1'..='5') => {
                    let position = c as usize - '1' as usize;
                    if let Some(module) = DashboardModule::from_position(position) {
                        app.select_module(module);
                    }
                }
                KeyCode::Tab => app.next_module(),
                KeyCode::BackTab => app.previous_module(),
                KeyCode::Char('[') => app.toggle_sidebar(),
                KeyCode::Char('/') => app.enter_search_mode(),
                KeyCode::Char('s') => app.next_status_filter(),
                KeyCode::Char('S') => app.previous_status_filter(),
                KeyCode::Char('c') => app.clear_filters(),
                KeyCode::Char('j') | KeyCode::Down => app.next_result(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_result(),
                KeyCode::Char('e') => {
                    app.export_visible();
                }
                KeyCode::Char('r') => app.reload(),
                _ => {}
            }
        }
    }
}
