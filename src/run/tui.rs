use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::quoting;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{clamp_index, format_currency, scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database) -> Result<()> {
    let mut app = App::new();
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = ?e, "TUI exited with an error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, panel borders and the table header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('J') if app.screen == Screen::Quotes => {
            let len = app.selected_quote().map_or(0, |q| q.items.len());
            if app.item_index + 1 < len {
                app.item_index += 1;
            }
        }
        KeyCode::Char('K') if app.screen == Screen::Quotes => {
            app.item_index = app.item_index.saturating_sub(1);
        }
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Quotes)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Costs)?,
        KeyCode::Char('4') => switch_screen(app, db, Screen::Catalog)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Esc => app.status_message.clear(),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('r') if app.screen == Screen::Quotes => {
            commands::handle_command("reprice", app, db)?;
        }
        KeyCode::Char('H') => {
            commands::handle_command("prev-month", app, db)?;
        }
        KeyCode::Char('L') => {
            commands::handle_command("next-month", app, db)?;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('x') if app.screen == Screen::Quotes => {
            commands::handle_command("delete-item", app, db)?;
        }
        KeyCode::Char('D') => {
            let cmd = match app.screen {
                Screen::Quotes => "delete-quote",
                Screen::Costs => "delete-cost",
                Screen::Catalog => "delete-catalog",
                Screen::Dashboard => return Ok(()),
            };
            commands::handle_command(cmd, app, db)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                run_pending_action(action, app, db)?;
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

fn run_pending_action(action: PendingAction, app: &mut App, db: &mut Database) -> Result<()> {
    match action {
        PendingAction::DeleteQuote { id, label } => {
            quoting::delete(db, id)?;
            app.refresh_quotes(db)?;
            app.refresh_dashboard(db)?;
            app.item_index = 0;
            app.set_status(format!("Deleted quote: {label}"));
        }
        PendingAction::RemoveItem {
            quote_id,
            item_id,
            name,
        } => {
            let quote = quoting::remove_item(db, quote_id, &item_id)?;
            app.refresh_quotes(db)?;
            app.refresh_dashboard(db)?;
            clamp_index(&mut app.item_index, quote.items.len());
            app.set_status(format!(
                "Removed {name}. Total: {}",
                format_currency(quote.snapshot.total_sales)
            ));
        }
        PendingAction::DeleteCost { id, name } => {
            db.delete_fixed_cost(id)?;
            app.refresh_costs(db)?;
            app.refresh_quotes(db)?;
            app.set_status(format!(
                "Deleted fixed cost: {name}. {} quote(s) now stale",
                app.stale_ids.len()
            ));
        }
        PendingAction::DeleteCatalogItem { id, name } => {
            db.delete_catalog_item(id)?;
            app.refresh_catalog(db)?;
            app.set_status(format!("Deleted catalog item: {name}"));
        }
        PendingAction::RepriceAll => {
            let changed = quoting::reprice_all(db)?;
            app.refresh_all(db)?;
            app.set_status(format!("Repriced open quotes: {changed} changed"));
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Dashboard => app.refresh_dashboard(db)?,
        Screen::Quotes => app.refresh_quotes(db)?,
        Screen::Costs => app.refresh_costs(db)?,
        Screen::Catalog => app.refresh_catalog(db)?,
    }
    app.set_status(format!("{screen}"));
    Ok(())
}

fn handle_move_down(app: &mut App) {
    match app.screen {
        Screen::Quotes => {
            let before = app.quote_index;
            scroll_down(
                &mut app.quote_index,
                &mut app.quote_scroll,
                app.quotes.len(),
                app.visible_rows.max(1),
            );
            if app.quote_index != before {
                app.item_index = 0;
            }
        }
        Screen::Costs => {
            if app.cost_index + 1 < app.fixed_costs.len() {
                app.cost_index += 1;
            }
        }
        Screen::Catalog => {
            if app.catalog_index + 1 < app.catalog.len() {
                app.catalog_index += 1;
            }
        }
        Screen::Dashboard => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Quotes => {
            let before = app.quote_index;
            scroll_up(&mut app.quote_index, &mut app.quote_scroll);
            if app.quote_index != before {
                app.item_index = 0;
            }
        }
        Screen::Costs => app.cost_index = app.cost_index.saturating_sub(1),
        Screen::Catalog => app.catalog_index = app.catalog_index.saturating_sub(1),
        Screen::Dashboard => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Quotes => {
            scroll_to_top(&mut app.quote_index, &mut app.quote_scroll);
            app.item_index = 0;
        }
        Screen::Costs => app.cost_index = 0,
        Screen::Catalog => app.catalog_index = 0,
        Screen::Dashboard => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    match app.screen {
        Screen::Quotes => {
            scroll_to_bottom(
                &mut app.quote_index,
                &mut app.quote_scroll,
                app.quotes.len(),
                app.visible_rows.max(1),
            );
            app.item_index = 0;
        }
        Screen::Costs => app.cost_index = app.fixed_costs.len().saturating_sub(1),
        Screen::Catalog => app.catalog_index = app.catalog.len().saturating_sub(1),
        Screen::Dashboard => {}
    }
}
