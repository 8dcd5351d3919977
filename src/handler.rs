use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::config::Config;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key).await?,
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
    }
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        // Quit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Esc => {
            app.should_quit = true;
        }

        // Shift+Enter inserts a newline instead of sending
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            insert_char(app, '\n');
        }
        KeyCode::Enter => {
            submit(app);
        }

        // Toggle single/multi mode, persisted for the next session
        KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.session.mode = app.session.mode.toggle();
            let _ = Config::save_mode(app.session.mode.as_str());
        }

        // Clear the server-side history; the transcript empties only when
        // the server confirmed. Failures are logged, the list stays.
        KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            match app.api.clear().await {
                Ok(()) => {
                    app.session.clear_messages();
                    app.scroll = 0;
                }
                Err(e) => {
                    log::error!("failed to clear history: {}", e);
                }
            }
        }

        // Transcript scrolling
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::PageUp => {
            app.scroll = app.scroll.saturating_sub(app.chat_height / 2);
        }
        KeyCode::PageDown => {
            app.scroll = app.scroll.saturating_add(app.chat_height / 2);
        }

        // Input editing
        KeyCode::Backspace => {
            if app.session.cursor > 0 {
                app.session.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.session.input, app.session.cursor);
                app.session.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.session.input.chars().count();
            if app.session.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.session.input, app.session.cursor);
                app.session.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.session.cursor = app.session.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.session.input.chars().count();
            app.session.cursor = (app.session.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.session.cursor = 0;
        }
        KeyCode::End => {
            app.session.cursor = app.session.input.chars().count();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            insert_char(app, c);
        }

        _ => {}
    }
    Ok(())
}

fn insert_char(app: &mut App, c: char) {
    let byte_pos = char_to_byte_index(&app.session.input, app.session.cursor);
    app.session.input.insert(byte_pos, c);
    app.session.cursor += 1;
}

/// Start a chat request for the current input. No-op while a request is in
/// flight or when the trimmed input is empty.
fn submit(app: &mut App) {
    if app.pending.is_some() {
        return;
    }
    if let Some(text) = app.session.take_submission() {
        app.scroll_to_bottom();

        let api = app.api.clone();
        let mode = app.session.mode;
        app.pending = Some(tokio::spawn(async move { api.send(mode, &text).await }));
    }
}
