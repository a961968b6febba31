use std::{cell::RefCell, rc::Rc};

use ratzilla::{
    backend::webgl2::FontAtlasConfig,
    backend::webgl2::WebGl2BackendOptions,
    event::{KeyCode, KeyEvent},
    WebGl2Backend, WebRenderer,
};
use workout_core::app::AppState;
use workout_core::key_event::{AppKeyCode, AppKeyEvent};
use workout_core::utils::quick_pick_keys;
use workout_core::{ui, Catalog};

// ── Key event conversion ─────────────────────────────────────────────────

fn convert_key(key: &KeyEvent) -> AppKeyEvent {
    let code = match key.code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Backspace => AppKeyCode::Backspace,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Tab => {
            if key.shift {
                AppKeyCode::BackTab
            } else {
                AppKeyCode::Tab
            }
        }
        KeyCode::Delete => AppKeyCode::Delete,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::Esc => AppKeyCode::Esc,
        _ => AppKeyCode::Other,
    };
    AppKeyEvent {
        code,
        ctrl: key.ctrl,
        alt: key.alt,
        shift: key.shift,
    }
}

// ── Main entry point ─────────────────────────────────────────────────────

fn main() {
    console_error_panic_hook::set_once();

    let app_state = AppState::new(Catalog::builtin(), "built-in".to_string());
    let state = Rc::new(RefCell::new(app_state));

    let backend = WebGl2Backend::new_with_options(
        WebGl2BackendOptions::new()
            .font_atlas_config(FontAtlasConfig::dynamic(&["JetBrains Mono"], 16.0)),
    )
    .expect("Failed to create WebGl2Backend");
    let terminal = ratzilla::ratatui::Terminal::new(backend).expect("Failed to create terminal");

    let state_key = Rc::clone(&state);
    terminal.on_key_event(move |key| {
        let mut s = state_key.borrow_mut();
        // No process to quit in the browser.
        let _ = s.handle_key(convert_key(&key));
    });

    let header = format!(
        "Workout Planner web demo • pick blocks with Enter or {} • nothing is saved",
        quick_pick_keys(state.borrow().catalog.len())
    );
    let state_draw = Rc::clone(&state);
    terminal.draw_web(move |f| {
        let s = state_draw.borrow();
        ui::ui(f, &s, &header);
    });
}
