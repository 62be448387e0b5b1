//! Keyboard handling.
//!
//! Input is drained non-blocking each frame. Stage keys map straight onto
//! engine transitions; rejected transitions (locked controls, detach without
//! a thrombus) are ignored here because the engine already refused them -
//! the control panel renders those keys as disabled.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use venosim_engine::{App, Stage};

/// Drain all pending terminal events. Returns `true` when the user asked to
/// quit.
pub fn handle_events(app: &mut App) -> Result<bool> {
    while event::poll(Duration::ZERO)? {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(app, key) {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Apply one key press. Returns `true` on quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Char('1') => select(app, Stage::Normal),
        KeyCode::Char('2') => select(app, Stage::Varicose),
        KeyCode::Char('3') => select(app, Stage::ThrombusFormed),
        KeyCode::Char('d') => {
            if let Err(e) = app.detach() {
                tracing::debug!(error = %e, "Detach ignored");
            }
        }
        KeyCode::Char('c') => app.toggle_high_contrast(),
        _ => {}
    }
    false
}

fn select(app: &mut App, stage: Stage) {
    if let Err(e) = app.select_stage(stage) {
        tracing::debug!(target_stage = %stage, error = %e, "Selection ignored");
    }
}
