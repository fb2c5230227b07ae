//! Event loop and key handling.
//!
//! Store calls are async; the loop drives them to completion on the runtime
//! handed in by `main`, then re-clamps the affected views.
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, FormMode, InputMode, ModalState};
use crate::error::StoreError;
use crate::ui;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    rt: &Runtime,
    app: &mut AppState,
) -> Result<()> {
    rt.block_on(app.ctx.refresh_everything());
    app.sync_all_views();

    loop {
        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let keep_running = match app.input_mode {
                    InputMode::Normal => handle_normal_key(app, rt, &key),
                    InputMode::Search => {
                        handle_search_key(app, key.code);
                        true
                    }
                    InputMode::Modal => {
                        handle_modal_key(app, rt, key.code);
                        true
                    }
                };
                if !keep_running {
                    break;
                }
            }
        }
    }

    debug!(uptime_secs = app.started_at.elapsed().as_secs(), "leaving event loop");
    Ok(())
}

/// Returns `false` when the user asked to quit.
fn handle_normal_key(app: &mut AppState, rt: &Runtime, key: &KeyEvent) -> bool {
    let Some(action) = app.keymap.resolve(key) else { return true };
    match action {
        KeyAction::Quit => return false,
        KeyAction::Ignore => {
            app.status = None;
            app.panel().clear_error();
        }
        KeyAction::OpenHelp => open_modal(app, ModalState::Help { scroll: 0 }),
        KeyAction::StartSearch => {
            app.view_mut().filter.clear();
            app.sync_view();
            app.input_mode = InputMode::Search;
        }
        KeyAction::NewRecord => {
            app.panel().reset_form();
            open_modal(app, ModalState::Form { mode: FormMode::Create, selected: 0, message: None });
        }
        KeyAction::EditRecord => {
            if let Some(row) = app.selected_row() {
                if app.panel().prefill_form(&row.id) {
                    let mode = FormMode::Edit { id: row.id };
                    open_modal(app, ModalState::Form { mode, selected: 0, message: None });
                }
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(row) = app.selected_row() {
                let label = row.cells.first().cloned().unwrap_or_else(|| row.id.clone());
                open_modal(app, ModalState::DeleteConfirm { id: row.id, label, selected: 1 });
            }
        }
        KeyAction::EnterAction => {
            if let Some(row) = app.selected_row() {
                let panel = app.panel();
                rt.block_on(panel.open(&row.id));
                let modal = match panel.selected_details() {
                    Some(lines) => ModalState::Details { title: format!("{} details", panel.noun()), lines },
                    None => ModalState::Info {
                        message: panel.error().unwrap_or_else(|| format!("No {} selected.", panel.noun())),
                    },
                };
                open_modal(app, modal);
            }
        }
        KeyAction::Refresh => {
            rt.block_on(async {
                app.panel().refresh().await;
                app.ctx.counts.refresh_all().await;
            });
            app.sync_view();
        }
        KeyAction::Logout => {
            app.ctx.auth.remove_token();
            info!("logged out");
            app.status = Some("Logged out.".to_string());
        }
        KeyAction::NextTab => app.active_tab = app.active_tab.next(),
        KeyAction::PrevTab => app.active_tab = app.active_tab.prev(),
        KeyAction::MoveUp => app.move_up(),
        KeyAction::MoveDown => app.move_down(),
        KeyAction::PrevPage => app.prev_page(),
        KeyAction::NextPage => app.next_page(),
    }
    true
}

fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.view_mut().filter.clear();
        }
        KeyCode::Backspace => app.view_mut().filter.pop_char(),
        KeyCode::Char(c) => app.view_mut().filter.push_char(c),
        _ => return,
    }
    app.sync_view();
}

fn handle_modal_key(app: &mut AppState, rt: &Runtime, code: KeyCode) {
    let Some(modal) = app.modal.take() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    let next = match modal {
        ModalState::Help { scroll } => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => None,
            KeyCode::Up | KeyCode::Char('k') => Some(ModalState::Help { scroll: scroll.saturating_sub(1) }),
            KeyCode::Down | KeyCode::Char('j') => Some(ModalState::Help { scroll: scroll.saturating_add(1) }),
            _ => Some(ModalState::Help { scroll }),
        },
        ModalState::Info { message } => match code {
            KeyCode::Esc | KeyCode::Enter => None,
            _ => Some(ModalState::Info { message }),
        },
        state @ ModalState::Details { .. } => match code {
            KeyCode::Esc | KeyCode::Enter => None,
            _ => Some(state),
        },
        ModalState::DeleteConfirm { id, label, selected } => match code {
            KeyCode::Esc | KeyCode::Char('n') => None,
            KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') | KeyCode::Tab => {
                Some(ModalState::DeleteConfirm { id, label, selected: 1 - selected.min(1) })
            }
            KeyCode::Char('y') => Some(perform_delete(app, rt, &id, &label)),
            KeyCode::Enter if selected == 0 => Some(perform_delete(app, rt, &id, &label)),
            KeyCode::Enter => None,
            _ => Some(ModalState::DeleteConfirm { id, label, selected }),
        },
        ModalState::Form { mode, selected, message } => handle_form_key(app, rt, code, mode, selected, message),
    };
    app.modal = next;
    if app.modal.is_none() {
        app.input_mode = InputMode::Normal;
    }
}

fn handle_form_key(
    app: &mut AppState,
    rt: &Runtime,
    code: KeyCode,
    mode: FormMode,
    selected: usize,
    message: Option<String>,
) -> Option<ModalState> {
    let fields = app.panel().form_schema().len();
    let stay = |selected: usize, message: Option<String>| Some(ModalState::Form { mode: mode.clone(), selected, message });
    match code {
        KeyCode::Esc => {
            app.panel().reset_form();
            None
        }
        KeyCode::Up | KeyCode::BackTab => stay(selected.saturating_sub(1), message),
        KeyCode::Down | KeyCode::Tab => stay((selected + 1).min(fields), message),
        KeyCode::Enter if selected < fields => stay(selected + 1, message),
        KeyCode::Enter => submit_form(app, rt, &mode),
        KeyCode::Backspace if selected < fields => {
            let panel = app.panel();
            let mut value = panel.form().value_at(selected).unwrap_or_default().to_string();
            value.pop();
            panel.set_form_value(selected, value);
            stay(selected, message)
        }
        KeyCode::Char(c) if selected < fields => {
            let panel = app.panel();
            let mut value = panel.form().value_at(selected).unwrap_or_default().to_string();
            value.push(c);
            panel.set_form_value(selected, value);
            stay(selected, message)
        }
        _ => stay(selected, message),
    }
}

fn submit_form(app: &mut AppState, rt: &Runtime, mode: &FormMode) -> Option<ModalState> {
    let panel = app.panel();
    let noun = panel.noun();
    let result = match mode {
        FormMode::Create => rt.block_on(panel.create()),
        FormMode::Edit { id } => {
            let patch = panel.form_patch();
            rt.block_on(async {
                panel.update(id, patch).await?;
                panel.refresh().await;
                Ok::<(), StoreError>(())
            })
        }
    };
    match result {
        Ok(()) => {
            panel.reset_form();
            let verb = match mode {
                FormMode::Create => "Created",
                FormMode::Edit { .. } => "Updated",
            };
            rt.block_on(app.ctx.counts.refresh_all());
            app.status = Some(format!("{verb} {noun}."));
            app.sync_view();
            None
        }
        Err(err) => {
            debug!(kind = ?err.kind(), error = %err, "form submission failed");
            let fields = app.panel().form_schema().len();
            Some(ModalState::Form { mode: mode.clone(), selected: fields, message: Some(err.message().to_string()) })
        }
    }
}

fn perform_delete(app: &mut AppState, rt: &Runtime, id: &str, label: &str) -> ModalState {
    let panel = app.panel();
    let noun = panel.noun();
    let result = rt.block_on(panel.delete(id));
    rt.block_on(app.ctx.counts.refresh_all());
    app.sync_view();
    match result {
        Ok(()) => ModalState::Info { message: format!("Deleted {noun} '{label}'.") },
        Err(err) => ModalState::Info { message: err.message().to_string() },
    }
}

fn open_modal(app: &mut AppState, modal: ModalState) {
    app.modal = Some(modal);
    app.input_mode = InputMode::Modal;
}
