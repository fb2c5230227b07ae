//! Shared UI components (status bar, modal helpers).
//!
//! Every modal is drawn centered over the table with the area cleared first.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, FormMode, InputMode, ModalState};
use crate::store::form::FieldKind;

/// Render the bottom status bar with mode, activity and the last outcome.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let panel = app.panel();
    let base = Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg);
    let matches = app.filtered_rows().len();
    let mut spans = vec![Span::styled(
        format!(" mode: {mode}  {}: {matches}  rows/page: {} ", panel.noun(), app.view().pager.page_size()),
        base,
    )];
    if panel.loading() || app.ctx.counts.snapshot().loading() {
        spans.push(Span::styled(" loading... ", base.add_modifier(Modifier::ITALIC)));
    }
    if let Some(err) = panel.error() {
        spans.push(Span::styled(format!(" {err} "), base.fg(app.theme.error)));
    } else if let Some(status) = &app.status {
        spans.push(Span::styled(format!(" {status} "), base.fg(app.theme.success)));
    }
    let p = Paragraph::new(Line::from(spans)).style(base);
    f.render_widget(p, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

fn modal_block<'a>(title: impl Into<Line<'a>>, app: &AppState) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        // Compute a sensible max width and height; wrap long text
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 50u16.min(max_w);
        let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 4).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(message.clone())
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(app.theme.text))
            .block(modal_block("Info", app));
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

const HELP_ENTRIES: &[(&str, &[KeyAction])] = &[
    ("Move up / down", &[KeyAction::MoveUp, KeyAction::MoveDown]),
    ("Previous / next page", &[KeyAction::PrevPage, KeyAction::NextPage]),
    ("Switch tab", &[KeyAction::NextTab, KeyAction::PrevTab]),
    ("Search", &[KeyAction::StartSearch]),
    ("Show details", &[KeyAction::EnterAction]),
    ("New record", &[KeyAction::NewRecord]),
    ("Edit record", &[KeyAction::EditRecord]),
    ("Delete record", &[KeyAction::DeleteSelection]),
    ("Reload", &[KeyAction::Refresh]),
    ("Log out", &[KeyAction::Logout]),
    ("Help", &[KeyAction::OpenHelp]),
    ("Quit", &[KeyAction::Quit]),
];

/// Help lists the live bindings, so custom `keybinds.conf` entries show up.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    for (label, actions) in HELP_ENTRIES {
        let keys: Vec<String> = actions.iter().flat_map(|a| app.keymap.keys_for(*a)).collect();
        lines.push(Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(keys.join(" / "), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Search", Style::default().add_modifier(Modifier::BOLD))));
    lines.push(Line::raw("Type to filter as you go; Enter keeps the query, Esc clears it."));
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Forms", Style::default().add_modifier(Modifier::BOLD))));
    lines.push(Line::raw("Up/Down or Tab to move between fields, Enter on Submit to save, Esc to cancel."));
    lines.push(Line::raw("Blank fields are left unchanged when editing."));
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("Close help: "),
        Span::styled("Esc / Enter", Style::default().add_modifier(Modifier::ITALIC)),
    ]));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(modal_block("Help", app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_details_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Details { title, lines } = state {
        let height = (lines.len() as u16 + 4).min(area.height.saturating_sub(2));
        let rect = centered_rect(60, height, area);
        let body: Vec<Line> = lines
            .iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(app.theme.muted)),
                    Span::styled(value.clone(), Style::default().fg(app.theme.text)),
                ])
            })
            .collect();
        let p = Paragraph::new(body).wrap(Wrap { trim: true }).block(modal_block(title.clone(), app));
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let ModalState::Form { mode, selected, message } = state else { return };
    let panel = app.panel();
    let form = panel.form();
    let errors = panel.validation_errors();
    let schema = panel.form_schema();

    let mut lines: Vec<Line> = Vec::new();
    for (i, spec) in schema.iter().enumerate() {
        let raw = form.value_at(i).unwrap_or_default();
        let shown = match spec.kind {
            FieldKind::Secret => "*".repeat(raw.chars().count()),
            FieldKind::Text | FieldKind::Email => raw.to_string(),
        };
        let marker = if i == *selected { "> " } else { "  " };
        let style = if i == *selected {
            Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{}: ", spec.label), style),
            Span::styled(shown, Style::default().fg(app.theme.text)),
        ]));
        if let Some(err) = errors.get(spec.key).filter(|e| !e.is_empty()) {
            lines.push(Line::from(Span::styled(format!("    {err}"), Style::default().fg(app.theme.error))));
        }
    }
    lines.push(Line::raw(""));
    let submit = if *selected >= schema.len() { "[Submit]" } else { " Submit " };
    lines.push(Line::from(Span::styled(submit, Style::default().fg(app.theme.highlight_fg))));
    if let Some(msg) = message {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(msg.clone(), Style::default().fg(app.theme.error))));
    }

    let title = match mode {
        FormMode::Create => format!("New {}", panel.noun()),
        FormMode::Edit { .. } => format!("Edit {}", panel.noun()),
    };
    let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let width = 64u16.min(area.width.saturating_sub(4)).max(30);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(modal_block(title, app));
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::DeleteConfirm { label, selected, .. } = state {
        let rect = centered_rect(50, 7, area);
        let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
        let no = if *selected == 1 { "[No]" } else { " No  " };
        let body = format!("Delete {} '{label}'?\n\n  {yes}    {no}", app.panel().noun());
        let p = Paragraph::new(body)
            .style(Style::default().fg(app.theme.text))
            .block(modal_block("Confirm delete", app));
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}
