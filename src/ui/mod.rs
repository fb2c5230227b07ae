pub mod components;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use crate::app::{ActiveTab, AppState, InputMode, ModalState};
use crate::store::counts::CountKind;

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    render_tabs(f, root[0], app);
    render_summary(f, root[1], app);
    table::render_table(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    if let Some(state) = &app.modal {
        render_modal(f, f.area(), app, state);
    }
}

fn render_tabs(f: &mut Frame, area: Rect, app: &AppState) {
    let auth = &app.ctx.auth;
    let who = match auth.display_name() {
        Some(name) => name,
        None if auth.token().get().is_some() => "signed in".to_string(),
        None => "signed out".to_string(),
    };
    let titles: Vec<Line> = ActiveTab::ALL.iter().map(|t| Line::from(t.label())).collect();
    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .style(Style::default().fg(app.theme.text))
        .highlight_style(Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .title(format!("admin-console ({who})"))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(tabs, area);
}

/// Dashboard counts plus the live search prompt.
fn render_summary(f: &mut Frame, area: Rect, app: &AppState) {
    let counts = app.ctx.counts.snapshot();
    let mut spans = Vec::new();
    for kind in CountKind::ALL {
        let value = counts.get(kind).map(|n| n.to_string()).unwrap_or_else(|| "-".to_string());
        spans.push(Span::styled(format!("{}: ", kind.label()), Style::default().fg(app.theme.muted)));
        spans.push(Span::styled(format!("{value}  "), Style::default().fg(app.theme.header_fg)));
    }
    if let Some(err) = &counts.error {
        spans.push(Span::styled(err.clone(), Style::default().fg(app.theme.error)));
    }

    let query = app.view().filter.query();
    if app.input_mode == InputMode::Search || !query.is_empty() {
        spans.push(Span::styled("  Search: ", Style::default().fg(app.theme.muted)));
        spans.push(Span::styled(query.to_string(), Style::default().fg(app.theme.text)));
        if app.input_mode == InputMode::Search {
            spans.push(Span::styled("_", Style::default().fg(app.theme.highlight_fg)));
        }
    }

    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    match state {
        ModalState::Info { .. } => components::render_info_modal(f, area, app, state),
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
        ModalState::Details { .. } => components::render_details_modal(f, area, app, state),
        ModalState::Form { .. } => components::render_form_modal(f, area, app, state),
        ModalState::DeleteConfirm { .. } => components::render_delete_modal(f, area, app, state),
    }
}
