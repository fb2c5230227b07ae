//! The record table for the active tab.
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::AppState;

pub fn render_table(f: &mut Frame, area: Rect, app: &AppState) {
    let panel = app.panel();
    let view = app.view();
    let (rows, total_pages) = app.visible_rows();
    let title = format!(
        "{} (page {}/{})",
        app.active_tab.label(),
        view.pager.page(),
        total_pages.max(1)
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if rows.is_empty() {
        let msg = if panel.loading() {
            "Loading...".to_string()
        } else if !view.filter.is_blank() {
            format!("No {} match '{}'.", app.active_tab.label().to_lowercase(), view.filter.query())
        } else {
            format!("No {} yet. Press n to add one.", app.active_tab.label().to_lowercase())
        };
        let p = Paragraph::new(msg).style(Style::default().fg(app.theme.muted)).block(block);
        f.render_widget(p, area);
        return;
    }

    let columns = panel.columns();
    let widths: Vec<Constraint> = columns.iter().map(|_| Constraint::Ratio(1, columns.len() as u32)).collect();
    let header = Row::new(columns.iter().copied()).style(
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    );
    let body = rows.into_iter().map(|r| {
        Row::new(r.cells.into_iter().map(Cell::from)).style(Style::default().fg(app.theme.text))
    });

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default().fg(app.theme.highlight_fg).bg(app.theme.highlight_bg).add_modifier(Modifier::BOLD),
        )
        .column_spacing(1);

    let mut state = TableState::default();
    state.select(Some(view.cursor));
    f.render_stateful_widget(table, area, &mut state);
}
