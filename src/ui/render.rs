use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use super::app::{App, InputMode};
use crate::db::storage::KeyValueStorage;
use crate::form::FormField;
use crate::view::format_total;

pub fn render_form<S: KeyValueStorage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let editing = app.input_mode == InputMode::Form;

    let lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|&field| {
            let focused = editing && app.form.focus == field;
            let label_style = if focused {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let value = app.form.value(field);
            let value_span = if value.is_empty() {
                Span::styled(placeholder(field), Style::default().fg(Color::DarkGray))
            } else {
                Span::raw(value)
            };
            let cursor = if focused { "_" } else { "" };

            Line::from(vec![
                Span::styled(format!("{:<10}", field.label()), label_style),
                value_span,
                Span::styled(cursor, Style::default().fg(Color::Yellow)),
            ])
        })
        .collect();

    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(" New expense ")
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    f.render_widget(form, area);
}

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::Date => "YYYY-MM-DD (Ctrl-T for today)",
        FormField::Category => "free text, → for existing",
        FormField::Amount => "0",
        FormField::Memo => "",
    }
}

pub fn render_filter<S: KeyValueStorage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let mut spans = vec![Span::raw("Filter: ")];
    spans.push(Span::styled(
        app.filter.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));

    let options = app.category_options();
    if !options.is_empty() {
        spans.push(Span::styled(
            format!("  (All, {})", options.join(", ")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_expense_list<S: KeyValueStorage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let visible = app.visible();
    let header = format!(
        "Expenses (Total: {}{})",
        format_total(app.total()),
        app.currency_suffix
    );
    let block = Block::default().title(header).borders(Borders::ALL);

    if visible.is_empty() {
        let empty = Paragraph::new("No matching expenses.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|e| e.to_list_item(&app.currency_suffix))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default()
            .add_modifier(Modifier::REVERSED)
            .add_modifier(Modifier::BOLD))
        .highlight_symbol("➤ ");

    f.render_stateful_widget(list, area, &mut app.list_state.clone());
}

pub fn render_help_panel<S: KeyValueStorage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let line = match app.input_mode {
        InputMode::Normal => Line::from(vec![
            key("a"),
            Span::raw(" Add • "),
            key("↑/↓"),
            Span::raw(" Move • "),
            key("d"),
            Span::raw(" Delete • "),
            key("f/F"),
            Span::raw(" Filter • "),
            key("x"),
            Span::raw(" Export • "),
            key("q"),
            Span::raw(" Quit"),
        ]),
        InputMode::Form => Line::from(vec![
            key("Tab/↑/↓"),
            Span::raw(" Field • "),
            key("→"),
            Span::raw(" Category • "),
            key("Ctrl-T"),
            Span::raw(" Today • "),
            key("Enter"),
            Span::raw(" Add • "),
            key("Esc"),
            Span::raw(" Back"),
        ]),
    };

    let help = Paragraph::new(line)
        .block(Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Help "))
        .alignment(Alignment::Center);

    f.render_widget(help, area);
}

pub fn render_status<S: KeyValueStorage>(f: &mut Frame, app: &App<S>, area: Rect) {
    if let Some(status) = &app.status {
        let status = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Cyan));
        f.render_widget(status, area);
    }
}
