use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::{App, Field};
use crate::models::category_name;
use crate::store::Storage;

pub fn render<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(17),
        Constraint::Fill(1),
    ])
    .split(area);
    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(60),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "TRIVIA QUIZ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("Questions from the Open Trivia Database".fg(Color::DarkGray)),
        Line::from(""),
    ];

    let name = format!("{}_", app.name_input());
    content.push(field_line("Your name", &name, app.focus() == Field::Name));

    let params = app.params();
    content.push(field_line(
        "Questions",
        &params.amount.to_string(),
        app.focus() == Field::Amount,
    ));
    content.push(field_line(
        "Category",
        params
            .category
            .and_then(category_name)
            .unwrap_or("Any Category"),
        app.focus() == Field::Category,
    ));
    content.push(field_line(
        "Difficulty",
        params.difficulty.map_or("Any Difficulty", |d| d.label()),
        app.focus() == Field::Difficulty,
    ));
    content.push(field_line(
        "Type",
        params.question_type.map_or("Any Type", |t| t.label()),
        app.focus() == Field::QuestionType,
    ));
    content.push(Line::from(""));

    if app.has_saved_progress() {
        let style = if app.focus() == Field::Continue {
            Style::default().fg(Color::Green).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        content.push(Line::from(Span::styled(
            "[ Continue Previous Quiz ]",
            style,
        )));
    } else {
        content.push(Line::from(""));
    }

    content.push(Line::from(""));
    match app.notice() {
        Some(notice) => content.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Red),
        ))),
        None => content.push(Line::from("")),
    }
    content.push(Line::from(""));
    content.push(Line::from(
        "tab move  ·  ←/→ change  ·  enter start  ·  esc quit".fg(Color::DarkGray),
    ));

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, columns[1]);
}

fn field_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
    let marker = if focused { "> " } else { "  " };
    let value_style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::White)
    };

    Line::from(vec![
        Span::styled(marker, value_style),
        Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value.to_string(), value_style),
    ])
}
