use chrono::{DateTime, Utc};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph},
};

use crate::app::{App, HISTORY_PREVIEW};
use crate::models::QuizResult;
use crate::store::Storage;

pub fn render<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let Some(result) = app.store().last_result() else {
        return;
    };
    let percentage = result.percentage();
    let grade_color = get_grade_color(percentage);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], result, percentage, grade_color);
    render_score_bar(frame, chunks[2], percentage, grade_color);
    render_details(frame, chunks[3], result, percentage);

    let previous: Vec<&QuizResult> = app.store().recent_history(HISTORY_PREVIEW).collect();
    if app.store().history().len() > 1 {
        render_history(frame, chunks[4], &previous, app.history_scroll());
    }
    render_controls(frame, chunks[5]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn performance_message(percentage: f64) -> &'static str {
    match percentage.round() as u32 {
        90.. => "Excellent! You're a trivia master!",
        70..=89 => "Great job! You know your stuff!",
        50..=69 => "Good effort! Keep practicing!",
        _ => "Keep learning! You'll do better next time!",
    }
}

fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}m {}s", total / 60, total % 60)
}

fn format_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(date);
    let (value, unit) = if elapsed.num_days() > 0 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_hours() > 0 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() > 0 {
        (elapsed.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };
    let plural = if value == 1 { "" } else { "s" };
    format!("{} {}{} ago", value, unit, plural)
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    result: &QuizResult,
    percentage: f64,
    grade_color: Color,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{}'s SCORE", result.player_name.to_uppercase()),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({:.0}%)", result.score, result.total_questions, percentage),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_score_bar(frame: &mut Frame, area: Rect, percentage: f64, grade_color: Color) {
    let widget = Gauge::default()
        .gauge_style(Style::default().fg(grade_color).bg(Color::Black))
        .label("")
        .ratio((percentage / 100.0).clamp(0.0, 1.0));
    frame.render_widget(widget, area);
}

fn render_details(frame: &mut Frame, area: Rect, result: &QuizResult, percentage: f64) {
    let content = vec![
        Line::from(""),
        Line::from(performance_message(percentage).fg(Color::White).bold()),
        Line::from(Span::styled(
            format!("Time taken: {}", format_time(result.time_taken)),
            Style::default().fg(Color::Gray),
        )),
    ];
    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_history(frame: &mut Frame, area: Rect, results: &[&QuizResult], scroll: usize) {
    let now = Utc::now();
    let lines: Vec<Line> = results
        .iter()
        .map(|result| {
            Line::from(vec![
                Span::styled(
                    format!("{:<16}", format_ago(result.date, now)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!(
                        "{}/{} ({:.0}%)",
                        result.score,
                        result.total_questions,
                        result.percentage()
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Previous Quizzes ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        )
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r new quiz  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
