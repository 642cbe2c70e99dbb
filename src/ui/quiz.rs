use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::NormalizedQuestion;
use crate::store::Storage;

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let store = app.store();
    let Some(question) = store.current_question() else {
        let waiting = Paragraph::new("No questions loaded")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(waiting, area);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_header(frame, chunks[0], store.player_name(), question, store.elapsed());
    render_progress(frame, chunks[1], store.current_index(), store.questions().len());
    render_question_text(frame, chunks[3], store.current_index(), &question.question);
    render_options(frame, chunks[4], question, store.displayed_answer(), app.cursor());

    if app.is_confirming_submit() {
        render_confirmation(frame, chunks[5], store.answered_count(), store.questions().len());
    } else if let Some(notice) = app.notice() {
        let widget = Paragraph::new(notice.to_string())
            .alignment(Alignment::Center)
            .fg(Color::Red);
        frame.render_widget(widget, chunks[5]);
    }
    render_controls(frame, chunks[6]);
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    player: &str,
    question: &NormalizedQuestion,
    elapsed: Option<chrono::Duration>,
) {
    let line = Line::from(vec![
        Span::styled("Player: ", Style::default().fg(Color::DarkGray)),
        Span::styled(player.to_string(), Style::default().fg(Color::Green).bold()),
        Span::styled(
            format!("   {} · {}", question.category, question.difficulty.label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if let Some(elapsed) = elapsed {
        let timer = Paragraph::new(format_clock(elapsed))
            .alignment(Alignment::Right)
            .fg(Color::Yellow);
        frame.render_widget(timer, area);
    }
}

fn format_clock(elapsed: chrono::Duration) -> String {
    let seconds = elapsed.num_seconds().max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn render_progress(frame: &mut Frame, area: Rect, current: usize, total: usize) {
    let ratio = if total > 0 {
        (current + 1) as f64 / total as f64
    } else {
        0.0
    };
    let widget = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .label(format!("{}/{}", current + 1, total))
        .ratio(ratio.clamp(0.0, 1.0));
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, index: usize, text: &str) {
    let line = Line::from(vec![
        Span::styled(
            format!("Question {}: ", index + 1),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::styled(text.to_string(), Style::default().fg(Color::White).bold()),
    ]);
    let widget = Paragraph::new(line).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    question: &NormalizedQuestion,
    chosen: Option<&str>,
    cursor: usize,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.all_answers.len() * 2);

    for (index, option) in question.all_answers.iter().enumerate() {
        let is_cursor = index == cursor;
        let is_chosen = chosen == Some(option.as_str());
        let style = match (is_chosen, is_cursor) {
            (true, _) => Style::default().fg(Color::Green).bold(),
            (false, true) => Style::default().fg(Color::Cyan).bold(),
            (false, false) => Style::default().fg(Color::Gray),
        };
        let marker = if is_cursor { ">" } else { " " };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');
        let check = if is_chosen { "  ✓" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
            Span::styled(check, style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_confirmation(frame: &mut Frame, area: Rect, answered: usize, total: usize) {
    let text = if answered < total {
        format!(
            "Submit with {} of {} answered? unanswered questions count as wrong  (y/n)",
            answered, total
        )
    } else {
        "You've reached the end of the quiz. Submit your answers? (y/n)".to_string()
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::Yellow)
        .bold();
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(
        "j/k move  ·  enter answer  ·  ←/→ previous/next  ·  s submit  ·  esc leave",
    )
    .alignment(Alignment::Center)
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(chrono::Duration::zero()), "0:00");
        assert_eq!(format_clock(chrono::Duration::seconds(65)), "1:05");
        assert_eq!(format_clock(chrono::Duration::milliseconds(-300)), "0:00");
    }
}
