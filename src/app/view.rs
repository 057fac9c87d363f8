//! UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use crate::game::{format_segment, GamePhase, GameState, SegmentSchedule};

use super::{Focus, UiState};

const HELP: &str = " Enter guess/search | Tab switch field | ^N unlock | ^P replay | ^R new song | ^L liked songs | Esc quit ";

pub fn render(frame: &mut Frame, state: &GameState, schedule: &SegmentSchedule, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Search
            Constraint::Length(3), // Segments
            Constraint::Length(3), // Guess
            Constraint::Min(3),    // Track / result
            Constraint::Length(4), // Notice
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    render_title(frame, chunks[0], ui);
    render_input(frame, chunks[1], " Search ", &ui.search_query, "Type to search...", ui.focus == Focus::Search);
    render_segments(frame, chunks[2], state, schedule);
    render_input(
        frame,
        chunks[3],
        " Your guess ",
        state.guess_text(),
        "Type the song title...",
        ui.focus == Focus::Guess && !state.is_won(),
    );
    render_track(frame, chunks[4], state);
    render_banner(frame, chunks[5], ui);

    let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[6]);
}

fn render_title(frame: &mut Frame, area: Rect, ui: &UiState) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            "🎵 Song Guesser ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Unlock segments of the song and guess the title in the fewest attempts!",
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title_bottom(Line::from(format!(" {} ", ui.source_label)).right_aligned()),
    );
    frame.render_widget(title, area);
}

fn render_input(frame: &mut Frame, area: Rect, title: &str, value: &str, placeholder: &str, focused: bool) {
    let (text, text_style) = if value.is_empty() {
        (placeholder, Style::default().fg(Color::DarkGray))
    } else {
        (value, Style::default().fg(Color::White))
    };
    let border_style = if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let input = Paragraph::new(text).style(text_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(border_style),
    );
    frame.render_widget(input, area);
}

fn render_segments(frame: &mut Frame, area: Rect, state: &GameState, schedule: &SegmentSchedule) {
    let unlocked = state.unlocked_segment();
    let mut spans = Vec::with_capacity(schedule.len() * 2);

    for (index, segment) in schedule.iter().enumerate() {
        let style = match unlocked {
            Some(top) if index == top => Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD),
            Some(top) if index < top => Style::default().fg(Color::Green),
            _ => Style::default().fg(Color::DarkGray),
        };
        spans.push(Span::styled(format!(" {} ", format_segment(segment)), style));
        spans.push(Span::raw(" "));
    }

    let status = if state.is_playing() { "▶ Playing" } else { "⏸ Stopped" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Segments | Attempts: {} ", state.attempts()))
        .title_bottom(Line::from(format!(" {} ", status)).right_aligned());

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_track(frame: &mut Frame, area: Rect, state: &GameState) {
    let block = Block::default().borders(Borders::ALL).title(" Track ");

    let lines = match (state.phase(), state.current_track()) {
        (GamePhase::NoTrack, _) | (_, None) => vec![Line::from(Span::styled(
            "No track loaded. Load liked songs (^L) or search.",
            Style::default().fg(Color::DarkGray),
        ))],
        (GamePhase::Won, Some(track)) => vec![
            Line::from(Span::styled(
                format!("🏆 {}", track.title),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("by {}", track.artist_line())),
            Line::from(Span::styled(
                format!("Guessed in {} attempts. Press ^R for a new song.", state.attempts()),
                Style::default().fg(Color::Gray),
            )),
        ],
        (GamePhase::Ready, Some(_)) => vec![Line::from("Mystery track ready. Press ^N to hear the first segment.")],
        (GamePhase::Unlocking, Some(_)) => vec![Line::from(
            "Mystery track. Replay with ^P or unlock more with ^N.",
        )],
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
}

fn render_banner(frame: &mut Frame, area: Rect, ui: &UiState) {
    let Some(banner) = &ui.banner else {
        frame.render_widget(Block::default().borders(Borders::ALL).title(" Notices "), area);
        return;
    };

    let color = if banner.is_error { Color::Red } else { Color::Cyan };
    let widget = Paragraph::new(vec![
        Line::from(Span::styled(
            banner.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(banner.detail.clone()),
    ])
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(" Notices (Esc to dismiss) "),
    );
    frame.render_widget(widget, area);
}
