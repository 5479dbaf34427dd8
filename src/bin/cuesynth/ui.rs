//! Status line, cue list and help bar.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use cuesynth::{cues::CueKind, output::ContextState};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Status
            Constraint::Min(6),    // Cue list
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_status(frame, chunks[0], app);
    render_cues(frame, chunks[1], app);

    let help = Paragraph::new(
        " [↑↓/jk] Select  [Enter/Space] Play  [M] Mute  [+/-] Volume  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let engine = &app.engine;

    let (state, color) = if engine.is_unavailable() {
        ("Unavailable", Color::Red)
    } else {
        match engine.context_state() {
            None => ("Press any key", Color::Yellow),
            Some(ContextState::Suspended) => ("Suspended", Color::Yellow),
            Some(ContextState::Running) if engine.is_enabled() => ("Running", Color::Green),
            Some(ContextState::Running) => ("Muted", Color::DarkGray),
            Some(ContextState::Closed) => ("Closed", Color::Red),
        }
    };

    let last = match app.last_cue {
        Some((kind, true)) => kind.name().to_string(),
        Some((kind, false)) => format!("{} (skipped)", kind.name()),
        None => "-".to_string(),
    };

    let line = Line::from(vec![
        Span::styled(format!(" {state}  "), Style::default().fg(color)),
        Span::styled(
            format!("Vol: {:>3.0}%  ", engine.master_volume() * 100.0),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(format!(
            "Voices: {}  Pending: {}  ",
            engine.voices_started(),
            engine.pending()
        )),
        Span::styled(format!("Last: {last}"), Style::default().fg(Color::Magenta)),
    ]);

    let status = Paragraph::new(line).block(Block::default().title(" cuesynth ").borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn render_cues(frame: &mut Frame, area: Rect, app: &mut App) {
    let items: Vec<ListItem> = CueKind::ALL
        .iter()
        .map(|&kind| {
            let mut spans = vec![Span::raw(kind.name())];
            if let Some(arg) = app.argument(kind) {
                spans.push(Span::styled(
                    format!("  ({arg})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Cues ").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}
