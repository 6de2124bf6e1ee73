use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use segment::{Channel, ChunkOptions, Segment, SpeakerIdentity, split_into_segments};

use crate::App;

const STATS_PANEL_WIDTH: u16 = 28;

pub fn render(frame: &mut Frame, app: &App) {
    let [header_area, body_area, timeline_area, hint_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let [transcript_area, stats_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(STATS_PANEL_WIDTH)])
            .areas(body_area);

    let segments = app.segments();

    render_header(frame, app, header_area);
    render_transcript(frame, &segments, transcript_area);
    render_stats(frame, &segments, stats_area);
    render_timeline(frame, app, timeline_area);
    render_hints(frame, hint_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let status = if app.paused {
        "⏸ PAUSED"
    } else {
        "▶ PLAYING"
    };
    let text = format!(
        " {} | {} | {}ms/word ",
        app.fixture_name, status, app.speed_ms
    );
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_transcript(frame: &mut Frame, segments: &[Segment], area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for segment in segments {
        lines.push(Line::from(Span::styled(
            speaker_label(segment),
            Style::default()
                .fg(speaker_color(segment))
                .add_modifier(Modifier::BOLD),
        )));

        for chunk in split_into_segments(&segment.words, ChunkOptions::default()) {
            let mut spans: Vec<Span> = vec![Span::raw("  ")];
            for word in &chunk {
                let style = if word.is_final {
                    Style::default()
                } else {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC)
                };
                spans.push(Span::styled(format!("{} ", word.text.trim()), style));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::raw(""));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::default())
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_stats(frame: &mut Frame, segments: &[Segment], area: Rect) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " segments ",
            Style::default().fg(Color::DarkGray),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let word_count: usize = segments.iter().map(|s| s.words.len()).sum();
    let partial_count: usize = segments
        .iter()
        .flat_map(|s| &s.words)
        .filter(|w| !w.is_final)
        .count();
    let identified = segments
        .iter()
        .filter(|s| !s.key.is_anonymous())
        .count();

    let mut lines = vec![
        stat_line("segments", segments.len()),
        stat_line("identified", identified),
        stat_line("words", word_count),
        stat_line("partials", partial_count),
        Line::raw(""),
    ];

    for segment in segments {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<10}", speaker_label(segment)),
                Style::default().fg(speaker_color(segment)),
            ),
            Span::styled(
                format!("{:>5}ms", segment.start_ms()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn stat_line(label: &str, value: usize) -> Line<'_> {
    Line::from(vec![
        Span::styled(format!("{label} "), Style::default().fg(Color::DarkGray)),
        Span::raw(value.to_string()),
    ])
}

fn render_timeline(frame: &mut Frame, app: &App, area: Rect) {
    let total = app.total();
    let ratio = if total == 0 {
        0.0
    } else {
        app.position as f64 / total as f64
    };
    let label = format!("{}/{}", app.position, total);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::White).bg(Color::DarkGray))
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new(
            " [Space] pause/resume  [←/→] seek  [↑/↓] speed  [Home/End] jump  [q] quit ",
        )
        .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn speaker_label(segment: &Segment) -> String {
    match &segment.key.speaker {
        SpeakerIdentity::Named { human_id } | SpeakerIdentity::Known { human_id, .. } => {
            human_id.clone()
        }
        SpeakerIdentity::Indexed { speaker_index } => format!("Speaker {speaker_index}"),
        SpeakerIdentity::Anonymous => match segment.key.channel {
            Channel::DirectMic => "Mic".to_string(),
            Channel::RemoteParty => "Remote".to_string(),
            Channel::Mixed => "Mixed".to_string(),
        },
    }
}

fn speaker_color(segment: &Segment) -> Color {
    if segment.key.is_anonymous() {
        return Color::DarkGray;
    }
    match segment.key.channel {
        Channel::DirectMic => Color::Cyan,
        Channel::RemoteParty => Color::Green,
        Channel::Mixed => Color::Yellow,
    }
}
