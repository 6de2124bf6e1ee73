mod fixture;
mod renderer;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use fixture::Fixture;
use ratatui::DefaultTerminal;
use segment::{
    Segment, SegmentOptions, StoredSpeakerHint, Word, build_segments, runtime_hints_from_storage,
};

#[derive(clap::Parser)]
#[command(name = "replay", about = "Replay a recorded session through the segmenter")]
struct Args {
    #[arg(short, long, default_value_t = Fixture::Standup)]
    fixture: Fixture,

    #[arg(short, long, default_value_t = 120)]
    speed: u64,
}

#[derive(serde::Deserialize)]
struct RecordedSession {
    num_speakers: Option<u32>,
    words: Vec<Word>,
    stored_hints: Vec<StoredSpeakerHint>,
}

/// How many of the most recently revealed words are treated as still
/// provisional, imitating a recognizer that finalizes a couple of words
/// behind the live edge.
const PARTIAL_TAIL: usize = 3;

struct App {
    words: Vec<Word>,
    stored_hints: Vec<StoredSpeakerHint>,
    options: SegmentOptions,
    position: usize,
    paused: bool,
    speed_ms: u64,
    fixture_name: String,
}

impl App {
    fn new(session: RecordedSession, speed_ms: u64, fixture_name: String) -> Self {
        Self {
            words: session.words,
            stored_hints: session.stored_hints,
            options: SegmentOptions {
                num_speakers: session.num_speakers,
                ..Default::default()
            },
            position: 0,
            paused: false,
            speed_ms,
            fixture_name,
        }
    }

    fn total(&self) -> usize {
        self.words.len()
    }

    fn seek_to(&mut self, target: usize) {
        self.position = target.min(self.total());
    }

    fn advance(&mut self) -> bool {
        if self.position >= self.total() {
            return false;
        }
        self.position += 1;
        true
    }

    fn is_done(&self) -> bool {
        self.position >= self.total()
    }

    /// Rebuild the full segment list for the current stream position.
    ///
    /// The whole pipeline reruns from scratch on every frame. That is the
    /// production calling pattern, and cheap enough that the replay does not
    /// bother caching.
    fn segments(&self) -> Vec<Segment> {
        let revealed = &self.words[..self.position];

        let partial_tail = if self.is_done() { 0 } else { PARTIAL_TAIL };
        let final_count = revealed.len().saturating_sub(partial_tail);
        let (final_words, in_flight) = revealed.split_at(final_count);

        // in-flight words have not been persisted yet, so no ids
        let partial_words: Vec<Word> = in_flight
            .iter()
            .map(|w| Word {
                id: None,
                ..w.clone()
            })
            .collect();

        let hints = runtime_hints_from_storage(&self.stored_hints, &self.word_index_by_id());
        build_segments(final_words, &partial_words, &hints, self.options)
    }

    fn word_index_by_id(&self) -> HashMap<String, usize> {
        self.words[..self.position]
            .iter()
            .enumerate()
            .filter_map(|(index, w)| w.id.clone().map(|id| (id, index)))
            .collect()
    }
}

fn main() {
    use clap::Parser;
    let args = Args::parse();
    let fixture = args.fixture;
    let speed_ms = args.speed;
    let fixture_name = fixture.to_string();

    let session: RecordedSession =
        serde_json::from_str(fixture.json()).expect("fixture must parse as a recorded session");

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, session, speed_ms, fixture_name.clone());
    ratatui::restore();

    match result {
        Ok(app) => {
            println!(
                "Done. {} segments from {} words ({} fixture).",
                app.segments().len(),
                app.total(),
                fixture_name,
            );
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    session: RecordedSession,
    speed_ms: u64,
    fixture_name: String,
) -> std::io::Result<App> {
    let mut app = App::new(session, speed_ms, fixture_name);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|frame| renderer::render(frame, &app))?;

        let tick_duration = Duration::from_millis(app.speed_ms);
        let elapsed = last_tick.elapsed();
        let timeout = tick_duration.saturating_sub(elapsed);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char(' ') => {
                        app.paused = !app.paused;
                        last_tick = Instant::now();
                    }
                    KeyCode::Right => {
                        app.seek_to(app.position + 1);
                    }
                    KeyCode::Left => {
                        app.seek_to(app.position.saturating_sub(1));
                    }
                    KeyCode::Up => {
                        app.speed_ms = app.speed_ms.saturating_sub(10).max(5);
                    }
                    KeyCode::Down => {
                        app.speed_ms += 10;
                    }
                    KeyCode::Home => {
                        app.seek_to(0);
                    }
                    KeyCode::End => {
                        let total = app.total();
                        app.seek_to(total);
                    }
                    _ => {}
                }
            }
        } else if !app.paused {
            if last_tick.elapsed() >= tick_duration {
                app.advance();
                last_tick = Instant::now();

                if app.is_done() {
                    terminal.draw(|frame| renderer::render(frame, &app))?;
                    app.paused = true;
                }
            }
        }
    }

    Ok(app)
}
