//! Main TUI application state and logic

use crate::engine::step::MicroStep;
use crate::replay::store::VisualizerState;
use crate::replay::{Replayer, BASE_SPEED_MS};
use crate::ui::theme::DEFAULT_THEME;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::io;
use std::time::{Duration, Instant};

const MIN_SPEED_MS: u64 = 100;
const MAX_SPEED_MS: u64 = 2000;
const SPEED_STEP_MS: u64 = 100;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Console,
    Stack,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> console -> stack)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Console,
            FocusedPane::Console => FocusedPane::Stack,
            FocusedPane::Stack => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    /// Drains generated steps into the visualizer state
    pub replayer: Replayer,

    /// Presentation state every pane renders from
    pub state: VisualizerState,

    /// The source code being visualized
    pub source_code: String,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub console_scroll: usize,

    /// Target visual row for the current line (None = not initialized yet)
    /// This keeps the highlighted line at a fixed position when stepping
    pub target_line_row: Option<usize>,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Replay speed: sleep baseline per step (500 = 1x)
    pub speed_ms: u64,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app for a generated step sequence
    pub fn new(steps: Vec<MicroStep>, source_code: String) -> Self {
        let replayer = Replayer::new(steps);
        let status_message = if replayer.is_empty() {
            String::from("Nothing to replay")
        } else {
            String::from("Ready!")
        };
        App {
            replayer,
            state: VisualizerState::new(),
            source_code,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            console_scroll: 0,
            target_line_row: None, // Will be set to center on first render
            should_quit: false,
            status_message,
            speed_ms: BASE_SPEED_MS,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode: the pace comes from the upcoming step's
            // nominal duration scaled by the speed setting
            if self.is_playing {
                if self.last_play_time.elapsed() >= self.current_pace() {
                    if self.replayer.advance(&mut self.state).is_some() {
                        self.status_message = "Playing...".to_string();
                        self.console_scroll = usize::MAX;
                    } else {
                        self.is_playing = false;
                        self.status_message = "Playback complete".to_string();
                    }
                    self.last_play_time = Instant::now();
                }
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Delay before the next auto-play step
    fn current_pace(&self) -> Duration {
        let nominal = self
            .replayer
            .peek()
            .map(|step| step.duration_ms())
            .unwrap_or(BASE_SPEED_MS);
        Duration::from_millis(nominal * self.speed_ms / BASE_SPEED_MS)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Layout: panes above, one-row status bar below
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Split into 2 columns
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(pane_area);

        // Left column: Source (top) | Console (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Call Stack | Web APIs | Microtask | Task | RAF
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(24),
                Constraint::Percentage(22),
                Constraint::Percentage(18),
                Constraint::Percentage(18),
                Constraint::Percentage(18),
            ])
            .split(columns[1]);

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            self.state.highlighted_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
            &mut self.target_line_row,
        );

        super::panes::render_console_pane(
            frame,
            left_rows[1],
            &self.state.console,
            self.focused_pane == FocusedPane::Console,
            &mut self.console_scroll,
        );

        super::panes::render_stack_pane(
            frame,
            right_rows[0],
            &self.state.call_stack,
            self.focused_pane == FocusedPane::Stack,
        );

        super::panes::render_webapi_pane(frame, right_rows[1], &self.state.web_apis, false);

        super::panes::render_queue_pane(
            frame,
            right_rows[2],
            " Microtask Queue ",
            &self.state.microtask_queue,
            DEFAULT_THEME.microtask,
            false,
        );

        super::panes::render_queue_pane(
            frame,
            right_rows[3],
            " Task Queue ",
            &self.state.task_queue,
            DEFAULT_THEME.task,
            false,
        );

        super::panes::render_queue_pane(
            frame,
            right_rows[4],
            " RAF Queue ",
            &self.state.raf_queue,
            DEFAULT_THEME.success,
            false,
        );

        super::panes::render_status_bar(
            frame,
            status_area,
            &self.status_message,
            self.replayer.position(),
            self.replayer.len(),
            self.speed_ms,
            self.is_playing,
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.target_line_row {
                        self.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Console => {
                    self.console_scroll = self.console_scroll.saturating_sub(1);
                }
                FocusedPane::Stack => {}
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.target_line_row {
                        self.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Console => {
                    self.console_scroll = self.console_scroll.saturating_add(1);
                }
                FocusedPane::Stack => {}
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    if self.is_playing {
                        self.last_play_time = Instant::now()
                            .checked_sub(Duration::from_secs(1))
                            .unwrap_or(Instant::now());
                        self.status_message = "Playing...".to_string();
                    } else {
                        self.status_message = "Paused".to_string();
                    }
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                // A shorter baseline plays faster
                self.speed_ms = self.speed_ms.saturating_sub(SPEED_STEP_MS).max(MIN_SPEED_MS);
                self.status_message = format!("Speed: {}ms per step", self.speed_ms);
            }
            KeyCode::Char('-') => {
                self.speed_ms = (self.speed_ms + SPEED_STEP_MS).min(MAX_SPEED_MS);
                self.status_message = format!("Speed: {}ms per step", self.speed_ms);
            }
            KeyCode::Enter => {
                // Jump to the end of the sequence
                self.is_playing = false;
                while self.replayer.advance(&mut self.state).is_some() {}
                self.status_message = "Jumped to end".to_string();
                self.console_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                // Restart from a clean slate
                self.is_playing = false;
                self.replayer.restart(&mut self.state);
                self.status_message = "Restarted".to_string();
                self.console_scroll = 0;
            }
            _ => {}
        }
    }

    /// Step forward one micro-step
    fn step_forward(&mut self) {
        if self.replayer.advance(&mut self.state).is_some() {
            self.status_message = "Stepped forward".to_string();
            self.console_scroll = usize::MAX;
        } else {
            self.status_message = "At end of sequence".to_string();
        }
    }

    /// Step backward by replaying from the start. Generation is
    /// deterministic, so re-draining `n - 1` steps lands exactly one step
    /// back.
    fn step_backward(&mut self) {
        let position = self.replayer.position();
        if position == 0 {
            self.status_message = "At start of sequence".to_string();
            return;
        }
        self.replayer.restart(&mut self.state);
        for _ in 0..position - 1 {
            self.replayer.advance(&mut self.state);
        }
        self.status_message = "Stepped backward".to_string();
        self.console_scroll = usize::MAX;
    }
}
