//! TUI (Terminal User Interface) front end
//!
//! Renders the clue board and the candidate list with Ratatui and reads keys
//! with crossterm.
//!
//! # State Machine
//! - `MarkingFeedback` → `ConfirmingFeedback` → (clue recorded) → `Choosing`
//!   → `MarkingFeedback` for the chosen word
//! - `GameOver` once the game loop reports an outcome

use crate::constraints::ClueHistory;
use crate::feedback::{FormatError, Verdict};
use crate::game_state::{FeedbackInput, GameInterface, GameOutcome, SessionConfig, UserAction};
use crate::word::Word;
use crate::{debug_log, info_log};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;
use std::time::Duration;

const EVENT_POLL_TIMEOUT_MS: u64 = 100;
const ROW_SPACING: u16 = 2;
const CANDIDATE_COLUMNS: usize = 5;
const MAX_SELECTION_INPUT: usize = 16;

const HEADER_STYLE: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const ERROR_STYLE: Style = Style::new().fg(Color::Red);
const SUCCESS_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
const INFO_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const MESSAGE_STYLE: Style = Style::new().fg(Color::Cyan);
const SELECTED_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);

#[derive(Clone, Copy, PartialEq, Debug)]
enum LetterState {
    Entered,
    Marked(Verdict),
}

impl LetterState {
    fn colors(self) -> (Color, Color) {
        match self {
            Self::Entered => (Color::DarkGray, Color::White),
            Self::Marked(Verdict::Correct) => (Color::Green, Color::Black),
            Self::Marked(Verdict::Present) => (Color::Yellow, Color::Black),
            Self::Marked(Verdict::Absent) => (Color::Gray, Color::White),
        }
    }
}

#[derive(Debug)]
struct GuessRow {
    letters: Vec<char>,
    states: Vec<LetterState>,
}

impl GuessRow {
    fn from_guess(guess: &Word) -> Self {
        Self {
            letters: guess.as_str().chars().map(|c| c.to_ascii_uppercase()).collect(),
            states: vec![LetterState::Entered; guess.len()],
        }
    }

    fn verdicts(&self) -> Option<Vec<Verdict>> {
        self.states
            .iter()
            .map(|state| match state {
                LetterState::Marked(verdict) => Some(*verdict),
                LetterState::Entered => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TuiState {
    Idle,
    MarkingFeedback { marking_index: usize },
    ConfirmingFeedback,
    Choosing,
    GameOver,
}

/// What a key press asks the surrounding read loop to do.
enum KeyOutcome<T> {
    Continue,
    Done(T),
}

/// Full-screen front end. Restores the terminal when dropped.
pub struct TuiInterface {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    rows: Vec<GuessRow>,
    state: TuiState,
    candidates: Vec<String>,
    total: usize,
    selected: usize,
    selection_input: String,
    max_guesses: usize,
    message: String,
    error_message: String,
    status: String,
    restore: RestoreState,
}

/// Whether the terminal has already been handed back to the shell.
#[derive(Debug, Default)]
struct RestoreState {
    restored: bool,
}

impl RestoreState {
    /// True on the first call only.
    fn claim(&mut self) -> bool {
        !std::mem::replace(&mut self.restored, true)
    }
}

impl TuiInterface {
    /// # Errors
    /// Returns an error if the terminal cannot be switched to raw mode.
    pub fn new() -> Result<Self, io::Error> {
        info_log!("TuiInterface::new() - Initializing TUI");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        info_log!("Terminal backend created");

        Ok(Self {
            terminal,
            rows: Vec::new(),
            state: TuiState::Idle,
            candidates: Vec::new(),
            total: 0,
            selected: 0,
            selection_input: String::new(),
            max_guesses: 0,
            message: String::new(),
            error_message: String::new(),
            status: "Ready".to_string(),
            restore: RestoreState::default(),
        })
    }

    /// Safe to call more than once; only the first call touches the terminal.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be restored.
    pub fn cleanup(&mut self) -> Result<(), io::Error> {
        if !self.restore.claim() {
            return Ok(());
        }
        info_log!("Restoring terminal");
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            cursor::Show
        )?;
        Ok(())
    }

    fn draw(&mut self) -> Result<(), io::Error> {
        let rows = &self.rows;
        let state = self.state;
        let max_guesses = self.max_guesses;
        let status = &self.status;
        let panel = InfoPanel {
            candidates: &self.candidates,
            total: self.total,
            selected: self.selected,
            selection_input: &self.selection_input,
            choosing: state == TuiState::Choosing,
            message: &self.message,
            error_message: &self.error_message,
        };

        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),  // Title
                    Constraint::Length(14), // Board
                    Constraint::Min(8),     // Candidates and messages
                    Constraint::Length(3),  // Status line
                    Constraint::Length(3),  // Instructions
                ])
                .split(f.area());

            render_title(f, chunks[0], rows.len(), max_guesses);
            render_board(f, chunks[1], rows, state);
            render_info(f, chunks[2], &panel);
            render_status(f, chunks[3], status);
            render_instructions(f, chunks[4], state);
        })?;
        Ok(())
    }

    fn draw_or_log(&mut self) {
        if let Err(e) = self.draw() {
            debug_log!("Draw error: {}", e);
        }
    }

    /// Blocks until a key press arrives. Non-key events and stray control
    /// characters from focus changes are skipped.
    fn next_key() -> Result<KeyEvent, io::Error> {
        loop {
            if !event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let KeyCode::Char(c) = key.code
                        && (c == '\u{FFFD}' || c.is_control())
                    {
                        debug_log!("next_key() - Ignoring control character {:?}", c);
                        continue;
                    }
                    return Ok(key);
                }
                other => {
                    debug_log!("next_key() - Ignoring event {:?}", other);
                }
            }
        }
    }

    /// Draws, then feeds keys to `handle` until it finishes. Terminal errors
    /// end the read with `on_error`.
    fn read_with<T>(
        &mut self,
        on_error: T,
        mut handle: impl FnMut(&mut Self, KeyEvent) -> KeyOutcome<T>,
    ) -> T {
        loop {
            self.draw_or_log();
            let key = match Self::next_key() {
                Ok(key) => key,
                Err(e) => {
                    debug_log!("read_with() - Input error: {}", e);
                    return on_error;
                }
            };
            if has_modifier_keys(&key) {
                continue;
            }
            if let KeyOutcome::Done(result) = handle(self, key) {
                return result;
            }
        }
    }

    fn handle_feedback_key(&mut self, key: KeyEvent) -> KeyOutcome<FeedbackInput> {
        self.error_message.clear();
        let Some(row) = self.rows.last_mut() else {
            return KeyOutcome::Done(FeedbackInput::Exit);
        };
        let width = row.letters.len();

        if key.code == KeyCode::Esc {
            info_log!("handle_feedback_key() - ESC pressed, returning Exit");
            return KeyOutcome::Done(FeedbackInput::Exit);
        }

        match self.state {
            TuiState::MarkingFeedback { marking_index } => {
                let verdict = match key.code {
                    KeyCode::Char(c) => Verdict::from_symbol(c.to_ascii_uppercase()),
                    KeyCode::Backspace if marking_index > 0 => {
                        row.states[marking_index - 1] = LetterState::Entered;
                        self.state = TuiState::MarkingFeedback {
                            marking_index: marking_index - 1,
                        };
                        return KeyOutcome::Continue;
                    }
                    _ => return KeyOutcome::Continue,
                };
                match verdict {
                    Some(verdict) => {
                        row.states[marking_index] = LetterState::Marked(verdict);
                        self.state = if marking_index + 1 < width {
                            TuiState::MarkingFeedback {
                                marking_index: marking_index + 1,
                            }
                        } else {
                            self.status = "Press ENTER to confirm feedback".to_string();
                            TuiState::ConfirmingFeedback
                        };
                    }
                    None => {
                        self.error_message =
                            "Use G (green), Y (yellow) or X (gray) for each letter".to_string();
                    }
                }
                KeyOutcome::Continue
            }
            TuiState::ConfirmingFeedback => match key.code {
                KeyCode::Enter => match row.verdicts() {
                    Some(verdicts) => {
                        info_log!("handle_feedback_key() - Feedback confirmed");
                        self.state = TuiState::Idle;
                        KeyOutcome::Done(FeedbackInput::Verdicts(verdicts))
                    }
                    None => KeyOutcome::Continue,
                },
                KeyCode::Backspace => {
                    row.states[width - 1] = LetterState::Entered;
                    self.state = TuiState::MarkingFeedback {
                        marking_index: width - 1,
                    };
                    KeyOutcome::Continue
                }
                _ => KeyOutcome::Continue,
            },
            _ => KeyOutcome::Continue,
        }
    }

    fn handle_selection_key(
        &mut self,
        key: KeyEvent,
        sample: &[&Word],
        word_length: usize,
    ) -> KeyOutcome<Option<UserAction>> {
        self.error_message.clear();
        match key.code {
            KeyCode::Esc => KeyOutcome::Done(Some(UserAction::Exit)),
            KeyCode::Up | KeyCode::Left => {
                self.selected = self.selected.saturating_sub(1);
                KeyOutcome::Continue
            }
            KeyCode::Down | KeyCode::Right => {
                if self.selected + 1 < sample.len() {
                    self.selected += 1;
                }
                KeyOutcome::Continue
            }
            KeyCode::Backspace => {
                self.selection_input.pop();
                KeyOutcome::Continue
            }
            KeyCode::Char(c)
                if c.is_ascii_alphanumeric() && self.selection_input.len() < MAX_SELECTION_INPUT =>
            {
                self.selection_input.push(c.to_ascii_lowercase());
                KeyOutcome::Continue
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.selection_input);
                KeyOutcome::Done(self.resolve_selection(&input, sample, word_length))
            }
            _ => KeyOutcome::Continue,
        }
    }

    fn resolve_selection(
        &mut self,
        input: &str,
        sample: &[&Word],
        word_length: usize,
    ) -> Option<UserAction> {
        if input.is_empty() {
            return sample
                .get(self.selected)
                .map(|&word| UserAction::Guess(word.clone()));
        }
        if let Ok(index) = input.parse::<usize>() {
            if let Some(&word) = sample.get(index) {
                return Some(UserAction::Guess(word.clone()));
            }
            self.error_message = format!("No candidate numbered {index}");
            return None;
        }
        match Word::new(input, word_length) {
            Ok(word) => Some(UserAction::Guess(word)),
            Err(e) => {
                self.error_message = format!("Invalid guess: {e}");
                None
            }
        }
    }

    fn reset_board(&mut self) {
        self.rows.clear();
        self.candidates.clear();
        self.total = 0;
        self.selected = 0;
        self.selection_input.clear();
        self.error_message.clear();
        self.state = TuiState::Idle;
    }
}

impl GameInterface for TuiInterface {
    fn display_intro(&mut self, pool_size: usize, config: &SessionConfig) {
        self.max_guesses = config.max_guesses;
        self.message = format!(
            "Loaded {pool_size} words of {} letters. Starting with {}.",
            config.word_length, config.starting_word
        );
        self.draw_or_log();
    }

    fn read_feedback(&mut self, guess: &Word, round: usize) -> FeedbackInput {
        info_log!("read_feedback() - Round {} guess {}", round, guess);
        self.rows.push(GuessRow::from_guess(guess));
        self.state = TuiState::MarkingFeedback { marking_index: 0 };
        self.status = format!("Round {round}: play {guess}, then mark each letter");
        self.read_with(FeedbackInput::Exit, Self::handle_feedback_key)
    }

    fn display_invalid_feedback(&mut self, error: &FormatError) {
        self.error_message = error.to_string();
        self.draw_or_log();
    }

    fn display_candidates(&mut self, _history: &ClueHistory, sample: &[&Word], total: usize) {
        debug_log!("display_candidates() - {} of {} shown", sample.len(), total);
        self.candidates = sample.iter().map(|w| w.to_string()).collect();
        self.total = total;
        self.selected = 0;
        self.selection_input.clear();
        self.state = TuiState::Choosing;
        self.status = format!("{total} candidates remain");
        self.draw_or_log();
    }

    fn read_selection(&mut self, sample: &[&Word], word_length: usize) -> Option<UserAction> {
        self.state = TuiState::Choosing;
        let action = self.read_with(Some(UserAction::Exit), |tui, key| {
            tui.handle_selection_key(key, sample, word_length)
        });
        info_log!("read_selection() - {:?}", action);
        action
    }

    fn display_outcome(&mut self, outcome: &GameOutcome) {
        self.state = TuiState::GameOver;
        match outcome {
            GameOutcome::Solved { answer, guesses } => {
                self.message = format!("✓ Solved: {answer} in {guesses} guesses");
                self.status = format!("Game Over - Solution: {answer}");
            }
            GameOutcome::NoCandidates => {
                self.message = "No candidates remain. Check your inputs.".to_string();
                self.status = "Error: No valid candidates found".to_string();
            }
            GameOutcome::OutOfGuesses => {
                self.message = "Out of guesses.".to_string();
                self.status = "Game Over".to_string();
            }
            GameOutcome::Quit => {
                self.message = "Exiting...".to_string();
                self.status = "Exiting application...".to_string();
            }
        }
        self.draw_or_log();
    }

    fn display_new_game_message(&mut self, pool_size: usize) {
        self.reset_board();
        self.message = format!("New game started. Loaded {pool_size} words.");
        self.status = "New game".to_string();
        self.draw_or_log();
    }

    fn play_again(&mut self) -> bool {
        self.read_with(false, |_, key| match key.code {
            KeyCode::Char('n' | 'N') => KeyOutcome::Done(true),
            KeyCode::Esc | KeyCode::Char('q' | 'Q') => KeyOutcome::Done(false),
            _ => KeyOutcome::Continue,
        })
    }
}

impl Drop for TuiInterface {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn has_modifier_keys(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::CONTROL)
}

struct InfoPanel<'a> {
    candidates: &'a [String],
    total: usize,
    selected: usize,
    selection_input: &'a str,
    choosing: bool,
    message: &'a str,
    error_message: &'a str,
}

fn render_title(f: &mut Frame, area: Rect, played: usize, max_guesses: usize) {
    let title = Paragraph::new(format!("WORDLE ASSISTANT  ({played}/{max_guesses} guesses)"))
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, area);
}

fn render_board(f: &mut Frame, area: Rect, rows: &[GuessRow], state: TuiState) {
    let block = Block::default().title("Clues").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Most recent rows win when the board overflows
    let available_rows = (inner.height / ROW_SPACING) as usize;
    let skip_count = rows.len().saturating_sub(available_rows);
    let last = rows.len().saturating_sub(1);

    for (display_index, (row_index, row)) in rows.iter().enumerate().skip(skip_count).enumerate() {
        let marking = match state {
            TuiState::MarkingFeedback { marking_index } if row_index == last => Some(marking_index),
            _ => None,
        };
        render_guess_row(f, inner, display_index, row, marking);
    }
}

#[allow(clippy::cast_possible_truncation)]
fn render_guess_row(
    f: &mut Frame,
    area: Rect,
    display_index: usize,
    row: &GuessRow,
    marking: Option<usize>,
) {
    let y = area.y + (display_index as u16 * ROW_SPACING);
    if y >= area.y + area.height {
        return;
    }

    let mut spans = vec![Span::raw("  ")];
    for (letter, state) in row.letters.iter().zip(&row.states) {
        let (bg_color, fg_color) = state.colors();
        spans.push(Span::styled(
            format!(" {letter} "),
            Style::default().fg(fg_color).bg(bg_color),
        ));
        spans.push(Span::raw(" "));
    }
    if let Some(index) = marking {
        spans.push(Span::raw(format!(" <- Marking letter {} (G/Y/X)", index + 1)));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)),
        Rect {
            x: area.x,
            y,
            width: area.width,
            height: 1,
        },
    );
}

fn render_info(f: &mut Frame, area: Rect, panel: &InfoPanel) {
    let mut lines = Vec::new();

    if !panel.candidates.is_empty() || panel.total > 0 {
        lines.push(Line::from(Span::styled(
            format!("Possible candidates ({}):", panel.total),
            INFO_STYLE,
        )));
        for (row_start, chunk) in panel
            .candidates
            .chunks(CANDIDATE_COLUMNS)
            .enumerate()
            .map(|(i, chunk)| (i * CANDIDATE_COLUMNS, chunk))
        {
            let mut spans = Vec::new();
            for (offset, word) in chunk.iter().enumerate() {
                let index = row_start + offset;
                let text = format!("{index:3}: {word}");
                if panel.choosing && index == panel.selected {
                    spans.push(Span::styled(text, SELECTED_STYLE));
                } else {
                    spans.push(Span::raw(text));
                }
                spans.push(Span::raw("    "));
            }
            lines.push(Line::from(spans));
        }
        if panel.total > panel.candidates.len() {
            lines.push(Line::from(format!(
                "  ... and {} more",
                panel.total - panel.candidates.len()
            )));
        }
        lines.push(Line::from(""));
    }

    if panel.choosing {
        lines.push(Line::from(vec![
            Span::styled("Next guess> ", SUCCESS_STYLE),
            Span::raw(panel.selection_input.to_string()),
        ]));
    }

    if !panel.message.is_empty() {
        lines.push(Line::from(Span::styled(panel.message, MESSAGE_STYLE)));
    }
    if !panel.error_message.is_empty() {
        lines.push(Line::from(Span::styled(panel.error_message, ERROR_STYLE)));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Candidates").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, area: Rect, status: &str) {
    let status_text = if status.is_empty() { "Ready" } else { status };
    let paragraph = Paragraph::new(status_text)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(paragraph, area);
}

fn render_instructions(f: &mut Frame, area: Rect, state: TuiState) {
    let text = match state {
        TuiState::Idle => "ESC: Quit",
        TuiState::MarkingFeedback { .. } => {
            "G: Green (correct) | Y: Yellow (wrong position) | X: Gray (not in word) | BACKSPACE: Go back | ESC: Quit"
        }
        TuiState::ConfirmingFeedback => "ENTER: Confirm feedback | BACKSPACE: Go back and edit",
        TuiState::Choosing => {
            "Arrows: Highlight | ENTER: Play highlighted | Type a number or word + ENTER | ESC: Quit"
        }
        TuiState::GameOver => "N: New Game | ESC: Quit",
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_restored_once() {
        let mut restore = RestoreState::default();
        assert!(restore.claim());
        assert!(!restore.claim());
        assert!(!restore.claim());
    }

    #[test]
    fn test_guess_row_verdicts_require_every_letter() {
        let mut row = GuessRow::from_guess(&Word::new("crane", 5).unwrap());
        assert_eq!(row.letters, vec!['C', 'R', 'A', 'N', 'E']);
        assert_eq!(row.verdicts(), None);
        for state in &mut row.states {
            *state = LetterState::Marked(Verdict::Absent);
        }
        row.states[4] = LetterState::Marked(Verdict::Correct);
        assert_eq!(
            row.verdicts(),
            Some(vec![
                Verdict::Absent,
                Verdict::Absent,
                Verdict::Absent,
                Verdict::Absent,
                Verdict::Correct
            ])
        );
    }

    #[test]
    fn test_letter_colors() {
        assert_eq!(
            LetterState::Marked(Verdict::Correct).colors().0,
            Color::Green
        );
        assert_eq!(
            LetterState::Marked(Verdict::Present).colors().0,
            Color::Yellow
        );
        assert_eq!(LetterState::Entered.colors().0, Color::DarkGray);
    }

    #[test]
    fn test_modifier_keys_are_ignored() {
        let plain = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        let ctrl = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert!(!has_modifier_keys(&plain));
        assert!(has_modifier_keys(&ctrl));
    }
}
