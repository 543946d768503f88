//! Terminal front end
//!
//! Draws snapshots with crossterm and maps key presses to driver input. Each
//! grid cell is two characters wide so the board looks roughly square.

use std::io::{self, Stdout, Write, stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use crate::consts::{GRID_HEIGHT, GRID_WIDTH};
use crate::sim::{Command, Direction, RunState, Snapshot};

const CELL_WIDTH: u16 = 2;
const BOARD_TOP: u16 = 1;
const FILLED: &str = "██";
const EMPTY: &str = "  ";

/// Something the player asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Goes through the driver's queue
    Command(Command),
    TogglePause,
    ToggleAutopilot,
    Quit,
}

/// What occupies a cell when drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Head,
    Body,
    Obstacle,
    Food,
}

impl CellKind {
    fn color(self) -> Color {
        match self {
            CellKind::Empty => Color::Reset,
            CellKind::Head => Color::DarkGreen,
            CellKind::Body => Color::Green,
            CellKind::Obstacle => Color::Red,
            CellKind::Food => Color::Yellow,
        }
    }
}

/// Map a key press to an input; anything unrecognized is dropped
pub fn map_key(key: &KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Input::Quit);
    }

    let input = match key.code {
        KeyCode::Up | KeyCode::Char('w') => Input::Command(Command::Turn(Direction::Up)),
        KeyCode::Down | KeyCode::Char('s') => Input::Command(Command::Turn(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a') => Input::Command(Command::Turn(Direction::Left)),
        KeyCode::Right | KeyCode::Char('d') => Input::Command(Command::Turn(Direction::Right)),
        KeyCode::Char('r') | KeyCode::Char('R') => Input::Command(Command::Restart),
        KeyCode::Esc | KeyCode::Char('p') => Input::TogglePause,
        KeyCode::Char('i') => Input::ToggleAutopilot,
        KeyCode::Char('q') => Input::Quit,
        _ => return None,
    };
    Some(input)
}

/// Lay the snapshot out row by row
///
/// Later layers win where cells overlap: snake, then obstacles, then food.
pub fn layout(snapshot: &Snapshot) -> Vec<Vec<CellKind>> {
    let mut grid = vec![vec![CellKind::Empty; GRID_WIDTH as usize]; GRID_HEIGHT as usize];
    let mut put = |cell: glam::IVec2, kind| {
        if let Some(slot) = grid
            .get_mut(cell.y as usize)
            .and_then(|row| row.get_mut(cell.x as usize))
        {
            *slot = kind;
        }
    };

    for (i, &cell) in snapshot.snake.iter().enumerate().rev() {
        put(cell, if i == 0 { CellKind::Head } else { CellKind::Body });
    }
    for &cell in &snapshot.obstacles {
        put(cell, CellKind::Obstacle);
    }
    put(snapshot.food, CellKind::Food);

    grid
}

/// Status line shown above the board
pub fn status_line(snapshot: &Snapshot, paused: bool, autopilot: bool) -> String {
    let mut line = format!("Score: {}", snapshot.score);
    if paused {
        line.push_str("  [paused]");
    }
    if autopilot {
        line.push_str("  [auto]");
    }
    line
}

/// Lines of the game-over overlay
pub fn game_over_lines(score: i64) -> Vec<String> {
    vec![
        "Game Over".to_string(),
        format!("Score: {}", score),
        String::new(),
        "Press 'R' to Play Again".to_string(),
    ]
}

/// Owns the terminal while the game is running
pub struct TermManager {
    stdout: Stdout,
    active: bool,
}

impl TermManager {
    pub fn new() -> Self {
        Self {
            stdout: stdout(),
            active: false,
        }
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide)?;
        self.active = true;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, terminal::Clear(ClearType::All))?;

        let (width, height) = terminal::size()?;
        let needed = (GRID_WIDTH as u16 * CELL_WIDTH + 2, GRID_HEIGHT as u16 + BOARD_TOP + 2);
        if width < needed.0 || height < needed.1 {
            log::warn!(
                "Terminal is {}x{}, board needs {}x{}",
                width,
                height,
                needed.0,
                needed.1
            );
        }
        Ok(())
    }

    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.stdout, ResetColor, cursor::Show, LeaveAlternateScreen)
    }

    /// Wait up to `timeout` for input, then drain whatever else is queued
    pub fn read_inputs(&self, timeout: Duration) -> io::Result<Vec<Input>> {
        let mut inputs = Vec::new();
        if !event::poll(timeout)? {
            return Ok(inputs);
        }

        loop {
            if let Event::Key(key) = event::read()? {
                inputs.extend(map_key(&key));
            }
            if !event::poll(Duration::ZERO)? {
                break;
            }
        }
        Ok(inputs)
    }

    pub fn draw(&mut self, snapshot: &Snapshot, paused: bool, autopilot: bool) -> io::Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, 0),
            ResetColor,
            Print(status_line(snapshot, paused, autopilot)),
            terminal::Clear(ClearType::UntilNewLine)
        )?;

        self.draw_border()?;

        if snapshot.run_state == RunState::GameOver {
            self.draw_game_over(snapshot.score)?;
        } else {
            self.draw_board(snapshot)?;
        }

        queue!(self.stdout, ResetColor)?;
        self.stdout.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_border(&mut self) -> io::Result<()> {
        let inner = GRID_WIDTH as usize * CELL_WIDTH as usize;
        let bottom = BOARD_TOP + GRID_HEIGHT as u16 + 1;
        let edge = format!("+{}+", "-".repeat(inner));

        queue!(self.stdout, ResetColor, cursor::MoveTo(0, BOARD_TOP), Print(&edge))?;
        for y in 0..GRID_HEIGHT as u16 {
            let row = BOARD_TOP + 1 + y;
            queue!(
                self.stdout,
                cursor::MoveTo(0, row),
                Print('|'),
                cursor::MoveTo(1 + inner as u16, row),
                Print('|')
            )?;
        }
        queue!(self.stdout, cursor::MoveTo(0, bottom), Print(&edge))
    }

    fn draw_board(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        for (y, row) in layout(snapshot).iter().enumerate() {
            queue!(self.stdout, cursor::MoveTo(1, BOARD_TOP + 1 + y as u16))?;
            for &kind in row {
                let glyph = if kind == CellKind::Empty { EMPTY } else { FILLED };
                queue!(self.stdout, SetForegroundColor(kind.color()), Print(glyph))?;
            }
        }
        Ok(())
    }

    fn draw_game_over(&mut self, score: i64) -> io::Result<()> {
        let inner = GRID_WIDTH as usize * CELL_WIDTH as usize;
        let blank = " ".repeat(inner);
        let lines = game_over_lines(score);
        let first = BOARD_TOP + 1 + (GRID_HEIGHT as u16 - lines.len() as u16) / 2;

        queue!(self.stdout, ResetColor)?;
        for y in 0..GRID_HEIGHT as u16 {
            queue!(self.stdout, cursor::MoveTo(1, BOARD_TOP + 1 + y), Print(&blank))?;
        }
        for (i, line) in lines.iter().enumerate() {
            let padded = format!("{line: ^width$}", line = line, width = inner);
            queue!(
                self.stdout,
                cursor::MoveTo(1, first + i as u16),
                SetForegroundColor(Color::White),
                Print(padded)
            )?;
        }
        Ok(())
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            log::error!("Failed to restore terminal: {}", e);
        }
    }
}
