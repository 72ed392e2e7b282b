use std::{
    io::{self, stdin, stdout, Stdout, Write},
    thread::{self, JoinHandle},
};

use termion::{
    event::Key,
    input::TermRead,
    raw::{IntoRawMode, RawTerminal},
};
use tracing::{debug, warn};

use crate::{pos, CancelFlag, CellState, Frame, Infection, Pos};

pub use canvas::Canvas;
mod canvas;

pub const DEAD: char = ' ';
pub const ORGANIC: char = '\u{25cb}';
pub const VACCINATED: char = '\u{25ca}';
pub const INFECTED: char = '\u{25cf}';

pub fn glyph(state: CellState) -> char {
    if !state.is_alive() {
        return DEAD;
    }
    match state.infection() {
        Infection::Organic => ORGANIC,
        Infection::Vaccinated => VACCINATED,
        Infection::Infected => INFECTED,
    }
}

/// Lays out a frame: the grid inside a `-`/`|` border, then a status line.
pub fn compose(frame: Frame<'_>) -> Canvas {
    let grid = frame.grid;
    let (rows, cols) = (grid.rows() as i32, grid.cols() as i32);
    let mut canvas = Canvas::new(grid.cols() + 2, grid.rows() + 3);

    canvas.layer(|Pos { x, y }| {
        if y == 0 || y == rows + 1 {
            Some('-')
        } else if y > rows + 1 {
            None
        } else if x == 0 || x == cols + 1 {
            Some('|')
        } else {
            grid.state_at(y as usize - 1, x as usize - 1).map(glyph)
        }
    });

    let census = frame.census;
    let status = format!(
        "gen {} | alive {} | infected {} | vaccinated {} | q to quit",
        frame.generation, census.alive, census.infected, census.vaccinated
    );
    canvas.text(pos!(0, rows + 2), &status);
    canvas
}

/// Terminal the frames are drawn on. Restores the cursor when dropped.
pub struct View {
    out: RawTerminal<Stdout>,
}

impl View {
    pub fn open() -> io::Result<Self> {
        let mut out = stdout().into_raw_mode()?;
        write!(out, "{}{}", termion::clear::All, termion::cursor::Hide)?;
        out.flush()?;
        Ok(Self { out })
    }

    pub fn draw(&mut self, frame: Frame<'_>) -> io::Result<()> {
        compose(frame).display(&mut self.out)
    }
}

impl Drop for View {
    fn drop(&mut self) {
        let restore = write!(self.out, "\r\n{}", termion::cursor::Show).and_then(|_| self.out.flush());
        if let Err(err) = restore {
            warn!(%err, "could not restore the terminal");
        }
    }
}

/// Raises `cancel` on SIGINT, SIGTERM or SIGHUP. Raw mode keeps the
/// terminal's own Ctrl-C from signalling, so this covers signals sent from
/// outside the process.
pub fn install_interrupt(cancel: CancelFlag) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(on_interrupt(cancel))
}

fn on_interrupt(cancel: CancelFlag) -> impl Fn() + Send + 'static {
    move || {
        debug!("interrupt received");
        cancel.cancel();
    }
}

/// Reads keys until `q`, `Esc` or Ctrl-C, then raises `cancel`.
/// The terminal must already be in raw mode for Ctrl-C to arrive as a key.
pub fn spawn_input(cancel: CancelFlag) -> JoinHandle<()> {
    thread::spawn(move || {
        for key in stdin().keys() {
            match key {
                Ok(Key::Char('q')) | Ok(Key::Esc) | Ok(Key::Ctrl('c')) => break,
                Ok(_) => continue,
                Err(err) => {
                    warn!(%err, "lost keyboard input");
                    break;
                }
            }
        }
        debug!("cancel requested");
        cancel.cancel();
    })
}
