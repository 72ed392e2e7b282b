use std::io::{self, Write};

use crate::{pos, Pos};

/// Fixed-size block of characters painted in layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    lines: Vec<Vec<char>>,
    width: usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let lines = (0..height).map(|_| vec![' '; width]).collect();
        Self {
            height,
            lines,
            width,
        }
    }

    /// Paints every position for which `f` returns a character.
    pub fn layer(&mut self, f: impl Fn(Pos) -> Option<char>) {
        for y in 0..self.height {
            for x in 0..self.width {
                if let Some(char) = f(pos!(x as i32, y as i32)) {
                    self.lines[y][x] = char;
                }
            }
        }
    }

    /// Writes `text` on line `y` from column `x`, dropping what overflows.
    pub fn text(&mut self, Pos { x, y }: Pos, text: &str) {
        let Some(line) = self.lines.get_mut(y as usize) else {
            return;
        };
        for (slot, char) in line.iter_mut().skip(x as usize).zip(text.chars()) {
            *slot = char;
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().map(|line| line.iter().collect())
    }

    /// Draws over the previous frame in place, one cursor jump per line.
    pub fn display(&self, out: &mut impl Write) -> io::Result<()> {
        for (index, line) in self.lines().enumerate() {
            let goto = termion::cursor::Goto(1, index as u16 + 1);
            write!(out, "{goto}{line}")?;
        }
        out.flush()
    }
}
