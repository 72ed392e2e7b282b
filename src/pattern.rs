//! Seed patterns stamped onto the top-left corner of the grid at startup.

use std::{fs, path::Path};

use tracing::debug;

use crate::error::{Error, Result};

const BEACON: &str = "11\n1\n   1\n  11";
const GLIDER: &str = "  1\n1 1\n 11";

/// Rows of live/dead marks. Rows may have different lengths; anything past
/// the end of a row is not part of the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pattern {
    rows: Vec<Vec<bool>>,
}

impl Pattern {
    pub fn beacon() -> Self {
        Self::parse(BEACON).expect("built-in beacon is well formed")
    }

    pub fn glider() -> Self {
        Self::parse(GLIDER).expect("built-in glider is well formed")
    }

    /// `1` or `#` mark a live cell, ` `, `0` or `.` a dead one.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows = vec![];
        for (line, content) in text.lines().enumerate() {
            let mut row = vec![];
            for (column, c) in content.chars().enumerate() {
                match c {
                    '1' | '#' => row.push(true),
                    ' ' | '0' | '.' => row.push(false),
                    '\r' => (),
                    found => {
                        return Err(Error::Pattern {
                            line: line + 1,
                            column: column + 1,
                            found,
                        })
                    }
                }
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let pattern = Self::parse(&content)?;
        debug!(path = %path.display(), height = pattern.height(), "loaded seed pattern");
        Ok(pattern)
    }

    /// Number of rows the pattern spans.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether `(row, col)` lies inside the marks of the pattern.
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.rows.get(row).map_or(false, |r| col < r.len())
    }

    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Live cells as `(row, col)`.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, marks)| {
            marks
                .iter()
                .enumerate()
                .filter_map(move |(col, alive)| alive.then_some((row, col)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beacon_shape() {
        let beacon = Pattern::beacon();
        assert_eq!(beacon.height(), 4);
        assert_eq!(beacon.width(), 4);
        let cells: Vec<_> = beacon.live_cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0), (2, 3), (3, 2), (3, 3)]);
    }

    #[test]
    fn test_ragged_rows() {
        let beacon = Pattern::beacon();
        assert!(beacon.covers(1, 0));
        assert!(!beacon.covers(1, 1));
        assert!(beacon.covers(2, 2));
        assert!(!beacon.is_alive(2, 2));
        assert!(!beacon.covers(4, 0));
    }

    #[test]
    fn test_alternate_marks() {
        let pattern = Pattern::parse("#.#\r\n0 1").unwrap();
        let cells: Vec<_> = pattern.live_cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 2), (1, 2)]);
        assert_eq!(pattern.width(), 3);
    }

    #[test]
    fn test_rejects_unknown_mark() {
        let err = Pattern::parse("11\n1x").unwrap_err();
        assert!(matches!(
            err,
            Error::Pattern {
                line: 2,
                column: 2,
                found: 'x'
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Pattern::load("/definitely/not/here.life").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
