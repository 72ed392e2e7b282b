use std::ops::Add;

/// A position on the grid, `x` being the column and `y` the row.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

#[macro_export]
macro_rules! pos {
    ($x:expr, $y:expr) => {
        Pos { x: $x, y: $y }
    };
}

impl Pos {
    /// Position of the cell at `row`, `col`.
    pub fn at(row: usize, col: usize) -> Self {
        pos!(col as i32, row as i32)
    }
}

impl Add for Pos {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        pos!(self.x + rhs.x, self.y + rhs.y)
    }
}

#[test]
fn test_at_swaps_into_columns() {
    let pos = Pos::at(2, 5);
    assert_eq!(pos, pos!(5, 2));
    assert_eq!(pos + pos!(-1, 1), Pos::at(3, 4));
}
