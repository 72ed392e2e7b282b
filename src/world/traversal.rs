use super::Grid;

/// Walks the successor chain from the first cell, yielding cell indices.
/// Stops after `len` steps even if the chain were to loop.
pub struct Traversal<'g> {
    grid: &'g Grid,
    cursor: Option<usize>,
    remaining: usize,
}

impl<'g> Traversal<'g> {
    pub fn new(grid: &'g Grid) -> Self {
        Self {
            grid,
            cursor: grid.head(),
            remaining: grid.len(),
        }
    }
}

impl Iterator for Traversal<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.cursor?;
        self.cursor = self.grid.cell(index).successor();
        self.remaining -= 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

impl Grid {
    /// Visits every cell in traversal order with mutable access to the grid.
    pub fn walk_mut(&mut self, mut visit: impl FnMut(&mut Grid, usize)) {
        let mut cursor = self.head();
        for _ in 0..self.len() {
            let Some(index) = cursor else { break };
            visit(self, index);
            cursor = self.cell(index).successor();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::pattern::Pattern;

    use super::*;

    #[test]
    fn test_visits_every_cell_once() {
        for (rows, cols) in [(1, 1), (1, 7), (7, 1), (30, 80)] {
            let grid = Grid::stamped(rows, cols, &Pattern::default());
            let order: Vec<_> = grid.traversal().collect();
            assert_eq!(order.len(), rows * cols);
            let unique: HashSet<_> = order.iter().collect();
            assert_eq!(unique.len(), rows * cols);
            assert_eq!(order.last(), Some(&(rows * cols - 1)));
        }
    }

    #[test]
    fn test_order_is_row_major() {
        let grid = Grid::stamped(3, 4, &Pattern::default());
        let order: Vec<_> = grid.traversal().collect();
        assert_eq!(order, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_walk_mut_matches_traversal() {
        let mut grid = Grid::stamped(4, 6, &Pattern::default());
        let expected: Vec<_> = grid.traversal().collect();
        let mut visited = vec![];
        grid.walk_mut(|_, index| visited.push(index));
        assert_eq!(visited, expected);
    }
}
