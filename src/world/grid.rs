use std::hash::{Hash, Hasher};

use metrohash::MetroHash64;
use rand::Rng;
use tracing::{debug, warn};

use crate::{config::Config, pattern::Pattern, Pos};

use super::{Budget, Cell, CellState, Direction, Infection, Traversal};

/// Counts of the committed states across the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Census {
    pub alive: usize,
    pub infected: usize,
    pub vaccinated: usize,
}

/// Fixed `rows x cols` arena of cells, wired once at construction.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    infected: Budget,
    vaccinated: Budget,
}

impl Grid {
    /// Rolls every cell and wires the grid.
    ///
    /// Without a pattern each cell is alive with a chance of one in
    /// `config.alive_probability_default`. With a pattern its live marks are
    /// forced alive and every other cell, inside or below the pattern rows,
    /// rolls with `config.pattern_fill_probability`.
    pub fn build(config: &Config, pattern: Option<&Pattern>, rng: &mut impl Rng) -> Self {
        let (rows, cols) = (config.rows, config.cols);
        let total_cells =
            u32::try_from(rows * cols).expect("grid size is checked by Config::validate");
        let mut infected = Budget::new(config.max_infected);
        let mut vaccinated = Budget::new(config.max_vaccinated);

        if let Some(pattern) = pattern {
            clip_warning(pattern, rows, cols);
        }

        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                let probability = alive_probability(config, pattern, row, col);
                cells.push(Cell::new(
                    total_cells,
                    probability,
                    &mut infected,
                    &mut vaccinated,
                    rng,
                ));
            }
        }

        debug!(
            rows,
            cols,
            infected = infected.used(),
            vaccinated = vaccinated.used(),
            "built grid"
        );
        Self::wired(rows, cols, cells, infected, vaccinated)
    }

    /// Pattern marks alive, everything else dead and organic.
    pub fn stamped(rows: usize, cols: usize, pattern: &Pattern) -> Self {
        assert!(rows > 0 && cols > 0, "grid must have at least one cell");
        clip_warning(pattern, rows, cols);

        let mut cells = vec![Cell::with_state(CellState::dead()); rows * cols];
        for (row, col) in pattern.live_cells() {
            if row < rows && col < cols {
                cells[row * cols + col] = Cell::with_state(CellState::alive(Infection::Organic));
            }
        }
        Self::wired(rows, cols, cells, Budget::new(0), Budget::new(0))
    }

    /// Grid with explicit starting states in row-major order.
    #[cfg(test)]
    pub fn from_states(rows: usize, cols: usize, states: &[CellState]) -> Self {
        assert_eq!(states.len(), rows * cols, "one state per cell");
        let cells = states.iter().copied().map(Cell::with_state).collect();
        Self::wired(rows, cols, cells, Budget::new(0), Budget::new(0))
    }

    fn wired(
        rows: usize,
        cols: usize,
        cells: Vec<Cell>,
        infected: Budget,
        vaccinated: Budget,
    ) -> Self {
        let mut grid = Self {
            rows,
            cols,
            cells,
            infected,
            vaccinated,
        };
        grid.wire();
        grid
    }

    /// Links every cell to its in-bounds neighbors and to its successor in
    /// traversal order. Nothing wraps: off the right edge the successor is
    /// the first cell of the next row, but no neighbor is.
    fn wire(&mut self) {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let here = Pos::at(row, col);
                let index = row * self.cols + col;

                for direction in Direction::ALL {
                    let neighbor = self.index_of(here + direction.offset());
                    self.cells[index].link(direction, neighbor);
                }

                let successor = if col + 1 < self.cols {
                    Some(index + 1)
                } else if row + 1 < self.rows {
                    Some((row + 1) * self.cols)
                } else {
                    None
                };
                self.cells[index].chain(successor);
            }
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn index_of(&self, Pos { x, y }: Pos) -> Option<usize> {
        let in_bounds = x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows;
        in_bounds.then(|| y as usize * self.cols + x as usize)
    }

    pub fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    #[cfg(test)]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn state_at(&self, row: usize, col: usize) -> Option<CellState> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col].current())
    }

    /// First cell of the traversal order.
    pub fn head(&self) -> Option<usize> {
        (!self.cells.is_empty()).then_some(0)
    }

    pub fn traversal(&self) -> Traversal<'_> {
        Traversal::new(self)
    }

    /// Next state of the cell at `index`, read from committed states only.
    pub fn next_state_of(&self, index: usize) -> CellState {
        self.cells[index].next_state(&self.cells)
    }

    pub fn infected_budget(&self) -> Budget {
        self.infected
    }

    pub fn vaccinated_budget(&self) -> Budget {
        self.vaccinated
    }

    pub fn census(&self) -> Census {
        self.traversal()
            .map(|index| self.cells[index].current())
            .fold(Census::default(), |mut census, state| {
                if state.is_alive() {
                    census.alive += 1;
                }
                match state.infection() {
                    Infection::Infected => census.infected += 1,
                    Infection::Vaccinated => census.vaccinated += 1,
                    Infection::Organic => (),
                }
                census
            })
    }

    /// Hash of every committed state, used to spot repeating generations.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = MetroHash64::new();
        for index in self.traversal() {
            self.cells[index].current().hash(&mut hasher);
        }
        hasher.finish()
    }
}

fn alive_probability(config: &Config, pattern: Option<&Pattern>, row: usize, col: usize) -> u32 {
    match pattern {
        Some(pattern) if !pattern.is_empty() => {
            if pattern.covers(row, col) && pattern.is_alive(row, col) {
                0
            } else {
                config.pattern_fill_probability
            }
        }
        _ => config.alive_probability_default,
    }
}

fn clip_warning(pattern: &Pattern, rows: usize, cols: usize) {
    if pattern.height() > rows || pattern.width() > cols {
        warn!(
            height = pattern.height(),
            width = pattern.width(),
            rows,
            cols,
            "seed pattern larger than the grid, clipping"
        );
    }
}
