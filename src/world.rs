use rand::Rng;

/// Infection category carried by a cell. Only alive cells leave `Organic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Infection {
    #[default]
    Organic,
    Infected,
    Vaccinated,
}

/// Dual state of a cell. A dead state is always `Organic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CellState {
    alive: bool,
    infection: Infection,
}

impl CellState {
    pub fn dead() -> Self {
        Self::default()
    }

    pub fn alive(infection: Infection) -> Self {
        Self {
            alive: true,
            infection,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn infection(&self) -> Infection {
        self.infection
    }

    /// The only way aliveness changes. Dying clears the infection.
    pub fn set_alive(&mut self, alive: bool) {
        self.alive = alive;
        if !alive {
            self.infection = Infection::Organic;
        }
    }

    /// Tags an alive state. Ignored on a dead one.
    pub fn set_infection(&mut self, infection: Infection) {
        if self.alive {
            self.infection = infection;
        }
    }

    /// State of this cell one generation later given what its neighbors hold now.
    pub fn successor(self, counts: NeighborCounts) -> CellState {
        let mut next = self;

        match counts.alive {
            0 | 1 => next.set_alive(false),
            2 => (),
            3 => next.set_alive(true),
            _ => next.set_alive(false),
        }

        if self.alive && next.alive {
            if counts.infected > 0
                && counts.infected >= counts.vaccinated
                && self.infection != Infection::Vaccinated
            {
                next.set_infection(Infection::Infected);
            } else if counts.vaccinated > 0 {
                next.set_infection(Infection::Vaccinated);
            }
        }

        next
    }
}

/// Tally of the present neighbors of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NeighborCounts {
    pub alive: u8,
    pub infected: u8,
    pub vaccinated: u8,
}

impl NeighborCounts {
    pub fn tally<'a>(states: impl IntoIterator<Item = &'a CellState>) -> Self {
        let mut counts = Self::default();
        for state in states {
            match state.infection {
                Infection::Infected => counts.infected += 1,
                Infection::Vaccinated => counts.vaccinated += 1,
                Infection::Organic => (),
            }
            if state.alive {
                counts.alive += 1;
            }
        }
        counts
    }
}

/// How many cells may be seeded with a condition, and how many were.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    cap: u32,
    used: u32,
}

impl Budget {
    pub fn new(cap: u32) -> Self {
        Self { cap, used: 0 }
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    fn has_room(&self) -> bool {
        self.used < self.cap
    }

    /// Whether a draw from `[0, total_cells)` seeds the condition.
    fn accepts(&self, draw: u32, total_cells: u32) -> bool {
        draw < total_cells / self.cap
    }

    /// Draws in `[0, total_cells)` and succeeds below `total_cells / cap`,
    /// consuming one unit on success.
    fn try_seed(&mut self, total_cells: u32, rng: &mut impl Rng) -> bool {
        if !self.has_room() {
            return false;
        }
        let hit = self.accepts(rng.gen_range(0..total_cells), total_cells);
        if hit {
            self.used += 1;
        }
        hit
    }
}

/// One grid position: its states and its links into the owning grid.
#[derive(Debug, Clone)]
pub struct Cell {
    current: CellState,
    next: CellState,
    neighbors: [Option<usize>; Direction::COUNT],
    successor: Option<usize>,
}

impl Cell {
    /// Rolls a fresh cell.
    ///
    /// An `alive_probability` of zero forces the cell alive, otherwise it is
    /// alive with a chance of one in `alive_probability`. An alive cell may
    /// then be infected, or failing that vaccinated, while the budgets last.
    pub fn new(
        total_cells: u32,
        alive_probability: u32,
        infected: &mut Budget,
        vaccinated: &mut Budget,
        rng: &mut impl Rng,
    ) -> Self {
        assert!(total_cells > 0, "a cell needs a non-empty grid to roll against");

        let mut state = CellState::dead();
        let alive = alive_probability == 0 || rng.gen_range(0..alive_probability) == 0;
        state.set_alive(alive);

        if alive {
            if infected.try_seed(total_cells, rng) {
                state.set_infection(Infection::Infected);
            } else if vaccinated.try_seed(total_cells, rng) {
                state.set_infection(Infection::Vaccinated);
            }
        }

        Self::with_state(state)
    }

    pub fn with_state(state: CellState) -> Self {
        Self {
            current: state,
            next: state,
            neighbors: [None; Direction::COUNT],
            successor: None,
        }
    }

    pub fn current(&self) -> CellState {
        self.current
    }

    #[cfg(test)]
    pub fn neighbor(&self, direction: Direction) -> Option<usize> {
        self.neighbors[direction as usize]
    }

    pub fn neighbors(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().flatten().copied()
    }

    /// Next cell in traversal order, `None` for the last cell of the grid.
    pub fn successor(&self) -> Option<usize> {
        self.successor
    }

    pub(crate) fn link(&mut self, direction: Direction, neighbor: Option<usize>) {
        self.neighbors[direction as usize] = neighbor;
    }

    pub(crate) fn chain(&mut self, successor: Option<usize>) {
        self.successor = successor;
    }

    /// Computes the next state from the current states in `cells`.
    pub fn next_state(&self, cells: &[Cell]) -> CellState {
        let counts = NeighborCounts::tally(self.neighbors().map(|index| &cells[index].current));
        self.current.successor(counts)
    }

    pub(crate) fn stage(&mut self, next: CellState) {
        self.next = next;
    }

    pub(crate) fn commit(&mut self) {
        self.current = self.next;
    }
}

pub use direction::Direction;
mod direction;

pub use grid::{Census, Grid};
mod grid;

pub use traversal::Traversal;
mod traversal;
