use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use tracing::{info, trace};

use crate::{Census, Grid};

/// Advances the whole grid by one generation.
///
/// Every next state is staged from committed states before any is
/// committed, so no cell sees a mix of old and new neighbors.
pub fn advance(grid: &mut Grid) {
    grid.walk_mut(|grid, index| {
        let next = grid.next_state_of(index);
        grid.cell_mut(index).stage(next);
    });
    grid.walk_mut(|grid, index| grid.cell_mut(index).commit());
}

/// Flag raised from outside the loop to stop it. Raising is its only mutation.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

const HISTORY_LEN: usize = 10;

/// Ring of recent fingerprints, to notice when the colony repeats itself.
#[derive(Debug, Default)]
pub struct History {
    fingerprints: [u64; HISTORY_LEN],
    count: usize,
    reported: Option<usize>,
}

impl History {
    /// Records a generation and returns the period if it was seen recently.
    pub fn record(&mut self, fingerprint: u64) -> Option<usize> {
        let known = self.count.min(HISTORY_LEN);
        let period = (1..=known).find(|back| {
            let slot = (self.count + HISTORY_LEN - back) % HISTORY_LEN;
            self.fingerprints[slot] == fingerprint
        });
        self.fingerprints[self.count % HISTORY_LEN] = fingerprint;
        self.count += 1;
        period
    }

    /// Like `record`, but only yields a period when it differs from the
    /// last one yielded, so a settled colony is reported once.
    pub fn observe(&mut self, fingerprint: u64) -> Option<usize> {
        let period = self.record(fingerprint);
        let changed = period != self.reported;
        self.reported = period;
        period.filter(|_| changed)
    }
}

/// What the loop hands to the renderer after each commit.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'g> {
    pub grid: &'g Grid,
    pub generation: u64,
    pub census: Census,
}

/// Single-threaded simulation loop: render, advance, pace, until cancelled.
pub struct Sim {
    grid: Grid,
    generation: u64,
    history: History,
    tick_delay: Duration,
}

impl Sim {
    pub fn new(grid: Grid, tick_delay: Duration) -> Self {
        Self {
            grid,
            generation: 0,
            history: History::default(),
            tick_delay,
        }
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            grid: &self.grid,
            generation: self.generation,
            census: self.grid.census(),
        }
    }

    pub fn step(&mut self) {
        advance(&mut self.grid);
        self.generation += 1;

        let census = self.grid.census();
        trace!(generation = self.generation, ?census, "advanced");

        if let Some(period) = self.history.observe(self.grid.fingerprint()) {
            info!(generation = self.generation, period, "colony is repeating");
        }
    }

    /// Runs until `cancel` is raised, handing each committed generation to
    /// `render`. Returns the number of generations advanced.
    pub fn run<E>(
        &mut self,
        cancel: &CancelFlag,
        mut render: impl FnMut(Frame<'_>) -> Result<(), E>,
    ) -> Result<u64, E> {
        let start = self.generation;
        while !cancel.is_cancelled() {
            render(self.frame())?;
            self.step();
            thread::sleep(self.tick_delay);
        }
        info!(generations = self.generation - start, "simulation cancelled");
        Ok(self.generation - start)
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::{config::Config, pattern::Pattern, CellState, Infection};

    fn states(grid: &Grid) -> Vec<CellState> {
        grid.cells().iter().map(|c| c.current()).collect()
    }

    fn random_grid(seed: u64) -> Grid {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let config = Config {
            rows: 12,
            cols: 20,
            max_infected: 2,
            max_vaccinated: 2,
            ..Default::default()
        };
        Grid::build(&config, None, &mut rng)
    }

    #[test]
    fn test_beacon_fills_in() {
        let mut grid = Grid::stamped(8, 8, &Pattern::beacon());
        advance(&mut grid);

        let expected = ["11..", "11..", "..11", "..11"];
        for (row, line) in expected.iter().enumerate() {
            for (col, mark) in line.chars().enumerate() {
                let state = grid.state_at(row, col).unwrap();
                assert_eq!(state.is_alive(), mark == '1', "at ({row}, {col})");
                assert_eq!(state.infection(), Infection::Organic);
            }
        }
        assert_eq!(grid.census().alive, 8);

        advance(&mut grid);
        assert_eq!(grid.census().alive, 6);
        assert_eq!(grid.fingerprint(), Grid::stamped(8, 8, &Pattern::beacon()).fingerprint());
    }

    #[test]
    fn test_matches_snapshot_reference() {
        let mut grid = random_grid(21);
        let before = states(&grid);

        let expected: Vec<_> = (0..grid.len())
            .map(|index| {
                let cell = grid.cell(index);
                let neighbors: Vec<_> = cell.neighbors().map(|n| before[n]).collect();
                before[index].successor(crate::world::NeighborCounts::tally(&neighbors))
            })
            .collect();

        advance(&mut grid);
        assert_eq!(states(&grid), expected);
    }

    #[test]
    fn test_visiting_order_does_not_matter() {
        let mut forward = random_grid(8);
        let mut backward = forward.clone();

        advance(&mut forward);

        for index in (0..backward.len()).rev() {
            let next = backward.next_state_of(index);
            backward.cell_mut(index).stage(next);
        }
        for index in (0..backward.len()).rev() {
            backward.cell_mut(index).commit();
        }

        assert_eq!(states(&forward), states(&backward));
    }

    #[test]
    fn test_dead_cells_stay_organic() {
        let mut grid = random_grid(1234);
        for _ in 0..50 {
            advance(&mut grid);
            for state in states(&grid) {
                if !state.is_alive() {
                    assert_eq!(state.infection(), Infection::Organic);
                }
            }
        }
    }

    #[test]
    fn test_infection_spreads_into_block() {
        // a stable block with one infected corner
        let mut block = vec![CellState::dead(); 16];
        for index in [5, 6, 9, 10] {
            block[index] = CellState::alive(Infection::Organic);
        }
        block[5] = CellState::alive(Infection::Infected);
        let mut grid = Grid::from_states(4, 4, &block);

        advance(&mut grid);
        let census = grid.census();
        assert_eq!(census.alive, 4);
        assert_eq!(census.infected, 4);
    }

    #[test]
    fn test_history_spots_periods() {
        let mut history = History::default();
        assert_eq!(history.record(1), None);
        assert_eq!(history.record(2), None);
        assert_eq!(history.record(1), Some(2));
        assert_eq!(history.record(1), Some(1));
    }

    #[test]
    fn test_history_reports_a_cycle_once() {
        let mut history = History::default();
        let seen: Vec<_> = [1, 2, 1, 2, 1, 2, 3, 3, 3]
            .into_iter()
            .map(|fingerprint| history.observe(fingerprint))
            .collect();
        assert_eq!(
            seen,
            vec![None, None, Some(2), None, None, None, None, Some(1), None]
        );
    }

    #[test]
    fn test_blinking_beacon_is_reported_once() {
        let mut grid = Grid::stamped(6, 6, &Pattern::beacon());
        let mut history = History::default();
        history.observe(grid.fingerprint());
        let mut reports = vec![];
        for _ in 0..20 {
            advance(&mut grid);
            reports.extend(history.observe(grid.fingerprint()));
        }
        assert_eq!(reports, vec![2]);
    }

    #[test]
    fn test_history_forgets_old_generations() {
        let mut history = History::default();
        history.record(99);
        for fingerprint in 0..HISTORY_LEN as u64 {
            history.record(fingerprint);
        }
        assert_eq!(history.record(99), None);
    }

    #[test]
    fn test_run_stops_on_cancel() {
        let mut sim = Sim::new(Grid::stamped(6, 6, &Pattern::beacon()), Duration::ZERO);
        let cancel = CancelFlag::new();
        let mut frames = 0;
        let ticks = sim
            .run(&cancel, |frame| {
                frames += 1;
                assert_eq!(frame.generation, frames - 1);
                if frames == 4 {
                    cancel.cancel();
                }
                Ok::<_, Infallible>(())
            })
            .unwrap();
        assert_eq!(ticks, 4);
        assert_eq!(sim.generation(), 4);
    }

    #[test]
    fn test_run_propagates_render_errors() {
        let mut sim = Sim::new(Grid::stamped(3, 3, &Pattern::default()), Duration::ZERO);
        let result = sim.run(&CancelFlag::new(), |_| Err("broken pipe"));
        assert_eq!(result, Err("broken pipe"));
        assert_eq!(sim.generation(), 0);
    }
}
