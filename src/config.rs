//! Startup constants and the configuration built from them.

use std::time::Duration;

use crate::error::{Error, Result};

pub const ROWS: usize = 30;
pub const COLS: usize = 80;
/// A background cell is alive with a chance of one in this.
pub const ALIVE_PROBABILITY_DEFAULT: u32 = 6;
/// Chance used for every non-live cell once a pattern is stamped.
/// A draw in `[0, 1)` always hits, so those cells always come out alive.
pub const PATTERN_FILL_PROBABILITY: u32 = 1;
pub const MAX_INFECTED: u32 = 50;
pub const MAX_VACCINATED: u32 = 50;
pub const TICK_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rows: usize,
    pub cols: usize,
    pub alive_probability_default: u32,
    pub pattern_fill_probability: u32,
    /// Seeding cap for infected cells, also the divisor of the infection draw.
    pub max_infected: u32,
    /// Seeding cap for vaccinated cells, also the divisor of the vaccination draw.
    pub max_vaccinated: u32,
    pub tick_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: ROWS,
            cols: COLS,
            alive_probability_default: ALIVE_PROBABILITY_DEFAULT,
            pattern_fill_probability: PATTERN_FILL_PROBABILITY,
            max_infected: MAX_INFECTED,
            max_vaccinated: MAX_VACCINATED,
            tick_delay: TICK_DELAY,
        }
    }
}

impl Config {
    pub fn total_cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Rejects values that would make a random draw use an empty range.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::InvalidConfig(format!(
                "grid must have at least one cell, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.total_cells() > u32::MAX as usize {
            return Err(Error::InvalidConfig(format!(
                "grid of {}x{} is too large",
                self.rows, self.cols
            )));
        }
        if self.alive_probability_default == 0 {
            return Err(Error::InvalidConfig(
                "default alive probability must be positive".into(),
            ));
        }
        if self.max_infected == 0 || self.max_vaccinated == 0 {
            return Err(Error::InvalidConfig(
                "infection and vaccination caps must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.rows, 30);
        assert_eq!(config.cols, 80);
        assert_eq!(config.total_cells(), 2400);
        assert_eq!(config.tick_delay, Duration::from_millis(100));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_grid() {
        let config = Config {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_zero_divisors() {
        let config = Config {
            max_vaccinated: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            alive_probability_default: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
