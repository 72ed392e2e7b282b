//! Error types for the simulator.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pattern error at line {line}, column {column}: unexpected {found:?}")]
    Pattern {
        line: usize,
        column: usize,
        found: char,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
