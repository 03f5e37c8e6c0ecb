use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("invalid coordinates")]
    InvalidCoords,
    #[error("{requested} pairs cannot fit on a {size}x{size} board, at most {max} tents can avoid touching")]
    ImpossiblePairCount {
        requested: CellCount,
        size: Coord,
        max: CellCount,
    },
    #[error("no valid layout found within {attempts} attempts")]
    GenerationFailed { attempts: u32 },
}

pub type Result<T> = core::result::Result<T, PuzzleError>;
