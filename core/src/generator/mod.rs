use rand::Rng;

use crate::*;
pub use random::*;

mod random;

/// Strategy interface for producing a solvable [`Puzzle`]. The random source
/// is owned by the caller, so runs are reproducible from a seed and
/// independent generations can use independent streams.
pub trait LayoutGenerator {
    fn generate<R: Rng>(&self, config: PuzzleConfig, rng: &mut R) -> Result<Puzzle>;
}
