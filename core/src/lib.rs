#![no_std]

extern crate alloc;

use alloc::string::String;
use core::fmt::Write as _;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use types::*;
pub use validator::*;
pub use win::*;

mod board;
mod cell;
mod error;
mod generator;
mod types;
mod validator;
mod win;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub size: Coord,
    pub pair_count: CellCount,
    pub num_colors: ColorId,
    pub allow_diagonal_tent_touch: bool,
}

impl PuzzleConfig {
    pub const fn new_unchecked(
        size: Coord,
        pair_count: CellCount,
        num_colors: ColorId,
        allow_diagonal_tent_touch: bool,
    ) -> Self {
        Self {
            size,
            pair_count,
            num_colors,
            allow_diagonal_tent_touch,
        }
    }

    pub fn new(
        size: Coord,
        pair_count: CellCount,
        num_colors: ColorId,
        allow_diagonal_tent_touch: bool,
    ) -> Self {
        let size = size.clamp(1, Coord::MAX);
        let num_colors = num_colors.clamp(1, ColorId::MAX);
        let pair_count = pair_count.clamp(1, mult(size, size));
        Self::new_unchecked(size, pair_count, num_colors, allow_diagonal_tent_touch)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size, self.size)
    }

    /// Upper bound on tents that can share the board without touching under
    /// the configured adjacency rule.
    pub const fn max_isolated_tents(&self) -> CellCount {
        let n = self.size as CellCount;
        if self.allow_diagonal_tent_touch {
            (n * n + 1) / 2
        } else {
            let k = (n + 1) / 2;
            k * k
        }
    }
}

/// Fixed furniture of a generated level: the tree placement plus the tent
/// layout the generator built it from. Immutable once constructed; play
/// state lives in [`PlayBoard`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    config: PuzzleConfig,
    tree_colors: HashMap<Coord2, ColorId>,
    solution: Solution,
}

impl Puzzle {
    pub fn from_layout(
        config: PuzzleConfig,
        tree_colors: HashMap<Coord2, ColorId>,
        solution: Solution,
    ) -> Result<Self> {
        for &coords in tree_colors.keys().chain(solution.tents.keys()) {
            if !in_bounds(coords, config.size) {
                return Err(PuzzleError::InvalidCoords);
            }
        }
        Ok(Self {
            config,
            tree_colors,
            solution,
        })
    }

    pub const fn config(&self) -> PuzzleConfig {
        self.config
    }

    pub const fn size(&self) -> Coord {
        self.config.size
    }

    pub const fn allow_diagonal_tent_touch(&self) -> bool {
        self.config.allow_diagonal_tent_touch
    }

    pub fn tree_colors(&self) -> &HashMap<Coord2, ColorId> {
        &self.tree_colors
    }

    pub fn tree_color_at(&self, coords: Coord2) -> Option<ColorId> {
        self.tree_colors.get(&coords).copied()
    }

    pub fn tree_count(&self) -> CellCount {
        self.tree_colors.len().try_into().unwrap()
    }

    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Text rendering of the solved layout, one row per line: `T<color>` for
    /// trees, `^<color>` for the solution's tents, `..` for empty cells.
    pub fn render_solution(&self) -> String {
        let mut out = String::new();
        for row in 0..self.config.size {
            for col in 0..self.config.size {
                if col > 0 {
                    out.push(' ');
                }
                let pos = (row, col);
                if let Some(color) = self.solution.tents.get(&pos) {
                    write!(out, "^{color}").unwrap();
                } else if let Some(color) = self.tree_colors.get(&pos) {
                    write!(out, "T{color}").unwrap();
                } else {
                    out.push_str("..");
                }
            }
            out.push('\n');
        }
        out
    }
}

/// The tent placement the generator committed, with the tree-to-tent pairing
/// it chose. Kept for replay and diagnostics; solving does not require it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    tents: HashMap<Coord2, ColorId>,
    pairing: HashMap<Coord2, Coord2>,
}

impl Solution {
    pub fn new(tents: HashMap<Coord2, ColorId>, pairing: HashMap<Coord2, Coord2>) -> Self {
        Self { tents, pairing }
    }

    pub fn tents(&self) -> &HashMap<Coord2, ColorId> {
        &self.tents
    }

    /// Tree coordinate to the tent the generator assigned it.
    pub fn pairing(&self) -> &HashMap<Coord2, Coord2> {
        &self.pairing
    }

    pub fn tent_count(&self) -> CellCount {
        self.tents.len().try_into().unwrap()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum UpdateOutcome {
    Rejected,
    Applied,
}

impl UpdateOutcome {
    pub const fn was_applied(self) -> bool {
        match self {
            Self::Rejected => false,
            Self::Applied => true,
        }
    }
}
