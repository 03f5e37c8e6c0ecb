use alloc::vec::Vec;
use hashbrown::HashMap;
use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use super::*;

/// Constructive search with retry: shuffle the board cells, walk them as
/// tent candidates, grow a tree next to each accepted tent, and throw the
/// whole attempt away on any shortfall. Attempts are independent; there is
/// no partial-state repair between them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    max_attempts: u32,
}

impl RandomLayoutGenerator {
    pub const fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate<R: Rng>(&self, config: PuzzleConfig, rng: &mut R) -> Result<Puzzle> {
        let max = config.max_isolated_tents();
        if config.pair_count > max {
            return Err(PuzzleError::ImpossiblePairCount {
                requested: config.pair_count,
                size: config.size,
                max,
            });
        }

        for attempt in 0..self.max_attempts {
            let Some(draft) = try_layout(config, rng) else {
                continue;
            };

            // The incremental checks during construction can miss cross-pair
            // interactions introduced by later placements, so every draft
            // still goes through the authoritative validator.
            if !validate_layout(
                config.size,
                &draft.tree_colors,
                &draft.tents,
                config.allow_diagonal_tent_touch,
            ) {
                continue;
            }

            log::debug!("layout found on attempt {}", attempt + 1);
            let solution = Solution::new(draft.tents, draft.pairing);
            return Puzzle::from_layout(config, draft.tree_colors, solution);
        }

        log::warn!(
            "no valid layout within {} attempts for {:?}",
            self.max_attempts,
            config
        );
        Err(PuzzleError::GenerationFailed {
            attempts: self.max_attempts,
        })
    }
}

struct LayoutDraft {
    tree_colors: HashMap<Coord2, ColorId>,
    tents: HashMap<Coord2, ColorId>,
    pairing: HashMap<Coord2, Coord2>,
}

fn try_layout<R: Rng>(config: PuzzleConfig, rng: &mut R) -> Option<LayoutDraft> {
    let size = config.size;
    let pairs = usize::from(config.pair_count);

    let mut tree_colors: HashMap<Coord2, ColorId> = HashMap::new();
    let mut tents: HashMap<Coord2, ColorId> = HashMap::new();
    let mut pairing: HashMap<Coord2, Coord2> = HashMap::new();

    let mut cells: Vec<Coord2> = Vec::with_capacity(usize::from(config.total_cells()));
    for row in 0..size {
        for col in 0..size {
            cells.push((row, col));
        }
    }
    cells.shuffle(rng);

    for tent_pos in cells {
        if tents.len() >= pairs {
            break;
        }

        if tent_site_conflicts(size, &tents, tent_pos, config.allow_diagonal_tent_touch) {
            continue;
        }

        let mut adjacent: SmallVec<[Coord2; 4]> = ortho_neighbors(tent_pos, size).collect();
        adjacent.shuffle(rng);

        for tree_pos in adjacent {
            if tree_colors.contains_key(&tree_pos) || tents.contains_key(&tree_pos) {
                continue;
            }

            let tree_color: ColorId = rng.random_range(0..config.num_colors);
            if tree_color_conflicts(size, &tree_colors, tree_pos, tree_color) {
                continue;
            }

            let mut colors: SmallVec<[ColorId; 8]> = (0..config.num_colors).collect();
            colors.shuffle(rng);

            let chosen = colors.iter().copied().find(|&tent_color| {
                !tent_color_conflicts(size, &tree_colors, tent_pos, tent_color, tree_pos, tree_color)
            });

            if let Some(tent_color) = chosen {
                tents.insert(tent_pos, tent_color);
                tree_colors.insert(tree_pos, tree_color);
                pairing.insert(tree_pos, tent_pos);
                break;
            }
        }
    }

    (tents.len() == pairs).then_some(LayoutDraft {
        tree_colors,
        tents,
        pairing,
    })
}
