use hashbrown::{HashMap, HashSet};

use crate::*;

/// Authoritative whole-layout check. Accepts an arbitrary tree/tent
/// assignment, so it works on player-produced states as well as generator
/// output. Any single rule violation fails the whole assignment:
///
/// 1. every tree has exactly one tent among its orthogonal neighbors,
/// 2. no two tents touch under the configured tent adjacency,
/// 3. every tent is the matching tent of some tree,
/// 4. no two trees of the same color are king-adjacent,
/// 5. no tent stands on a tree cell,
/// 6. no tent shares a color with an orthogonally adjacent tree.
///
/// Rules 1 and 3 together force a one-to-one tree/tent pairing by counting
/// alone, without knowledge of the pairing the generator intended.
pub fn validate_layout(
    size: Coord,
    tree_colors: &HashMap<Coord2, ColorId>,
    tents: &HashMap<Coord2, ColorId>,
    allow_diagonal_tent_touch: bool,
) -> bool {
    let mut matched_tents: HashSet<Coord2> = HashSet::new();

    for &tree_pos in tree_colors.keys() {
        let mut matching = ortho_neighbors(tree_pos, size).filter(|pos| tents.contains_key(pos));

        let Some(first) = matching.next() else {
            return false;
        };
        if matching.next().is_some() {
            return false;
        }

        matched_tents.insert(first);
    }

    for &tent_pos in tents.keys() {
        for pos in tent_adjacency_neighbors(tent_pos, size, allow_diagonal_tent_touch) {
            if tents.contains_key(&pos) {
                return false;
            }
        }
    }

    if matched_tents.len() != tents.len() {
        return false;
    }

    for (&tree_pos, &color) in tree_colors {
        for pos in king_neighbors(tree_pos, size) {
            if tree_colors.get(&pos) == Some(&color) {
                return false;
            }
        }
    }

    for tent_pos in tents.keys() {
        if tree_colors.contains_key(tent_pos) {
            return false;
        }
    }

    for (&tent_pos, &tent_color) in tents {
        for pos in ortho_neighbors(tent_pos, size) {
            if tree_colors.get(&pos) == Some(&tent_color) {
                return false;
            }
        }
    }

    true
}

/// True when `pos` already holds a tent or touches one under the configured
/// tent adjacency. Used while a layout is still under construction.
pub fn tent_site_conflicts(
    size: Coord,
    tents: &HashMap<Coord2, ColorId>,
    pos: Coord2,
    allow_diagonal_tent_touch: bool,
) -> bool {
    if tents.contains_key(&pos) {
        return true;
    }

    tent_adjacency_neighbors(pos, size, allow_diagonal_tent_touch)
        .any(|neighbor| tents.contains_key(&neighbor))
}

/// True when a tree of `color` at `pos` would be king-adjacent to an
/// existing tree of the same color.
pub fn tree_color_conflicts(
    size: Coord,
    tree_colors: &HashMap<Coord2, ColorId>,
    pos: Coord2,
    color: ColorId,
) -> bool {
    king_neighbors(pos, size).any(|neighbor| tree_colors.get(&neighbor) == Some(&color))
}

/// True when a tent of `tent_color` at `tent_pos` would sit next to a tree of
/// the same color, counting the not-yet-committed tree at `new_tree_pos`.
pub fn tent_color_conflicts(
    size: Coord,
    tree_colors: &HashMap<Coord2, ColorId>,
    tent_pos: Coord2,
    tent_color: ColorId,
    new_tree_pos: Coord2,
    new_tree_color: ColorId,
) -> bool {
    for pos in ortho_neighbors(tent_pos, size) {
        if pos == new_tree_pos {
            if new_tree_color == tent_color {
                return true;
            }
            continue;
        }

        if tree_colors.get(&pos) == Some(&tent_color) {
            return true;
        }
    }

    false
}
