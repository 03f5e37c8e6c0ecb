use alloc::collections::VecDeque;
use core::num::Saturating;
use hashbrown::HashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Notification raised by the board for the feedback layer to drain. A
/// successful tent write pushes exactly one of the two position events;
/// [`WinTracker`](crate::WinTracker) pushes `LevelWon` at most once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    PositionValid(Coord2),
    PositionInvalid(Coord2),
    LevelWon,
}

/// Mutable per-cell state of a level in play. Seeded from a [`Puzzle`] with
/// the trees stamped in, then updated one move at a time. Single-writer: the
/// surrounding system serializes moves before they reach the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayBoard {
    puzzle: Puzzle,
    board: Array2<Cell>,
    tents_placed: Saturating<CellCount>,
    events: VecDeque<BoardEvent>,
}

impl PlayBoard {
    pub fn new(puzzle: Puzzle) -> Self {
        let size = usize::from(puzzle.size());
        let mut this = Self {
            puzzle,
            board: Array2::default([size, size]),
            tents_placed: Saturating(0),
            events: VecDeque::new(),
        };
        this.stamp_trees();
        this
    }

    /// Returns the board to its level-start state: trees stamped, everything
    /// else empty, no pending events. Resetting a fresh board is a no-op.
    pub fn reset(&mut self) {
        self.board.fill(Cell::Empty);
        self.tents_placed = Saturating(0);
        self.events.clear();
        self.stamp_trees();
    }

    fn stamp_trees(&mut self) {
        for (&pos, &color) in self.puzzle.tree_colors() {
            self.board[pos.to_nd_index()] = Cell::Tree(color);
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub const fn size(&self) -> Coord {
        self.puzzle.size()
    }

    pub fn tents_placed(&self) -> CellCount {
        self.tents_placed.0
    }

    /// How many tents still have to be placed to match the pair count.
    pub fn pairs_left(&self) -> isize {
        (self.puzzle.config().pair_count as isize) - (self.tents_placed.0 as isize)
    }

    /// Out-of-bounds coordinates read as empty; move resolution probes past
    /// the rim and must not need bounds pre-checks.
    pub fn cell_at(&self, coords: Coord2) -> Cell {
        if !in_bounds(coords, self.size()) {
            return Cell::Empty;
        }
        self.board[coords.to_nd_index()]
    }

    pub fn is_cell_free(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size()) && self.board[coords.to_nd_index()].is_empty()
    }

    /// A cell a tent may legally sit on or move onto: in bounds and not a
    /// tree.
    pub fn is_valid_move_position(&self, coords: Coord2) -> bool {
        in_bounds(coords, self.size())
            && matches!(self.board[coords.to_nd_index()], Cell::Empty | Cell::Tent(_))
    }

    /// Prospective placement check for a tent of `color` on a still-empty
    /// cell.
    pub fn is_valid_tent_placement(&self, coords: Coord2, color: ColorId) -> bool {
        if !in_bounds(coords, self.size()) {
            return false;
        }

        if !self.board[coords.to_nd_index()].is_empty() {
            return false;
        }

        !self.touches_tent(coords) && self.has_tree_support(coords, color)
    }

    /// Like [`is_valid_tent_placement`](Self::is_valid_tent_placement) but for
    /// a coordinate that may already hold the tent being evaluated:
    /// self-occupancy by a tent of the same color is not a conflict.
    pub fn is_valid_tent_position(&self, coords: Coord2, color: ColorId) -> bool {
        if !in_bounds(coords, self.size()) {
            return false;
        }

        match self.board[coords.to_nd_index()] {
            Cell::Tree(_) => return false,
            Cell::Tent(occupant) if occupant != color => return false,
            Cell::Empty | Cell::Tent(_) => {}
        }

        !self.touches_tent(coords) && self.has_tree_support(coords, color)
    }

    fn touches_tent(&self, coords: Coord2) -> bool {
        let allow_diagonal = self.puzzle.allow_diagonal_tent_touch();
        tent_adjacency_neighbors(coords, self.size(), allow_diagonal)
            .any(|pos| self.board[pos.to_nd_index()].is_tent())
    }

    /// At least one orthogonal tree neighbor, and none of them of `color`.
    fn has_tree_support(&self, coords: Coord2, color: ColorId) -> bool {
        let mut has_tree = false;
        for pos in ortho_neighbors(coords, self.size()) {
            if let Cell::Tree(tree_color) = self.board[pos.to_nd_index()] {
                if tree_color == color {
                    return false;
                }
                has_tree = true;
            }
        }
        has_tree
    }

    /// Applies one move. Rejected without mutation when `coords` is out of
    /// bounds or when the move would change a tree cell into something else.
    /// Writing a tent queues a [`BoardEvent`] with the local validity of the
    /// new position.
    pub fn update_cell(&mut self, coords: Coord2, cell: Cell) -> UpdateOutcome {
        if !in_bounds(coords, self.size()) {
            return UpdateOutcome::Rejected;
        }

        let existing = self.board[coords.to_nd_index()];
        if existing.is_tree() && !cell.is_tree() {
            return UpdateOutcome::Rejected;
        }

        if existing.is_tent() {
            self.tents_placed -= 1;
        }
        if cell.is_tent() {
            self.tents_placed += 1;
        }
        self.board[coords.to_nd_index()] = cell;

        if let Cell::Tent(color) = cell {
            let event = if self.is_valid_tent_position(coords, color) {
                BoardEvent::PositionValid(coords)
            } else {
                BoardEvent::PositionInvalid(coords)
            };
            self.events.push_back(event);
        }

        UpdateOutcome::Applied
    }

    pub fn place_tent(&mut self, coords: Coord2, color: ColorId) -> UpdateOutcome {
        self.update_cell(coords, Cell::Tent(color))
    }

    pub fn clear_cell(&mut self, coords: Coord2) -> UpdateOutcome {
        self.update_cell(coords, Cell::Empty)
    }

    /// Whole-board check against the full rule set. Rebuilt from live cell
    /// state on each call; meant for discrete move events, not per frame.
    pub fn is_solved(&self) -> bool {
        let mut tents: HashMap<Coord2, ColorId> = HashMap::new();
        for row in 0..self.size() {
            for col in 0..self.size() {
                if let Cell::Tent(color) = self.board[(row, col).to_nd_index()] {
                    tents.insert((row, col), color);
                }
            }
        }

        validate_layout(
            self.size(),
            self.puzzle.tree_colors(),
            &tents,
            self.puzzle.allow_diagonal_tent_touch(),
        )
    }

    pub fn pop_event(&mut self) -> Option<BoardEvent> {
        self.events.pop_front()
    }

    pub(crate) fn push_event(&mut self, event: BoardEvent) {
        self.events.push_back(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pair_puzzle() -> Puzzle {
        let config = PuzzleConfig::new(3, 2, 2, false);
        let trees = HashMap::from_iter([((0, 0), 0), ((2, 2), 1)]);
        let tents = HashMap::from_iter([((0, 1), 1), ((2, 1), 0)]);
        let pairing = HashMap::from_iter([((0, 0), (0, 1)), ((2, 2), (2, 1))]);
        Puzzle::from_layout(config, trees, Solution::new(tents, pairing)).unwrap()
    }

    #[test]
    fn new_stamps_trees_and_leaves_the_rest_empty() {
        let board = PlayBoard::new(two_pair_puzzle());

        assert_eq!(board.cell_at((0, 0)), Cell::Tree(0));
        assert_eq!(board.cell_at((2, 2)), Cell::Tree(1));
        assert_eq!(board.cell_at((1, 1)), Cell::Empty);
        assert_eq!(board.tents_placed(), 0);
    }

    #[test]
    fn reset_restores_the_level_start_state() {
        let mut board = PlayBoard::new(two_pair_puzzle());
        board.place_tent((1, 1), 0);
        board.reset();

        assert_eq!(board, PlayBoard::new(two_pair_puzzle()));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut board = PlayBoard::new(two_pair_puzzle());
        let mut twice = PlayBoard::new(two_pair_puzzle());
        board.reset();
        twice.reset();
        twice.reset();

        assert_eq!(board, twice);
    }

    #[test]
    fn out_of_bounds_reads_are_empty_and_not_free() {
        let board = PlayBoard::new(two_pair_puzzle());

        assert_eq!(board.cell_at((3, 0)), Cell::Empty);
        assert!(!board.is_cell_free((0, 3)));
        assert!(board.is_cell_free((1, 1)));
    }

    #[test]
    fn update_rejects_out_of_bounds_coords() {
        let mut board = PlayBoard::new(two_pair_puzzle());

        let outcome = board.update_cell((3, 3), Cell::Tent(0));

        assert_eq!(outcome, UpdateOutcome::Rejected);
        assert_eq!(board.pop_event(), None);
    }

    #[test]
    fn update_rejects_overwriting_a_tree() {
        let mut board = PlayBoard::new(two_pair_puzzle());

        assert_eq!(board.update_cell((0, 0), Cell::Tent(1)), UpdateOutcome::Rejected);
        assert_eq!(board.update_cell((0, 0), Cell::Empty), UpdateOutcome::Rejected);
        assert_eq!(board.cell_at((0, 0)), Cell::Tree(0));
    }

    #[test]
    fn tree_to_tree_writes_are_allowed() {
        let mut board = PlayBoard::new(two_pair_puzzle());

        assert_eq!(board.update_cell((0, 0), Cell::Tree(0)), UpdateOutcome::Applied);
        assert_eq!(board.cell_at((0, 0)), Cell::Tree(0));
    }

    #[test]
    fn placing_a_tent_queues_exactly_one_validity_event() {
        let mut board = PlayBoard::new(two_pair_puzzle());

        board.place_tent((0, 1), 1);

        assert_eq!(board.pop_event(), Some(BoardEvent::PositionValid((0, 1))));
        assert_eq!(board.pop_event(), None);
    }

    #[test]
    fn tent_without_tree_support_is_reported_invalid() {
        let mut board = PlayBoard::new(two_pair_puzzle());

        board.place_tent((1, 1), 0);

        assert_eq!(board.pop_event(), Some(BoardEvent::PositionInvalid((1, 1))));
    }

    #[test]
    fn clearing_a_cell_queues_no_event() {
        let mut board = PlayBoard::new(two_pair_puzzle());
        board.place_tent((0, 1), 1);
        board.pop_event();

        board.clear_cell((0, 1));

        assert_eq!(board.pop_event(), None);
        assert_eq!(board.tents_placed(), 0);
    }

    #[test]
    fn move_position_allows_empty_and_tent_cells_only() {
        let mut board = PlayBoard::new(two_pair_puzzle());
        board.place_tent((0, 1), 1);

        assert!(board.is_valid_move_position((1, 1)));
        assert!(board.is_valid_move_position((0, 1)));
        assert!(!board.is_valid_move_position((0, 0)));
        assert!(!board.is_valid_move_position((3, 1)));
    }

    #[test]
    fn placement_check_requires_an_empty_cell() {
        let mut board = PlayBoard::new(two_pair_puzzle());
        board.place_tent((0, 1), 1);

        assert!(!board.is_valid_tent_placement((0, 1), 1));
        assert!(board.is_valid_tent_position((0, 1), 1));
    }

    #[test]
    fn position_check_tolerates_self_occupancy_but_not_other_colors() {
        let mut board = PlayBoard::new(two_pair_puzzle());
        board.place_tent((2, 1), 0);

        assert!(board.is_valid_tent_position((2, 1), 0));
        assert!(!board.is_valid_tent_position((2, 1), 1));
    }

    #[test]
    fn placement_rejects_same_color_adjacent_tree_even_with_other_support() {
        let config = PuzzleConfig::new(3, 2, 3, false);
        let trees = HashMap::from_iter([((0, 0), 0), ((1, 1), 1)]);
        let solution = Solution::new(HashMap::new(), HashMap::new());
        let puzzle = Puzzle::from_layout(config, trees, solution).unwrap();
        let board = PlayBoard::new(puzzle);

        // (0, 1) is orthogonal to both trees: color 2 clashes with neither,
        // colors 0 and 1 each clash with one.
        assert!(board.is_valid_tent_placement((0, 1), 2));
        assert!(!board.is_valid_tent_placement((0, 1), 0));
        assert!(!board.is_valid_tent_placement((0, 1), 1));
    }

    #[test]
    fn placement_rejects_cells_touching_a_tent() {
        let mut board = PlayBoard::new(two_pair_puzzle());
        board.place_tent((0, 1), 1);

        // (1, 0) is diagonal to the tent at (0, 1); diagonal touch is
        // forbidden for this puzzle.
        assert!(!board.is_valid_tent_placement((1, 0), 1));
    }

    #[test]
    fn replaying_the_solution_solves_the_board() {
        let puzzle = two_pair_puzzle();
        let tents: alloc::vec::Vec<_> = puzzle
            .solution()
            .tents()
            .iter()
            .map(|(&pos, &color)| (pos, color))
            .collect();
        let mut board = PlayBoard::new(puzzle);

        for &(pos, color) in &tents {
            assert!(board.place_tent(pos, color).was_applied());
        }
        assert!(board.is_solved());

        let (removed, _) = tents[0];
        board.clear_cell(removed);
        assert!(!board.is_solved());
    }

    #[test]
    fn misplaced_tents_do_not_solve_the_board() {
        let mut board = PlayBoard::new(two_pair_puzzle());
        board.place_tent((0, 1), 1);
        board.place_tent((1, 2), 0);

        assert!(!board.is_solved());
    }

    #[test]
    fn pairs_left_tracks_tent_writes() {
        let mut board = PlayBoard::new(two_pair_puzzle());
        assert_eq!(board.pairs_left(), 2);

        board.place_tent((0, 1), 1);
        assert_eq!(board.pairs_left(), 1);

        board.clear_cell((0, 1));
        assert_eq!(board.pairs_left(), 2);
    }
}
