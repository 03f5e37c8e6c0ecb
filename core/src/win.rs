use serde::{Deserialize, Serialize};

use crate::{BoardEvent, PlayBoard};

/// Level completion requires both a solved board and confirmation from the
/// movement layer that every entity has reached its assigned cell. The
/// predicate is only consulted once the board itself is solved.
pub fn check_win(board: &PlayBoard, entities_settled: impl FnOnce() -> bool) -> bool {
    board.is_solved() && entities_settled()
}

/// One-shot latch around [`check_win`]: the first observation that finds the
/// level complete queues [`BoardEvent::LevelWon`] and reports it, every
/// later observation is silent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinTracker {
    triggered: bool,
}

impl WinTracker {
    pub const fn new() -> Self {
        Self { triggered: false }
    }

    pub const fn has_triggered(&self) -> bool {
        self.triggered
    }

    /// Call on discrete progress events (a resolved move, an entity arrival).
    /// Returns true exactly once per level.
    pub fn observe(
        &mut self,
        board: &mut PlayBoard,
        entities_settled: impl FnOnce() -> bool,
    ) -> bool {
        if self.triggered {
            return false;
        }

        if !check_win(board, entities_settled) {
            return false;
        }

        self.triggered = true;
        board.push_event(BoardEvent::LevelWon);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Puzzle, PuzzleConfig, Solution};
    use hashbrown::HashMap;

    fn solved_board() -> PlayBoard {
        let config = PuzzleConfig::new(3, 1, 2, false);
        let trees = HashMap::from_iter([((0, 0), 0)]);
        let tents = HashMap::from_iter([((0, 1), 1)]);
        let pairing = HashMap::from_iter([((0, 0), (0, 1))]);
        let puzzle = Puzzle::from_layout(config, trees, Solution::new(tents, pairing)).unwrap();

        let mut board = PlayBoard::new(puzzle);
        board.place_tent((0, 1), 1);
        board.pop_event();
        board
    }

    #[test]
    fn check_win_requires_solved_and_settled() {
        let board = solved_board();

        assert!(check_win(&board, || true));
        assert!(!check_win(&board, || false));
    }

    #[test]
    fn settled_predicate_is_skipped_while_unsolved() {
        let mut board = solved_board();
        board.clear_cell((0, 1));

        assert!(!check_win(&board, || panic!("must not be consulted")));
    }

    #[test]
    fn tracker_fires_exactly_once() {
        let mut board = solved_board();
        let mut tracker = WinTracker::new();

        assert!(tracker.observe(&mut board, || true));
        assert!(tracker.has_triggered());
        assert_eq!(board.pop_event(), Some(BoardEvent::LevelWon));

        assert!(!tracker.observe(&mut board, || true));
        assert_eq!(board.pop_event(), None);
    }

    #[test]
    fn unsettled_entities_do_not_latch_the_tracker() {
        let mut board = solved_board();
        let mut tracker = WinTracker::new();

        assert!(!tracker.observe(&mut board, || false));
        assert!(!tracker.has_triggered());

        assert!(tracker.observe(&mut board, || true));
    }
}
