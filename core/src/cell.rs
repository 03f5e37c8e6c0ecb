use serde::{Deserialize, Serialize};

use crate::ColorId;

/// Canonical per-cell contents stored by the play board. Trees are stamped
/// once at level start and never change; tents come and go during play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Tree(ColorId),
    Tent(ColorId),
}

impl Cell {
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn is_tree(self) -> bool {
        matches!(self, Self::Tree(_))
    }

    pub const fn is_tent(self) -> bool {
        matches!(self, Self::Tent(_))
    }

    pub const fn color(self) -> Option<ColorId> {
        match self {
            Self::Empty => None,
            Self::Tree(color) => Some(color),
            Self::Tent(color) => Some(color),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_is_absent_only_on_empty_cells() {
        assert_eq!(Cell::Empty.color(), None);
        assert_eq!(Cell::Tree(2).color(), Some(2));
        assert_eq!(Cell::Tent(0).color(), Some(0));
    }

    #[test]
    fn serde_round_trip_preserves_variant_and_color() {
        let cell = Cell::Tent(3);
        let json = serde_json::to_string(&cell).unwrap();

        assert_eq!(serde_json::from_str::<Cell>(&json).unwrap(), cell);
    }
}
