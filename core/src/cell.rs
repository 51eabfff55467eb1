use serde::{Deserialize, Serialize};

/// Full state of a single grid position, including what the player cannot see yet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_marked: bool,
    /// Number of mines among the up to 8 surrounding cells, only meaningful once mines are placed.
    pub adjacent_mines: u8,
}

impl Cell {
    /// Hidden cells that are neither mines nor already open.
    pub const fn is_hidden_safe(&self) -> bool {
        !self.is_revealed && !self.is_mine
    }

    /// What the player is allowed to see of this cell.
    pub const fn view(&self) -> CellView {
        match (self.is_revealed, self.is_mine, self.is_marked) {
            (true, true, _) => CellView::Mine,
            (true, false, _) => CellView::Revealed(self.adjacent_mines),
            (false, _, true) => CellView::Marked,
            (false, _, false) => CellView::Hidden,
        }
    }
}

/// Player-visible projection of a [`Cell`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Marked,
    Revealed(u8),
    Mine,
}

impl CellView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Marked)
    }
}
