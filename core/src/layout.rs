use alloc::vec::Vec;
use rand::prelude::*;
use smallvec::{SmallVec, smallvec};

use crate::*;

/// Strategy that decides where the mines of a [`Board`] go.
pub trait MineLayout {
    /// Places exactly the configured number of mines, keeping `excluded` free of them.
    fn place(&mut self, board: &mut Board, excluded: Coord2) -> Result<()>;
}

/// How much room is kept clear around the first revealed cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SafeZone {
    /// The cell and its 8 neighbours, so the first reveal always cascades.
    #[default]
    Neighborhood,
    /// Only the cell itself.
    CellOnly,
}

/// Uniformly random placement over every position outside the safe zone.
#[derive(Clone, Debug)]
pub struct RandomLayout {
    rng: SmallRng,
    safe_zone: SafeZone,
}

impl RandomLayout {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            safe_zone: SafeZone::default(),
        }
    }

    pub fn with_safe_zone(mut self, safe_zone: SafeZone) -> Self {
        self.safe_zone = safe_zone;
        self
    }

    pub fn safe_zone(&self) -> SafeZone {
        self.safe_zone
    }

    /// Cells that must stay free, shrinking to the single cell when the neighbourhood would leave
    /// too few positions for the mines.
    fn excluded_cells(&self, board: &Board, excluded: Coord2) -> SmallVec<[Coord2; 9]> {
        let mut zone: SmallVec<[Coord2; 9]> = smallvec![excluded];
        if self.safe_zone == SafeZone::Neighborhood {
            zone.extend(board.neighbors(excluded));
            let free = usize::from(board.config().total_cells()) - zone.len();
            if free < usize::from(board.mine_count()) {
                log::warn!(
                    "Cannot keep the neighborhood of {:?} clear with {} mines, fallback to the cell only",
                    excluded,
                    board.mine_count()
                );
                zone.truncate(1);
            }
        }
        zone
    }
}

impl MineLayout for RandomLayout {
    fn place(&mut self, board: &mut Board, excluded: Coord2) -> Result<()> {
        if board.mines_placed() {
            return Err(GameError::AlreadyPlaced);
        }
        let excluded = board.validate(excluded)?;
        let config = board.config();
        config.validate()?;

        let zone = self.excluded_cells(board, excluded);
        let mut candidates: Vec<Coord2> = board
            .iter_coords()
            .filter(|coords| !zone.contains(coords))
            .collect();

        let mines = usize::from(config.mines);
        if candidates.len() < mines {
            return Err(GameError::Configuration {
                width: config.width(),
                height: config.height(),
                mines: config.mines,
            });
        }

        // the first returned slice is a uniform sample of `mines` candidates
        let (chosen, _) = candidates.partial_shuffle(&mut self.rng, mines);
        board.place_mines(chosen.iter().copied())
    }
}

/// Predetermined mine positions, for replays and hand-made boards.
///
/// The excluded cell is not consulted, the positions are used as given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedLayout {
    mines: Vec<Coord2>,
}

impl FixedLayout {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }

    pub fn mines(&self) -> &[Coord2] {
        &self.mines
    }
}

impl MineLayout for FixedLayout {
    fn place(&mut self, board: &mut Board, excluded: Coord2) -> Result<()> {
        board.validate(excluded)?;
        if self.mines.contains(&excluded) {
            log::warn!("Fixed layout puts a mine on the first revealed cell {:?}", excluded);
        }
        board.place_mines(self.mines.iter().copied())
    }
}
