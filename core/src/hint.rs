use alloc::vec::Vec;
use rand::prelude::*;

use crate::*;

/// Picks a random safe cell the player has not opened yet.
#[derive(Clone, Debug)]
pub struct HintSelector {
    rng: SmallRng,
}

impl HintSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Chooses uniformly among every unrevealed, mine-free cell. Marked cells are eligible.
    ///
    /// The board is not touched; showing or opening the hinted cell is up to the caller.
    pub fn select(&mut self, board: &Board) -> Result<Coord2> {
        self.pick(board.iter_hidden_safe().collect())
    }

    /// Same as [`select`](Self::select) but leaves the cells the player marked alone.
    pub fn select_unmarked(&mut self, board: &Board) -> Result<Coord2> {
        self.pick(
            board
                .iter_hidden_safe()
                .filter(|&coords| !board[coords].is_marked)
                .collect(),
        )
    }

    fn pick(&mut self, candidates: Vec<Coord2>) -> Result<Coord2> {
        let hint = candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or(GameError::NoHintAvailable)?;
        log::debug!("Hint at {:?} out of {} candidates", hint, candidates.len());
        Ok(hint)
    }
}
