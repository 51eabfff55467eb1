use thiserror::Error;

use crate::{CellCount, Coord};

/// Why an action on a particular cell was refused.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidAction {
    #[error("coordinates are outside the board")]
    OutOfBounds,
    #[error("cell is already revealed")]
    AlreadyRevealed,
    #[error("cell is marked, unmark it first")]
    Marked,
    #[error("no cell has been revealed yet")]
    NotStarted,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board configuration: {width}x{height} with {mines} mines")]
    Configuration {
        width: Coord,
        height: Coord,
        mines: CellCount,
    },
    #[error("Mines were already placed on this board")]
    AlreadyPlaced,
    #[error("Game already ended, no new moves are accepted")]
    GameOver,
    #[error("Invalid action: {0}")]
    InvalidAction(#[from] InvalidAction),
    #[error("No unrevealed safe cell left to hint at")]
    NoHintAvailable,
}

pub type Result<T> = core::result::Result<T, GameError>;
