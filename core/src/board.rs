use alloc::collections::{BTreeSet, VecDeque};
use core::ops::Index;
use ndarray::Array2;
use serde::Serialize;

use crate::*;

/// The grid of cells for one game, with the bookkeeping needed to detect a win in constant time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Board {
    config: BoardConfig,
    cells: Array2<Cell>,
    mines_placed: bool,
    revealed_safe: CellCount,
    marked_count: CellCount,
}

impl Board {
    /// Empty board without mines, ready for a [`MineLayout`] to fill.
    pub fn new(config: BoardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cells: Array2::default(config.size.to_nd_index()),
            mines_placed: false,
            revealed_safe: 0,
            marked_count: 0,
        })
    }

    /// Hand-built board with mines at exactly `mine_coords`, duplicates ignored.
    pub fn with_mines(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let unique: BTreeSet<Coord2> = mine_coords.iter().copied().collect();
        let mines = unique
            .len()
            .try_into()
            .map_err(|_| GameError::Configuration {
                width: size.0,
                height: size.1,
                mines: CellCount::MAX,
            })?;
        let mut board = Self::new(BoardConfig::new(size, mines)?)?;
        board.place_mines(unique)?;
        Ok(board)
    }

    /// Puts mines on every coordinate in `mine_coords` and computes adjacency counts.
    ///
    /// The board is left untouched when anything is wrong with the input: mines already present,
    /// coordinates off the board, or a number of distinct positions different from the
    /// configured mine count.
    pub fn place_mines(&mut self, mine_coords: impl IntoIterator<Item = Coord2>) -> Result<()> {
        if self.mines_placed {
            return Err(GameError::AlreadyPlaced);
        }

        let mut unique = BTreeSet::new();
        for coords in mine_coords {
            unique.insert(self.validate(coords)?);
        }
        if unique.len() != usize::from(self.config.mines) {
            return Err(GameError::Configuration {
                width: self.config.width(),
                height: self.config.height(),
                mines: self.config.mines,
            });
        }

        for coords in unique {
            self.cell_mut(coords).is_mine = true;
        }
        self.recompute_adjacency();
        self.mines_placed = true;
        log::debug!(
            "Placed {} mines on a {}x{} board",
            self.config.mines,
            self.config.width(),
            self.config.height()
        );
        Ok(())
    }

    /// One pass over the whole grid setting every cell's adjacent mine count.
    pub fn recompute_adjacency(&mut self) {
        for coords in self.iter_coords() {
            let count = self.count_adjacent_mines(coords);
            self.cell_mut(coords).adjacent_mines = count;
        }
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn validate(&self, coords: Coord2) -> Result<Coord2> {
        let (width, height) = self.size();
        if coords.0 < width && coords.1 < height {
            Ok(coords)
        } else {
            Err(InvalidAction::OutOfBounds.into())
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<Cell> {
        Ok(self[self.validate(coords)?])
    }

    pub fn view(&self, coords: Coord2) -> Result<CellView> {
        Ok(self.cell(coords)?.view())
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Every coordinate on the board, row by row.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (width, height) = self.size();
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Coordinates of cells that are neither revealed nor mined.
    pub fn iter_hidden_safe(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_coords()
            .filter(|&coords| self[coords].is_hidden_safe())
    }

    pub fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        let count = self.neighbors(coords).filter(|&pos| self[pos].is_mine).count();
        // at most 8 neighbours
        count as u8
    }

    pub fn revealed_safe_count(&self) -> CellCount {
        self.revealed_safe
    }

    pub fn safe_remaining(&self) -> CellCount {
        self.config.safe_cells().saturating_sub(self.revealed_safe)
    }

    pub fn all_safe_revealed(&self) -> bool {
        self.safe_remaining() == 0
    }

    pub fn marked_count(&self) -> CellCount {
        self.marked_count
    }

    /// Mines not accounted for by a mark, negative when the player over-marks.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.marked_count as isize)
    }

    /// Opens `coords`, cascading through zero-count regions.
    ///
    /// The cascade is an iterative breadth-first expansion over the 8-neighbourhood: each cell is
    /// visited at most once, zero cells keep expanding, numbered cells are revealed but stop the
    /// expansion. Marked cells and mines are never opened by the cascade.
    ///
    /// Adjacency counts only exist once mines are placed, so an empty board refuses reveals.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate(coords)?;
        if !self.mines_placed {
            return Err(InvalidAction::NotStarted.into());
        }
        let cell = self[coords];

        if cell.is_revealed {
            return Err(InvalidAction::AlreadyRevealed.into());
        }
        if cell.is_marked {
            return Err(InvalidAction::Marked.into());
        }

        if cell.is_mine {
            self.cell_mut(coords).is_revealed = true;
            log::debug!("Mine hit at {:?}", coords);
            return Ok(RevealOutcome::MineHit);
        }

        self.open_safe(coords);
        let mut opened: CellCount = 1;

        if cell.adjacent_mines == 0 {
            let mut visited = BTreeSet::from([coords]);
            let mut to_visit: VecDeque<Coord2> = self.cascade_candidates(coords).collect();
            log::trace!("Starting flood fill from {:?}, neighbors: {:?}", coords, to_visit);

            while let Some(visit_coords) = to_visit.pop_front() {
                if !visited.insert(visit_coords) {
                    continue;
                }

                let visit = self[visit_coords];
                if visit.is_revealed || visit.is_marked || visit.is_mine {
                    continue;
                }

                self.open_safe(visit_coords);
                opened += 1;
                log::trace!(
                    "Flood opened {:?}, adjacent mines: {}",
                    visit_coords,
                    visit.adjacent_mines
                );

                if visit.adjacent_mines == 0 {
                    to_visit.extend(
                        self.cascade_candidates(visit_coords)
                            .filter(|pos| !visited.contains(pos)),
                    );
                }
            }
        }

        log::debug!("Revealed {} cells from {:?}", opened, coords);
        Ok(RevealOutcome::Revealed(opened))
    }

    /// Flips the mark on an unrevealed cell.
    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.validate(coords)?;
        if self[coords].is_revealed {
            return Err(InvalidAction::AlreadyRevealed.into());
        }

        let cell = self.cell_mut(coords);
        cell.is_marked = !cell.is_marked;
        Ok(if cell.is_marked {
            self.marked_count += 1;
            MarkOutcome::Marked
        } else {
            self.marked_count -= 1;
            MarkOutcome::Unmarked
        })
    }

    /// Exposes every mine, used once the game is lost.
    pub fn reveal_all_mines(&mut self) {
        for coords in self.iter_coords() {
            let cell = self.cell_mut(coords);
            if cell.is_mine {
                cell.is_revealed = true;
            }
        }
    }

    fn open_safe(&mut self, coords: Coord2) {
        self.cell_mut(coords).is_revealed = true;
        self.revealed_safe = self.revealed_safe.saturating_add(1);
    }

    fn cascade_candidates(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.neighbors(coords).filter(|&pos| {
            let cell = self[pos];
            !cell.is_revealed && !cell.is_marked && !cell.is_mine
        })
    }

    fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
