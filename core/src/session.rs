use core::fmt;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress (first reveal)
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_started(self) -> bool {
        !matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and no moves can be made anymore
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Time spent playing, kept at full precision and rounded to tenths of a second only for display.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ElapsedTime(Duration);

impl ElapsedTime {
    pub const ZERO: Self = Self(Duration::ZERO);

    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Whole tenths of a second, rounded half up.
    pub const fn tenths(self) -> u128 {
        (self.0.as_nanos() + 50_000_000) / 100_000_000
    }
}

impl fmt::Display for ElapsedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = self.tenths();
        write!(f, "{}.{}", tenths / 10, tenths % 10)
    }
}

/// What a successful reveal did to the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Safe cells opened, the game goes on.
    Revealed(CellCount),
    Lost,
    /// Last safe cell opened; the record is produced exactly once per session.
    Won(WinRecord),
}

// keeps the hint stream independent from the layout stream when both come from one seed
const HINT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Represents a game from the first reveal to a win or a loss.
///
/// The board is only created on the first reveal so the layout can keep that cell clear.
#[derive(Clone, Debug)]
pub struct GameSession<L: MineLayout = RandomLayout> {
    difficulty: Difficulty,
    config: BoardConfig,
    board: Option<Board>,
    layout: L,
    hints: HintSelector,
    elapsed: Duration,
    hints_used: u32,
    state: SessionState,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, seed: u64) -> Result<Self> {
        Self::with_layout(difficulty, RandomLayout::new(seed), seed)
    }
}

impl<L: MineLayout> GameSession<L> {
    pub fn with_layout(difficulty: Difficulty, layout: L, seed: u64) -> Result<Self> {
        let config = difficulty.config()?;
        log::debug!(
            "New {} session: {}x{} with {} mines",
            difficulty,
            config.width(),
            config.height(),
            config.mines
        );
        Ok(Self {
            difficulty,
            config,
            board: None,
            layout,
            hints: HintSelector::new(seed ^ HINT_SEED_SALT),
            elapsed: Duration::ZERO,
            hints_used: 0,
            state: SessionState::NotStarted,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    /// The board, once the first reveal has created it.
    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn elapsed(&self) -> ElapsedTime {
        ElapsedTime(self.elapsed)
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn mines_left(&self) -> isize {
        self.board
            .as_ref()
            .map_or(self.config.mines as isize, Board::mines_left)
    }

    /// Player-visible state of a cell; everything is hidden before the first reveal.
    pub fn view(&self, coords: Coord2) -> Result<CellView> {
        let coords = self.validate(coords)?;
        match &self.board {
            Some(board) => board.view(coords),
            None => Ok(CellView::Hidden),
        }
    }

    /// Advances the clock, ignored unless the game is in progress.
    pub fn tick(&mut self, delta: Duration) {
        if matches!(self.state, SessionState::InProgress) {
            self.elapsed = self.elapsed.saturating_add(delta);
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<SessionEvent> {
        self.check_not_terminal()?;
        let coords = self.validate(coords)?;

        if self.board.is_none() {
            let mut board = Board::new(self.config)?;
            self.layout.place(&mut board, coords)?;
            log::debug!("Session started at {:?}", coords);
            self.board = Some(board);
            self.state = SessionState::InProgress;
        }
        let board = self.board.as_mut().ok_or(InvalidAction::NotStarted)?;

        match board.reveal(coords)? {
            RevealOutcome::MineHit => {
                board.reveal_all_mines();
                self.state = SessionState::Lost;
                log::debug!("Lost after {}", ElapsedTime(self.elapsed));
                Ok(SessionEvent::Lost)
            }
            RevealOutcome::Revealed(_) if board.all_safe_revealed() => {
                self.state = SessionState::Won;
                let record = WinRecord {
                    difficulty: self.difficulty,
                    elapsed: ElapsedTime(self.elapsed),
                };
                log::debug!("Won in {} with {} hints", record.elapsed, self.hints_used);
                Ok(SessionEvent::Won(record))
            }
            RevealOutcome::Revealed(count) => Ok(SessionEvent::Revealed(count)),
        }
    }

    pub fn toggle_mark(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.active_board_mut()?.toggle_mark(coords)
    }

    /// Points at a random safe cell without opening it.
    pub fn request_hint(&mut self) -> Result<Coord2> {
        self.check_not_terminal()?;
        let board = self.board.as_ref().ok_or(InvalidAction::NotStarted)?;
        let hint = self.hints.select(board)?;
        self.hints_used += 1;
        Ok(hint)
    }

    /// Picks a hint among the unmarked cells and opens it straight away.
    pub fn reveal_hint(&mut self) -> Result<(Coord2, SessionEvent)> {
        self.check_not_terminal()?;
        let board = self.board.as_ref().ok_or(InvalidAction::NotStarted)?;
        let hint = self.hints.select_unmarked(board)?;
        self.hints_used += 1;
        let event = self.reveal(hint)?;
        Ok((hint, event))
    }

    fn validate(&self, coords: Coord2) -> Result<Coord2> {
        let (width, height) = self.config.size;
        if coords.0 < width && coords.1 < height {
            Ok(coords)
        } else {
            Err(InvalidAction::OutOfBounds.into())
        }
    }

    fn check_not_terminal(&self) -> Result<()> {
        if self.state.is_terminal() {
            Err(GameError::GameOver)
        } else {
            Ok(())
        }
    }

    fn active_board_mut(&mut self) -> Result<&mut Board> {
        self.check_not_terminal()?;
        Ok(self.board.as_mut().ok_or(InvalidAction::NotStarted)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn fixed(size: Coord2, mines: &[Coord2]) -> GameSession<FixedLayout> {
        let config = BoardConfig::new(size, mines.len() as CellCount).unwrap();
        GameSession::with_layout(Difficulty::Custom(config), FixedLayout::new(mines), 0).unwrap()
    }

    fn secs(secs: f64) -> Duration {
        Duration::from_secs_f64(secs)
    }

    #[test]
    fn reveal_then_hit_mine_ends_the_game() {
        // mines clear of the (0,0) corner and its neighbours
        let mut session = fixed((5, 5), &[(2, 2), (4, 0), (0, 4)]);
        assert_eq!(session.state(), SessionState::NotStarted);

        let event = session.reveal((0, 0)).unwrap();
        assert!(matches!(event, SessionEvent::Revealed(_)));
        assert_eq!(session.state(), SessionState::InProgress);

        assert_eq!(session.reveal((2, 2)), Ok(SessionEvent::Lost));
        assert_eq!(session.state(), SessionState::Lost);
        assert_eq!(session.reveal((4, 4)), Err(GameError::GameOver));
    }

    #[test]
    fn loss_exposes_every_mine() {
        let mut session = fixed((5, 5), &[(2, 2), (4, 0), (0, 4)]);
        session.reveal((0, 0)).unwrap();
        session.reveal((4, 0)).unwrap();

        assert_eq!(session.view((2, 2)), Ok(CellView::Mine));
        assert_eq!(session.view((0, 4)), Ok(CellView::Mine));
    }

    #[test]
    fn first_reveal_never_loses_with_random_layout() {
        let difficulty = Difficulty::Custom(BoardConfig::new((5, 5), 3).unwrap());
        for seed in 0..200 {
            let mut session = GameSession::new(difficulty, seed).unwrap();

            let event = session.reveal((0, 0)).unwrap();
            assert_ne!(event, SessionEvent::Lost, "seed {seed}");
            assert_eq!(session.view((0, 0)), Ok(CellView::Revealed(0)));
            assert!(session.state().is_started());
        }
    }

    #[test]
    fn win_carries_time_from_first_to_last_reveal() {
        let mut session = fixed((4, 1), &[(1, 0)]);
        session.tick(secs(5.0));
        assert_eq!(session.elapsed(), ElapsedTime::ZERO);

        assert_eq!(session.reveal((3, 0)), Ok(SessionEvent::Revealed(2)));
        session.tick(secs(1.25));
        session.tick(secs(0.5));

        let SessionEvent::Won(record) = session.reveal((0, 0)).unwrap() else {
            panic!("expected a win");
        };
        assert_eq!(session.state(), SessionState::Won);
        assert_eq!(record.difficulty, session.difficulty());
        assert_eq!(record.elapsed.as_duration(), secs(1.75));
        assert_eq!(record.elapsed.to_string(), "1.8");
    }

    #[test]
    fn clock_stops_after_the_game_ends() {
        let mut session = fixed((2, 1), &[(0, 0)]);
        assert!(matches!(session.reveal((1, 0)), Ok(SessionEvent::Won(_))));
        session.tick(secs(3.0));

        assert_eq!(session.elapsed(), ElapsedTime::ZERO);
    }

    #[test]
    fn marking_mines_does_not_win() {
        let mut session = fixed((4, 1), &[(1, 0)]);
        session.reveal((3, 0)).unwrap();
        session.toggle_mark((1, 0)).unwrap();

        assert_eq!(session.state(), SessionState::InProgress);
        assert!(matches!(session.reveal((0, 0)), Ok(SessionEvent::Won(_))));
    }

    #[test]
    fn no_action_is_accepted_after_a_win() {
        let mut session = fixed((2, 1), &[(0, 0)]);
        session.reveal((1, 0)).unwrap();

        assert_eq!(session.reveal((0, 0)), Err(GameError::GameOver));
        assert_eq!(session.toggle_mark((0, 0)), Err(GameError::GameOver));
        assert_eq!(session.request_hint(), Err(GameError::GameOver));
        assert_eq!(session.reveal_hint(), Err(GameError::GameOver));
    }

    #[test]
    fn repeated_reveal_is_rejected_without_side_effects() {
        let mut session = fixed((4, 1), &[(1, 0)]);
        session.reveal((3, 0)).unwrap();
        let board = session.board().cloned();

        assert_eq!(
            session.reveal((3, 0)),
            Err(GameError::InvalidAction(InvalidAction::AlreadyRevealed))
        );
        assert_eq!(session.board().cloned(), board);
        assert_eq!(session.state(), SessionState::InProgress);
    }

    #[test]
    fn out_of_bounds_first_reveal_does_not_start() {
        let mut session = fixed((3, 3), &[(1, 1)]);

        assert_eq!(
            session.reveal((3, 3)),
            Err(GameError::InvalidAction(InvalidAction::OutOfBounds))
        );
        assert_eq!(session.state(), SessionState::NotStarted);
        assert!(session.board().is_none());
    }

    #[test]
    fn actions_before_first_reveal_are_invalid() {
        let mut session = fixed((3, 3), &[(1, 1)]);

        assert_eq!(
            session.toggle_mark((0, 0)),
            Err(GameError::InvalidAction(InvalidAction::NotStarted))
        );
        assert_eq!(
            session.request_hint(),
            Err(GameError::InvalidAction(InvalidAction::NotStarted))
        );
        assert_eq!(session.view((0, 0)), Ok(CellView::Hidden));
        assert_eq!(session.mines_left(), 1);
    }

    #[test]
    fn mark_rejects_revealed_cells() {
        let mut session = fixed((4, 1), &[(1, 0)]);
        session.reveal((3, 0)).unwrap();

        assert_eq!(
            session.toggle_mark((2, 0)),
            Err(GameError::InvalidAction(InvalidAction::AlreadyRevealed))
        );
        assert_eq!(session.toggle_mark((0, 0)), Ok(MarkOutcome::Marked));
        assert_eq!(session.mines_left(), 0);
    }

    #[test]
    fn hint_points_at_last_safe_cell_and_counts_usage() {
        let mut session = fixed((4, 1), &[(1, 0)]);
        session.reveal((3, 0)).unwrap();

        assert_eq!(session.request_hint(), Ok((0, 0)));
        assert_eq!(session.request_hint(), Ok((0, 0)));
        assert_eq!(session.hints_used(), 2);
        assert_eq!(session.view((0, 0)), Ok(CellView::Hidden));
    }

    #[test]
    fn reveal_hint_opens_an_unmarked_safe_cell() {
        let mut session = fixed((4, 1), &[(1, 0)]);
        session.reveal((3, 0)).unwrap();

        let (hint, event) = session.reveal_hint().unwrap();

        assert_eq!(hint, (0, 0));
        assert!(matches!(event, SessionEvent::Won(_)));
        assert_eq!(session.hints_used(), 1);
    }

    #[test]
    fn reveal_hint_leaves_marked_cells_alone() {
        let mut session = fixed((4, 1), &[(1, 0)]);
        session.reveal((3, 0)).unwrap();
        session.toggle_mark((0, 0)).unwrap();

        assert_eq!(session.reveal_hint(), Err(GameError::NoHintAvailable));
        assert_eq!(session.view((0, 0)), Ok(CellView::Marked));
        assert_eq!(session.state(), SessionState::InProgress);
        assert_eq!(session.hints_used(), 0);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let difficulty = Difficulty::Custom(BoardConfig::new_unchecked((2, 2), 4));

        assert!(matches!(
            GameSession::new(difficulty, 0),
            Err(GameError::Configuration { .. })
        ));
    }

    #[test]
    fn elapsed_rounds_only_for_display() {
        let time = ElapsedTime::new(Duration::from_millis(12_345));

        assert_eq!(time.as_duration(), Duration::from_millis(12_345));
        assert_eq!(time.tenths(), 123);
        assert_eq!(time.to_string(), "12.3");
        assert_eq!(ElapsedTime::new(Duration::from_millis(59_960)).to_string(), "60.0");
    }
}
