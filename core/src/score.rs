use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use serde::{Deserialize, Serialize};

use crate::*;

/// Emitted once per winning session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRecord {
    pub difficulty: Difficulty,
    pub elapsed: ElapsedTime,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScoreUpdate {
    /// The record beat the stored time, or nothing was stored yet.
    NewBest { previous: Option<ElapsedTime> },
    NotImproved { best: ElapsedTime },
}

impl ScoreUpdate {
    pub const fn is_new_best(self) -> bool {
        matches!(self, Self::NewBest { .. })
    }
}

/// Keeps the best (lowest) winning time per difficulty.
///
/// Owned by the application and handed the [`WinRecord`] a session produces; durable storage is
/// the implementor's business.
pub trait ScoreStore {
    fn best(&self, difficulty: &Difficulty) -> Option<ElapsedTime>;

    fn submit(&mut self, record: WinRecord) -> ScoreUpdate;
}

/// In-memory [`ScoreStore`], keyed by the difficulty's display name so it serialises to a plain map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestTimes {
    best: BTreeMap<String, ElapsedTime>,
}

impl BestTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    /// Stored times ordered by difficulty name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ElapsedTime)> {
        self.best.iter().map(|(name, &time)| (name.as_str(), time))
    }
}

impl ScoreStore for BestTimes {
    fn best(&self, difficulty: &Difficulty) -> Option<ElapsedTime> {
        self.best.get(&difficulty.to_string()).copied()
    }

    fn submit(&mut self, record: WinRecord) -> ScoreUpdate {
        let key = record.difficulty.to_string();
        match self.best.get(&key).copied() {
            Some(best) if best <= record.elapsed => ScoreUpdate::NotImproved { best },
            previous => {
                log::debug!("New best time for {}: {}", key, record.elapsed);
                self.best.insert(key, record.elapsed);
                ScoreUpdate::NewBest { previous }
            }
        }
    }
}
