use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

/// Named board configuration, fixed for the lifetime of a session.
///
/// `Easy` and `Hard` are derived from the `Normal` baseline: every field is halved (rounded down)
/// for `Easy` and multiplied by 1.5 (rounded up) for `Hard`, then re-validated.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
    Custom(BoardConfig),
}

impl Difficulty {
    pub const NORMAL_BASELINE: BoardConfig = BoardConfig::new_unchecked((16, 16), 40);

    pub const PRESETS: [Difficulty; 3] = [Self::Easy, Self::Normal, Self::Hard];

    pub fn config(&self) -> Result<BoardConfig> {
        self.config_from(Self::NORMAL_BASELINE)
    }

    /// Resolves the board configuration relative to `baseline`, which plays the part of `Normal`.
    pub fn config_from(&self, baseline: BoardConfig) -> Result<BoardConfig> {
        let config = match self {
            Self::Easy => scale(baseline, |v| v / 2),
            Self::Normal => baseline,
            Self::Hard => scale(baseline, |v| (3 * v).div_ceil(2)),
            Self::Custom(config) => *config,
        };
        config.validate()?;
        Ok(config)
    }

    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    pub const fn preset_name(&self) -> Option<&'static str> {
        match self {
            Self::Easy => Some("easy"),
            Self::Normal => Some("normal"),
            Self::Hard => Some("hard"),
            Self::Custom(_) => None,
        }
    }
}

fn scale(baseline: BoardConfig, f: impl Fn(u32) -> u32) -> BoardConfig {
    let axis = |v: Coord| f(v.into()).clamp(1, Coord::MAX.into()) as Coord;
    let mines = f(baseline.mines.into()).min(CellCount::MAX.into()) as CellCount;
    BoardConfig::new_unchecked((axis(baseline.width()), axis(baseline.height())), mines)
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Self::Custom(config) = self {
            return write!(f, "{}x{}x{}", config.width(), config.height(), config.mines);
        }
        f.write_str(self.preset_name().unwrap_or_default())
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("expected easy, normal, hard or WIDTHxHEIGHTxMINES")]
pub struct ParseDifficultyError;

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(preset) = Self::PRESETS
            .into_iter()
            .find(|preset| preset.preset_name().is_some_and(|name| s.eq_ignore_ascii_case(name)))
        {
            return Ok(preset);
        }

        let mut parts = s.split(['x', 'X']);
        let width = field(parts.next())?;
        let height = field(parts.next())?;
        let mines = field(parts.next())?;
        if parts.next().is_some() {
            return Err(ParseDifficultyError);
        }
        let config = BoardConfig::new((width, height), mines).map_err(|_| ParseDifficultyError)?;
        Ok(Self::Custom(config))
    }
}

fn field<T: FromStr>(part: Option<&str>) -> core::result::Result<T, ParseDifficultyError> {
    part.and_then(|part| part.trim().parse().ok())
        .ok_or(ParseDifficultyError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn presets_scale_from_normal() {
        assert_eq!(
            Difficulty::Easy.config(),
            Ok(BoardConfig::new_unchecked((8, 8), 20))
        );
        assert_eq!(
            Difficulty::Normal.config(),
            Ok(BoardConfig::new_unchecked((16, 16), 40))
        );
        assert_eq!(
            Difficulty::Hard.config(),
            Ok(BoardConfig::new_unchecked((24, 24), 60))
        );
    }

    #[test]
    fn scaled_presets_keep_a_safe_cell() {
        for difficulty in Difficulty::PRESETS {
            let config = difficulty.config().unwrap();
            assert!(config.mines < config.total_cells(), "{difficulty}");
        }
    }

    #[test]
    fn odd_baseline_rounds_down_for_easy_and_up_for_hard() {
        let baseline = BoardConfig::new((9, 7), 11).unwrap();

        assert_eq!(
            Difficulty::Easy.config_from(baseline),
            Ok(BoardConfig::new_unchecked((4, 3), 5))
        );
        assert_eq!(
            Difficulty::Hard.config_from(baseline),
            Ok(BoardConfig::new_unchecked((14, 11), 17))
        );
    }

    #[test]
    fn dense_baseline_is_revalidated() {
        // 1x1 easy board would need 1 mine on a single cell
        let baseline = BoardConfig::new((2, 2), 3).unwrap();

        assert!(matches!(
            Difficulty::Easy.config_from(baseline),
            Err(GameError::Configuration { .. })
        ));
    }

    #[test]
    fn custom_config_is_validated() {
        let invalid = Difficulty::Custom(BoardConfig::new_unchecked((2, 2), 4));
        assert!(invalid.config().is_err());
    }

    #[test]
    fn display_and_parse_agree() {
        let custom = Difficulty::Custom(BoardConfig::new((5, 5), 3).unwrap());
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard, custom] {
            assert_eq!(difficulty.to_string().parse(), Ok(difficulty));
        }
        assert_eq!("HARD".parse(), Ok(Difficulty::Hard));
        assert_eq!(custom.to_string(), "5x5x3");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("medium".parse::<Difficulty>(), Err(ParseDifficultyError));
        assert_eq!("5x5".parse::<Difficulty>(), Err(ParseDifficultyError));
        assert_eq!("5x5x3x1".parse::<Difficulty>(), Err(ParseDifficultyError));
        assert_eq!("2x2x4".parse::<Difficulty>(), Err(ParseDifficultyError));
    }
}
