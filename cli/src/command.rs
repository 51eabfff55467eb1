use std::str::FromStr;

use anyhow::{Context, bail};
use sapper_core::Coord2;

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Mark(Coord2),
    Hint,
    RevealHint,
    Scores,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  r X Y   reveal the cell at column X, row Y
  m X Y   mark or unmark the cell
  h       show a safe cell
  H       reveal a safe cell
  s       best times
  ?       this help
  q       quit";

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(name) = words.next() else {
            bail!("empty command, type ? for help");
        };

        let command = match name {
            "r" | "reveal" => Self::Reveal(coords(&mut words)?),
            "m" | "mark" => Self::Mark(coords(&mut words)?),
            "h" | "hint" => Self::Hint,
            "H" | "open-hint" => Self::RevealHint,
            "s" | "scores" => Self::Scores,
            "?" | "help" => Self::Help,
            "q" | "quit" => Self::Quit,
            other => bail!("unknown command {other:?}, type ? for help"),
        };

        if words.next().is_some() {
            bail!("too many arguments for {name:?}");
        }
        Ok(command)
    }
}

fn coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> anyhow::Result<Coord2> {
    let mut axis = |name: &str| -> anyhow::Result<u8> {
        let word = words.next().with_context(|| format!("missing {name} coordinate"))?;
        word.parse()
            .with_context(|| format!("invalid {name} coordinate {word:?}"))
    };
    let x = axis("x")?;
    let y = axis("y")?;
    Ok((x, y))
}
