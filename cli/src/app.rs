use std::io::{BufRead, Write};
use std::time::Instant;

use sapper_core::{
    BestTimes, GameSession, MineLayout, RandomLayout, ScoreStore, ScoreUpdate, SessionEvent,
    WinRecord,
};

use crate::command::{Command, HELP};
use crate::render;
use crate::saver::ScoreFile;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Drives one session from line-based input, feeding it wall-clock ticks and storing a winning
/// time.
pub struct App<L: MineLayout = RandomLayout> {
    session: GameSession<L>,
    scores: BestTimes,
    score_file: ScoreFile,
    last_input: Instant,
}

impl<L: MineLayout> App<L> {
    pub fn new(session: GameSession<L>, scores: BestTimes, score_file: ScoreFile) -> Self {
        Self {
            session,
            scores,
            score_file,
            last_input: Instant::now(),
        }
    }

    pub fn session(&self) -> &GameSession<L> {
        &self.session
    }

    pub fn scores(&self) -> &BestTimes {
        &self.scores
    }

    /// Reads commands until the player quits, the game ends or input runs out.
    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> anyhow::Result<()> {
        self.show(out)?;
        writeln!(out, "type ? for help")?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            self.tick();

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(out, "{err:#}")?;
                    continue;
                }
            };
            log::debug!("command: {command:?}");

            if self.handle(command, out)? == Flow::Quit {
                break;
            }
            if self.session.is_finished() {
                writeln!(
                    out,
                    "game over, {} after {}s",
                    render::state_label(self.session.state()),
                    self.session.elapsed()
                )?;
                break;
            }
        }
        Ok(())
    }

    fn tick(&mut self) {
        let now = Instant::now();
        self.session.tick(now.duration_since(self.last_input));
        self.last_input = now;
    }

    fn handle(&mut self, command: Command, out: &mut impl Write) -> anyhow::Result<Flow> {
        match command {
            Command::Reveal(coords) => {
                let event = self.session.reveal(coords);
                self.apply(event, out)?;
            }
            Command::RevealHint => {
                let event = self.session.reveal_hint().map(|((x, y), event)| {
                    log::debug!("hint opened {x} {y}");
                    event
                });
                self.apply(event, out)?;
            }
            Command::Mark(coords) => match self.session.toggle_mark(coords) {
                Ok(_) => self.show(out)?,
                Err(err) => writeln!(out, "ignored: {err}")?,
            },
            Command::Hint => match self.session.request_hint() {
                Ok((x, y)) => writeln!(out, "try {x} {y}")?,
                Err(err) => writeln!(out, "ignored: {err}")?,
            },
            Command::Scores => self.show_scores(out)?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn apply(
        &mut self,
        event: sapper_core::Result<SessionEvent>,
        out: &mut impl Write,
    ) -> anyhow::Result<()> {
        match event {
            Ok(SessionEvent::Won(record)) => {
                self.show(out)?;
                self.record_win(record, out)
            }
            Ok(_) => self.show(out),
            Err(err) => {
                writeln!(out, "ignored: {err}")?;
                Ok(())
            }
        }
    }

    fn record_win(&mut self, record: WinRecord, out: &mut impl Write) -> anyhow::Result<()> {
        match self.scores.submit(record) {
            ScoreUpdate::NewBest { previous: Some(previous) } => {
                writeln!(out, "new best time {}s, was {previous}s", record.elapsed)?;
            }
            ScoreUpdate::NewBest { previous: None } => {
                writeln!(out, "first win on {}: {}s", record.difficulty, record.elapsed)?;
            }
            ScoreUpdate::NotImproved { best } => {
                writeln!(out, "won in {}s, best is {best}s", record.elapsed)?;
                return Ok(());
            }
        }
        self.score_file.save(&self.scores)?;
        log::info!("best times saved to {:?}", self.score_file.path());
        Ok(())
    }

    fn show(&self, out: &mut impl Write) -> anyhow::Result<()> {
        write!(out, "{}", render::board(&self.session))?;
        writeln!(out, "{}", render::status(&self.session))?;
        Ok(())
    }

    fn show_scores(&self, out: &mut impl Write) -> anyhow::Result<()> {
        if self.scores.is_empty() {
            writeln!(out, "no best times yet")?;
        }
        for (difficulty, time) in self.scores.iter() {
            writeln!(out, "{difficulty:>10} {time}s")?;
        }
        Ok(())
    }
}
