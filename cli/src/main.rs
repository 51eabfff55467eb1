use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sapper_core::{Difficulty, GameSession};

use crate::app::App;
use crate::saver::ScoreFile;

mod app;
mod command;
mod render;
mod saver;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board to play: easy, normal, hard or WIDTHxHEIGHTxMINES
    #[arg(short, long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// File keeping the best time of each difficulty
    #[arg(long, default_value = "sapper-scores.json")]
    scores: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}");

    let score_file = ScoreFile::new(args.scores);
    let scores = score_file.load()?;
    let session = GameSession::new(args.difficulty, seed)
        .with_context(|| format!("cannot start a {} game", args.difficulty))?;

    let mut stdout = io::stdout().lock();
    let mut app = App::new(session, scores, score_file);
    app.run(io::stdin().lock(), &mut stdout)?;
    log::info!(
        "session ended {:?}, {} best times stored",
        app.session().state(),
        app.scores().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_args() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_custom_difficulty() {
        let args = Args::try_parse_from(["sapper", "-d", "9x9x10", "--seed", "4"]).unwrap();

        assert!(args.difficulty.is_custom());
        assert_eq!(args.seed, Some(4));
        assert_eq!(args.scores, PathBuf::from("sapper-scores.json"));
    }

    #[test]
    fn rejects_unknown_difficulty() {
        assert!(Args::try_parse_from(["sapper", "-d", "insane"]).is_err());
    }
}
