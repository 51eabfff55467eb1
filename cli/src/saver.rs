//! Save and restore the best times.
//!
//! The saved object is a serialization of [`BestTimes`] in JSON format.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use sapper_core::BestTimes;

pub struct ScoreFile {
    path: PathBuf,
}

impl ScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        log::debug!("Best times file: {path:?}");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored times, an absent file meaning nothing was stored yet.
    pub fn load(&self) -> anyhow::Result<BestTimes> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(BestTimes::new()),
            Err(error) => {
                return Err(error).with_context(|| format!("cannot open {:?}", self.path));
            }
        };
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("cannot parse best times from {:?}", self.path))
    }

    pub fn save(&self, scores: &BestTimes) -> anyhow::Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("cannot create {:?}", self.path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, scores)?;
        writer.flush()?;
        Ok(())
    }
}
