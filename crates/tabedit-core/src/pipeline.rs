//! The load → edit → write run, one stage at a time
//!
//! A [`Pipeline`] owns the table between stages and tracks where the run is.
//! Any failure moves it to [`Stage::Aborted`] and drops the table, so later
//! stages short-circuit with [`Error::NoTable`].

use crate::codec::Encoding;
use crate::edit::apply_edits;
use crate::error::{Error, Result};
use crate::loader::load_table;
use crate::table::Table;
use crate::writer::write_table;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Loaded,
    Edited,
    Written,
    Aborted,
}

/// A single run from a source file to a destination file
#[derive(Debug)]
pub struct Pipeline {
    source: PathBuf,
    destination: PathBuf,
    edits: Vec<String>,
    stage: Stage,
    table: Option<Table>,
}

impl Pipeline {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        edits: Vec<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            edits,
            stage: Stage::Start,
            table: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The table held between stages, if the run has not aborted
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn source_encoding(&self) -> Option<Encoding> {
        Encoding::from_path(&self.source)
    }

    pub fn destination_encoding(&self) -> Option<Encoding> {
        Encoding::from_path(&self.destination)
    }

    /// Start → Loaded
    pub fn load(&mut self) -> Result<&Table> {
        if self.stage != Stage::Start {
            return Err(self.abort(Error::NoTable));
        }

        match load_table(&self.source) {
            Ok(table) => {
                self.stage = Stage::Loaded;
                Ok(self.table.insert(table))
            }
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Loaded → Edited
    pub fn edit(&mut self) -> Result<&Table> {
        let table = self.take_table(Stage::Loaded)?;

        match apply_edits(table, &self.edits) {
            Ok(table) => {
                self.stage = Stage::Edited;
                Ok(self.table.insert(table))
            }
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Edited → Written
    pub fn write(&mut self) -> Result<&Table> {
        let table = self.take_table(Stage::Edited)?;

        match write_table(&table, &self.destination) {
            Ok(()) => {
                self.stage = Stage::Written;
                Ok(self.table.insert(table))
            }
            Err(e) => Err(self.abort(e)),
        }
    }

    /// Run every remaining stage and hand back the written table
    pub fn run(mut self) -> Result<Table> {
        self.load()?;
        self.edit()?;
        self.write()?;
        self.table.take().ok_or(Error::NoTable)
    }

    fn take_table(&mut self, expected: Stage) -> Result<Table> {
        match self.table.take() {
            Some(table) if self.stage == expected => Ok(table),
            _ => Err(self.abort(Error::NoTable)),
        }
    }

    fn abort(&mut self, error: Error) -> Error {
        debug!(
            stage = ?self.stage,
            source = %self.source.display(),
            error = %error,
            "run aborted"
        );
        self.stage = Stage::Aborted;
        self.table = None;
        error
    }
}
