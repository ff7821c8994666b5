//! Reporting collaborators: the per-step snapshot record, the CSV writer
//! that persists the snapshot log, and the read-only scenario summary.
//!
//! Nothing here makes decisions; the engine hands these types data.

use std::fmt::{self, Display};
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

use csv::Writer;
use serde::{Deserialize, Serialize};

use crate::error::HerdsimError;
use crate::log::trace;

/// Aggregate state of the simulation at the end of one step. One of these is
/// appended to the engine's history per step; the full ordered sequence is
/// what [`SnapshotReport`] persists.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepSnapshot {
    pub time_step: usize,
    pub currently_infected: usize,
    pub total_infected_so_far: usize,
    pub alive: usize,
    pub dead: usize,
}

/// Customizable file options for report output.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub directory: PathBuf,
    pub overwrite: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            directory: PathBuf::from("."),
            overwrite: false,
        }
    }
}

impl ReportOptions {
    /// Sets the directory report files are created in.
    pub fn directory(&mut self, directory: PathBuf) -> &mut Self {
        self.directory = directory;
        self
    }

    /// Sets whether an existing report file may be replaced.
    pub fn overwrite(&mut self, overwrite: bool) -> &mut Self {
        self.overwrite = overwrite;
        self
    }
}

/// Appends [`StepSnapshot`] records to a CSV file, one row per step with a
/// header row naming the five snapshot fields. Rows are flushed as they are
/// written so a partial run still leaves readable output.
#[derive(Debug)]
pub struct SnapshotReport {
    path: PathBuf,
    writer: Writer<File>,
}

impl SnapshotReport {
    /// Creates `<directory>/<name>.csv`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns a `HerdsimError` if the directory or file cannot be created,
    /// or if the file already exists and overwrite is not enabled.
    pub fn create(options: &ReportOptions, name: &str) -> Result<SnapshotReport, HerdsimError> {
        let path = options.directory.join(format!("{name}.csv"));
        trace!("creating report file {}", path.display());
        create_dir_all(&options.directory)?;
        if path.exists() && !options.overwrite {
            return Err(HerdsimError::ReportError(format!(
                "report file {} already exists; enable overwrite to replace it",
                path.display()
            )));
        }
        let file = File::create(&path)?;
        Ok(SnapshotReport {
            path,
            writer: Writer::from_writer(file),
        })
    }

    /// Writes one snapshot row and flushes it.
    ///
    /// # Errors
    ///
    /// Returns a `HerdsimError` if serialization or the write fails.
    pub fn record(&mut self, snapshot: &StepSnapshot) -> Result<(), HerdsimError> {
        self.writer.serialize(snapshot)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes a run's snapshot history in order.
    ///
    /// # Errors
    ///
    /// Returns a `HerdsimError` if any row fails to write.
    pub fn record_all(&mut self, snapshots: &[StepSnapshot]) -> Result<(), HerdsimError> {
        for snapshot in snapshots {
            self.record(snapshot)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read-only diagnostic summary of a scenario and its current state. Not
/// consumed by engine logic.
#[derive(Serialize, Clone, Debug)]
pub struct ScenarioSummary {
    pub disease_name: String,
    /// As originally scaled: secondary infections per 100 contacts.
    pub r0: f64,
    pub mortality_rate_pct: f64,
    pub population_size: usize,
    pub vaccinated: usize,
    /// Vaccinated plus recovered.
    pub total_immune: usize,
    pub currently_infected: usize,
    pub dead: usize,
}

impl Display for ScenarioSummary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: R0 {} per 100 contacts, mortality {}% | population {}: \
             {} vaccinated, {} immune, {} infected, {} dead",
            self.disease_name,
            self.r0,
            self.mortality_rate_pct,
            self.population_size,
            self.vaccinated,
            self.total_immune,
            self.currently_infected,
            self.dead
        )
    }
}
