//! A discrete-time simulation of disease spread through a closed population
//!
//! Herdsim models an epidemic in a fully-mixed population to demonstrate
//! herd-immunity dynamics under vaccination. The simulation consists of:
//! * A population of individuals, each of whom is susceptible, infected,
//!   recovered, vaccinated, or dead at any moment.
//! * An engine that owns the population and advances it one step at a time:
//!   every individual infected at the start of a step makes a fixed number
//!   of contacts with uniformly sampled members of the population, possibly
//!   staging new infections, and at the end of the step every staged
//!   infection is promoted while every active infection resolves to
//!   recovery or death.
//!
//! A run is deterministic given its scenario parameters and a random seed:
//! all randomness flows through one seeded generator owned by the engine.
//! Per-step snapshots of the aggregate counts are collected and can be
//! persisted to a CSV report.

pub mod engine;
pub mod error;
pub mod log;
pub mod params;
pub mod people;
pub mod progress;
pub mod report;

pub use engine::{Epidemic, CONTACTS_PER_STEP};
pub use error::HerdsimError;
pub use params::ScenarioParams;
pub use people::{HealthState, Individual};
pub use report::{ReportOptions, ScenarioSummary, SnapshotReport, StepSnapshot};

pub use crate::log::{debug, error, info, trace, warn};
