//! Scenario construction parameters, their validation, and JSON loading.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HerdsimError;
use crate::log::debug;

/// Everything needed to construct an [`Epidemic`](crate::Epidemic).
///
/// `r0` is expressed the way the scenario inputs express it: expected
/// secondary infections per 100 contacts. It is converted to a per-contact
/// transmission probability at engine construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParams {
    /// Label for reports. Has no behavioral effect.
    pub disease_name: String,
    /// Number of individuals in the closed population.
    pub population_size: usize,
    /// Secondary infections per 100 contacts, in [0, 100].
    pub r0: f64,
    /// Probability that an infected individual dies at step resolution, in [0, 1].
    pub mortality_rate: f64,
    /// Number of steps `run` advances.
    pub total_time_steps: usize,
    /// Probability that a non-seeded individual is vaccinated at creation, in [0, 1].
    pub pct_vaccinated: f64,
    /// Individuals forced infected at creation. Must not exceed `population_size`.
    pub num_initial_infected: usize,
}

impl Default for ScenarioParams {
    /// The stock demonstration scenario: a well-vaccinated population in
    /// which the outbreak burns out within the run.
    fn default() -> Self {
        ScenarioParams {
            disease_name: "influenza".to_string(),
            population_size: 1000,
            r0: 2.0,
            mortality_rate: 0.5,
            total_time_steps: 20,
            pct_vaccinated: 0.85,
            num_initial_infected: 50,
        }
    }
}

impl ScenarioParams {
    /// The per-contact transmission probability derived from `r0`.
    #[must_use]
    pub fn transmission_probability(&self) -> f64 {
        self.r0 / 100.0
    }

    /// Checks every parameter against its documented range. Construction
    /// rejects invalid scenarios eagerly rather than producing a degenerate
    /// simulation.
    ///
    /// # Errors
    ///
    /// Returns a `HerdsimError` describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), HerdsimError> {
        if self.population_size == 0 {
            return Err(HerdsimError::HerdsimError(
                "population size must be positive".to_string(),
            ));
        }
        if self.num_initial_infected > self.population_size {
            return Err(HerdsimError::HerdsimError(format!(
                "initial infected count ({}) exceeds population size ({})",
                self.num_initial_infected, self.population_size
            )));
        }
        if !(0.0..=100.0).contains(&self.r0) {
            return Err(HerdsimError::HerdsimError(format!(
                "R0 is expressed per 100 contacts and must be in [0, 100], got {}",
                self.r0
            )));
        }
        if !(0.0..=1.0).contains(&self.mortality_rate) {
            return Err(HerdsimError::HerdsimError(format!(
                "mortality rate must be a probability in [0, 1], got {}",
                self.mortality_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.pct_vaccinated) {
            return Err(HerdsimError::HerdsimError(format!(
                "vaccination fraction must be a probability in [0, 1], got {}",
                self.pct_vaccinated
            )));
        }
        Ok(())
    }

    /// Loads and validates scenario parameters from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns a `HerdsimError` if the file cannot be opened or parsed, or
    /// if the loaded parameters fail validation.
    pub fn from_file(path: &Path) -> Result<Self, HerdsimError> {
        debug!("loading scenario parameters from {}", path.display());
        let file = File::open(path)?;
        let params: ScenarioParams = serde_json::from_reader(file)?;
        params.validate()?;
        Ok(params)
    }
}
