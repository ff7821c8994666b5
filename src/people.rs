//! The individual members of the simulated population.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The five-way health classification of an [`Individual`]. Derived from the
/// underlying flags; every individual is in exactly one of these states at
/// any time.
#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum HealthState {
    Susceptible,
    Infected,
    Recovered,
    Vaccinated,
    Dead,
}

/// One member of the population.
///
/// State is readable through the accessors below; all mutation happens
/// through the engine, which is the sole writer of population state.
/// `vaccinated` and `recovered` are sticky: once set they are never cleared,
/// and each confers permanent immunity.
#[derive(Debug, Clone)]
pub struct Individual {
    pub(crate) alive: bool,
    pub(crate) vaccinated: bool,
    pub(crate) infected: bool,
    pub(crate) recovered: bool,
    /// Staging flag for an infection acquired during the current step's
    /// interaction phase. Promoted to `infected` at resolution, so a person
    /// infected mid-step is not contagious within the same step. Always
    /// false between steps.
    pub(crate) pending_infection: bool,
}

impl Individual {
    #[must_use]
    pub fn new() -> Individual {
        Individual {
            alive: true,
            vaccinated: false,
            infected: false,
            recovered: false,
            pending_infection: false,
        }
    }

    /// Rolls this individual's one-time vaccination draw: a uniform value in
    /// [0, 1) that must exceed `1 - pct_vaccinated` for the individual to be
    /// vaccinated. No other state is touched.
    pub fn vaccinate(&mut self, rng: &mut impl Rng, pct_vaccinated: f64) {
        let draw: f64 = rng.random();
        if draw > 1.0 - pct_vaccinated {
            self.vaccinated = true;
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    #[must_use]
    pub fn is_vaccinated(&self) -> bool {
        self.vaccinated
    }

    #[must_use]
    pub fn is_infected(&self) -> bool {
        self.infected
    }

    /// Whether this individual has ever survived an infection.
    #[must_use]
    pub fn has_recovered(&self) -> bool {
        self.recovered
    }

    /// Alive with no immunity and no current infection.
    #[must_use]
    pub fn is_susceptible(&self) -> bool {
        self.alive && !self.infected && !self.vaccinated && !self.recovered
    }

    #[must_use]
    pub fn health_state(&self) -> HealthState {
        if !self.alive {
            HealthState::Dead
        } else if self.infected {
            HealthState::Infected
        } else if self.vaccinated {
            HealthState::Vaccinated
        } else if self.recovered {
            HealthState::Recovered
        } else {
            HealthState::Susceptible
        }
    }
}

impl Default for Individual {
    fn default() -> Self {
        Self::new()
    }
}
