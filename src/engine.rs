//! The epidemic engine: owns the population, advances simulation time one
//! discrete step at a time, and maintains the aggregate counters.
//!
//! Each step has two phases. In the interaction phase, every individual who
//! entered the step infected makes [`CONTACTS_PER_STEP`] contacts with
//! uniformly sampled members of the population; susceptible contacts may be
//! staged for infection. In the resolution phase, every living individual is
//! settled exactly once, in population order: the infected die or recover,
//! and staged infections are promoted. Infections staged mid-step therefore
//! never transmit within the step that staged them.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::HerdsimError;
use crate::log::{debug, info, trace};
use crate::params::ScenarioParams;
use crate::people::Individual;
use crate::progress::update_step_progress;
use crate::report::{ScenarioSummary, StepSnapshot};

/// Contacts each infected individual makes with the population per step.
pub const CONTACTS_PER_STEP: usize = 100;

/// The simulation engine. Sole owner and sole mutator of the population;
/// all randomness flows through the engine's seeded generator, so a run is
/// fully determined by its parameters and seed.
pub struct Epidemic {
    params: ScenarioParams,
    transmission_probability: f64,
    rng: StdRng,
    population: Vec<Individual>,
    current_step: usize,
    total_infected_ever: usize,
    current_infected_count: usize,
    dead_count: usize,
    history: Vec<StepSnapshot>,
}

impl Epidemic {
    /// Validates `params` and builds the initial population: the first
    /// `num_initial_infected` individuals are forced infected and exempted
    /// from the vaccination roll, and every later individual rolls
    /// vaccination once.
    ///
    /// # Errors
    ///
    /// Returns a `HerdsimError` if `params` fail validation.
    pub fn new(params: ScenarioParams, seed: u64) -> Result<Epidemic, HerdsimError> {
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut population = Vec::with_capacity(params.population_size);
        let mut total_infected_ever = 0;
        let mut current_infected_count = 0;

        for i in 0..params.population_size {
            let mut person = Individual::new();
            if i < params.num_initial_infected {
                // Seed infections take precedence; these individuals never
                // roll for vaccination.
                person.infected = true;
                total_infected_ever += 1;
                current_infected_count += 1;
            } else {
                person.vaccinate(&mut rng, params.pct_vaccinated);
            }
            population.push(person);
        }

        info!(
            "initialized {} population of {} ({} infected, {} vaccinated)",
            params.disease_name,
            population.len(),
            current_infected_count,
            population.iter().filter(|p| p.vaccinated).count()
        );

        Ok(Epidemic {
            transmission_probability: params.transmission_probability(),
            params,
            rng,
            population,
            current_step: 0,
            total_infected_ever,
            current_infected_count,
            dead_count: 0,
            history: Vec::new(),
        })
    }

    /// One step: interaction sampling for everyone infected at step start,
    /// then a single resolution pass, then a snapshot. Returns the snapshot
    /// appended to the history.
    pub fn advance_one_step(&mut self) -> StepSnapshot {
        // The set of infection drivers is fixed before any sampling happens.
        // Individuals promoted to infected during this step's resolution
        // must not drive contacts until the next step.
        let infected_at_start: Vec<usize> = self
            .population
            .iter()
            .enumerate()
            .filter(|(_, person)| person.alive && person.infected)
            .map(|(i, _)| i)
            .collect();

        trace!(
            "step {}: {} infected individuals making contacts",
            self.current_step,
            infected_at_start.len()
        );

        for source in infected_at_start {
            self.sample_interactions(source);
        }

        self.resolve_step();
        self.check_consistency();

        let snapshot = StepSnapshot {
            time_step: self.current_step,
            currently_infected: self.current_infected_count,
            total_infected_so_far: self.total_infected_ever,
            alive: self.population.len() - self.dead_count,
            dead: self.dead_count,
        };
        debug!(
            "step {}: {} infected, {} infected ever, {} dead",
            snapshot.time_step, snapshot.currently_infected, snapshot.total_infected_so_far,
            snapshot.dead
        );
        self.history.push(snapshot);
        self.current_step += 1;
        snapshot
    }

    /// Runs the full scenario: exactly `total_time_steps` steps. Returns the
    /// ordered snapshot history for the persistence collaborator.
    pub fn run(&mut self) -> &[StepSnapshot] {
        info!(
            "running {} scenario for {} steps",
            self.params.disease_name, self.params.total_time_steps
        );
        for _ in 0..self.params.total_time_steps {
            self.advance_one_step();
            update_step_progress(self.current_step);
        }
        &self.history
    }

    /// Models one infected individual's contact-driven transmission attempts
    /// for the current step. Contacts are sampled uniformly from the full
    /// population: self-contact and repeat contact are possible and carry no
    /// special handling, while a dead target is discarded and resampled
    /// without consuming one of the contact slots. Only staging flags are
    /// written here; counters change at resolution.
    fn sample_interactions(&mut self, source: usize) {
        trace!("individual {source} making {CONTACTS_PER_STEP} contacts");
        let population_size = self.population.len();
        let mut contacts_made = 0;
        // Terminates because the source itself is alive during the whole
        // interaction phase, so a live target always exists.
        while contacts_made < CONTACTS_PER_STEP {
            let target = self.rng.random_range(0..population_size);
            if !self.population[target].alive {
                continue;
            }
            contacts_made += 1;

            let person = &self.population[target];
            if person.vaccinated || person.recovered || person.infected {
                // Immune or already contagious: the contact happened but
                // nothing can change.
                continue;
            }
            let draw: f64 = self.rng.random();
            if draw >= 1.0 - self.transmission_probability {
                self.population[target].pending_infection = true;
            }
        }
    }

    /// Settles every living individual exactly once, in population order:
    /// the infected either die or recover, and staged infections are
    /// promoted to active ones. This is the only place engine counters
    /// change after construction.
    fn resolve_step(&mut self) {
        let mortality_rate = self.params.mortality_rate;
        for person in &mut self.population {
            if !person.alive {
                continue;
            }
            if person.infected {
                let draw: f64 = self.rng.random();
                if draw >= 1.0 - mortality_rate {
                    person.alive = false;
                    person.infected = false;
                    self.dead_count += 1;
                    self.current_infected_count -= 1;
                } else {
                    person.infected = false;
                    person.recovered = true;
                    self.current_infected_count -= 1;
                }
            } else if person.pending_infection {
                person.infected = true;
                person.pending_infection = false;
                self.current_infected_count += 1;
                self.total_infected_ever += 1;
            }
        }
    }

    /// Counter corruption is a programming error, not a recoverable
    /// condition: recount the population after every step and abort on any
    /// divergence.
    fn check_consistency(&self) {
        let infected = self.population.iter().filter(|p| p.infected).count();
        assert_eq!(
            infected, self.current_infected_count,
            "infected counter diverged from population"
        );
        let dead = self.population.iter().filter(|p| !p.alive).count();
        assert_eq!(
            dead, self.dead_count,
            "dead counter diverged from population"
        );
        let pending = self
            .population
            .iter()
            .filter(|p| p.pending_infection)
            .count();
        assert_eq!(pending, 0, "pending infections survived resolution");
    }

    /// The scenario this engine was built from.
    #[must_use]
    pub fn params(&self) -> &ScenarioParams {
        &self.params
    }

    #[must_use]
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    /// Steps completed so far.
    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn current_infected_count(&self) -> usize {
        self.current_infected_count
    }

    /// Cumulative count of individuals ever infected, including the seeded
    /// initial infections.
    #[must_use]
    pub fn total_infected_ever(&self) -> usize {
        self.total_infected_ever
    }

    #[must_use]
    pub fn dead_count(&self) -> usize {
        self.dead_count
    }

    /// The per-step snapshot log, one record per completed step.
    #[must_use]
    pub fn history(&self) -> &[StepSnapshot] {
        &self.history
    }

    /// A read-only diagnostic summary of the current engine state.
    #[must_use]
    pub fn summary(&self) -> ScenarioSummary {
        let vaccinated = self.population.iter().filter(|p| p.vaccinated).count();
        let total_immune = self
            .population
            .iter()
            .filter(|p| p.vaccinated || p.recovered)
            .count();
        ScenarioSummary {
            disease_name: self.params.disease_name.clone(),
            r0: self.params.r0,
            mortality_rate_pct: self.params.mortality_rate * 100.0,
            population_size: self.population.len(),
            vaccinated,
            total_immune,
            currently_infected: self.current_infected_count,
            dead: self.dead_count,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::people::HealthState;

    fn scenario(
        population_size: usize,
        num_initial_infected: usize,
        pct_vaccinated: f64,
        r0: f64,
        mortality_rate: f64,
        total_time_steps: usize,
    ) -> ScenarioParams {
        ScenarioParams {
            disease_name: "test".to_string(),
            population_size,
            r0,
            mortality_rate,
            total_time_steps,
            pct_vaccinated,
            num_initial_infected,
        }
    }

    #[test]
    fn construction_rejects_invalid_params() {
        let params = scenario(10, 11, 0.0, 2.0, 0.5, 5);
        assert!(Epidemic::new(params, 0).is_err());
    }

    #[test]
    fn initial_infected_are_seeded_and_unvaccinated() {
        let params = scenario(100, 5, 1.0, 2.0, 0.5, 5);
        let epidemic = Epidemic::new(params, 42).unwrap();

        assert_eq!(epidemic.current_infected_count(), 5);
        assert_eq!(epidemic.total_infected_ever(), 5);
        for person in &epidemic.population()[..5] {
            assert!(person.is_infected());
            assert!(!person.is_vaccinated());
        }
        // pct_vaccinated = 1.0, so everyone else rolled vaccinated.
        for person in &epidemic.population()[5..] {
            assert!(person.is_vaccinated());
        }
    }

    #[test]
    fn zero_transmission_keeps_total_at_seed_count() {
        let params = scenario(100, 5, 0.0, 0.0, 0.5, 10);
        let mut epidemic = Epidemic::new(params, 42).unwrap();
        epidemic.run();

        // R0 = 0 means a draw in [0, 1) never clears the threshold, so the
        // 5 seeds resolve after one step and nobody else is ever infected.
        assert_eq!(epidemic.total_infected_ever(), 5);
        assert_eq!(epidemic.history()[0].currently_infected, 0);
        for snapshot in epidemic.history() {
            assert_eq!(snapshot.total_infected_so_far, 5);
            assert_eq!(snapshot.currently_infected, 0);
        }
    }

    #[test]
    fn certain_mortality_kills_every_seed_in_one_step() {
        let params = scenario(10, 1, 0.0, 0.0, 1.0, 3);
        let mut epidemic = Epidemic::new(params, 42).unwrap();
        epidemic.advance_one_step();

        assert_eq!(epidemic.dead_count(), 1);
        assert_eq!(epidemic.current_infected_count(), 0);
        assert_eq!(epidemic.population()[0].health_state(), HealthState::Dead);
        for person in &epidemic.population()[1..] {
            assert!(person.is_susceptible());
        }
    }

    #[test]
    fn zero_mortality_means_every_infection_recovers() {
        let params = scenario(200, 10, 0.2, 50.0, 0.0, 30);
        let mut epidemic = Epidemic::new(params, 42).unwrap();
        epidemic.run();

        assert_eq!(epidemic.dead_count(), 0);
        for snapshot in epidemic.history() {
            assert_eq!(snapshot.dead, 0);
        }
        // Everyone ever infected has either recovered or is still infected.
        let recovered = epidemic
            .population()
            .iter()
            .filter(|p| p.has_recovered())
            .count();
        assert_eq!(
            recovered + epidemic.current_infected_count(),
            epidemic.total_infected_ever()
        );
    }

    #[test]
    fn fully_vaccinated_population_stays_uninfected() {
        let params = scenario(100, 0, 1.0, 100.0, 0.5, 10);
        let mut epidemic = Epidemic::new(params, 42).unwrap();
        epidemic.run();

        assert_eq!(epidemic.total_infected_ever(), 0);
        assert_eq!(epidemic.dead_count(), 0);
    }

    #[test]
    fn counters_match_population_recount_every_step() {
        let params = scenario(500, 20, 0.3, 10.0, 0.3, 15);
        let mut epidemic = Epidemic::new(params, 7).unwrap();
        for _ in 0..15 {
            let snapshot = epidemic.advance_one_step();
            let population = epidemic.population();
            let infected = population.iter().filter(|p| p.is_infected()).count();
            let dead = population.iter().filter(|p| !p.is_alive()).count();
            assert_eq!(snapshot.currently_infected, infected);
            assert_eq!(snapshot.dead, dead);
            assert_eq!(snapshot.alive, population.len() - dead);
            assert!(population.iter().all(|p| !p.pending_infection));
        }
    }

    #[test]
    fn immunity_flags_are_monotonic_across_a_run() {
        let params = scenario(300, 10, 0.5, 30.0, 0.2, 20);
        let mut epidemic = Epidemic::new(params, 11).unwrap();

        let mut vaccinated: Vec<bool> = epidemic
            .population()
            .iter()
            .map(Individual::is_vaccinated)
            .collect();
        let mut recovered: Vec<bool> = epidemic
            .population()
            .iter()
            .map(Individual::has_recovered)
            .collect();
        let mut total_ever = epidemic.total_infected_ever();

        for _ in 0..20 {
            epidemic.advance_one_step();
            for (i, person) in epidemic.population().iter().enumerate() {
                assert!(!vaccinated[i] || person.is_vaccinated(), "vaccination cleared");
                assert!(!recovered[i] || person.has_recovered(), "recovery cleared");
                vaccinated[i] = person.is_vaccinated();
                recovered[i] = person.has_recovered();
            }
            assert!(epidemic.total_infected_ever() >= total_ever);
            total_ever = epidemic.total_infected_ever();
        }
    }

    #[test]
    fn vaccinated_contacts_are_never_mutated() {
        // Certain transmission, but everyone except the seed is vaccinated:
        // 100 trials per step all land on immune targets and change nothing.
        let params = scenario(50, 1, 1.0, 100.0, 0.0, 10);
        let mut epidemic = Epidemic::new(params, 3).unwrap();
        epidemic.run();

        assert_eq!(epidemic.total_infected_ever(), 1);
        for person in &epidemic.population()[1..] {
            assert!(person.is_vaccinated());
            assert!(!person.has_recovered());
            assert!(!person.is_infected());
            assert!(person.is_alive());
        }
    }

    #[test]
    fn epidemic_burns_out_and_totals_hold_steady() {
        // The stock demonstration scenario: high vaccination coverage starves
        // the outbreak.
        let params = scenario(1000, 50, 0.85, 2.0, 0.5, 20);
        let mut epidemic = Epidemic::new(params, 123).unwrap();
        epidemic.run();

        let history = epidemic.history();
        assert_eq!(history.len(), 20);
        let extinction = history
            .iter()
            .position(|s| s.currently_infected == 0)
            .expect("outbreak should burn out within the run");
        let settled_total = history[extinction].total_infected_so_far;
        for snapshot in &history[extinction..] {
            assert_eq!(snapshot.currently_infected, 0);
            assert_eq!(snapshot.total_infected_so_far, settled_total);
        }
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let params = scenario(400, 10, 0.6, 20.0, 0.4, 12);
        let mut first = Epidemic::new(params.clone(), 99).unwrap();
        let mut second = Epidemic::new(params, 99).unwrap();
        assert_eq!(first.run(), second.run());
    }

    #[test]
    fn snapshots_are_indexed_from_zero_in_step_order() {
        let params = scenario(50, 2, 0.5, 5.0, 0.5, 6);
        let mut epidemic = Epidemic::new(params, 1).unwrap();
        epidemic.run();
        for (i, snapshot) in epidemic.history().iter().enumerate() {
            assert_eq!(snapshot.time_step, i);
        }
        assert_eq!(epidemic.current_step(), 6);
    }

    #[test]
    fn summary_reflects_engine_state() {
        let params = scenario(100, 5, 1.0, 2.0, 0.25, 5);
        let epidemic = Epidemic::new(params, 42).unwrap();
        let summary = epidemic.summary();

        assert_eq!(summary.population_size, 100);
        assert_eq!(summary.vaccinated, 95);
        assert_eq!(summary.total_immune, 95);
        assert_eq!(summary.currently_infected, 5);
        assert_eq!(summary.dead, 0);
        assert_eq!(summary.mortality_rate_pct, 25.0);
    }

    #[test]
    fn whole_population_seeded_infected_resolves_cleanly() {
        let params = scenario(10, 10, 0.0, 0.0, 0.0, 2);
        let mut epidemic = Epidemic::new(params, 5).unwrap();
        epidemic.run();

        assert_eq!(epidemic.total_infected_ever(), 10);
        assert_eq!(epidemic.current_infected_count(), 0);
        assert!(epidemic.population().iter().all(Individual::has_recovered));
    }
}
