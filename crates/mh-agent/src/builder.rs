//! Fluent builder that samples a calibrated tick-0 population.
//!
//! # Usage
//!
//! ```rust
//! use mh_agent::PopulationBuilder;
//!
//! let population = PopulationBuilder::new(1_000, /*seed=*/ 42).build().unwrap();
//! assert_eq!(population.count(), 1_000);
//! assert_eq!(population.history(mh_core::AgentId(0)).len(), 1);
//! ```
//!
//! # Sampling
//!
//! Traits are drawn first for every agent.  Individual case probabilities
//! are then the calibrated baseline scaled by each agent's relative risk
//! (out-of-school, informal settlement) and renormalised over the drawn
//! population, so the population mean equals the baseline rate.  Anxiety
//! cases are drawn conditional on depression so that the share of agents
//! with at least one case is `max(depression rate, anxiety rate)`.
//!
//! A case scores uniformly in `[at_risk, 1]`; a non-case in `[0, at_risk)`.
//! The initial state is `thresholds.classify(max(depression, anxiety))`.

use log::info;

use mh_core::{
    Calibration, Gender, MentalState, MhError, RngStream, Settlement, SimRng, Substream,
    Thresholds, config::MAX_SOCIAL_MEDIA_HOURS,
};

use crate::{AgentTraits, AgentUpdate, Population, PopulationResult};

// Relative risks on the baseline case probability.
const OUT_OF_SCHOOL_RR_DEPRESSION: f64 = 1.5;
const OUT_OF_SCHOOL_RR_ANXIETY:    f64 = 1.45;
const INFORMAL_RR_DEPRESSION:      f64 = 1.3;
const INFORMAL_RR_ANXIETY:         f64 = 1.25;

/// Fluent builder for a tick-0 [`Population`].
pub struct PopulationBuilder {
    count:       usize,
    seed:        u64,
    calibration: Calibration,
    thresholds:  Thresholds,
}

impl PopulationBuilder {
    /// Create a builder for `count` agents with default calibration.
    pub fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            seed,
            calibration: Calibration::default(),
            thresholds:  Thresholds::default(),
        }
    }

    pub fn calibration(mut self, calibration: Calibration) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Validate the inputs and sample the population.
    pub fn build(self) -> PopulationResult<Population> {
        if self.count == 0 {
            return Err(MhError::Config("population size must be greater than 0".into()).into());
        }
        if u32::try_from(self.count).is_err() {
            return Err(MhError::Config(format!(
                "population size {} exceeds the AgentId range",
                self.count
            ))
            .into());
        }
        self.calibration.validate()?;
        self.thresholds.validate()?;

        let mut rng = RngStream::new(self.seed).substream(Substream::Population);
        let traits  = sample_traits(self.count, &self.calibration, &mut rng)?;
        let initial = sample_scores(&traits, &self.calibration, &self.thresholds, &mut rng);

        let population = Population::from_initial(traits, initial);
        let [healthy, at_risk, symptomatic, _] = population.count_by_state();
        info!(
            "sampled {} agents: {healthy} healthy, {at_risk} at risk, {symptomatic} symptomatic",
            population.count()
        );
        Ok(population)
    }
}

fn sample_traits(n: usize, cal: &Calibration, rng: &mut SimRng) -> PopulationResult<AgentTraits> {
    let mut t = AgentTraits::with_capacity(n);
    for _ in 0..n {
        let informal      = rng.gen_bool(cal.informal_settlement_rate);
        let female        = rng.gen_bool(cal.female_rate);
        let out_of_school = rng.gen_bool(cal.out_of_school_rate);

        t.settlement.push(if informal { Settlement::Informal } else { Settlement::Formal });
        t.gender.push(if female { Gender::Female } else { Gender::Male });
        t.in_school.push(!out_of_school);
        t.ethnicity.push(rng.gen_range(0..cal.ethnicity_groups));
        t.resilience.push(rng.gen_range(0.3..0.8));
        t.family_support.push(rng.gen_range(0.2..0.9));
        t.peer_support.push(rng.gen_range(0.1..0.8));
        t.religious.push(rng.gen_bool(cal.religious_participation_rate));
        t.susceptibility.push(rng.gen_range(0.75..1.25));

        let hours = rng.normal(cal.social_media_hours_mean, cal.social_media_hours_sd)?;
        t.social_media_hours.push(hours.clamp(0.0, MAX_SOCIAL_MEDIA_HOURS));

        let stress: f64 = 0.3
            + if informal { 0.3 } else { 0.0 }
            + if out_of_school { 0.2 } else { 0.0 }
            + if female { 0.1 } else { 0.0 }
            + rng.gen_range(-0.1..0.1);
        t.stress.push(stress.clamp(0.0, 1.0));
    }
    Ok(t)
}

/// Per-agent case probabilities: `base · rr_i / mean(rr)`, capped at 1.
fn case_probabilities(base: f64, rr: &[f64]) -> Vec<f64> {
    let mean = rr.iter().sum::<f64>() / rr.len() as f64;
    rr.iter().map(|r| (base * r / mean).min(1.0)).collect()
}

fn sample_scores(
    traits: &AgentTraits,
    cal:    &Calibration,
    thr:    &Thresholds,
    rng:    &mut SimRng,
) -> Vec<AgentUpdate> {
    let n = traits.len();
    let relative_risk = |oos: f64, informal: f64| -> Vec<f64> {
        (0..n)
            .map(|i| {
                let oos_factor = if traits.in_school[i] { 1.0 } else { oos };
                let inf_factor = if traits.settlement[i].is_informal() { informal } else { 1.0 };
                oos_factor * inf_factor
            })
            .collect()
    };
    let p_dep = case_probabilities(
        cal.baseline_depression_rate,
        &relative_risk(OUT_OF_SCHOOL_RR_DEPRESSION, INFORMAL_RR_DEPRESSION),
    );
    let p_anx = case_probabilities(
        cal.baseline_anxiety_rate,
        &relative_risk(OUT_OF_SCHOOL_RR_ANXIETY, INFORMAL_RR_ANXIETY),
    );

    let score = |case: bool, rng: &mut SimRng| -> f64 {
        if case { rng.gen_range(thr.at_risk..=1.0) } else { rng.gen_range(0.0..thr.at_risk) }
    };

    (0..n)
        .map(|i| {
            let (pd, pa) = (p_dep[i], p_anx[i]);
            let depressed = rng.gen_bool(pd);

            // P(anx | dep) and P(anx | ¬dep), preserving the marginal `pa`.
            let given_dep = if pd > 0.0 { (pa / pd).min(1.0) } else { 0.0 };
            let given_not = if pd < 1.0 { ((pa - pd * given_dep) / (1.0 - pd)).max(0.0) } else { 0.0 };
            let anxious = rng.gen_bool(if depressed { given_dep } else { given_not });

            let depression = score(depressed, rng);
            let anxiety    = score(anxious, rng);
            let state: MentalState = thr.classify(depression.max(anxiety));
            AgentUpdate {
                state,
                depression,
                anxiety,
                seeking_treatment: false,
                treatment_ticks:   0,
                ticks_above:       0,
            }
        })
        .collect()
}
