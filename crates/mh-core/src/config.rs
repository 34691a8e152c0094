//! Simulation configuration.
//!
//! Every struct implements `Default` with the calibrated values and a
//! `validate()` that rejects out-of-range or inconsistent parameters with
//! [`MhError::Config`].  Validation runs once at initialisation (and again on
//! intervention updates); nothing is re-checked mid-tick.
//!
//! Typically built in code or deserialised by the application (feature
//! `serde`) and handed to `mh-sim`.

use crate::{MentalState, MhError, MhResult};

/// Upper bound on sampled daily social-media usage.
pub const MAX_SOCIAL_MEDIA_HOURS: f64 = 8.0;

// ── Validation helpers ────────────────────────────────────────────────────────

fn check_probability(name: &str, value: f64) -> MhResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MhError::Config(format!("{name} must lie in [0, 1], got {value}")))
    }
}

fn check_non_negative(name: &str, value: f64) -> MhResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MhError::Config(format!("{name} must be a finite non-negative number, got {value}")))
    }
}

fn check_finite(name: &str, value: f64) -> MhResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MhError::Config(format!("{name} must be finite, got {value}")))
    }
}

// ── Calibration ───────────────────────────────────────────────────────────────

/// Baseline distributions used to sample the initial population.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    /// Bernoulli rate of living in an informal settlement.
    pub informal_settlement_rate:     f64,
    /// Population-mean probability of a depression case at tick 0.
    pub baseline_depression_rate:     f64,
    /// Population-mean probability of an anxiety case at tick 0.
    pub baseline_anxiety_rate:        f64,
    pub out_of_school_rate:           f64,
    pub religious_participation_rate: f64,
    pub female_rate:                  f64,
    pub social_media_hours_mean:      f64,
    pub social_media_hours_sd:        f64,
    /// Number of ethnicity groups; agents draw uniformly from `0..groups`.
    pub ethnicity_groups:             u8,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            informal_settlement_rate:     0.5,
            baseline_depression_rate:     0.26,
            baseline_anxiety_rate:        0.191,
            out_of_school_rate:           0.25,
            religious_participation_rate: 0.7,
            female_rate:                  0.5,
            social_media_hours_mean:      3.73,
            social_media_hours_sd:        1.0,
            ethnicity_groups:             4,
        }
    }
}

impl Calibration {
    pub fn validate(&self) -> MhResult<()> {
        check_probability("informal_settlement_rate", self.informal_settlement_rate)?;
        check_probability("baseline_depression_rate", self.baseline_depression_rate)?;
        check_probability("baseline_anxiety_rate", self.baseline_anxiety_rate)?;
        check_probability("out_of_school_rate", self.out_of_school_rate)?;
        check_probability("religious_participation_rate", self.religious_participation_rate)?;
        check_probability("female_rate", self.female_rate)?;
        check_non_negative("social_media_hours_mean", self.social_media_hours_mean)?;
        check_non_negative("social_media_hours_sd", self.social_media_hours_sd)?;
        if self.ethnicity_groups == 0 {
            return Err(MhError::Config("ethnicity_groups must be at least 1".into()));
        }
        Ok(())
    }
}

// ── Network ───────────────────────────────────────────────────────────────────

/// How strongly peer/family edges prefer similar agents.
///
/// A bias of 0 ignores the attribute; a bias of 1 forbids cross-group
/// peer/family ties except as a fallback.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomophilyConfig {
    pub settlement_bias: f64,
    pub ethnicity_bias:  f64,
}

impl Default for HomophilyConfig {
    fn default() -> Self {
        Self { settlement_bias: 0.7, ethnicity_bias: 0.5 }
    }
}

impl HomophilyConfig {
    pub fn validate(&self) -> MhResult<()> {
        check_probability("homophily.settlement_bias", self.settlement_bias)?;
        check_probability("homophily.ethnicity_bias", self.ethnicity_bias)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkConfig {
    /// Target mean degree across all relation kinds.
    pub avg_connections:    usize,
    /// Small-world rewiring probability for the local (peer/family) lattice.
    pub rewire_probability: f64,
    /// Share of the degree budget spent on digital edges.
    pub digital_share:      f64,
    /// Probability that a same-group local edge is a family tie.
    pub family_share:       f64,
    /// Share of agents picked as hubs; each gains `avg_connections` extra
    /// local ties carved out of the local budget.
    pub hub_share:          f64,
    pub homophily:          HomophilyConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            avg_connections:    12,
            rewire_probability: 0.3,
            digital_share:      0.25,
            family_share:       0.2,
            hub_share:          0.05,
            homophily:          HomophilyConfig::default(),
        }
    }
}

impl NetworkConfig {
    /// Validate against a population of `population_size` agents.
    pub fn validate(&self, population_size: usize) -> MhResult<()> {
        if self.avg_connections >= population_size {
            return Err(MhError::Config(format!(
                "avg_connections ({}) must be less than the population size ({population_size})",
                self.avg_connections
            )));
        }
        check_probability("rewire_probability", self.rewire_probability)?;
        check_probability("digital_share", self.digital_share)?;
        check_probability("family_share", self.family_share)?;
        check_probability("hub_share", self.hub_share)?;
        self.homophily.validate()
    }
}

// ── Transmission ──────────────────────────────────────────────────────────────

/// Logit-space weights for one score dimension (depression or anxiety).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreWeights {
    /// Intercept; sets the equilibrium of an average, connected agent.
    pub bias:        f64,
    pub environment: f64,
    pub media:       f64,
    pub protection:  f64,
}

impl ScoreWeights {
    pub fn depression() -> Self {
        Self { bias: -1.2, environment: 1.0, media: 1.0, protection: 2.0 }
    }

    pub fn anxiety() -> Self {
        Self { bias: -1.5, environment: 1.1, media: 1.2, protection: 1.8 }
    }

    fn validate(&self, which: &str) -> MhResult<()> {
        check_finite(&format!("{which}.bias"), self.bias)?;
        check_non_negative(&format!("{which}.environment"), self.environment)?;
        check_non_negative(&format!("{which}.media"), self.media)?;
        check_non_negative(&format!("{which}.protection"), self.protection)
    }
}

/// Calibration constants of the per-tick score update.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmissionParams {
    /// Coefficient on neighbour distress (β = 2.13).
    pub peer_influence_strength:         f64,
    /// Odds ratio applied to isolated agents (OR = 10.68).  Enters the
    /// logit as `ln(OR)`.
    pub loneliness_risk_multiplier:      f64,
    /// Agents whose summed effective edge weight is below this are isolated.
    pub isolation_threshold:             f64,
    /// Stress multiplier for informal-settlement residents.
    pub environmental_stress_multiplier: f64,
    pub peer_weight:                     f64,
    pub family_weight:                   f64,
    pub digital_weight:                  f64,
    /// Fraction of the gap to the target score closed per tick, before the
    /// agent's susceptibility scaling.
    pub adaptation_rate:                 f64,
    /// Logit reduction once a treatment course is under way.
    pub treatment_effect:                f64,
    /// Ticks of treatment seeking before the treatment effect applies.
    pub min_treatment_ticks:             u32,
    pub depression:                      ScoreWeights,
    pub anxiety:                         ScoreWeights,
}

impl Default for TransmissionParams {
    fn default() -> Self {
        Self {
            peer_influence_strength:         2.13,
            loneliness_risk_multiplier:      10.68,
            isolation_threshold:             0.5,
            environmental_stress_multiplier: 1.5,
            peer_weight:                     1.0,
            family_weight:                   0.8,
            digital_weight:                  0.6,
            adaptation_rate:                 0.1,
            treatment_effect:                2.0,
            min_treatment_ticks:             4,
            depression:                      ScoreWeights::depression(),
            anxiety:                         ScoreWeights::anxiety(),
        }
    }
}

impl TransmissionParams {
    /// Log-odds contribution of isolation.
    #[inline]
    pub fn loneliness_log_odds(&self) -> f64 {
        self.loneliness_risk_multiplier.ln()
    }

    pub fn validate(&self) -> MhResult<()> {
        check_non_negative("peer_influence_strength", self.peer_influence_strength)?;
        if !(self.loneliness_risk_multiplier.is_finite() && self.loneliness_risk_multiplier >= 1.0) {
            return Err(MhError::Config(format!(
                "loneliness_risk_multiplier must be a finite odds ratio >= 1, got {}",
                self.loneliness_risk_multiplier
            )));
        }
        check_non_negative("isolation_threshold", self.isolation_threshold)?;
        check_non_negative("environmental_stress_multiplier", self.environmental_stress_multiplier)?;
        check_non_negative("peer_weight", self.peer_weight)?;
        check_non_negative("family_weight", self.family_weight)?;
        check_non_negative("digital_weight", self.digital_weight)?;
        check_probability("adaptation_rate", self.adaptation_rate)?;
        check_non_negative("treatment_effect", self.treatment_effect)?;
        self.depression.validate("depression")?;
        self.anxiety.validate("anxiety")
    }
}

// ── Thresholds ────────────────────────────────────────────────────────────────

/// State-transition thresholds (applied to the larger of the two scores).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Thresholds {
    /// Healthy → AtRisk at or above this score.
    pub at_risk:             f64,
    /// AtRisk → Symptomatic at or above this score.
    pub symptomatic:         f64,
    /// Recovering → Healthy (and AtRisk → Healthy) below this score.
    pub recovered:           f64,
    /// Consecutive AtRisk ticks at or above `at_risk` that force Symptomatic.
    pub sustained_ticks:     u32,
    /// Chance per tick that a Recovering agent with a rising score relapses.
    pub relapse_probability: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            at_risk:             0.33,
            symptomatic:         0.66,
            recovered:           0.2,
            sustained_ticks:     8,
            relapse_probability: 0.15,
        }
    }
}

impl Thresholds {
    /// Categorical state implied by a score alone (used for tick 0).
    pub fn classify(&self, score: f64) -> MentalState {
        if score >= self.symptomatic {
            MentalState::Symptomatic
        } else if score >= self.at_risk {
            MentalState::AtRisk
        } else {
            MentalState::Healthy
        }
    }

    pub fn validate(&self) -> MhResult<()> {
        check_probability("thresholds.at_risk", self.at_risk)?;
        check_probability("thresholds.symptomatic", self.symptomatic)?;
        check_probability("thresholds.recovered", self.recovered)?;
        check_probability("thresholds.relapse_probability", self.relapse_probability)?;
        if !(self.recovered <= self.at_risk && self.at_risk < self.symptomatic) {
            return Err(MhError::Config(format!(
                "thresholds must satisfy recovered <= at_risk < symptomatic, got {} / {} / {}",
                self.recovered, self.at_risk, self.symptomatic
            )));
        }
        if self.at_risk <= 0.0 {
            return Err(MhError::Config("thresholds.at_risk must be positive".into()));
        }
        if self.sustained_ticks == 0 {
            return Err(MhError::Config("thresholds.sustained_ticks must be at least 1".into()));
        }
        Ok(())
    }
}

// ── Interventions ─────────────────────────────────────────────────────────────

/// How peer-support programme participants are chosen.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PeerSupportTargeting {
    /// A seeded random permutation; raising coverage enrols a superset.
    #[default]
    Random,
    /// Highest-degree agents first, ties broken by ascending `AgentId`.
    HighestDegree,
}

/// Intervention toggles and intensities.
///
/// Owned by the simulation state and replaced only through
/// `update_interventions`, which takes effect from the next tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterventionConfig {
    /// Social-media outreach to AtRisk/Symptomatic agents.
    pub digital_outreach:        bool,
    /// Per-tick treatment-start probability added per daily usage hour.
    pub outreach_rate_per_hour:  f64,
    /// Baseline per-tick probability that a Symptomatic agent starts seeking
    /// treatment.
    pub treatment_access_rate:   f64,
    /// Multiplier on `treatment_access_rate` (1.0 = no expansion).
    pub treatment_access_boost:  f64,
    /// Fraction of the population enrolled in the peer-support programme.
    pub peer_support_coverage:   f64,
    pub peer_support_targeting:  PeerSupportTargeting,
    /// Fraction of incoming peer influence removed for enrolled agents.
    pub peer_support_protection: f64,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            digital_outreach:        false,
            outreach_rate_per_hour:  0.025,
            treatment_access_rate:   0.02,
            treatment_access_boost:  1.0,
            peer_support_coverage:   0.0,
            peer_support_targeting:  PeerSupportTargeting::Random,
            peer_support_protection: 0.5,
        }
    }
}

impl InterventionConfig {
    /// Per-tick treatment-start probability for a Symptomatic agent.
    #[inline]
    pub fn effective_treatment_access(&self) -> f64 {
        (self.treatment_access_rate * self.treatment_access_boost).min(1.0)
    }

    pub fn validate(&self) -> MhResult<()> {
        check_probability("outreach_rate_per_hour", self.outreach_rate_per_hour)?;
        check_probability("treatment_access_rate", self.treatment_access_rate)?;
        check_non_negative("treatment_access_boost", self.treatment_access_boost)?;
        check_probability("peer_support_coverage", self.peer_support_coverage)?;
        check_probability("peer_support_protection", self.peer_support_protection)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Number of agents; fixed for the lifetime of a run.
    pub population_size: usize,
    pub calibration:     Calibration,
    pub network:         NetworkConfig,
    pub transmission:    TransmissionParams,
    pub thresholds:      Thresholds,
    pub interventions:   InterventionConfig,
    /// `step()` reports `Completed` once this tick is reached.
    pub total_ticks:     u64,
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed:            u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population_size: 1_000,
            calibration:     Calibration::default(),
            network:         NetworkConfig::default(),
            transmission:    TransmissionParams::default(),
            thresholds:      Thresholds::default(),
            interventions:   InterventionConfig::default(),
            total_ticks:     100,
            seed:            42,
        }
    }
}

impl SimConfig {
    /// Default calibration for `population_size` agents and `seed`.
    pub fn with_population(population_size: usize, seed: u64) -> Self {
        Self { population_size, seed, ..Self::default() }
    }

    pub fn validate(&self) -> MhResult<()> {
        if self.population_size == 0 {
            return Err(MhError::Config("population_size must be greater than 0".into()));
        }
        if u32::try_from(self.population_size).is_err() {
            return Err(MhError::Config(format!(
                "population_size {} exceeds the AgentId range",
                self.population_size
            )));
        }
        if self.total_ticks == 0 {
            return Err(MhError::Config("total_ticks must be greater than 0".into()));
        }
        self.calibration.validate()?;
        self.network.validate(self.population_size)?;
        self.transmission.validate()?;
        self.thresholds.validate()?;
        self.interventions.validate()
    }
}
