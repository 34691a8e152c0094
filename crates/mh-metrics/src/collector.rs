//! Summary statistics over one tick.

use mh_agent::Population;
use mh_core::{AgentId, MentalState, Thresholds, Tick};
use mh_network::SocialNetwork;

/// Ticks looked back when estimating the reproduction number.
pub const DEFAULT_R_WINDOW: u64 = 4;

/// Population-level summary of one tick.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickMetrics {
    pub tick:                Tick,
    pub population:          usize,
    pub healthy:             usize,
    pub at_risk:             usize,
    pub symptomatic:         usize,
    pub recovering:          usize,
    pub mean_depression:     f64,
    pub var_depression:      f64,
    pub mean_anxiety:        f64,
    pub var_anxiety:         f64,
    /// Share of agents whose depression score is at or above the
    /// symptomatic threshold.
    pub depression_rate:     f64,
    pub anxiety_rate:        f64,
    pub treatment_seeking:   usize,
    /// Symptomatic and not seeking ÷ Symptomatic (0 when nobody is
    /// Symptomatic).
    pub treatment_gap:       f64,
    pub clustering:          f64,
    pub mean_resilience:     f64,
    pub reproduction_number: f64,
}

impl TickMetrics {
    pub fn count(&self, state: MentalState) -> usize {
        match state {
            MentalState::Healthy     => self.healthy,
            MentalState::AtRisk      => self.at_risk,
            MentalState::Symptomatic => self.symptomatic,
            MentalState::Recovering  => self.recovering,
        }
    }

    /// Fraction of the population in `state`.
    pub fn prevalence(&self, state: MentalState) -> f64 {
        ratio(self.count(state), self.population)
    }

    /// Fraction of the population AtRisk or worse.
    pub fn at_risk_or_worse(&self) -> f64 {
        ratio(self.population - self.healthy, self.population)
    }
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Mean and population variance.
fn mean_var(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var)
}

// ── MetricsCollector ──────────────────────────────────────────────────────────

/// Derives [`TickMetrics`] from the population and network.
#[derive(Clone, Debug)]
pub struct MetricsCollector {
    pub thresholds: Thresholds,
    /// Look-back window for the reproduction number.
    pub r_window:   u64,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self { thresholds: Thresholds::default(), r_window: DEFAULT_R_WINDOW }
    }
}

impl MetricsCollector {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds, ..Self::default() }
    }

    pub fn collect(&self, population: &Population, network: &SocialNetwork) -> TickMetrics {
        let n = population.count();
        let [healthy, at_risk, symptomatic, recovering] = population.count_by_state();

        let (mean_depression, var_depression) = mean_var(population.depression());
        let (mean_anxiety, var_anxiety)       = mean_var(population.anxiety());
        let (mean_resilience, _)              = mean_var(&population.traits().resilience);

        let cut = self.thresholds.symptomatic;
        let depression_cases = population.depression().iter().filter(|&&d| d >= cut).count();
        let anxiety_cases    = population.anxiety().iter().filter(|&&a| a >= cut).count();

        let seeking = population.seeking_treatment();
        let treatment_seeking = seeking.iter().filter(|&&s| s).count();
        let untreated = population
            .states()
            .iter()
            .zip(seeking)
            .filter(|&(&state, &s)| state == MentalState::Symptomatic && !s)
            .count();

        TickMetrics {
            tick: population.tick(),
            population: n,
            healthy,
            at_risk,
            symptomatic,
            recovering,
            mean_depression,
            var_depression,
            mean_anxiety,
            var_anxiety,
            depression_rate: ratio(depression_cases, n),
            anxiety_rate:    ratio(anxiety_cases, n),
            treatment_seeking,
            treatment_gap:   ratio(untreated, symptomatic),
            clustering:      network.clustering_coefficient(),
            mean_resilience,
            reproduction_number: self.reproduction_number(population, network),
        }
    }

    /// Secondary AtRisk-or-worse transitions per Symptomatic agent over the
    /// last `r_window` ticks.
    ///
    /// Counts the agents that were Healthy at the window start, left Healthy
    /// within the window, and had at least one neighbour Symptomatic at the
    /// window start.  Each such agent counts once, however many Symptomatic
    /// neighbours it had.  The count is divided by the number of Symptomatic
    /// agents at the window start.
    pub fn reproduction_number(&self, population: &Population, network: &SocialNetwork) -> f64 {
        let now   = population.tick();
        let start = now.saturating_back(self.r_window);
        if start == now {
            return 0.0;
        }

        let was = |agent: AgentId, state: MentalState| population.state_at(agent, start) == Some(state);
        let sources = population.agent_ids().filter(|&a| was(a, MentalState::Symptomatic)).count();
        if sources == 0 {
            return 0.0;
        }

        let window = (start.0 as usize + 1)..=(now.0 as usize);
        let mut credited = 0usize;
        for agent in population.agent_ids() {
            if !was(agent, MentalState::Healthy) {
                continue;
            }
            let converted = population.history(agent)[window.clone()]
                .iter()
                .any(|h| h.state.is_at_risk_or_worse());
            if !converted {
                continue;
            }
            let attributed = network
                .neighbors(agent)
                .iter()
                .any(|nb| was(nb.agent, MentalState::Symptomatic));
            if attributed {
                credited += 1;
            }
        }
        credited as f64 / sources as f64
    }
}
