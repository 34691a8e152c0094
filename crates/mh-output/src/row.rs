//! Plain data row types written by output backends.

use mh_agent::Population;
use mh_core::{MentalState, Tick};
use mh_metrics::TickMetrics;
use mh_network::SocialNetwork;

/// One agent's mental-health state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshotRow {
    pub agent_id:          u32,
    pub tick:              u64,
    pub state:             MentalState,
    pub depression:        f64,
    pub anxiety:           f64,
    pub seeking_treatment: bool,
    pub degree:            u32,
}

impl AgentSnapshotRow {
    /// One row per agent, in `AgentId` order.
    pub fn collect(tick: Tick, population: &Population, network: &SocialNetwork) -> Vec<Self> {
        population
            .agent_ids()
            .map(|a| {
                let i = a.index();
                AgentSnapshotRow {
                    agent_id:          i as u32,
                    tick:              tick.0,
                    state:             population.states()[i],
                    depression:        population.depression()[i],
                    anxiety:           population.anxiety()[i],
                    seeking_treatment: population.seeking_treatment()[i],
                    degree:            network.degree(a) as u32,
                }
            })
            .collect()
    }
}

/// Population summary for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:                u64,
    pub healthy:             u64,
    pub at_risk:             u64,
    pub symptomatic:         u64,
    pub recovering:          u64,
    pub mean_depression:     f64,
    pub mean_anxiety:        f64,
    pub treatment_seeking:   u64,
    pub treatment_gap:       f64,
    pub reproduction_number: f64,
}

impl From<&TickMetrics> for TickSummaryRow {
    fn from(m: &TickMetrics) -> Self {
        Self {
            tick:                m.tick.0,
            healthy:             m.healthy as u64,
            at_risk:             m.at_risk as u64,
            symptomatic:         m.symptomatic as u64,
            recovering:          m.recovering as u64,
            mean_depression:     m.mean_depression,
            mean_anxiety:        m.mean_anxiety,
            treatment_seeking:   m.treatment_seeking as u64,
            treatment_gap:       m.treatment_gap,
            reproduction_number: m.reproduction_number,
        }
    }
}
