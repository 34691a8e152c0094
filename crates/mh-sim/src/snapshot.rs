//! Exported and read-only views of a run.

use mh_agent::{AgentRecord, PopulationSnapshot};
use mh_core::{InterventionConfig, SimConfig, Tick};
use mh_metrics::TickMetrics;
use mh_network::Edge;

use crate::SimStatus;

/// Full persisted form of a [`SimulationState`][crate::SimulationState].
///
/// Restoring a snapshot and stepping on produces the same ticks as the run
/// it was taken from.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimSnapshot {
    pub config:           SimConfig,
    pub tick:             Tick,
    /// Active intervention settings at `tick`.
    pub interventions:    InterventionConfig,
    pub intervention_log: Vec<(Tick, InterventionConfig)>,
    pub agents:           Vec<AgentRecord>,
    pub edges:            Vec<Edge>,
}

/// What `get_state` hands to readers.  Owns its data; later ticks never
/// change it.
#[derive(Clone, Debug)]
pub struct SimStateView {
    pub tick:          Tick,
    pub status:        SimStatus,
    pub agents:        PopulationSnapshot,
    pub edges:         Vec<Edge>,
    pub metrics:       TickMetrics,
    pub interventions: InterventionConfig,
}
