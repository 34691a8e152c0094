//! Read-only views, per-tick updates, and persistent records.

use std::sync::Arc;

use mh_core::{AgentId, Gender, MentalState, Settlement, Tick};

use crate::HistoryEntry;

// ── AgentView ─────────────────────────────────────────────────────────────────

/// A by-value copy of one agent's current state and traits.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentView {
    pub id:                 AgentId,
    pub state:              MentalState,
    pub depression:         f64,
    pub anxiety:            f64,
    pub seeking_treatment:  bool,
    pub treatment_ticks:    u32,
    pub settlement:         Settlement,
    pub gender:             Gender,
    pub in_school:          bool,
    pub ethnicity:          u8,
    pub resilience:         f64,
    pub susceptibility:     f64,
    pub social_media_hours: f64,
}

// ── PopulationSnapshot ────────────────────────────────────────────────────────

/// Immutable copy of every agent at one tick boundary.
///
/// The agent array is owned (behind an `Arc`, so clones are cheap) and never
/// aliases the population's internal buffers: committing later ticks cannot
/// change a snapshot already handed out.
#[derive(Clone, Debug)]
pub struct PopulationSnapshot {
    pub tick:   Tick,
    pub agents: Arc<[AgentView]>,
}

impl PopulationSnapshot {
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, agent: AgentId) -> Option<&AgentView> {
        self.agents.get(agent.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentView> {
        self.agents.iter()
    }

    /// Agent counts indexed by [`MentalState::index`].
    pub fn count_by_state(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for a in self.agents.iter() {
            counts[a.state.index()] += 1;
        }
        counts
    }
}

// ── Updates ───────────────────────────────────────────────────────────────────

/// Next-tick values of one agent's mutable fields.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct AgentUpdate {
    pub state:             MentalState,
    pub depression:        f64,
    pub anxiety:           f64,
    pub seeking_treatment: bool,
    /// Ticks spent seeking treatment in the current course.
    pub treatment_ticks:   u32,
    /// Consecutive AtRisk ticks with a score at or above the at-risk threshold.
    pub ticks_above:       u32,
}

/// A whole tick's worth of [`AgentUpdate`]s, indexed by `AgentId`.
#[derive(Clone, Debug, Default)]
pub struct PopulationUpdate {
    pub agents: Vec<AgentUpdate>,
}

impl PopulationUpdate {
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl FromIterator<AgentUpdate> for PopulationUpdate {
    fn from_iter<I: IntoIterator<Item = AgentUpdate>>(iter: I) -> Self {
        Self { agents: iter.into_iter().collect() }
    }
}

// ── AgentRecord ───────────────────────────────────────────────────────────────

/// Everything needed to rebuild one agent exactly: static traits, current
/// mutable fields, and the full history.  Used for snapshot export.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentRecord {
    pub id:                 AgentId,
    pub settlement:         Settlement,
    pub gender:             Gender,
    pub in_school:          bool,
    pub ethnicity:          u8,
    pub resilience:         f64,
    pub susceptibility:     f64,
    pub social_media_hours: f64,
    pub family_support:     f64,
    pub peer_support:       f64,
    pub religious:          bool,
    pub stress:             f64,
    pub state:              MentalState,
    pub depression:         f64,
    pub anxiety:            f64,
    pub seeking_treatment:  bool,
    pub treatment_ticks:    u32,
    pub ticks_above:        u32,
    pub history:            Vec<HistoryEntry>,
}
