//! Core agent storage.
//!
//! # Layout
//!
//! [`Population`] is a Structure-of-Arrays store: every `Vec` has exactly
//! `count` elements and the `AgentId` value is the index into all of them.
//! Static traits are grouped in [`AgentTraits`] and never change after
//! construction; the mutable fields are private and advance only through
//! [`Population::commit`].
//!
//! # Double buffering
//!
//! The transmission engine reads `&Population` (the pre-tick state) and
//! produces a separate [`PopulationUpdate`].  `commit` then swaps the whole
//! update in.  No agent is ever read while being written.

use std::sync::Arc;

use log::error;

use mh_core::{AgentId, Calibration, Gender, MentalState, MhError, Settlement, Thresholds, Tick};

use crate::{
    AgentRecord, AgentUpdate, AgentView, PopulationBuilder, PopulationError, PopulationResult,
    PopulationSnapshot, PopulationUpdate,
};

// ── History ───────────────────────────────────────────────────────────────────

/// One append-only history row.  An agent's history holds one entry per
/// tick from 0 to the current tick inclusive.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry {
    pub tick:              Tick,
    pub state:             MentalState,
    pub depression:        f64,
    pub anxiety:           f64,
    pub seeking_treatment: bool,
}

// ── AgentTraits ───────────────────────────────────────────────────────────────

/// Static per-agent traits (SoA).
#[derive(Clone, Debug, Default)]
pub struct AgentTraits {
    pub settlement:         Vec<Settlement>,
    pub gender:             Vec<Gender>,
    pub in_school:          Vec<bool>,
    /// Ethnicity group in `0..Calibration::ethnicity_groups`.
    pub ethnicity:          Vec<u8>,
    pub resilience:         Vec<f64>,
    /// Scales how quickly the agent's scores move toward their target.
    pub susceptibility:     Vec<f64>,
    /// Daily hours in `[0, 8]`.
    pub social_media_hours: Vec<f64>,
    pub family_support:     Vec<f64>,
    pub peer_support:       Vec<f64>,
    pub religious:          Vec<bool>,
    /// Chronic environmental stress exposure in `[0, 1]`.
    pub stress:             Vec<f64>,
}

impl AgentTraits {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self {
            settlement:         Vec::with_capacity(n),
            gender:             Vec::with_capacity(n),
            in_school:          Vec::with_capacity(n),
            ethnicity:          Vec::with_capacity(n),
            resilience:         Vec::with_capacity(n),
            susceptibility:     Vec::with_capacity(n),
            social_media_hours: Vec::with_capacity(n),
            family_support:     Vec::with_capacity(n),
            peer_support:       Vec::with_capacity(n),
            religious:          Vec::with_capacity(n),
            stress:             Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.settlement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settlement.is_empty()
    }
}

// ── Population ────────────────────────────────────────────────────────────────

/// The agent population: static traits, current mutable state, and history.
#[derive(Clone, Debug)]
pub struct Population {
    count:             usize,
    tick:              Tick,
    traits:            AgentTraits,
    state:             Vec<MentalState>,
    depression:        Vec<f64>,
    anxiety:           Vec<f64>,
    seeking_treatment: Vec<bool>,
    treatment_ticks:   Vec<u32>,
    ticks_above:       Vec<u32>,
    history:           Vec<Vec<HistoryEntry>>,
}

impl Population {
    /// Sample `n` agents from the calibrated baseline distributions.
    ///
    /// Shorthand for [`PopulationBuilder`] with an explicit calibration and
    /// thresholds.
    pub fn initialize(
        n:           usize,
        calibration: &Calibration,
        thresholds:  &Thresholds,
        seed:        u64,
    ) -> PopulationResult<Self> {
        PopulationBuilder::new(n, seed)
            .calibration(calibration.clone())
            .thresholds(thresholds.clone())
            .build()
    }

    /// Assemble a tick-0 population from sampled traits and initial values.
    pub(crate) fn from_initial(traits: AgentTraits, initial: Vec<AgentUpdate>) -> Self {
        let count = initial.len();
        let mut population = Population {
            count,
            tick:              Tick::ZERO,
            traits,
            state:             Vec::with_capacity(count),
            depression:        Vec::with_capacity(count),
            anxiety:           Vec::with_capacity(count),
            seeking_treatment: Vec::with_capacity(count),
            treatment_ticks:   Vec::with_capacity(count),
            ticks_above:       Vec::with_capacity(count),
            history:           Vec::with_capacity(count),
        };
        for u in initial {
            population.state.push(u.state);
            population.depression.push(u.depression);
            population.anxiety.push(u.anxiety);
            population.seeking_treatment.push(u.seeking_treatment);
            population.treatment_ticks.push(u.treatment_ticks);
            population.ticks_above.push(u.ticks_above);
            population.history.push(vec![HistoryEntry {
                tick:              Tick::ZERO,
                state:             u.state,
                depression:        u.depression,
                anxiety:           u.anxiety,
                seeking_treatment: u.seeking_treatment,
            }]);
        }
        population
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The tick the current state belongs to.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn traits(&self) -> &AgentTraits {
        &self.traits
    }

    #[inline]
    pub fn states(&self) -> &[MentalState] {
        &self.state
    }

    #[inline]
    pub fn state(&self, agent: AgentId) -> MentalState {
        self.state[agent.index()]
    }

    #[inline]
    pub fn depression(&self) -> &[f64] {
        &self.depression
    }

    #[inline]
    pub fn anxiety(&self) -> &[f64] {
        &self.anxiety
    }

    #[inline]
    pub fn seeking_treatment(&self) -> &[bool] {
        &self.seeking_treatment
    }

    #[inline]
    pub fn treatment_ticks(&self) -> &[u32] {
        &self.treatment_ticks
    }

    #[inline]
    pub fn ticks_above(&self) -> &[u32] {
        &self.ticks_above
    }

    /// The larger of the two scores, which drives state transitions.
    #[inline]
    pub fn distress(&self, agent: AgentId) -> f64 {
        let i = agent.index();
        self.depression[i].max(self.anxiety[i])
    }

    /// Full history of `agent`, one entry per tick from 0.
    pub fn history(&self, agent: AgentId) -> &[HistoryEntry] {
        &self.history[agent.index()]
    }

    /// `agent`'s state at a past (or the current) tick.
    pub fn state_at(&self, agent: AgentId, tick: Tick) -> Option<MentalState> {
        self.history
            .get(agent.index())?
            .get(tick.0 as usize)
            .map(|h| h.state)
    }

    /// Agent counts indexed by [`MentalState::index`].
    pub fn count_by_state(&self) -> [usize; 4] {
        let mut counts = [0usize; 4];
        for s in &self.state {
            counts[s.index()] += 1;
        }
        counts
    }

    pub fn view(&self, agent: AgentId) -> AgentView {
        let i = agent.index();
        let t = &self.traits;
        AgentView {
            id:                 agent,
            state:              self.state[i],
            depression:         self.depression[i],
            anxiety:            self.anxiety[i],
            seeking_treatment:  self.seeking_treatment[i],
            treatment_ticks:    self.treatment_ticks[i],
            settlement:         t.settlement[i],
            gender:             t.gender[i],
            in_school:          t.in_school[i],
            ethnicity:          t.ethnicity[i],
            resilience:         t.resilience[i],
            susceptibility:     t.susceptibility[i],
            social_media_hours: t.social_media_hours[i],
        }
    }

    /// A read-only copy of every agent at the current tick.
    pub fn snapshot(&self) -> PopulationSnapshot {
        let agents: Arc<[AgentView]> = self.agent_ids().map(|a| self.view(a)).collect();
        PopulationSnapshot { tick: self.tick, agents }
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Apply a full tick of updates and append one history entry per agent.
    ///
    /// The update is validated in full before anything is written: on error
    /// the population is unchanged.  Returns the new current tick.
    pub fn commit(&mut self, update: PopulationUpdate) -> PopulationResult<Tick> {
        if update.len() != self.count {
            return Err(PopulationError::AgentCountMismatch {
                expected: self.count,
                got:      update.len(),
                what:     "population update",
            });
        }

        let next = self.tick.next();
        for (i, u) in update.agents.iter().enumerate() {
            let agent = AgentId(i as u32);
            for (quantity, value) in [("depression", u.depression), ("anxiety", u.anxiety)] {
                if let Err(e) = MhError::check_unit(quantity, value, agent, next) {
                    error!("rejecting commit for {next}: {e}");
                    return Err(e.into());
                }
            }
        }

        for (i, u) in update.agents.into_iter().enumerate() {
            self.state[i]             = u.state;
            self.depression[i]        = u.depression;
            self.anxiety[i]           = u.anxiety;
            self.seeking_treatment[i] = u.seeking_treatment;
            self.treatment_ticks[i]   = u.treatment_ticks;
            self.ticks_above[i]       = u.ticks_above;
            self.history[i].push(HistoryEntry {
                tick:              next,
                state:             u.state,
                depression:        u.depression,
                anxiety:           u.anxiety,
                seeking_treatment: u.seeking_treatment,
            });
        }
        self.tick = next;
        Ok(next)
    }

    // ── Persistence ───────────────────────────────────────────────────────

    /// Export every agent as a self-contained record.
    pub fn records(&self) -> Vec<AgentRecord> {
        let t = &self.traits;
        (0..self.count)
            .map(|i| AgentRecord {
                id:                 AgentId(i as u32),
                settlement:         t.settlement[i],
                gender:             t.gender[i],
                in_school:          t.in_school[i],
                ethnicity:          t.ethnicity[i],
                resilience:         t.resilience[i],
                susceptibility:     t.susceptibility[i],
                social_media_hours: t.social_media_hours[i],
                family_support:     t.family_support[i],
                peer_support:       t.peer_support[i],
                religious:          t.religious[i],
                stress:             t.stress[i],
                state:              self.state[i],
                depression:         self.depression[i],
                anxiety:            self.anxiety[i],
                seeking_treatment:  self.seeking_treatment[i],
                treatment_ticks:    self.treatment_ticks[i],
                ticks_above:        self.ticks_above[i],
                history:            self.history[i].clone(),
            })
            .collect()
    }

    /// Rebuild a population at `tick` from exported records.
    ///
    /// Records must be in ascending dense id order and carry exactly
    /// `tick + 1` history entries each.
    pub fn from_records(tick: Tick, records: Vec<AgentRecord>) -> PopulationResult<Self> {
        let count = records.len();
        if count == 0 {
            return Err(MhError::Config("snapshot contains no agents".into()).into());
        }
        let expected_history = tick.0 as usize + 1;

        let mut traits = AgentTraits::with_capacity(count);
        let mut population = Population {
            count,
            tick,
            traits:            AgentTraits::default(),
            state:             Vec::with_capacity(count),
            depression:        Vec::with_capacity(count),
            anxiety:           Vec::with_capacity(count),
            seeking_treatment: Vec::with_capacity(count),
            treatment_ticks:   Vec::with_capacity(count),
            ticks_above:       Vec::with_capacity(count),
            history:           Vec::with_capacity(count),
        };

        for (i, r) in records.into_iter().enumerate() {
            if r.id.index() != i {
                return Err(MhError::Config(format!(
                    "snapshot record {i} carries id {}; records must be dense and ordered",
                    r.id
                ))
                .into());
            }
            if r.history.len() != expected_history {
                return Err(PopulationError::HistoryLength {
                    agent:    r.id,
                    expected: expected_history,
                    got:      r.history.len(),
                });
            }
            MhError::check_unit("depression", r.depression, r.id, tick)?;
            MhError::check_unit("anxiety", r.anxiety, r.id, tick)?;

            traits.settlement.push(r.settlement);
            traits.gender.push(r.gender);
            traits.in_school.push(r.in_school);
            traits.ethnicity.push(r.ethnicity);
            traits.resilience.push(r.resilience);
            traits.susceptibility.push(r.susceptibility);
            traits.social_media_hours.push(r.social_media_hours);
            traits.family_support.push(r.family_support);
            traits.peer_support.push(r.peer_support);
            traits.religious.push(r.religious);
            traits.stress.push(r.stress);

            population.state.push(r.state);
            population.depression.push(r.depression);
            population.anxiety.push(r.anxiety);
            population.seeking_treatment.push(r.seeking_treatment);
            population.treatment_ticks.push(r.treatment_ticks);
            population.ticks_above.push(r.ticks_above);
            population.history.push(r.history);
        }
        population.traits = traits;
        Ok(population)
    }
}
