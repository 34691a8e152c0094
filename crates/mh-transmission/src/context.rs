//! Read-only inputs shared by every agent update in one tick.

use mh_agent::Population;
use mh_core::{RngStream, Tick};
use mh_network::SocialNetwork;

/// Per-agent adjustments produced by the intervention layer for one tick.
///
/// Both vectors are indexed by `AgentId` and have one entry per agent.
#[derive(Clone, Debug, PartialEq)]
pub struct InterventionEffects {
    /// Probability that an agent not yet seeking treatment starts this tick.
    pub treatment_start_probability: Vec<f64>,
    /// Factor on incoming peer influence (1.0 = unprotected).
    pub peer_multiplier:             Vec<f64>,
}

impl InterventionEffects {
    /// No intervention at all: nobody starts treatment, peer influence is
    /// unchanged.
    pub fn none(count: usize) -> Self {
        Self {
            treatment_start_probability: vec![0.0; count],
            peer_multiplier:             vec![1.0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.peer_multiplier.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peer_multiplier.is_empty()
    }
}

/// A read-only view of the pre-tick world passed to every
/// [`TransmissionModel`][crate::TransmissionModel] call.
///
/// All borrows live for the duration of one compute phase; the population
/// cannot be committed while a `TickContext` is alive.
pub struct TickContext<'a> {
    /// The tick being produced (`population.tick() + 1`).
    pub tick:       Tick,
    pub population: &'a Population,
    pub network:    &'a SocialNetwork,
    pub effects:    &'a InterventionEffects,
    pub rng:        RngStream,
}

impl<'a> TickContext<'a> {
    #[inline]
    pub fn new(
        population: &'a Population,
        network:    &'a SocialNetwork,
        effects:    &'a InterventionEffects,
        rng:        RngStream,
    ) -> Self {
        Self {
            tick: population.tick().next(),
            population,
            network,
            effects,
            rng,
        }
    }
}
