//! `SimulationState` — everything a run needs to produce its next tick.

use std::fmt;

use log::info;

use mh_agent::{Population, PopulationBuilder};
use mh_core::{InterventionConfig, RngStream, SimConfig, Substream, Tick};
use mh_intervention::InterventionManager;
use mh_network::{NetworkGenerator, NodeAttributes, SocialNetwork, SocialNetworkBuilder};

use crate::{SimError, SimResult, SimSnapshot};

// ── SimStatus ─────────────────────────────────────────────────────────────────

/// Lifecycle state of a [`Sim`][crate::Sim].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SimStatus {
    #[default]
    Uninitialized,
    Ready,
    /// Only observable from inside observer hooks.
    Running,
    Paused,
    Completed,
}

impl SimStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SimStatus::Uninitialized => "uninitialized",
            SimStatus::Ready         => "ready",
            SimStatus::Running       => "running",
            SimStatus::Paused        => "paused",
            SimStatus::Completed     => "completed",
        }
    }
}

impl fmt::Display for SimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SimulationState ───────────────────────────────────────────────────────────

/// The population, its network, the active interventions, and the RNG
/// stream.
///
/// Agent RNGs are derived from `(seed, agent, tick)`, so `rng` plus the
/// population's tick is the whole random state of the run.
#[derive(Clone, Debug)]
pub struct SimulationState {
    /// The configuration the run was initialised with.  The active
    /// intervention settings live in `interventions`.
    pub config:           SimConfig,
    pub population:       Population,
    pub network:          SocialNetwork,
    pub interventions:    InterventionManager,
    pub rng:              RngStream,
    /// Every accepted `update_interventions` call, oldest first.
    pub intervention_log: Vec<(Tick, InterventionConfig)>,
}

impl SimulationState {
    /// Validate `config`, sample the population, and generate its network.
    pub fn initialize(config: SimConfig, generator: &dyn NetworkGenerator) -> SimResult<Self> {
        config.validate()?;
        let rng = RngStream::new(config.seed);

        let population = PopulationBuilder::new(config.population_size, config.seed)
            .calibration(config.calibration.clone())
            .thresholds(config.thresholds.clone())
            .build()?;

        let nodes = node_attributes(&population);
        let network = generator.generate(&nodes, &mut rng.substream(Substream::Network))?;
        if network.node_count() != population.count() {
            return Err(mh_core::MhError::Config(format!(
                "generator produced {} nodes for {} agents",
                network.node_count(),
                population.count()
            ))
            .into());
        }

        let interventions = InterventionManager::new(config.interventions.clone(), &network, rng)?;

        info!(
            "initialised {} agents, {} edges (mean degree {:.2}), seed {}",
            population.count(),
            network.edge_count(),
            network.mean_degree(),
            config.seed
        );

        Ok(Self {
            config,
            population,
            network,
            interventions,
            rng,
            intervention_log: Vec::new(),
        })
    }

    /// The last committed tick.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.population.tick()
    }

    /// Copy out everything needed to rebuild this state.
    pub fn export(&self) -> SimSnapshot {
        SimSnapshot {
            config:           self.config.clone(),
            tick:             self.tick(),
            interventions:    self.interventions.config().clone(),
            intervention_log: self.intervention_log.clone(),
            agents:           self.population.records(),
            edges:            self.network.edges().to_vec(),
        }
    }

    /// Rebuild a state from a snapshot.
    ///
    /// Programme enrolment depends only on the seed and the network, so it
    /// is recomputed rather than stored.
    pub fn restore(snapshot: SimSnapshot) -> SimResult<Self> {
        let SimSnapshot { config, tick, interventions, intervention_log, agents, edges } = snapshot;
        config.validate()?;
        if agents.len() != config.population_size {
            return Err(SimError::Snapshot(format!(
                "{} agent records for a population of {}",
                agents.len(),
                config.population_size
            )));
        }

        let population = Population::from_records(tick, agents)?;

        let mut builder = SocialNetworkBuilder::with_capacity(population.count(), edges.len());
        for edge in &edges {
            if !builder.add_edge(edge.a, edge.b, edge.kind, edge.weight)? {
                return Err(SimError::Snapshot(format!(
                    "duplicate edge between {} and {}",
                    edge.a, edge.b
                )));
            }
        }
        let network = builder.build();

        let rng = RngStream::new(config.seed);
        let interventions = InterventionManager::new(interventions, &network, rng)?;

        info!(
            "restored {} agents, {} edges at {tick} ({} intervention changes)",
            population.count(),
            network.edge_count(),
            intervention_log.len()
        );

        Ok(Self { config, population, network, interventions, rng, intervention_log })
    }
}

/// The per-agent attributes the network generator conditions on.
pub fn node_attributes(population: &Population) -> Vec<NodeAttributes> {
    let traits = population.traits();
    traits
        .settlement
        .iter()
        .zip(&traits.ethnicity)
        .zip(&traits.social_media_hours)
        .map(|((&settlement, &ethnicity), &social_media_hours)| NodeAttributes {
            settlement,
            ethnicity,
            social_media_hours,
        })
        .collect()
}
