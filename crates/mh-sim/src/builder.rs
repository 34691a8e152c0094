//! Fluent builder for constructing a [`Sim`].

use mh_core::SimConfig;
use mh_network::NetworkGenerator;
use mh_transmission::{CalibratedTransmission, TransmissionModel};

use crate::{Sim, SimResult, SimSnapshot};

enum Source {
    Config(SimConfig),
    Snapshot(Box<SimSnapshot>),
}

/// Fluent builder for a ready-to-step [`Sim<M>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                                   |
/// |--------------------------|-------------------------------------------|
/// | `.model(m)`              | `CalibratedTransmission` from the config  |
/// | `.generator(g)`          | `HomophilyGenerator` from `config.network`|
/// | `.r_window(t)`           | `mh_metrics::DEFAULT_R_WINDOW`            |
/// | `.snapshot_interval(t)`  | 0 (no `on_snapshot` calls)                |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .snapshot_interval(10)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<M: TransmissionModel = CalibratedTransmission> {
    source:            Source,
    model:             M,
    generator:         Option<Box<dyn NetworkGenerator>>,
    r_window:          Option<u64>,
    snapshot_interval: u64,
}

impl SimBuilder {
    /// Start a fresh run from `config`.
    pub fn new(config: SimConfig) -> Self {
        Self::with_source(Source::Config(config))
    }

    /// Resume a run from an exported snapshot.
    pub fn from_snapshot(snapshot: SimSnapshot) -> Self {
        Self::with_source(Source::Snapshot(Box::new(snapshot)))
    }

    fn with_source(source: Source) -> Self {
        Self {
            source,
            model:             CalibratedTransmission::default(),
            generator:         None,
            r_window:          None,
            snapshot_interval: 0,
        }
    }
}

impl<M: TransmissionModel> SimBuilder<M> {
    /// Replace the transmission model.  It receives the run's calibration
    /// through [`TransmissionModel::configure`].
    pub fn model<N: TransmissionModel>(self, model: N) -> SimBuilder<N> {
        SimBuilder {
            source:            self.source,
            model,
            generator:         self.generator,
            r_window:          self.r_window,
            snapshot_interval: self.snapshot_interval,
        }
    }

    /// Replace the network generator.  Ignored when restoring a snapshot.
    pub fn generator(mut self, generator: impl NetworkGenerator + 'static) -> Self {
        self.generator = Some(Box::new(generator));
        self
    }

    /// Look-back window (ticks) for the reproduction-number estimate.
    pub fn r_window(mut self, ticks: u64) -> Self {
        self.r_window = Some(ticks);
        self
    }

    /// Deliver `SimObserver::on_snapshot` every `ticks` ticks (0 = never).
    pub fn snapshot_interval(mut self, ticks: u64) -> Self {
        self.snapshot_interval = ticks;
        self
    }

    /// Initialise (or restore) and return a [`Sim`] in Ready.
    pub fn build(self) -> SimResult<Sim<M>> {
        let mut sim = Sim::with_model(self.model);
        sim.generator = self.generator;
        sim.snapshot_interval = self.snapshot_interval;
        if let Some(ticks) = self.r_window {
            sim.collector.r_window = ticks;
        }

        match self.source {
            Source::Config(config)     => sim.initialize(config)?,
            Source::Snapshot(snapshot) => sim.restore(*snapshot)?,
        }
        Ok(sim)
    }
}
