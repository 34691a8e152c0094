//! The `Sim` struct: lifecycle and tick loop.

use log::{debug, info};

use mh_core::{InterventionConfig, SimConfig, Tick};
use mh_metrics::{MetricsCollector, TickMetrics};
use mh_network::{HomophilyGenerator, NetworkGenerator};
use mh_transmission::{CalibratedTransmission, TickContext, TransmissionEngine, TransmissionModel};

use crate::{
    SimError, SimObserver, SimResult, SimSnapshot, SimStateView, SimStatus, SimulationState,
};

/// Outcome of one committed tick (or, for `run_to`, the last one).
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickResult {
    pub tick:    Tick,
    pub metrics: TickMetrics,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation runner.
///
/// `Sim<M>` owns one [`SimulationState`] and advances it through the
/// four-phase tick (effects, compute, commit, metrics).  Every tick either
/// commits completely or leaves the state untouched.
///
/// Create via [`SimBuilder`][crate::SimBuilder], or start
/// [`Uninitialized`](SimStatus::Uninitialized) with [`Sim::with_model`] and
/// call [`initialize`](Sim::initialize).
pub struct Sim<M: TransmissionModel = CalibratedTransmission> {
    pub(crate) status:            SimStatus,
    pub(crate) state:             Option<SimulationState>,
    pub(crate) engine:            TransmissionEngine<M>,
    /// Overrides the config-driven `HomophilyGenerator` when set.
    pub(crate) generator:         Option<Box<dyn NetworkGenerator>>,
    pub(crate) collector:         MetricsCollector,
    /// Summary of the last committed tick.
    pub(crate) metrics:           TickMetrics,
    /// Deliver `on_snapshot` every this many ticks (0 = never).
    pub(crate) snapshot_interval: u64,
}

impl Sim {
    /// An uninitialised simulation driven by [`CalibratedTransmission`].
    pub fn new() -> Self {
        Self::with_model(CalibratedTransmission::default())
    }
}

impl Default for Sim {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TransmissionModel> Sim<M> {
    /// An uninitialised simulation driven by `model`.
    pub fn with_model(model: M) -> Self {
        Self {
            status:            SimStatus::Uninitialized,
            state:             None,
            engine:            TransmissionEngine::new(model),
            generator:         None,
            collector:         MetricsCollector::default(),
            metrics:           TickMetrics::default(),
            snapshot_interval: 0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn status(&self) -> SimStatus {
        self.status
    }

    /// The last committed tick (tick 0 before the first step).
    pub fn tick(&self) -> Tick {
        self.state.as_ref().map_or(Tick::ZERO, SimulationState::tick)
    }

    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    /// Summary of the last committed tick, if initialised.
    pub fn metrics(&self) -> Option<&TickMetrics> {
        self.state.as_ref().map(|_| &self.metrics)
    }

    pub fn model(&self) -> &M {
        &self.engine.model
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Build the initial state from `config`.  Uninitialized → Ready.
    pub fn initialize(&mut self, config: SimConfig) -> SimResult<()> {
        self.require_status("initialize", &[SimStatus::Uninitialized])?;
        self.engine.model.configure(&config.transmission, &config.thresholds);
        self.collector.thresholds = config.thresholds.clone();

        let state = match &self.generator {
            Some(generator) => SimulationState::initialize(config, generator.as_ref())?,
            None => {
                let generator = HomophilyGenerator::new(config.network.clone());
                SimulationState::initialize(config, &generator)?
            }
        };
        self.install(state);
        Ok(())
    }

    /// Rebuild the state from an exported snapshot.  Uninitialized → Ready
    /// (or Completed when the snapshot is at or past `total_ticks`).
    pub fn restore(&mut self, snapshot: SimSnapshot) -> SimResult<()> {
        self.require_status("restore", &[SimStatus::Uninitialized])?;
        self.engine.model.configure(&snapshot.config.transmission, &snapshot.config.thresholds);
        self.collector.thresholds = snapshot.config.thresholds.clone();

        let state = SimulationState::restore(snapshot)?;
        self.install(state);
        Ok(())
    }

    /// Discard the state.  Any status → Uninitialized.
    pub fn reset(&mut self) {
        if let Some(state) = self.state.take() {
            info!("reset after {} of {} ticks", state.tick(), state.config.total_ticks);
        }
        self.metrics = TickMetrics::default();
        self.status = SimStatus::Uninitialized;
    }

    /// Ready → Paused.  Pausing a paused run is a no-op.
    pub fn pause(&mut self) -> SimResult<()> {
        self.require_status("pause", &[SimStatus::Ready, SimStatus::Paused])?;
        self.status = SimStatus::Paused;
        Ok(())
    }

    /// Paused → Ready.
    pub fn resume(&mut self) -> SimResult<()> {
        self.require_status("resume", &[SimStatus::Paused])?;
        self.status = self.settled();
        Ok(())
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Execute exactly one tick.
    ///
    /// Valid in Ready or Paused; ends in Ready, or Completed once
    /// `total_ticks` is reached.  On error the state and status are those
    /// from before the call.
    pub fn step(&mut self) -> SimResult<TickResult> {
        let before = self.require_status("step", &[SimStatus::Ready, SimStatus::Paused])?;
        self.status = SimStatus::Running;
        match self.advance() {
            Ok(result) => {
                self.status = self.settled();
                Ok(result)
            }
            Err(e) => {
                self.status = before;
                Err(e)
            }
        }
    }

    /// Execute ticks until `target` without observer callbacks, then settle
    /// into Completed.  Returns the final tick's result.
    ///
    /// `target` may lie beyond `total_ticks`.  If a tick fails, the ticks
    /// before it stay committed and the status returns to what it was.
    pub fn run_to(&mut self, target: Tick) -> SimResult<TickResult> {
        let before = self.require_status("run_to", &[SimStatus::Ready, SimStatus::Paused])?;
        self.check_target(target)?;
        self.status = SimStatus::Running;
        while self.tick() < target {
            if let Err(e) = self.advance() {
                self.status = before;
                return Err(e);
            }
        }
        self.status = SimStatus::Completed;
        Ok(self.current())
    }

    /// Like [`run_to`](Self::run_to), with observer hooks at every tick
    /// boundary.
    ///
    /// If `observer.should_pause` returns `true` before `target` is reached,
    /// the run stops in Paused and returns that tick's result.
    pub fn run_to_observed<O: SimObserver>(
        &mut self,
        target:   Tick,
        observer: &mut O,
    ) -> SimResult<TickResult> {
        let before = self.require_status("run_to", &[SimStatus::Ready, SimStatus::Paused])?;
        self.check_target(target)?;
        self.status = SimStatus::Running;

        while self.tick() < target {
            observer.on_tick_start(self.tick().next());
            let result = match self.advance() {
                Ok(r) => r,
                Err(e) => {
                    self.status = before;
                    return Err(e);
                }
            };
            observer.on_tick_end(&result);

            if self.snapshot_interval > 0 && result.tick.0.is_multiple_of(self.snapshot_interval) {
                if let Some(state) = &self.state {
                    observer.on_snapshot(result.tick, &state.population, &state.network);
                }
            }

            if result.tick < target && observer.should_pause(&result) {
                info!("paused at {}", result.tick);
                self.status = SimStatus::Paused;
                return Ok(result);
            }
        }

        self.status = SimStatus::Completed;
        let last = self.current();
        observer.on_sim_end(&last);
        Ok(last)
    }

    /// Run to `config.total_ticks` with observer hooks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<TickResult> {
        let end = self.state.as_ref().map_or(0, |s| s.config.total_ticks);
        self.run_to_observed(Tick(end), observer)
    }

    // ── Readers and control ───────────────────────────────────────────────

    /// Read-only copy of the current tick boundary.
    pub fn get_state(&self) -> SimResult<SimStateView> {
        let state = self.require("get_state")?;
        Ok(SimStateView {
            tick:          state.tick(),
            status:        self.status,
            agents:        state.population.snapshot(),
            edges:         state.network.edges().to_vec(),
            metrics:       self.metrics.clone(),
            interventions: state.interventions.config().clone(),
        })
    }

    /// Replace the intervention settings from the next tick on.
    ///
    /// Valid in Ready or Paused.  An invalid config is rejected and the
    /// previous one stays active.
    pub fn update_interventions(&mut self, config: InterventionConfig) -> SimResult<()> {
        self.require_status("update_interventions", &[SimStatus::Ready, SimStatus::Paused])?;
        let state = self.require_mut("update_interventions")?;
        state.interventions.update(config.clone())?;
        let tick = state.tick();
        state.intervention_log.push((tick, config));
        info!("interventions updated at {tick}");
        Ok(())
    }

    pub fn export_snapshot(&self) -> SimResult<SimSnapshot> {
        Ok(self.require("export_snapshot")?.export())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// One transactional tick: nothing is written until the whole
    /// population update has been computed and validated.
    fn advance(&mut self) -> SimResult<TickResult> {
        let status = self.status;
        let state = self
            .state
            .as_mut()
            .ok_or(SimError::InvalidState { op: "step", status })?;

        let effects = state.interventions.effects(&state.population);
        let ctx = TickContext::new(&state.population, &state.network, &effects, state.rng);
        let update = self.engine.compute_tick(&ctx)?;
        let tick = state.population.commit(update)?;

        let metrics = self.collector.collect(&state.population, &state.network);
        debug!(
            "{tick}: {} healthy, {} at risk, {} symptomatic, {} recovering, R {:.2}",
            metrics.healthy,
            metrics.at_risk,
            metrics.symptomatic,
            metrics.recovering,
            metrics.reproduction_number
        );
        self.metrics = metrics.clone();
        Ok(TickResult { tick, metrics })
    }

    fn install(&mut self, state: SimulationState) {
        self.metrics = self.collector.collect(&state.population, &state.network);
        self.state = Some(state);
        self.status = self.settled();
    }

    /// Ready, or Completed once `total_ticks` has been reached.
    fn settled(&self) -> SimStatus {
        match &self.state {
            Some(s) if s.tick().0 < s.config.total_ticks => SimStatus::Ready,
            Some(_) => SimStatus::Completed,
            None    => SimStatus::Uninitialized,
        }
    }

    fn current(&self) -> TickResult {
        TickResult { tick: self.tick(), metrics: self.metrics.clone() }
    }

    /// Returns the current status if it is one of `allowed`.
    fn require_status(&self, op: &'static str, allowed: &[SimStatus]) -> SimResult<SimStatus> {
        if allowed.contains(&self.status) {
            Ok(self.status)
        } else {
            Err(SimError::InvalidState { op, status: self.status })
        }
    }

    fn require(&self, op: &'static str) -> SimResult<&SimulationState> {
        self.state.as_ref().ok_or(SimError::InvalidState { op, status: self.status })
    }

    fn require_mut(&mut self, op: &'static str) -> SimResult<&mut SimulationState> {
        let status = self.status;
        self.state.as_mut().ok_or(SimError::InvalidState { op, status })
    }

    fn check_target(&self, target: Tick) -> SimResult<()> {
        let current = self.tick();
        if target < current {
            return Err(SimError::TargetInPast { target, current });
        }
        Ok(())
    }
}
