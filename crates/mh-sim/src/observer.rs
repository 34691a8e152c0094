//! Simulation observer trait for progress reporting and data collection.

use mh_agent::Population;
use mh_core::Tick;
use mh_network::SocialNetwork;

use crate::TickResult;

/// Callbacks invoked by [`Sim::run_to_observed`][crate::Sim::run_to_observed]
/// at tick boundaries.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — stop once prevalence passes a threshold
///
/// ```rust,ignore
/// struct Alarm(f64);
///
/// impl SimObserver for Alarm {
///     fn should_pause(&mut self, result: &TickResult) -> bool {
///         result.metrics.prevalence(MentalState::Symptomatic) > self.0
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before `tick` is computed.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after a tick has been committed.
    fn on_tick_end(&mut self, _result: &TickResult) {}

    /// Called after committed ticks that fall on the snapshot interval.
    ///
    /// Provides read-only access to the whole population and network so
    /// that writers can record per-agent rows without the sim knowing any
    /// output format.
    fn on_snapshot(&mut self, _tick: Tick, _population: &Population, _network: &SocialNetwork) {}

    /// Called once when the target tick has been reached.
    fn on_sim_end(&mut self, _last: &TickResult) {}

    /// Checked after every tick; returning `true` pauses the run at that
    /// tick boundary.
    fn should_pause(&mut self, _result: &TickResult) -> bool {
        false
    }
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
