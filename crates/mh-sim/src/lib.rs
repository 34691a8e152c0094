//! `mh-sim` — lifecycle orchestrator for the mental-health transmission
//! simulator.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──initialize──▶ Ready ──step──▶ Running ──▶ Ready | Completed
//!                                 ▲  ╲                 │
//!                                 │   pause            │ observer.should_pause
//!                              resume  ╲               ▼
//!                                 └──── Paused ◀───────┘
//! reset: any ──▶ Uninitialized
//! ```
//!
//! # One tick
//!
//! ```text
//! ① Effects   — InterventionManager turns the pre-tick population and the
//!               active InterventionConfig into per-agent adjustments.
//! ② Compute   — TransmissionEngine evaluates every agent against the
//!               pre-tick snapshot (parallel with the `parallel` feature).
//! ③ Commit    — Population::commit validates and swaps all agents at once.
//! ④ Metrics   — MetricsCollector summarises the committed tick.
//! ```
//!
//! Any failure in ② or ③ leaves the state exactly as it was before the call.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the compute phase on Rayon's thread pool.         |
//! | `serde`    | Derives `Serialize`/`Deserialize` on snapshots.        |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mh_core::{SimConfig, Tick};
//! use mh_sim::SimBuilder;
//!
//! let mut sim = SimBuilder::new(SimConfig::with_population(1_000, 42)).build()?;
//! let last = sim.run_to(Tick(52))?;
//! println!("{}: {} symptomatic", last.tick, last.metrics.symptomatic);
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;
pub mod snapshot;
pub mod state;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::{Sim, TickResult};
pub use snapshot::{SimSnapshot, SimStateView};
pub use state::{SimStatus, SimulationState};
