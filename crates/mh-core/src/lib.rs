//! `mh-core` — foundational types for the mental-health transmission simulator.
//!
//! This crate is a dependency of every other `mh-*` crate.  It intentionally
//! has no `mh-*` dependencies and minimal external ones (`rand`, `rand_distr`
//! and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                               |
//! |-----------------|--------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `EdgeId`                                    |
//! | [`time`]        | `Tick`                                                 |
//! | [`rng`]         | `AgentRng` (per agent, per tick), `SimRng`, `RngStream`|
//! | [`state`]       | `MentalState`                                          |
//! | [`demography`]  | `Settlement`, `Gender`                                 |
//! | [`config`]      | `SimConfig` and its calibrated sub-configs             |
//! | [`error`]       | `MhError`, `MhResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!
//! `mh-output` enables `serde` for snapshot persistence.

pub mod config;
pub mod demography;
pub mod error;
pub mod ids;
pub mod rng;
pub mod state;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    Calibration, HomophilyConfig, InterventionConfig, NetworkConfig, PeerSupportTargeting,
    ScoreWeights, SimConfig, Thresholds, TransmissionParams,
};
pub use demography::{Gender, Settlement};
pub use error::{MhError, MhResult};
pub use ids::{AgentId, EdgeId};
pub use rng::{AgentRng, RngStream, SimRng, Substream};
pub use state::MentalState;
pub use time::Tick;
