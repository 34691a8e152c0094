//! `mh-agent` — the agent population.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`store`]     | `Population` (SoA arrays + history), `AgentTraits`           |
//! | [`builder`]   | `PopulationBuilder` (calibrated initial sampling)            |
//! | [`view`]      | `AgentView`, `PopulationSnapshot`, `AgentUpdate`, `PopulationUpdate`, `AgentRecord` |
//! | [`error`]     | `PopulationError`, `PopulationResult<T>`                     |
//!
//! Agents are addressed by dense `AgentId` index into every array.  The
//! mutable fields change only through [`Population::commit`], which applies
//! a whole tick's [`PopulationUpdate`] at once after validating it, so
//! readers never observe a half-written tick.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on records and views.    |

pub mod builder;
pub mod error;
pub mod store;
pub mod view;


pub use builder::PopulationBuilder;
pub use error::{PopulationError, PopulationResult};
pub use store::{AgentTraits, HistoryEntry, Population};
pub use view::{AgentRecord, AgentUpdate, AgentView, PopulationSnapshot, PopulationUpdate};
