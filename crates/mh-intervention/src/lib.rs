//! `mh-intervention` — programme effects on the transmission inputs.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`targeting`] | `Enrolment` — who joins the peer-support programme          |
//! | [`manager`]   | `InterventionManager` — per-tick `InterventionEffects`      |
//!
//! Interventions never touch agent records.  They turn the active
//! `InterventionConfig` and the pre-tick population into per-agent
//! treatment-start probabilities and peer-influence multipliers, which the
//! transmission model consumes.

pub mod manager;
pub mod targeting;

#[cfg(test)]
mod tests;

pub use manager::InterventionManager;
pub use mh_transmission::InterventionEffects;
pub use targeting::Enrolment;
