//! `mh-metrics` — population-level statistics at a tick boundary.
//!
//! [`MetricsCollector::collect`] is a pure function of the population (with
//! its history) and the network.  It never mutates either and may be called
//! by any reader between ticks.

pub mod collector;


pub use collector::{MetricsCollector, TickMetrics, DEFAULT_R_WINDOW};
