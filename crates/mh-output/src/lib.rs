//! `mh-output` — simulation output writers and snapshot persistence.
//!
//! Two row backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                   |
//! |-----------|---------|-------------------------------------------------|
//! | *(none)*  | CSV     | `agent_snapshots.csv`, `tick_summaries.csv`     |
//! | `sqlite`  | SQLite  | `output.db`                                     |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `mh_sim::SimObserver`.
//!
//! [`write_snapshot`] / [`read_snapshot`] persist a full `SimSnapshot`
//! (agent histories, network edges, intervention log) as JSON for offline
//! reload.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mh_output::{CsvWriter, SimOutputObserver, write_snapshot};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! write_snapshot(Path::new("./output/final.json"), &sim.export_snapshot()?)?;
//! ```

pub mod csv;
pub mod error;
pub mod json;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use json::{read_snapshot, write_snapshot};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
