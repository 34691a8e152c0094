//! JSON persistence for [`SimSnapshot`].
//!
//! Floats are written in shortest round-trip form and parsed exactly, so a
//! reloaded snapshot restores bit-identical scores.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::info;

use mh_sim::SimSnapshot;

use crate::OutputResult;

/// Write `snapshot` to `path`, replacing any existing file.
pub fn write_snapshot(path: &Path, snapshot: &SimSnapshot) -> OutputResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, snapshot)?;
    out.flush()?;
    info!(
        "wrote snapshot at {} ({} agents, {} edges) to {}",
        snapshot.tick,
        snapshot.agents.len(),
        snapshot.edges.len(),
        path.display()
    );
    Ok(())
}

/// Read a snapshot previously written by [`write_snapshot`].
///
/// Only the JSON shape is checked here; consistency is checked when the
/// snapshot is restored into a `Sim`.
pub fn read_snapshot(path: &Path) -> OutputResult<SimSnapshot> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
