//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

pub const AGENT_HEADERS: [&str; 7] =
    ["agent_id", "tick", "state", "depression", "anxiety", "seeking_treatment", "degree"];

pub const SUMMARY_HEADERS: [&str; 10] = [
    "tick",
    "healthy",
    "at_risk",
    "symptomatic",
    "recovering",
    "mean_depression",
    "mean_anxiety",
    "treatment_seeking",
    "treatment_gap",
    "reproduction_number",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("agent_snapshots.csv"))?;
        snapshots.write_record(AGENT_HEADERS)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADERS)?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.state.as_str().to_owned(),
                row.depression.to_string(),
                row.anxiety.to_string(),
                (row.seeking_treatment as u8).to_string(),
                row.degree.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.healthy.to_string(),
            row.at_risk.to_string(),
            row.symptomatic.to_string(),
            row.recovering.to_string(),
            row.mean_depression.to_string(),
            row.mean_anxiety.to_string(),
            row.treatment_seeking.to_string(),
            row.treatment_gap.to_string(),
            row.reproduction_number.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
