//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `agent_snapshots` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS agent_snapshots (
                 agent_id          INTEGER NOT NULL,
                 tick              INTEGER NOT NULL,
                 state             TEXT    NOT NULL,
                 depression        REAL    NOT NULL,
                 anxiety           REAL    NOT NULL,
                 seeking_treatment INTEGER NOT NULL,
                 degree            INTEGER NOT NULL,
                 PRIMARY KEY (tick, agent_id)
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick                INTEGER PRIMARY KEY,
                 healthy             INTEGER NOT NULL,
                 at_risk             INTEGER NOT NULL,
                 symptomatic         INTEGER NOT NULL,
                 recovering          INTEGER NOT NULL,
                 mean_depression     REAL    NOT NULL,
                 mean_anxiety        REAL    NOT NULL,
                 treatment_seeking   INTEGER NOT NULL,
                 treatment_gap       REAL    NOT NULL,
                 reproduction_number REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_snapshots \
                 (agent_id, tick, state, depression, anxiety, seeking_treatment, degree) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.agent_id,
                    row.tick as i64,
                    row.state.as_str(),
                    row.depression,
                    row.anxiety,
                    row.seeking_treatment as i64,
                    row.degree,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (tick, healthy, at_risk, symptomatic, recovering, mean_depression, mean_anxiety, \
              treatment_seeking, treatment_gap, reproduction_number) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                row.tick as i64,
                row.healthy as i64,
                row.at_risk as i64,
                row.symptomatic as i64,
                row.recovering as i64,
                row.mean_depression,
                row.mean_anxiety,
                row.treatment_seeking as i64,
                row.treatment_gap,
                row.reproduction_number,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
