// Timing report parsing
//
// After every execution the toolkit writes a tab-separated `timing.tsv` into
// the output directory, one row per executed component. The harness only
// needs two of its columns: `identifier` and `time_perevent_s`. Column order
// is not guaranteed, so the header row decides the positions.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// One row of the per-run timing report
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRow {
    /// Stable string name of the pipeline component
    pub identifier: String,
    /// Average wall time per event, in seconds
    pub time_perevent_s: f64,
}

/// Parsed per-run timing report
#[derive(Debug, Clone, PartialEq)]
pub struct TimingReport {
    rows: Vec<TimingRow>,
}

impl TimingReport {
    /// Load and parse a report from a tab-separated file.
    ///
    /// An absent or unreadable file signals an environment error (the run did
    /// not leave its report behind), not a transient condition.
    pub fn from_tsv_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::report(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&text).map_err(|e| match e {
            Error::Report(msg) => Error::report(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Parse report text. The first line is the header; it must name both the
    /// `identifier` and `time_perevent_s` columns.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let header = lines
            .next()
            .ok_or_else(|| Error::report("empty timing report"))?;

        let columns: Vec<&str> = header.split('\t').map(str::trim).collect();
        let identifier_col = column_index(&columns, "identifier")?;
        let time_col = column_index(&columns, "time_perevent_s")?;

        let mut rows = Vec::new();
        for (lineno, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            let identifier = fields.get(identifier_col).copied().ok_or_else(|| {
                Error::report(format!("row {}: missing identifier field", lineno + 2))
            })?;
            let raw_time = fields.get(time_col).copied().ok_or_else(|| {
                Error::report(format!("row {}: missing time_perevent_s field", lineno + 2))
            })?;
            let time_perevent_s: f64 = raw_time.parse().map_err(|_| {
                Error::report(format!(
                    "row {}: invalid time_perevent_s {:?}",
                    lineno + 2,
                    raw_time
                ))
            })?;
            rows.push(TimingRow {
                identifier: identifier.to_string(),
                time_perevent_s,
            });
        }

        Ok(Self { rows })
    }

    /// Per-event time for a component, by exact identifier match.
    ///
    /// The first matching row wins. The upstream format is not documented to
    /// repeat identifiers; if it ever does, later duplicates are ignored.
    pub fn per_event_time(&self, identifier: &str) -> Option<f64> {
        self.rows
            .iter()
            .find(|row| row.identifier == identifier)
            .map(|row| row.time_perevent_s)
    }

    /// All parsed rows, in file order
    pub fn rows(&self) -> &[TimingRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn column_index(columns: &[&str], name: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| *c == name)
        .ok_or_else(|| Error::report(format!("missing column {:?} in header", name)))
}
