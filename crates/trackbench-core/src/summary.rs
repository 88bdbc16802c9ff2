// Per-run samples and the aggregate summary
//
// A sample holds exactly two durations per run: the active simulation stage
// (keyed `fatras` or `geant4` depending on the engine variant) and the track
// finder (keyed `ckf`). Samples accumulate in a TimingSummary and are flushed
// to a CSV file exactly once, after every run has succeeded.

use crate::config::{PipelineConfig, TRACK_FINDING_IDENTIFIER, TRACK_FINDING_KEY};
use crate::error::{Error, Result};
use crate::report::TimingReport;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Stage timings extracted from one run's report.
///
/// Backed by an insertion-ordered list so the summary CSV keeps the
/// simulation column ahead of the track-finding column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingSample {
    entries: Vec<(String, f64)>,
}

impl TimingSample {
    fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Duration in seconds for a logical stage key
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    /// Stage keys in column order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// (key, seconds) pairs in column order
    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }
}

/// Extract the per-run sample from a timing report.
///
/// Looks up exactly the active simulation identifier and the track-finding
/// identifier. Either one missing is fatal: the stage ran without leaving a
/// timing entry, or never ran at all, and neither is worth averaging around.
pub fn extract_sample(report: &TimingReport, config: &PipelineConfig) -> Result<TimingSample> {
    let simulation_id = config.simulation_identifier();
    let simulation = report
        .per_event_time(simulation_id)
        .ok_or_else(|| Error::missing_stage(simulation_id))?;
    let track_finding = report
        .per_event_time(TRACK_FINDING_IDENTIFIER)
        .ok_or_else(|| Error::missing_stage(TRACK_FINDING_IDENTIFIER))?;

    Ok(TimingSample::new(vec![
        (config.simulation_key().to_string(), simulation),
        (TRACK_FINDING_KEY.to_string(), track_finding),
    ]))
}

/// Ordered per-run samples for a whole benchmark, keyed by the toolkit build
/// that produced them
#[derive(Debug, Clone, Serialize)]
pub struct TimingSummary {
    build_id: String,
    samples: Vec<TimingSample>,
}

impl TimingSummary {
    pub fn new(build_id: impl Into<String>) -> Self {
        Self {
            build_id: build_id.into(),
            samples: Vec::new(),
        }
    }

    /// Append one run's sample
    pub fn push(&mut self, sample: TimingSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[TimingSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Short build identifier of the toolkit under test
    pub fn build_id(&self) -> &str {
        &self.build_id
    }

    /// Write the summary as `<build_id>.csv` in `dir`, one row per run, one
    /// column per tracked stage key, overwriting any prior file of that name.
    /// Returns the path written.
    pub fn persist(&self, dir: &Path) -> Result<PathBuf> {
        let first = self
            .samples
            .first()
            .ok_or_else(|| Error::config("refusing to persist an empty summary"))?;

        let keys: Vec<&str> = first.keys().collect();
        let mut out = String::new();
        out.push_str(&keys.join(","));
        out.push('\n');
        for sample in &self.samples {
            let row: Vec<String> = keys
                .iter()
                .map(|&key| {
                    sample.get(key).map(|v| v.to_string()).ok_or_else(|| {
                        Error::config(format!("sample missing stage key {:?}", key))
                    })
                })
                .collect::<Result<_>>()?;
            out.push_str(&row.join(","));
            out.push('\n');
        }

        let path = dir.join(format!("{}.csv", self.build_id));
        fs::write(&path, out)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorMode, SimulationEngine};

    fn fatras_config() -> PipelineConfig {
        PipelineConfig::new(GeneratorMode::ParticleGun, SimulationEngine::Fatras, "out")
    }

    fn geant4_config() -> PipelineConfig {
        PipelineConfig::new(GeneratorMode::ParticleGun, SimulationEngine::Geant4, "out")
    }

    fn report(rows: &[(&str, f64)]) -> TimingReport {
        let mut text = String::from("identifier\ttime_perevent_s\n");
        for (id, t) in rows {
            text.push_str(&format!("{}\t{}\n", id, t));
        }
        TimingReport::parse(&text).unwrap()
    }

    #[test]
    fn fatras_sample_has_fatras_and_ckf_keys() {
        let report = report(&[
            ("Algorithm:FatrasSimulation", 0.5),
            ("Algorithm:TrackFindingAlgorithm", 1.2),
        ]);
        let sample = extract_sample(&report, &fatras_config()).unwrap();
        assert_eq!(sample.get("fatras"), Some(0.5));
        assert_eq!(sample.get("ckf"), Some(1.2));
        assert_eq!(sample.keys().collect::<Vec<_>>(), ["fatras", "ckf"]);
    }

    #[test]
    fn geant4_sample_has_geant4_and_ckf_keys() {
        let report = report(&[
            ("Algorithm:Geant4Simulation", 3.1),
            ("Algorithm:TrackFindingAlgorithm", 1.2),
        ]);
        let sample = extract_sample(&report, &geant4_config()).unwrap();
        assert_eq!(sample.get("geant4"), Some(3.1));
        assert_eq!(sample.get("ckf"), Some(1.2));
        assert_eq!(sample.get("fatras"), None);
    }

    #[test]
    fn extraction_is_idempotent() {
        let report = report(&[
            ("Algorithm:FatrasSimulation", 0.5),
            ("Algorithm:TrackFindingAlgorithm", 1.2),
        ]);
        let config = fatras_config();
        let first = extract_sample(&report, &config).unwrap();
        let second = extract_sample(&report, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_track_finding_entry_is_fatal() {
        let report = report(&[("Algorithm:FatrasSimulation", 0.5)]);
        let err = extract_sample(&report, &fatras_config()).unwrap_err();
        assert!(matches!(err, Error::MissingStage(ref id)
            if id == "Algorithm:TrackFindingAlgorithm"));
    }

    #[test]
    fn wrong_simulation_entry_is_fatal() {
        // Report carries Fatras timing but the config expects Geant4
        let report = report(&[
            ("Algorithm:FatrasSimulation", 0.5),
            ("Algorithm:TrackFindingAlgorithm", 1.2),
        ]);
        let err = extract_sample(&report, &geant4_config()).unwrap_err();
        assert!(matches!(err, Error::MissingStage(_)));
    }

    #[test]
    fn persist_writes_one_row_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let config = fatras_config();
        let mut summary = TimingSummary::new("abc1234");
        for t in [0.5, 0.6] {
            let report = report(&[
                ("Algorithm:FatrasSimulation", t),
                ("Algorithm:TrackFindingAlgorithm", 1.2),
            ]);
            summary.push(extract_sample(&report, &config).unwrap());
        }

        let path = summary.persist(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("abc1234.csv"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "fatras,ckf\n0.5,1.2\n0.6,1.2\n");
    }

    #[test]
    fn persist_overwrites_prior_summary() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("abc1234.csv");
        std::fs::write(&stale, "stale").unwrap();

        let mut summary = TimingSummary::new("abc1234");
        let report = report(&[
            ("Algorithm:FatrasSimulation", 0.5),
            ("Algorithm:TrackFindingAlgorithm", 1.2),
        ]);
        summary.push(extract_sample(&report, &fatras_config()).unwrap());
        summary.persist(dir.path()).unwrap();

        let written = std::fs::read_to_string(&stale).unwrap();
        assert!(!written.contains("stale"));
        assert!(written.starts_with("fatras,ckf\n"));
    }

    #[test]
    fn persist_refuses_an_empty_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary = TimingSummary::new("abc1234");
        assert!(summary.persist(dir.path()).is_err());
        assert!(!dir.path().join("abc1234.csv").exists());
    }
}
