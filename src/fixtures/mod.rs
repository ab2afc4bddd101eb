//! Fixture utilities for the deterministic CLI harness.
//!
//! This module discovers fixture assets (`<name>.mid` with an optional
//! sibling `<name>.expect.json`), loads expectation JSON, and verifies an
//! analysis bundle against it. It is intentionally desktop-focused to
//! support CI and QA workflows.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::perturbation::PerturbationRecord;
use crate::analysis::PerturbationAnalysis;

/// Default location for fixture MIDI/JSON assets.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

/// Metadata describing an available fixture.
#[derive(Clone, Debug)]
pub struct FixtureMetadata {
    pub name: String,
    pub midi_path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// JSON expectation schema for fixture verification.
#[derive(Debug, Clone, Deserialize)]
pub struct FixtureExpectations {
    pub fixture: String,
    #[serde(default)]
    pub notes: Option<String>,
    /// Expected number of selected events, when pinned.
    #[serde(default)]
    pub event_count: Option<usize>,
    pub perturbations: Vec<ExpectedPerturbation>,
}

/// Expected perturbation record definition.
///
/// `time_beats` and `variation` are optional so expectations can pin only
/// the positions; an infinite variation is expressed by omitting the
/// `variation` field (JSON cannot carry infinity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedPerturbation {
    pub position: usize,
    #[serde(default)]
    pub time_beats: Option<f64>,
    #[serde(default = "default_beats_tolerance")]
    pub beats_tolerance: f64,
    #[serde(default)]
    pub variation: Option<f64>,
    #[serde(default = "default_variation_tolerance")]
    pub variation_tolerance: f64,
}

fn default_beats_tolerance() -> f64 {
    0.01
}

fn default_variation_tolerance() -> f64 {
    1e-6
}

impl FixtureExpectations {
    pub fn verify(
        &self,
        actual: &PerturbationAnalysis,
    ) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();

        if let Some(expected_count) = self.event_count {
            if actual.event_count != expected_count {
                failures.push(ExpectationFailure {
                    index: None,
                    expected: None,
                    actual: None,
                    detail: format!(
                        "event count mismatch: expected {}, got {}",
                        expected_count, actual.event_count
                    ),
                });
            }
        }

        let records = actual.scan.records();
        for (idx, expected) in self.perturbations.iter().enumerate() {
            match records.get(idx) {
                Some(record) => {
                    if let Some(detail) = expected.mismatch(record) {
                        failures.push(ExpectationFailure {
                            index: Some(idx),
                            expected: Some(expected.clone()),
                            actual: Some(*record),
                            detail,
                        });
                    }
                }
                None => failures.push(ExpectationFailure {
                    index: Some(idx),
                    expected: Some(expected.clone()),
                    actual: None,
                    detail: "missing perturbation".to_string(),
                }),
            }
        }

        for (idx, record) in records.iter().enumerate().skip(self.perturbations.len()) {
            failures.push(ExpectationFailure {
                index: Some(idx),
                expected: None,
                actual: Some(*record),
                detail: "unexpected perturbation".to_string(),
            });
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

impl ExpectedPerturbation {
    /// Describe how `record` misses this expectation, if it does.
    fn mismatch(&self, record: &PerturbationRecord) -> Option<String> {
        if record.position != self.position {
            return Some(format!(
                "position mismatch: expected {}, got {}",
                self.position, record.position
            ));
        }
        if let Some(time_beats) = self.time_beats {
            let delta = (record.time_beats - time_beats).abs();
            if delta > self.beats_tolerance {
                return Some(format!(
                    "time mismatch at position {}: expected {:.4} beats, got {:.4}",
                    self.position, time_beats, record.time_beats
                ));
            }
        }
        if let Some(variation) = self.variation {
            // NaN delta (e.g. an infinite actual against a finite
            // expectation) must count as a mismatch.
            let delta = (record.variation - variation).abs();
            if delta.is_nan() || delta > self.variation_tolerance {
                return Some(format!(
                    "variation mismatch at position {}: expected {}, got {}",
                    self.position, variation, record.variation
                ));
            }
        }
        None
    }
}

/// Outcome of comparing actual results with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "index": failure.index,
                    "expected": failure.expected,
                    "actual": failure.actual,
                    "detail": failure.detail,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Detailed diff entry for a single failure.
#[derive(Debug)]
pub struct ExpectationFailure {
    pub index: Option<usize>,
    pub expected: Option<ExpectedPerturbation>,
    pub actual: Option<PerturbationRecord>,
    pub detail: String,
}

/// Load an expectation file from an explicit path.
pub fn load_expectations(path: &Path) -> Result<FixtureExpectations> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading expectation {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all fixtures by their metadata.
    pub fn discover(&self) -> Result<Vec<FixtureMetadata>> {
        let mut fixtures = Vec::new();
        if !self.root.exists() {
            return Ok(fixtures);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                let path = entry.path();
                let is_midi = matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("mid") | Some("midi")
                );
                if is_midi {
                    let expect = path.with_extension("expect.json");
                    fixtures.push(FixtureMetadata {
                        name: path
                            .file_stem()
                            .and_then(|s| s.to_str())
                            .unwrap_or_default()
                            .to_string(),
                        midi_path: path.clone(),
                        expect_path: expect.exists().then_some(expect),
                    });
                }
            }
        }

        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fixtures)
    }

    /// Resolve a fixture name (or direct path) and load its expectations.
    pub fn load(
        &self,
        fixture: &str,
        override_expect: Option<PathBuf>,
    ) -> Result<(FixtureMetadata, Option<FixtureExpectations>)> {
        let midi_path = self.resolve_fixture_path(fixture)?;
        let metadata = self.metadata_for_path(&midi_path)?;

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => Some(load_expectations(&path)?),
            None => None,
        };

        Ok((metadata, expectations))
    }

    fn resolve_fixture_path(&self, fixture: &str) -> Result<PathBuf> {
        let as_path = Path::new(fixture);
        if as_path.exists() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{fixture}.mid"));
        if candidate.exists() {
            Ok(candidate)
        } else {
            Err(anyhow!(
                "Fixture '{fixture}' not found in {}",
                self.root.display()
            ))
        }
    }

    fn metadata_for_path(&self, midi_path: &Path) -> Result<FixtureMetadata> {
        let name = midi_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("Invalid fixture name for {}", midi_path.display()))?
            .to_string();
        let expect_path = midi_path.with_extension("expect.json");
        Ok(FixtureMetadata {
            name,
            midi_path: midi_path.to_path_buf(),
            expect_path: expect_path.exists().then_some(expect_path),
        })
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}
