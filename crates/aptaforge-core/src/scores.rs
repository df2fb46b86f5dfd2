//! Confidence/quality score tables produced by the driver.
//!
//! Each completed run leaves a tabular summary of its designs: one row per
//! predicted complex, with the interface-confidence score, the overall
//! structure-confidence score, and the deviation between the designed and
//! re-predicted structures. Triage means ranking by interface confidence
//! and cutting at acceptance thresholds.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Failed to open score table '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed score table: {0}")]
    Parse(#[from] csv::Error),
}

/// One designed complex and its model-reported quality metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignScore {
    /// File identifier of the predicted complex structure.
    pub design: String,
    /// Interface-confidence score, in [0, 1].
    pub iptm: f64,
    /// Structure-confidence score of the whole complex, in [0, 1].
    pub complex_plddt: f64,
    /// Deviation between designed and re-predicted structures, in Å.
    pub rmsd: f64,
}

/// Thresholds separating reportable designs from discards.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct AcceptanceCriteria {
    pub min_iptm: f64,
    pub min_plddt: f64,
    pub max_rmsd: f64,
}

impl Default for AcceptanceCriteria {
    fn default() -> Self {
        Self {
            min_iptm: 0.5,
            min_plddt: 0.7,
            max_rmsd: 2.0,
        }
    }
}

impl AcceptanceCriteria {
    pub fn accepts(&self, score: &DesignScore) -> bool {
        score.iptm >= self.min_iptm
            && score.complex_plddt >= self.min_plddt
            && score.rmsd <= self.max_rmsd
    }
}

#[derive(Debug, Default)]
pub struct ScoreTable {
    pub scores: Vec<DesignScore>,
}

impl ScoreTable {
    pub fn from_path(path: &Path) -> Result<Self, ScoreError> {
        let file = File::open(path).map_err(|e| ScoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScoreError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let scores = csv_reader
            .deserialize()
            .collect::<Result<Vec<DesignScore>, _>>()?;
        Ok(Self { scores })
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// All designs, best first: interface confidence descending, ties broken
    /// by deviation ascending. NaN metrics sort last.
    pub fn ranked(&self) -> Vec<&DesignScore> {
        let mut ranked: Vec<&DesignScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| {
            compare_desc(a.iptm, b.iptm).then_with(|| compare_asc(a.rmsd, b.rmsd))
        });
        ranked
    }

    pub fn best(&self) -> Option<&DesignScore> {
        self.ranked().into_iter().next()
    }

    /// Designs passing the acceptance thresholds, best first.
    pub fn accepted(&self, criteria: &AcceptanceCriteria) -> Vec<&DesignScore> {
        self.ranked()
            .into_iter()
            .filter(|s| criteria.accepts(s))
            .collect()
    }
}

fn compare_desc(a: f64, b: f64) -> Ordering {
    compare_asc(b, a)
}

fn compare_asc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Writes scores back out in the driver's own CSV format.
pub fn write_scores<'a, W: Write>(
    scores: impl IntoIterator<Item = &'a DesignScore>,
    writer: W,
) -> Result<(), ScoreError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for score in scores {
        csv_writer.serialize(score)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
