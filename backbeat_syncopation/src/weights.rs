// Metrical weight table: the salience of each step in one bar.
//
// Weights follow the Longuet-Higgins & Lee hierarchy on a sixteenth-note
// grid: the downbeat is 0, the half-bar -1, quarter beats -2, eighths -3 and
// the remaining sixteenths -4. Lower is weaker. The table's length is the
// grid length; the scorer refuses any table that does not match the rhythm
// it is asked to score.

use crate::error::{Result, SyncopationError};
use serde::{Deserialize, Serialize};

/// One 4/4 bar at sixteenth-note resolution.
pub const SIXTEEN_STEP: [i32; 16] = [0, -4, -3, -4, -2, -4, -3, -4, -1, -4, -3, -4, -2, -4, -3, -4];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricalWeights(Vec<i32>);

impl MetricalWeights {
    pub fn new(weights: Vec<i32>) -> Self {
        MetricalWeights(weights)
    }

    pub fn sixteen_step() -> Self {
        MetricalWeights(SIXTEEN_STEP.to_vec())
    }

    /// Two copies of the sixteen-step pattern back to back. A 32-step bar
    /// repeats the same emphasis twice rather than deepening the hierarchy.
    pub fn thirty_two_step() -> Self {
        MetricalWeights(SIXTEEN_STEP.iter().chain(SIXTEEN_STEP.iter()).copied().collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Weight at `step`. Callers check the length first via `check_grid_length`.
    pub fn at(&self, step: usize) -> i32 {
        self.0[step]
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.0
    }

    pub fn check_grid_length(&self, grid_length: usize) -> Result<()> {
        if self.0.len() != grid_length {
            return Err(SyncopationError::WeightLengthMismatch {
                weights: self.0.len(),
                grid_length,
            });
        }
        Ok(())
    }
}

impl Default for MetricalWeights {
    fn default() -> Self {
        Self::sixteen_step()
    }
}

impl From<Vec<i32>> for MetricalWeights {
    fn from(weights: Vec<i32>) -> Self {
        MetricalWeights(weights)
    }
}
