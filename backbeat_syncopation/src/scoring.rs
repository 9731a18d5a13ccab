// Syncopation scoring over a rhythm sequence.
//
// Every onset step is compared with the nearest onset before it. The search
// runs backward and wraps around the bar, so the first onset of the bar is
// compared with the last, the way a looping groove is heard. A lone onset
// finds itself and contributes nothing.
//
// For onset `i` with predecessor `p`, `delta = weight[i] - weight[p]`. When
// `delta > 0` the onset counts: it adds `delta` plus the interaction bonus
// for the token pair (token[p], token[i]). Otherwise it adds nothing.
//
// The total is the sum of the per-onset `Syncopation` records, which
// `syncopation_contributions` exposes for inspection. Worst case is quadratic
// in the grid length, which is at most a few dozen steps.

use crate::error::Result;
use crate::interaction::InteractionTable;
use crate::rhythm::RhythmSequence;
use crate::weights::MetricalWeights;
use serde::{Deserialize, Serialize};

/// One onset that contributed to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syncopation {
    pub step: usize,
    /// The onset it was compared against (may be later in the bar, via wrap).
    pub previous_step: usize,
    /// `weight[step] - weight[previous_step]`, always positive here. Wide
    /// enough that any pair of `i32` weights subtracts exactly.
    pub delta: i64,
    pub bonus: i32,
}

impl Syncopation {
    pub fn value(&self) -> i64 {
        self.delta + i64::from(self.bonus)
    }
}

/// Nearest onset strictly before `step`, wrapping around the bar. If `step`
/// is the only onset it is its own predecessor. Returns `None` when the
/// rhythm has no onsets at all or `step` is outside it.
pub fn previous_onset(rhythm: &RhythmSequence, step: usize) -> Option<usize> {
    let len = rhythm.len();
    if step >= len {
        return None;
    }
    (1..=len)
        .map(|back| (step + len - back) % len)
        .find(|&candidate| rhythm.is_onset(candidate))
}

/// Every onset that adds to the syncopation index, in step order.
pub fn syncopation_contributions(
    rhythm: &RhythmSequence,
    weights: &MetricalWeights,
    interactions: &InteractionTable,
) -> Result<Vec<Syncopation>> {
    weights.check_grid_length(rhythm.len())?;

    let mut found = Vec::new();
    for step in rhythm.onsets() {
        // An onset always has a predecessor: at worst itself.
        let Some(previous_step) = previous_onset(rhythm, step) else {
            continue;
        };
        let delta = i64::from(weights.at(step)) - i64::from(weights.at(previous_step));
        if delta <= 0 {
            continue;
        }
        let bonus = interactions.bonus(rhythm.token(previous_step), rhythm.token(step));
        tracing::debug!(
            step,
            previous_step,
            delta,
            bonus,
            prev = rhythm.token(previous_step),
            curr = rhythm.token(step),
            "syncopated onset"
        );
        found.push(Syncopation {
            step,
            previous_step,
            delta,
            bonus,
        });
    }
    Ok(found)
}

/// Syncopation index of a rhythm sequence.
///
/// Fails only if `weights` does not have one entry per rhythm step.
pub fn score_rhythm(
    rhythm: &RhythmSequence,
    weights: &MetricalWeights,
    interactions: &InteractionTable,
) -> Result<i64> {
    let contributions = syncopation_contributions(rhythm, weights, interactions)?;
    Ok(contributions.iter().map(Syncopation::value).sum())
}
