// Batch scoring for training-signal consumers.
//
// A model regularized on syncopation scores whole batches of generated bars
// and compares them pairwise. Each bar is scored independently under a shared
// read-only config, so the batch fans out across rayon's pool; results come
// back in input order.

use crate::config::SyncopationConfig;
use crate::error::Result;
use crate::rhythm::NoteEvent;
use rayon::prelude::*;

/// Score every bar in `batch`. Any failing bar fails the batch.
pub fn score_batch<B>(batch: &[B], config: &SyncopationConfig) -> Result<Vec<i64>>
where
    B: AsRef<[NoteEvent]> + Sync,
{
    batch
        .par_iter()
        .map(|events| config.score(events.as_ref()))
        .collect()
}

/// Square matrix of absolute score differences: `out[i][j] = |s_i - s_j|`.
pub fn pairwise_distances(scores: &[i64]) -> Vec<Vec<i64>> {
    scores
        .par_iter()
        .map(|&a| scores.iter().map(|&b| (a - b).abs()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncopationError;

    fn bar(events: &[(u8, i64)]) -> Vec<NoteEvent> {
        events.iter().map(|&(pitch, step)| NoteEvent::new(pitch, step)).collect()
    }

    #[test]
    fn test_score_batch_matches_single_scores() {
        let config = SyncopationConfig::default();
        let batch = vec![
            bar(&[]),
            bar(&[(36, 0), (38, 8)]),
            bar(&[(42, 0), (36, 2), (42, 4), (42, 8), (42, 12)]),
        ];
        let scores = score_batch(&batch, &config).unwrap();
        let expected: Vec<i64> = batch.iter().map(|b| config.score(b).unwrap()).collect();
        assert_eq!(scores, expected);
        assert_eq!(scores[0], 0);
    }

    #[test]
    fn test_score_batch_fails_on_unmapped_pitch() {
        let config = SyncopationConfig::default();
        let batch = vec![bar(&[(36, 0)]), bar(&[(99, 0)])];
        assert!(matches!(
            score_batch(&batch, &config),
            Err(SyncopationError::UnmappedPitch { pitch: 99 })
        ));
    }

    #[test]
    fn test_pairwise_distances() {
        let d = pairwise_distances(&[0, 3, -2]);
        assert_eq!(d, vec![vec![0, 3, 2], vec![3, 0, 5], vec![2, 5, 0]]);
        assert!(pairwise_distances(&[]).is_empty());
    }
}
