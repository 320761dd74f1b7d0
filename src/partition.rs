//! Randomized train/test partitioning and k-fold splitting.
//!
//! The RNG is injected so runs are seedable; partitioning itself is
//! sampling without replacement, destructive on its working copies.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::errors::PipelineError;
use crate::types::Label;

/// One aligned `(features, labels)` collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    /// Feature rows.
    pub features: Vec<Vec<f64>>,
    /// Labels aligned 1:1 with `features`.
    pub labels: Vec<Label>,
}

impl Dataset {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when the dataset holds no rows.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Split `(features, labels)` into disjoint training and test sets.
///
/// The test set size is `round(N * (1 - ratio))`. Rows are moved one at a
/// time: a uniformly random remaining index is removed from the working set
/// and appended to the test set; whatever remains is the training set. The
/// inputs are consumed, so the original collections cannot be reused.
///
/// `ratio = 1.0` yields an empty test set; `ratio = 0.0` yields an empty
/// training set. Fails with [`PipelineError::LengthMismatch`] when the
/// inputs are not aligned.
pub fn train_test_split<R: Rng + ?Sized>(
    mut features: Vec<Vec<f64>>,
    mut labels: Vec<Label>,
    ratio: f64,
    rng: &mut R,
) -> Result<(Dataset, Dataset), PipelineError> {
    if features.len() != labels.len() {
        return Err(PipelineError::LengthMismatch {
            features: features.len(),
            labels: labels.len(),
        });
    }
    if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
        return Err(PipelineError::Configuration(format!(
            "split ratio must lie in [0.0, 1.0], got {ratio}"
        )));
    }

    let test_len = (features.len() as f64 * (1.0 - ratio)).round() as usize;
    let mut test = Dataset::default();
    for _ in 0..test_len {
        let idx = rng.gen_range(0..features.len());
        test.features.push(features.remove(idx));
        test.labels.push(labels.remove(idx));
    }

    let train = Dataset { features, labels };
    Ok((train, test))
}

/// Split `(features, labels)` into `k` disjoint folds.
///
/// Each fold is returned as `(train, test)` where the test set is the fold
/// itself and the training set is every other row. Rows are shuffled once
/// with the injected RNG, then dealt into folds of near-equal size (the
/// first `N mod k` folds get one extra row).
pub fn k_fold<R: Rng + ?Sized>(
    features: &[Vec<f64>],
    labels: &[Label],
    k: usize,
    rng: &mut R,
) -> Result<Vec<(Dataset, Dataset)>, PipelineError> {
    if features.len() != labels.len() {
        return Err(PipelineError::LengthMismatch {
            features: features.len(),
            labels: labels.len(),
        });
    }
    if k < 2 || k > features.len() {
        return Err(PipelineError::Configuration(format!(
            "fold count must lie in [2, {}], got {k}",
            features.len()
        )));
    }

    let mut order: Vec<usize> = (0..features.len()).collect();
    order.shuffle(rng);

    let base = order.len() / k;
    let remainder = order.len() % k;
    let mut fold_bounds = Vec::with_capacity(k);
    let mut start = 0usize;
    for fold in 0..k {
        let size = base + usize::from(fold < remainder);
        fold_bounds.push((start, start + size));
        start += size;
    }

    let mut splits = Vec::with_capacity(k);
    for &(fold_start, fold_end) in &fold_bounds {
        let mut train = Dataset::default();
        let mut test = Dataset::default();
        for (pos, &row) in order.iter().enumerate() {
            let target = if pos >= fold_start && pos < fold_end {
                &mut test
            } else {
                &mut train
            };
            target.features.push(features[row].clone());
            target.labels.push(labels[row]);
        }
        splits.push((train, test));
    }
    Ok(splits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample(n: usize) -> (Vec<Vec<f64>>, Vec<Label>) {
        let features: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64, (i * 2) as f64]).collect();
        let labels: Vec<Label> = (0..n).map(|i| i as f64 * 0.5).collect();
        (features, labels)
    }

    fn sorted_pairs(set: &Dataset) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = set
            .features
            .iter()
            .zip(&set.labels)
            .map(|(f, l)| (format!("{f:?}"), format!("{l}")))
            .collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn split_preserves_the_row_multiset() {
        let (features, labels) = sample(20);
        let mut rng = StdRng::seed_from_u64(3);
        let (train, test) =
            train_test_split(features.clone(), labels.clone(), 0.7, &mut rng).unwrap();

        assert_eq!(train.len() + test.len(), 20);
        assert_eq!(test.len(), (20.0_f64 * 0.3).round() as usize);

        let mut combined: Vec<(String, String)> = sorted_pairs(&train);
        combined.extend(sorted_pairs(&test));
        combined.sort();
        let original = Dataset { features, labels };
        assert_eq!(combined, sorted_pairs(&original));
    }

    #[test]
    fn split_keeps_rows_aligned_with_labels() {
        let (features, labels) = sample(12);
        let mut rng = StdRng::seed_from_u64(9);
        let (train, test) = train_test_split(features, labels, 0.5, &mut rng).unwrap();
        for set in [&train, &test] {
            for (row, label) in set.features.iter().zip(&set.labels) {
                // label was derived as features[0] * 0.5 in sample()
                assert_eq!(row[0] * 0.5, *label);
            }
        }
    }

    #[test]
    fn ratio_one_yields_empty_test_set() {
        let (features, labels) = sample(7);
        let mut rng = StdRng::seed_from_u64(1);
        let (train, test) = train_test_split(features, labels, 1.0, &mut rng).unwrap();
        assert_eq!(test.len(), 0);
        assert_eq!(train.len(), 7);
    }

    #[test]
    fn ratio_zero_yields_empty_training_set() {
        let (features, labels) = sample(7);
        let mut rng = StdRng::seed_from_u64(1);
        let (train, test) = train_test_split(features, labels, 0.0, &mut rng).unwrap();
        assert_eq!(train.len(), 0);
        assert_eq!(test.len(), 7);
    }

    #[test]
    fn test_size_matches_rounding_exactly() {
        let mut rng = StdRng::seed_from_u64(4);
        // 10 * (1 - 0.86) = 1.4 -> 1; 10 * (1 - 0.84) = 1.6 -> 2
        let (features, labels) = sample(10);
        let (_, test) = train_test_split(features, labels, 0.86, &mut rng).unwrap();
        assert_eq!(test.len(), 1);
        let (features, labels) = sample(10);
        let (_, test) = train_test_split(features, labels, 0.84, &mut rng).unwrap();
        assert_eq!(test.len(), 2);
    }

    #[test]
    fn misaligned_inputs_fail_with_length_mismatch() {
        let (features, _) = sample(5);
        let mut rng = StdRng::seed_from_u64(0);
        let err = train_test_split(features, vec![1.0, 2.0], 0.5, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::LengthMismatch {
                features: 5,
                labels: 2
            }
        ));
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let (features, labels) = sample(5);
        let mut rng = StdRng::seed_from_u64(0);
        let err = train_test_split(features, labels, 1.5, &mut rng).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn seeded_splits_are_reproducible() {
        let (features, labels) = sample(16);
        let mut rng_a = StdRng::seed_from_u64(77);
        let mut rng_b = StdRng::seed_from_u64(77);
        let split_a = train_test_split(features.clone(), labels.clone(), 0.6, &mut rng_a).unwrap();
        let split_b = train_test_split(features, labels, 0.6, &mut rng_b).unwrap();
        assert_eq!(split_a, split_b);
    }

    #[test]
    fn k_fold_produces_disjoint_covering_folds() {
        let (features, labels) = sample(10);
        let mut rng = StdRng::seed_from_u64(5);
        let folds = k_fold(&features, &labels, 3, &mut rng).unwrap();
        assert_eq!(folds.len(), 3);

        let sizes: Vec<usize> = folds.iter().map(|(_, test)| test.len()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 10);
        assert_eq!(sizes, vec![4, 3, 3]);

        let mut all_test_rows: Vec<(String, String)> = Vec::new();
        for (train, test) in &folds {
            assert_eq!(train.len() + test.len(), 10);
            all_test_rows.extend(sorted_pairs(test));
        }
        all_test_rows.sort();
        let original = Dataset { features, labels };
        assert_eq!(all_test_rows, sorted_pairs(&original));
    }

    #[test]
    fn k_fold_rejects_degenerate_fold_counts() {
        let (features, labels) = sample(4);
        let mut rng = StdRng::seed_from_u64(2);
        assert!(k_fold(&features, &labels, 1, &mut rng).is_err());
        assert!(k_fold(&features, &labels, 5, &mut rng).is_err());
    }
}
