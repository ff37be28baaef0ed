//! Threshold search for one ordered feature under the Gini criterion.
use crate::data::dataset::{Label, RealNumber};
use nalgebra::DVector;
use ordered_float::OrderedFloat;

/// Every admissible threshold of a feature together with the best one.
///
/// `thresholds`, `scores` and `left_sizes` are aligned index for index and
/// sorted by ascending threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitSearch<T: RealNumber> {
    pub thresholds: Vec<T>,
    pub scores: Vec<f64>,
    /// Number of rows strictly below each threshold.
    pub left_sizes: Vec<usize>,
    pub best_threshold: T,
    pub best_score: f64,
}

impl<T: RealNumber> SplitSearch<T> {
    /// Best threshold among those leaving at least `min_leaf` of the `n_samples`
    /// rows on each side. Ties go to the smaller threshold.
    pub fn best_with_min_leaf(&self, n_samples: usize, min_leaf: usize) -> Option<(T, f64)> {
        let admissible = self
            .left_sizes
            .iter()
            .map(|&left| left >= min_leaf && n_samples - left >= min_leaf);

        first_max(
            self.scores
                .iter()
                .zip(admissible)
                .map(|(&score, ok)| if ok { score } else { f64::NEG_INFINITY }),
        )
        .filter(|&(_, score)| score > f64::NEG_INFINITY)
        .map(|(index, score)| (self.thresholds[index], score))
    }
}

/// Finds the best Gini split of `feature_values` against binary `labels`.
///
/// The score of a split into `L` and `R` is
/// `-|L|/n * H(L) - |R|/n * H(R)` with `H(S) = 1 - p1² - p0²`, so larger is
/// better. Thresholds are midpoints of consecutive sorted values; positions
/// between equal values are dropped. When a midpoint rounds onto the lower
/// value (or overflows) the upper value is used instead, so every threshold
/// sends at least one row to each side of `value < threshold`.
///
/// Returns `None` when nothing is left, i.e. the feature is constant, or when
/// the two slices differ in length.
pub fn find_best_split<T: RealNumber>(
    feature_values: &[T],
    labels: &[Label],
) -> Option<SplitSearch<T>> {
    let n = feature_values.len();
    if n < 2 || n != labels.len() {
        return None;
    }

    let mut sorted = feature_values
        .iter()
        .copied()
        .zip(labels.iter().copied())
        .collect::<Vec<_>>();
    sorted.sort_by_key(|&(value, _)| OrderedFloat(value));

    let targets = DVector::from_iterator(n, sorted.iter().map(|&(_, y)| f64::from(y)));
    let total_positive = targets.sum();
    let total = n as f64;

    // one entry per split position i = 1..n
    let left_sizes = DVector::from_iterator(n - 1, (1..n).map(|i| i as f64));
    let right_sizes = left_sizes.map(|size| total - size);
    let left_positive = DVector::from_iterator(
        n - 1,
        targets
            .iter()
            .scan(0.0, |acc, &y| {
                *acc += y;
                Some(*acc)
            })
            .take(n - 1),
    );
    let right_positive = left_positive.map(|positive| total_positive - positive);
    let left_negative = &left_sizes - &left_positive;
    let right_negative = &right_sizes - &right_positive;

    let impurity_left = gini_impurity(&left_positive, &left_negative, &left_sizes);
    let impurity_right = gini_impurity(&right_positive, &right_negative, &right_sizes);
    let scores = -(left_sizes.component_mul(&impurity_left) / total)
        - right_sizes.component_mul(&impurity_right) / total;

    let two = T::one() + T::one();
    let (thresholds, (scores, left_sizes)): (Vec<T>, (Vec<f64>, Vec<usize>)) = sorted
        .windows(2)
        .zip(scores.iter())
        .enumerate()
        .filter(|(_, (pair, _))| pair[0].0 < pair[1].0)
        .map(|(i, (pair, &score))| {
            let (lower, upper) = (pair[0].0, pair[1].0);
            let midpoint = (lower + upper) / two;
            let threshold = if lower < midpoint && midpoint <= upper {
                midpoint
            } else {
                upper
            };
            (threshold, (score, i + 1))
        })
        .unzip();

    let (best_index, best_score) = first_max(scores.iter().copied())?;
    Some(SplitSearch {
        best_threshold: thresholds[best_index],
        best_score,
        thresholds,
        scores,
        left_sizes,
    })
}

/// `1 - p1² - p0²` for every position at once.
fn gini_impurity(
    positive: &DVector<f64>,
    negative: &DVector<f64>,
    sizes: &DVector<f64>,
) -> DVector<f64> {
    let p1 = positive.component_div(sizes);
    let p0 = negative.component_div(sizes);
    p1.zip_map(&p0, |p1, p0| 1.0 - p1 * p1 - p0 * p0)
}

/// Index and value of the first maximum.
fn first_max(values: impl Iterator<Item = f64>) -> Option<(usize, f64)> {
    values.enumerate().fold(None, |best, (index, value)| match best {
        Some((_, best_value)) if value <= best_value => best,
        _ => Some((index, value)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_distinct_values_give_midpoint() {
        for labels in [[0, 0], [0, 1], [1, 0], [1, 1]] {
            let split = find_best_split(&[3.0, 1.0], &labels).unwrap();
            assert_eq!(split.thresholds, vec![2.0]);
            assert_eq!(split.best_threshold, 2.0);
            assert_eq!(split.left_sizes, vec![1]);
        }
    }

    #[test]
    fn test_perfect_split() {
        let split = find_best_split(&[1.0, 2.0, 3.0, 4.0], &[0, 0, 1, 1]).unwrap();

        assert_eq!(split.thresholds, vec![1.5, 2.5, 3.5]);
        assert_eq!(split.best_threshold, 2.5);
        assert_relative_eq!(split.best_score, 0.0);
        // left {0}, right {0,1,1}: -(3/4) * (1 - 4/9 - 1/9)
        assert_relative_eq!(split.scores[0], -1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(split.scores[2], -1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unsorted_input_is_sorted_jointly() {
        let split = find_best_split(&[4.0, 1.0, 3.0, 2.0], &[1, 0, 1, 0]).unwrap();

        assert_eq!(split.thresholds, vec![1.5, 2.5, 3.5]);
        assert_eq!(split.best_threshold, 2.5);
    }

    #[test]
    fn test_repeated_values_are_not_split() {
        let split = find_best_split(&[1.0, 1.0, 2.0, 2.0, 2.0, 5.0], &[0, 1, 1, 0, 1, 1]).unwrap();

        assert_eq!(split.thresholds, vec![1.5, 3.5]);
        assert_eq!(split.left_sizes, vec![2, 5]);
        assert_eq!(split.scores.len(), 2);
    }

    #[test]
    fn test_at_most_n_minus_one_candidates() {
        let values = [0.5, 1.0, 2.0, 4.0, 8.0];
        let split = find_best_split(&values, &[0, 1, 0, 1, 0]).unwrap();
        assert_eq!(split.thresholds.len(), values.len() - 1);

        let split = find_best_split(&[0.5, 1.0, 1.0, 4.0, 8.0], &[0, 1, 0, 1, 0]).unwrap();
        assert!(split.thresholds.len() < values.len() - 1);
    }

    #[test]
    fn test_constant_feature_is_degenerate() {
        assert!(find_best_split(&[7.0, 7.0, 7.0], &[0, 1, 0]).is_none());
        assert!(find_best_split(&[7.0], &[1]).is_none());
        assert!(find_best_split::<f64>(&[], &[]).is_none());
    }

    #[test]
    fn test_ties_pick_smallest_threshold() {
        // symmetric labels: splits at 1.5 and 3.5 score the same
        let split = find_best_split(&[1.0, 2.0, 3.0, 4.0], &[0, 1, 1, 0]).unwrap();

        assert_relative_eq!(split.scores[0], split.scores[2]);
        assert!(split.scores[0] > split.scores[1]);
        assert_eq!(split.best_threshold, 1.5);
    }

    #[test]
    fn test_pure_labels_still_return_threshold() {
        let split = find_best_split(&[1.0, 2.0, 3.0], &[1, 1, 1]).unwrap();

        assert!(split.scores.iter().all(|&score| score.abs() < 1e-12));
        assert_eq!(split.best_threshold, 1.5);
    }

    #[test]
    fn test_best_with_min_leaf() {
        let split = find_best_split(&[1.0, 2.0, 3.0, 4.0, 5.0], &[0, 1, 1, 1, 1]).unwrap();
        assert_eq!(split.best_threshold, 1.5);

        let (threshold, _) = split.best_with_min_leaf(5, 2).unwrap();
        assert_eq!(threshold, 2.5);
        assert!(split.best_with_min_leaf(5, 3).is_none());
    }

    #[test]
    fn test_collapsed_midpoint_uses_upper_value() {
        // (1 + (1 + eps)) / 2 rounds back to 1.0
        let next = 1.0 + f64::EPSILON;
        let split = find_best_split(&[1.0, next, 3.0], &[0, 1, 1]).unwrap();

        assert_eq!(split.thresholds, vec![next, 2.0]);
        assert_eq!(split.best_threshold, next);
        assert_relative_eq!(split.best_score, 0.0);
    }

    #[test]
    fn test_overflowing_midpoint_uses_upper_value() {
        let split = find_best_split(&[f64::MAX / 2.0 * 1.5, f64::MAX], &[0, 1]).unwrap();

        assert_eq!(split.thresholds, vec![f64::MAX]);
    }

    #[test]
    fn test_length_mismatch_is_rejected() {
        assert!(find_best_split(&[1.0, 2.0, 3.0], &[0, 1]).is_none());
        assert!(find_best_split(&[1.0, 2.0], &[0, 1, 1]).is_none());
    }

    #[test]
    fn test_works_on_f32() {
        let split = find_best_split(&[1.0f32, 2.0, 3.0, 4.0], &[0, 0, 1, 1]).unwrap();
        assert_eq!(split.best_threshold, 2.5f32);
    }
}
