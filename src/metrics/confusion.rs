use crate::data::dataset::Label;
use crate::error::{Result, TreeError};
use nalgebra::{DMatrix, DVector};

/// 2x2 counts, rows indexed by true label and columns by predicted label.
pub type ConfusionMatrix = DMatrix<usize>;

/// Binary classification scores, with `1` as the positive class.
pub trait ClassificationMetrics {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if the vectors differ in length or hold a
    /// label other than `0` and `1`.
    fn confusion_matrix(
        &self,
        y_true: &DVector<Label>,
        y_pred: &DVector<Label>,
    ) -> Result<ConfusionMatrix> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::InvalidInput(
                "Predictions and labels are of different sizes.".into(),
            ));
        }
        if let Some(label) = y_true.iter().chain(y_pred.iter()).find(|&&label| label > 1) {
            return Err(TreeError::InvalidInput(format!(
                "label {} is not binary",
                label
            )));
        }

        let mut matrix = DMatrix::zeros(2, 2);
        for (&y_t, &y_p) in y_true.iter().zip(y_pred.iter()) {
            matrix[(usize::from(y_t), usize::from(y_p))] += 1;
        }

        Ok(matrix)
    }

    /// Share of correctly predicted labels.
    fn accuracy(&self, y_true: &DVector<Label>, y_pred: &DVector<Label>) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;

        let correct = matrix.diagonal().sum();

        Ok(correct as f64 / y_true.len() as f64)
    }

    /// Share of predicted positives that are positive; `0.0` without predicted positives.
    fn precision(&self, y_true: &DVector<Label>, y_pred: &DVector<Label>) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;

        let tp = matrix[(1, 1)];
        let fp = matrix[(0, 1)];

        Ok(ratio(tp, tp + fp))
    }

    /// Share of positives that are predicted positive; `0.0` without positives.
    fn recall(&self, y_true: &DVector<Label>, y_pred: &DVector<Label>) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred)?;

        let tp = matrix[(1, 1)];
        let fn_ = matrix[(1, 0)];

        Ok(ratio(tp, tp + fn_))
    }

    /// Harmonic mean of precision and recall.
    ///
    /// # Errors
    ///
    /// Fails when precision and recall are both zero.
    fn f1_score(&self, y_true: &DVector<Label>, y_pred: &DVector<Label>) -> Result<f64> {
        let precision = self.precision(y_true, y_pred)?;
        let recall = self.recall(y_true, y_pred)?;

        match (precision + recall).abs() < f64::EPSILON {
            true => Err(TreeError::InvalidInput(
                "Precision and recall are both 0, F1 score undefined.".into(),
            )),
            false => Ok(2.0 * (precision * recall) / (precision + recall)),
        }
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    match whole {
        0 => 0.0,
        _ => part as f64 / whole as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct MockClassifier;

    impl ClassificationMetrics for MockClassifier {}

    #[test]
    fn test_confusion_matrix() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1, 0, 1]);
        let y_pred = DVector::from_vec(vec![1, 1, 0, 0, 1]);

        let result = classifier.confusion_matrix(&y_true, &y_pred).unwrap();

        // column-major: [[1, 1], [1, 2]]
        let expected = DMatrix::from_vec(2, 2, vec![1, 1, 1, 2]);

        assert_eq!(result, expected);
    }

    #[test]
    fn test_confusion_matrix_single_class() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![0, 0, 0]);
        let y_pred = DVector::from_vec(vec![0, 0, 0]);

        let result = classifier.confusion_matrix(&y_true, &y_pred).unwrap();

        assert_eq!(result, DMatrix::from_vec(2, 2, vec![3, 0, 0, 0]));
    }

    #[test]
    fn test_confusion_matrix_unequal() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1, 0, 1, 0]);
        let y_pred = DVector::from_vec(vec![1, 1, 0, 0, 1]);

        assert!(classifier.confusion_matrix(&y_true, &y_pred).is_err());
    }

    #[test]
    fn test_confusion_matrix_rejects_multiclass() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![0, 1, 2]);
        let y_pred = DVector::from_vec(vec![0, 1, 1]);

        assert!(matches!(
            classifier.confusion_matrix(&y_true, &y_pred),
            Err(TreeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_accuracy() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1, 0, 1]);
        let y_pred = DVector::from_vec(vec![1, 1, 0, 0, 1]);

        assert_relative_eq!(classifier.accuracy(&y_true, &y_pred).unwrap(), 0.6);
    }

    #[test]
    fn test_precision() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1, 0, 1]);
        let y_pred = DVector::from_vec(vec![1, 1, 0, 0, 1]);

        assert_relative_eq!(classifier.precision(&y_true, &y_pred).unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn test_precision_no_positive_predictions() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 1, 1, 1, 1]);
        let y_pred = DVector::from_vec(vec![0, 0, 0, 0, 0]);

        assert_eq!(classifier.precision(&y_true, &y_pred).unwrap(), 0.0);
    }

    #[test]
    fn test_recall() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1, 0, 1, 1]);
        let y_pred = DVector::from_vec(vec![1, 1, 0, 0, 1, 0]);

        assert_relative_eq!(classifier.recall(&y_true, &y_pred).unwrap(), 0.5);
    }

    #[test]
    fn test_f1_score() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 0, 1, 0, 1, 1]);
        let y_pred = DVector::from_vec(vec![1, 1, 0, 0, 1, 0]);

        // precision 2/3, recall 1/2
        let expected = 2.0 * (2.0 / 3.0 * 0.5) / (2.0 / 3.0 + 0.5);
        assert_relative_eq!(classifier.f1_score(&y_true, &y_pred).unwrap(), expected);
    }

    #[test]
    fn test_f1_score_error() {
        let classifier = MockClassifier;

        let y_true = DVector::from_vec(vec![1, 1, 1, 1, 1]);
        let y_pred = DVector::from_vec(vec![0, 0, 0, 0, 0]);

        assert!(classifier.f1_score(&y_true, &y_pred).is_err());
    }
}
