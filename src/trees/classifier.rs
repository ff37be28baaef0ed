//! Decision Tree Classifier
use super::{
    feature::FeatureType,
    node::{Node, SplitRule},
    params::TreeParams,
    split::find_best_split,
};
use crate::{
    data::dataset::{check_finite, Dataset, Label, RealNumber},
    error::{Result, TreeError},
    metrics::confusion::ClassificationMetrics,
};
use nalgebra::{DMatrix, DVector};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info, trace};

/// Winning split of a node.
struct SplitData<T: RealNumber> {
    feature_index: usize,
    rule: SplitRule<T>,
    goes_left: Vec<bool>,
    score: f64,
}

/// Binary decision tree grown greedily under the Gini criterion.
///
/// Each column is either [`FeatureType::Real`] or [`FeatureType::Categorical`].
/// Categories are stored in the feature matrix as numeric values and are only
/// ever compared for equality.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<T: RealNumber> {
    root: Option<Node<T>>,
    tree_params: TreeParams,
}

impl<T: RealNumber> ClassificationMetrics for DecisionTreeClassifier<T> {}

impl<T: RealNumber> DecisionTreeClassifier<T> {
    /// Creates an unconstrained tree for columns of the given types.
    pub fn new(feature_types: Vec<FeatureType>) -> Self {
        Self {
            root: None,
            tree_params: TreeParams::new(feature_types),
        }
    }

    /// Creates a tree from feature type tags (`"real"` or `"categorical"`).
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidConfiguration`] if any tag is unknown.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        Ok(Self {
            root: None,
            tree_params: TreeParams::from_tags(tags)?,
        })
    }

    /// Creates a tree with stopping parameters.
    ///
    /// # Arguments
    ///
    /// * `feature_types` - Type of every feature column.
    /// * `max_depth` - A node at this depth becomes a leaf.
    /// * `min_samples_split` - A node with fewer rows becomes a leaf.
    /// * `min_samples_leaf` - Splits leaving fewer rows on a side are not considered.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidConfiguration`] if the maximum depth is less than 1,
    /// the minimum number of samples to split is less than 2 or the minimum number of
    /// samples in a leaf is less than 1.
    pub fn with_params(
        feature_types: Vec<FeatureType>,
        max_depth: Option<u16>,
        min_samples_split: Option<usize>,
        min_samples_leaf: Option<usize>,
    ) -> Result<Self> {
        let mut tree = Self::new(feature_types);

        tree.set_max_depth(max_depth)?;
        tree.set_min_samples_split(min_samples_split)?;
        tree.set_min_samples_leaf(min_samples_leaf)?;
        Ok(tree)
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<()> {
        self.tree_params.set_max_depth(max_depth)
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: Option<usize>) -> Result<()> {
        self.tree_params.set_min_samples_split(min_samples_split)
    }

    pub fn set_min_samples_leaf(&mut self, min_samples_leaf: Option<usize>) -> Result<()> {
        self.tree_params.set_min_samples_leaf(min_samples_leaf)
    }

    pub fn feature_types(&self) -> &[FeatureType] {
        self.tree_params.feature_types()
    }

    /// Snapshot of the configuration. There are no nested estimators, so
    /// `deep` changes nothing.
    pub fn get_params(&self, _deep: bool) -> TreeParams {
        self.tree_params.clone()
    }

    /// Root of the fitted tree.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_ref()
    }

    /// Builds the tree from scratch, discarding any previous fit.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if the dataset is empty, its labels aren't
    /// binary, a feature value isn't finite or the number of columns differs from the
    /// number of feature types.
    pub fn fit(&mut self, dataset: &Dataset<T>) -> Result<String> {
        self.root = None;
        dataset.validate()?;
        self.check_columns(dataset.ncols())?;

        let root = self.build_tree(dataset, 0)?;
        info!(
            nodes = root.n_nodes(),
            leaves = root.n_leaves(),
            depth = root.depth(),
            "decision tree fitted"
        );
        self.root = Some(root);
        Ok("Finished building the tree.".into())
    }

    /// Predicts one label per row of `prediction_features`, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotFitted`] if the tree wasn't built yet and
    /// [`TreeError::InvalidInput`] for rows of the wrong width or with non-finite values.
    pub fn predict(&self, prediction_features: &DMatrix<T>) -> Result<DVector<Label>> {
        let root = self.root.as_ref().ok_or(TreeError::NotFitted)?;
        self.check_columns(prediction_features.ncols())?;
        check_finite(prediction_features)?;

        let predictions = (0..prediction_features.nrows())
            .into_par_iter()
            .map(|i| {
                let row = prediction_features
                    .row(i)
                    .iter()
                    .copied()
                    .collect::<Vec<_>>();
                root.classify(&row)
            })
            .collect::<Vec<_>>();

        Ok(DVector::from_vec(predictions))
    }

    fn check_columns(&self, ncols: usize) -> Result<()> {
        let expected = self.feature_types().len();
        if ncols != expected {
            return Err(TreeError::InvalidInput(format!(
                "expected {} feature columns, got {}",
                expected, ncols
            )));
        }
        Ok(())
    }

    fn build_tree(&self, dataset: &Dataset<T>, depth: u16) -> Result<Node<T>> {
        let labels = dataset.labels();

        if let Some(&first) = labels.first() {
            if labels.iter().all(|&label| label == first) {
                debug!(depth, rows = labels.len(), label = first, "pure leaf");
                return Ok(Node::leaf(first));
            }
        }

        let too_deep = self
            .tree_params
            .max_depth()
            .is_some_and(|max_depth| depth >= max_depth);
        let too_small = self
            .tree_params
            .min_samples_split()
            .is_some_and(|min_samples| labels.len() < min_samples);
        if too_deep || too_small {
            let label = majority_label(labels);
            debug!(depth, rows = labels.len(), label, "leaf by stopping rule");
            return Ok(Node::leaf(label));
        }

        let Some(best_split) = self.best_split(dataset)? else {
            let label = majority_label(labels);
            debug!(depth, rows = labels.len(), label, "no usable split");
            return Ok(Node::leaf(label));
        };
        debug!(
            depth,
            rows = labels.len(),
            feature = best_split.feature_index,
            score = best_split.score,
            rule = ?best_split.rule,
            "split node"
        );

        let goes_right = best_split
            .goes_left
            .iter()
            .map(|&left| !left)
            .collect::<Vec<_>>();
        let next_depth = depth.saturating_add(1);
        let left_node = self.build_tree(&dataset.select(&best_split.goes_left), next_depth)?;
        let right_node = self.build_tree(&dataset.select(&goes_right), next_depth)?;

        Ok(Node::internal(
            best_split.feature_index,
            best_split.rule,
            left_node,
            right_node,
        ))
    }

    /// Best split over all features. Ties keep the lowest feature index.
    fn best_split(&self, dataset: &Dataset<T>) -> Result<Option<SplitData<T>>> {
        let labels = dataset.labels();
        let num_samples = labels.len();
        let mut best_split: Option<SplitData<T>> = None;

        for (feature_index, feature_type) in self.feature_types().iter().enumerate() {
            let adapter = feature_type.adapt(dataset.column(feature_index), labels)?;
            if adapter.is_constant() {
                trace!(feature = feature_index, "constant feature skipped");
                continue;
            }

            let Some(search) = find_best_split(adapter.ordered_values(), labels) else {
                continue;
            };
            let candidate = match self.tree_params.min_samples_leaf() {
                Some(min_leaf) => search.best_with_min_leaf(num_samples, min_leaf),
                None => Some((search.best_threshold, search.best_score)),
            };
            let Some((threshold, score)) = candidate else {
                continue;
            };
            if best_split
                .as_ref()
                .is_some_and(|best| score <= best.score)
            {
                continue;
            }

            let goes_left = adapter
                .ordered_values()
                .iter()
                .map(|&value| value < threshold)
                .collect::<Vec<_>>();

            best_split = Some(SplitData {
                feature_index,
                rule: adapter.split_rule(threshold),
                goes_left,
                score,
            });
        }
        Ok(best_split)
    }
}

/// Most frequent label; a tie goes to `0`.
fn majority_label(labels: &[Label]) -> Label {
    let positives = labels.iter().filter(|&&label| label == 1).count();
    Label::from(positives * 2 > labels.len())
}
