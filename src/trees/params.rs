use super::feature::FeatureType;
use crate::error::{Result, TreeError};

/// Configuration snapshot of a decision tree.
///
/// The stopping parameters default to `None`, in which case the tree grows
/// until its leaves are pure or no feature can be split any further.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeParams {
    pub feature_types: Vec<FeatureType>,
    pub max_depth: Option<u16>,
    pub min_samples_split: Option<usize>,
    pub min_samples_leaf: Option<usize>,
}

impl TreeParams {
    pub fn new(feature_types: Vec<FeatureType>) -> Self {
        Self {
            feature_types,
            max_depth: None,
            min_samples_split: None,
            min_samples_leaf: None,
        }
    }

    /// Parses feature type tags such as `"real"` and `"categorical"`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidConfiguration`] on the first unknown tag.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        let feature_types = tags
            .iter()
            .map(|tag| tag.as_ref().parse::<FeatureType>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(feature_types))
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<()> {
        if max_depth.is_some_and(|depth| depth < 1) {
            return Err(TreeError::InvalidConfiguration(
                "The maximum depth must be greater than 0.".into(),
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    pub fn set_min_samples_split(&mut self, min_samples_split: Option<usize>) -> Result<()> {
        if min_samples_split.is_some_and(|samples| samples < 2) {
            return Err(TreeError::InvalidConfiguration(
                "The minimum number of samples to split must be greater than 1.".into(),
            ));
        }
        self.min_samples_split = min_samples_split;
        Ok(())
    }

    pub fn set_min_samples_leaf(&mut self, min_samples_leaf: Option<usize>) -> Result<()> {
        if min_samples_leaf.is_some_and(|samples| samples < 1) {
            return Err(TreeError::InvalidConfiguration(
                "The minimum number of samples in a leaf must be greater than 0.".into(),
            ));
        }
        self.min_samples_leaf = min_samples_leaf;
        Ok(())
    }

    pub fn feature_types(&self) -> &[FeatureType] {
        &self.feature_types
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> Option<usize> {
        self.min_samples_split
    }

    pub fn min_samples_leaf(&self) -> Option<usize> {
        self.min_samples_leaf
    }
}
