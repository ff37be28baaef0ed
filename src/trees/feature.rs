//! Feature types and the numeric views the split search runs on.
use super::node::SplitRule;
use crate::data::dataset::{Label, RealNumber};
use crate::error::{Result, TreeError};
use ordered_float::OrderedFloat;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Display};
use std::str::FromStr;

/// Kind of a feature column, fixed when the tree is configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureType {
    /// Ordered numeric values, split with `value < threshold`.
    Real,
    /// Unordered categories, split by set membership.
    Categorical,
}

impl FromStr for FeatureType {
    type Err = TreeError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "real" => Ok(FeatureType::Real),
            "categorical" => Ok(FeatureType::Categorical),
            other => Err(TreeError::InvalidConfiguration(format!(
                "There is unknown feature type `{}`",
                other
            ))),
        }
    }
}

impl Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureType::Real => write!(f, "real"),
            FeatureType::Categorical => write!(f, "categorical"),
        }
    }
}

impl FeatureType {
    /// Builds the numeric view of `column` for this kind of feature.
    pub fn adapt<T: RealNumber>(
        self,
        column: Vec<T>,
        labels: &[Label],
    ) -> Result<Box<dyn FeatureAdapter<T>>> {
        match self {
            FeatureType::Real => Ok(Box::new(RealFeature { values: column })),
            FeatureType::Categorical => Ok(Box::new(project_categories(&column, labels)?)),
        }
    }
}

/// Common face of real and categorical columns during the split search.
pub trait FeatureAdapter<T: RealNumber> {
    /// Ordered numeric values, one per row, ready for threshold search.
    fn ordered_values(&self) -> &[T];

    /// Rule on the raw column equivalent to `ordered value < threshold`.
    fn split_rule(&self, threshold: T) -> SplitRule<T>;

    /// `true` when the column holds fewer than two distinct values.
    fn is_constant(&self) -> bool {
        match self.ordered_values().split_first() {
            Some((first, rest)) => rest.iter().all(|value| value == first),
            None => true,
        }
    }
}

/// A real column is already ordered.
pub struct RealFeature<T: RealNumber> {
    values: Vec<T>,
}

impl<T: RealNumber> FeatureAdapter<T> for RealFeature<T> {
    fn ordered_values(&self) -> &[T] {
        &self.values
    }

    fn split_rule(&self, threshold: T) -> SplitRule<T> {
        SplitRule::Below(threshold)
    }
}

/// Categorical column re-coded by ascending rate of label `1`.
#[derive(Clone, Debug)]
pub struct CategoricalProjection<T: RealNumber> {
    codes: Vec<T>,
    /// Category at each code.
    categories: Vec<OrderedFloat<T>>,
    /// Each code as a value of `T`.
    levels: Vec<T>,
}

impl<T: RealNumber> CategoricalProjection<T> {
    /// Code of every row, in row order.
    pub fn codes(&self) -> &[T] {
        &self.codes
    }

    /// Categories indexed by their code.
    pub fn categories(&self) -> Vec<T> {
        self.categories.iter().map(|category| category.0).collect()
    }

    pub fn code_of(&self, category: T) -> Option<usize> {
        self.categories
            .iter()
            .position(|&known| known == OrderedFloat(category))
    }

    /// Categories whose code lies below `threshold`.
    pub fn categories_below(&self, threshold: T) -> HashSet<OrderedFloat<T>> {
        self.categories
            .iter()
            .zip(self.levels.iter())
            .filter(|&(_, &level)| level < threshold)
            .map(|(&category, _)| category)
            .collect()
    }
}

impl<T: RealNumber> FeatureAdapter<T> for CategoricalProjection<T> {
    fn ordered_values(&self) -> &[T] {
        &self.codes
    }

    fn split_rule(&self, threshold: T) -> SplitRule<T> {
        SplitRule::OneOf(self.categories_below(threshold))
    }
}

/// Orders the categories of `values` by their share of label `1` and replaces
/// every value by the rank `0..k` of its category.
///
/// Categories with equal share keep the order of their first appearance.
pub fn project_categories<T: RealNumber>(
    values: &[T],
    labels: &[Label],
) -> Result<CategoricalProjection<T>> {
    // (category, rows, positives) in order of first appearance
    let mut stats: Vec<(OrderedFloat<T>, usize, usize)> = Vec::new();
    let mut slot_of = HashMap::new();
    for (&value, &label) in values.iter().zip(labels.iter()) {
        let category = OrderedFloat(value);
        let slot = *slot_of.entry(category).or_insert_with(|| {
            stats.push((category, 0, 0));
            stats.len() - 1
        });
        stats[slot].1 += 1;
        stats[slot].2 += usize::from(label == 1);
    }

    let rate = |&(_, rows, positives): &(OrderedFloat<T>, usize, usize)| {
        positives as f64 / rows as f64
    };
    stats.sort_by(|a, b| rate(a).total_cmp(&rate(b)));

    let categories = stats
        .iter()
        .map(|&(category, _, _)| category)
        .collect::<Vec<_>>();
    let levels = (0..categories.len())
        .map(level::<T>)
        .collect::<Result<Vec<_>>>()?;
    let level_of = categories
        .iter()
        .zip(levels.iter())
        .map(|(&category, &level)| (category, level))
        .collect::<HashMap<_, _>>();
    let codes = values
        .iter()
        .map(|&value| level_of[&OrderedFloat(value)])
        .collect();

    Ok(CategoricalProjection {
        codes,
        categories,
        levels,
    })
}

/// `code` as a value of `T`, failing when `T` can't hold it exactly.
fn level<T: RealNumber>(code: usize) -> Result<T> {
    T::from_usize(code)
        .filter(|level| level.to_usize() == Some(code))
        .ok_or_else(|| TreeError::NumericConversion(format!("category code {} doesn't fit", code)))
}
