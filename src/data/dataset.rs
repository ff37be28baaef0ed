use crate::error::{Result, TreeError};
use nalgebra::{DMatrix, DVector};
use num_traits::{Float, FromPrimitive, Num, ToPrimitive};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt::{self, Display};
use std::fmt::{Debug, Formatter};
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

pub trait DataValue:
    Debug
    + Clone
    + Copy
    + Num
    + FromPrimitive
    + ToPrimitive
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
    + Send
    + Sync
    + Display
    + 'static
{
}

impl<T> DataValue for T where
    T: Debug
        + Clone
        + Copy
        + Num
        + FromPrimitive
        + ToPrimitive
        + AddAssign
        + SubAssign
        + MulAssign
        + DivAssign
        + Send
        + Sync
        + Display
        + 'static
{
}

pub trait Number: DataValue + PartialOrd {}
impl<T> Number for T where T: DataValue + PartialOrd {}

pub trait RealNumber: Number + Float {}
impl<T> RealNumber for T where T: Number + Float {}

/// Binary class label, restricted to `0` and `1`.
pub type Label = u8;

/// Feature matrix paired row by row with binary labels.
///
/// Categorical columns store each category as a distinct numeric value;
/// the tree only ever compares them for equality.
pub struct Dataset<T: RealNumber> {
    pub x: DMatrix<T>,
    pub y: DVector<Label>,
}

impl<T: RealNumber> Debug for Dataset<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    x: [\n")?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for i in 0..self.y.len() {
            write!(f, "{:?}, ", self.y[i])?;
        }
        write!(f, "]\n}}")
    }
}

impl<T: RealNumber> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        Self::new(self.x.clone(), self.y.clone())
    }
}

impl<T: RealNumber> Dataset<T> {
    pub fn new(x: DMatrix<T>, y: DVector<Label>) -> Self {
        Self { x, y }
    }

    pub fn into_parts(&self) -> (&DMatrix<T>, &DVector<Label>) {
        (&self.x, &self.y)
    }

    pub fn is_not_empty(&self) -> bool {
        !(self.x.is_empty() || self.y.is_empty())
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    pub fn labels(&self) -> &[Label] {
        self.y.as_slice()
    }

    /// Copies feature column `feature_index` out of the matrix.
    pub fn column(&self, feature_index: usize) -> Vec<T> {
        self.x.column(feature_index).iter().copied().collect()
    }

    /// Checks that the dataset can be fed to the tree builder.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidInput`] if the dataset is empty, the number of
    /// labels differs from the number of rows, a label is not `0` or `1`, or a
    /// feature value is NaN or infinite.
    pub fn validate(&self) -> Result<()> {
        if self.x.nrows() != self.y.len() {
            return Err(TreeError::InvalidInput(format!(
                "{} rows but {} labels",
                self.x.nrows(),
                self.y.len()
            )));
        }
        if !self.is_not_empty() {
            return Err(TreeError::InvalidInput("dataset is empty".into()));
        }
        if let Some(label) = self.y.iter().find(|&&label| label > 1) {
            return Err(TreeError::InvalidInput(format!(
                "label {} is not binary",
                label
            )));
        }
        check_finite(&self.x)
    }

    /// Returns the rows whose entry in `mask` is `true`, keeping their order.
    pub fn select(&self, mask: &[bool]) -> Self {
        let indices = mask
            .iter()
            .enumerate()
            .filter(|&(_, &keep)| keep)
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        Self::new(
            self.x.select_rows(indices.as_slice()),
            self.y.select_rows(indices.as_slice()),
        )
    }

    pub fn train_test_split(&self, train_size: f64, seed: Option<u64>) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(TreeError::InvalidConfiguration(
                "Train size should be between 0.0 and 1.0".into(),
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.x.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.x.nrows() as f64 * train_size).floor() as usize;
        let (train_indices, test_indices) = indices.split_at(train_size);

        let train_dataset = Self::new(
            self.x.select_rows(train_indices),
            self.y.select_rows(train_indices),
        );
        let test_dataset = Self::new(
            self.x.select_rows(test_indices),
            self.y.select_rows(test_indices),
        );

        Ok((train_dataset, test_dataset))
    }
}

pub(crate) fn check_finite<T: RealNumber>(x: &DMatrix<T>) -> Result<()> {
    match x.iter().position(|value| !value.is_finite()) {
        Some(position) => Err(TreeError::InvalidInput(format!(
            "non-finite feature value in row {}, column {}",
            position % x.nrows(),
            position / x.nrows()
        ))),
        None => Ok(()),
    }
}
