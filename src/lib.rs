//! # Rusty-cart
//!
//! `rusty-cart` provides a binary decision tree classifier grown greedily under the
//! Gini criterion. Columns are either real valued, split with `value < threshold`,
//! or categorical, split by set membership after the categories are ordered by their
//! share of positive labels.
//!
//! ## Getting Started
//!
//! To use `rusty-cart`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-cart = "*"
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use rusty_cart::data::dataset::Dataset;
//! use rusty_cart::trees::classifier::DecisionTreeClassifier;
//! use nalgebra::{DMatrix, DVector};
//!
//! // second column holds category ids
//! let x = DMatrix::from_row_slice(4, 2, &[1.0, 7.0, 2.0, 7.0, 3.0, 9.0, 4.0, 9.0]);
//! let y = DVector::from_vec(vec![0, 0, 1, 1]);
//!
//! let dataset = Dataset::new(x, y);
//!
//! let mut model = DecisionTreeClassifier::from_tags(&["real", "categorical"]).unwrap();
//!
//! model.fit(&dataset).unwrap();
//!
//! let test_x = DMatrix::from_row_slice(2, 2, &[1.5, 7.0, 3.5, 9.0]);
//!
//! let predictions = model.predict(&test_x).unwrap();
//! assert_eq!(predictions, DVector::from_vec(vec![0, 1]));
//! ```

/// Dataset and data manipulation utilities
pub mod data;
/// Error type
pub mod error;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;
