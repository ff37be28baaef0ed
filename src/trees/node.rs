use crate::data::dataset::{Label, RealNumber};
use ordered_float::OrderedFloat;
use std::collections::HashSet;

/// How an internal node routes a feature value.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitRule<T: RealNumber> {
    /// Values strictly below the threshold go left.
    Below(T),
    /// Listed categories go left, every other value goes right.
    OneOf(HashSet<OrderedFloat<T>>),
}

impl<T: RealNumber> SplitRule<T> {
    pub fn goes_left(&self, value: T) -> bool {
        match self {
            SplitRule::Below(threshold) => value < *threshold,
            SplitRule::OneOf(categories) => categories.contains(&OrderedFloat(value)),
        }
    }
}

/// Decision tree node
#[derive(Clone, Debug, PartialEq)]
pub enum Node<T: RealNumber> {
    Leaf {
        label: Label,
    },
    Internal {
        feature_index: usize,
        rule: SplitRule<T>,
        left: Box<Node<T>>,
        right: Box<Node<T>>,
    },
}

impl<T: RealNumber> Node<T> {
    pub fn leaf(label: Label) -> Self {
        Node::Leaf { label }
    }

    pub fn internal(
        feature_index: usize,
        rule: SplitRule<T>,
        left: Node<T>,
        right: Node<T>,
    ) -> Self {
        Node::Internal {
            feature_index,
            rule,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Follows the split rules from this node down to a leaf.
    pub fn classify(&self, row: &[T]) -> Label {
        let mut node = self;
        loop {
            match node {
                Node::Leaf { label } => return *label,
                Node::Internal {
                    feature_index,
                    rule,
                    left,
                    right,
                } => {
                    node = if rule.goes_left(row[*feature_index]) {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }

    /// Number of edges on the longest path to a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => left.n_leaves() + right.n_leaves(),
        }
    }

    pub fn n_nodes(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Internal { left, right, .. } => 1 + left.n_nodes() + right.n_nodes(),
        }
    }
}
