/// Decision tree classifier: tree growing and prediction
pub mod classifier;
/// Real and categorical feature adapters
pub mod feature;
/// Tree nodes and split rules
pub mod node;
/// Tree configuration and stopping parameters
pub mod params;
/// Gini threshold search
pub mod split;
