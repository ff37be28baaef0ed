use csv::ReaderBuilder;
use nalgebra::{DMatrix, DVector};
use rusty_cart::data::dataset::Dataset;
use rusty_cart::metrics::confusion::ClassificationMetrics;
use rusty_cart::trees::classifier::DecisionTreeClassifier;
use rusty_cart::trees::feature::FeatureType;
use rusty_cart::trees::params::TreeParams;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: fit-tree <file.csv> <real|categorical,...> [train_size] [seed]";

/// Reads a headered CSV whose last column is the label.
fn read_file_classification(
    file_path: &str,
    feature_types: &[FeatureType],
) -> Result<Dataset<f64>, Box<dyn Error>> {
    read_classification(File::open(file_path)?, feature_types)
}

/// Categorical cells may hold any text; each distinct value of a column gets an id
/// in order of first appearance. Labels must be `0` or `1`.
fn read_classification<R: io::Read>(
    source: R,
    feature_types: &[FeatureType],
) -> Result<Dataset<f64>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(source);
    let dimension = feature_types.len();
    let mut features = Vec::new();
    let mut labels = Vec::new();
    let mut category_maps = vec![HashMap::new(); dimension];

    for result in reader.records() {
        let record = result?;

        for (index, (cell, feature_type)) in record.iter().zip(feature_types).enumerate() {
            let cell = cell.trim();
            let value = match feature_type {
                FeatureType::Real => cell.parse::<f64>()?,
                FeatureType::Categorical => {
                    let categories = &mut category_maps[index];
                    let next_id = categories.len() as f64;
                    *categories.entry(cell.to_string()).or_insert(next_id)
                }
            };
            features.push(value);
        }

        let label = record.get(dimension).ok_or("Missing label")?.trim();
        match label {
            "0" => labels.push(0),
            "1" => labels.push(1),
            other => return Err(format!("Label `{}` is not 0 or 1.", other).into()),
        }
    }
    if labels.is_empty() {
        return Err("The file holds no rows.".into());
    }
    if features.len() != labels.len() * dimension {
        return Err("Some rows have fewer feature columns than declared.".into());
    }

    let feature_matrix = DMatrix::from_row_slice(labels.len(), dimension, &features);
    let label_vector = DVector::from_vec(labels);

    Ok(Dataset::new(feature_matrix, label_vector))
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let (file_path, tags) = match args {
        [_, file_path, tags, ..] => (file_path, tags),
        _ => return Err(USAGE.into()),
    };
    let train_size = args.get(3).map(|size| size.parse::<f64>()).transpose()?;
    let seed = args.get(4).map(|seed| seed.parse::<u64>()).transpose()?;

    let tags = tags.split(',').map(str::trim).collect::<Vec<_>>();
    let params = TreeParams::from_tags(&tags)?;
    let dataset = read_file_classification(file_path, params.feature_types())?;
    info!(rows = dataset.nrows(), columns = dataset.ncols(), "loaded dataset");

    let (train_dataset, test_dataset) =
        dataset.train_test_split(train_size.unwrap_or(0.75), seed)?;

    let mut classifier = DecisionTreeClassifier::new(params.feature_types.clone());
    println!("{}", classifier.fit(&train_dataset)?);
    if !test_dataset.is_not_empty() {
        return Err("The test split is empty.".into());
    }

    let predictions = classifier.predict(&test_dataset.x)?;
    let y_true = &test_dataset.y;
    println!("Accuracy: {}%", classifier.accuracy(y_true, &predictions)? * 100.0);
    println!("Precision: {}", classifier.precision(y_true, &predictions)?);
    println!("Recall: {}", classifier.recall(y_true, &predictions)?);
    match classifier.f1_score(y_true, &predictions) {
        Ok(f1) => println!("F1 score: {}", f1),
        Err(err) => println!("F1 score: {}", err),
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = env::args().collect::<Vec<_>>();
    if let Err(err) = run(&args) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_keep_their_value() {
        let csv = "a,label\n1.0,1\n2.0,0\n3.0,1\n";
        let dataset = read_classification(csv.as_bytes(), &[FeatureType::Real]).unwrap();

        assert_eq!(dataset.labels(), &[1, 0, 1]);
        assert_eq!(dataset.column(0), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_non_binary_label_is_rejected() {
        let csv = "a,label\n1.0,yes\n2.0,no\n";
        assert!(read_classification(csv.as_bytes(), &[FeatureType::Real]).is_err());

        let csv = "a,label\n1.0,2\n";
        assert!(read_classification(csv.as_bytes(), &[FeatureType::Real]).is_err());
    }

    #[test]
    fn test_categorical_cells_are_trimmed() {
        let csv = "color,size,label\nA, 1.5,0\n A,2.5,1\nB ,3.5, 1\n";
        let types = [FeatureType::Categorical, FeatureType::Real];
        let dataset = read_classification(csv.as_bytes(), &types).unwrap();

        assert_eq!(dataset.column(0), vec![0.0, 0.0, 1.0]);
        assert_eq!(dataset.column(1), vec![1.5, 2.5, 3.5]);
        assert_eq!(dataset.labels(), &[0, 1, 1]);
    }

    #[test]
    fn test_short_rows_are_rejected() {
        let csv = "a,b,label\n1.0,2.0,0\n";
        let types = [FeatureType::Real, FeatureType::Real, FeatureType::Real];
        assert!(read_classification(csv.as_bytes(), &types).is_err());
    }
}
