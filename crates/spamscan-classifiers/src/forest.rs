//! Random-forest classifier loaded from a JSON export
//!
//! Each tree is stored as parallel node arrays. A node is a leaf when its
//! left child is `-1`; otherwise a row goes left when
//! `row[feature] <= threshold`. Leaf values are per-class sample counts (or
//! fractions) and are normalized before averaging across trees.

use crate::classifier::{Classifier, FeatureVector};
use serde::{Deserialize, Serialize};
use spamscan_core::{Error, Result, HAM_CLASS, SPAM_CLASS};
use std::path::Path;

const LEAF: i64 = -1;

/// One fitted decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<Vec<f64>>,
}

impl DecisionTree {
    fn node_count(&self) -> usize {
        self.children_left.len()
    }

    fn validate(&self, n_features: usize, n_classes: usize) -> std::result::Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(format!("node arrays disagree on length (expected {})", n));
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];

            if left == LEAF {
                let row = &self.value[node];
                if row.len() != n_classes {
                    return Err(format!(
                        "leaf {} has {} class values, expected {}",
                        node,
                        row.len(),
                        n_classes
                    ));
                }
                if row.iter().any(|v| !v.is_finite() || *v < 0.0) || row.iter().sum::<f64>() <= 0.0
                {
                    return Err(format!("leaf {} has no usable class weights", node));
                }
                continue;
            }

            // Children always follow their parent, which rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(format!("node {} has invalid child {}", node, child));
                }
            }

            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {} splits on invalid feature {}", node, feature));
            }
        }

        Ok(())
    }

    /// Normalized class distribution of the leaf `row` falls into
    fn leaf_distribution(&self, row: &FeatureVector) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let value = row.get(self.feature[node] as usize);
            node = if value <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let leaf = &self.value[node];
        let total: f64 = leaf.iter().sum();
        leaf.iter().map(|v| v / total).collect()
    }
}

/// Serialized form of a fitted random forest; unknown fields are rejected
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForestSpec {
    /// Class labels in probability-column order
    pub classes: Vec<u8>,

    /// Expected row width
    pub n_features: usize,

    /// Fitted trees
    pub estimators: Vec<DecisionTree>,
}

/// Random-forest spam classifier
#[derive(Debug, Clone)]
pub struct RandomForest {
    name: String,
    spec: ForestSpec,
}

impl RandomForest {
    /// Validate a spec
    pub fn from_spec(spec: ForestSpec) -> Result<Self> {
        if spec.classes != [HAM_CLASS, SPAM_CLASS] {
            return Err(Error::config(format!(
                "classes must be [{}, {}], got {:?}",
                HAM_CLASS, SPAM_CLASS, spec.classes
            )));
        }
        if spec.estimators.is_empty() {
            return Err(Error::config("forest has no trees"));
        }

        for (i, tree) in spec.estimators.iter().enumerate() {
            tree.validate(spec.n_features, spec.classes.len())
                .map_err(|e| Error::config(format!("tree {}: {}", i, e)))?;
        }

        Ok(Self {
            name: "random-forest".to_string(),
            spec,
        })
    }

    /// Parse and validate a JSON export
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: ForestSpec = serde_json::from_str(json)?;
        Self::from_spec(spec)
    }

    /// Load a JSON export from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Number of trees
    pub fn tree_count(&self) -> usize {
        self.spec.estimators.len()
    }

    fn check_width(&self, row: &FeatureVector) -> Result<()> {
        if row.dim() != self.spec.n_features {
            return Err(Error::prediction(format!(
                "row has {} features, classifier expects {}",
                row.dim(),
                self.spec.n_features
            )));
        }
        Ok(())
    }

    /// Mean of the per-tree leaf distributions
    fn row_proba(&self, row: &FeatureVector) -> Result<Vec<f64>> {
        self.check_width(row)?;

        let mut sums = vec![0.0; self.spec.classes.len()];
        for tree in &self.spec.estimators {
            for (sum, p) in sums.iter_mut().zip(tree.leaf_distribution(row)) {
                *sum += p;
            }
        }

        let trees = self.tree_count() as f64;
        Ok(sums.into_iter().map(|s| s / trees).collect())
    }
}

/// Index of the largest entry; the first one wins ties
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

impl Classifier for RandomForest {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<u8>> {
        rows.iter()
            .map(|row| {
                let proba = self.row_proba(row)?;
                Ok(self.spec.classes[argmax(&proba)])
            })
            .collect()
    }

    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.row_proba(row)).collect()
    }

    fn n_features(&self) -> usize {
        self.spec.n_features
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single split on feature 0 at 0.5
    fn stump(left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, LEAF, LEAF],
            children_right: vec![2, LEAF, LEAF],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![
                vec![left[0] + right[0], left[1] + right[1]],
                left.to_vec(),
                right.to_vec(),
            ],
        }
    }

    fn forest(trees: Vec<DecisionTree>) -> RandomForest {
        RandomForest::from_spec(ForestSpec {
            classes: vec![0, 1],
            n_features: 2,
            estimators: trees,
        })
        .unwrap()
    }

    #[test]
    fn test_predict_proba_averages_trees() {
        let model = forest(vec![stump([9.0, 1.0], [1.0, 9.0]), stump([1.0, 0.0], [0.0, 4.0])]);

        let high = FeatureVector::from_entries(2, vec![(0, 0.9)]);
        let proba = model.predict_proba(&[high.clone()]).unwrap();
        assert!((proba[0][0] - 0.05).abs() < 1e-12);
        assert!((proba[0][1] - 0.95).abs() < 1e-12);
        assert_eq!(model.predict(&[high]).unwrap(), vec![1]);

        let low = FeatureVector::zeros(2);
        let proba = model.predict_proba(&[low.clone()]).unwrap();
        assert!((proba[0][0] - 0.95).abs() < 1e-12);
        assert_eq!(model.predict(&[low]).unwrap(), vec![0]);
    }

    #[test]
    fn test_threshold_is_inclusive_on_the_left() {
        let model = forest(vec![stump([1.0, 0.0], [0.0, 1.0])]);
        let on_threshold = FeatureVector::from_entries(2, vec![(0, 0.5)]);
        assert_eq!(model.predict(&[on_threshold]).unwrap(), vec![0]);
    }

    #[test]
    fn test_ties_pick_the_first_class() {
        let model = forest(vec![stump([1.0, 1.0], [1.0, 1.0])]);
        assert_eq!(model.predict(&[FeatureVector::zeros(2)]).unwrap(), vec![0]);
    }

    #[test]
    fn test_rejects_rows_of_wrong_width() {
        let model = forest(vec![stump([1.0, 0.0], [0.0, 1.0])]);
        let err = model.predict(&[FeatureVector::zeros(3)]).unwrap_err();
        assert!(matches!(err, Error::Prediction(_)));
    }

    #[test]
    fn test_validation_errors() {
        let bad_classes = ForestSpec {
            classes: vec![0, 1, 2],
            n_features: 2,
            estimators: vec![stump([1.0, 0.0], [0.0, 1.0])],
        };
        assert!(RandomForest::from_spec(bad_classes).is_err());

        let no_trees = ForestSpec {
            classes: vec![0, 1],
            n_features: 2,
            estimators: vec![],
        };
        assert!(RandomForest::from_spec(no_trees).is_err());

        let mut cyclic = stump([1.0, 0.0], [0.0, 1.0]);
        cyclic.children_right[0] = 0;
        let spec = ForestSpec {
            classes: vec![0, 1],
            n_features: 2,
            estimators: vec![cyclic],
        };
        assert!(RandomForest::from_spec(spec).is_err());

        let mut bad_feature = stump([1.0, 0.0], [0.0, 1.0]);
        bad_feature.feature[0] = 5;
        let spec = ForestSpec {
            classes: vec![0, 1],
            n_features: 2,
            estimators: vec![bad_feature],
        };
        assert!(RandomForest::from_spec(spec).is_err());

        let mut empty_leaf = stump([1.0, 0.0], [0.0, 1.0]);
        empty_leaf.value[1] = vec![0.0, 0.0];
        let spec = ForestSpec {
            classes: vec![0, 1],
            n_features: 2,
            estimators: vec![empty_leaf],
        };
        assert!(RandomForest::from_spec(spec).is_err());
    }
}
