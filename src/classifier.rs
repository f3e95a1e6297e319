//! Tree-ensemble classifiers deserialized from JSON artifacts.
//!
//! An artifact carries the structure a training pipeline exported: a type
//! name, the ordered class list, and one or more decision trees whose leaves
//! hold per-class probabilities. Prediction walks every tree and averages the
//! reached leaves. All structural invariants are checked once at load so the
//! request path never discovers a broken artifact.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::{ModelValidationError, PredictError};
use crate::features::FEATURE_COUNT;

/// One node of an array-encoded decision tree.
///
/// Children always follow their parent in the node array, so a walk strictly
/// advances and terminates; `from_artifact` rejects artifacts that violate
/// this.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        probabilities: Vec<f64>,
    },
}

/// A single decision tree, nodes stored root-first.
#[derive(Debug, Clone, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk from the root to a leaf, going left when the feature value is at
    /// or below the threshold.
    fn walk<'a>(&'a self, x: &[f64]) -> Result<&'a [f64], PredictError> {
        let mut index = 0usize;
        loop {
            let node = self.nodes.get(index).ok_or_else(|| PredictError::Inference {
                reason: format!("tree walk reached missing node {index}"),
            })?;
            match node {
                TreeNode::Leaf { probabilities } => return Ok(probabilities),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value =
                        x.get(*feature)
                            .copied()
                            .ok_or_else(|| PredictError::Inference {
                                reason: format!("feature {feature} missing from input vector"),
                            })?;
                    index = if value <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

/// On-disk shape of a classifier artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    #[serde(default = "default_feature_count")]
    pub n_features: usize,
    pub classes: Vec<String>,
    #[serde(default)]
    pub trained_at: Option<DateTime<Utc>>,
    pub trees: Vec<DecisionTree>,
}

fn default_feature_count() -> usize {
    FEATURE_COUNT
}

/// Model family, tagged once at load time from the declared type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    DecisionTree,
    RandomForest,
    GradientBoosted,
    Other,
}

impl ModelKind {
    pub fn from_type_name(name: &str) -> Self {
        if name.contains("RandomForest") {
            ModelKind::RandomForest
        } else if name.contains("GradientBoost") {
            ModelKind::GradientBoosted
        } else if name.contains("DecisionTree") {
            ModelKind::DecisionTree
        } else {
            ModelKind::Other
        }
    }
}

/// The legacy ensemble judgment: a substring match on the declared type name.
/// Note this counts "GradientBoostingClassifier" as non-ensemble; the flag is
/// part of the wire contract and keeps that behavior.
fn type_name_is_ensemble(name: &str) -> bool {
    name.contains("Ensemble") || name.contains("Random")
}

/// Outcome of classifying one feature vector.
#[derive(Debug, Clone)]
pub struct Classification {
    pub label: String,
    /// Per-class probabilities keyed by class label, iteration order sorted.
    pub probabilities: BTreeMap<String, f64>,
    pub top_probability: f64,
}

/// A validated, ready-to-serve classifier.
pub struct ClassifierModel {
    type_name: String,
    kind: ModelKind,
    ensemble: bool,
    n_features: usize,
    classes: Vec<String>,
    trained_at: Option<DateTime<Utc>>,
    trees: Vec<DecisionTree>,
}

impl ClassifierModel {
    /// Validate an artifact and build a servable model.
    ///
    /// Checks every structural invariant the request path relies on: a
    /// non-empty class list, the declared feature width, at least one
    /// non-empty tree, forward-pointing in-range children, in-range split
    /// features, and leaf probability vectors matching the class count.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelValidationError> {
        if artifact.classes.is_empty() {
            return Err(ModelValidationError::EmptyClasses);
        }
        if artifact.n_features != FEATURE_COUNT {
            return Err(ModelValidationError::FeatureWidth {
                declared: artifact.n_features,
                expected: FEATURE_COUNT,
            });
        }
        if artifact.trees.is_empty() {
            return Err(ModelValidationError::NoTrees);
        }

        let class_count = artifact.classes.len();
        for (tree_index, tree) in artifact.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(ModelValidationError::EmptyTree { tree: tree_index });
            }
            for (node_index, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        left,
                        right,
                        ..
                    } => {
                        for child in [*left, *right] {
                            if child <= node_index || child >= tree.nodes.len() {
                                return Err(ModelValidationError::ChildOutOfRange {
                                    tree: tree_index,
                                    node: node_index,
                                    child,
                                });
                            }
                        }
                        if *feature >= artifact.n_features {
                            return Err(ModelValidationError::FeatureOutOfRange {
                                tree: tree_index,
                                node: node_index,
                                feature: *feature,
                                limit: artifact.n_features,
                            });
                        }
                    }
                    TreeNode::Leaf { probabilities } => {
                        if probabilities.len() != class_count {
                            return Err(ModelValidationError::LeafArity {
                                tree: tree_index,
                                node: node_index,
                                got: probabilities.len(),
                                expected: class_count,
                            });
                        }
                    }
                }
            }
        }

        let ensemble = type_name_is_ensemble(&artifact.model_type);
        Ok(Self {
            kind: ModelKind::from_type_name(&artifact.model_type),
            ensemble,
            type_name: artifact.model_type,
            n_features: artifact.n_features,
            classes: artifact.classes,
            trained_at: artifact.trained_at,
            trees: artifact.trees,
        })
    }

    /// Per-class probabilities for one feature vector: the mean of the leaf
    /// distributions reached across all trees, in class-list order.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, PredictError> {
        let mut summed = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            let leaf = tree.walk(x)?;
            for (slot, p) in summed.iter_mut().zip(leaf) {
                *slot += p;
            }
        }
        let tree_count = self.trees.len() as f64;
        for slot in &mut summed {
            *slot /= tree_count;
        }
        Ok(summed)
    }

    /// Full classification: winning label, the probability map, and the top
    /// probability. Ties resolve to the earlier class in the class list.
    pub fn classify(&self, x: &[f64]) -> Result<Classification, PredictError> {
        let probabilities = self.predict_proba(x)?;
        let (label, top_probability) = self
            .classes
            .iter()
            .zip(probabilities.iter().copied())
            .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
            .map(|(label, p)| (label.clone(), p))
            .ok_or_else(|| PredictError::Inference {
                reason: "classifier produced no probabilities".to_string(),
            })?;

        let probabilities = self
            .classes
            .iter()
            .cloned()
            .zip(probabilities)
            .collect::<BTreeMap<String, f64>>();

        Ok(Classification {
            label,
            probabilities,
            top_probability,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn is_ensemble(&self) -> bool {
        self.ensemble
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn trained_at(&self) -> Option<DateTime<Utc>> {
        self.trained_at
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }
}
