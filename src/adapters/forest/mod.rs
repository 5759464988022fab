//! Random forest adapter: Implementation of Classifier for exported tree ensembles.
//!
//! The JSON layout mirrors the array-of-nodes form of fitted decision trees:
//! for node `i`, `children_left[i]`/`children_right[i]` are child indices
//! (`-1` on leaves), `feature[i]`/`threshold[i]` describe the split, and
//! `value[i]` holds per-class weights.
//!
//! Samples go left when `x[feature] <= threshold`. The forest probability is
//! the mean of each tree's normalized leaf distribution, and the label is the
//! class with the highest mean probability (first class on ties).

use serde::{Deserialize, Serialize};

use crate::domain::{DiagnosisLabel, PredictionResult};
use crate::ports::{Classifier, ClassifierError};

const LEAF: i64 = -1;

/// Positive class value ("disease present").
const POSITIVE_CLASS: i64 = 1;

/// A single fitted decision tree.
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

    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err("node arrays have different lengths".into());
        }

        for i in 0..n {
            let (left, right) = (self.children_left[i], self.children_right[i]);
            if left == LEAF || right == LEAF {
                if left != right {
                    return Err(format!("node {i} has exactly one child"));
                }
                let weights = &self.value[i];
                if weights.len() != n_classes {
                    return Err(format!(
                        "leaf {i} has {} class weights, expected {n_classes}",
                        weights.len()
                    ));
                }
                if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {i} has invalid class weights"));
                }
                if weights.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {i} has zero total weight"));
                }
                continue;
            }

            // Children always follow their parent, which also rules out cycles.
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {i} has out-of-order child {child}"));
                }
            }
            let f = self.feature[i];
            if f < 0 || f as usize >= n_features {
                return Err(format!("node {i} splits on unknown feature {f}"));
            }
            if self.threshold[i].is_nan() {
                return Err(format!("node {i} has NaN threshold"));
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf reached by `x`.
    fn leaf_distribution(&self, x: &[f64]) -> Vec<f64> {
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let f = self.feature[node] as usize;
            // Trees are fitted on single-precision inputs.
            let v = f64::from(x[f] as f32);
            node = if v <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }

        let weights = &self.value[node];
        let total: f64 = weights.iter().sum();
        weights.iter().map(|w| w / total).collect()
    }
}

/// Random forest binary classifier loaded from `rf_model.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    pub feature_names: Vec<String>,
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForestClassifier {
    /// Parse and validate a forest from JSON.
    ///
    /// # Errors
    /// Returns `ClassifierError::Malformed` on invalid JSON or structure.
    pub fn from_json(json: &str) -> Result<Self, ClassifierError> {
        let forest: Self =
            serde_json::from_str(json).map_err(|e| ClassifierError::Malformed(e.to_string()))?;
        forest.validate()?;
        Ok(forest)
    }

    /// Check structural consistency of every tree.
    ///
    /// # Errors
    /// Returns `ClassifierError::Malformed` describing the first problem found.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.feature_names.is_empty() {
            return Err(ClassifierError::Malformed("no feature_names".into()));
        }
        if self.classes.len() != 2
            || self.classes[0] == self.classes[1]
            || !self.classes.contains(&POSITIVE_CLASS)
        {
            return Err(ClassifierError::Malformed(format!(
                "expected two distinct classes including {POSITIVE_CLASS}, got {:?}",
                self.classes
            )));
        }
        if self.trees.is_empty() {
            return Err(ClassifierError::Malformed("forest has no trees".into()));
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_names.len(), self.classes.len())
                .map_err(|e| ClassifierError::Malformed(format!("tree {t}: {e}")))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class probabilities over all trees, in `classes` order.
    ///
    /// # Errors
    /// Returns error on wrong width or non-finite input.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        if x.len() != self.feature_names.len() {
            return Err(ClassifierError::FeatureCount {
                expected: self.feature_names.len(),
                got: x.len(),
            });
        }
        if let Some(i) = x.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFiniteInput(i));
        }

        let mut proba = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.leaf_distribution(x)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        Ok(proba)
    }
}

impl Classifier for RandomForestClassifier {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &[f64]) -> Result<PredictionResult, ClassifierError> {
        let proba = self.predict_proba(features)?;

        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }

        let positive = self
            .classes
            .iter()
            .position(|c| *c == POSITIVE_CLASS)
            .ok_or_else(|| ClassifierError::Malformed("positive class missing".into()))?;

        Ok(PredictionResult::new(
            DiagnosisLabel::from_class(self.classes[best]),
            proba[positive],
        ))
    }
}
