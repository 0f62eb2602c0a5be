//! Gradient-Boosted Tree Ensemble
//!
//! Scores rows against a JSON tree dump in the layout produced by
//! XGBoost's `dump_model(..., dump_format="json")`, wrapped with the
//! booster's base score:
//!
//! ```json
//! {
//!   "objective": "binary:logistic",
//!   "base_score": 0.5,
//!   "trees": [
//!     { "nodeid": 0, "split": "meanTapInter", "split_condition": 250.0,
//!       "yes": 1, "no": 2, "missing": 1,
//!       "children": [ { "nodeid": 1, "leaf": -0.4 }, { "nodeid": 2, "leaf": 0.6 } ] }
//!   ]
//! }
//! ```
//!
//! Split names resolve against the feature manifest, or as `f<index>`.

use std::fs;
use std::path::Path;

use crate::manifest::FeatureManifest;
use crate::model::ScoringModel;
use crate::InferenceError;
use serde::Deserialize;
use tracing::info;

/// Tree dump document
#[derive(Debug, Deserialize)]
struct EnsembleDump {
    #[serde(default = "default_objective")]
    objective: String,
    #[serde(default = "default_base_score")]
    base_score: f64,
    trees: Vec<DumpNode>,
}

fn default_objective() -> String {
    "binary:logistic".to_string()
}

fn default_base_score() -> f64 {
    0.5
}

/// Node as it appears in the dump
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DumpNode {
    Split {
        nodeid: u32,
        split: String,
        split_condition: f64,
        yes: u32,
        no: u32,
        missing: Option<u32>,
        children: Vec<DumpNode>,
    },
    Leaf {
        nodeid: u32,
        leaf: f64,
    },
}

impl DumpNode {
    fn id(&self) -> u32 {
        match self {
            DumpNode::Split { nodeid, .. } | DumpNode::Leaf { nodeid, .. } => *nodeid,
        }
    }
}

/// Flattened node; child links are arena indices
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Split {
        feature: usize,
        /// Split thresholds are single precision in the booster
        threshold: f32,
        yes: usize,
        no: usize,
        missing: usize,
    },
    Leaf(f64),
}

/// Binary gradient-boosted tree classifier
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    /// Tree roots into `nodes`
    roots: Vec<usize>,
    nodes: Vec<Node>,
    /// Margin contributed by the base score
    base_margin: f64,
    width: usize,
}

impl TreeEnsemble {
    /// Load a tree dump, resolving split names against `manifest`
    pub fn load(path: &Path, manifest: &FeatureManifest) -> Result<Self, InferenceError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| InferenceError::ModelLoad(format!("{}: {}", path.display(), e)))?;
        let ensemble = Self::parse(&raw, manifest)
            .map_err(|e| InferenceError::ModelLoad(format!("{}: {}", path.display(), e)))?;

        info!(
            "Loaded tree ensemble: {} trees, {} nodes from {}",
            ensemble.roots.len(),
            ensemble.nodes.len(),
            path.display()
        );
        Ok(ensemble)
    }

    /// Parse a tree dump document
    pub fn from_json(raw: &str, manifest: &FeatureManifest) -> Result<Self, InferenceError> {
        Self::parse(raw, manifest).map_err(InferenceError::ModelLoad)
    }

    fn parse(raw: &str, manifest: &FeatureManifest) -> Result<Self, String> {
        let dump: EnsembleDump = serde_json::from_str(raw).map_err(|e| e.to_string())?;

        if dump.objective != "binary:logistic" {
            return Err(format!("unsupported objective '{}'", dump.objective));
        }
        if !(dump.base_score > 0.0 && dump.base_score < 1.0) {
            return Err(format!("base_score {} outside (0, 1)", dump.base_score));
        }

        let mut ensemble = Self {
            roots: Vec::with_capacity(dump.trees.len()),
            nodes: Vec::new(),
            base_margin: logit(dump.base_score),
            width: manifest.len(),
        };
        for tree in &dump.trees {
            let root = ensemble.flatten(tree, manifest)?;
            ensemble.roots.push(root);
        }
        Ok(ensemble)
    }

    /// Number of trees
    pub fn tree_count(&self) -> usize {
        self.roots.len()
    }

    fn flatten(&mut self, node: &DumpNode, manifest: &FeatureManifest) -> Result<usize, String> {
        match node {
            DumpNode::Leaf { leaf, .. } => {
                self.nodes.push(Node::Leaf(*leaf));
                Ok(self.nodes.len() - 1)
            }
            DumpNode::Split {
                nodeid,
                split,
                split_condition,
                yes,
                no,
                missing,
                children,
            } => {
                let feature = resolve_feature(split, manifest)?;
                let child = |id: u32| {
                    children
                        .iter()
                        .find(|c| c.id() == id)
                        .ok_or_else(|| format!("node {nodeid} has no child {id}"))
                };
                let yes_node = child(*yes)?;
                let no_node = child(*no)?;

                // Reserve the slot so the parent precedes its subtrees
                let slot = self.nodes.len();
                self.nodes.push(Node::Leaf(0.0));

                let yes_idx = self.flatten(yes_node, manifest)?;
                let no_idx = self.flatten(no_node, manifest)?;
                let missing_idx = match missing {
                    Some(id) if id == no => no_idx,
                    _ => yes_idx,
                };

                self.nodes[slot] = Node::Split {
                    feature,
                    threshold: *split_condition as f32,
                    yes: yes_idx,
                    no: no_idx,
                    missing: missing_idx,
                };
                Ok(slot)
            }
        }
    }

    fn leaf_value(&self, root: usize, row: &[f64]) -> f64 {
        let mut idx = root;
        loop {
            match &self.nodes[idx] {
                Node::Leaf(value) => return *value,
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                } => {
                    let value = row.get(*feature).copied().unwrap_or(f64::NAN);
                    idx = if !value.is_finite() {
                        *missing
                    } else if (value as f32) < *threshold {
                        *yes
                    } else {
                        *no
                    };
                }
            }
        }
    }

    /// Raw margin (log-odds) for a row
    pub fn margin(&self, row: &[f64]) -> f64 {
        self.base_margin
            + self
                .roots
                .iter()
                .map(|&root| self.leaf_value(root, row))
                .sum::<f64>()
    }
}

impl ScoringModel for TreeEnsemble {
    fn predict_proba(&self, row: &[f64]) -> Result<f64, InferenceError> {
        if row.len() != self.width {
            return Err(InferenceError::InvalidInputShape {
                expected: format!("[1, {}]", self.width),
                actual: format!("[1, {}]", row.len()),
            });
        }
        Ok(sigmoid(self.margin(row)))
    }

    fn input_width(&self) -> usize {
        self.width
    }

    fn kind(&self) -> &'static str {
        "tree-ensemble"
    }
}

fn resolve_feature(split: &str, manifest: &FeatureManifest) -> Result<usize, String> {
    let index = match manifest.position(split) {
        Some(index) => index,
        None => split
            .strip_prefix('f')
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or_else(|| format!("split feature '{split}' is not in the manifest"))?,
    };

    if index >= manifest.len() {
        return Err(format!(
            "split feature '{split}' refers to column {index} of {}",
            manifest.len()
        ));
    }
    Ok(index)
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
