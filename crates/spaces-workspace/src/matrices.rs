//! Item-level entities: similarities, correlations, evaluations, individuals

use crate::entity::{Entity, EntityName};
use crate::table::{LowerTriangle, Table, TableError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether larger values mean more alike or less alike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    Similarities,
    Dissimilarities,
}

impl ValueType {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Similarities => "similarities",
            Self::Dissimilarities => "dissimilarities",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "similarities" => Ok(Self::Similarities),
            "dissimilarities" => Ok(Self::Dissimilarities),
            other => Err(format!("unknown value type: {other}")),
        }
    }
}

/// One similarity matrix with its value type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    pub matrix: LowerTriangle,
    pub value_type: ValueType,
}

impl SimilarityMatrix {
    #[inline]
    #[must_use]
    pub fn new(matrix: LowerTriangle, value_type: ValueType) -> Self {
        Self { matrix, value_type }
    }

    #[inline]
    #[must_use]
    pub fn nitems(&self) -> usize {
        self.matrix.nitems()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }
}

/// Similarities between items
///
/// `active` is what commands operate on; `original` is the matrix as read and
/// `last` the one before the most recent derivation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Similarities {
    pub active: SimilarityMatrix,
    pub original: SimilarityMatrix,
    pub last: SimilarityMatrix,
    /// Average ranks of the active values, in lower triangle order
    pub ranked_similarities: Vec<f64>,
}

impl Similarities {
    /// Similarities where all three matrices start from the same read
    #[must_use]
    pub fn from_matrix(matrix: SimilarityMatrix) -> Self {
        let values: Vec<f64> = matrix.matrix.pairs().map(|(_, _, v)| v).collect();
        Self {
            ranked_similarities: crate::geometry::average_ranks(&values),
            active: matrix.clone(),
            original: matrix.clone(),
            last: matrix,
        }
    }

    /// Replace the active matrix, keeping the previous one as `last`
    pub fn replace_active(&mut self, matrix: SimilarityMatrix) {
        let previous = std::mem::replace(&mut self.active, matrix);
        self.last = previous;
        if self.original.is_empty() {
            self.original = self.active.clone();
        }
        let values: Vec<f64> = self.active.matrix.pairs().map(|(_, _, v)| v).collect();
        self.ranked_similarities = crate::geometry::average_ranks(&values);
    }

    #[inline]
    #[must_use]
    pub fn nitems(&self) -> usize {
        self.active.nitems()
    }
}

impl Entity for Similarities {
    const NAME: EntityName = EntityName::Similarities;

    fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// Correlations between items
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Correlations {
    pub matrix: LowerTriangle,
}

impl Correlations {
    #[inline]
    #[must_use]
    pub fn nitems(&self) -> usize {
        self.matrix.nitems()
    }
}

impl Entity for Correlations {
    const NAME: EntityName = EntityName::Correlations;

    fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }
}

/// Ratings of items by evaluators
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Evaluations {
    pub item_names: Vec<String>,
    pub item_labels: Vec<String>,
    /// One row per evaluator, one column per item
    pub evaluations: Table,
}

impl Evaluations {
    #[inline]
    #[must_use]
    pub fn nitems(&self) -> usize {
        self.item_names.len()
    }

    #[inline]
    #[must_use]
    pub fn nevaluators(&self) -> usize {
        self.evaluations.nrows()
    }

    /// Pearson correlations between every pair of items
    ///
    /// Items without variance correlate at zero.
    ///
    /// # Errors
    /// Returns [`TableError`] if the item list and table disagree.
    pub fn item_correlations(&self) -> Result<Correlations, TableError> {
        let columns: Vec<Vec<f64>> = (0..self.nitems())
            .map(|col| self.evaluations.column(col).collect())
            .collect();
        let rows = (1..columns.len())
            .map(|a| (0..a).map(|b| pearson(&columns[a], &columns[b])).collect())
            .collect();
        let matrix = LowerTriangle::new(self.item_names.clone(), self.item_labels.clone(), rows)?;
        Ok(Correlations { matrix })
    }
}

impl Entity for Evaluations {
    const NAME: EntityName = EntityName::Evaluations;

    fn is_empty(&self) -> bool {
        self.item_names.is_empty()
    }
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = n as f64;
    let mean_x = x[..n].iter().sum::<f64>() / count;
    let mean_y = y[..n].iter().sum::<f64>() / count;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in x[..n].iter().zip(&y[..n]) {
        let (dx, dy) = (a - mean_x, b - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        0.0
    } else {
        cov / (var_x.sqrt() * var_y.sqrt())
    }
}

/// Individual-level variables
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Individuals {
    pub var_names: Vec<String>,
    /// One row per individual, one column per variable
    pub ind_vars: Table,
}

impl Individuals {
    #[inline]
    #[must_use]
    pub fn nindividuals(&self) -> usize {
        self.ind_vars.nrows()
    }
}

impl Entity for Individuals {
    const NAME: EntityName = EntityName::Individuals;

    fn is_empty(&self) -> bool {
        self.ind_vars.is_empty()
    }
}
