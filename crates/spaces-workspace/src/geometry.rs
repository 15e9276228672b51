//! Spatial entities
//!
//! Entities whose rows are positioned in a dimensional space:
//! - [`Configuration`]: the active point configuration with derived distances
//! - [`Target`]: a reference configuration to compare against
//! - [`GroupedData`]: group centroids in the same dimensions
//! - [`Scores`]: respondent positions

use crate::entity::{Entity, EntityName};
use crate::table::{Table, TableError};
use serde::{Deserialize, Serialize};

/// Named points positioned on named dimensions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSet {
    pub dim_names: Vec<String>,
    pub dim_labels: Vec<String>,
    pub point_names: Vec<String>,
    pub point_labels: Vec<String>,
    /// One row per point, one column per dimension
    pub coords: Table,
}

impl PointSet {
    /// Create a point set from names, labels and coordinate rows
    ///
    /// # Errors
    /// Returns [`TableError`] when the coordinates do not match the names.
    pub fn new(
        dim_names: Vec<String>,
        dim_labels: Vec<String>,
        point_names: Vec<String>,
        point_labels: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        let coords = Table::new(point_labels.clone(), dim_labels.clone(), rows)?;
        Ok(Self {
            dim_names,
            dim_labels,
            point_names,
            point_labels,
            coords,
        })
    }

    #[inline]
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.dim_names.len()
    }

    #[inline]
    #[must_use]
    pub fn npoint(&self) -> usize {
        self.point_names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.point_names.is_empty() && self.dim_names.is_empty()
    }

    /// Index of a dimension given its name or label
    #[must_use]
    pub fn dim_index(&self, key: &str) -> Option<usize> {
        find_name_or_label(&self.dim_names, &self.dim_labels, key)
    }

    /// Index of a point given its name or label
    #[must_use]
    pub fn point_index(&self, key: &str) -> Option<usize> {
        find_name_or_label(&self.point_names, &self.point_labels, key)
    }

    /// Coordinate of `point` on `dim`
    #[inline]
    #[must_use]
    pub fn coordinate(&self, point: usize, dim: usize) -> Option<f64> {
        self.coords.get(point, dim)
    }
}

pub(crate) fn find_name_or_label(names: &[String], labels: &[String], key: &str) -> Option<usize> {
    names
        .iter()
        .position(|n| n == key)
        .or_else(|| labels.iter().position(|l| l == key))
}

/// The active configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Configuration {
    pub points: PointSet,
    /// Euclidean inter-point distances, points by points
    pub distances: Table,
    /// Average ranks of the off-diagonal distances, in lower triangle order
    pub ranked_distances: Vec<f64>,
    pub hor_axis_name: String,
    pub vert_axis_name: String,
}

impl Configuration {
    /// Build a configuration and its derived distances from a point set
    #[must_use]
    pub fn from_points(points: PointSet) -> Self {
        let mut configuration = Self {
            points,
            ..Self::default()
        };
        configuration.refresh_derived(0, 1);
        configuration
    }

    /// Recompute distances, ranks and axis names after the points changed
    pub fn refresh_derived(&mut self, hor_dim: usize, vert_dim: usize) {
        self.distances = inter_point_distances(&self.points);
        let lower: Vec<f64> = lower_pairs(&self.distances).collect();
        self.ranked_distances = average_ranks(&lower);
        self.hor_axis_name = self.points.dim_names.get(hor_dim).cloned().unwrap_or_default();
        self.vert_axis_name = self
            .points
            .dim_names
            .get(vert_dim)
            .cloned()
            .unwrap_or_default();
    }

    /// Whether derived distances are available
    #[inline]
    #[must_use]
    pub fn has_distances(&self) -> bool {
        !self.distances.is_empty()
    }
}

impl Entity for Configuration {
    const NAME: EntityName = EntityName::Configuration;

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn inter_point_distances(points: &PointSet) -> Table {
    let mut distances = Table::zeros(points.point_labels.clone(), points.point_labels.clone());
    let rows = points.coords.rows();
    for (a, row_a) in rows.iter().enumerate() {
        if let Some(out) = distances.row_mut(a) {
            for (b, row_b) in rows.iter().enumerate() {
                out[b] = row_a
                    .iter()
                    .zip(row_b)
                    .map(|(x, y)| (x - y).powi(2))
                    .sum::<f64>()
                    .sqrt();
            }
        }
    }
    distances
}

fn lower_pairs(table: &Table) -> impl Iterator<Item = f64> + '_ {
    table
        .rows()
        .iter()
        .enumerate()
        .flat_map(|(row, values)| values.iter().take(row).copied())
}

/// Average (fractional) ranks, starting at 1
#[must_use]
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| values[*a].total_cmp(&values[*b]));
    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        #[allow(clippy::cast_precision_loss)]
        let rank = (start + end + 1) as f64 / 2.0;
        for index in &order[start..end] {
            ranks[*index] = rank;
        }
        start = end;
    }
    ranks
}

/// Reference configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Target {
    pub points: PointSet,
}

impl Entity for Target {
    const NAME: EntityName = EntityName::Target;

    fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Centroids of groups defined by a grouping variable
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupedData {
    pub grouping_var: String,
    pub group_names: Vec<String>,
    pub group_labels: Vec<String>,
    pub group_codes: Vec<i64>,
    pub dim_names: Vec<String>,
    pub dim_labels: Vec<String>,
    /// One row per group, one column per dimension
    pub coords: Table,
}

impl GroupedData {
    #[inline]
    #[must_use]
    pub fn ngroups(&self) -> usize {
        self.group_names.len()
    }

    #[inline]
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.dim_names.len()
    }
}

impl Entity for GroupedData {
    const NAME: EntityName = EntityName::GroupedData;

    fn is_empty(&self) -> bool {
        self.group_names.is_empty()
    }
}

/// Respondent scores on the dimensions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    pub dim_names: Vec<String>,
    pub dim_labels: Vec<String>,
    /// One row per respondent, one column per score
    pub scores: Table,
    pub score_1_name: String,
    pub score_2_name: String,
}

impl Scores {
    /// Build scores and name the first two columns
    #[must_use]
    pub fn from_table(dim_names: Vec<String>, dim_labels: Vec<String>, scores: Table) -> Self {
        let score_1_name = dim_names.first().cloned().unwrap_or_default();
        let score_2_name = dim_names.get(1).cloned().unwrap_or_default();
        Self {
            dim_names,
            dim_labels,
            scores,
            score_1_name,
            score_2_name,
        }
    }

    #[inline]
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.dim_names.len()
    }

    #[inline]
    #[must_use]
    pub fn nscored(&self) -> usize {
        self.scores.nrows()
    }
}

impl Entity for Scores {
    const NAME: EntityName = EntityName::Scores;

    fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn triangle() -> PointSet {
        PointSet::new(
            strings(&["Left-Right", "Up-Down"]),
            strings(&["LR", "UD"]),
            strings(&["Alpha", "Beta", "Gamma"]),
            strings(&["A", "B", "G"]),
            vec![vec![0.0, 0.0], vec![3.0, 4.0], vec![0.0, 4.0]],
        )
        .unwrap()
    }

    #[test]
    fn configuration_derives_distances_and_axis_names() {
        let configuration = Configuration::from_points(triangle());
        assert_eq!(configuration.distances.get(0, 1), Some(5.0));
        assert_eq!(configuration.distances.get(1, 2), Some(3.0));
        assert_eq!(configuration.distances.get(2, 2), Some(0.0));
        // pairs: (B,A)=5, (G,A)=4, (G,B)=3
        assert_eq!(configuration.ranked_distances, vec![3.0, 2.0, 1.0]);
        assert_eq!(configuration.hor_axis_name, "Left-Right");
        assert_eq!(configuration.vert_axis_name, "Up-Down");
    }

    #[test]
    fn lookup_by_name_or_label() {
        let points = triangle();
        assert_eq!(points.point_index("Beta"), Some(1));
        assert_eq!(points.point_index("G"), Some(2));
        assert_eq!(points.dim_index("UD"), Some(1));
        assert_eq!(points.dim_index("Sideways"), None);
    }

    #[test]
    fn ties_share_average_rank() {
        assert_eq!(average_ranks(&[2.0, 1.0, 2.0]), vec![2.5, 1.0, 2.5]);
        assert!(average_ranks(&[]).is_empty());
    }

    #[test]
    fn default_entities_are_empty() {
        assert!(Configuration::default().is_empty());
        assert!(Target::default().is_empty());
        assert!(GroupedData::default().is_empty());
        assert!(Scores::default().is_empty());
        assert!(!Configuration::from_points(triangle()).is_empty());
    }
}
