//! Sampling uncertainty: designs, repetitions and solutions

use crate::entity::{Entity, EntityName};
use crate::table::Table;
use serde::{Deserialize, Serialize};

/// Inputs and results of an uncertainty analysis
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Uncertainty {
    pub universe_size: usize,
    pub nrepetitions: usize,
    /// Percent chance of an evaluator being drawn in one repetition
    pub probability_of_inclusion: f64,
    /// Repetition by evaluator inclusion flags
    pub sample_design: Table,
    /// Number of evaluators drawn per repetition
    pub sample_design_frequencies: Table,
    pub sample_repetitions: Table,
    pub solutions_stress: Table,
    pub sample_solutions: Table,
    pub dim_names: Vec<String>,
    pub dim_labels: Vec<String>,
    pub point_names: Vec<String>,
    pub point_labels: Vec<String>,
}

impl Uncertainty {
    #[inline]
    #[must_use]
    pub fn has_sample_design(&self) -> bool {
        !self.sample_design.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn has_sample_repetitions(&self) -> bool {
        !self.sample_repetitions.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn has_sample_solutions(&self) -> bool {
        !self.sample_solutions.is_empty()
    }

    /// Install a sample design and derive its bookkeeping
    #[allow(clippy::cast_precision_loss)]
    pub fn set_sample_design(&mut self, design: Table) {
        self.nrepetitions = design.nrows();
        self.universe_size = design.ncols();
        let names = design.row_names().to_vec();
        let rows = design
            .rows()
            .iter()
            .map(|row| vec![row.iter().filter(|v| **v != 0.0).count() as f64])
            .collect();
        self.sample_design_frequencies =
            Table::new(names, vec!["Selected".to_string()], rows).unwrap_or_default();
        self.sample_design = design;
    }
}

impl Entity for Uncertainty {
    const NAME: EntityName = EntityName::Uncertainty;

    fn is_empty(&self) -> bool {
        !self.has_sample_design() && !self.has_sample_repetitions() && !self.has_sample_solutions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_derives_frequencies() {
        let design = Table::new(
            vec!["1".into(), "2".into()],
            vec!["e1".into(), "e2".into(), "e3".into()],
            vec![vec![1.0, 0.0, 1.0], vec![1.0, 1.0, 1.0]],
        )
        .unwrap();
        let mut uncertainty = Uncertainty::default();
        assert!(uncertainty.is_empty());

        uncertainty.set_sample_design(design);
        assert!(!uncertainty.is_empty());
        assert_eq!(uncertainty.nrepetitions, 2);
        assert_eq!(uncertainty.universe_size, 3);
        assert_eq!(
            uncertainty.sample_design_frequencies.column(0).collect::<Vec<_>>(),
            vec![2.0, 3.0]
        );
    }
}
