//! Testing utilities for the Spaces workspace
//!
//! Fixture data files and workspace builders shared by tests.

#![allow(missing_docs)]

use spaces_workspace::{Configuration, PointSet, Target, Workspace};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Three points on two dimensions
pub const CONFIGURATION: &str = "Configuration\n2 3\nLR;Left-Right\nUD;Up-Down\nA;Alpha\nB;Beta\nG;Gamma\n0.5 -0.2\n1.0 1.0\n-1.5 0.25\n";

/// Same points as [`CONFIGURATION`], other coordinates
pub const TARGET: &str = "Configuration\n2 3\nLR;Left-Right\nUD;Up-Down\nA;Alpha\nB;Beta\nG;Gamma\n0.4 -0.1\n1.1 0.9\n-1.4 0.3\n";

/// Points that do not match [`CONFIGURATION`]
pub const MISMATCHED_TARGET: &str =
    "Configuration\n2 2\nLR;Left-Right\nUD;Up-Down\nA;Alpha\nD;Delta\n0.0 0.0\n1.0 1.0\n";

/// Two points on one dimension
pub const SMALL_CONFIGURATION: &str = "Configuration\n1 2\nLR;Left-Right\nC;Carter\nR;Reagan\n-1.0\n1.0\n";

/// Similarities among the points of [`CONFIGURATION`]
pub const SIMILARITIES: &str = "Lower triangular\n3\nA;Alpha\nB;Beta\nG;Gamma\n1.0\n2.0 3.0\n";

/// Groups on the dimensions of [`CONFIGURATION`]
pub const GROUPED: &str = "Grouped\nParty\n2 2\nLR;Left-Right\nUD;Up-Down\nD;1;Democrats\nR;2;Republicans\n-0.4 0.1\n0.5 0.2\n";

/// Evaluations of the points of [`CONFIGURATION`]
pub const EVALUATIONS: &str = "Alpha,Beta,Gamma\n1,2,3\n2,2,4\n3,1,5\n5,0,6\n";

/// Respondent scores on the dimensions of [`CONFIGURATION`]
pub const SCORES: &str = "Left-Right,Up-Down\n0.1,0.2\n-0.3,0.4\n";

/// Not a data file
pub const GARBAGE: &str = "this is not a data file\n";

/// Temporary directory holding fixture files
#[derive(Debug)]
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    /// Create an empty fixture directory
    ///
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create fixture directory"),
        }
    }

    /// Directory containing the fixtures
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `contents` to `name` and return its full path
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    /// Write every standard fixture under its conventional name
    #[must_use]
    pub fn standard() -> Self {
        let fixtures = Self::new();
        for (name, contents) in [
            ("configuration.txt", CONFIGURATION),
            ("target.txt", TARGET),
            ("mismatched_target.txt", MISMATCHED_TARGET),
            ("small.txt", SMALL_CONFIGURATION),
            ("similarities.txt", SIMILARITIES),
            ("grouped.txt", GROUPED),
            ("evaluations.csv", EVALUATIONS),
            ("scores.csv", SCORES),
            ("garbage.txt", GARBAGE),
        ] {
            fixtures.write(name, contents);
        }
        fixtures
    }
}

impl Default for Fixtures {
    fn default() -> Self {
        Self::new()
    }
}

/// Point set named `a`, `b`, ... with the given coordinate rows
///
/// # Panics
/// Panics if rows differ in length.
#[must_use]
pub fn point_set(rows: &[&[f64]]) -> PointSet {
    let ndim = rows.first().map_or(0, |row| row.len());
    let dims: Vec<String> = (0..ndim).map(|i| format!("Dim {}", i + 1)).collect();
    let points: Vec<String> = (0..rows.len())
        .map(|i| char::from(b'a' + u8::try_from(i % 26).unwrap_or(0)).to_string())
        .collect();
    PointSet::new(
        dims.clone(),
        dims,
        points.clone(),
        points,
        rows.iter().map(|row| row.to_vec()).collect(),
    )
    .expect("consistent fixture rows")
}

/// Workspace with an active configuration
#[must_use]
pub fn workspace_with_configuration(rows: &[&[f64]]) -> Workspace {
    let mut workspace = Workspace::new();
    *workspace.configuration_mut() = Configuration::from_points(point_set(rows));
    workspace
}

/// Workspace with matching configuration and target
#[must_use]
pub fn workspace_with_target(rows: &[&[f64]]) -> Workspace {
    let mut workspace = workspace_with_configuration(rows);
    *workspace.target_mut() = Target {
        points: point_set(rows),
    };
    workspace
}
