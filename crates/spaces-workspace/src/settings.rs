//! User preferences that shape presentation

use crate::entity::{Entity, EntityName};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Plotting backend used by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationLayer {
    #[default]
    Matplotlib,
    Pyqtgraph,
}

impl PresentationLayer {
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Matplotlib => "matplotlib",
            Self::Pyqtgraph => "pyqtgraph",
        }
    }
}

impl fmt::Display for PresentationLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresentationLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "matplotlib" => Ok(Self::Matplotlib),
            "pyqtgraph" => Ok(Self::Pyqtgraph),
            other => Err(format!("unknown presentation layer: {other}")),
        }
    }
}

/// Display, layout and plot preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Dimension shown horizontally
    pub hor_dim: usize,
    /// Dimension shown vertically
    pub vert_dim: usize,
    pub presentation_layer: PresentationLayer,

    // display sizing
    pub axis_extra: f64,
    pub displacement: f64,
    pub point_size: i64,

    // layout options
    pub max_cols: i64,
    pub width: i64,
    pub decimals: i64,

    // plot settings
    pub show_bisector: bool,
    pub show_connector: bool,
    pub show_reference_points: bool,
    pub show_just_reference_points: bool,

    // segment sizing, in percent
    pub battleground_size: i64,
    pub core_tolerance: i64,

    // vector sizing
    pub vector_head_width: f64,
    pub vector_width: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hor_dim: 0,
            vert_dim: 1,
            presentation_layer: PresentationLayer::Matplotlib,
            axis_extra: 0.1,
            displacement: 0.04,
            point_size: 3,
            max_cols: 10,
            width: 8,
            decimals: 2,
            show_bisector: true,
            show_connector: true,
            show_reference_points: true,
            show_just_reference_points: false,
            battleground_size: 25,
            core_tolerance: 20,
            vector_head_width: 0.05,
            vector_width: 0.01,
        }
    }
}

impl Entity for Settings {
    const NAME: EntityName = EntityName::Settings;

    /// Settings always carry values
    fn is_empty(&self) -> bool {
        false
    }
}
