//! The closed set of commands and their descriptors
//!
//! [`CommandKind`] enumerates every command of the application. Each kind
//! maps to exactly one static [`Descriptor`]: its classification, the
//! entities it touches, its parameter schema and its requirements.

use crate::classification::{Classification, TouchSet};
use crate::params::{DefaultValue, ParamError, ParamSpec, ParamType, Params};
use spaces_workspace::{EntityName, Requirement};
use std::fmt;

macro_rules! commands {
    ($($variant:ident => $name:literal,)*) => {
        /// Every command of the application
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum CommandKind {
            $($variant,)*
        }

        impl CommandKind {
            /// Every command, in declaration (lexical) order
            pub const ALL: &'static [CommandKind] = &[$(Self::$variant,)*];

            /// Name as shown in menus and written in scripts
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }
        }
    };
}

commands! {
    About => "About",
    Alike => "Alike",
    Base => "Base",
    Battleground => "Battleground",
    Center => "Center",
    Cluster => "Cluster",
    Compare => "Compare",
    Configuration => "Configuration",
    Contest => "Contest",
    Convertible => "Convertible",
    CoreSupporters => "Core supporters",
    Correlations => "Correlations",
    Create => "Create",
    Deactivate => "Deactivate",
    Directions => "Directions",
    Distances => "Distances",
    Evaluations => "Evaluations",
    Exit => "Exit",
    FactorAnalysis => "Factor analysis",
    FactorAnalysisMachineLearning => "Factor analysis machine learning",
    FirstDimension => "First dimension",
    GroupedData => "Grouped data",
    Help => "Help",
    History => "History",
    Individuals => "Individuals",
    Invert => "Invert",
    Joint => "Joint",
    LikelySupporters => "Likely supporters",
    LineOfSight => "Line of sight",
    Mds => "MDS",
    Move => "Move",
    NewGroupedData => "New grouped data",
    OpenSampleDesign => "Open sample design",
    OpenSampleRepetitions => "Open sample repetitions",
    OpenSampleSolutions => "Open sample solutions",
    OpenScores => "Open scores",
    OpenScript => "Open script",
    Paired => "Paired",
    PrincipalComponents => "Principal components",
    PrintConfiguration => "Print configuration",
    PrintCorrelations => "Print correlations",
    PrintEvaluations => "Print evaluations",
    PrintGroupedData => "Print grouped data",
    PrintIndividuals => "Print individuals",
    PrintSampleDesign => "Print sample design",
    PrintSampleRepetitions => "Print sample repetitions",
    PrintSampleSolutions => "Print sample solutions",
    PrintScores => "Print scores",
    PrintSimilarities => "Print similarities",
    PrintTarget => "Print target",
    RanksDifferences => "Ranks differences",
    RanksDistances => "Ranks distances",
    RanksSimilarities => "Ranks similarities",
    Redo => "Redo",
    ReferencePoints => "Reference points",
    Rescale => "Rescale",
    Rotate => "Rotate",
    SampleDesigner => "Sample designer",
    SampleRepetitions => "Sample repetitions",
    SaveConfiguration => "Save configuration",
    SaveCorrelations => "Save correlations",
    SaveGroupedData => "Save grouped data",
    SaveIndividuals => "Save individuals",
    SaveSampleDesign => "Save sample design",
    SaveSampleRepetitions => "Save sample repetitions",
    SaveSampleSolutions => "Save sample solutions",
    SaveScores => "Save scores",
    SaveScript => "Save script",
    SaveSimilarities => "Save similarities",
    SaveTarget => "Save target",
    ScoreIndividuals => "Score individuals",
    Scree => "Scree",
    SecondDimension => "Second dimension",
    Segments => "Segments",
    SettingsDisplaySizing => "Settings - display sizing",
    SettingsLayoutOptions => "Settings - layout options",
    SettingsPlane => "Settings - plane",
    SettingsPlotSettings => "Settings - plot settings",
    SettingsPresentationLayer => "Settings - presentation layer",
    SettingsSegmentSizing => "Settings - segment sizing",
    SettingsVectorSizing => "Settings - vector sizing",
    Shepard => "Shepard",
    Similarities => "Similarities",
    Status => "Status",
    StressContribution => "Stress contribution",
    Target => "Target",
    Terse => "Terse",
    Uncertainty => "Uncertainty",
    Undo => "Undo",
    Varimax => "Varimax",
    Vectors => "Vectors",
    Verbose => "Verbose",
    ViewConfiguration => "View configuration",
    ViewCorrelations => "View correlations",
    ViewCustom => "View custom",
    ViewDistances => "View distances",
    ViewEvaluations => "View evaluations",
    ViewGroupedData => "View grouped data",
    ViewIndividuals => "View individuals",
    ViewPointUncertainty => "View point uncertainty",
    ViewSampleDesign => "View sample design",
    ViewSampleRepetitions => "View sample repetitions",
    ViewSampleSolutions => "View sample solutions",
    ViewScores => "View scores",
    ViewScript => "View script",
    ViewSimilarities => "View similarities",
    ViewSpatialUncertainty => "View spatial uncertainty",
    ViewTarget => "View target",
}

impl CommandKind {
    /// Number of commands
    pub const COUNT: usize = Self::ALL.len();

    /// Static description of this command
    #[inline]
    #[must_use]
    pub fn descriptor(self) -> &'static Descriptor {
        crate::registry::Registry::global().descriptor(self)
    }

    /// Entity whose content this command reads from an external file
    #[must_use]
    pub const fn loads(self) -> Option<EntityName> {
        match self {
            Self::Configuration => Some(EntityName::Configuration),
            Self::Correlations => Some(EntityName::Correlations),
            Self::Evaluations => Some(EntityName::Evaluations),
            Self::GroupedData => Some(EntityName::GroupedData),
            Self::Individuals => Some(EntityName::Individuals),
            Self::OpenScores => Some(EntityName::Scores),
            Self::Similarities => Some(EntityName::Similarities),
            Self::Target => Some(EntityName::Target),
            Self::OpenSampleDesign | Self::OpenSampleRepetitions | Self::OpenSampleSolutions => {
                Some(EntityName::Uncertainty)
            }
            _ => None,
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static metadata of one command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptor {
    pub kind: CommandKind,
    pub name: &'static str,
    pub classification: Classification,
    pub touches: TouchSet,
    pub params: &'static [ParamSpec],
    pub requires: &'static [Requirement],
}

impl Descriptor {
    /// Schema of a named parameter
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|spec| spec.name == name)
    }

    /// Entities touched by an invocation with these bound parameters
    ///
    /// # Errors
    /// Returns [`ParamError`] when a conditional touch set cannot be resolved
    /// from the parameters.
    pub fn resolve_touches(&self, params: &Params) -> Result<Vec<EntityName>, ParamError> {
        match self.touches {
            TouchSet::Entities(entities) => Ok(entities.to_vec()),
            TouchSet::History | TouchSet::Nothing => Ok(Vec::new()),
            TouchSet::Conditional => match self.kind {
                CommandKind::Cluster => {
                    let source = ClusterSource::parse(params.text("data_source")?)?;
                    let mut entities = vec![EntityName::Scores, source.entity()];
                    entities.sort();
                    entities.dedup();
                    Ok(entities)
                }
                CommandKind::Deactivate => {
                    let mut entities = params
                        .list("items")?
                        .iter()
                        .map(|item| {
                            item.parse::<EntityName>()
                                .map_err(|e| ParamError::invalid("items", e.to_string()))
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    entities.sort();
                    entities.dedup();
                    Ok(entities)
                }
                _ => Ok(Vec::new()),
            },
        }
    }
}

/// Data a cluster analysis runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterSource {
    Distances,
    Evaluations,
    Scores,
    Similarities,
}

impl ClusterSource {
    /// Parse a `data_source` parameter
    ///
    /// # Errors
    /// Returns [`ParamError::Invalid`] for unknown sources.
    pub fn parse(text: &str) -> Result<Self, ParamError> {
        match text {
            "distances" => Ok(Self::Distances),
            "evaluations" => Ok(Self::Evaluations),
            "scores" => Ok(Self::Scores),
            "similarities" => Ok(Self::Similarities),
            other => Err(ParamError::invalid(
                "data_source",
                format!("unknown data source '{other}'"),
            )),
        }
    }

    /// Entity holding the source data
    #[must_use]
    pub const fn entity(self) -> EntityName {
        match self {
            Self::Distances => EntityName::Configuration,
            Self::Evaluations => EntityName::Evaluations,
            Self::Scores => EntityName::Scores,
            Self::Similarities => EntityName::Similarities,
        }
    }
}

use EntityName as E;
use Requirement as R;

const NONE: &[ParamSpec] = &[];

const FILE: &[ParamSpec] = &[ParamSpec::new("file", ParamType::Text).with_label("File name")];

const SIMILARITIES: &[ParamSpec] = &[
    ParamSpec::new("file", ParamType::Text).with_label("File name"),
    ParamSpec::new("value_type", ParamType::Text)
        .optional(DefaultValue::Text("similarities"))
        .with_choices(&["similarities", "dissimilarities"])
        .with_label("Values are similarities or dissimilarities"),
];

const CLUSTER: &[ParamSpec] = &[
    ParamSpec::new("data_source", ParamType::Text)
        .with_choices(&["distances", "evaluations", "scores", "similarities"])
        .with_label("Choose which data source to use for clustering"),
    ParamSpec::new("n_clusters", ParamType::Integer)
        .with_range(2.0, 15.0)
        .with_label("Number of clusters to extract"),
];

const N_FACTORS: &[ParamSpec] = &[ParamSpec::new("n_factors", ParamType::Integer)
    .with_range(1.0, 100.0)
    .with_label("Number of factors to extract")];

const N_COMPONENTS: &[ParamSpec] = &[ParamSpec::new("n_components", ParamType::Integer)
    .with_range(1.0, 100.0)
    .with_label("Number of components to extract")];

const MDS: &[ParamSpec] = &[
    ParamSpec::new("n_components", ParamType::Integer)
        .with_range(1.0, 10.0)
        .with_label("Number of components to extract"),
    ParamSpec::new("use_metric", ParamType::Boolean)
        .optional(DefaultValue::Boolean(false))
        .with_label("Use metric MDS"),
];

const DIMENSIONS: &[ParamSpec] = &[ParamSpec::new("dimensions", ParamType::TextList)
    .with_label("Select dimensions to invert")];

const MOVE: &[ParamSpec] = &[
    ParamSpec::new("dimension", ParamType::Text).with_label("Dimension to move along"),
    ParamSpec::new("distance", ParamType::Float)
        .with_range(-9999.9, 9999.9)
        .with_label("Distance to move every point"),
];

const FOCUS: &[ParamSpec] = &[ParamSpec::new("focus", ParamType::Text)
    .with_label("Select point to view relationships with others")];

const CONTEST: &[ParamSpec] = &[ParamSpec::new("contest", ParamType::TextList)
    .with_label("Select a pair of reference points")];

const FACTORS: &[ParamSpec] = &[ParamSpec::new("factors", ParamType::TextList)
    .with_label("Amount by which to multiply every point on each dimension")];

const DEGREES: &[ParamSpec] = &[ParamSpec::new("degrees", ParamType::Float)
    .with_range(-360.0, 360.0)
    .with_label("Degrees to rotate, positive is counter-clockwise")];

const SAMPLE_DESIGNER: &[ParamSpec] = &[
    ParamSpec::new("probability_of_inclusion", ParamType::Float)
        .with_range(1.0, 100.0)
        .with_label("Probability of inclusion (percent)"),
    ParamSpec::new("nrepetitions", ParamType::Integer)
        .with_range(1.0, 10_000.0)
        .with_label("Number of repetitions"),
];

const DISPLAY_SIZING: &[ParamSpec] = &[
    ParamSpec::new("axis_extra", ParamType::Float).with_range(0.0, 1.0),
    ParamSpec::new("displacement", ParamType::Float).with_range(0.0, 1.0),
    ParamSpec::new("point_size", ParamType::Integer).with_range(1.0, 20.0),
];

const LAYOUT_OPTIONS: &[ParamSpec] = &[
    ParamSpec::new("max_cols", ParamType::Integer).with_range(1.0, 20.0),
    ParamSpec::new("width", ParamType::Integer).with_range(1.0, 20.0),
    ParamSpec::new("decimals", ParamType::Integer).with_range(0.0, 10.0),
];

const PLANE: &[ParamSpec] = &[ParamSpec::new("plane", ParamType::TextList)
    .with_label("Horizontal and vertical dimension")];

const PLOT_SETTINGS: &[ParamSpec] = &[
    ParamSpec::new("bisector", ParamType::Boolean),
    ParamSpec::new("connector", ParamType::Boolean),
    ParamSpec::new("reference_points", ParamType::Boolean),
    ParamSpec::new("just_reference_points", ParamType::Boolean),
];

const LAYER: &[ParamSpec] = &[ParamSpec::new("layer", ParamType::Text)
    .with_choices(&["matplotlib", "pyqtgraph"])
    .with_label("Presentation layer")];

const SEGMENT_SIZING: &[ParamSpec] = &[
    ParamSpec::new("battleground", ParamType::Integer).with_range(0.0, 100.0),
    ParamSpec::new("core", ParamType::Integer).with_range(0.0, 100.0),
];

const VECTOR_SIZING: &[ParamSpec] = &[
    ParamSpec::new("vector_head_width", ParamType::Float).with_range(0.0, 1.0),
    ParamSpec::new("vector_width", ParamType::Float).with_range(0.0, 1.0),
];

const DEACTIVATE: &[ParamSpec] = &[ParamSpec::new("items", ParamType::TextList)
    .with_label("Select items to deactivate")];

const POINT_UNCERTAINTY: &[ParamSpec] = &[
    ParamSpec::new("plot", ParamType::Text)
        .with_choices(&["ellipses", "lines", "boxes", "points"])
        .with_label("Plot type"),
    ParamSpec::new("points", ParamType::TextList).with_label("Points to show"),
];

const SPATIAL_UNCERTAINTY: &[ParamSpec] = &[ParamSpec::new("plot", ParamType::Text)
    .with_choices(&["ellipses", "lines", "boxes", "points"])
    .with_label("Plot type")];

const CREATE: &[ParamSpec] = &[
    ParamSpec::new("dim_names", ParamType::TextList).with_label("Dimension names"),
    ParamSpec::new("point_names", ParamType::TextList).with_label("Point names"),
    ParamSpec::new("coordinates", ParamType::TextList)
        .with_label("Coordinates, point by point"),
];

const NEW_GROUPED_DATA: &[ParamSpec] = &[
    ParamSpec::new("grouping_var", ParamType::Text).with_label("Grouping variable"),
    ParamSpec::new("group_names", ParamType::TextList).with_label("Group names"),
    ParamSpec::new("coordinates", ParamType::TextList)
        .with_label("Coordinates, group by group"),
];

const TRANSFORMED: &[EntityName] = &[E::Configuration, E::Scores, E::Rivalry];
const FACTORED: &[EntityName] = &[E::Configuration, E::Evaluations, E::Scores];

const fn active(
    kind: CommandKind,
    touches: &'static [EntityName],
    params: &'static [ParamSpec],
    requires: &'static [Requirement],
) -> Descriptor {
    Descriptor {
        kind,
        name: kind.name(),
        classification: Classification::Active,
        touches: TouchSet::Entities(touches),
        params,
        requires,
    }
}

const fn conditional(
    kind: CommandKind,
    params: &'static [ParamSpec],
    requires: &'static [Requirement],
) -> Descriptor {
    Descriptor {
        touches: TouchSet::Conditional,
        ..active(kind, &[], params, requires)
    }
}

const fn history(kind: CommandKind) -> Descriptor {
    Descriptor {
        touches: TouchSet::History,
        ..active(kind, &[], NONE, &[])
    }
}

const fn interactive(
    kind: CommandKind,
    touches: &'static [EntityName],
    params: &'static [ParamSpec],
    requires: &'static [Requirement],
) -> Descriptor {
    Descriptor {
        classification: Classification::InteractiveOnly,
        ..active(kind, touches, params, requires)
    }
}

const fn passive(kind: CommandKind, requires: &'static [Requirement]) -> Descriptor {
    passive_with(kind, NONE, requires)
}

const fn passive_with(
    kind: CommandKind,
    params: &'static [ParamSpec],
    requires: &'static [Requirement],
) -> Descriptor {
    Descriptor {
        kind,
        name: kind.name(),
        classification: Classification::Passive,
        touches: TouchSet::Nothing,
        params,
        requires,
    }
}

const fn script(kind: CommandKind, params: &'static [ParamSpec]) -> Descriptor {
    Descriptor {
        classification: Classification::ScriptMeta,
        ..passive_with(kind, params, &[])
    }
}

/// Build the descriptor of a command
#[must_use]
pub(crate) const fn describe(kind: CommandKind) -> Descriptor {
    use CommandKind as K;
    match kind {
        K::About | K::Exit | K::Help | K::History | K::Status | K::Terse | K::Verbose => {
            passive(kind, &[])
        }
        K::Alike | K::StressContribution => passive(kind, &[R::Configuration, R::Similarities]),
        K::Paired => passive_with(kind, FOCUS, &[R::Configuration, R::Similarities]),
        K::Base
        | K::Battleground
        | K::Contest
        | K::Convertible
        | K::CoreSupporters
        | K::FirstDimension
        | K::LikelySupporters
        | K::SecondDimension => passive(kind, &[R::Configuration, R::Scores, R::ReferencePoints]),
        K::Segments => passive(kind, &[R::Configuration, R::Scores, R::ReferencePoints]),
        K::Directions | K::Vectors | K::ViewConfiguration | K::ViewCustom | K::PrintConfiguration => {
            passive(kind, &[R::Configuration])
        }
        K::Distances | K::ViewDistances | K::RanksDistances => {
            passive(kind, &[R::Configuration, R::Distances])
        }
        K::Joint => passive(kind, &[R::Configuration, R::Scores]),
        K::Shepard => passive(kind, &[R::Configuration, R::Distances, R::Similarities]),
        K::RanksDifferences => passive(kind, &[R::Distances, R::Similarities]),
        K::RanksSimilarities | K::Scree | K::PrintSimilarities | K::ViewSimilarities => {
            passive(kind, &[R::Similarities])
        }
        K::PrintCorrelations | K::ViewCorrelations => passive(kind, &[R::Correlations]),
        K::PrintEvaluations | K::ViewEvaluations => passive(kind, &[R::Evaluations]),
        K::PrintGroupedData | K::ViewGroupedData => passive(kind, &[R::GroupedData]),
        K::PrintIndividuals | K::ViewIndividuals => passive(kind, &[R::Individuals]),
        K::PrintSampleDesign | K::ViewSampleDesign => passive(kind, &[R::SampleDesign]),
        K::PrintSampleRepetitions | K::ViewSampleRepetitions => {
            passive(kind, &[R::SampleRepetitions])
        }
        K::PrintSampleSolutions | K::ViewSampleSolutions => passive(kind, &[R::SampleSolutions]),
        K::PrintScores | K::ViewScores => passive(kind, &[R::Scores]),
        K::PrintTarget | K::ViewTarget => passive(kind, &[R::Target]),
        K::ViewPointUncertainty => passive_with(kind, POINT_UNCERTAINTY, &[R::SampleSolutions]),
        K::ViewSpatialUncertainty => {
            passive_with(kind, SPATIAL_UNCERTAINTY, &[R::SampleSolutions])
        }
        K::SaveConfiguration => passive(kind, &[R::Configuration]),
        K::SaveCorrelations => passive(kind, &[R::Correlations]),
        K::SaveGroupedData => passive(kind, &[R::GroupedData]),
        K::SaveIndividuals => passive(kind, &[R::Individuals]),
        K::SaveSampleDesign => passive(kind, &[R::SampleDesign]),
        K::SaveSampleRepetitions => passive(kind, &[R::SampleRepetitions]),
        K::SaveSampleSolutions => passive(kind, &[R::SampleSolutions]),
        K::SaveScores => passive(kind, &[R::Scores]),
        K::SaveSimilarities => passive(kind, &[R::Similarities]),
        K::SaveTarget => passive(kind, &[R::Target]),

        K::OpenScript | K::SaveScript => script(kind, FILE),
        K::ViewScript => script(kind, NONE),

        K::Undo | K::Redo => history(kind),

        K::Create => interactive(kind, &[E::Configuration], CREATE, &[]),
        K::NewGroupedData => {
            interactive(kind, &[E::GroupedData], NEW_GROUPED_DATA, &[R::Configuration])
        }

        K::Cluster => conditional(kind, CLUSTER, &[]),
        K::Deactivate => conditional(kind, DEACTIVATE, &[]),

        K::Configuration => active(kind, &[E::Configuration], FILE, &[]),
        K::Correlations => active(kind, &[E::Correlations], FILE, &[]),
        K::Evaluations => active(kind, &[E::Correlations, E::Evaluations], FILE, &[]),
        K::GroupedData => active(kind, &[E::GroupedData], FILE, &[]),
        K::Individuals => active(kind, &[E::Individuals], FILE, &[]),
        K::OpenScores => active(kind, &[E::Scores], FILE, &[]),
        K::Similarities => active(kind, &[E::Similarities], SIMILARITIES, &[]),
        K::Target => active(kind, &[E::Target], FILE, &[]),
        K::OpenSampleDesign | K::OpenSampleSolutions => active(kind, &[E::Uncertainty], FILE, &[]),
        K::OpenSampleRepetitions => {
            active(kind, &[E::Uncertainty], FILE, &[R::SampleDesign])
        }

        K::Center | K::Varimax => active(kind, TRANSFORMED, NONE, &[R::Configuration]),
        K::Invert => active(kind, TRANSFORMED, DIMENSIONS, &[R::Configuration]),
        K::Move => active(kind, TRANSFORMED, MOVE, &[R::Configuration]),
        K::Rescale => active(kind, TRANSFORMED, FACTORS, &[R::Configuration]),
        K::Rotate => active(kind, TRANSFORMED, DEGREES, &[R::Configuration]),
        K::Compare => active(
            kind,
            &[E::Configuration, E::Rivalry, E::Scores, E::Target],
            NONE,
            &[R::Configuration, R::Target],
        ),
        K::FactorAnalysis => active(kind, FACTORED, N_FACTORS, &[R::Evaluations]),
        K::FactorAnalysisMachineLearning => {
            active(kind, FACTORED, N_COMPONENTS, &[R::Evaluations])
        }
        K::PrincipalComponents => {
            active(kind, &[E::Configuration], N_COMPONENTS, &[R::Evaluations])
        }
        K::Mds => active(kind, &[E::Configuration, E::Rivalry], MDS, &[R::Similarities]),
        K::LineOfSight => active(kind, &[E::Similarities], NONE, &[R::Evaluations]),
        K::ReferencePoints => active(kind, &[E::Rivalry], CONTEST, &[R::Configuration]),
        K::ScoreIndividuals => active(
            kind,
            &[E::Rivalry, E::Scores],
            NONE,
            &[R::Configuration, R::Evaluations],
        ),
        K::SampleDesigner => active(kind, &[E::Uncertainty], SAMPLE_DESIGNER, &[R::Evaluations]),
        K::SampleRepetitions => active(
            kind,
            &[E::Uncertainty],
            NONE,
            &[R::Evaluations, R::SampleDesign],
        ),
        K::Uncertainty => active(
            kind,
            &[E::Uncertainty],
            NONE,
            &[R::Target, R::SampleDesign, R::SampleRepetitions],
        ),

        K::SettingsDisplaySizing => active(kind, &[E::Settings], DISPLAY_SIZING, &[]),
        K::SettingsLayoutOptions => active(kind, &[E::Settings], LAYOUT_OPTIONS, &[]),
        K::SettingsPlane => active(kind, &[E::Settings], PLANE, &[R::Configuration]),
        K::SettingsPlotSettings => active(kind, &[E::Settings], PLOT_SETTINGS, &[]),
        K::SettingsPresentationLayer => active(kind, &[E::Settings], LAYER, &[]),
        K::SettingsSegmentSizing => active(kind, &[E::Settings], SEGMENT_SIZING, &[]),
        K::SettingsVectorSizing => active(kind, &[E::Settings], VECTOR_SIZING, &[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_lexical_order() {
        let names: Vec<&str> = CommandKind::ALL.iter().map(|k| k.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(CommandKind::COUNT, 108);
    }

    #[test]
    fn descriptor_kind_and_name_agree() {
        for kind in CommandKind::ALL {
            let descriptor = describe(*kind);
            assert_eq!(descriptor.kind, *kind);
            assert_eq!(descriptor.name, kind.name());
        }
    }

    #[test]
    fn classification_counts() {
        let count = |c: Classification| {
            CommandKind::ALL
                .iter()
                .filter(|k| describe(**k).classification == c)
                .count()
        };
        assert_eq!(count(Classification::ScriptMeta), 3);
        assert_eq!(count(Classification::InteractiveOnly), 2);
        assert_eq!(
            count(Classification::Active) + count(Classification::Passive),
            CommandKind::COUNT - 5
        );
    }

    #[test]
    fn cluster_touches_scores_and_source() {
        let params = Params::new()
            .with("data_source", "distances")
            .with("n_clusters", 3_i64);
        let touched = describe(CommandKind::Cluster).resolve_touches(&params).unwrap();
        assert_eq!(touched, vec![E::Configuration, E::Scores]);
    }

    #[test]
    fn deactivate_touches_listed_entities() {
        let params = Params::new().with("items", &["Target", "grouped data", "target"][..]);
        let touched = describe(CommandKind::Deactivate).resolve_touches(&params).unwrap();
        assert_eq!(touched, vec![E::GroupedData, E::Target]);

        let bad = Params::new().with("items", &["nonsense"][..]);
        assert!(describe(CommandKind::Deactivate).resolve_touches(&bad).is_err());
    }

    #[test]
    fn loaders_touch_what_they_load() {
        for kind in CommandKind::ALL {
            if let Some(entity) = kind.loads() {
                assert!(describe(*kind).touches.fixed().contains(&entity), "{kind}");
            }
        }
    }
}
