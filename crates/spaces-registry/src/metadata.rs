//! Metadata consumed by the presentation layer
//!
//! Menus and help text refer to commands by name. Both tables must stay in
//! step with the registry: every name they mention is registered and every
//! registered command appears in exactly one menu and has an explanation.

/// Menu titles and the commands they offer, in display order
pub const MENUS: &[(&str, &[&str])] = &[
    (
        "File",
        &[
            "Configuration",
            "Target",
            "Grouped data",
            "Similarities",
            "Correlations",
            "Evaluations",
            "Individuals",
            "Open scores",
            "Open sample design",
            "Open sample repetitions",
            "Open sample solutions",
            "Open script",
            "Create",
            "New grouped data",
            "Save configuration",
            "Save target",
            "Save grouped data",
            "Save similarities",
            "Save correlations",
            "Save individuals",
            "Save scores",
            "Save sample design",
            "Save sample repetitions",
            "Save sample solutions",
            "Save script",
            "Print configuration",
            "Print target",
            "Print grouped data",
            "Print similarities",
            "Print correlations",
            "Print evaluations",
            "Print individuals",
            "Print scores",
            "Print sample design",
            "Print sample repetitions",
            "Print sample solutions",
            "Deactivate",
            "Exit",
        ],
    ),
    (
        "Edit",
        &[
            "Undo",
            "Redo",
            "Settings - plane",
            "Settings - presentation layer",
            "Settings - display sizing",
            "Settings - layout options",
            "Settings - plot settings",
            "Settings - segment sizing",
            "Settings - vector sizing",
        ],
    ),
    (
        "View",
        &[
            "View configuration",
            "View target",
            "View grouped data",
            "View similarities",
            "View correlations",
            "View distances",
            "View evaluations",
            "View individuals",
            "View scores",
            "View sample design",
            "View sample repetitions",
            "View sample solutions",
            "View point uncertainty",
            "View spatial uncertainty",
            "View custom",
            "View script",
            "History",
        ],
    ),
    (
        "Transform",
        &["Center", "Move", "Invert", "Rescale", "Rotate", "Varimax", "Compare"],
    ),
    (
        "Associations",
        &[
            "Alike",
            "Distances",
            "Line of sight",
            "Paired",
            "Ranks differences",
            "Ranks distances",
            "Ranks similarities",
            "Scree",
            "Shepard",
            "Stress contribution",
        ],
    ),
    (
        "Model",
        &[
            "Cluster",
            "Directions",
            "Factor analysis",
            "Factor analysis machine learning",
            "MDS",
            "Principal components",
            "Vectors",
            "Sample designer",
            "Sample repetitions",
            "Uncertainty",
        ],
    ),
    (
        "Respondents",
        &[
            "Reference points",
            "Score individuals",
            "Joint",
            "Contest",
            "Segments",
            "Base",
            "Core supporters",
            "Likely supporters",
            "Battleground",
            "Convertible",
            "First dimension",
            "Second dimension",
        ],
    ),
    ("Help", &["About", "Help", "Status", "Terse", "Verbose"]),
];

/// Explanatory help text per command
pub const EXPLANATIONS: &[(&str, &str)] = &[
    ("About", "Shows the version and authorship of the application."),
    ("Alike", "Draws lines between pairs of points whose similarity passes a cutoff."),
    ("Base", "Shows the respondents who firmly support one of the reference points."),
    ("Battleground", "Shows the respondents close to the bisector who could go either way."),
    ("Center", "Moves the configuration so every dimension has a mean of zero."),
    ("Cluster", "Groups points or respondents into clusters from a chosen data source."),
    ("Compare", "Fits the active configuration to the target and reports the disparity."),
    ("Configuration", "Reads a configuration file and makes it the active configuration."),
    ("Contest", "Shows how respondents divide between the two reference points."),
    ("Convertible", "Shows respondents who lean toward one reference point but are reachable by the other."),
    ("Core supporters", "Shows respondents within the core radius around each reference point."),
    ("Correlations", "Reads a lower triangular matrix of correlations between items."),
    ("Create", "Builds a configuration by entering names and coordinates."),
    ("Deactivate", "Clears the selected entities from the workspace."),
    ("Directions", "Draws a vector from the origin to every point."),
    ("Distances", "Lists the inter-point distances of the active configuration."),
    ("Evaluations", "Reads evaluations of items and derives their correlations."),
    ("Exit", "Leaves the application."),
    ("Factor analysis", "Extracts factors from the evaluations and places items and respondents in that space."),
    ("Factor analysis machine learning", "Extracts factors from the evaluations with a machine learning estimator."),
    ("First dimension", "Shows respondents separated along the first dimension."),
    ("Grouped data", "Reads centroids of groups defined by a grouping variable."),
    ("Help", "Describes how to use the application."),
    ("History", "Lists the commands issued during this session."),
    ("Individuals", "Reads variables describing each individual."),
    ("Invert", "Reverses the direction of the selected dimensions."),
    ("Joint", "Plots points and respondent scores together."),
    ("Likely supporters", "Shows respondents closer to one reference point than the other."),
    ("Line of sight", "Derives similarities from the evaluations by the line of sight measure."),
    ("MDS", "Finds a configuration whose distances reproduce the similarities."),
    ("Move", "Shifts every point along one dimension."),
    ("New grouped data", "Builds grouped data by entering group names and coordinates."),
    ("Open sample design", "Reads a sample design for the uncertainty analysis."),
    ("Open sample repetitions", "Reads evaluations drawn for each repetition of the sample design."),
    ("Open sample solutions", "Reads the solutions of each sample repetition."),
    ("Open scores", "Reads respondent scores."),
    ("Open script", "Reads a script file and executes its commands."),
    ("Paired", "Shows how one focal point relates to every other point."),
    ("Principal components", "Places items in the space of the leading principal components of the evaluations."),
    ("Print configuration", "Prints the active configuration."),
    ("Print correlations", "Prints the correlations."),
    ("Print evaluations", "Prints the evaluations."),
    ("Print grouped data", "Prints the grouped data."),
    ("Print individuals", "Prints the individual data."),
    ("Print sample design", "Prints the sample design."),
    ("Print sample repetitions", "Prints the sample repetitions."),
    ("Print sample solutions", "Prints the sample solutions."),
    ("Print scores", "Prints the respondent scores."),
    ("Print similarities", "Prints the similarities."),
    ("Print target", "Prints the target."),
    ("Ranks differences", "Compares the ranks of distances with the ranks of similarities."),
    ("Ranks distances", "Lists the ranks of the inter-point distances."),
    ("Ranks similarities", "Lists the ranks of the similarities."),
    ("Redo", "Re-applies the most recently undone command."),
    ("Reference points", "Selects two points as rivals and derives the connector and bisector."),
    ("Rescale", "Multiplies every point's coordinate on each dimension by a factor."),
    ("Rotate", "Rotates the configuration in the current plane."),
    ("Sample designer", "Designs repeated samples of evaluators for the uncertainty analysis."),
    ("Sample repetitions", "Draws the evaluations for each repetition of the sample design."),
    ("Save configuration", "Writes the active configuration to a file."),
    ("Save correlations", "Writes the correlations to a file."),
    ("Save grouped data", "Writes the grouped data to a file."),
    ("Save individuals", "Writes the individual data to a file."),
    ("Save sample design", "Writes the sample design to a file."),
    ("Save sample repetitions", "Writes the sample repetitions to a file."),
    ("Save sample solutions", "Writes the sample solutions to a file."),
    ("Save scores", "Writes the respondent scores to a file."),
    ("Save script", "Writes the commands of this session as a script."),
    ("Save similarities", "Writes the similarities to a file."),
    ("Save target", "Writes the target to a file."),
    ("Score individuals", "Computes a score for every respondent on each dimension."),
    ("Scree", "Plots stress against the number of dimensions."),
    ("Second dimension", "Shows respondents separated along the second dimension."),
    ("Segments", "Lists the share of respondents in every segment."),
    ("Settings - display sizing", "Sets axis margin, label displacement and point size."),
    ("Settings - layout options", "Sets columns, column width and decimals of printed tables."),
    ("Settings - plane", "Selects the horizontal and vertical dimensions to display."),
    ("Settings - plot settings", "Turns the bisector, connector and reference point markers on or off."),
    ("Settings - presentation layer", "Selects the plotting library."),
    ("Settings - segment sizing", "Sets the battleground width and core tolerance in percent."),
    ("Settings - vector sizing", "Sets vector width and head width."),
    ("Shepard", "Plots distances against similarities."),
    ("Similarities", "Reads a lower triangular matrix of similarities or dissimilarities."),
    ("Status", "Summarises what the workspace holds."),
    ("Stress contribution", "Shows how much each point contributes to stress."),
    ("Target", "Reads a configuration to be used as the target."),
    ("Terse", "Reduces the amount of output."),
    ("Uncertainty", "Estimates the positional uncertainty of every point from the sample solutions."),
    ("Undo", "Reverts the most recent command that changed the workspace."),
    ("Varimax", "Rotates the configuration to maximise the variance of squared loadings."),
    ("Vectors", "Draws the points as vectors from the origin."),
    ("Verbose", "Increases the amount of output."),
    ("View configuration", "Plots the active configuration."),
    ("View correlations", "Shows the correlations as a heatmap."),
    ("View custom", "Plots the configuration with the current plot settings."),
    ("View distances", "Shows the inter-point distances as a heatmap."),
    ("View evaluations", "Shows the distribution of the evaluations."),
    ("View grouped data", "Plots the group centroids."),
    ("View individuals", "Shows the individual data."),
    ("View point uncertainty", "Plots the solutions of selected points across repetitions."),
    ("View sample design", "Shows the sample design."),
    ("View sample repetitions", "Shows the sample repetitions."),
    ("View sample solutions", "Shows the solutions of every repetition."),
    ("View scores", "Plots the respondent scores."),
    ("View script", "Shows the commands of this session as a script."),
    ("View similarities", "Shows the similarities as a heatmap."),
    ("View spatial uncertainty", "Plots the uncertainty of every point."),
    ("View target", "Plots the target."),
];

/// Explanatory text for a command name
#[must_use]
pub fn explanation(name: &str) -> Option<&'static str> {
    EXPLANATIONS
        .iter()
        .find(|(command, _)| *command == name)
        .map(|(_, text)| *text)
}

/// Menu offering a command name
#[must_use]
pub fn menu_of(name: &str) -> Option<&'static str> {
    MENUS
        .iter()
        .find(|(_, commands)| commands.contains(&name))
        .map(|(menu, _)| *menu)
}
