//! Text output of passive commands

use spaces_registry::metadata::MENUS;
use spaces_registry::CommandKind;
use spaces_workspace::{LowerTriangle, PointSet, Table, Workspace};

/// Render a table with named rows and columns
#[must_use]
pub fn render_table(table: &Table, decimals: usize) -> String {
    let width = decimals + 8;
    let mut out = String::new();
    out.push_str(&format!("{:<12}", ""));
    for column in table.column_names() {
        out.push_str(&format!("{column:>width$}"));
    }
    out.push('\n');
    for (name, row) in table.row_names().iter().zip(table.rows()) {
        out.push_str(&format!("{name:<12}"));
        for value in row {
            out.push_str(&format!("{value:>width$.decimals$}"));
        }
        out.push('\n');
    }
    out
}

/// Render a lower triangular matrix
#[must_use]
pub fn render_triangle(matrix: &LowerTriangle, decimals: usize) -> String {
    let width = decimals + 8;
    let mut out = String::new();
    for (row, label) in matrix.item_labels().iter().enumerate() {
        out.push_str(&format!("{label:<8}"));
        for col in 0..row {
            let value = matrix.value(row, col).unwrap_or_default();
            out.push_str(&format!("{value:>width$.decimals$}"));
        }
        out.push('\n');
    }
    out
}

fn render_points(title: &str, points: &PointSet, decimals: usize) -> String {
    format!(
        "{title}: {} points on {} dimensions\n{}",
        points.npoint(),
        points.ndim(),
        render_table(&points.coords, decimals)
    )
}

/// Message for a passive command, when it produces text
#[must_use]
pub(super) fn describe(kind: CommandKind, workspace: &Workspace) -> Option<String> {
    let decimals = usize::try_from(workspace.settings().decimals).unwrap_or(2);
    let uncertainty = workspace.uncertainty();
    let text = match kind {
        CommandKind::About => format!("Spaces command engine {}", crate::VERSION),
        CommandKind::Help => MENUS
            .iter()
            .map(|(menu, names)| format!("{menu}: {}", names.join(", ")))
            .collect::<Vec<_>>()
            .join("\n"),
        CommandKind::PrintConfiguration => {
            render_points("Configuration", &workspace.configuration().points, decimals)
        }
        CommandKind::PrintTarget => render_points("Target", &workspace.target().points, decimals),
        CommandKind::PrintGroupedData => {
            let grouped = workspace.grouped_data();
            format!(
                "Grouped by {}\n{}",
                grouped.grouping_var,
                render_table(&grouped.coords, decimals)
            )
        }
        CommandKind::PrintScores => render_table(&workspace.scores().scores, decimals),
        CommandKind::PrintEvaluations => {
            render_table(&workspace.evaluations().evaluations, decimals)
        }
        CommandKind::PrintIndividuals => render_table(&workspace.individuals().ind_vars, decimals),
        CommandKind::PrintCorrelations => {
            render_triangle(&workspace.correlations().matrix, decimals)
        }
        CommandKind::PrintSimilarities => {
            let active = &workspace.similarities().active;
            format!(
                "Similarities ({})\n{}",
                active.value_type,
                render_triangle(&active.matrix, decimals)
            )
        }
        CommandKind::PrintSampleDesign => render_table(&uncertainty.sample_design, decimals),
        CommandKind::PrintSampleRepetitions => {
            render_table(&uncertainty.sample_repetitions, decimals)
        }
        CommandKind::PrintSampleSolutions => render_table(&uncertainty.sample_solutions, decimals),
        CommandKind::Distances => render_table(&workspace.configuration().distances, decimals),
        _ => return None,
    };
    Some(text)
}
