//! Readers for the external data files
//!
//! Supported formats:
//! - configuration files (used for configurations and targets)
//! - lower triangular files (similarities and correlations)
//! - grouped data files
//! - CSV tables with a header row (evaluations, individuals, scores and the
//!   sampling tables)
//!
//! Text formats are parsed from strings by the `parse_*` functions so they can
//! be tested without touching the filesystem; the `read_*` functions add
//! file access and attach the path to every error.

use crate::geometry::{GroupedData, PointSet, Scores};
use crate::matrices::{Evaluations, Individuals};
use crate::table::{LowerTriangle, Table, TableError};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of characters of an item name used as its label
pub const ITEM_LABEL_LENGTH: usize = 4;

/// Errors raised while reading external data
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// File could not be opened or read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content does not follow its format
    #[error("{path}, line {line}: {message}")]
    Format {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// CSV content could not be parsed
    #[error("{path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File holds no data
    #[error("{path} is empty")]
    Empty { path: PathBuf },
}

impl ReadError {
    fn format(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    fn shape(path: &Path, line: usize, error: &TableError) -> Self {
        Self::format(path, line, error.to_string())
    }
}

fn read_text(path: &Path) -> Result<String, ReadError> {
    let text = fs::read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if text.trim().is_empty() {
        return Err(ReadError::Empty {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(path = %path.display(), bytes = text.len(), "read data file");
    Ok(text)
}

/// Line cursor that tracks 1-based line numbers and skips blank lines
struct Lines<'a> {
    path: &'a Path,
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> Lines<'a> {
    fn new(path: &'a Path, text: &'a str) -> Self {
        Self {
            path,
            inner: text.lines().enumerate(),
            line: 0,
        }
    }

    fn next_line(&mut self, what: &str) -> Result<&'a str, ReadError> {
        for (index, line) in self.inner.by_ref() {
            self.line = index + 1;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed);
            }
        }
        Err(ReadError::format(
            self.path,
            self.line + 1,
            format!("unexpected end of file, expected {what}"),
        ))
    }

    fn expect_header(&mut self, header: &str) -> Result<(), ReadError> {
        let line = self.next_line("header")?;
        if line.eq_ignore_ascii_case(header) {
            Ok(())
        } else {
            Err(self.error(format!("expected header '{header}', found '{line}'")))
        }
    }

    fn counts<const N: usize>(&mut self, what: &str) -> Result<[usize; N], ReadError> {
        let line = self.next_line(what)?;
        let values: Vec<usize> = line
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| self.error(format!("expected {what}, found '{line}'")))?;
        values
            .try_into()
            .map_err(|_| self.error(format!("expected {N} counts ({what}), found '{line}'")))
    }

    fn labeled<const N: usize>(&mut self, what: &str) -> Result<[String; N], ReadError> {
        let line = self.next_line(what)?;
        let fields: Vec<String> = line.split(';').map(|f| f.trim().to_string()).collect();
        fields
            .try_into()
            .map_err(|_| self.error(format!("expected {N} ';' separated fields for {what}, found '{line}'")))
    }

    fn floats(&mut self, expected: usize, what: &str) -> Result<Vec<f64>, ReadError> {
        let line = self.next_line(what)?;
        let values: Vec<f64> = line
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| self.error(format!("non-numeric value in '{line}'")))?;
        if values.len() == expected {
            Ok(values)
        } else {
            Err(self.error(format!("expected {expected} values, found {}", values.len())))
        }
    }

    fn expect_end(&mut self) -> Result<(), ReadError> {
        match self.inner.by_ref().find(|(_, line)| !line.trim().is_empty()) {
            None => Ok(()),
            Some((index, _)) => Err(ReadError::format(
                self.path,
                index + 1,
                "unexpected content after the last expected line",
            )),
        }
    }

    fn error(&self, message: String) -> ReadError {
        ReadError::format(self.path, self.line, message)
    }
}

fn unzip_labeled(pairs: Vec<[String; 2]>) -> (Vec<String>, Vec<String>) {
    pairs.into_iter().map(|[label, name]| (label, name)).unzip()
}

/// Parse a configuration file
///
/// ```text
/// Configuration
/// 2 3
/// LR;Left-Right
/// UD;Up-Down
/// A;Alpha
/// ...
/// 0.5 -0.2
/// ...
/// ```
///
/// # Errors
/// Returns [`ReadError::Format`] with the offending line.
pub fn parse_point_set(text: &str, path: &Path) -> Result<PointSet, ReadError> {
    let mut lines = Lines::new(path, text);
    lines.expect_header("Configuration")?;
    let [ndim, npoint] = lines.counts::<2>("number of dimensions and points")?;
    if ndim == 0 || npoint == 0 {
        return Err(lines.error("a configuration needs at least one dimension and one point".into()));
    }
    let dims = (0..ndim)
        .map(|_| lines.labeled::<2>("dimension label;name"))
        .collect::<Result<Vec<_>, _>>()?;
    let points = (0..npoint)
        .map(|_| lines.labeled::<2>("point label;name"))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = (0..npoint)
        .map(|_| lines.floats(ndim, "point coordinates"))
        .collect::<Result<Vec<_>, _>>()?;
    lines.expect_end()?;

    let (dim_labels, dim_names) = unzip_labeled(dims);
    let (point_labels, point_names) = unzip_labeled(points);
    PointSet::new(dim_names, dim_labels, point_names, point_labels, rows)
        .map_err(|e| ReadError::shape(path, lines.line, &e))
}

/// Read a configuration file (configurations and targets)
///
/// # Errors
/// See [`parse_point_set`].
pub fn read_point_set(path: &Path) -> Result<PointSet, ReadError> {
    parse_point_set(&read_text(path)?, path)
}

/// Parse a lower triangular file
///
/// ```text
/// Lower triangular
/// 3
/// A;Alpha
/// B;Beta
/// G;Gamma
/// 1.0
/// 2.0 3.0
/// ```
///
/// # Errors
/// Returns [`ReadError::Format`] with the offending line.
pub fn parse_lower_triangle(text: &str, path: &Path) -> Result<LowerTriangle, ReadError> {
    let mut lines = Lines::new(path, text);
    lines.expect_header("Lower triangular")?;
    let [nitems] = lines.counts::<1>("number of items")?;
    if nitems == 0 {
        return Err(lines.error("a lower triangular matrix needs at least one item".into()));
    }
    let items = (0..nitems)
        .map(|_| lines.labeled::<2>("item label;name"))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = (1..nitems)
        .map(|row| lines.floats(row, "lower triangle row"))
        .collect::<Result<Vec<_>, _>>()?;
    lines.expect_end()?;

    let (item_labels, item_names) = unzip_labeled(items);
    LowerTriangle::new(item_names, item_labels, rows).map_err(|e| ReadError::shape(path, lines.line, &e))
}

/// Read a lower triangular file (similarities and correlations)
///
/// # Errors
/// See [`parse_lower_triangle`].
pub fn read_lower_triangle(path: &Path) -> Result<LowerTriangle, ReadError> {
    parse_lower_triangle(&read_text(path)?, path)
}

/// Parse a grouped data file
///
/// ```text
/// Grouped
/// Party
/// 2 2
/// LR;Left-Right
/// UD;Up-Down
/// D;1;Democrats
/// R;2;Republicans
/// -0.4 0.1
/// 0.5 0.2
/// ```
///
/// # Errors
/// Returns [`ReadError::Format`] with the offending line.
pub fn parse_grouped_data(text: &str, path: &Path) -> Result<GroupedData, ReadError> {
    let mut lines = Lines::new(path, text);
    lines.expect_header("Grouped")?;
    let grouping_var = lines.next_line("grouping variable")?.to_string();
    let [ndim, ngroups] = lines.counts::<2>("number of dimensions and groups")?;
    let dims = (0..ndim)
        .map(|_| lines.labeled::<2>("dimension label;name"))
        .collect::<Result<Vec<_>, _>>()?;
    let groups = (0..ngroups)
        .map(|_| lines.labeled::<3>("group label;code;name"))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = (0..ngroups)
        .map(|_| lines.floats(ndim, "group coordinates"))
        .collect::<Result<Vec<_>, _>>()?;
    lines.expect_end()?;

    let (dim_labels, dim_names) = unzip_labeled(dims);
    let mut group_labels = Vec::with_capacity(ngroups);
    let mut group_codes = Vec::with_capacity(ngroups);
    let mut group_names = Vec::with_capacity(ngroups);
    for [label, code, name] in groups {
        let code = code
            .parse()
            .map_err(|_| lines.error(format!("group code '{code}' is not an integer")))?;
        group_labels.push(label);
        group_codes.push(code);
        group_names.push(name);
    }
    let coords = Table::new(group_labels.clone(), dim_labels.clone(), rows)
        .map_err(|e| ReadError::shape(path, lines.line, &e))?;
    Ok(GroupedData {
        grouping_var,
        group_names,
        group_labels,
        group_codes,
        dim_names,
        dim_labels,
        coords,
    })
}

/// Read a grouped data file
///
/// # Errors
/// See [`parse_grouped_data`].
pub fn read_grouped_data(path: &Path) -> Result<GroupedData, ReadError> {
    parse_grouped_data(&read_text(path)?, path)
}

/// Parse a numeric CSV table with a header row
///
/// Rows are named by their 1-based position.
///
/// # Errors
/// Returns [`ReadError::Csv`] for malformed CSV and [`ReadError::Format`] for
/// non-numeric cells.
pub fn parse_csv_table(reader: impl std::io::Read, path: &Path) -> Result<Table, ReadError> {
    let csv_error = |source| ReadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let row = record
            .iter()
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| {
                    // header is line 1
                    ReadError::format(path, index + 2, format!("'{cell}' is not a number"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(ReadError::Empty {
            path: path.to_path_buf(),
        });
    }
    let names = (1..=rows.len()).map(|i| i.to_string()).collect();
    Table::new(names, columns, rows).map_err(|e| ReadError::shape(path, 1, &e))
}

/// Read a numeric CSV table
///
/// # Errors
/// See [`parse_csv_table`].
pub fn read_csv_table(path: &Path) -> Result<Table, ReadError> {
    let file = fs::File::open(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv_table(file, path)
}

/// Short label for an item name
#[must_use]
pub fn item_label(name: &str) -> String {
    name.chars().take(ITEM_LABEL_LENGTH).collect()
}

/// Evaluations from a CSV table (items are columns)
///
/// # Errors
/// Returns [`ReadError::Format`] when fewer than two items are present.
pub fn evaluations_from_table(table: Table, path: &Path) -> Result<Evaluations, ReadError> {
    if table.ncols() < 2 {
        return Err(ReadError::format(path, 1, "evaluations need at least two items"));
    }
    let item_names = table.column_names().to_vec();
    let item_labels = item_names.iter().map(|n| item_label(n)).collect();
    Ok(Evaluations {
        item_names,
        item_labels,
        evaluations: table,
    })
}

/// Read evaluations
///
/// # Errors
/// See [`read_csv_table`] and [`evaluations_from_table`].
pub fn read_evaluations(path: &Path) -> Result<Evaluations, ReadError> {
    evaluations_from_table(read_csv_table(path)?, path)
}

/// Read individual-level variables
///
/// # Errors
/// See [`read_csv_table`].
pub fn read_individuals(path: &Path) -> Result<Individuals, ReadError> {
    let ind_vars = read_csv_table(path)?;
    Ok(Individuals {
        var_names: ind_vars.column_names().to_vec(),
        ind_vars,
    })
}

/// Read respondent scores (dimensions are columns)
///
/// # Errors
/// See [`read_csv_table`].
pub fn read_scores(path: &Path) -> Result<Scores, ReadError> {
    let table = read_csv_table(path)?;
    let dim_names = table.column_names().to_vec();
    let dim_labels = dim_names.iter().map(|n| item_label(n)).collect();
    Ok(Scores::from_table(dim_names, dim_labels, table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn path() -> &'static Path {
        Path::new("test.txt")
    }

    const CONFIGURATION: &str = "Configuration\n2 3\nLR;Left-Right\nUD;Up-Down\nA;Alpha\nB;Beta\nG;Gamma\n0.5 -0.2\n1.0 1.0\n-1.5 0.25\n";

    #[test]
    fn parses_configuration() {
        let points = parse_point_set(CONFIGURATION, path()).unwrap();
        assert_eq!(points.dim_names, vec!["Left-Right", "Up-Down"]);
        assert_eq!(points.dim_labels, vec!["LR", "UD"]);
        assert_eq!(points.point_labels, vec!["A", "B", "G"]);
        assert_eq!(points.coordinate(2, 1), Some(0.25));
    }

    #[test]
    fn configuration_with_trailing_content_is_rejected() {
        let text = format!("{CONFIGURATION}9.9 9.9\n");
        let err = parse_point_set(&text, path()).unwrap_err();
        assert!(matches!(err, ReadError::Format { line: 11, .. }), "{err}");
    }

    #[test]
    fn configuration_with_short_row_reports_line() {
        let text = CONFIGURATION.replace("1.0 1.0", "1.0");
        let err = parse_point_set(&text, path()).unwrap_err();
        assert!(matches!(err, ReadError::Format { line: 9, .. }), "{err}");
    }

    #[test]
    fn configuration_needs_header() {
        let err = parse_point_set("Target\n1 1\nA;a\nB;b\n0\n", path()).unwrap_err();
        assert!(err.to_string().contains("expected header"));
    }

    #[test]
    fn parses_lower_triangle() {
        let text = "Lower triangular\n3\nA;Alpha\nB;Beta\nG;Gamma\n1.0\n2.0 3.0\n";
        let triangle = parse_lower_triangle(text, path()).unwrap();
        assert_eq!(triangle.nitems(), 3);
        assert_eq!(triangle.value(2, 1), Some(3.0));
    }

    #[test]
    fn lower_triangle_needs_an_item() {
        let err = parse_lower_triangle("Lower triangular\n0\n", path()).unwrap_err();
        assert!(matches!(err, ReadError::Format { line: 2, .. }));
    }

    #[test]
    fn parses_grouped_data() {
        let text = "Grouped\nParty\n2 2\nLR;Left-Right\nUD;Up-Down\nD;1;Democrats\nR;2;Republicans\n-0.4 0.1\n0.5 0.2\n";
        let grouped = parse_grouped_data(text, path()).unwrap();
        assert_eq!(grouped.grouping_var, "Party");
        assert_eq!(grouped.group_codes, vec![1, 2]);
        assert_eq!(grouped.group_names, vec!["Democrats", "Republicans"]);
        assert_eq!(grouped.coords.get(1, 0), Some(0.5));
    }

    #[test]
    fn parses_csv_tables() {
        let table = parse_csv_table("Apples, Pears\n1,2\n3,4\n".as_bytes(), path()).unwrap();
        assert_eq!(table.column_names(), ["Apples", "Pears"]);
        assert_eq!(table.row_names(), ["1", "2"]);

        let evaluations = evaluations_from_table(table, path()).unwrap();
        assert_eq!(evaluations.item_labels, vec!["Appl", "Pear"]);
    }

    #[test]
    fn csv_with_text_cell_reports_line() {
        let err = parse_csv_table("a,b\n1,2\n3,x\n".as_bytes(), path()).unwrap_err();
        assert!(matches!(err, ReadError::Format { line: 3, .. }), "{err}");
    }

    #[test]
    fn single_item_evaluations_are_rejected() {
        let table = parse_csv_table("a\n1\n".as_bytes(), path()).unwrap();
        assert!(evaluations_from_table(table, path()).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_point_set(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
    }
}
