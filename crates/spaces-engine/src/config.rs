//! Engine configuration
//!
//! [`EngineConfig`] is plain data: build it with the `with_*` methods or load
//! it from TOML. Every field has a default so partial files are accepted.
//!
//! ```toml
//! max_undo_depth = 50
//! conflict_policy = "abandon_existing"
//! script_validation = "line_by_line"
//! data_dir = "data"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for this configuration
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What to do when newly read data conflicts with existing data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Restore the snapshot and report the conflict
    Rollback,
    /// Clear the conflicting existing data and keep the new data
    AbandonExisting,
    /// Ask the user when interactive; roll back otherwise
    #[default]
    Ask,
}

/// How [`ConflictPolicy::Ask`] treats snapshots where only some captured
/// entities were empty before the command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixedEmptyPolicy {
    /// Ask, since there is existing data worth keeping
    #[default]
    Ask,
    /// Roll back without asking
    Rollback,
}

/// When scripts are parsed relative to execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptValidation {
    /// Resolve every command name before running anything; parse each
    /// line's parameters just before running it
    #[default]
    CommandNames,
    /// Parse and check the whole script before running any command
    WholeScript,
    /// Parse each line just before running it
    LineByLine,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum undo entries kept; 0 keeps everything
    pub max_undo_depth: usize,
    pub conflict_policy: ConflictPolicy,
    pub mixed_empty_policy: MixedEmptyPolicy,
    pub script_validation: ScriptValidation,
    /// Maximum nesting of `Open script` inside scripts
    pub max_script_depth: usize,
    /// Base directory for relative file parameters
    pub data_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With undo depth limit
    #[inline]
    #[must_use]
    pub fn with_max_undo_depth(mut self, depth: usize) -> Self {
        self.max_undo_depth = depth;
        self
    }

    /// With conflict policy
    #[inline]
    #[must_use]
    pub fn with_conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.conflict_policy = policy;
        self
    }

    /// With mixed-empty policy
    #[inline]
    #[must_use]
    pub fn with_mixed_empty_policy(mut self, policy: MixedEmptyPolicy) -> Self {
        self.mixed_empty_policy = policy;
        self
    }

    /// With script validation mode
    #[inline]
    #[must_use]
    pub fn with_script_validation(mut self, validation: ScriptValidation) -> Self {
        self.script_validation = validation;
        self
    }

    /// With script nesting limit
    #[inline]
    #[must_use]
    pub fn with_max_script_depth(mut self, depth: usize) -> Self {
        self.max_script_depth = depth;
        self
    }

    /// With data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for invalid TOML or unknown values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Resolve a file parameter against the data directory
    #[must_use]
    pub fn resolve_path(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        match &self.data_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_undo_depth: 100,
            conflict_policy: ConflictPolicy::Ask,
            mixed_empty_policy: MixedEmptyPolicy::Ask,
            script_validation: ScriptValidation::CommandNames,
            max_script_depth: 4,
            data_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            "max_undo_depth = 5\nconflict_policy = \"abandon_existing\"\n",
        )
        .unwrap();
        assert_eq!(
            config,
            EngineConfig::new()
                .with_max_undo_depth(5)
                .with_conflict_policy(ConflictPolicy::AbandonExisting)
        );
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(EngineConfig::from_toml_str("conflict_policy = \"shrug\"").is_err());
    }

    #[test]
    fn relative_paths_resolve_against_data_dir() {
        let config = EngineConfig::new().with_data_dir("/data");
        assert_eq!(config.resolve_path("a.txt"), PathBuf::from("/data/a.txt"));
        assert_eq!(config.resolve_path("/abs/b.txt"), PathBuf::from("/abs/b.txt"));
        assert_eq!(EngineConfig::new().resolve_path("a.txt"), PathBuf::from("a.txt"));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spaces.toml");
        std::fs::write(&path, "script_validation = \"line_by_line\"\n").unwrap();
        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.script_validation, ScriptValidation::LineByLine);
        assert!(EngineConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
