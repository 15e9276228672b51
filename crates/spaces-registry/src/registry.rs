//! Command registry
//!
//! Provides [`Registry`], the read-only index of every command descriptor.
//! Built once on first use and never mutated afterwards.

use crate::command::{describe, CommandKind, Descriptor};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::build);

/// Index of command descriptors by kind and by name
#[derive(Debug)]
pub struct Registry {
    /// Indexed by `CommandKind as usize`
    descriptors: Vec<Descriptor>,
    by_name: HashMap<&'static str, CommandKind>,
    /// Names sorted longest first, for prefix matching
    by_length: Vec<&'static str>,
}

impl Registry {
    /// The process-wide registry
    #[inline]
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    fn build() -> Self {
        let descriptors: Vec<Descriptor> = CommandKind::ALL.iter().map(|k| describe(*k)).collect();
        let by_name = descriptors.iter().map(|d| (d.name, d.kind)).collect();
        let mut by_length: Vec<&'static str> = descriptors.iter().map(|d| d.name).collect();
        by_length.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self {
            descriptors,
            by_name,
            by_length,
        }
    }

    /// Descriptor of a command
    #[inline]
    #[must_use]
    pub fn descriptor(&self, kind: CommandKind) -> &Descriptor {
        // ALL is declared in discriminant order
        &self.descriptors[kind as usize]
    }

    /// Look up a command by its exact name
    #[inline]
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<CommandKind> {
        self.by_name.get(name).copied()
    }

    /// Check if a command name exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Every descriptor, in lexical order of name
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    /// Every command name, in lexical order
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.name).collect()
    }

    /// Get number of registered commands
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Longest command name that prefixes `line` at a word boundary
    ///
    /// Returns the command and the remainder of the line after the name.
    ///
    /// # Example
    /// ```
    /// use spaces_registry::{CommandKind, Registry};
    ///
    /// let (kind, rest) = Registry::global()
    ///     .longest_prefix("Factor analysis machine learning n_components=2")
    ///     .unwrap();
    /// assert_eq!(kind, CommandKind::FactorAnalysisMachineLearning);
    /// assert_eq!(rest.trim(), "n_components=2");
    /// ```
    #[must_use]
    pub fn longest_prefix<'a>(&self, line: &'a str) -> Option<(CommandKind, &'a str)> {
        self.by_length.iter().find_map(|name| {
            let rest = line.strip_prefix(name)?;
            let at_boundary = rest.chars().next().map_or(true, char::is_whitespace);
            if at_boundary {
                self.lookup(name).map(|kind| (kind, rest))
            } else {
                None
            }
        })
    }
}
