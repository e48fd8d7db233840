use std::fmt;

use crate::resolver::IdSet;

/// A registered module and its capability sets.
///
/// Modules are immutable once registered. A module with requirements is
/// *complex*; a module providing more than one id is *compound* (a bundle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    source: String,
    provides: IdSet,
    requires: IdSet,
}

impl Module {
    /// Create a new module
    pub fn new<S, P, R>(source: S, provides: P, requires: R) -> Self
    where
        S: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            source: source.into(),
            provides: provides.into_iter().collect(),
            requires: requires.into_iter().collect(),
        }
    }

    /// Returns the unique source identifier
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn provides(&self) -> &IdSet {
        &self.provides
    }

    pub fn requires(&self) -> &IdSet {
        &self.requires
    }

    /// Returns true if the module has at least one requirement
    pub fn is_complex(&self) -> bool {
        !self.requires.is_empty()
    }

    /// Returns true if the module provides more than one id
    pub fn is_compound(&self) -> bool {
        self.provides.len() > 1
    }

    /// Returns true if the module provides `id`
    pub fn supports(&self, id: &str) -> bool {
        self.provides.contains(id)
    }

    /// Returns true if the module requires `id`
    pub fn requires_id(&self, id: &str) -> bool {
        self.requires.contains(id)
    }

    /// Returns true if any requirement is missing from `context`
    pub fn adds_complexity(&self, context: &IdSet) -> bool {
        !self.requires.is_subset(context)
    }

    /// Number of provided ids that appear in `context`
    pub fn match_count(&self, context: &IdSet) -> usize {
        self.provides.overlap(context)
    }

    /// Whether this module's requirements stay satisfied if `candidate`
    /// replaces part of the schedule.
    ///
    /// Each requirement must be provided either by one of the modules
    /// scheduled before this one or by the candidate itself.
    pub fn accepts<'a, I>(&self, previous: I, candidate: &Module) -> bool
    where
        I: IntoIterator<Item = &'a Module> + Clone,
    {
        self.requires.iter().all(|need| {
            previous.clone().into_iter().any(|module| module.supports(need))
                || candidate.supports(need)
        })
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
