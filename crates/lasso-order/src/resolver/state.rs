use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::id_set::IdSet;
use crate::module::Module;

/// The situation a module was chosen for.
///
/// A module is never chosen twice for the same signature, and a signature
/// already spent on one module is not silently handed to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Every id seen so far, in order
    pub seen: IdSet,
    /// Ids still pending when the module was considered
    pub pending: IdSet,
    /// What the module provides
    pub provides: IdSet,
}

impl Signature {
    pub fn new(seen: &IdSet, pending: &IdSet, provides: &IdSet) -> Self {
        Self {
            seen: seen.clone(),
            pending: pending.clone(),
            provides: provides.clone(),
        }
    }
}

/// Records which module was used for which signature.
#[derive(Debug, Default)]
pub struct UsageHistory {
    records: HashMap<Signature, HashSet<String>>,
}

impl UsageHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `source` was chosen for `signature`
    pub fn record(&mut self, source: &str, signature: Signature) {
        self.records
            .entry(signature)
            .or_default()
            .insert(source.to_string());
    }

    /// Check if `source` was already chosen for `signature`
    pub fn contains(&self, source: &str, signature: &Signature) -> bool {
        self.records
            .get(signature)
            .is_some_and(|sources| sources.contains(source))
    }

    /// Check if a module other than `source` was chosen for `signature`
    pub fn recorded_by_other(&self, source: &str, signature: &Signature) -> bool {
        self.records
            .get(signature)
            .is_some_and(|sources| sources.iter().any(|other| other != source))
    }

    pub fn len(&self) -> usize {
        self.records.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Mutable state of one resolution run.
///
/// Owned by a single call to the resolver and threaded through every round.
#[derive(Debug)]
pub struct ResolutionState {
    /// Capability id -> source of the module committed to provide it
    resolved: IndexMap<String, String>,
    /// Capability positions, in load order
    order: IdSet,
    /// Which modules were used for which situations
    history: UsageHistory,
    /// Current round, starting at 1
    round: usize,
}

impl ResolutionState {
    /// Create state for a requested id set
    pub fn new(requested: &IdSet) -> Self {
        Self {
            resolved: IndexMap::new(),
            order: requested.clone(),
            history: UsageHistory::new(),
            round: 0,
        }
    }

    pub fn order(&self) -> &IdSet {
        &self.order
    }

    pub fn resolved(&self) -> &IndexMap<String, String> {
        &self.resolved
    }

    pub fn history(&self) -> &UsageHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut UsageHistory {
        &mut self.history
    }

    pub fn round(&self) -> usize {
        self.round
    }

    /// Advance to the next round, returning its number
    pub fn next_round(&mut self) -> usize {
        self.round += 1;
        self.round
    }

    pub fn is_resolved(&self, id: &str) -> bool {
        self.resolved.contains_key(id)
    }

    /// Module source committed for an id
    pub fn provider(&self, id: &str) -> Option<&str> {
        self.resolved.get(id).map(String::as_str)
    }

    /// Ordered ids that have no committed provider yet
    pub fn pending(&self) -> IdSet {
        self.order
            .iter()
            .filter(|id| !self.is_resolved(id))
            .collect()
    }

    /// Insert the extra requirements of `module` into the order.
    ///
    /// They go right after the last of the module's requirements that is
    /// already ordered, or to the front when none is. Returns the position.
    pub fn splice(&mut self, module: &Module, extra: &IdSet) -> usize {
        let at = module
            .requires()
            .iter()
            .filter_map(|id| self.order.position(id))
            .map(|position| position + 1)
            .max()
            .unwrap_or(0);

        self.order.insert_all_at(at, extra);
        at
    }

    /// Commit `module` as the provider of every id it provides.
    ///
    /// Ids already committed to another module keep their provider. Returns
    /// the ids newly resolved.
    pub fn commit(&mut self, module: &Module) -> IdSet {
        let mut newly = IdSet::new();
        for id in module.provides() {
            if !self.resolved.contains_key(id) {
                self.resolved.insert(id.to_string(), module.source().to_string());
                newly.insert(id);
            }
        }
        newly
    }

    /// Map the ordered ids to their providers, first occurrence wins
    pub fn module_sequence(&self) -> Vec<String> {
        let mut sequence: Vec<String> = Vec::new();
        for id in &self.order {
            if let Some(source) = self.resolved.get(id) {
                if !sequence.contains(source) {
                    sequence.push(source.clone());
                }
            }
        }
        sequence
    }
}
