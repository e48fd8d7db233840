use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::candidate::Candidate;
use super::graph::CapabilityGraph;
use super::id_set::IdSet;

/// Memoizes the two expensive queries the resolver repeats across rounds.
///
/// Both queries are pure functions of the graph and their arguments, and the
/// graph is borrowed immutably for the cache's whole lifetime, so entries are
/// never invalidated. The cache can be shared by concurrent resolutions.
#[derive(Debug)]
pub struct MatchCache<'g> {
    graph: &'g CapabilityGraph,
    /// (requiring, providing) -> requiring ids not in providing
    unresolved: RwLock<HashMap<(IdSet, IdSet), IdSet>>,
    /// ranked id set -> ranked candidates
    ranked: RwLock<HashMap<IdSet, Arc<[Candidate]>>>,
}

impl<'g> MatchCache<'g> {
    /// Create an empty cache over a graph
    pub fn new(graph: &'g CapabilityGraph) -> Self {
        Self {
            graph,
            unresolved: RwLock::new(HashMap::new()),
            ranked: RwLock::new(HashMap::new()),
        }
    }

    pub fn graph(&self) -> &'g CapabilityGraph {
        self.graph
    }

    /// Ids from `requiring` that are not present in `providing`.
    pub fn unresolved(&self, requiring: &IdSet, providing: &IdSet) -> IdSet {
        let key = (requiring.clone(), providing.clone());
        if let Some(hit) = self.unresolved.read().get(&key) {
            return hit.clone();
        }

        let remaining = requiring.difference(providing);
        self.unresolved
            .write()
            .entry(key)
            .or_insert(remaining)
            .clone()
    }

    /// Ids from `requiring` that no registered module provides.
    ///
    /// Walks the modules in registration order, narrowing the remaining set
    /// until it is empty.
    pub fn unsatisfiable(&self, requiring: &IdSet) -> IdSet {
        let mut remaining = requiring.clone();
        for module in self.graph.modules() {
            if remaining.is_empty() {
                break;
            }
            remaining = self.unresolved(&remaining, module.provides());
        }
        remaining
    }

    /// Candidates for an id set, best first.
    ///
    /// Every module providing at least one of `ids` becomes a candidate,
    /// except modules with requirements no registered module can satisfy.
    /// Candidates are ordered by `match_count - complexity_count`, highest
    /// first; the sort is stable so equal weights keep registration order.
    pub fn ranked_candidates(&self, ids: &IdSet) -> Arc<[Candidate]> {
        if let Some(hit) = self.ranked.read().get(ids) {
            return Arc::clone(hit);
        }

        let ranked: Arc<[Candidate]> = self.build_candidates(ids).into();
        Arc::clone(
            self.ranked
                .write()
                .entry(ids.clone())
                .or_insert(ranked),
        )
    }

    fn build_candidates(&self, ids: &IdSet) -> Vec<Candidate> {
        let mut candidates = Vec::new();

        for (position, module) in self.graph.modules().enumerate() {
            let match_count = module.match_count(ids);
            if match_count == 0 {
                continue;
            }

            if module.is_complex() {
                let missing = self.unsatisfiable(module.requires());
                if !missing.is_empty() {
                    log::trace!(
                        "Disqualifying {}: no module provides {}",
                        module.source(),
                        missing
                    );
                    continue;
                }
            }

            let extra_requirements = self.unresolved(module.requires(), ids);
            candidates.push(Candidate {
                module: Arc::clone(module),
                position,
                match_count,
                complexity_count: extra_requirements.len(),
                extra_requirements,
            });
        }

        candidates.sort_by_key(|candidate| Reverse(candidate.weight()));

        for (n, candidate) in candidates.iter().enumerate() {
            log::trace!(
                "[{}] {} : {} ({} / {})",
                n,
                ids,
                candidate.source(),
                candidate.match_count,
                candidate.complexity_count
            );
        }

        candidates
    }

    /// Number of memoized ranked candidate lists
    pub fn ranked_len(&self) -> usize {
        self.ranked.read().len()
    }

    /// Number of memoized set differences
    pub fn unresolved_len(&self) -> usize {
        self.unresolved.read().len()
    }
}
