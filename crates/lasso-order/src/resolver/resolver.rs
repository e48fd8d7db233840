use std::time::Instant;

use indexmap::IndexSet;

use super::cache::MatchCache;
use super::candidate::Candidate;
use super::graph::CapabilityGraph;
use super::id_set::IdSet;
use super::optimizer::BundleOptimizer;
use super::policy::Policy;
use super::request::{Position, Request};
use super::state::{ResolutionState, Signature};
use crate::error::{Error, Result};

/// Computes load orders over a frozen capability graph.
///
/// A resolver holds the match cache for its graph. Each call owns its own
/// [`ResolutionState`], so one resolver can serve concurrent calls.
pub struct Resolver<'g> {
    graph: &'g CapabilityGraph,
    cache: MatchCache<'g>,
    policy: Policy,
}

impl<'g> Resolver<'g> {
    /// Create a new resolver with the default policy
    pub fn new(graph: &'g CapabilityGraph) -> Self {
        Self::with_policy(graph, Policy::default())
    }

    /// Create a new resolver with a custom policy
    pub fn with_policy(graph: &'g CapabilityGraph, policy: Policy) -> Self {
        Self {
            graph,
            cache: MatchCache::new(graph),
            policy,
        }
    }

    pub fn graph(&self) -> &'g CapabilityGraph {
        self.graph
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn cache(&self) -> &MatchCache<'g> {
        &self.cache
    }

    /// Resolve requested ids into the final module sequence.
    ///
    /// Runs validation, the best-match loop and, unless disabled by the
    /// policy, the bundle optimizer.
    pub fn resolve<I, S>(&self, requested: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requested: IdSet = requested.into_iter().collect();
        let start = Instant::now();

        let simple = self.resolve_simple(&requested)?;
        let result = if self.policy.optimize {
            BundleOptimizer::new(self.graph).optimize(&simple)
        } else {
            simple
        };

        log::debug!(
            "Resolved {} in {:.5} milliseconds",
            requested,
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(result)
    }

    /// Resolve a queued request, head group first.
    ///
    /// Each group is resolved independently; modules already emitted for the
    /// head group are not repeated for the bottom group.
    pub fn resolve_request(&self, request: &Request<'_>) -> Result<Vec<String>> {
        let mut result: IndexSet<String> = IndexSet::new();

        for position in [Position::Head, Position::Bottom] {
            let group = request.group(position);
            if group.is_empty() {
                continue;
            }
            result.extend(self.resolve(group)?);
        }

        Ok(result.into_iter().collect())
    }

    /// Check the graph and the requested ids before any ordering happens.
    pub fn validate(&self, requested: &IdSet) -> Result<()> {
        if let Some((module, other)) = self.graph.find_circular_reference() {
            return Err(Error::CircularReference {
                module: module.source().to_string(),
                requires: module.requires().as_slice().to_vec(),
                other: other.source().to_string(),
                other_requires: other.requires().as_slice().to_vec(),
            });
        }

        if !self.graph.is_satisfiable(requested) {
            return Err(Error::UnresolvableIds {
                ids: self.graph.missing(requested).into_vec(),
            });
        }

        Ok(())
    }

    /// Build the load order without bundle optimization.
    pub fn resolve_simple(&self, requested: &IdSet) -> Result<Vec<String>> {
        self.validate(requested)?;

        let mut state = ResolutionState::new(requested);

        loop {
            let pending = state.pending();
            if pending.is_empty() {
                break;
            }

            let round = state.next_round();
            let seen = state.order().clone();
            let candidates = self.cache.ranked_candidates(&seen);

            let chosen = self
                .find_best_match(&mut state, &seen, &pending, &candidates)
                .ok_or_else(|| Error::UnresolvableIds {
                    ids: pending.as_slice().to_vec(),
                })?;

            let extra: IdSet = chosen
                .extra_requirements
                .iter()
                .filter(|id| !state.is_resolved(id))
                .collect();
            if !extra.is_empty() {
                let at = state.splice(&chosen.module, &extra);
                log::debug!(
                    "round {}: {} adds {} at position {}",
                    round,
                    chosen.source(),
                    extra,
                    at
                );
            }

            let newly = state.commit(&chosen.module);
            log::debug!(
                "round {}: using {} for {} (pending: {})",
                round,
                chosen.source(),
                newly,
                pending
            );
        }

        self.settle(&state)
    }

    /// Pick the module for this round.
    ///
    /// Walks the ranked candidates that provide a pending id. A candidate
    /// already used for the same signature is skipped. A candidate providing
    /// exactly the pending ids is taken at once; otherwise the first
    /// candidate whose signature no other module has spent is taken.
    ///
    /// The pending set shrinks every round of [`resolve_simple`], so a
    /// signature repeats only when the same state is matched again. The
    /// history guards that case, it never changes the choice of a fresh run.
    ///
    /// [`resolve_simple`]: Resolver::resolve_simple
    fn find_best_match(
        &self,
        state: &mut ResolutionState,
        seen: &IdSet,
        pending: &IdSet,
        candidates: &[Candidate],
    ) -> Option<Candidate> {
        let eligible = candidates
            .iter()
            .filter(|candidate| candidate.provides_any(pending))
            .filter(|candidate| self.policy.admits(candidate, pending, candidates));

        for candidate in eligible {
            let signature = Signature::new(seen, pending, candidate.module.provides());
            let source = candidate.source();

            if state.history().contains(source, &signature) {
                log::debug!("skipping {}: already used for {}", source, pending);
                continue;
            }

            if candidate.module.provides().same_members(pending) {
                state.history_mut().record(source, signature);
                return Some(candidate.clone());
            }

            if state.history().recorded_by_other(source, &signature) {
                continue;
            }

            state.history_mut().record(source, signature);
            return Some(candidate.clone());
        }

        self.single_id_match(pending, candidates)
    }

    /// Fallback: a module providing only the first pending id.
    ///
    /// When no single-provide module exists for it, any candidate providing
    /// that id is used, so every round resolves at least one id.
    fn single_id_match(&self, pending: &IdSet, candidates: &[Candidate]) -> Option<Candidate> {
        let first = pending.first()?;
        log::debug!("using single id match {}", first);

        candidates
            .iter()
            .find(|candidate| {
                candidate.module.provides().len() == 1 && candidate.module.supports(first)
            })
            .or_else(|| {
                candidates
                    .iter()
                    .find(|candidate| candidate.module.supports(first))
            })
            .cloned()
    }

    /// Turn the finished state into a module sequence.
    ///
    /// The ordered ids are mapped to their providers, then each module is
    /// placed after the modules its requirements were resolved to. Modules
    /// that are already in a valid position keep it.
    fn settle(&self, state: &ResolutionState) -> Result<Vec<String>> {
        let sequence = state.module_sequence();
        let mut placed: IndexSet<String> = IndexSet::new();
        let mut visiting: Vec<String> = Vec::new();

        for source in &sequence {
            self.place(source, state, &mut placed, &mut visiting)?;
        }

        Ok(placed.into_iter().collect())
    }

    fn place(
        &self,
        source: &str,
        state: &ResolutionState,
        placed: &mut IndexSet<String>,
        visiting: &mut Vec<String>,
    ) -> Result<()> {
        if placed.contains(source) {
            return Ok(());
        }

        let Some(module) = self.graph.module(source) else {
            return Ok(());
        };

        if visiting.iter().any(|open| open == source) {
            let dependent = visiting.last().cloned().unwrap_or_default();
            let other_requires = self
                .graph
                .module(&dependent)
                .map(|m| m.requires().as_slice().to_vec())
                .unwrap_or_default();
            return Err(Error::CircularReference {
                module: source.to_string(),
                requires: module.requires().as_slice().to_vec(),
                other: dependent,
                other_requires,
            });
        }

        visiting.push(source.to_string());
        for need in module.requires() {
            if let Some(provider) = state.provider(need) {
                if provider != source {
                    self.place(provider, state, placed, visiting)?;
                }
            }
        }
        visiting.pop();

        placed.insert(source.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> Vec<String> {
        Vec::new()
    }

    fn ids(values: &[&str]) -> IdSet {
        values.iter().copied().collect()
    }

    #[test]
    fn test_validate_reports_missing_ids() {
        let mut graph = CapabilityGraph::new();
        graph.register("jquery.js", ["jq"], none());
        let resolver = Resolver::new(&graph);

        match resolver.validate(&ids(&["jq", "vue", "react"])) {
            Err(Error::UnresolvableIds { ids }) => assert_eq!(ids, vec!["vue", "react"]),
            other => panic!("expected UnresolvableIds, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_checks_cycles_first() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["x"], ["y"]);
        graph.register("b.js", ["y"], ["x"]);
        let resolver = Resolver::new(&graph);

        let err = resolver.validate(&ids(&["missing"])).unwrap_err();
        assert!(matches!(err, Error::CircularReference { .. }));
    }

    #[test]
    fn test_single_id_match_prefers_single_provide() {
        let mut graph = CapabilityGraph::new();
        graph.register("bundle.js", ["a", "b"], none());
        graph.register("a.js", ["a"], none());
        let resolver = Resolver::new(&graph);

        let candidates = resolver.cache().ranked_candidates(&ids(&["a"]));
        let chosen = resolver.single_id_match(&ids(&["a"]), &candidates).unwrap();
        assert_eq!(chosen.source(), "a.js");
    }

    #[test]
    fn test_single_id_match_falls_back_to_compound() {
        let mut graph = CapabilityGraph::new();
        graph.register("bundle.js", ["a", "b"], none());
        let resolver = Resolver::new(&graph);

        let candidates = resolver.cache().ranked_candidates(&ids(&["a"]));
        let chosen = resolver.single_id_match(&ids(&["a"]), &candidates).unwrap();
        assert_eq!(chosen.source(), "bundle.js");
    }

    #[test]
    fn test_best_match_skips_signature_already_used() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["a"], none());
        graph.register("b.js", ["b"], none());
        let resolver = Resolver::new(&graph);

        let seen = ids(&["a", "b"]);
        let mut state = ResolutionState::new(&seen);
        let candidates = resolver.cache().ranked_candidates(&seen);

        let first = resolver
            .find_best_match(&mut state, &seen, &seen, &candidates)
            .unwrap();
        assert_eq!(first.source(), "a.js");

        // same situation again: a.js is spent, b.js is next
        let second = resolver
            .find_best_match(&mut state, &seen, &seen, &candidates)
            .unwrap();
        assert_eq!(second.source(), "b.js");
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_best_match_takes_exact_provider() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["a"], none());
        graph.register("ab.js", ["a", "b"], none());
        let resolver = Resolver::with_policy(&graph, Policy::new().prefer_simple(false));

        let seen = ids(&["b", "a"]);
        let mut state = ResolutionState::new(&seen);
        let candidates = resolver.cache().ranked_candidates(&seen);

        let chosen = resolver
            .find_best_match(&mut state, &seen, &seen, &candidates)
            .unwrap();
        assert_eq!(chosen.source(), "ab.js");
    }

    #[test]
    fn test_resolve_simple_fails_when_no_usable_provider() {
        let mut graph = CapabilityGraph::new();
        graph.register("x.js", ["x"], ["nothing"]);
        let resolver = Resolver::new(&graph);

        match resolver.resolve(["x"]) {
            Err(Error::UnresolvableIds { ids }) => assert_eq!(ids, vec!["x"]),
            other => panic!("expected UnresolvableIds, got {:?}", other),
        }
    }
}
