use std::sync::Arc;

use indexmap::IndexSet;

use super::graph::CapabilityGraph;
use super::id_set::IdSet;
use crate::module::Module;

/// One capability position in a load order and the module serving it
#[derive(Debug, Clone)]
struct Entry {
    id: String,
    module: Arc<Module>,
}

/// Replaces groups of modules with compound bundles where the order allows.
///
/// For every capability position still held by a simple module, the optimizer
/// looks for a compound module that provides the id, adds no requirement that
/// is not already served earlier, and is accepted by every scheduled module.
/// The best such bundle takes the place of every simple module it subsumes.
/// Positions held by a compound are final, and a bundle overlapping a placed
/// compound is never used, so every id keeps exactly one provider.
#[derive(Debug, Clone, Copy)]
pub struct BundleOptimizer<'g> {
    graph: &'g CapabilityGraph,
}

impl<'g> BundleOptimizer<'g> {
    pub fn new(graph: &'g CapabilityGraph) -> Self {
        Self { graph }
    }

    /// Optimize a valid load order, returning the deduplicated result.
    pub fn optimize(&self, sequence: &[String]) -> Vec<String> {
        let mut entries = self.entries(sequence);

        for index in 0..entries.len() {
            if entries[index].module.is_compound() {
                continue;
            }
            let id = entries[index].id.clone();
            let Some(bundle) = self.find_supporting_compound(&id, index, &entries) else {
                continue;
            };

            log::debug!(
                "Substituting {} for {} ({})",
                bundle.source(),
                entries[index].module.source(),
                bundle.provides()
            );

            for entry in entries.iter_mut() {
                if !entry.module.is_compound() && bundle.supports(&entry.id) {
                    entry.module = Arc::clone(&bundle);
                }
            }
        }

        let optimized: IndexSet<String> = entries
            .into_iter()
            .map(|entry| entry.module.source().to_string())
            .collect();
        optimized.into_iter().collect()
    }

    fn entries(&self, sequence: &[String]) -> Vec<Entry> {
        let mut entries = Vec::new();
        for source in sequence {
            let Some(module) = self.graph.module(source) else {
                log::warn!("Skipping unregistered module {}", source);
                continue;
            };
            for id in module.provides() {
                entries.push(Entry {
                    id: id.to_string(),
                    module: Arc::clone(module),
                });
            }
        }
        entries
    }

    /// Best compound replacement for the entry at `index`, if any.
    fn find_supporting_compound(
        &self,
        id: &str,
        index: usize,
        entries: &[Entry],
    ) -> Option<Arc<Module>> {
        let placed: IdSet = entries.iter().map(|entry| entry.id.as_str()).collect();
        let mut best: Option<&Arc<Module>> = None;

        for bundle in self.graph.modules() {
            if !bundle.is_compound() || !bundle.supports(id) {
                continue;
            }
            if overlaps_placed_compound(bundle, entries) {
                log::trace!("{} overlaps a placed bundle", bundle.source());
                continue;
            }

            // requirements must be served before the first subsumed entry
            let first = entries
                .iter()
                .position(|entry| bundle.supports(&entry.id))
                .unwrap_or(index);
            let before: IdSet = entries[..first]
                .iter()
                .map(|entry| entry.id.as_str())
                .collect();
            if bundle.adds_complexity(&before) {
                continue;
            }

            if !is_accepted(bundle, entries) {
                log::trace!("{} rejected as replacement for {}", bundle.source(), id);
                continue;
            }

            best = Some(match best {
                Some(current) if bundle.match_count(&placed) <= current.match_count(&placed) => {
                    current
                }
                _ => bundle,
            });
        }

        best.cloned()
    }
}

/// Check if `bundle` provides an id already held by another compound
fn overlaps_placed_compound(bundle: &Module, entries: &[Entry]) -> bool {
    entries.iter().any(|entry| {
        entry.module.is_compound()
            && entry.module.source() != bundle.source()
            && bundle.supports(&entry.id)
    })
}

/// Ask every scheduled module whether it accepts `bundle` in place of the
/// modules the bundle subsumes.
fn is_accepted(bundle: &Module, entries: &[Entry]) -> bool {
    let substituted: Vec<&Module> = entries
        .iter()
        .map(|entry| {
            if !entry.module.is_compound() && bundle.supports(&entry.id) {
                bundle
            } else {
                entry.module.as_ref()
            }
        })
        .collect();

    substituted
        .iter()
        .enumerate()
        .all(|(n, module)| module.accepts(substituted[..n].iter().copied(), bundle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none() -> Vec<String> {
        Vec::new()
    }

    fn order(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bundle_replaces_simple_modules() {
        let mut graph = CapabilityGraph::new();
        graph.register("jquery.js", ["jq"], none());
        graph.register("bootstrap.js", ["bs"], ["jq"]);
        graph.register("app.js", ["app"], ["bs"]);
        graph.register("bundle.js", ["jq", "bs"], none());

        let optimizer = BundleOptimizer::new(&graph);
        let result = optimizer.optimize(&order(&["jquery.js", "bootstrap.js", "app.js"]));
        assert_eq!(result, vec!["bundle.js", "app.js"]);
    }

    #[test]
    fn test_bundle_with_unserved_requirement_is_skipped() {
        let mut graph = CapabilityGraph::new();
        graph.register("jquery.js", ["jq"], none());
        graph.register("bootstrap.js", ["bs"], ["jq"]);
        graph.register("bundle.js", ["jq", "bs"], ["polyfill"]);
        graph.register("polyfill.js", ["polyfill"], none());

        let optimizer = BundleOptimizer::new(&graph);
        let result = optimizer.optimize(&order(&["jquery.js", "bootstrap.js"]));
        assert_eq!(result, vec!["jquery.js", "bootstrap.js"]);
    }

    #[test]
    fn test_bundle_requirement_served_earlier_is_fine() {
        let mut graph = CapabilityGraph::new();
        graph.register("polyfill.js", ["polyfill"], none());
        graph.register("jquery.js", ["jq"], ["polyfill"]);
        graph.register("bootstrap.js", ["bs"], ["jq"]);
        graph.register("bundle.js", ["jq", "bs"], ["polyfill"]);

        let optimizer = BundleOptimizer::new(&graph);
        let result = optimizer.optimize(&order(&["polyfill.js", "jquery.js", "bootstrap.js"]));
        assert_eq!(result, vec!["polyfill.js", "bundle.js"]);
    }

    #[test]
    fn test_prefers_bundle_covering_more_placed_ids() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["a"], none());
        graph.register("b.js", ["b"], none());
        graph.register("c.js", ["c"], none());
        graph.register("ab.js", ["a", "b", "z"], none());
        graph.register("abc.js", ["a", "b", "c"], none());

        let optimizer = BundleOptimizer::new(&graph);
        let result = optimizer.optimize(&order(&["a.js", "b.js", "c.js"]));
        assert_eq!(result, vec!["abc.js"]);
    }

    #[test]
    fn test_equal_coverage_keeps_first_registered() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["a"], none());
        graph.register("b.js", ["b"], none());
        graph.register("first.js", ["a", "b"], none());
        graph.register("second.js", ["b", "a"], none());

        let optimizer = BundleOptimizer::new(&graph);
        let result = optimizer.optimize(&order(&["a.js", "b.js"]));
        assert_eq!(result, vec!["first.js"]);
    }

    #[test]
    fn test_overlapping_bundle_is_not_used() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["a"], none());
        graph.register("b.js", ["b"], none());
        graph.register("c.js", ["c"], none());
        graph.register("ab.js", ["a", "b"], none());
        graph.register("bc.js", ["b", "c"], none());

        let optimizer = BundleOptimizer::new(&graph);
        let result = optimizer.optimize(&order(&["a.js", "b.js", "c.js"]));
        assert_eq!(result, vec!["ab.js", "c.js"]);
    }

    #[test]
    fn test_placed_bundle_is_not_replaced() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["a"], none());
        graph.register("b.js", ["b"], none());
        graph.register("x.js", ["x"], none());
        graph.register("ab.js", ["a", "b"], none());
        graph.register("bx.js", ["b", "x"], none());

        let optimizer = BundleOptimizer::new(&graph);
        let result = optimizer.optimize(&order(&["a.js", "b.js"]));
        assert_eq!(result, vec!["ab.js"]);
    }

    #[test]
    fn test_larger_bundle_does_not_swallow_placed_one() {
        let mut graph = CapabilityGraph::new();
        graph.register("c.js", ["c"], none());
        graph.register("ab.js", ["a", "b"], none());
        graph.register("abc.js", ["a", "b", "c"], none());

        let optimizer = BundleOptimizer::new(&graph);
        let result = optimizer.optimize(&order(&["ab.js", "c.js"]));
        assert_eq!(result, vec!["ab.js", "c.js"]);
    }

    #[test]
    fn test_unknown_modules_are_dropped() {
        let mut graph = CapabilityGraph::new();
        graph.register("a.js", ["a"], none());

        let optimizer = BundleOptimizer::new(&graph);
        let result = optimizer.optimize(&order(&["ghost.js", "a.js"]));
        assert_eq!(result, vec!["a.js"]);
    }

    #[test]
    fn test_optimizing_twice_changes_nothing() {
        let mut graph = CapabilityGraph::new();
        graph.register("jquery.js", ["jq"], none());
        graph.register("bootstrap.js", ["bs"], ["jq"]);
        graph.register("backbone.js", ["bb"], ["jq"]);
        graph.register("bundle.js", ["jq", "bs"], none());

        let optimizer = BundleOptimizer::new(&graph);
        let once = optimizer.optimize(&order(&["jquery.js", "bootstrap.js", "backbone.js"]));
        let twice = optimizer.optimize(&once);
        assert_eq!(once, vec!["bundle.js", "backbone.js"]);
        assert_eq!(once, twice);
    }
}
