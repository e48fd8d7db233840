use std::sync::Arc;

use indexmap::IndexMap;

use super::id_set::IdSet;
use crate::module::Module;

/// Registry of all modules and their capability sets.
///
/// Modules are kept in registration order, which is the tie-breaker for
/// every ranking the resolver performs. The graph is borrowed immutably by a
/// [`Resolver`](super::Resolver), so it cannot change while a resolution runs.
#[derive(Debug, Clone, Default)]
pub struct CapabilityGraph {
    /// Modules indexed by source, in registration order
    modules: IndexMap<String, Arc<Module>>,
}

impl CapabilityGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module, replacing any earlier module with the same source.
    ///
    /// A replaced module keeps its original registration position. Nothing is
    /// validated here; missing providers and cycles are only detectable once
    /// the whole graph is known.
    pub fn register<S, P, R>(&mut self, source: S, provides: P, requires: R)
    where
        S: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        self.add_module(Module::new(source, provides, requires));
    }

    /// Register an already built module
    pub fn add_module(&mut self, module: Module) {
        let source = module.source().to_string();
        if self.modules.contains_key(&source) {
            log::debug!("Replacing registered module {}", source);
        }
        self.modules.insert(source, Arc::new(module));
    }

    /// Look up a module by source
    pub fn module(&self, source: &str) -> Option<&Arc<Module>> {
        self.modules.get(source)
    }

    /// Registration index of a module
    pub fn position(&self, source: &str) -> Option<usize> {
        self.modules.get_index_of(source)
    }

    /// All modules in registration order
    pub fn modules(&self) -> impl Iterator<Item = &Arc<Module>> + '_ {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// All modules, simple and compound, that provide `id`, in registration order
    pub fn providers_of(&self, id: &str) -> Vec<&Arc<Module>> {
        self.modules().filter(|module| module.supports(id)).collect()
    }

    /// Returns true if at least one module provides `id`
    pub fn has_provider(&self, id: &str) -> bool {
        self.modules().any(|module| module.supports(id))
    }

    /// Returns true if every id has at least one provider
    pub fn is_satisfiable<'a, I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().all(|id| self.has_provider(id))
    }

    /// Ids without any provider, in the given order
    pub fn missing<'a, I>(&self, ids: I) -> IdSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().filter(|id| !self.has_provider(id)).collect()
    }

    /// Find a pair of complex modules that can never be scheduled first.
    ///
    /// Module A and module B form a cycle when everything A requires is
    /// provided by B and everything B requires is provided by A. A module may
    /// pair with itself when it only requires ids it provides.
    pub fn find_circular_reference(&self) -> Option<(&Arc<Module>, &Arc<Module>)> {
        let complex: Vec<&Arc<Module>> = self.modules().filter(|m| m.is_complex()).collect();

        for &root in &complex {
            for &leaf in &complex {
                if root.requires().is_subset(leaf.provides())
                    && leaf.requires().is_subset(root.provides())
                {
                    return Some((root, leaf));
                }
            }
        }

        None
    }
}
