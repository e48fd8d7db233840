use super::candidate::Candidate;
use super::id_set::IdSet;

/// Policy for selecting between candidate modules.
///
/// When several modules can satisfy the pending ids, the policy decides
/// whether compound bundles may be chosen during resolution or are left to
/// the bundle optimizer.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Resolve with single-provide modules where possible
    pub prefer_simple: bool,
    /// Substitute compound bundles after resolution
    pub optimize: bool,
}

impl Policy {
    /// Create a new policy with default settings
    pub fn new() -> Self {
        Self {
            prefer_simple: true,
            optimize: true,
        }
    }

    /// Set preference for simple modules during resolution
    pub fn prefer_simple(mut self, prefer: bool) -> Self {
        self.prefer_simple = prefer;
        self
    }

    /// Enable or disable the bundle optimization pass
    pub fn optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Whether `candidate` may be chosen for the `pending` ids.
    ///
    /// Under `prefer_simple`, a compound candidate is only admitted when it
    /// resolves at least one pending id that no simple candidate provides.
    pub fn admits(&self, candidate: &Candidate, pending: &IdSet, candidates: &[Candidate]) -> bool {
        if !self.prefer_simple || !candidate.module.is_compound() {
            return true;
        }

        pending
            .iter()
            .filter(|id| candidate.module.supports(id))
            .any(|id| !has_simple_provider(candidates, id))
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}

fn has_simple_provider(candidates: &[Candidate], id: &str) -> bool {
    candidates
        .iter()
        .any(|other| !other.module.is_compound() && other.module.supports(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Module;
    use std::sync::Arc;

    fn candidate(module: Module, position: usize) -> Candidate {
        Candidate {
            module: Arc::new(module),
            position,
            match_count: 1,
            complexity_count: 0,
            extra_requirements: IdSet::new(),
        }
    }

    fn none() -> Vec<String> {
        Vec::new()
    }

    #[test]
    fn test_defaults() {
        let policy = Policy::default();
        assert!(policy.prefer_simple);
        assert!(policy.optimize);

        let policy = Policy::new().prefer_simple(false).optimize(false);
        assert!(!policy.prefer_simple);
        assert!(!policy.optimize);
    }

    #[test]
    fn test_compound_rejected_when_simple_providers_exist() {
        let candidates = vec![
            candidate(Module::new("bundle.js", ["jq", "bs"], none()), 2),
            candidate(Module::new("jquery.js", ["jq"], none()), 0),
            candidate(Module::new("bootstrap.js", ["bs"], none()), 1),
        ];
        let pending: IdSet = ["jq", "bs"].into_iter().collect();

        let policy = Policy::new();
        assert!(!policy.admits(&candidates[0], &pending, &candidates));
        assert!(policy.admits(&candidates[1], &pending, &candidates));

        let greedy = Policy::new().prefer_simple(false);
        assert!(greedy.admits(&candidates[0], &pending, &candidates));
    }

    #[test]
    fn test_compound_admitted_for_id_only_it_provides() {
        let candidates = vec![
            candidate(Module::new("bundle.js", ["jq", "bs"], none()), 1),
            candidate(Module::new("jquery.js", ["jq"], none()), 0),
        ];
        let pending: IdSet = ["jq", "bs"].into_iter().collect();

        assert!(Policy::new().admits(&candidates[0], &pending, &candidates));
    }
}
