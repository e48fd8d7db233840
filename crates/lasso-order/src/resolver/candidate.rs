use std::sync::Arc;

use super::id_set::IdSet;
use crate::module::Module;

/// A module ranked against a set of pending ids.
///
/// Candidates are derived per resolution round and never stored in the graph.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The module being considered
    pub module: Arc<Module>,
    /// Registration index, the final tie-breaker
    pub position: usize,
    /// How many ids of the ranked set the module provides
    pub match_count: usize,
    /// How many requirements are outside the ranked set
    pub complexity_count: usize,
    /// The requirements outside the ranked set
    pub extra_requirements: IdSet,
}

impl Candidate {
    /// Ranking weight: provided matches minus added requirements
    pub fn weight(&self) -> isize {
        self.match_count as isize - self.complexity_count as isize
    }

    /// Returns the module source
    pub fn source(&self) -> &str {
        self.module.source()
    }

    /// Returns true if the module provides at least one of `ids`
    pub fn provides_any(&self, ids: &IdSet) -> bool {
        ids.iter().any(|id| self.module.supports(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_can_go_negative() {
        let candidate = Candidate {
            module: Arc::new(Module::new("ui.js", ["jqui"], ["jq", "css"])),
            position: 0,
            match_count: 1,
            complexity_count: 2,
            extra_requirements: ["jq", "css"].into_iter().collect(),
        };
        assert_eq!(candidate.weight(), -1);
        assert_eq!(candidate.source(), "ui.js");
        assert!(candidate.provides_any(&["x", "jqui"].into_iter().collect()));
        assert!(!candidate.provides_any(&["jq"].into_iter().collect()));
    }
}
