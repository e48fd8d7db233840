use super::graph::CapabilityGraph;
use super::id_set::IdSet;
use crate::error::{Error, Result};

/// Priority group of a queued id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    /// Resolved first, e.g. scripts loaded in the document head
    Head,
    /// Resolved after the head group
    #[default]
    Bottom,
}

/// A request for capability ids, grouped by position.
///
/// Ids are validated against the graph as they are queued, so an unknown id
/// fails immediately without touching the ids already queued.
#[derive(Debug, Clone)]
pub struct Request<'g> {
    graph: &'g CapabilityGraph,
    queued: IdSet,
    head: IdSet,
    bottom: IdSet,
}

impl<'g> Request<'g> {
    /// Create an empty request against a graph
    pub fn new(graph: &'g CapabilityGraph) -> Self {
        Self {
            graph,
            queued: IdSet::new(),
            head: IdSet::new(),
            bottom: IdSet::new(),
        }
    }

    /// Queue an id in the bottom group
    pub fn queue(&mut self, id: &str) -> Result<&mut Self> {
        self.queue_at(id, Position::Bottom)
    }

    /// Queue an id in the given group.
    ///
    /// Queuing an id twice keeps its first position, except that queuing into
    /// the head group moves an id out of the bottom group.
    pub fn queue_at(&mut self, id: &str, position: Position) -> Result<&mut Self> {
        if !self.graph.has_provider(id) {
            return Err(Error::UnregisteredCapability { id: id.to_string() });
        }

        if self.queued.insert(id) {
            self.group_mut(position).insert(id);
            return Ok(self);
        }

        if position == Position::Head && self.bottom.contains(id) {
            self.bottom = self.bottom.iter().filter(|queued| *queued != id).collect();
            self.head.insert(id);
        }

        Ok(self)
    }

    /// All queued ids, in queue order
    pub fn queued(&self) -> &IdSet {
        &self.queued
    }

    pub fn group(&self, position: Position) -> &IdSet {
        match position {
            Position::Head => &self.head,
            Position::Bottom => &self.bottom,
        }
    }

    fn group_mut(&mut self, position: Position) -> &mut IdSet {
        match position {
            Position::Head => &mut self.head,
            Position::Bottom => &mut self.bottom,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> CapabilityGraph {
        let mut graph = CapabilityGraph::new();
        graph.register("jquery.js", ["jq"], Vec::<String>::new());
        graph.register("bootstrap.js", ["bs"], ["jq"]);
        graph.register("backbone.js", ["bb"], ["jq"]);
        graph
    }

    #[test]
    fn test_queue_unknown_id_fails() {
        let graph = graph();
        let mut request = Request::new(&graph);
        request.queue("jq").unwrap();

        let err = request.queue("react").unwrap_err();
        assert!(matches!(err, Error::UnregisteredCapability { ref id } if id == "react"));
        assert_eq!(request.queued().as_slice(), ["jq"]);
    }

    #[test]
    fn test_queue_chains_and_deduplicates() {
        let graph = graph();
        let mut request = Request::new(&graph);
        request
            .queue("jq")
            .and_then(|r| r.queue("bs"))
            .and_then(|r| r.queue("jq"))
            .unwrap();

        assert_eq!(request.group(Position::Bottom).as_slice(), ["jq", "bs"]);
        assert!(request.group(Position::Head).is_empty());
    }

    #[test]
    fn test_head_wins_over_bottom() {
        let graph = graph();
        let mut request = Request::new(&graph);
        request.queue("jq").unwrap();
        request.queue("bs").unwrap();
        request.queue_at("jq", Position::Head).unwrap();

        assert_eq!(request.group(Position::Head).as_slice(), ["jq"]);
        assert_eq!(request.group(Position::Bottom).as_slice(), ["bs"]);
    }

    #[test]
    fn test_bottom_does_not_steal_from_head() {
        let graph = graph();
        let mut request = Request::new(&graph);
        request.queue_at("bb", Position::Head).unwrap();
        request.queue("bb").unwrap();

        assert_eq!(request.group(Position::Head).as_slice(), ["bb"]);
        assert!(request.group(Position::Bottom).is_empty());
        assert_eq!(request.queued().len(), 1);
    }
}
