//! JSON module descriptors.
//!
//! A descriptor lists modules under `scripts`, in registration order, and may
//! carry a default queue:
//!
//! ```json
//! {
//!     "scripts": {
//!         "jquery.js": { "provides": ["jq"] },
//!         "jquery-ui.js": { "provides": ["jqui"], "requires": ["jq"] }
//!     },
//!     "queue": { "head": ["jq"], "bottom": ["jqui"] }
//! }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resolver::{CapabilityGraph, Position, Request};

/// A module entry in a descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub requires: Vec<String>,
}

/// Ids to queue when none are given explicitly
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    #[serde(default)]
    pub head: Vec<String>,
    #[serde(default)]
    pub bottom: Vec<String>,
}

impl QueueConfig {
    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.bottom.is_empty()
    }
}

/// Parsed descriptor document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub scripts: IndexMap<String, ScriptEntry>,
    #[serde(default, skip_serializing_if = "QueueConfig::is_empty")]
    pub queue: QueueConfig,
}

impl Descriptor {
    /// Parse a descriptor from JSON text
    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read and parse a descriptor file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Register every script into `graph`, in document order
    pub fn register_into(&self, graph: &mut CapabilityGraph) {
        for (source, entry) in &self.scripts {
            graph.register(source.as_str(), &entry.provides, &entry.requires);
        }
    }

    /// Build a new graph from the scripts
    pub fn to_graph(&self) -> CapabilityGraph {
        let mut graph = CapabilityGraph::new();
        self.register_into(&mut graph);
        graph
    }

    /// Queue the descriptor's default ids into a request
    pub fn queue_into(&self, request: &mut Request<'_>) -> Result<()> {
        for id in &self.queue.head {
            request.queue_at(id, Position::Head)?;
        }
        for id in &self.queue.bottom {
            request.queue_at(id, Position::Bottom)?;
        }
        Ok(())
    }
}
