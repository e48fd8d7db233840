//! Capability-based load order resolution.
//!
//! Modules declare which capability ids they provide and which they require.
//! Given a set of requested ids, the [`Resolver`] computes an ordered module
//! sequence in which every requirement is provided by an earlier module, and
//! the [`BundleOptimizer`] folds groups of simple modules into compound
//! bundles wherever that keeps the order valid.
//!
//! ```
//! use lasso_order::{CapabilityGraph, Resolver};
//!
//! let mut graph = CapabilityGraph::new();
//! graph.register("jquery.js", ["jq"], Vec::<String>::new());
//! graph.register("jquery-ui.js", ["jqui"], ["jq"]);
//!
//! let resolver = Resolver::new(&graph);
//! let order = resolver.resolve(["jqui"]).unwrap();
//! assert_eq!(order, vec!["jquery.js", "jquery-ui.js"]);
//! ```

pub mod descriptor;
pub mod error;
pub mod module;
pub mod resolver;

pub use descriptor::Descriptor;
pub use error::{Error, Result};
pub use module::Module;
pub use resolver::{
    BundleOptimizer, Candidate, CapabilityGraph, IdSet, MatchCache, Policy, Position, Request,
    Resolver,
};
