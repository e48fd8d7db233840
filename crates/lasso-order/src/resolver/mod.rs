//! Best-match load order resolver.
//!
//! # Architecture
//!
//! - [`CapabilityGraph`]: registry of modules with their provided and
//!   required capability ids
//! - [`MatchCache`]: memoized set differences and ranked candidate lists
//! - [`Resolver`]: the iterative best-match loop producing a simple order
//! - [`BundleOptimizer`]: folds simple modules into compound bundles
//! - [`Request`]: queued ids split into head and bottom groups
//!
//! # Algorithm Overview
//!
//! 1. **Validation**: reject circular module pairs and requested ids without
//!    any provider
//! 2. **Ranking**: score every module providing a seen id by matches minus
//!    the requirements it would add
//! 3. **Selection**: take the best candidate not already spent on the same
//!    situation, falling back to a single-id match
//! 4. **Splicing**: insert requirements a chosen module adds ahead of it
//! 5. **Optimization**: substitute compound bundles where every scheduled
//!    module still has its requirements served
//!
//! # Example
//!
//! ```
//! use lasso_order::resolver::{CapabilityGraph, Position, Request, Resolver};
//!
//! let mut graph = CapabilityGraph::new();
//! graph.register("jquery.js", ["jq"], Vec::<String>::new());
//! graph.register("bootstrap.js", ["bs"], ["jq"]);
//! graph.register("analytics.js", ["ga"], Vec::<String>::new());
//!
//! let mut request = Request::new(&graph);
//! request.queue("bs")?.queue_at("ga", Position::Head)?;
//!
//! let resolver = Resolver::new(&graph);
//! let order = resolver.resolve_request(&request)?;
//! assert_eq!(order, vec!["analytics.js", "jquery.js", "bootstrap.js"]);
//! # Ok::<(), lasso_order::Error>(())
//! ```

mod cache;
mod candidate;
mod graph;
mod id_set;
mod optimizer;
mod policy;
mod request;
mod resolver;
mod state;


pub use cache::MatchCache;
pub use candidate::Candidate;
pub use graph::CapabilityGraph;
pub use id_set::IdSet;
pub use optimizer::BundleOptimizer;
pub use policy::Policy;
pub use request::{Position, Request};
pub use resolver::Resolver;
pub use state::{ResolutionState, Signature, UsageHistory};
