use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a descriptor or resolving a load order.
#[derive(Error, Debug)]
pub enum Error {
    /// An id was queued that no registered module provides.
    #[error("Invalid argument [{id}]. There is no registered module providing the given id")]
    UnregisteredCapability { id: String },

    /// Requested ids that no module in the graph can ever satisfy.
    #[error("Unable to resolve requested modules. Missing ids: {}", .ids.join(", "))]
    UnresolvableIds { ids: Vec<String> },

    /// Two modules require each other's capabilities.
    #[error(
        "Circular reference detected: module {module} requires {} which {other} provides while requiring {}",
        .requires.join(", "),
        .other_requires.join(", ")
    )]
    CircularReference {
        module: String,
        requires: Vec<String>,
        other: String,
        other_requires: Vec<String>,
    },

    #[error("Failed to read descriptor {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolvable_message_lists_ids() {
        let err = Error::UnresolvableIds {
            ids: vec!["foo".to_string(), "bar".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unable to resolve requested modules. Missing ids: foo, bar"
        );
    }

    #[test]
    fn test_circular_message_names_both_modules() {
        let err = Error::CircularReference {
            module: "a.js".to_string(),
            requires: vec!["y".to_string()],
            other: "b.js".to_string(),
            other_requires: vec!["x".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("a.js"));
        assert!(message.contains("b.js"));
        assert!(message.contains("requires y"));
        assert!(message.contains("requiring x"));
    }
}
