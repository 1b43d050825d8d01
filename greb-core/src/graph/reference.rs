//! Reference Keys
//!
//! A branch is identified by its fully qualified ref name together with the
//! remote it lives in. Local branches use the remote `"."`, the same value git
//! stores in `branch.<name>.remote` for branches tracking another local branch.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Remote label of references that live in the local repository.
pub const LOCAL_REMOTE: &str = ".";

/// Stable identity of a graph node: full ref name plus remote label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Reference {
    /// Fully qualified name as seen by its remote, e.g. `refs/heads/main`.
    pub name: String,
    /// `"."` for local references, the remote name otherwise.
    pub remote: String,
}

impl Reference {
    /// Create a reference to `name` in `remote` (`"."` for local).
    pub fn new(name: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote: remote.into(),
        }
    }

    /// A reference in the local repository.
    pub fn local(name: impl Into<String>) -> Self {
        Self::new(name, LOCAL_REMOTE)
    }

    /// Whether the reference lives in the local repository.
    pub fn is_local(&self) -> bool {
        self.remote == LOCAL_REMOTE
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_local() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.remote, self.name)
        }
    }
}
