//! Namespaced identifiers.

use serde::{Deserialize, Serialize};

/// Namespace for every identifier this crate defines.
pub const NAMESPACE: &str = "gridcraft";

/// A `namespace:path` identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identifier {
    /// Owning namespace.
    pub namespace: String,
    /// Path within the namespace.
    pub path: String,
}

impl core::fmt::Display for Identifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

/// Identifier for `path` in the [`NAMESPACE`].
pub fn of(path: &str) -> Identifier {
    Identifier {
        namespace: NAMESPACE.to_owned(),
        path: path.to_owned(),
    }
}

/// `namespace:path` string for `path` in the [`NAMESPACE`].
pub fn as_string(path: &str) -> String {
    of(path).to_string()
}
