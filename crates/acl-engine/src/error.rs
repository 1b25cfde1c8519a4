//! Error types for access resolution
//!
//! These cover the failure modes of walking a role-inheritance graph.
//! An unknown *identity* (a client id or role name that simply does not
//! resolve to a record) is deliberately not an error: the engine answers
//! with no access and leaves the 401-versus-403 distinction to the caller.

use thiserror::Error;

/// Access resolution error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A role's `extends` chain revisited a name already on the walk.
    ///
    /// Fatal for the resolution call; the chain is never silently
    /// truncated.
    #[error("cyclic role inheritance detected at role '{role}'")]
    CyclicRoleInheritance {
        /// The role name at which the cycle was detected.
        role: String,
    },

    /// A role's `extends` names a role the store does not hold.
    #[error("role '{role}' extends unknown role '{parent}'")]
    UnknownParentRole {
        /// The role whose parent reference is dangling.
        role: String,
        /// The missing parent name.
        parent: String,
    },
}

/// Result type for access resolution operations.
pub type EngineResult<T> = Result<T, EngineError>;
