//! # Operations
//!
//! Defines the closed set of operations that can be granted on a resource.
//! Every grant in the system is keyed by one of these eight operations.

use serde::{Deserialize, Serialize};

/// Operations that can be granted on a resource.
///
/// The set is closed: extending it requires recompiling every consumer,
/// which is intentional. Stored grants are keyed by these names and an
/// unknown key would otherwise be silently unreachable.
///
/// Four base operations exist, and three of them have an "own records only"
/// variant that restricts the operation to documents owned by the acting
/// client:
/// - **Create** / **CreateOwn**
/// - **Read** / **ReadOwn**
/// - **Update** / **UpdateOwn**
/// - **Delete** / **DeleteOwn**
///
/// `CreateOwn` is carried for completeness of the own-variant family even
/// though authored grants are not observed to use it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    /// Create new documents under the resource.
    Create,

    /// Read documents under the resource.
    Read,

    /// Update existing documents under the resource.
    Update,

    /// Delete documents under the resource.
    Delete,

    /// Create, restricted to documents the client will own.
    CreateOwn,

    /// Read, restricted to documents the client owns.
    ReadOwn,

    /// Update, restricted to documents the client owns.
    UpdateOwn,

    /// Delete, restricted to documents the client owns.
    DeleteOwn,
}

impl Operation {
    /// Get the wire-format string representation of the operation.
    ///
    /// These are the exact keys used in stored access matrices.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::CreateOwn => "createOwn",
            Operation::ReadOwn => "readOwn",
            Operation::UpdateOwn => "updateOwn",
            Operation::DeleteOwn => "deleteOwn",
        }
    }

    /// Parse an operation from its wire-format name.
    ///
    /// # Example
    ///
    /// ```
    /// use acl_core::Operation;
    ///
    /// assert_eq!(Operation::parse("read"), Some(Operation::Read));
    /// assert_eq!(Operation::parse("readOwn"), Some(Operation::ReadOwn));
    /// assert_eq!(Operation::parse("readown"), None); // case-sensitive wire names
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Operation::Create),
            "read" => Some(Operation::Read),
            "update" => Some(Operation::Update),
            "delete" => Some(Operation::Delete),
            "createOwn" => Some(Operation::CreateOwn),
            "readOwn" => Some(Operation::ReadOwn),
            "updateOwn" => Some(Operation::UpdateOwn),
            "deleteOwn" => Some(Operation::DeleteOwn),
            _ => None,
        }
    }

    /// Get all operations, in their canonical order.
    pub fn all() -> [Self; 8] {
        [
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
            Operation::CreateOwn,
            Operation::ReadOwn,
            Operation::UpdateOwn,
            Operation::DeleteOwn,
        ]
    }

    /// Check if this is an "own records only" variant.
    pub fn is_own(&self) -> bool {
        matches!(
            self,
            Operation::CreateOwn
                | Operation::ReadOwn
                | Operation::UpdateOwn
                | Operation::DeleteOwn
        )
    }

    /// Get the unrestricted base operation for an own-variant.
    ///
    /// Base operations return themselves.
    ///
    /// # Example
    ///
    /// ```
    /// use acl_core::Operation;
    ///
    /// assert_eq!(Operation::ReadOwn.base(), Operation::Read);
    /// assert_eq!(Operation::Read.base(), Operation::Read);
    /// ```
    pub fn base(&self) -> Self {
        match self {
            Operation::CreateOwn => Operation::Create,
            Operation::ReadOwn => Operation::Read,
            Operation::UpdateOwn => Operation::Update,
            Operation::DeleteOwn => Operation::Delete,
            other => *other,
        }
    }

    /// Check if this is a read-only operation.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Operation::Read | Operation::ReadOwn)
    }

    /// Check if this operation modifies data.
    pub fn is_write(&self) -> bool {
        !self.is_read_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_as_str() {
        assert_eq!(Operation::Create.as_str(), "create");
        assert_eq!(Operation::Read.as_str(), "read");
        assert_eq!(Operation::UpdateOwn.as_str(), "updateOwn");
        assert_eq!(Operation::DeleteOwn.as_str(), "deleteOwn");
    }

    #[test]
    fn test_operation_parse() {
        assert_eq!(Operation::parse("create"), Some(Operation::Create));
        assert_eq!(Operation::parse("deleteOwn"), Some(Operation::DeleteOwn));
        assert_eq!(Operation::parse("DELETE"), None);
        assert_eq!(Operation::parse("manage"), None);
    }

    #[test]
    fn test_parse_round_trips_every_operation() {
        for op in Operation::all() {
            assert_eq!(Operation::parse(op.as_str()), Some(op));
        }
    }

    #[test]
    fn test_operation_base() {
        assert_eq!(Operation::CreateOwn.base(), Operation::Create);
        assert_eq!(Operation::ReadOwn.base(), Operation::Read);
        assert_eq!(Operation::UpdateOwn.base(), Operation::Update);
        assert_eq!(Operation::DeleteOwn.base(), Operation::Delete);
        assert_eq!(Operation::Create.base(), Operation::Create);
    }

    #[test]
    fn test_is_own() {
        assert!(Operation::ReadOwn.is_own());
        assert!(Operation::CreateOwn.is_own());
        assert!(!Operation::Read.is_own());
        assert!(!Operation::Delete.is_own());
    }

    #[test]
    fn test_read_write_split() {
        assert!(Operation::Read.is_read_only());
        assert!(Operation::ReadOwn.is_read_only());
        assert!(Operation::Create.is_write());
        assert!(Operation::UpdateOwn.is_write());
    }

    #[test]
    fn test_all_operations_count() {
        assert_eq!(Operation::all().len(), 8);
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&Operation::ReadOwn).unwrap();
        assert_eq!(json, "\"readOwn\"");
        let op: Operation = serde_json::from_str("\"createOwn\"").unwrap();
        assert_eq!(op, Operation::CreateOwn);
    }
}
