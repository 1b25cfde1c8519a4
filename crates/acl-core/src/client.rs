//! # Clients
//!
//! An API client identity: direct per-resource grants, role memberships,
//! and an access type that distinguishes ordinary users from admins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::{BTreeMap, BTreeSet};

use crate::matrix::AccessMatrix;
use crate::operation::Operation;
use crate::value::AccessValue;

/// The kind of access a client holds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    /// Unconditional access to every operation on every resource.
    /// Short-circuits all role and grant resolution.
    Admin,

    /// Access computed from direct grants and role memberships.
    #[default]
    User,
}

impl AccessType {
    /// Get the string representation of the access type.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Admin => "admin",
            AccessType::User => "user",
        }
    }
}

/// An API client record.
///
/// Client records are persisted and mutated by administrative code
/// elsewhere; the resolution engine only ever reads snapshots of them.
///
/// # Example
///
/// ```
/// use acl_core::{AccessType, AccessValue, Client, Operation};
///
/// let client = Client::new("reporting-service")
///     .with_role("editor")
///     .grant("collection:report", Operation::Read, AccessValue::Full);
///
/// assert!(!client.is_admin());
/// assert!(client.roles.contains("editor"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier.
    pub client_id: String,

    /// Whether this client is an admin or an ordinary user.
    #[serde(default)]
    pub access_type: AccessType,

    /// Names of the roles this client holds.
    #[serde(default)]
    pub roles: BTreeSet<String>,

    /// Direct per-resource grants, independent of any role.
    #[serde(default)]
    pub resources: BTreeMap<String, AccessMatrix>,

    /// Opaque application data attached to the client.
    #[serde(default)]
    pub data: Json,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Creates a new ordinary-user client with no grants and no roles.
    pub fn new(client_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            client_id: client_id.into(),
            access_type: AccessType::User,
            roles: BTreeSet::new(),
            resources: BTreeMap::new(),
            data: Json::Null,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates a new admin client.
    pub fn admin(client_id: impl Into<String>) -> Self {
        let mut client = Self::new(client_id);
        client.access_type = AccessType::Admin;
        client
    }

    /// Check if this client bypasses access resolution entirely.
    pub fn is_admin(&self) -> bool {
        self.access_type == AccessType::Admin
    }

    /// Add a role membership, builder-style.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    /// Add a direct grant for one operation on one resource, builder-style.
    pub fn grant(
        mut self,
        resource: impl Into<String>,
        operation: Operation,
        value: AccessValue,
    ) -> Self {
        self.resources
            .entry(resource.into())
            .or_default()
            .grant(operation, value);
        self.updated_at = Utc::now();
        self
    }

    /// Get this client's direct (role-independent) matrix for a resource.
    pub fn matrix(&self, resource: &str) -> Option<&AccessMatrix> {
        self.resources.get(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client_is_user() {
        let client = Client::new("svc");
        assert_eq!(client.access_type, AccessType::User);
        assert!(!client.is_admin());
    }

    #[test]
    fn test_admin_constructor() {
        let client = Client::admin("root");
        assert!(client.is_admin());
    }

    #[test]
    fn test_direct_grants() {
        let client = Client::new("svc").grant(
            "collection:book",
            Operation::Read,
            AccessValue::Full,
        );
        let matrix = client.matrix("collection:book").unwrap();
        assert!(matrix.get(Operation::Read).is_full());
        assert!(client.matrix("collection:other").is_none());
    }

    #[test]
    fn test_serde_access_type_names() {
        assert_eq!(
            serde_json::to_string(&AccessType::Admin).unwrap(),
            "\"admin\""
        );
        let parsed: AccessType = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, AccessType::User);
    }

    #[test]
    fn test_serde_defaults_to_user() {
        let client: Client = serde_json::from_value(serde_json::json!({
            "client_id": "svc",
            "created_at": "2026-01-10T00:00:00Z",
            "updated_at": "2026-01-10T00:00:00Z",
        }))
        .unwrap();

        assert_eq!(client.access_type, AccessType::User);
        assert!(client.roles.is_empty());
        assert!(client.data.is_null());
    }
}
