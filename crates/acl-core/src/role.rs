//! # Roles
//!
//! A role is a named, inheritable bundle of per-resource access matrices.
//! Roles form a forest via `extends`: a role has at most one parent and its
//! resolved access is the broadest-wins fold of its whole ancestor chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::matrix::AccessMatrix;
use crate::operation::Operation;
use crate::value::AccessValue;

/// A named bundle of per-resource grants, optionally extending a parent role.
///
/// Role records are persisted and mutated by administrative code elsewhere;
/// the resolution engine only ever reads snapshots of them. The `extends`
/// chain must terminate; cycles are rejected at resolution time.
///
/// # Example
///
/// ```
/// use acl_core::{AccessValue, Operation, Role};
///
/// let editor = Role::new("editor")
///     .grant("collection:library_book", Operation::Read, AccessValue::Full);
/// let admin = Role::new("administrator").extends("editor");
///
/// assert_eq!(admin.extends.as_deref(), Some("editor"));
/// assert!(editor.resources.contains_key("collection:library_book"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Unique, immutable role name.
    pub name: String,

    /// Parent role this role inherits from, if any.
    #[serde(default)]
    pub extends: Option<String>,

    /// Per-resource grants owned by this role itself (not inherited).
    #[serde(default)]
    pub resources: BTreeMap<String, AccessMatrix>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Role {
    /// Creates a new role with no parent and no grants.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            extends: None,
            resources: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the parent role, builder-style.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Add a grant for one operation on one resource, builder-style.
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

    /// Get this role's own (non-inherited) matrix for a resource.
    pub fn matrix(&self, resource: &str) -> Option<&AccessMatrix> {
        self.resources.get(resource)
    }
}
