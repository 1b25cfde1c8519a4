//! # ACL Core
//!
//! Permission data model for resource-scoped, role-inheriting access
//! control, shared by the resolution engine and any service that stores or
//! presents grants.
//!
//! ## Overview
//!
//! The acl-core crate defines:
//! - **Operations**: the closed set of eight operations grants are keyed by
//! - **Access values**: denied, full, filter-restricted, or
//!   field-projected permission for one operation
//! - **Access matrices**: all operation grants for one resource
//! - **Roles**: named, inheritable bundles of per-resource matrices
//! - **Clients**: API identities holding direct grants and role memberships
//!
//! ## Broadest-wins merging
//!
//! The heart of the crate is [`AccessValue::merge`]: combining grants from
//! any number of sources (a client's direct grant, each of its roles, each
//! ancestor of those roles) always yields the *least restrictive* outcome.
//! Unconditional access dominates, absent grants are the identity, and
//! conflicting field-projection directives free the field instead of
//! picking a winner.
//!
//! ```text
//! AccessValue = Denied | Full | Filtered{filter} | Projected{fields}
//!
//! Examples (authored JSON):
//!   true                          - unconditional access
//!   {"filter": {"owner": "me"}}   - only matching documents
//!   {"fields": {"title": 1}}      - only the projected fields
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use acl_core::{AccessMatrix, AccessValue, FieldRule, Operation};
//!
//! let role_grant = AccessValue::fields([("title", FieldRule::Include)]);
//! let direct_grant = AccessValue::Full;
//!
//! // Full dominates the narrower projection.
//! assert_eq!(role_grant.merge(direct_grant), AccessValue::Full);
//!
//! let mut matrix = AccessMatrix::new();
//! matrix.grant(Operation::Read, AccessValue::Full);
//! assert!(matrix.get(Operation::Read).is_full());
//! ```

pub mod client;
pub mod matrix;
pub mod operation;
pub mod role;
pub mod value;

// Re-export main types for convenience
pub use client::{AccessType, Client};
pub use matrix::AccessMatrix;
pub use operation::Operation;
pub use role::Role;
pub use value::{AccessValue, FieldProjection, FieldRule};
