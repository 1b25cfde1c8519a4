//! # ACL Engine
//!
//! Resource-scoped, role-inheriting access resolution for API clients.
//!
//! ## Overview
//!
//! Given a client identity (direct grants, role memberships, admin flag)
//! and the persisted role graph, the engine computes the single effective
//! permission for each (resource, operation) pair under a broadest-wins
//! policy. It *computes* the permission matrix; authenticating the caller
//! and enforcing the matrix against a request are its consumers' jobs.
//!
//! ## Architecture
//!
//! ```text
//! caller ──> AccessEngine (registry + stores injected)
//!              │ fetch client, capture RoleSnapshot   (async, before resolution)
//!              ▼
//!            compose / compose_all                     (pure, synchronous)
//!              │ RoleResolver: walk extends chains, fold with merge
//!              ▼
//!            sparse AccessMatrix per resource
//! ```
//!
//! Resolution is a pure function of the snapshot it runs against: the
//! resolver's memo is scoped to one call, the registry is read-only during
//! resolution, and concurrent calls share nothing. Callers needing strict
//! consistency fetch a fresh snapshot per request, which is exactly what
//! [`AccessEngine`] does.
//!
//! ## Usage
//!
//! ```rust
//! use acl_core::{AccessValue, Client, Operation, Role};
//! use acl_engine::{compose, RoleSnapshot};
//!
//! let snapshot = RoleSnapshot::from_roles([
//!     Role::new("editor").grant("collection:library_book", Operation::Read, AccessValue::Full),
//!     Role::new("administrator").extends("editor"),
//! ]);
//! let client = Client::new("reporting-service").with_role("administrator");
//!
//! let matrix = compose(&client, "collection:library_book", &snapshot).unwrap();
//! assert!(matrix.get(Operation::Read).is_full());
//! assert!(matrix.get(Operation::Delete).is_denied());
//! ```

pub mod compositor;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod store;

// Re-export main types for convenience
pub use compositor::{compose, compose_all, AccessEngine};
pub use error::{EngineError, EngineResult};
pub use registry::{ResourceRegistry, SYSTEM_RESOURCES};
pub use resolver::{ResourceGrants, RoleResolver};
pub use store::{ClientStore, MemoryClientStore, MemoryRoleStore, RoleSnapshot, RoleStore};
