//! # Access Compositor
//!
//! Folds a client's direct grants together with every role it holds
//! (inheritance included) into the effective access matrix per resource.
//!
//! The composition itself is pure and synchronous: the async engine facade
//! fetches the client record and captures a role snapshot first, then runs
//! the same [`compose`]/[`compose_all`] functions the tests exercise
//! directly.

use std::collections::BTreeMap;

use acl_core::{AccessMatrix, Client};

use crate::error::EngineResult;
use crate::registry::ResourceRegistry;
use crate::resolver::{ResourceGrants, RoleResolver};
use crate::store::{ClientStore, RoleSnapshot, RoleStore};

/// Compute a client's effective access matrix for one resource.
///
/// Reduces over every contributing source, the resolved matrix of each
/// role the client holds plus the client's own direct grant, in a single
/// broadest-wins merge per operation, and drops whatever still resolves
/// to denied. The reduction considers all sources at once, so the result
/// does not depend on the order the sources are supplied in. Admin
/// clients short-circuit to a matrix granting every operation, for any
/// resource name whatsoever.
///
/// An unknown role name among `client.roles` contributes nothing.
///
/// # Example
///
/// ```
/// use acl_core::{AccessValue, Client, Operation, Role};
/// use acl_engine::{compose, RoleSnapshot};
///
/// let snapshot = RoleSnapshot::from_roles([
///     Role::new("editor").grant("some:resource", Operation::Read, AccessValue::Full),
/// ]);
/// let client = Client::new("svc").with_role("editor");
///
/// let matrix = compose(&client, "some:resource", &snapshot).unwrap();
/// assert!(matrix.get(Operation::Read).is_full());
/// ```
pub fn compose(
    client: &Client,
    resource: &str,
    snapshot: &RoleSnapshot,
) -> EngineResult<AccessMatrix> {
    if client.is_admin() {
        return Ok(AccessMatrix::full());
    }

    let mut resolver = RoleResolver::new(snapshot);
    let mut resolved = Vec::new();
    for role in &client.roles {
        if let Some(grants) = resolver.resolve(role)? {
            resolved.push(grants);
        }
    }

    let sources = resolved
        .iter()
        .filter_map(|grants| grants.get(resource))
        .chain(client.matrix(resource));
    let mut matrix = AccessMatrix::merge_all(sources);
    matrix.normalize();
    Ok(matrix)
}

/// Compute a client's effective access for every resource it can reach.
///
/// The resource set is the union of the client's direct grants and every
/// resolved role matrix; resources where every operation still resolves to
/// denied are omitted entirely.
///
/// Admin clients receive a full matrix for every *registered* resource.
/// Callers must treat an admin's absence from this listing as "allow", not
/// "deny": admin access is not limited to the registry, the registry
/// merely bounds what a listing can enumerate.
pub fn compose_all(
    client: &Client,
    snapshot: &RoleSnapshot,
    registry: &ResourceRegistry,
) -> EngineResult<ResourceGrants> {
    if client.is_admin() {
        return Ok(registry
            .names()
            .map(|name| (name.to_string(), AccessMatrix::full()))
            .collect());
    }

    let mut resolver = RoleResolver::new(snapshot);
    let mut resolved = Vec::new();
    for role in &client.roles {
        if let Some(grants) = resolver.resolve(role)? {
            resolved.push(grants);
        }
    }

    // Union of resource names across every source, then one n-ary
    // reduction per resource.
    let mut contributions: BTreeMap<&str, Vec<&AccessMatrix>> = BTreeMap::new();
    for grants in &resolved {
        for (resource, matrix) in grants {
            contributions.entry(resource.as_str()).or_default().push(matrix);
        }
    }
    for (resource, matrix) in &client.resources {
        contributions.entry(resource.as_str()).or_default().push(matrix);
    }

    let mut all = ResourceGrants::new();
    for (resource, matrices) in contributions {
        let mut merged = AccessMatrix::merge_all(matrices);
        merged.normalize();
        if !merged.is_empty() {
            all.insert(resource.to_string(), merged);
        }
    }
    Ok(all)
}

/// The access resolution engine.
///
/// Explicitly constructed with its collaborators injected (the resource
/// registry, the role store, and the client store), so there is no
/// process-wide implicit state. Each call fetches a fresh snapshot of the
/// records it needs and resolves against that snapshot alone; concurrent
/// calls never share resolution state.
///
/// Typical caller: an HTTP authorization middleware asking
/// [`AccessEngine::access_for`] before permitting a request, or a
/// discovery endpoint building a "what can I see" listing from
/// [`AccessEngine::access_map`].
#[derive(Debug)]
pub struct AccessEngine<R, C> {
    registry: ResourceRegistry,
    roles: R,
    clients: C,
}

impl<R: RoleStore, C: ClientStore> AccessEngine<R, C> {
    /// Create an engine over the given registry and stores.
    pub fn new(registry: ResourceRegistry, roles: R, clients: C) -> Self {
        Self {
            registry,
            roles,
            clients,
        }
    }

    /// Get the resource registry this engine validates listings against.
    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Check whether a client id belongs to an admin client.
    ///
    /// Unknown client ids are not admins.
    pub async fn is_admin(&self, client_id: &str) -> bool {
        match self.clients.fetch(client_id).await {
            Some(client) => client.is_admin(),
            None => false,
        }
    }

    /// Compute a client's effective access matrix for one resource.
    ///
    /// An unknown client id yields an empty (all-denied) matrix; whether
    /// that becomes a 401 or a 403 is the caller's decision.
    pub async fn access_for(&self, client_id: &str, resource: &str) -> EngineResult<AccessMatrix> {
        let Some(client) = self.clients.fetch(client_id).await else {
            tracing::debug!(client_id, "unknown client, composing no access");
            return Ok(AccessMatrix::new());
        };
        let snapshot = self.snapshot_for(&client).await;
        compose(&client, resource, &snapshot)
    }

    /// Compute a client's effective access for every reachable resource.
    ///
    /// An unknown client id yields an empty map.
    pub async fn access_map(&self, client_id: &str) -> EngineResult<ResourceGrants> {
        let Some(client) = self.clients.fetch(client_id).await else {
            return Ok(ResourceGrants::new());
        };
        let snapshot = self.snapshot_for(&client).await;
        compose_all(&client, &snapshot, &self.registry)
    }

    /// Capture the role snapshot one composition call runs against.
    ///
    /// Admin clients skip the fetch entirely; their composition never
    /// consults roles.
    async fn snapshot_for(&self, client: &Client) -> RoleSnapshot {
        if client.is_admin() {
            return RoleSnapshot::default();
        }
        RoleSnapshot::capture(&self.roles, client.roles.iter().cloned()).await
    }
}
