//! # Record Stores
//!
//! Fetch seams for the persisted role and client records, plus the
//! immutable snapshot the synchronous resolution core runs against.
//!
//! Fetching is async in practice (records live in a datastore), but all of
//! it happens *before* resolution begins: [`RoleSnapshot::capture`] pulls
//! the transitive inheritance closure once, and the resolver then works on
//! that snapshot without touching I/O. A store mutated mid-flight simply
//! does not affect an in-progress resolution.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;

use acl_core::{Client, Role};

/// Fetch seam for persisted role records.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Fetch a role by name. `None` when no such record exists.
    async fn fetch(&self, name: &str) -> Option<Role>;
}

/// Fetch seam for persisted client records.
#[async_trait]
pub trait ClientStore: Send + Sync {
    /// Fetch a client by id. `None` when no such record exists.
    async fn fetch(&self, client_id: &str) -> Option<Client>;
}

/// In-memory role store.
///
/// Suitable for single-process applications and testing. Production
/// deployments implement [`RoleStore`] over their actual datastore.
#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    roles: Arc<RwLock<HashMap<String, Role>>>,
}

impl MemoryRoleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a role record.
    pub async fn insert(&self, role: Role) {
        self.roles.write().await.insert(role.name.clone(), role);
    }

    /// Remove a role record.
    ///
    /// Returns `true` if a record was present.
    pub async fn remove(&self, name: &str) -> bool {
        self.roles.write().await.remove(name).is_some()
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn fetch(&self, name: &str) -> Option<Role> {
        self.roles.read().await.get(name).cloned()
    }
}

/// In-memory client store.
#[derive(Debug, Default)]
pub struct MemoryClientStore {
    clients: Arc<RwLock<HashMap<String, Client>>>,
}

impl MemoryClientStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a client record.
    pub async fn insert(&self, client: Client) {
        self.clients
            .write()
            .await
            .insert(client.client_id.clone(), client);
    }

    /// Remove a client record.
    ///
    /// Returns `true` if a record was present.
    pub async fn remove(&self, client_id: &str) -> bool {
        self.clients.write().await.remove(client_id).is_some()
    }
}

#[async_trait]
impl ClientStore for MemoryClientStore {
    async fn fetch(&self, client_id: &str) -> Option<Client> {
        self.clients.read().await.get(client_id).cloned()
    }
}

/// An immutable name-to-role map captured for one resolution call.
///
/// The snapshot holds the transitive `extends` closure of its seed roles,
/// so the resolver never needs the store again. Roles the store cannot
/// produce are simply absent; the resolver decides whether that absence is
/// benign (an unknown *seed* grants nothing) or an error (a dangling
/// `extends` reference).
#[derive(Debug, Clone, Default)]
pub struct RoleSnapshot {
    roles: HashMap<String, Role>,
}

impl RoleSnapshot {
    /// Capture the inheritance closure of `seeds` from a store.
    ///
    /// Walks `extends` edges breadth-first with a visited set, so the
    /// capture terminates even when the stored graph is cyclic. The cycle
    /// itself is reported later, by the resolver, not here.
    pub async fn capture<S, I, N>(store: &S, seeds: I) -> Self
    where
        S: RoleStore + ?Sized,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mut roles = HashMap::new();
        let mut visited = HashSet::new();
        let mut queue: VecDeque<String> = seeds.into_iter().map(Into::into).collect();

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name.clone()) {
                continue;
            }
            if let Some(role) = store.fetch(&name).await {
                if let Some(parent) = &role.extends {
                    queue.push_back(parent.clone());
                }
                roles.insert(name, role);
            }
        }

        Self { roles }
    }

    /// Build a snapshot directly from role records.
    ///
    /// Useful for tests and for callers that already hold the records.
    pub fn from_roles<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Self {
            roles: roles
                .into_iter()
                .map(|role| (role.name.clone(), role))
                .collect(),
        }
    }

    /// Look up a role by name.
    pub fn get(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }

    /// Number of roles captured.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
