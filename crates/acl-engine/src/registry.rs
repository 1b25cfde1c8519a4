//! # Resource Registry
//!
//! Catalog of the resource names grants may reference. Schema-loading code
//! registers one resource per managed collection at startup, alongside a
//! small set of fixed system resources; after that the registry is
//! read-only for the lifetime of the process.

use std::collections::{BTreeMap, HashMap};

/// The fixed system resources every deployment carries.
pub const SYSTEM_RESOURCES: [(&str, &str); 2] = [
    ("clients", "API client records"),
    ("roles", "Role records"),
];

/// In-memory catalog of valid resource names and their descriptions.
///
/// Resource names are namespaced strings such as
/// `"collection:library_book"`. Re-registering a name overwrites its
/// description; registration is idempotent and last-write-wins.
///
/// Validation of grants against the registry happens on the write path
/// that stores role and client records; the resolution engine itself
/// tolerates grants against unregistered names and simply resolves what it
/// is given.
///
/// # Example
///
/// ```
/// use acl_engine::ResourceRegistry;
///
/// let mut registry = ResourceRegistry::new();
/// registry.register("collection:library_book", Some("Library books"));
///
/// assert!(registry.has("collection:library_book"));
/// assert!(!registry.has("collection:unknown"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, Option<String>>,
}

impl ResourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with the fixed system resources.
    pub fn with_system_resources() -> Self {
        let mut registry = Self::new();
        for (name, description) in SYSTEM_RESOURCES {
            registry.register(name, Some(description));
        }
        registry
    }

    /// Register a resource, overwriting any previous description.
    pub fn register(&mut self, name: impl Into<String>, description: Option<impl Into<String>>) {
        self.resources
            .insert(name.into(), description.map(Into::into));
    }

    /// Check if a resource name is registered.
    pub fn has(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Get the description registered for a resource, if any.
    pub fn describe(&self, name: &str) -> Option<&str> {
        self.resources.get(name)?.as_deref()
    }

    /// Get every registered resource with its description, sorted by name.
    pub fn all(&self) -> BTreeMap<&str, Option<&str>> {
        self.resources
            .iter()
            .map(|(name, description)| (name.as_str(), description.as_deref()))
            .collect()
    }

    /// Iterate over the registered resource names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
