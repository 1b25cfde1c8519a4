//! # Role Inheritance Resolver
//!
//! Produces a role's fully-resolved per-resource access, folding its whole
//! `extends` chain with the broadest-wins merge. The walk is iterative with
//! an explicit visited set, so cycle detection never depends on call-stack
//! depth.

use std::collections::{BTreeMap, HashSet};

use acl_core::AccessMatrix;

use crate::error::{EngineError, EngineResult};
use crate::store::RoleSnapshot;

/// Per-resource access matrices, as produced by resolution.
pub type ResourceGrants = BTreeMap<String, AccessMatrix>;

/// The raw matrices contributed by a role's chain, per resource.
type Contributions<'a> = BTreeMap<&'a str, Vec<&'a AccessMatrix>>;

/// Resolves role-inheritance chains against one captured snapshot.
///
/// A resolver is scoped to a single top-level resolution call: its memo of
/// already-resolved roles is shared by every role the same client holds
/// (sibling roles frequently share ancestors) and is discarded with the
/// resolver. Nothing is cached across calls.
///
/// # Example
///
/// ```
/// use acl_core::{AccessValue, Operation, Role};
/// use acl_engine::{RoleResolver, RoleSnapshot};
///
/// let snapshot = RoleSnapshot::from_roles([
///     Role::new("editor").grant("some:resource", Operation::Read, AccessValue::Full),
///     Role::new("administrator").extends("editor"),
/// ]);
///
/// let mut resolver = RoleResolver::new(&snapshot);
/// let resolved = resolver.resolve("administrator").unwrap().unwrap();
/// assert!(resolved["some:resource"].get(Operation::Read).is_full());
/// ```
#[derive(Debug)]
pub struct RoleResolver<'a> {
    snapshot: &'a RoleSnapshot,
    resolved: BTreeMap<String, ResourceGrants>,
    contributions: BTreeMap<String, Contributions<'a>>,
}

impl<'a> RoleResolver<'a> {
    /// Create a resolver over a captured snapshot.
    pub fn new(snapshot: &'a RoleSnapshot) -> Self {
        Self {
            snapshot,
            resolved: BTreeMap::new(),
            contributions: BTreeMap::new(),
        }
    }

    /// Resolve a role to its full per-resource access, inheritance included.
    ///
    /// Returns `Ok(None)` when the snapshot holds no role by that name: an
    /// unknown role reference grants nothing rather than failing, since
    /// distinguishing bad references from revoked ones is the write path's
    /// concern.
    ///
    /// # Errors
    ///
    /// - [`EngineError::CyclicRoleInheritance`] when the `extends` chain
    ///   revisits a name already on the walk.
    /// - [`EngineError::UnknownParentRole`] when a role names a parent the
    ///   snapshot cannot produce.
    pub fn resolve(&mut self, name: &str) -> EngineResult<Option<ResourceGrants>> {
        if let Some(cached) = self.resolved.get(name) {
            return Ok(Some(cached.clone()));
        }
        let snapshot = self.snapshot;
        let Some(start) = snapshot.get(name) else {
            return Ok(None);
        };

        // Walk self -> root, stopping early at any ancestor whose chain
        // contributions are already memoized.
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut cursor = start;
        let mut contributions = loop {
            if let Some(known) = self.contributions.get(cursor.name.as_str()) {
                break known.clone();
            }
            if !visited.insert(cursor.name.as_str()) {
                return Err(EngineError::CyclicRoleInheritance {
                    role: cursor.name.clone(),
                });
            }
            chain.push(cursor);
            match &cursor.extends {
                Some(parent) => {
                    cursor = snapshot.get(parent).ok_or_else(|| {
                        EngineError::UnknownParentRole {
                            role: cursor.name.clone(),
                            parent: parent.clone(),
                        }
                    })?;
                }
                None => break Contributions::new(),
            }
        };

        // Fold root -> self. Each role's resolved access reduces the raw
        // grants of its *entire* chain in one n-ary merge per resource, so
        // the result cannot depend on which chain segment merged first.
        // Both the raw contributions and the collapsed output of every
        // chain member are memoized for the lifetime of this resolver.
        let mut grants = ResourceGrants::new();
        for role in chain.iter().rev() {
            for (resource, matrix) in &role.resources {
                contributions
                    .entry(resource.as_str())
                    .or_default()
                    .push(matrix);
            }
            grants = collapse(&contributions);
            self.contributions
                .insert(role.name.clone(), contributions.clone());
            self.resolved.insert(role.name.clone(), grants.clone());
        }

        tracing::debug!(
            role = name,
            resources = grants.len(),
            chain = chain.len(),
            "resolved role inheritance chain"
        );

        Ok(Some(grants))
    }
}

/// Reduce raw chain contributions to sparse resolved matrices: one merge
/// pass per resource, no denied entries, no all-denied resources.
fn collapse(contributions: &Contributions<'_>) -> ResourceGrants {
    let mut grants = ResourceGrants::new();
    for (resource, matrices) in contributions {
        let mut merged = AccessMatrix::merge_all(matrices.iter().copied());
        merged.normalize();
        if !merged.is_empty() {
            grants.insert((*resource).to_string(), merged);
        }
    }
    grants
}

#[cfg(test)]
mod tests {
    use super::*;
    use acl_core::{AccessValue, FieldRule, Operation, Role};

    const BOOKS: &str = "collection:library_book";

    fn include(fields: &[&str]) -> AccessValue {
        AccessValue::fields(fields.iter().map(|f| (*f, FieldRule::Include)))
    }

    fn exclude(fields: &[&str]) -> AccessValue {
        AccessValue::fields(fields.iter().map(|f| (*f, FieldRule::Exclude)))
    }

    #[test]
    fn test_unknown_role_resolves_to_nothing() {
        let snapshot = RoleSnapshot::from_roles([]);
        let mut resolver = RoleResolver::new(&snapshot);
        assert_eq!(resolver.resolve("ghost").unwrap(), None);
    }

    #[test]
    fn test_role_without_parent_resolves_to_own_grants() {
        let snapshot = RoleSnapshot::from_roles([Role::new("editor").grant(
            BOOKS,
            Operation::Read,
            AccessValue::Full,
        )]);

        let mut resolver = RoleResolver::new(&snapshot);
        let grants = resolver.resolve("editor").unwrap().unwrap();

        assert!(grants[BOOKS].get(Operation::Read).is_full());
        assert!(grants[BOOKS].get(Operation::Delete).is_denied());
    }

    #[test]
    fn test_chain_inherits_ancestor_grants() {
        let snapshot = RoleSnapshot::from_roles([
            Role::new("viewer").grant(BOOKS, Operation::Read, AccessValue::Full),
            Role::new("editor")
                .extends("viewer")
                .grant(BOOKS, Operation::Update, AccessValue::Full),
            Role::new("administrator")
                .extends("editor")
                .grant(BOOKS, Operation::Delete, AccessValue::Full),
        ]);

        let mut resolver = RoleResolver::new(&snapshot);
        let grants = resolver.resolve("administrator").unwrap().unwrap();

        let matrix = &grants[BOOKS];
        assert!(matrix.get(Operation::Read).is_full());
        assert!(matrix.get(Operation::Update).is_full());
        assert!(matrix.get(Operation::Delete).is_full());
        assert!(matrix.get(Operation::Create).is_denied());
    }

    #[test]
    fn test_projection_conflict_across_chain_collapses_to_full() {
        // editor hides fieldOne, administrator shows it: the conflict frees
        // the field, nothing survives, and the resolved value is Full.
        let snapshot = RoleSnapshot::from_roles([
            Role::new("editor").grant(BOOKS, Operation::Read, exclude(&["fieldOne"])),
            Role::new("administrator")
                .extends("editor")
                .grant(BOOKS, Operation::Read, include(&["fieldOne"])),
        ]);

        let mut resolver = RoleResolver::new(&snapshot);
        let grants = resolver.resolve("administrator").unwrap().unwrap();

        assert!(grants[BOOKS].get(Operation::Read).is_full());
    }

    #[test]
    fn test_disjoint_projections_accumulate_down_the_chain() {
        let snapshot = RoleSnapshot::from_roles([
            Role::new("editor").grant(BOOKS, Operation::Read, include(&["fieldOne", "fieldTwo"])),
            Role::new("administrator")
                .extends("editor")
                .grant(BOOKS, Operation::Read, include(&["fieldThree"])),
        ]);

        let mut resolver = RoleResolver::new(&snapshot);
        let grants = resolver.resolve("administrator").unwrap().unwrap();

        assert_eq!(
            *grants[BOOKS].get(Operation::Read),
            include(&["fieldOne", "fieldTwo", "fieldThree"])
        );
    }

    #[test]
    fn test_chain_reduction_considers_every_ancestor_at_once() {
        // fieldOne and fieldTwo conflict between the two ancestors, which
        // frees both fields. A pairwise fold would collapse that pair to
        // Full and let it swallow the grandchild's exclusion; reducing the
        // whole chain at once keeps fieldThree restricted.
        let snapshot = RoleSnapshot::from_roles([
            Role::new("viewer").grant(BOOKS, Operation::Read, include(&["fieldOne", "fieldTwo"])),
            Role::new("editor")
                .extends("viewer")
                .grant(BOOKS, Operation::Read, exclude(&["fieldOne", "fieldTwo"])),
            Role::new("administrator")
                .extends("editor")
                .grant(BOOKS, Operation::Read, exclude(&["fieldThree"])),
        ]);

        let mut resolver = RoleResolver::new(&snapshot);
        let grants = resolver.resolve("administrator").unwrap().unwrap();

        assert_eq!(*grants[BOOKS].get(Operation::Read), exclude(&["fieldThree"]));

        // The intermediate ancestor still resolves to Full on its own.
        let editor = resolver.resolve("editor").unwrap().unwrap();
        assert!(editor[BOOKS].get(Operation::Read).is_full());
    }

    #[test]
    fn test_explicit_denials_do_not_survive_resolution() {
        let snapshot = RoleSnapshot::from_roles([Role::new("editor")
            .grant(BOOKS, Operation::Read, AccessValue::Full)
            .grant(BOOKS, Operation::Delete, AccessValue::Denied)
            .grant("collection:empty", Operation::Read, AccessValue::Denied)]);

        let mut resolver = RoleResolver::new(&snapshot);
        let grants = resolver.resolve("editor").unwrap().unwrap();

        assert_eq!(grants[BOOKS].len(), 1);
        assert!(!grants.contains_key("collection:empty"));
    }

    #[test]
    fn test_two_role_cycle_is_detected() {
        let snapshot = RoleSnapshot::from_roles([
            Role::new("child").extends("parent"),
            Role::new("parent").extends("child"),
        ]);

        let mut resolver = RoleResolver::new(&snapshot);
        let err = resolver.resolve("child").unwrap_err();

        assert_eq!(
            err,
            EngineError::CyclicRoleInheritance {
                role: "child".to_string()
            }
        );
    }

    #[test]
    fn test_self_extending_role_is_detected() {
        let snapshot = RoleSnapshot::from_roles([Role::new("ouroboros").extends("ouroboros")]);

        let mut resolver = RoleResolver::new(&snapshot);
        let err = resolver.resolve("ouroboros").unwrap_err();

        assert_eq!(
            err,
            EngineError::CyclicRoleInheritance {
                role: "ouroboros".to_string()
            }
        );
    }

    #[test]
    fn test_dangling_parent_is_an_error() {
        let snapshot = RoleSnapshot::from_roles([Role::new("editor").extends("ghost")]);

        let mut resolver = RoleResolver::new(&snapshot);
        let err = resolver.resolve("editor").unwrap_err();

        assert_eq!(
            err,
            EngineError::UnknownParentRole {
                role: "editor".to_string(),
                parent: "ghost".to_string(),
            }
        );
    }

    #[test]
    fn test_sibling_roles_share_memoized_ancestors() {
        let snapshot = RoleSnapshot::from_roles([
            Role::new("base").grant(BOOKS, Operation::Read, AccessValue::Full),
            Role::new("left").extends("base"),
            Role::new("right").extends("base"),
        ]);

        let mut resolver = RoleResolver::new(&snapshot);
        let left = resolver.resolve("left").unwrap().unwrap();
        let right = resolver.resolve("right").unwrap().unwrap();

        assert_eq!(left, right);
        assert!(left[BOOKS].get(Operation::Read).is_full());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let snapshot = RoleSnapshot::from_roles([
            Role::new("editor").grant(BOOKS, Operation::Read, include(&["fieldOne"])),
            Role::new("administrator")
                .extends("editor")
                .grant(BOOKS, Operation::Read, include(&["fieldTwo"])),
        ]);

        let first = RoleResolver::new(&snapshot)
            .resolve("administrator")
            .unwrap();
        let second = RoleResolver::new(&snapshot)
            .resolve("administrator")
            .unwrap();

        assert_eq!(first, second);
    }
}
