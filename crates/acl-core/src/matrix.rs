//! # Access Matrices
//!
//! All operation grants for one resource. Matrices are sparse: an operation
//! with no entry is implicitly denied, and computed matrices never carry
//! explicit denials. Filling denials back in for presentation is the HTTP
//! layer's concern, not this crate's.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::operation::Operation;
use crate::value::AccessValue;

/// A sparse mapping from operation to granted access value.
///
/// Authored matrices may enumerate every operation (including explicit
/// `false` entries); resolved matrices are normalized so that only granting
/// entries remain.
///
/// # Example
///
/// ```
/// use acl_core::{AccessMatrix, AccessValue, Operation};
///
/// let mut matrix = AccessMatrix::new();
/// matrix.grant(Operation::Read, AccessValue::Full);
///
/// assert!(matrix.get(Operation::Read).is_full());
/// assert!(matrix.get(Operation::Delete).is_denied());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessMatrix {
    entries: BTreeMap<Operation, AccessValue>,
}

impl AccessMatrix {
    /// Create an empty (all-denied) matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matrix granting unconditional access to every operation.
    ///
    /// This is the admin bypass shape: admin clients receive this matrix
    /// for any resource, registered or not.
    pub fn full() -> Self {
        let mut matrix = Self::new();
        for op in Operation::all() {
            matrix.entries.insert(op, AccessValue::Full);
        }
        matrix
    }

    /// Set the granted value for an operation.
    pub fn grant(&mut self, operation: Operation, value: AccessValue) {
        self.entries.insert(operation, value);
    }

    /// Set the granted value for an operation, builder-style.
    pub fn with(mut self, operation: Operation, value: AccessValue) -> Self {
        self.grant(operation, value);
        self
    }

    /// Get the granted value for an operation.
    ///
    /// Unset operations are implicitly [`AccessValue::Denied`].
    pub fn get(&self, operation: Operation) -> &AccessValue {
        self.entries
            .get(&operation)
            .unwrap_or(&AccessValue::Denied)
    }

    /// Check whether any operation grants access.
    pub fn grants_anything(&self) -> bool {
        self.entries.values().any(AccessValue::grants_access)
    }

    /// Check whether the matrix has no entries at all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of materialized entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over the materialized entries.
    pub fn iter(&self) -> impl Iterator<Item = (Operation, &AccessValue)> {
        self.entries.iter().map(|(op, value)| (*op, value))
    }

    /// Reduce any number of matrices to one, operation by operation.
    ///
    /// Each operation's contributing values across every matrix combine in
    /// one [`AccessValue::merge_all`] pass, so the broadest grant always
    /// wins and the result is independent of the order the matrices are
    /// supplied in. Operations present in only some matrices keep their
    /// value (the others contribute an implicit denial).
    pub fn merge_all<'m, I>(matrices: I) -> AccessMatrix
    where
        I: IntoIterator<Item = &'m AccessMatrix>,
    {
        let mut contributions: BTreeMap<Operation, Vec<&'m AccessValue>> = BTreeMap::new();
        for matrix in matrices {
            for (op, value) in &matrix.entries {
                contributions.entry(*op).or_default().push(value);
            }
        }
        contributions
            .into_iter()
            .map(|(op, values)| (op, AccessValue::merge_all(values.into_iter().cloned())))
            .collect()
    }

    /// Drop every explicitly denied entry, restoring the sparse form.
    pub fn normalize(&mut self) {
        self.entries.retain(|_, value| value.grants_access());
    }
}

impl FromIterator<(Operation, AccessValue)> for AccessMatrix {
    fn from_iter<T: IntoIterator<Item = (Operation, AccessValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
