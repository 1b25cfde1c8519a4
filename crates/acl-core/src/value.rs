//! # Access Values
//!
//! The granted permission for a single operation, and the broadest-wins
//! merge that combines grants from multiple sources (direct client grants,
//! each role, each ancestor role) into one effective value.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;

/// A single directive in a field projection.
///
/// Projections are authored uniformly: every field in one projection is
/// either included (`1`) or excluded (`0`). Mixed projections only arise
/// transiently inside the merge algorithm and are collapsed before they
/// are ever returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldRule {
    /// Hide this field (`0` on the wire).
    Exclude,
    /// Show this field (`1` on the wire).
    Include,
}

impl FieldRule {
    /// Get the wire-format integer for this rule.
    pub fn as_u8(&self) -> u8 {
        match self {
            FieldRule::Exclude => 0,
            FieldRule::Include => 1,
        }
    }
}

impl Serialize for FieldRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for FieldRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u64::deserialize(deserializer)? {
            0 => Ok(FieldRule::Exclude),
            1 => Ok(FieldRule::Include),
            n => Err(de::Error::custom(format!(
                "field projection value must be 0 or 1, got {n}"
            ))),
        }
    }
}

/// The fields of a [`AccessValue::Projected`] grant.
pub type FieldProjection = BTreeMap<String, FieldRule>;

/// The effective permission for one operation on one resource.
///
/// Stored grants author this as plain JSON: `false` (denied), `true`
/// (unconditional), `{"filter": {...}}` (restricted to matching documents)
/// or `{"fields": {"name": 0|1, ...}}` (restricted to a field projection).
/// The serde implementation speaks exactly that shape.
///
/// # Merging
///
/// Values combine under a broadest-wins policy: [`AccessValue::merge_all`]
/// reduces any number of contributing sources to the least restrictive
/// outcome, independent of the order the sources are supplied in.
/// [`AccessValue::merge`] is the two-value form of the same policy.
///
/// # Example
///
/// ```
/// use acl_core::AccessValue;
///
/// let value: AccessValue = serde_json::from_str("true").unwrap();
/// assert_eq!(value, AccessValue::Full);
///
/// let value: AccessValue =
///     serde_json::from_str(r#"{"fields": {"title": 1}}"#).unwrap();
/// assert!(value.grants_access());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccessValue {
    /// No access. Unset operations in a matrix are implicitly denied.
    #[default]
    Denied,

    /// Unconditional access.
    Full,

    /// Access restricted to documents matching an opaque query object.
    ///
    /// The filter is not interpreted by this crate; it is carried verbatim
    /// to whatever datastore enforces it.
    Filtered(Json),

    /// Access restricted to a field projection.
    Projected(FieldProjection),
}

impl AccessValue {
    /// Build a projected value from field/rule pairs.
    ///
    /// # Example
    ///
    /// ```
    /// use acl_core::{AccessValue, FieldRule};
    ///
    /// let value = AccessValue::fields([("title", FieldRule::Include)]);
    /// assert!(value.grants_access());
    /// ```
    pub fn fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldRule)>,
        K: Into<String>,
    {
        AccessValue::Projected(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v))
                .collect(),
        )
    }

    /// Build a filtered value from an opaque query object.
    pub fn filter(filter: Json) -> Self {
        AccessValue::Filtered(filter)
    }

    /// Check if this value denies access entirely.
    pub fn is_denied(&self) -> bool {
        matches!(self, AccessValue::Denied)
    }

    /// Check if this value grants unconditional access.
    pub fn is_full(&self) -> bool {
        matches!(self, AccessValue::Full)
    }

    /// Check if this value grants any access at all.
    pub fn grants_access(&self) -> bool {
        !self.is_denied()
    }

    /// Combine two values into the broadest permission consistent with both.
    ///
    /// The rules, in priority order:
    ///
    /// 1. `Full` dominates everything: a source that grants unconditional
    ///    access is never narrowed by a more restrictive grant elsewhere.
    /// 2. `Denied` is the identity: any actual grant beats no grant.
    /// 3. Two projections merge field-wise; see [`AccessValue::merge_fields`].
    /// 4. `Filtered` combined with `Filtered` or `Projected` keeps the
    ///    right-hand value. No precedence between the two shapes has been
    ///    specified, so merge order for these combinations is
    ///    **not guaranteed** and must not be relied upon.
    ///
    /// This two-value form is commutative, but chaining it is *not*
    /// associative over projections: a field key dropped by the conflict
    /// rule in an early pairing can be re-introduced by a later source.
    /// Reductions over more than two sources must therefore go through
    /// [`AccessValue::merge_all`], which considers every source in a
    /// single pass.
    ///
    /// # Example
    ///
    /// ```
    /// use acl_core::AccessValue;
    ///
    /// assert_eq!(
    ///     AccessValue::Full.merge(AccessValue::Denied),
    ///     AccessValue::Full,
    /// );
    /// ```
    pub fn merge(self, other: AccessValue) -> AccessValue {
        use AccessValue::*;

        match (self, other) {
            (Full, _) | (_, Full) => Full,
            (Denied, v) | (v, Denied) => v,
            (Projected(a), Projected(b)) => Self::merge_fields(&a, &b),
            // Rule 4: unspecified precedence, last value wins.
            (_, v) => v,
        }
    }

    /// Reduce any number of contributing values to one effective value.
    ///
    /// This is the reduction applied over every contributing source for
    /// one (resource, operation) pair. Any `Full` source dominates, denied
    /// sources contribute nothing, and all projection sources collapse in
    /// one pass: a field key carrying conflicting directives across *any*
    /// pair of sources is dropped, so the result is the same whatever
    /// order the sources arrive in.
    ///
    /// The one exception is a multiset containing a `Filtered` value
    /// alongside other conditional grants: no precedence is specified
    /// there (see [`AccessValue::merge`], rule 4), so those reductions
    /// fall back to a left-to-right fold and their order is
    /// **not guaranteed**.
    ///
    /// # Example
    ///
    /// ```
    /// use acl_core::{AccessValue, FieldRule};
    ///
    /// let merged = AccessValue::merge_all([
    ///     AccessValue::fields([("fieldOne", FieldRule::Include)]),
    ///     AccessValue::fields([("fieldOne", FieldRule::Exclude)]),
    ///     AccessValue::fields([("fieldTwo", FieldRule::Include)]),
    /// ]);
    /// // fieldOne conflicts away; only fieldTwo survives.
    /// assert_eq!(
    ///     merged,
    ///     AccessValue::fields([("fieldTwo", FieldRule::Include)]),
    /// );
    /// ```
    pub fn merge_all<I>(values: I) -> AccessValue
    where
        I: IntoIterator<Item = AccessValue>,
    {
        let mut granting = Vec::new();
        let mut saw_filter = false;

        for value in values {
            match &value {
                AccessValue::Denied => continue,
                AccessValue::Full => return AccessValue::Full,
                AccessValue::Filtered(_) => saw_filter = true,
                AccessValue::Projected(_) => {}
            }
            granting.push(value);
        }

        if saw_filter {
            // Unspecified-precedence domain: documented last-wins fold.
            return granting
                .into_iter()
                .fold(AccessValue::Denied, AccessValue::merge);
        }
        if granting.is_empty() {
            return AccessValue::Denied;
        }

        let projections = granting.iter().map(|value| match value {
            AccessValue::Projected(fields) => fields,
            _ => unreachable!("non-projection survived the scan above"),
        });
        Self::merge_projections(projections)
    }

    /// Merge two field projections into the broadest surviving value.
    ///
    /// For each field named by either side:
    /// - If both sides name it with *conflicting* directives, the field is
    ///   dropped entirely: a field one source explicitly frees can never be
    ///   hidden by another source, so it ends up unrestricted.
    /// - Otherwise the field survives with its directive.
    ///
    /// The survivors then collapse:
    /// - No survivors at all means no restriction survives, which is
    ///   [`AccessValue::Full`], never an empty projection.
    /// - Survivors mixing inclusions and exclusions keep only the
    ///   exclusions. An inclusion projection ("show only these") is
    ///   strictly narrower than an exclusion projection ("show everything
    ///   but these"); once both shapes coexist the broader exclusion shape
    ///   wins and the inclusion entries are redundant.
    /// - A pure inclusion-only or exclusion-only survivor set is returned
    ///   unchanged.
    pub fn merge_fields(a: &FieldProjection, b: &FieldProjection) -> AccessValue {
        Self::merge_projections([a, b])
    }

    /// Collapse any number of projections in one order-independent pass.
    fn merge_projections<'p, I>(projections: I) -> AccessValue
    where
        I: IntoIterator<Item = &'p FieldProjection>,
    {
        // None marks a key seen with conflicting directives.
        let mut seen: BTreeMap<String, Option<FieldRule>> = BTreeMap::new();
        for projection in projections {
            for (key, rule) in projection {
                seen.entry(key.clone())
                    .and_modify(|slot| {
                        if *slot != Some(*rule) {
                            *slot = None;
                        }
                    })
                    .or_insert(Some(*rule));
            }
        }

        let mut survivors: FieldProjection = seen
            .into_iter()
            .filter_map(|(key, slot)| slot.map(|rule| (key, rule)))
            .collect();

        if survivors.is_empty() {
            return AccessValue::Full;
        }

        let has_include = survivors.values().any(|r| *r == FieldRule::Include);
        let has_exclude = survivors.values().any(|r| *r == FieldRule::Exclude);
        if has_include && has_exclude {
            survivors.retain(|_, r| *r == FieldRule::Exclude);
        }

        AccessValue::Projected(survivors)
    }
}

/// The authored JSON shape of an access value.
///
/// Kept separate from [`AccessValue`] so the public enum can carry a
/// distinct `Denied` variant while the wire keeps its boolean form.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Repr {
    Flag(bool),
    Projected { fields: FieldProjection },
    Filtered { filter: Json },
}

impl Serialize for AccessValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            AccessValue::Denied => Repr::Flag(false),
            AccessValue::Full => Repr::Flag(true),
            AccessValue::Projected(fields) => Repr::Projected {
                fields: fields.clone(),
            },
            AccessValue::Filtered(filter) => Repr::Filtered {
                filter: filter.clone(),
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AccessValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Flag(false) => AccessValue::Denied,
            Repr::Flag(true) => AccessValue::Full,
            Repr::Projected { fields } => AccessValue::Projected(fields),
            Repr::Filtered { filter } => AccessValue::Filtered(filter),
        })
    }
}
