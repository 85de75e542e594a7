//! Per-object predicates.
//!
//! A [`FilterFunc`] is evaluated once per `(object, field)` pair; an object is
//! kept only if every filter in the query passes. Filter functions compose
//! with [`and`] and [`or`], where a missing operand stands in for the identity
//! of the operation (always-true for AND, always-false for OR).
//!
//! # Label expressions
//!
//! The `label` and `annotation` fields take a small expression language:
//!
//! ```text
//! key=value        key present with exactly this value
//! key=*            key present with any value
//! key              same as key=*
//! key!=value       key present with a different value
//! a=1,b!=2,c       all clauses must hold
//! ```
//!
//! `key!=value` requires the key to exist. An object without the key does
//! not satisfy it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::field::Field;
use crate::object::{Object, ObjectMeta};

/// A single `(field, value)` predicate instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter<'a> {
    pub field: &'a Field,
    pub value: &'a str,
}

impl<'a> Filter<'a> {
    pub fn new(field: &'a Field, value: &'a str) -> Self {
        Filter { field, value }
    }
}

type FilterFn<T> = dyn Fn(&T, &Filter<'_>) -> bool + Send + Sync;

/// A shareable predicate over objects of type `T`.
pub struct FilterFunc<T: ?Sized>(Arc<FilterFn<T>>);

impl<T: ?Sized + 'static> FilterFunc<T> {
    /// Wraps a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T, &Filter<'_>) -> bool + Send + Sync + 'static,
    {
        FilterFunc(Arc::new(f))
    }

    /// Identity for [`and`].
    pub fn always_true() -> Self {
        FilterFunc::new(|_, _| true)
    }

    /// Identity for [`or`].
    pub fn always_false() -> Self {
        FilterFunc::new(|_, _| false)
    }

    /// `self && other`; a missing `other` is always-true.
    pub fn and(self, other: impl Into<Option<FilterFunc<T>>>) -> Self {
        and(Some(self), other.into())
    }

    /// `self || other`; a missing `other` is always-false.
    pub fn or(self, other: impl Into<Option<FilterFunc<T>>>) -> Self {
        or(Some(self), other.into())
    }
}

impl<T: ?Sized> FilterFunc<T> {
    /// Evaluates the predicate.
    pub fn matches(&self, object: &T, filter: &Filter<'_>) -> bool {
        (self.0)(object, filter)
    }
}

impl<T: ?Sized> Clone for FilterFunc<T> {
    fn clone(&self) -> Self {
        FilterFunc(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for FilterFunc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterFunc").finish_non_exhaustive()
    }
}

/// Logical AND of two optional filters.
pub fn and<T: ?Sized + 'static>(
    left: Option<FilterFunc<T>>,
    right: Option<FilterFunc<T>>,
) -> FilterFunc<T> {
    let left = left.unwrap_or_else(FilterFunc::always_true);
    let right = right.unwrap_or_else(FilterFunc::always_true);
    FilterFunc::new(move |object, filter| {
        left.matches(object, filter) && right.matches(object, filter)
    })
}

/// Logical OR of two optional filters.
pub fn or<T: ?Sized + 'static>(
    left: Option<FilterFunc<T>>,
    right: Option<FilterFunc<T>>,
) -> FilterFunc<T> {
    let left = left.unwrap_or_else(FilterFunc::always_false);
    let right = right.unwrap_or_else(FilterFunc::always_false);
    FilterFunc::new(move |object, filter| {
        left.matches(object, filter) || right.matches(object, filter)
    })
}

/// The metadata filter used when no custom filter is supplied.
///
/// Objects without metadata never pass.
pub fn default_filter<T: Object + ?Sized + 'static>() -> FilterFunc<T> {
    FilterFunc::new(|object: &T, filter| match object.object_meta() {
        Some(meta) => object_meta_filter(meta, filter),
        None => false,
    })
}

/// Evaluates one filter against standard metadata.
///
/// Fields this function does not know about always pass.
pub fn object_meta_filter(meta: &ObjectMeta, filter: &Filter<'_>) -> bool {
    let value = filter.value;
    match filter.field {
        // ?names=a,b,c
        Field::Names => value.split(',').any(|name| meta.name == name),
        // ?name=build
        Field::Name => meta.name.contains(value),
        Field::Uid => meta.uid == value,
        Field::Namespace => meta.namespace == value,
        Field::OwnerReference => meta.owner_references.iter().any(|owner| owner.uid == value),
        Field::OwnerKind => meta.owner_references.iter().any(|owner| owner.kind == value),
        // ?label=devops.kubesphere.io/creator=admin,app
        Field::Label => labels_match(&meta.labels, value),
        Field::Annotation => labels_match(&meta.annotations, value),
        _ => true,
    }
}

/// Evaluates a comma-separated label expression; every clause must hold.
pub fn labels_match(labels: &BTreeMap<String, String>, expr: &str) -> bool {
    expr.split(',')
        .all(|clause| label_match(labels, clause.trim()))
}

fn label_match(labels: &BTreeMap<String, String>, clause: &str) -> bool {
    let (key, value, negated) = match clause.split_once('=') {
        Some((key, value)) => match key.strip_suffix('!') {
            Some(key) => (key, value, true),
            None => (key, value, false),
        },
        None => (clause, "*", false),
    };

    match labels.get(key) {
        None => false,
        Some(actual) if negated => actual != value,
        Some(actual) => value == "*" || actual == value,
    }
}
