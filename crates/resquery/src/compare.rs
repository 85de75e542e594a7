//! Ordering between objects.
//!
//! A [`CompareFunc`] answers "does `left` sort after `right` for this field"
//! under a greater-than convention, so the natural order of a list is
//! descending. The list assembler swaps operands when ascending order is
//! requested.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::field::Field;
use crate::object::{Object, ObjectMeta};

type CompareFn<T> = dyn Fn(&T, &T, &Field) -> bool + Send + Sync;

/// A shareable "greater than" comparison over objects of type `T`.
pub struct CompareFunc<T: ?Sized>(Arc<CompareFn<T>>);

impl<T: ?Sized + 'static> CompareFunc<T> {
    /// Wraps a closure returning `true` when `left` is greater than `right`.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T, &T, &Field) -> bool + Send + Sync + 'static,
    {
        CompareFunc(Arc::new(f))
    }
}

impl<T: ?Sized> CompareFunc<T> {
    /// Returns `true` if `left` is greater than `right` for `field`.
    pub fn greater(&self, left: &T, right: &T, field: &Field) -> bool {
        (self.0)(left, right, field)
    }

    /// Converts the greater-than answer into an [`Ordering`] for sorting.
    ///
    /// Descending puts the greater object first; ascending swaps the
    /// operands so the result is the exact reverse. Pairs the function
    /// cannot order compare as equal and keep their relative position.
    pub fn ordering(&self, left: &T, right: &T, field: &Field, ascending: bool) -> Ordering {
        let (left, right) = if ascending { (right, left) } else { (left, right) };
        if self.greater(left, right, field) {
            Ordering::Less
        } else if self.greater(right, left, field) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl<T: ?Sized> Clone for CompareFunc<T> {
    fn clone(&self) -> Self {
        CompareFunc(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for CompareFunc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareFunc").finish_non_exhaustive()
    }
}

/// The metadata comparator used when no custom comparator is supplied.
pub fn default_compare<T: Object + ?Sized + 'static>() -> CompareFunc<T> {
    CompareFunc::new(|left: &T, right: &T, field| {
        match (left.object_meta(), right.object_meta()) {
            (Some(left), Some(right)) => object_meta_compare(left, right, field),
            _ => false,
        }
    })
}

/// Orders by name only, alphabetically first under the default direction.
pub fn name_compare<T: Object + ?Sized + 'static>() -> CompareFunc<T> {
    CompareFunc::new(|left: &T, right: &T, _field| {
        match (left.object_meta(), right.object_meta()) {
            (Some(left), Some(right)) => left.name < right.name,
            _ => false,
        }
    })
}

/// Returns `true` if `left` is greater than `right` for `sort_by`.
///
/// Creation time ties are broken by name so the order is total and stable
/// across calls. Unknown fields give no ordering.
pub fn object_meta_compare(left: &ObjectMeta, right: &ObjectMeta, sort_by: &Field) -> bool {
    match sort_by {
        Field::Name => left.name > right.name,
        Field::CreationTimestamp => {
            if left.creation_timestamp == right.creation_timestamp {
                left.name > right.name
            } else {
                left.creation_timestamp > right.creation_timestamp
            }
        }
        _ => false,
    }
}
