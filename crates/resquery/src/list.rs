//! The list pipeline: filter, sort, paginate, transform, package.
//!
//! [`default_list`] is the low-level entry point taking explicit functions;
//! [`to_list_result`] takes a [`ListHandler`] bundling them.
//!
//! ```text
//! objects ──drop absent──▶ filter (all query filters) ──▶ stable sort
//!         ──▶ total = len ──▶ slice [start, end) ──▶ transforms ──▶ ListResult
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::compare::{default_compare, CompareFunc};
use crate::filter::{default_filter, Filter, FilterFunc};
use crate::object::Object;
use crate::query::Query;

/// One page of results plus the number of items that passed the filters.
///
/// Serializes as `{"items": [...], "totalItems": n}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<I> {
    pub items: Vec<I>,
    /// Count after filtering, before pagination.
    pub total_items: usize,
}

impl<I> ListResult<I> {
    pub fn new(items: Vec<I>, total_items: usize) -> Self {
        ListResult { items, total_items }
    }

    pub fn empty() -> Self {
        ListResult::new(Vec::new(), 0)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps items while preserving the total.
    pub fn map_items<U>(self, f: impl FnMut(I) -> U) -> ListResult<U> {
        ListResult {
            items: self.items.into_iter().map(f).collect(),
            total_items: self.total_items,
        }
    }
}

/// Output of a transform.
///
/// An `Object` is handed to the next transform in the chain; a `Value` is an
/// opaque projection and the next transform still sees the last object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Transformed<T> {
    Object(T),
    Value(serde_json::Value),
}

impl<T> Transformed<T> {
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Transformed::Object(object) => Some(object),
            Transformed::Value(_) => None,
        }
    }

    pub fn into_object(self) -> Option<T> {
        match self {
            Transformed::Object(object) => Some(object),
            Transformed::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Transformed::Object(_) => None,
            Transformed::Value(value) => Some(value),
        }
    }
}

type TransformFn<T> = dyn Fn(&T) -> Transformed<T> + Send + Sync;

/// A per-item projection applied after pagination.
pub struct TransformFunc<T>(Arc<TransformFn<T>>);

impl<T: 'static> TransformFunc<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&T) -> Transformed<T> + Send + Sync + 'static,
    {
        TransformFunc(Arc::new(f))
    }

    /// Wraps a projection that never yields another object.
    pub fn project<F>(f: F) -> Self
    where
        F: Fn(&T) -> serde_json::Value + Send + Sync + 'static,
    {
        TransformFunc::new(move |object| Transformed::Value(f(object)))
    }
}

impl<T> TransformFunc<T> {
    pub fn apply(&self, object: &T) -> Transformed<T> {
        (self.0)(object)
    }
}

impl<T> Clone for TransformFunc<T> {
    fn clone(&self) -> Self {
        TransformFunc(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for TransformFunc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformFunc").finish_non_exhaustive()
    }
}

/// Keeps each object as is.
pub fn no_transform<T: Clone + 'static>() -> TransformFunc<T> {
    TransformFunc::new(|object: &T| Transformed::Object(object.clone()))
}

/// The comparator, filter and transform used to list one kind of resource.
pub trait ListHandler<T> {
    fn comparator(&self) -> CompareFunc<T>;
    fn filter(&self) -> FilterFunc<T>;
    fn transformer(&self) -> TransformFunc<T>;
}

/// Metadata comparator and filter, identity transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultListHandler;

impl<T: Object + Clone + 'static> ListHandler<T> for DefaultListHandler {
    fn comparator(&self) -> CompareFunc<T> {
        default_compare()
    }

    fn filter(&self) -> FilterFunc<T> {
        default_filter()
    }

    fn transformer(&self) -> TransformFunc<T> {
        no_transform()
    }
}

/// Lists `objects` with `handler`, or [`DefaultListHandler`] when `None`.
pub fn to_list_result<T>(
    objects: &[T],
    query: &Query,
    handler: Option<&dyn ListHandler<T>>,
) -> ListResult<Transformed<T>>
where
    T: Object + Clone + 'static,
{
    let handler = handler.unwrap_or(&DefaultListHandler);
    default_list(
        objects,
        query,
        Some(&handler.comparator()),
        Some(&handler.filter()),
        &[handler.transformer()],
    )
}

/// Runs the list pipeline.
///
/// - A missing `filter` keeps every present object.
/// - A missing `compare` keeps the input order.
/// - An empty `transforms` slice keeps each object as is.
///
/// Caller-supplied functions are trusted; a panicking function is not caught.
pub fn default_list<T>(
    objects: &[T],
    query: &Query,
    compare: Option<&CompareFunc<T>>,
    filter: Option<&FilterFunc<T>>,
    transforms: &[TransformFunc<T>],
) -> ListResult<Transformed<T>>
where
    T: Object + Clone,
{
    let mut kept: Vec<&T> = Vec::with_capacity(objects.len());
    let mut absent = 0usize;
    for object in objects {
        if object.is_absent() {
            absent += 1;
            continue;
        }
        let selected = filter.map_or(true, |filter| {
            query
                .filters
                .iter()
                .all(|(field, value)| filter.matches(object, &Filter::new(field, value)))
        });
        if selected {
            kept.push(object);
        }
    }
    if absent > 0 {
        trace!(absent, "dropped absent objects");
    }

    if let Some(compare) = compare {
        stable_sort_by(&mut kept, &mut |a: &&T, b: &&T| {
            compare.ordering(a, b, &query.sort_by, query.ascending)
        });
    }

    let total = kept.len();
    let (start, end) = query.pagination.valid_range(total);
    debug!(
        input = objects.len(),
        total,
        start,
        end,
        sort_by = %query.sort_by,
        ascending = query.ascending,
        "listed objects"
    );

    let items = kept[start..end]
        .iter()
        .map(|object| apply_transforms(*object, transforms))
        .collect();
    ListResult::new(items, total)
}

/// Top-down merge sort. Stable, and it terminates with every element kept
/// even when `cmp` is not a total order (objects without metadata compare
/// equal to everything), where `slice::sort_by` may panic.
fn stable_sort_by<E, F>(items: &mut [E], cmp: &mut F)
where
    E: Copy,
    F: FnMut(&E, &E) -> Ordering,
{
    let len = items.len();
    if len < 2 {
        return;
    }
    let mid = len / 2;
    stable_sort_by(&mut items[..mid], cmp);
    stable_sort_by(&mut items[mid..], cmp);

    let mut merged = Vec::with_capacity(len);
    let (mut i, mut j) = (0, mid);
    while i < mid && j < len {
        // Right wins only when strictly less, which keeps equal runs in order.
        if cmp(&items[j], &items[i]) == Ordering::Less {
            merged.push(items[j]);
            j += 1;
        } else {
            merged.push(items[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&items[i..mid]);
    merged.extend_from_slice(&items[j..]);
    items.copy_from_slice(&merged);
}

fn apply_transforms<T: Clone>(object: &T, transforms: &[TransformFunc<T>]) -> Transformed<T> {
    let mut current = Cow::Borrowed(object);
    let mut projection = None;
    for transform in transforms {
        match transform.apply(&current) {
            Transformed::Object(next) => {
                current = Cow::Owned(next);
                projection = None;
            }
            Transformed::Value(value) => projection = Some(value),
        }
    }
    match projection {
        Some(value) => Transformed::Value(value),
        None => Transformed::Object(current.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::object::ObjectMeta;
    use crate::pagination::Pagination;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn meta(name: &str, secs: i64) -> ObjectMeta {
        ObjectMeta::named(name).created_at(Utc.timestamp_opt(secs, 0).unwrap())
    }

    fn names(result: &ListResult<Transformed<ObjectMeta>>) -> Vec<&str> {
        result
            .items
            .iter()
            .filter_map(|item| item.as_object().map(|m| m.name.as_str()))
            .collect()
    }

    #[test]
    fn newest_first_by_default() {
        let objects = vec![meta("a", 1), meta("b", 3), meta("c", 2)];
        let result = to_list_result(&objects, &Query::new(), None);
        assert_eq!(names(&result), ["b", "c", "a"]);
        assert_eq!(result.total_items, 3);
    }

    #[test]
    fn total_counts_filtered_not_paginated() {
        let objects: Vec<ObjectMeta> = (0..25).map(|i| meta(&format!("obj-{i:02}"), i)).collect();
        let query = Query::from_query_string("name=obj-1&page=1&limit=4");
        let result = to_list_result(&objects, &query, None);
        assert_eq!(result.total_items, 10);
        assert_eq!(result.len(), 4);
        assert_eq!(names(&result), ["obj-19", "obj-18", "obj-17", "obj-16"]);
    }

    #[test]
    fn absent_objects_are_dropped_even_without_filter() {
        let objects = vec![Some(meta("a", 1)), None, Some(meta("b", 2))];
        let result = default_list(&objects, &Query::new(), None, None, &[]);
        assert_eq!(result.total_items, 2);
        assert_eq!(result.items.len(), 2);
    }

    #[test]
    fn missing_compare_keeps_input_order() {
        let objects = vec![meta("b", 1), meta("a", 2), meta("c", 0)];
        let result = default_list(&objects, &Query::new(), None, None, &[]);
        assert_eq!(names(&result), ["b", "a", "c"]);
    }

    #[test]
    fn unknown_sort_field_keeps_filter_order() {
        let objects = vec![meta("b", 1), meta("a", 2), meta("c", 0)];
        for ascending in [false, true] {
            let query = Query::new().sort_by("status").ascending(ascending);
            let result = to_list_result(&objects, &query, None);
            assert_eq!(names(&result), ["b", "a", "c"]);
        }
    }

    #[test]
    fn offset_equal_to_total_is_empty() {
        let objects = vec![meta("a", 1), meta("b", 2)];
        let query = Query::new().with_pagination(Pagination::with_default_limit(10, 2));
        let result = to_list_result(&objects, &query, None);
        assert!(result.is_empty());
        assert_eq!(result.total_items, 2);
    }

    #[test]
    fn transforms_chain_objects_and_projections() {
        let objects = vec![meta("a", 1)];
        let rename = TransformFunc::new(|m: &ObjectMeta| {
            Transformed::Object(ObjectMeta::named(format!("{}-renamed", m.name)))
        });
        let project = TransformFunc::project(|m: &ObjectMeta| json!({ "n": m.name }));
        let suffix = TransformFunc::new(|m: &ObjectMeta| {
            Transformed::Object(ObjectMeta::named(format!("{}!", m.name)))
        });

        let result = default_list(&objects, &Query::new(), None, None, &[rename.clone(), project.clone()]);
        assert_eq!(result.items[0].as_value(), Some(&json!({ "n": "a-renamed" })));

        // A projection in the middle does not replace the object seen next.
        let result = default_list(&objects, &Query::new(), None, None, &[rename, project, suffix]);
        assert_eq!(
            result.items[0].as_object().map(|m| m.name.as_str()),
            Some("a-renamed!")
        );
    }

    #[test]
    fn custom_handler() {
        struct NameOnly;
        impl ListHandler<ObjectMeta> for NameOnly {
            fn comparator(&self) -> CompareFunc<ObjectMeta> {
                crate::compare::name_compare()
            }
            fn filter(&self) -> FilterFunc<ObjectMeta> {
                default_filter()
            }
            fn transformer(&self) -> TransformFunc<ObjectMeta> {
                TransformFunc::project(|m: &ObjectMeta| json!(m.name))
            }
        }

        let objects = vec![meta("b", 1), meta("c", 3), meta("a", 2)];
        let handler: &dyn ListHandler<ObjectMeta> = &NameOnly;
        let result = to_list_result(&objects, &Query::new(), Some(handler));
        let items: Vec<_> = result.items.iter().filter_map(Transformed::as_value).collect();
        assert_eq!(items, [&json!("a"), &json!("b"), &json!("c")]);
    }

    #[test]
    fn filters_are_anded() {
        let objects = vec![
            meta("build-a", 1).in_namespace("devops"),
            meta("build-b", 2).in_namespace("other"),
            meta("deploy", 3).in_namespace("devops"),
        ];
        let query = Query::new()
            .filter(Field::Name, "build")
            .filter(Field::Namespace, "devops");
        let result = to_list_result(&objects, &query, None);
        assert_eq!(names(&result), ["build-a"]);
    }

    #[test]
    fn merge_sort_is_stable() {
        let mut pairs = [(2, 'a'), (1, 'b'), (2, 'c'), (0, 'd'), (1, 'e')];
        stable_sort_by(&mut pairs, &mut |a: &(i32, char), b: &(i32, char)| a.0.cmp(&b.0));
        assert_eq!(pairs, [(0, 'd'), (1, 'b'), (1, 'e'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn merge_sort_survives_inconsistent_comparator() {
        // Zero compares equal to everything, the rest compare strictly.
        let mut values: Vec<u32> = (0..200).map(|i| if i % 3 == 0 { 0 } else { i }).collect();
        let mut expected = values.clone();
        stable_sort_by(&mut values, &mut |a: &u32, b: &u32| {
            if *a == 0 || *b == 0 {
                Ordering::Equal
            } else {
                b.cmp(a)
            }
        });
        values.sort_unstable();
        expected.sort_unstable();
        assert_eq!(values, expected);
    }

    #[test]
    fn result_serializes_with_total_items() {
        let result = ListResult::new(vec![json!("a")], 3);
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "items": ["a"], "totalItems": 3 })
        );
        let mapped = result.map_items(|v| v.to_string());
        assert_eq!(mapped.total_items, 3);
        assert!(ListResult::<()>::empty().is_empty());
    }
}
