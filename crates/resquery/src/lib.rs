//! Resquery - generic list engine for resource collections.
//!
//! Resquery turns request parameters into a [`Query`] and applies it to an
//! in-memory collection of objects. It supports:
//!
//! - Filtering on standard metadata (name, namespace, uid, owners, labels)
//! - Ordering by name or creation time, descending by default
//! - Page/limit pagination with a total count of matching items
//! - Per-item transforms and pluggable per-resource handlers
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use resquery::{to_list_result, ObjectMeta, Query};
//!
//! let templates: Vec<ObjectMeta> = (1..=3)
//!     .map(|i| {
//!         ObjectMeta::named(format!("template{i}"))
//!             .in_namespace("devops")
//!             .created_at(Utc.timestamp_opt(i, 0).unwrap())
//!     })
//!     .collect();
//!
//! let query = Query::from_query_string("sortBy=name&ascending=true&limit=2");
//! let result = to_list_result(&templates, &query, None);
//!
//! assert_eq!(result.total_items, 3);
//! let names: Vec<_> = result
//!     .items
//!     .iter()
//!     .filter_map(|item| item.as_object())
//!     .map(|meta| meta.name.as_str())
//!     .collect();
//! assert_eq!(names, ["template1", "template2"]);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! result = transform(page(sort(filter(objects))))
//! total  = |filter(objects)|
//! ```
//!
//! - **Filter**: an object is kept only if every query filter passes. Fields
//!   the filter does not recognize pass.
//! - **Sort**: comparators answer "greater than"; the default order is
//!   descending and `ascending=true` gives the exact reverse.
//! - **Page**: an offset past the end gives an empty page, never an error.
//!
//! # Parameters
//!
//! | Parameter | Effect |
//! |-----------|--------|
//! | `page`, `limit` | 1-based page of `limit` items |
//! | `start` | raw offset when no `page` is given |
//! | `sortBy` | sort field, default `creationTimestamp` |
//! | `ascending` | sort direction, default `false` |
//! | `labelSelector` | selector for the caller's upstream fetch |
//! | `name`, `names`, `uid`, `namespace`, `label`, ... | filters |

mod compare;
mod config;
mod error;
mod field;
mod filter;
mod list;
mod object;
mod pagination;
mod query;
mod selector;

pub use compare::{default_compare, name_compare, object_meta_compare, CompareFunc};
pub use config::ListConfig;
pub use error::{Result, SelectorError};
pub use field::Field;
pub use filter::{and, default_filter, labels_match, object_meta_filter, or, Filter, FilterFunc};
pub use list::{
    default_list, no_transform, to_list_result, DefaultListHandler, ListHandler, ListResult,
    TransformFunc, Transformed,
};
pub use object::{Object, ObjectMeta, OwnerReference};
pub use pagination::{Pagination, DEFAULT_LIMIT, NO_PAGINATION};
pub use query::{
    Query, QueryParser, PARAMETER_ASCENDING, PARAMETER_LABEL_SELECTOR, PARAMETER_LIMIT,
    PARAMETER_PAGE, PARAMETER_SORT_BY, PARAMETER_START,
};
pub use selector::{Operator, Requirement, Selector};
