//! Parsed list requests.
//!
//! [`QueryParser`] turns free-form request parameters into a [`Query`]. It
//! never rejects input: malformed numbers and booleans fall back to their
//! defaults and stay visible in [`Query::filters`].
//!
//! | Parameter       | Meaning                                      |
//! |-----------------|----------------------------------------------|
//! | `page`          | 1-based page number                          |
//! | `limit`         | page size                                    |
//! | `start`         | raw 0-based offset, used when `page` is not  |
//! | `sortBy`        | sort field (default `creationTimestamp`)     |
//! | `ascending`     | sort direction (default `false`)             |
//! | `labelSelector` | selector for the upstream fetch              |
//! | anything else   | a filter                                     |
//!
//! `start` is recorded as a filter even when it was used for pagination.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ListConfig;
use crate::field::Field;
use crate::pagination::Pagination;
use crate::selector::Selector;

pub const PARAMETER_PAGE: &str = "page";
pub const PARAMETER_LIMIT: &str = "limit";
pub const PARAMETER_START: &str = "start";
pub const PARAMETER_SORT_BY: &str = "sortBy";
pub const PARAMETER_ASCENDING: &str = "ascending";
pub const PARAMETER_LABEL_SELECTOR: &str = "labelSelector";

/// A list request: pagination, ordering and filters.
///
/// # Example
///
/// ```
/// use resquery::{Field, Pagination, Query};
///
/// let query = Query::from_query_string("name=build&page=2&limit=5&ascending=true");
/// assert_eq!(query.pagination, Pagination::Window { limit: 5, offset: 5 });
/// assert!(query.ascending);
/// assert_eq!(query.filters.get(&Field::Name).map(String::as_str), Some("build"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    pub pagination: Pagination,
    pub sort_by: Field,
    pub ascending: bool,
    pub filters: BTreeMap<Field, String>,
    pub label_selector: Option<String>,
}

impl Query {
    /// An unrestricted query sorted by creation time, newest first.
    pub fn new() -> Self {
        Query::default()
    }

    /// Parses parameters with the default [`ListConfig`].
    pub fn parse<I, K, V>(params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        QueryParser::default().parse(params)
    }

    /// Parses a URL query string with the default [`ListConfig`].
    pub fn from_query_string(raw: &str) -> Self {
        QueryParser::default().parse_query_string(raw)
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn sort_by(mut self, field: impl Into<Field>) -> Self {
        self.sort_by = field.into();
        self
    }

    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    /// Adds a filter, replacing any previous value for the field.
    pub fn filter(mut self, field: impl Into<Field>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn with_label_selector(mut self, selector: impl Into<String>) -> Self {
        self.label_selector = Some(selector.into());
        self
    }

    /// Returns the parsed label selector.
    ///
    /// A missing selector is the empty one; a malformed selector matches
    /// everything.
    pub fn selector(&self) -> Selector {
        let Some(raw) = self.label_selector.as_deref() else {
            return Selector::default();
        };
        Selector::parse(raw).unwrap_or_else(|err| {
            debug!(selector = raw, error = %err, "ignoring malformed label selector");
            Selector::everything()
        })
    }
}

/// Builds [`Query`] values from request parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    config: ListConfig,
}

impl QueryParser {
    pub fn new(config: ListConfig) -> Self {
        QueryParser { config }
    }

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Parses `application/x-www-form-urlencoded` parameters.
    ///
    /// A leading `?` is ignored.
    pub fn parse_query_string(&self, raw: &str) -> Query {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        self.parse(url::form_urlencoded::parse(raw.as_bytes()))
    }

    /// Parses key/value pairs. A repeated key keeps its last value.
    pub fn parse<I, K, V>(&self, params: I) -> Query
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut raw: BTreeMap<String, String> = BTreeMap::new();
        for (key, value) in params {
            raw.insert(key.as_ref().to_string(), value.as_ref().to_string());
        }

        let get = |key: &str| raw.get(key).map(String::as_str);
        let page = get(PARAMETER_PAGE).and_then(|v| parse_int(PARAMETER_PAGE, v));
        let limit = get(PARAMETER_LIMIT).and_then(|v| parse_int(PARAMETER_LIMIT, v));
        let start = get(PARAMETER_START).and_then(|v| parse_int(PARAMETER_START, v));
        let ascending = get(PARAMETER_ASCENDING).and_then(parse_bool);
        if let (Some(value), None) = (get(PARAMETER_ASCENDING), ascending) {
            debug!(parameter = PARAMETER_ASCENDING, value, "ignoring unparsable boolean parameter");
        }

        let pagination = self.pagination(page, limit, start);
        let sort_by = get(PARAMETER_SORT_BY).map(Field::from).unwrap_or_default();
        let label_selector = get(PARAMETER_LABEL_SELECTOR)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let consumed = |key: &str| match key {
            PARAMETER_PAGE => page.is_some(),
            PARAMETER_LIMIT => limit.is_some(),
            PARAMETER_ASCENDING => ascending.is_some(),
            PARAMETER_SORT_BY | PARAMETER_LABEL_SELECTOR => true,
            _ => false,
        };
        let filters = raw
            .iter()
            .filter(|(key, _)| !consumed(key))
            .map(|(key, value)| (Field::from(key.as_str()), value.clone()))
            .collect();

        Query {
            pagination,
            sort_by,
            ascending: ascending.unwrap_or(false),
            filters,
            label_selector,
        }
    }

    fn pagination(&self, page: Option<i64>, limit: Option<i64>, start: Option<i64>) -> Pagination {
        let default_limit = self.config.default_limit();
        let effective_limit = limit
            .and_then(|l| usize::try_from(l).ok())
            .filter(|l| *l > 0)
            .unwrap_or(default_limit);

        match (page, start, limit) {
            (Some(page), _, _) => {
                let offset = (page.max(1) as usize - 1).saturating_mul(effective_limit);
                Pagination::Window {
                    limit: effective_limit,
                    offset,
                }
            }
            (None, Some(start), _) => {
                Pagination::new(limit.unwrap_or(0), start, default_limit)
            }
            (None, None, Some(limit)) => Pagination::new(limit, 0, default_limit),
            (None, None, None) => Pagination::Unrestricted,
        }
    }
}

fn parse_int(parameter: &str, value: &str) -> Option<i64> {
    match value.parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            debug!(parameter, value, "ignoring unparsable integer parameter");
            None
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
