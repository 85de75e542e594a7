//! Set and equality based label selectors.
//!
//! This is the selector callers hand to the backing store when fetching the
//! collection (`labelSelector=app=web,tier in (a,b)`). It is separate from the
//! `label` filter expression evaluated by the engine.
//!
//! | Requirement      | Matches when                            |
//! |------------------|-----------------------------------------|
//! | `k`              | `k` is present                          |
//! | `!k`             | `k` is absent                           |
//! | `k=v`, `k==v`    | `k` is present with value `v`           |
//! | `k!=v`           | `k` is absent or has a value other than `v` |
//! | `k in (a,b)`     | `k` is present with value `a` or `b`    |
//! | `k notin (a,b)`  | `k` is absent or its value is neither   |

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, SelectorError};

static LABEL_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*/)?[A-Za-z0-9]([-A-Za-z0-9_.]*[A-Za-z0-9])?$",
    )
    .expect("label key pattern is valid")
});

static LABEL_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9])?$")
        .expect("label value pattern is valid")
});

static SET_REQUIREMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s+(in|notin)\s*\((.*)\)$").expect("set requirement pattern is valid")
});

const MAX_NAME_LEN: usize = 63;
const MAX_PREFIX_LEN: usize = 253;

/// Selector operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Exists,
    DoesNotExist,
    Equals,
    NotEquals,
    In,
    NotIn,
}

/// One comma-separated term of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    key: String,
    operator: Operator,
    values: BTreeSet<String>,
}

impl Requirement {
    /// Builds a validated requirement.
    pub fn new<I, S>(key: impl Into<String>, operator: Operator, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key = key.into();
        validate_key(&key)?;
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        for value in &values {
            if !LABEL_VALUE.is_match(value) || value.len() > MAX_NAME_LEN {
                return Err(SelectorError::InvalidValue {
                    key,
                    value: value.clone(),
                });
            }
        }
        if matches!(operator, Operator::In | Operator::NotIn) && values.is_empty() {
            return Err(SelectorError::EmptyValueSet(key));
        }
        Ok(Requirement {
            key,
            operator,
            values,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Evaluates this requirement against a label set.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        let value = labels.get(&self.key);
        match self.operator {
            Operator::Exists => value.is_some(),
            Operator::DoesNotExist => value.is_none(),
            Operator::Equals | Operator::In => value.is_some_and(|v| self.values.contains(v)),
            Operator::NotEquals | Operator::NotIn => {
                value.map_or(true, |v| !self.values.contains(v))
            }
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = || self.values().collect::<Vec<_>>().join(",");
        match self.operator {
            Operator::Exists => write!(f, "{}", self.key),
            Operator::DoesNotExist => write!(f, "!{}", self.key),
            Operator::Equals => write!(f, "{}={}", self.key, joined()),
            Operator::NotEquals => write!(f, "{}!={}", self.key, joined()),
            Operator::In => write!(f, "{} in ({})", self.key, joined()),
            Operator::NotIn => write!(f, "{} notin ({})", self.key, joined()),
        }
    }
}

/// A conjunction of [`Requirement`]s.
///
/// The empty selector matches every label set.
///
/// ```
/// use std::collections::BTreeMap;
/// use resquery::Selector;
///
/// let selector = Selector::parse("app=web,tier notin (cache)").unwrap();
/// let labels = BTreeMap::from([("app".to_string(), "web".to_string())]);
/// assert!(selector.matches(&labels));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    /// The selector that matches everything.
    pub fn everything() -> Self {
        Selector::default()
    }

    /// Parses a selector expression.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Selector::everything());
        }
        let requirements = split_top_level(raw)?
            .into_iter()
            .map(|term| parse_requirement(raw, term))
            .collect::<Result<Vec<_>>>()?;
        Ok(Selector { requirements })
    }

    /// Adds a requirement.
    pub fn add(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Returns `true` if every requirement matches.
    pub fn matches(&self, labels: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|req| req.matches(labels))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, req) in self.requirements.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{req}")?;
        }
        Ok(())
    }
}

fn validate_key(key: &str) -> Result<()> {
    let (prefix, name) = match key.split_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };
    let too_long = name.len() > MAX_NAME_LEN || prefix.is_some_and(|p| p.len() > MAX_PREFIX_LEN);
    if too_long || !LABEL_KEY.is_match(key) {
        return Err(SelectorError::InvalidKey(key.to_string()));
    }
    Ok(())
}

/// Splits on commas outside parentheses.
fn split_top_level(raw: &str) -> Result<Vec<&str>> {
    let mut terms = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| SelectorError::UnbalancedParens(raw.to_string()))?;
            }
            ',' if depth == 0 => {
                terms.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(SelectorError::UnbalancedParens(raw.to_string()));
    }
    terms.push(&raw[start..]);
    Ok(terms)
}

fn parse_requirement(raw: &str, term: &str) -> Result<Requirement> {
    let term = term.trim();
    if term.is_empty() {
        return Err(SelectorError::EmptyRequirement(raw.to_string()));
    }

    if let Some(caps) = SET_REQUIREMENT.captures(term) {
        let operator = if &caps[2] == "in" {
            Operator::In
        } else {
            Operator::NotIn
        };
        let values = caps[3]
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        return Requirement::new(&caps[1], operator, values);
    }

    if let Some(key) = term.strip_prefix('!') {
        return Requirement::new(key.trim(), Operator::DoesNotExist, Vec::<String>::new());
    }

    let (key, operator, value) = if let Some((k, v)) = term.split_once("!=") {
        (k, Operator::NotEquals, v)
    } else if let Some((k, v)) = term.split_once("==") {
        (k, Operator::Equals, v)
    } else if let Some((k, v)) = term.split_once('=') {
        (k, Operator::Equals, v)
    } else {
        return Requirement::new(term, Operator::Exists, Vec::<String>::new());
    };
    Requirement::new(key.trim(), operator, [value.trim()])
}
