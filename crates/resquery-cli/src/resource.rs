//! Kubernetes-shaped resources loaded from YAML or JSON files.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use resquery::{Object, ObjectMeta};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Resource {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub spec: serde_json::Value,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub status: serde_json::Value,
}

impl Resource {
    /// `status.startTime`, if present and RFC 3339.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        let raw = self.status.get("startTime")?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// `status.phase`, or the empty string.
    pub fn phase(&self) -> &str {
        self.status
            .get("phase")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
    }
}

impl Object for Resource {
    fn object_meta(&self) -> Option<&ObjectMeta> {
        Some(&self.metadata)
    }
}

/// A file holds either a bare sequence or a `kind: List` style document.
/// `null` entries load as absent objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Document {
    Sequence(Vec<Option<Resource>>),
    List { items: Vec<Option<Resource>> },
}

pub fn parse(raw: &str) -> Result<Vec<Option<Resource>>> {
    let document: Document =
        serde_yaml::from_str(raw).context("expected a sequence of objects or a list with items")?;
    Ok(match document {
        Document::Sequence(items) | Document::List { items } => items,
    })
}

pub fn load(path: &Path) -> Result<Vec<Option<Resource>>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
