//! Object metadata and the [`Object`] accessor trait.
//!
//! The default filter and comparator only look at standard metadata: name,
//! namespace, uid, creation time, labels, annotations and owner references.
//! Any type that can hand out an [`ObjectMeta`] can be listed.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference from an object to the object that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OwnerReference {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    pub kind: String,
    pub name: String,
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<bool>,
}

impl OwnerReference {
    /// Creates an owner reference with the given kind, name and uid.
    pub fn new(kind: impl Into<String>, name: impl Into<String>, uid: impl Into<String>) -> Self {
        OwnerReference {
            kind: kind.into(),
            name: name.into(),
            uid: uid.into(),
            ..OwnerReference::default()
        }
    }
}

/// Standard object metadata.
///
/// Serialized in the usual Kubernetes shape (`creationTimestamp`,
/// `ownerReferences`, ...). Missing fields deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uid: String,
    /// Absent timestamps order before every present one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
}

impl ObjectMeta {
    /// Creates metadata with just a name.
    pub fn named(name: impl Into<String>) -> Self {
        ObjectMeta {
            name: name.into(),
            ..ObjectMeta::default()
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = uid.into();
        self
    }

    pub fn created_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.creation_timestamp = Some(timestamp);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn with_owner(mut self, owner: OwnerReference) -> Self {
        self.owner_references.push(owner);
        self
    }
}

/// Access to the metadata of a listable object.
///
/// Objects that return `None` from [`Object::object_meta`] are excluded by
/// the default filter and carry no ordering information for the default
/// comparator. Objects reporting [`Object::is_absent`] are dropped before
/// any filter runs.
///
/// # Example
///
/// ```
/// use resquery::{Object, ObjectMeta};
///
/// struct Template {
///     metadata: ObjectMeta,
/// }
///
/// impl Object for Template {
///     fn object_meta(&self) -> Option<&ObjectMeta> {
///         Some(&self.metadata)
///     }
/// }
///
/// let missing: Option<Template> = None;
/// assert!(missing.is_absent());
/// ```
pub trait Object {
    /// Returns the standard metadata, or `None` if this object has none.
    fn object_meta(&self) -> Option<&ObjectMeta>;

    /// Returns `true` if this slot holds no object at all.
    fn is_absent(&self) -> bool {
        false
    }
}

impl Object for ObjectMeta {
    fn object_meta(&self) -> Option<&ObjectMeta> {
        Some(self)
    }
}

impl<O: Object> Object for Option<O> {
    fn object_meta(&self) -> Option<&ObjectMeta> {
        self.as_ref().and_then(|object| object.object_meta())
    }

    fn is_absent(&self) -> bool {
        self.as_ref().map_or(true, |object| object.is_absent())
    }
}

macro_rules! delegate_object {
    ($($wrapper:ty),*) => {
        $(
            impl<O: Object + ?Sized> Object for $wrapper {
                fn object_meta(&self) -> Option<&ObjectMeta> {
                    (**self).object_meta()
                }

                fn is_absent(&self) -> bool {
                    (**self).is_absent()
                }
            }
        )*
    };
}

delegate_object!(&O, Box<O>, Rc<O>, Arc<O>);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Opaque;

    impl Object for Opaque {
        fn object_meta(&self) -> Option<&ObjectMeta> {
            None
        }
    }

    #[test]
    fn option_none_is_absent() {
        let none: Option<ObjectMeta> = None;
        assert!(none.is_absent());
        assert!(none.object_meta().is_none());

        let some = Some(ObjectMeta::named("a"));
        assert!(!some.is_absent());
        assert_eq!(some.object_meta().map(|m| m.name.as_str()), Some("a"));
    }

    #[test]
    fn nested_absence_propagates() {
        let inner: Option<Option<ObjectMeta>> = Some(None);
        assert!(inner.is_absent());
    }

    #[test]
    fn heterogeneous_collection_through_trait_objects() {
        let objects: Vec<Box<dyn Object>> = vec![Box::new(ObjectMeta::named("a")), Box::new(Opaque)];
        assert!(objects[0].object_meta().is_some());
        assert!(objects[1].object_meta().is_none());
        assert!(!objects[1].is_absent());
    }

    #[test]
    fn builder_helpers() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let meta = ObjectMeta::named("run-1")
            .in_namespace("devops")
            .with_uid("u-1")
            .created_at(ts)
            .with_label("app", "web")
            .with_annotation("note", "x")
            .with_owner(OwnerReference::new("Pipeline", "p", "owner-uid"));

        assert_eq!(meta.namespace, "devops");
        assert_eq!(meta.uid, "u-1");
        assert_eq!(meta.creation_timestamp, Some(ts));
        assert_eq!(meta.labels.get("app").map(String::as_str), Some("web"));
        assert_eq!(meta.annotations.get("note").map(String::as_str), Some("x"));
        assert_eq!(meta.owner_references[0].kind, "Pipeline");
    }

    #[test]
    fn deserializes_kubernetes_shape() {
        let meta: ObjectMeta = serde_json::from_value(serde_json::json!({
            "name": "tpl",
            "namespace": "ns",
            "creationTimestamp": "2024-05-01T10:00:00Z",
            "labels": {"a": "b"},
            "ownerReferences": [{"kind": "Project", "name": "p", "uid": "1"}]
        }))
        .unwrap();

        assert_eq!(meta.name, "tpl");
        assert_eq!(
            meta.creation_timestamp,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(meta.owner_references[0].uid, "1");
        assert!(meta.annotations.is_empty());
    }
}
