//! Field identifiers for filters and sort keys.
//!
//! Query parameters arrive as free-form strings. The well-known ones map to
//! dedicated [`Field`] variants so filters and comparators can match on them;
//! anything else is kept verbatim in [`Field::Other`].

use std::fmt;

/// A named query dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Field {
    /// `name`: substring match when filtering, lexicographic when sorting.
    Name,
    /// `names`: comma-separated list of exact names.
    Names,
    /// `uid`: exact unique identifier.
    Uid,
    /// `namespace`: exact namespace.
    Namespace,
    /// `ownerReference`: uid of any owner reference.
    OwnerReference,
    /// `ownerKind`: kind of any owner reference.
    OwnerKind,
    /// `label`: label expression.
    Label,
    /// `annotation`: annotation expression.
    Annotation,
    /// `creationTimestamp`: the default sort field.
    #[default]
    CreationTimestamp,
    /// `status`: only meaningful to resource-specific filters.
    Status,
    /// `type`: only meaningful to resource-specific filters.
    Type,
    /// Any other parameter name.
    Other(String),
}

impl Field {
    /// Returns the wire name of this field.
    pub fn as_str(&self) -> &str {
        match self {
            Field::Name => "name",
            Field::Names => "names",
            Field::Uid => "uid",
            Field::Namespace => "namespace",
            Field::OwnerReference => "ownerReference",
            Field::OwnerKind => "ownerKind",
            Field::Label => "label",
            Field::Annotation => "annotation",
            Field::CreationTimestamp => "creationTimestamp",
            Field::Status => "status",
            Field::Type => "type",
            Field::Other(name) => name,
        }
    }

    /// Returns `true` unless this is an [`Field::Other`] field.
    pub fn is_known(&self) -> bool {
        !matches!(self, Field::Other(_))
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        match s {
            "name" => Field::Name,
            "names" => Field::Names,
            "uid" => Field::Uid,
            "namespace" => Field::Namespace,
            "ownerReference" => Field::OwnerReference,
            "ownerKind" => Field::OwnerKind,
            "label" => Field::Label,
            "annotation" => Field::Annotation,
            "creationTimestamp" => Field::CreationTimestamp,
            "status" => Field::Status,
            "type" => Field::Type,
            other => Field::Other(other.to_string()),
        }
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        match Field::from(s.as_str()) {
            Field::Other(_) => Field::Other(s),
            known => known,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fields_round_trip() {
        for name in [
            "name",
            "names",
            "uid",
            "namespace",
            "ownerReference",
            "ownerKind",
            "label",
            "annotation",
            "creationTimestamp",
            "status",
            "type",
        ] {
            let field = Field::from(name);
            assert!(field.is_known(), "{name} should be known");
            assert_eq!(field.as_str(), name);
        }
    }

    #[test]
    fn unknown_fields_are_kept_verbatim() {
        let field = Field::from("pipeline");
        assert_eq!(field, Field::Other("pipeline".to_string()));
        assert!(!field.is_known());
        assert_eq!(field.to_string(), "pipeline");
    }

    #[test]
    fn field_names_are_case_sensitive() {
        assert_eq!(Field::from("Name"), Field::Other("Name".to_string()));
    }

    #[test]
    fn default_is_creation_timestamp() {
        assert_eq!(Field::default(), Field::CreationTimestamp);
    }
}
