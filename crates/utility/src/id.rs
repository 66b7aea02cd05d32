use std::{fmt, hash, marker::PhantomData};

use schemars::{
    gen::SchemaGenerator,
    schema::{InstanceType, Schema, SchemaObject},
    JsonSchema,
};
use serde::{Deserialize, Serialize};

/// Marker for types that are addressed by a database id.
pub trait HasId {}

/// A database id tagged with the entity type it belongs to, so a trip id
/// cannot be passed where a train id is expected.
pub struct Id<T: HasId>(i64, PhantomData<T>);

impl<T: HasId> Id<T> {
    pub fn new(raw: i64) -> Self {
        Self(raw, PhantomData)
    }

    pub fn raw(&self) -> i64 {
        self.0
    }
}

impl<T: HasId> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.0).finish()
    }
}

impl<T: HasId> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: HasId> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: HasId> Copy for Id<T> {}

impl<T: HasId> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: HasId> Eq for Id<T> {}

impl<T: HasId> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: HasId> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T: HasId> hash::Hash for Id<T> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<'de, T: HasId> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Id::new)
    }
}

impl<T: HasId> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T: HasId + JsonSchema> JsonSchema for Id<T> {
    fn schema_name() -> String {
        format!("{}Id", T::schema_name())
    }

    fn json_schema(_gen: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(InstanceType::Integer.into()),
            format: Some("int64".to_owned()),
            ..Default::default()
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing;
    impl HasId for Thing {}

    #[test]
    fn raw_roundtrip() {
        let id: Id<Thing> = Id::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "42");
    }

    #[test]
    fn equality_and_ordering() {
        let a: Id<Thing> = Id::new(1);
        let b: Id<Thing> = Id::new(2);
        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(a, Id::new(1));
    }

    #[test]
    fn serde_as_plain_integer() {
        let id: Id<Thing> = Id::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: Id<Thing> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
