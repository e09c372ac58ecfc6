//! Identifiers for transit lines and the trip owners.
//!
//! All identifiers use Arc<str> so the stop and geometry datasets can hand them
//! out to every request without copying.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

impl_identifier!(LineIdentifier);
impl_identifier!(UserIdentifier);
impl_identifier!(TicketIdentifier);

impl LineIdentifier {
    /// Line id taken from a dataset property, which may be a string or a number
    ///
    /// Route files key lines by integer (`"linea": 90`) while stop files carry the
    /// OSM `ref` tag as text (`"ref": "90"`); both normalise to the same identifier.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| Self::new(trimmed))
            }
            serde_json::Value::Number(n) => Some(Self::new(n.to_string())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_equality() {
        let id1 = LineIdentifier::new("90");
        let id2 = LineIdentifier::new("90");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_identifier_hash() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(LineIdentifier::new("S5"), 42);

        assert_eq!(map.get(&LineIdentifier::new("S5")), Some(&42));
    }

    #[test]
    fn test_line_from_json() {
        let numeric = LineIdentifier::from_json(&serde_json::json!(90));
        let text = LineIdentifier::from_json(&serde_json::json!(" 90 "));

        assert_eq!(numeric, Some(LineIdentifier::new("90")));
        assert_eq!(numeric, text);
        assert_eq!(LineIdentifier::from_json(&serde_json::json!("")), None);
        assert_eq!(LineIdentifier::from_json(&serde_json::json!(null)), None);
    }

    #[test]
    fn test_identifier_serde() {
        let id: UserIdentifier = serde_json::from_str("\"user-7\"").unwrap();
        assert_eq!(id.as_str(), "user-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"user-7\"");
    }
}
