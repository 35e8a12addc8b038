//! Content fingerprints used as index map keys
//!
//! A fingerprint reduces either a key set's field names (identifying an
//! index) or a record's values for those fields (identifying a bucket
//! within an index) to a fixed-size SHA-256 digest. Using a digest as the
//! map key keeps bucket lookup O(1) regardless of key-set arity; digest
//! collisions are disambiguated by the exact-equality scans the table
//! performs inside a bucket.

use crate::record::Value;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Separator hashed after every component so adjacent components cannot
/// run together ("ab","c" and "a","bc" must not collide)
const COMPONENT_SEPARATOR: [u8; 1] = [0x1f];

/// Fixed-size digest identifying a key set or a value combination
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint of an ordered sequence of field names.
    ///
    /// Identifies one index: two key sets get the same fingerprint exactly
    /// when they name the same fields in the same order.
    pub fn of_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut hasher = Sha256::new();
        for name in names {
            hasher.update(name.as_ref().as_bytes());
            hasher.update(COMPONENT_SEPARATOR);
        }
        Self::from_hasher(hasher)
    }

    /// Fingerprint of an ordered sequence of values, hashed through their
    /// canonical string forms.
    ///
    /// Identifies one bucket within an index. Values of different types can
    /// share a canonical form (`Int(1)` and `Str("1")`), so bucket contents
    /// are always re-checked with typed equality by the caller.
    pub fn of_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a Value>,
    {
        let mut hasher = Sha256::new();
        for value in values {
            hasher.update(value.to_string().as_bytes());
            hasher.update(COMPONENT_SEPARATOR);
        }
        Self::from_hasher(hasher)
    }

    fn from_hasher(hasher: Sha256) -> Self {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Self(bytes)
    }

    /// Get the raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", hex::encode(&self.0[..4]))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(de::Error::custom)?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| de::Error::custom("fingerprint must be 32 bytes"))?;
        Ok(Self(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_fingerprint_deterministic() {
        let a = Fingerprint::of_names(["dpid", "port_name"]);
        let b = Fingerprint::of_names(["dpid", "port_name"]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_name_fingerprint_order_sensitive() {
        let a = Fingerprint::of_names(["dpid", "port_name"]);
        let b = Fingerprint::of_names(["port_name", "dpid"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_separator_keeps_components_apart() {
        let a = Fingerprint::of_names(["ab", "c"]);
        let b = Fingerprint::of_names(["a", "bc"]);
        assert_ne!(a, b);

        let c = Fingerprint::of_names(["abc"]);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }

    #[test]
    fn test_value_fingerprint_tracks_values() {
        let one = Value::Int(1);
        let veth1 = Value::Str("veth1".to_string());
        let veth2 = Value::Str("veth2".to_string());

        let a = Fingerprint::of_values([&one, &veth1]);
        let b = Fingerprint::of_values([&one, &veth1]);
        let c = Fingerprint::of_values([&one, &veth2]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_value_fingerprint_uses_canonical_form() {
        // Int(1) and Str("1") share a canonical form; the table's bucket
        // scans disambiguate them with typed equality.
        let int_one = Value::Int(1);
        let str_one = Value::Str("1".to_string());
        assert_eq!(
            Fingerprint::of_values([&int_one]),
            Fingerprint::of_values([&str_one])
        );
    }

    #[test]
    fn test_display_is_full_hex() {
        let fp = Fingerprint::of_names(["dpid"]);
        let text = fp.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_serde_round_trip() {
        let fp = Fingerprint::of_names(["dpid", "port_no"]);
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, format!("\"{}\"", fp));

        let parsed: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, fp);
    }

    #[test]
    fn test_deserialize_rejects_wrong_length() {
        let result: Result<Fingerprint, _> = serde_json::from_str("\"abcd\"");
        assert!(result.is_err());
    }
}
