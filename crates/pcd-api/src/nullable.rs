//! Deserializer for patch fields that distinguish "absent" from `null`.
//!
//! Use with `#[serde(default, deserialize_with = "crate::nullable::deserialize")]`:
//! an absent key stays `None`, `null` becomes `Some(None)`.

use serde::{Deserialize, Deserializer};

pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  T: Deserialize<'de>,
  D: Deserializer<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}
