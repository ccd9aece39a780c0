//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are small positive integers, unique within their collection.
//! New values are allocated as `max(existing) + 1` (see [`next_id`]).

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a registered user.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

/// Identifier of a chirp (user-authored message).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChirpId(u64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// The identifier given to the first entity of an empty collection.
            pub const FIRST: Self = Self(1);

            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> u64 {
                self.0
            }

            /// The identifier immediately after this one, if representable.
            pub const fn next(&self) -> Option<Self> {
                match self.0.checked_add(1) {
                    Some(value) => Some(Self(value)),
                    None => None,
                }
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| DomainError::validation(format!("invalid {}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(UserId, "user id");
impl_int_newtype!(ChirpId, "chirp id");

/// Next free identifier for an ordered collection of keys.
///
/// Relies on the iterator being sorted ascending (as `BTreeMap::keys` is):
/// the last key is the maximum. A maximum of `u64::MAX` is an internal error.
pub fn next_id<'a, I, K>(mut keys: I) -> DomainResult<K>
where
    I: DoubleEndedIterator<Item = &'a K>,
    K: Copy + 'a + NextId,
{
    match keys.next_back() {
        None => Ok(K::FIRST),
        Some(max) => max
            .successor()
            .ok_or_else(|| DomainError::internal("identifier space exhausted")),
    }
}

/// Identifier types that can be allocated sequentially.
pub trait NextId: Sized {
    const FIRST: Self;
    fn successor(&self) -> Option<Self>;
}

impl NextId for UserId {
    const FIRST: Self = UserId::FIRST;
    fn successor(&self) -> Option<Self> {
        self.next()
    }
}

impl NextId for ChirpId {
    const FIRST: Self = ChirpId::FIRST;
    fn successor(&self) -> Option<Self> {
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn empty_collection_starts_at_one() {
        let map: BTreeMap<ChirpId, ()> = BTreeMap::new();
        assert_eq!(next_id(map.keys()).unwrap(), ChirpId::new(1));
    }

    #[test]
    fn allocation_uses_max_not_len() {
        let mut map = BTreeMap::new();
        map.insert(UserId::new(7), ());
        map.insert(UserId::new(2), ());
        assert_eq!(next_id(map.keys()).unwrap(), UserId::new(8));
    }

    #[test]
    fn allocation_past_u64_max_is_internal_error() {
        let mut map = BTreeMap::new();
        map.insert(ChirpId::new(u64::MAX), ());
        assert!(matches!(next_id(map.keys()), Err(DomainError::Internal(_))));
        assert_eq!(ChirpId::new(u64::MAX).next(), None);
        assert_eq!(ChirpId::new(4).next(), Some(ChirpId::new(5)));
    }

    #[test]
    fn parse_rejects_non_numeric() {
        let err = "abc".parse::<UserId>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!("42".parse::<ChirpId>().unwrap(), ChirpId::new(42));
    }

    #[test]
    fn serializes_as_plain_integer_and_map_key() {
        let mut map = BTreeMap::new();
        map.insert(UserId::new(3), "x");
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"3":"x"}"#);
        let back: BTreeMap<UserId, String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.keys().next(), Some(&UserId::new(3)));
    }
}
