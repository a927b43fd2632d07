//! Fixed-capacity, length-tagged container.
//!
//! A circuit cannot size an array at runtime, so variable-length data is
//! presented as a `storage` array of exactly `capacity` elements together with
//! `len`, the number of leading elements that are meaningful. Slots at or past
//! `len` always hold the filler value.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CircuitInputError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "RawBoundedVec<T>",
    bound(deserialize = "T: Deserialize<'de> + Default + PartialEq")
)]
pub struct BoundedVec<T> {
    storage: Vec<T>,
    len: usize,
}

#[derive(Deserialize)]
struct RawBoundedVec<T> {
    storage: Vec<T>,
    len: usize,
}

impl<T: Default + PartialEq> TryFrom<RawBoundedVec<T>> for BoundedVec<T> {
    type Error = CircuitInputError;

    fn try_from(raw: RawBoundedVec<T>) -> Result<Self> {
        if raw.len > raw.storage.len() {
            return Err(CircuitInputError::CapacityExceeded {
                len: raw.len,
                capacity: raw.storage.len(),
            });
        }
        let filler = T::default();
        if let Some(offset) = raw.storage[raw.len..].iter().position(|v| *v != filler) {
            return Err(CircuitInputError::document(
                "storage",
                format!("slot {} past len {} is not filler", raw.len + offset, raw.len),
            ));
        }
        Ok(Self {
            storage: raw.storage,
            len: raw.len,
        })
    }
}

impl<T> BoundedVec<T> {
    /// Creates an empty container of `capacity` slots, each produced by `filler`.
    pub fn new<F>(capacity: usize, filler: F) -> Self
    where
        F: FnMut() -> T,
    {
        let mut storage = Vec::with_capacity(capacity);
        storage.resize_with(capacity, filler);
        Self { storage, len: 0 }
    }

    /// Writes `source` into the leading slots and sets `len = source.len()`.
    ///
    /// Consumes the container and hands it back populated, so a failed extend
    /// never leaves a half-written container behind. A container is populated
    /// once; calling this on one that already holds data fails with
    /// [`CircuitInputError::AlreadyPopulated`].
    pub fn extend_from_slice<S>(mut self, source: &[S]) -> Result<Self>
    where
        S: Clone + Into<T>,
    {
        if self.len != 0 {
            return Err(CircuitInputError::AlreadyPopulated { len: self.len });
        }
        let capacity = self.capacity();
        if source.len() > capacity {
            return Err(CircuitInputError::CapacityExceeded {
                len: source.len(),
                capacity,
            });
        }

        for (slot, value) in self.storage.iter_mut().zip(source) {
            *slot = value.clone().into();
        }
        self.len = source.len();

        debug!(capacity, len = self.len, "populated bounded container");
        Ok(self)
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The full fixed-length backing array, filler included.
    pub fn storage(&self) -> &[T] {
        &self.storage
    }

    /// Only the logically valid prefix.
    pub fn as_slice(&self) -> &[T] {
        &self.storage[..self.len]
    }

    pub fn into_parts(self) -> (Vec<T>, usize) {
        (self.storage, self.len)
    }
}

impl<T: Default> BoundedVec<T> {
    /// Shorthand for a container filled with `T::default()` and populated from `source`.
    pub fn from_slice<S>(capacity: usize, source: &[S]) -> Result<Self>
    where
        S: Clone + Into<T>,
    {
        Self::new(capacity, T::default).extend_from_slice(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;
    use serde_json::json;

    #[test]
    fn fills_prefix_and_leaves_filler() {
        let vec = BoundedVec::<u8>::from_slice(6, b"abc").unwrap();
        assert_eq!(vec.len(), 3);
        assert_eq!(vec.capacity(), 6);
        assert_eq!(vec.storage(), &[b'a', b'b', b'c', 0, 0, 0]);
        assert_eq!(vec.as_slice(), b"abc");
    }

    #[test]
    fn exact_capacity_is_accepted() {
        let vec = BoundedVec::<u8>::from_slice(3, b"xyz").unwrap();
        assert_eq!(vec.len(), 3);
        assert_eq!(vec.storage(), b"xyz");
    }

    #[test]
    fn overflow_is_rejected() {
        let err = BoundedVec::<u8>::from_slice(2, b"abc").unwrap_err();
        assert!(matches!(
            err,
            CircuitInputError::CapacityExceeded {
                len: 3,
                capacity: 2
            }
        ));
    }

    #[test]
    fn empty_source_and_zero_capacity() {
        let empty: &[u8] = &[];
        let vec = BoundedVec::<u8>::from_slice(4, empty).unwrap();
        assert!(vec.is_empty());
        assert_eq!(vec.storage(), &[0, 0, 0, 0]);

        let zero = BoundedVec::<u8>::from_slice(0, empty).unwrap();
        assert_eq!(zero.capacity(), 0);
        assert!(BoundedVec::<u8>::from_slice(0, b"a").is_err());
    }

    #[test]
    fn custom_filler_and_conversion() {
        let vec = BoundedVec::new(3, || BigUint::from(0u8))
            .extend_from_slice(&[7u8])
            .unwrap();
        assert_eq!(
            vec.storage(),
            &[BigUint::from(7u8), BigUint::from(0u8), BigUint::from(0u8)]
        );
    }

    #[test]
    fn populated_container_cannot_be_extended_again() {
        let vec = BoundedVec::<u8>::from_slice(4, b"ab").unwrap();
        let err = vec.extend_from_slice(b"c").unwrap_err();
        assert!(matches!(err, CircuitInputError::AlreadyPopulated { len: 2 }));

        // an empty source leaves the container empty, so it may still be filled
        let empty: &[u8] = &[];
        let vec = BoundedVec::<u8>::from_slice(4, empty)
            .unwrap()
            .extend_from_slice(b"xy")
            .unwrap();
        assert_eq!(vec.storage(), &[b'x', b'y', 0, 0]);
    }

    #[test]
    fn serializes_storage_and_len() {
        let vec = BoundedVec::<u8>::from_slice(4, b"hi").unwrap();
        let value = serde_json::to_value(&vec).unwrap();
        assert_eq!(value, json!({ "storage": [104, 105, 0, 0], "len": 2 }));

        let back: BoundedVec<u8> = serde_json::from_value(value).unwrap();
        assert_eq!(back, vec);
    }

    #[test]
    fn deserialize_rejects_len_past_storage() {
        let bad = json!({ "storage": [1, 2], "len": 3 });
        assert!(serde_json::from_value::<BoundedVec<u8>>(bad).is_err());
    }

    #[test]
    fn deserialize_rejects_data_past_len() {
        let bad = json!({ "storage": [1, 2, 3], "len": 0 });
        assert!(serde_json::from_value::<BoundedVec<u8>>(bad).is_err());

        let tail = json!({ "storage": [1, 0, 7], "len": 1 });
        assert!(serde_json::from_value::<BoundedVec<u8>>(tail).is_err());

        let ok = json!({ "storage": [1, 0, 0], "len": 1 });
        let vec: BoundedVec<u8> = serde_json::from_value(ok).unwrap();
        assert_eq!(vec.as_slice(), &[1]);
    }
}
