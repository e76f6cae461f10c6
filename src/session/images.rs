// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Ordered list of captured screenshots

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One imported screenshot with its display position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedImage {
    pub id: String,
    /// Raw image bytes, shared between the live list and history snapshots
    #[serde(with = "bytes_base64")]
    pub bytes: Arc<[u8]>,
    pub order: usize,
}

impl CapturedImage {
    /// Create a capture with a fresh unique id
    pub fn new(bytes: impl Into<Arc<[u8]>>, order: usize) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            bytes: bytes.into(),
            order,
        }
    }

    /// Short content fingerprint for display
    pub fn fingerprint(&self) -> String {
        let hash = blake3::hash(&self.bytes);
        hash.to_hex().as_str()[..12].to_string()
    }

    /// Size of the image payload in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Reassign `order` to `0..N-1` following list position
pub fn reindex(images: &mut [CapturedImage]) {
    for (index, image) in images.iter_mut().enumerate() {
        image.order = index;
    }
}

/// Remove the image with `id`. Returns false if it was not present.
pub fn remove(images: &mut Vec<CapturedImage>, id: &str) -> bool {
    let before = images.len();
    images.retain(|image| image.id != id);
    if images.len() == before {
        return false;
    }
    reindex(images);
    true
}

/// Move the image with `id` to `new_index`, shifting everything in between.
///
/// Returns false, leaving the list untouched, when `id` is unknown or
/// `new_index` is outside `[0, len - 1]`.
pub fn move_to(images: &mut Vec<CapturedImage>, id: &str, new_index: usize) -> bool {
    let Some(current) = images.iter().position(|image| image.id == id) else {
        return false;
    };
    if new_index >= images.len() {
        return false;
    }

    let moved = images.remove(current);
    images.insert(new_index, moved);
    reindex(images);
    true
}

mod bytes_base64 {
    use base64::{engine::general_purpose, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::sync::Arc;

    pub fn serialize<S: Serializer>(bytes: &Arc<[u8]>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<[u8]>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(encoded)
            .map(Arc::from)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> Vec<CapturedImage> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| CapturedImage {
                id: name.to_string(),
                bytes: Arc::from(name.as_bytes()),
                order: i,
            })
            .collect()
    }

    fn ids(images: &[CapturedImage]) -> Vec<&str> {
        images.iter().map(|i| i.id.as_str()).collect()
    }

    fn orders(images: &[CapturedImage]) -> Vec<usize> {
        images.iter().map(|i| i.order).collect()
    }

    #[test]
    fn test_move_last_to_front() {
        let mut images = list(&["a", "b", "c"]);
        assert!(move_to(&mut images, "c", 0));
        assert_eq!(ids(&images), vec!["c", "a", "b"]);
        assert_eq!(orders(&images), vec![0, 1, 2]);
    }

    #[test]
    fn test_move_front_to_middle() {
        let mut images = list(&["a", "b", "c", "d"]);
        assert!(move_to(&mut images, "a", 2));
        assert_eq!(ids(&images), vec!["b", "c", "a", "d"]);
        assert_eq!(orders(&images), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_move_rejects_out_of_range() {
        let mut images = list(&["a", "b", "c"]);
        let before = images.clone();
        assert!(!move_to(&mut images, "a", 3));
        assert_eq!(images, before);
    }

    #[test]
    fn test_move_rejects_unknown_id() {
        let mut images = list(&["a", "b"]);
        let before = images.clone();
        assert!(!move_to(&mut images, "zzz", 0));
        assert_eq!(images, before);
    }

    #[test]
    fn test_remove_reindexes() {
        let mut images = list(&["a", "b", "c"]);
        assert!(remove(&mut images, "b"));
        assert_eq!(ids(&images), vec!["a", "c"]);
        assert_eq!(orders(&images), vec![0, 1]);

        // Second removal of the same id is a no-op
        let before = images.clone();
        assert!(!remove(&mut images, "b"));
        assert_eq!(images, before);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = CapturedImage::new(b"same".to_vec(), 0);
        let b = CapturedImage::new(b"same".to_vec(), 1);
        assert_ne!(a.id, b.id);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 12);
    }

    #[test]
    fn test_bytes_serialize_as_base64() {
        let image = CapturedImage {
            id: "x".to_string(),
            bytes: Arc::from(&b"hi"[..]),
            order: 0,
        };
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json["bytes"], "aGk=");
    }
}
