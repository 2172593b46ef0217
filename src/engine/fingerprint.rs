//! Content fingerprints for determinism checks and HTTP ETags.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// `sha256:` plus the hex of the first 16 digest bytes of the JSON encoding.
pub fn fingerprint<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    Ok(fingerprint_bytes(&bytes))
}

pub fn fingerprint_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hash = hasher.finalize();
    format!("sha256:{}", hex::encode(&hash[..16]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_fingerprint_is_stable() {
        let mut a = BTreeMap::new();
        a.insert("Polygon", 1);
        a.insert("Ethereum", 2);
        let mut b = BTreeMap::new();
        b.insert("Ethereum", 2);
        b.insert("Polygon", 1);
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
    }

    #[test]
    fn test_fingerprint_format() {
        let fp = fingerprint_bytes(b"chains");
        assert!(fp.starts_with("sha256:"));
        assert_eq!(fp.len(), "sha256:".len() + 32);
        assert_ne!(fp, fingerprint_bytes(b"protocols"));
    }
}
