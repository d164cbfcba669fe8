//! Stable fingerprints for versioning catalogs and pipelines.

use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint (lowercase hex) for a string.
pub fn fingerprint(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::fingerprint;

    #[test]
    fn test_fingerprint_stable() {
        let first = fingerprint("lexicon|v1|0.15");
        let second = fingerprint("lexicon|v1|0.15");
        let different = fingerprint("model|v1|0.15");

        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 64);
    }
}
