//! Digests de contenido para los recursos de las definiciones compiladas.

use blake3::Hasher;

/// Digest blake3 de bytes crudos, en hex minúscula.
pub fn hash_bytes(input: &[u8]) -> String {
    let mut h = Hasher::new();
    h.update(input);
    h.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex() {
        let a = hash_bytes(b"<definitions/>");
        assert_eq!(a, hash_bytes(b"<definitions/>"));
        assert_ne!(a, hash_bytes(b"<definitions />"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
