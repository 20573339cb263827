//! Random namespace suffixes.
//!
//! Suffixes only need to avoid collisions between concurrent deployments,
//! so any `Rng` will do. Callers inject it, which keeps tests deterministic.

use rand::Rng;

const SUFFIX_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 8;

/// Prefix of the namespace used by the state bootstrap when none is resolved.
pub const DEFAULT_NAMESPACE_PREFIX: &str = "dce-default-";

/// Returns 8 characters drawn from `[a-z0-9]`.
pub fn random_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| char::from(SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())]))
        .collect()
}

/// Returns `namespace`, or `dce-default-<random8>` when it is empty.
pub fn namespace_or_default<R: Rng + ?Sized>(namespace: &str, rng: &mut R) -> String {
    if namespace.is_empty() {
        format!("{DEFAULT_NAMESPACE_PREFIX}{}", random_suffix(rng))
    } else {
        namespace.to_string()
    }
}
