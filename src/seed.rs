//! Key derivation from accumulated entropy and the running counter.

use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

use crate::EntropySample;

/// Length of a derived key in bytes (one SHA-512 digest).
pub const KEY_SIZE: usize = 64;

/// Generator key, wiped from memory on drop.
pub type Key = Zeroizing<[u8; KEY_SIZE]>;

/// Derive a fresh key: `SHA-512(seed_text(entropy) || decimal(counter))`.
///
/// ```rust
/// use fortuna::{derive_key, EntropySample};
///
/// let entropy = EntropySample::Text("e".repeat(128));
/// assert_eq!(*derive_key(&entropy, 3), *derive_key(&entropy, 3));
/// assert_ne!(*derive_key(&entropy, 3), *derive_key(&entropy, 4));
/// ```
pub fn derive_key(entropy: &EntropySample, counter: u64) -> Key {
    let mut hasher = Sha512::new();
    hasher.update(entropy.to_seed_text().as_bytes());
    hasher.update(counter.to_string().as_bytes());

    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    key.copy_from_slice(&hasher.finalize());
    key
}
