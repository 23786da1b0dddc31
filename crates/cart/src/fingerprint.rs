//! Row identity derived from product id and attributes.

use sha2::{Digest, Sha256};

use crate::value_objects::{Attributes, ProductId, RawId};

/// Computes the raw id of a cart line.
///
/// Attributes are visited in ascending key order, so two sets holding the same
/// entries always hash alike. Every key and value is length-prefixed or tagged,
/// which keeps `("ab", "c")` and `("a", "bc")` apart.
pub fn fingerprint(id: &ProductId, attributes: &Attributes) -> RawId {
    let mut canonical = Vec::with_capacity(64);
    canonical.extend_from_slice(&(id.as_str().len() as u64).to_be_bytes());
    canonical.extend_from_slice(id.as_str().as_bytes());

    for (key, value) in attributes.iter() {
        canonical.extend_from_slice(&(key.len() as u64).to_be_bytes());
        canonical.extend_from_slice(key.as_bytes());
        value.write_canonical(&mut canonical);
    }

    RawId::new(hex::encode(Sha256::digest(&canonical)))
}
