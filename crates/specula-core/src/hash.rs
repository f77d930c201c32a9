//! 128-bit content hashes used as bake cache keys.
//!
//! Values are fed field by field, little-endian, into a SHA-256 digest; the
//! first 16 bytes of the digest form the [`Hash128`]. Feeding order is part of
//! the key, so implementors of [`HashContent`] must write fields in a stable
//! declared order.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hash128(pub [u8; 16]);

impl Hash128 {
    pub const ZERO: Self = Self([0; 16]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Hash128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Hash128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash128({self})")
    }
}

/// Streaming hasher producing a [`Hash128`].
pub struct ContentHasher {
    digest: Sha256,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self {
            digest: Sha256::new(),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.digest.update(bytes);
        self
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.write_bytes(&[value])
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(value as u8)
    }

    /// Writes the raw bit pattern, so `0.0` and `-0.0` hash differently.
    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.write_bytes(&value.to_bits().to_le_bytes())
    }

    pub fn write_vec3(&mut self, value: Vec3) -> &mut Self {
        self.write_f32(value.x).write_f32(value.y).write_f32(value.z)
    }

    pub fn write_hash(&mut self, value: Hash128) -> &mut Self {
        self.write_bytes(&value.0)
    }

    pub fn write<T: HashContent + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.hash_content(self);
        self
    }

    pub fn finish(self) -> Hash128 {
        let digest = self.digest.finalize();
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Hash128(bytes)
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Types that can be folded into a [`ContentHasher`].
pub trait HashContent {
    fn hash_content(&self, hasher: &mut ContentHasher);
}

impl HashContent for bool {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        hasher.write_bool(*self);
    }
}

impl HashContent for u32 {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        hasher.write_u32(*self);
    }
}

impl HashContent for f32 {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        hasher.write_f32(*self);
    }
}

impl HashContent for Vec3 {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        hasher.write_vec3(*self);
    }
}

impl HashContent for Hash128 {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        hasher.write_hash(*self);
    }
}

impl<T: HashContent> HashContent for Option<T> {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        match self {
            Some(value) => {
                hasher.write_u8(1);
                value.hash_content(hasher);
            }
            None => {
                hasher.write_u8(0);
            }
        }
    }
}

pub fn compute_hash128<T: HashContent + ?Sized>(value: &T) -> Hash128 {
    let mut hasher = ContentHasher::new();
    value.hash_content(&mut hasher);
    hasher.finish()
}

/// Folds `appended` into `base`, base first.
///
/// The result depends on both inputs and on their order:
/// `append_hash(a, b) != append_hash(b, a)` for `a != b`.
pub fn append_hash(base: Hash128, appended: Hash128) -> Hash128 {
    let mut hasher = ContentHasher::new();
    hasher.write_hash(base).write_hash(appended);
    hasher.finish()
}
