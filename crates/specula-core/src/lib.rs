//! Core types shared by Specula's reflection probes: mirror-plane geometry,
//! poses, probe placement, bounds and 128-bit content hashing.

pub mod bounds;
pub mod error;
pub mod hash;
pub mod plane;
pub mod pose;
pub mod transform;

pub use bounds::{Aabb, Sphere};
pub use error::{Result, SpeculaError};
pub use hash::{append_hash, compute_hash128, ContentHasher, Hash128, HashContent};
pub use plane::{reflection_matrix, Plane};
pub use pose::{look_rotation, Pose};
pub use transform::ProbeTransform;

pub use glam;
