//! Influence and proxy volumes attached to a probe.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use specula_core::{Aabb, ProbeTransform, Sphere};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfluenceShape {
    Box,
    Sphere,
}

/// Region of the scene a probe's reflection applies to, in probe space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfluenceVolume {
    pub shape: InfluenceShape,
    pub box_size: Vec3,
    pub sphere_radius: f32,
    /// Volume center relative to the probe.
    pub offset: Vec3,
    /// Sphere center written by schema version 1, before spheres and boxes
    /// shared `offset`. Consumed by [`InfluenceVolume::migrate_offset_sphere`].
    pub sphere_base_offset: Option<Vec3>,
}

impl Default for InfluenceVolume {
    fn default() -> Self {
        Self {
            shape: InfluenceShape::Box,
            box_size: Vec3::splat(10.0),
            sphere_radius: 3.0,
            offset: Vec3::ZERO,
            sphere_base_offset: None,
        }
    }
}

impl InfluenceVolume {
    pub fn new_box(size: Vec3) -> Self {
        Self {
            shape: InfluenceShape::Box,
            box_size: size,
            ..Self::default()
        }
    }

    pub fn new_sphere(radius: f32) -> Self {
        Self {
            shape: InfluenceShape::Sphere,
            sphere_radius: radius,
            ..Self::default()
        }
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    pub fn world_position(&self, transform: &ProbeTransform) -> Vec3 {
        transform.transform_point(self.offset)
    }

    pub fn bounds_at(&self, transform: &ProbeTransform) -> Aabb {
        match self.shape {
            InfluenceShape::Box => {
                Aabb::from_center_size(self.offset, self.box_size).transform(&transform.to_matrix())
            }
            InfluenceShape::Sphere => {
                let radius = self.world_sphere_radius(transform);
                Aabb::from_center_size(self.world_position(transform), Vec3::splat(radius * 2.0))
            }
        }
    }

    pub fn bounding_sphere_at(&self, transform: &ProbeTransform) -> Sphere {
        let center = self.world_position(transform);
        match self.shape {
            InfluenceShape::Box => {
                let half_size = self.box_size.abs() * transform.scale.abs() * 0.5;
                Sphere::new(center, half_size.length())
            }
            InfluenceShape::Sphere => Sphere::new(center, self.world_sphere_radius(transform)),
        }
    }

    fn world_sphere_radius(&self, transform: &ProbeTransform) -> f32 {
        self.sphere_radius * transform.scale.abs().max_element()
    }

    /// Moves a version-1 sphere center into `offset`.
    ///
    /// Returns whether a legacy field was consumed. A box volume drops the
    /// legacy value without touching `offset`. Running it again is a no-op.
    pub fn migrate_offset_sphere(&mut self) -> bool {
        match self.sphere_base_offset.take() {
            Some(legacy) if self.shape == InfluenceShape::Sphere => {
                self.offset = legacy;
                true
            }
            Some(_) => true,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProxyShape {
    Box,
    Sphere,
    Infinite,
}

impl From<InfluenceShape> for ProxyShape {
    fn from(shape: InfluenceShape) -> Self {
        match shape {
            InfluenceShape::Box => ProxyShape::Box,
            InfluenceShape::Sphere => ProxyShape::Sphere,
        }
    }
}

/// Geometry the captured texture is projected onto for parallax correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyVolume {
    pub shape: ProxyShape,
    pub extents: Vec3,
    /// World placement of the proxy, independent of the probe.
    pub transform: ProbeTransform,
}

impl ProxyVolume {
    pub fn new(shape: ProxyShape, extents: Vec3, transform: ProbeTransform) -> Self {
        Self {
            shape,
            extents,
            transform,
        }
    }

    pub fn to_world(&self) -> Mat4 {
        self.transform.to_matrix()
    }
}
