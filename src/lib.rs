//! Specula - planar reflection capture
//!
//! Solves where a mirror's capture camera goes for a given viewer, keeps a
//! registry of live probes, and detects when a baked capture is out of date.

pub use specula_core as core;
pub use specula_probe as probe;

pub mod prelude {
    pub use crate::core::{
        Aabb, Hash128, Plane, Pose, ProbeTransform, Result, SpeculaError, Sphere,
    };
    pub use crate::probe::{
        CaptureCamera, CapturePositionMode, CaptureProbe, CaptureSettings,
        CubemapReflectionProbe, FrameSettings, InfluenceVolume, PlanarReflectionProbe, ProbeId,
        ReflectionProbeMode, ReflectionRegistry, ReflectionSystemConfig, RefreshMode,
        SharedReflectionRegistry,
    };
    pub use crate::core::glam;
}
