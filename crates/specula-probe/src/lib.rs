//! Reflection probes for Specula.
//!
//! A probe owns its capture settings and influence volume; the
//! [`ReflectionRegistry`] tracks which probes are live and which have asked
//! for a realtime capture this frame. Planar probes solve a mirrored capture
//! pose from the viewer, cubemap probes capture from a fixed point.

pub mod camera;
pub mod config;
pub mod cubemap;
pub mod migration;
pub mod persist;
pub mod planar;
pub mod probe;
pub mod registry;
pub mod settings;
pub mod volume;

pub use camera::{CaptureCamera, CaptureCameraUniform};
pub use config::ReflectionSystemConfig;
pub use cubemap::{CubemapCaptureProperties, CubemapReflectionProbe};
pub use migration::{migrate, CURRENT_VERSION};
pub use persist::PlanarProbeData;
pub use planar::{PlanarCaptureProperties, PlanarReflectionProbe};
pub use probe::{CaptureProbe, ProbeId, ProbeKind, ProbeState, TextureRef};
pub use registry::{ReflectionRegistry, RegisteredProbe, SharedReflectionRegistry};
pub use settings::{
    CapturePositionMode, CaptureSettings, FrameSettings, ReflectionProbeMode, RefreshMode,
    DEFAULT_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW,
};
pub use volume::{InfluenceShape, InfluenceVolume, ProxyShape, ProxyVolume};
