//! Capture settings shared by every probe kind.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use specula_core::{ContentHasher, HashContent, Result, SpeculaError};

/// Field of view used when a probe does not override it, in degrees.
pub const DEFAULT_FIELD_OF_VIEW: f32 = 90.0;
pub const MAX_FIELD_OF_VIEW: f32 = 180.0;

/// Where a probe's texture comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReflectionProbeMode {
    Baked = 0,
    Custom = 1,
    Realtime = 2,
}

impl Default for ReflectionProbeMode {
    fn default() -> Self {
        ReflectionProbeMode::Baked
    }
}

/// How often a realtime probe asks to be re-rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefreshMode {
    OnAwake = 0,
    EveryFrame = 1,
    ViaScripting = 2,
}

impl Default for RefreshMode {
    fn default() -> Self {
        RefreshMode::OnAwake
    }
}

/// Which viewer a planar probe mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapturePositionMode {
    /// Mirror a fixed reference point looking at the probe.
    MirrorReference = 0,
    /// Mirror the actual viewer every time a capture is requested.
    MirrorViewer = 1,
}

impl Default for CapturePositionMode {
    fn default() -> Self {
        CapturePositionMode::MirrorReference
    }
}

bitflags! {
    /// Renderer features enabled while capturing a probe.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct FrameSettings: u32 {
        const OPAQUE_OBJECTS = 1 << 0;
        const TRANSPARENT_OBJECTS = 1 << 1;
        const SHADOWS = 1 << 2;
        const CONTACT_SHADOWS = 1 << 3;
        const SSAO = 1 << 4;
        const SSR = 1 << 5;
        const VOLUMETRICS = 1 << 6;
        const SKY = 1 << 7;
        const POSTPROCESS = 1 << 8;
    }
}

impl FrameSettings {
    /// Feature set used for probe captures when no override is given.
    pub fn capture_defaults() -> Self {
        Self::OPAQUE_OBJECTS
            | Self::TRANSPARENT_OBJECTS
            | Self::SHADOWS
            | Self::SSAO
            | Self::SKY
    }
}

impl HashContent for FrameSettings {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        hasher.write_u32(self.bits());
    }
}

/// Probe-independent capture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureSettings {
    pub mode: ReflectionProbeMode,
    pub refresh_mode: RefreshMode,
    pub capture_position_mode: CapturePositionMode,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Capture origin relative to the probe.
    pub capture_local_position: Vec3,
    pub mirror_plane_local_position: Vec3,
    pub mirror_plane_local_normal: Vec3,
    pub override_field_of_view: bool,
    /// Degrees, kept within `[0, 180]`.
    pub field_of_view_override: f32,
    /// `None` captures with [`FrameSettings::capture_defaults`].
    pub frame_settings: Option<FrameSettings>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            mode: ReflectionProbeMode::Baked,
            refresh_mode: RefreshMode::OnAwake,
            capture_position_mode: CapturePositionMode::MirrorReference,
            near_plane: 1.0,
            far_plane: 1000.0,
            capture_local_position: Vec3::ZERO,
            mirror_plane_local_position: Vec3::ZERO,
            mirror_plane_local_normal: Vec3::Y,
            override_field_of_view: false,
            field_of_view_override: DEFAULT_FIELD_OF_VIEW,
            frame_settings: None,
        }
    }
}

impl CaptureSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: ReflectionProbeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_refresh_mode(mut self, refresh_mode: RefreshMode) -> Self {
        self.refresh_mode = refresh_mode;
        self
    }

    pub fn with_capture_position_mode(mut self, mode: CapturePositionMode) -> Self {
        self.capture_position_mode = mode;
        self
    }

    pub fn with_clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near_plane = near;
        self.far_plane = far;
        self
    }

    pub fn with_capture_local_position(mut self, position: Vec3) -> Self {
        self.capture_local_position = position;
        self
    }

    pub fn with_mirror_plane(mut self, local_position: Vec3, local_normal: Vec3) -> Self {
        self.mirror_plane_local_position = local_position;
        self.mirror_plane_local_normal = local_normal;
        self
    }

    /// Enable the field of view override (clamped to `[0, 180]` degrees).
    pub fn with_field_of_view_override(mut self, degrees: f32) -> Self {
        self.override_field_of_view = true;
        self.field_of_view_override = degrees.clamp(0.0, MAX_FIELD_OF_VIEW);
        self
    }

    pub fn with_frame_settings(mut self, frame_settings: FrameSettings) -> Self {
        self.frame_settings = Some(frame_settings);
        self
    }

    /// Field of view the capture camera renders with, in degrees.
    pub fn field_of_view(&self) -> f32 {
        if self.override_field_of_view {
            self.field_of_view_override
        } else {
            DEFAULT_FIELD_OF_VIEW
        }
    }

    pub fn effective_frame_settings(&self) -> FrameSettings {
        self.frame_settings
            .unwrap_or_else(FrameSettings::capture_defaults)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.near_plane > 0.0) {
            return Err(SpeculaError::InvalidConfiguration(format!(
                "near plane must be positive, got {}",
                self.near_plane
            )));
        }
        if !(self.far_plane > self.near_plane) {
            return Err(SpeculaError::InvalidConfiguration(format!(
                "far plane {} must lie beyond near plane {}",
                self.far_plane, self.near_plane
            )));
        }
        if !(0.0..=MAX_FIELD_OF_VIEW).contains(&self.field_of_view_override) {
            return Err(SpeculaError::InvalidConfiguration(format!(
                "field of view override {} is outside [0, {}]",
                self.field_of_view_override, MAX_FIELD_OF_VIEW
            )));
        }
        Ok(())
    }
}

impl HashContent for CaptureSettings {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        hasher
            .write_u32(self.mode as u32)
            .write_u32(self.refresh_mode as u32)
            .write_u32(self.capture_position_mode as u32)
            .write_f32(self.near_plane)
            .write_f32(self.far_plane)
            .write_vec3(self.capture_local_position)
            .write_vec3(self.mirror_plane_local_position)
            .write_vec3(self.mirror_plane_local_normal)
            .write_bool(self.override_field_of_view)
            .write_f32(self.field_of_view_override)
            .write(&self.frame_settings);
    }
}
