use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use specula_core::{
    append_hash, compute_hash128, ContentHasher, Hash128, HashContent, Pose, ProbeTransform,
};

use crate::probe::{CaptureProbe, ProbeId, ProbeKind, ProbeState};
use crate::settings::CaptureSettings;
use crate::volume::InfluenceVolume;

/// Capture properties specific to cubemap probes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubemapCaptureProperties {
    /// Edge length of each cube face in texels.
    pub resolution: u32,
    pub box_projection: bool,
}

impl Default for CubemapCaptureProperties {
    fn default() -> Self {
        Self {
            resolution: 256,
            box_projection: false,
        }
    }
}

impl HashContent for CubemapCaptureProperties {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        hasher
            .write_u32(self.resolution)
            .write_bool(self.box_projection);
    }
}

/// Omnidirectional probe captured from a single point near the probe.
#[derive(Debug, Clone)]
pub struct CubemapReflectionProbe {
    state: ProbeState,
    capture_settings: CaptureSettings,
    probe_capture_properties: CubemapCaptureProperties,
    influence_volume: InfluenceVolume,
}

impl CubemapReflectionProbe {
    pub fn new(id: ProbeId) -> Self {
        Self {
            state: ProbeState::new(id),
            capture_settings: CaptureSettings::default(),
            probe_capture_properties: CubemapCaptureProperties::default(),
            influence_volume: InfluenceVolume::default(),
        }
    }

    pub fn with_capture_settings(mut self, settings: CaptureSettings) -> Self {
        self.capture_settings = settings;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.probe_capture_properties.resolution = resolution;
        self
    }

    pub fn with_box_projection(mut self, size: Vec3) -> Self {
        self.probe_capture_properties.box_projection = true;
        self.influence_volume = InfluenceVolume::new_box(size);
        self
    }

    pub fn with_influence_volume(mut self, volume: InfluenceVolume) -> Self {
        self.influence_volume = volume;
        self
    }

    pub fn capture_settings_mut(&mut self) -> &mut CaptureSettings {
        &mut self.capture_settings
    }

    pub fn probe_capture_properties(&self) -> &CubemapCaptureProperties {
        &self.probe_capture_properties
    }
}

impl CaptureProbe for CubemapReflectionProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Cubemap
    }

    fn state(&self) -> &ProbeState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ProbeState {
        &mut self.state
    }

    fn capture_settings(&self) -> &CaptureSettings {
        &self.capture_settings
    }

    fn influence_volume(&self) -> &InfluenceVolume {
        &self.influence_volume
    }

    /// Cube faces are axis aligned, so only the capture origin depends on
    /// the probe; the viewer plays no part.
    fn compute_capture_transform(&self, _viewer: Pose, transform: &ProbeTransform) -> Pose {
        Pose::new(
            transform.transform_point(self.capture_settings.capture_local_position),
            Quat::IDENTITY,
        )
    }

    fn compute_bake_hash(&self) -> Hash128 {
        append_hash(
            compute_hash128(&self.capture_settings),
            compute_hash128(&self.probe_capture_properties),
        )
    }
}
