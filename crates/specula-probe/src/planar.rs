//! Planar reflection probes: a mirror plane through the probe, captured from
//! the reflection of a viewer.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use specula_core::{
    append_hash, compute_hash128, look_rotation, reflection_matrix, Aabb, ContentHasher, Hash128,
    HashContent, Plane, Pose, ProbeTransform, Sphere,
};

use crate::probe::{CaptureProbe, ProbeId, ProbeKind, ProbeState, TextureRef};
use crate::settings::{CapturePositionMode, CaptureSettings, ReflectionProbeMode, RefreshMode};
use crate::volume::{InfluenceVolume, ProxyShape, ProxyVolume};

/// Capture properties specific to planar probes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarCaptureProperties {
    pub capture_position_mode: CapturePositionMode,
    /// Point mirrored in [`CapturePositionMode::MirrorReference`] mode.
    pub local_reference_position: Vec3,
}

impl Default for PlanarCaptureProperties {
    fn default() -> Self {
        Self {
            capture_position_mode: CapturePositionMode::MirrorReference,
            local_reference_position: Vec3::ZERO,
        }
    }
}

impl HashContent for PlanarCaptureProperties {
    fn hash_content(&self, hasher: &mut ContentHasher) {
        hasher
            .write_u32(self.capture_position_mode as u32)
            .write_vec3(self.local_reference_position);
    }
}

#[derive(Debug, Clone)]
pub struct PlanarReflectionProbe {
    state: ProbeState,
    capture_settings: CaptureSettings,
    probe_capture_properties: PlanarCaptureProperties,
    influence_volume: InfluenceVolume,
    proxy_volume: Option<ProxyVolume>,
    custom_texture: Option<TextureRef>,
    baked_texture: Option<TextureRef>,
    realtime_texture: Option<TextureRef>,
}

impl PlanarReflectionProbe {
    pub fn new(id: ProbeId) -> Self {
        Self {
            state: ProbeState::new(id),
            capture_settings: CaptureSettings::default(),
            probe_capture_properties: PlanarCaptureProperties::default(),
            influence_volume: InfluenceVolume::default(),
            proxy_volume: None,
            custom_texture: None,
            baked_texture: None,
            realtime_texture: None,
        }
    }

    pub fn with_capture_settings(mut self, settings: CaptureSettings) -> Self {
        self.capture_settings = settings;
        self
    }

    pub fn with_probe_capture_properties(mut self, properties: PlanarCaptureProperties) -> Self {
        self.probe_capture_properties = properties;
        self
    }

    pub fn with_influence_volume(mut self, volume: InfluenceVolume) -> Self {
        self.influence_volume = volume;
        self
    }

    pub fn with_proxy_volume(mut self, proxy: ProxyVolume) -> Self {
        self.proxy_volume = Some(proxy);
        self
    }

    /// Edits to the returned settings take effect in the registry only after
    /// [`CaptureProbe::on_validate`].
    pub fn capture_settings_mut(&mut self) -> &mut CaptureSettings {
        &mut self.capture_settings
    }

    pub fn probe_capture_properties(&self) -> &PlanarCaptureProperties {
        &self.probe_capture_properties
    }

    pub fn set_capture_position_mode(&mut self, mode: CapturePositionMode) {
        self.probe_capture_properties.capture_position_mode = mode;
    }

    pub fn set_local_reference_position(&mut self, position: Vec3) {
        self.probe_capture_properties.local_reference_position = position;
    }

    pub fn influence_volume_mut(&mut self) -> &mut InfluenceVolume {
        &mut self.influence_volume
    }

    pub fn proxy_volume(&self) -> Option<&ProxyVolume> {
        self.proxy_volume.as_ref()
    }

    pub fn set_proxy_volume(&mut self, proxy: Option<ProxyVolume>) {
        self.proxy_volume = proxy;
    }

    pub fn custom_texture(&self) -> Option<TextureRef> {
        self.custom_texture
    }

    pub fn set_custom_texture(&mut self, texture: Option<TextureRef>) {
        self.custom_texture = texture;
    }

    pub fn baked_texture(&self) -> Option<TextureRef> {
        self.baked_texture
    }

    pub fn set_baked_texture(&mut self, texture: Option<TextureRef>) {
        self.baked_texture = texture;
    }

    pub fn realtime_texture(&self) -> Option<TextureRef> {
        self.realtime_texture
    }

    /// Set by the renderer once a realtime capture target exists.
    pub fn set_realtime_texture(&mut self, texture: Option<TextureRef>) {
        self.realtime_texture = texture;
    }

    /// Texture sampled for this probe in its current mode.
    pub fn texture(&self) -> Option<TextureRef> {
        match self.capture_settings.mode {
            ReflectionProbeMode::Baked => self.baked_texture,
            ReflectionProbeMode::Custom => self.custom_texture,
            ReflectionProbeMode::Realtime => self.realtime_texture,
        }
    }

    /// Plane the probe mirrors across: through the probe, along its forward axis.
    pub fn reflection_plane(&self, transform: &ProbeTransform) -> Plane {
        Plane::from_point_normal(transform.position, transform.forward())
    }

    pub fn capture_mirror_plane_position(&self, transform: &ProbeTransform) -> Vec3 {
        transform.transform_point(self.capture_settings.mirror_plane_local_position)
    }

    pub fn capture_mirror_plane_normal(&self, transform: &ProbeTransform) -> Vec3 {
        transform.transform_direction(self.capture_settings.mirror_plane_local_normal)
    }

    /// True when the probe follows the viewer every frame, so the renderer
    /// can clip its capture against the mirror plane.
    pub fn use_mirror_plane(&self) -> bool {
        self.capture_settings.mode == ReflectionProbeMode::Realtime
            && self.capture_settings.refresh_mode == RefreshMode::EveryFrame
            && self.capture_settings.capture_position_mode == CapturePositionMode::MirrorViewer
    }

    pub fn bounds(&self, transform: &ProbeTransform) -> Aabb {
        self.influence_volume.bounds_at(transform)
    }

    pub fn bounding_sphere(&self, transform: &ProbeTransform) -> Sphere {
        self.influence_volume.bounding_sphere_at(transform)
    }

    /// Influence volume placement with the probe's rotation and unit scale.
    pub fn influence_to_world(&self, transform: &ProbeTransform) -> Mat4 {
        Mat4::from_rotation_translation(
            transform.rotation,
            self.influence_volume.world_position(transform),
        )
    }

    pub fn proxy_to_world(&self, transform: &ProbeTransform) -> Mat4 {
        match &self.proxy_volume {
            Some(proxy) => proxy.to_world(),
            None => self.influence_to_world(transform),
        }
    }

    pub fn proxy_shape(&self) -> ProxyShape {
        match &self.proxy_volume {
            Some(proxy) => proxy.shape,
            None => self.influence_volume.shape.into(),
        }
    }

    pub fn proxy_extents(&self) -> Vec3 {
        match &self.proxy_volume {
            Some(proxy) => proxy.extents,
            None => self.influence_volume.box_size,
        }
    }

    pub fn infinite_projection(&self) -> bool {
        matches!(
            &self.proxy_volume,
            Some(proxy) if proxy.shape == ProxyShape::Infinite
        )
    }

    pub(crate) fn from_parts(
        state: ProbeState,
        capture_settings: CaptureSettings,
        probe_capture_properties: PlanarCaptureProperties,
        influence_volume: InfluenceVolume,
        proxy_volume: Option<ProxyVolume>,
        custom_texture: Option<TextureRef>,
        baked_texture: Option<TextureRef>,
    ) -> Self {
        Self {
            state,
            capture_settings,
            probe_capture_properties,
            influence_volume,
            proxy_volume,
            custom_texture,
            baked_texture,
            realtime_texture: None,
        }
    }
}

impl CaptureProbe for PlanarReflectionProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Planar
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

    fn compute_capture_transform(&self, viewer: Pose, transform: &ProbeTransform) -> Pose {
        let mut viewer = viewer;
        if self.probe_capture_properties.capture_position_mode
            == CapturePositionMode::MirrorReference
        {
            viewer.position = self.probe_capture_properties.local_reference_position;
            viewer.rotation = look_rotation(transform.position - viewer.position, Vec3::Y);
        }

        let reflection = reflection_matrix(&self.reflection_plane(transform));
        let position = reflection.transform_point3(viewer.position);
        let forward = reflection.transform_vector3(viewer.forward());
        let up = reflection.transform_vector3(viewer.up());

        Pose::new(position, look_rotation(forward, up))
    }

    fn compute_bake_hash(&self) -> Hash128 {
        let settings_hash = compute_hash128(&self.capture_settings);
        let probe_hash = compute_hash128(&self.probe_capture_properties);
        let hash = append_hash(settings_hash, probe_hash);
        log::trace!("Planar probe {:?} bake hash {}", self.id(), hash);
        hash
    }
}
