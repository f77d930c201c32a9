//! On-disk form of planar probes.
//!
//! Loading is two explicit passes: [`decode`] turns bytes into raw data at
//! whatever schema version it was written with, then
//! [`migrate`](crate::migration::migrate) upgrades it. [`load`] runs both.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use specula_core::{Result, SpeculaError};
use std::path::Path;

use crate::migration::{migrate, CURRENT_VERSION};
use crate::planar::{PlanarCaptureProperties, PlanarReflectionProbe};
use crate::probe::{CaptureProbe, ProbeId, ProbeState, TextureRef};
use crate::settings::{
    CapturePositionMode, CaptureSettings, FrameSettings, ReflectionProbeMode, RefreshMode,
    MAX_FIELD_OF_VIEW,
};
use crate::volume::{InfluenceVolume, ProxyVolume};

/// Serialized planar probe, field for field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanarProbeData {
    pub version: u32,
    pub capture_local_position: Vec3,
    pub custom_texture: Option<TextureRef>,
    pub baked_texture: Option<TextureRef>,
    pub frame_settings: Option<FrameSettings>,
    pub capture_near_plane: f32,
    pub capture_far_plane: f32,
    pub capture_position_mode: CapturePositionMode,
    pub capture_mirror_plane_local_position: Vec3,
    pub capture_mirror_plane_local_normal: Vec3,
    pub override_field_of_view: bool,
    pub field_of_view_override: f32,
    pub probe_capture_properties: PlanarCaptureProperties,
    pub mode: ReflectionProbeMode,
    pub refresh_mode: RefreshMode,
    pub influence_volume: InfluenceVolume,
    pub proxy_volume: Option<ProxyVolume>,
}

impl Default for PlanarProbeData {
    fn default() -> Self {
        let settings = CaptureSettings::default();
        Self {
            version: CURRENT_VERSION,
            capture_local_position: settings.capture_local_position,
            custom_texture: None,
            baked_texture: None,
            frame_settings: settings.frame_settings,
            capture_near_plane: settings.near_plane,
            capture_far_plane: settings.far_plane,
            capture_position_mode: settings.capture_position_mode,
            capture_mirror_plane_local_position: settings.mirror_plane_local_position,
            capture_mirror_plane_local_normal: settings.mirror_plane_local_normal,
            override_field_of_view: settings.override_field_of_view,
            field_of_view_override: settings.field_of_view_override,
            probe_capture_properties: PlanarCaptureProperties::default(),
            mode: settings.mode,
            refresh_mode: settings.refresh_mode,
            influence_volume: InfluenceVolume::default(),
            proxy_volume: None,
        }
    }
}

impl PlanarProbeData {
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            mode: self.mode,
            refresh_mode: self.refresh_mode,
            capture_position_mode: self.capture_position_mode,
            near_plane: self.capture_near_plane,
            far_plane: self.capture_far_plane,
            capture_local_position: self.capture_local_position,
            mirror_plane_local_position: self.capture_mirror_plane_local_position,
            mirror_plane_local_normal: self.capture_mirror_plane_local_normal,
            override_field_of_view: self.override_field_of_view,
            field_of_view_override: self.field_of_view_override.clamp(0.0, MAX_FIELD_OF_VIEW),
            frame_settings: self.frame_settings,
        }
    }
}

/// Decodes bytes without migrating them.
pub fn decode(bytes: &[u8]) -> Result<PlanarProbeData> {
    bincode::deserialize(bytes).map_err(|e| SpeculaError::Decode(e.to_string()))
}

pub fn encode(data: &PlanarProbeData) -> Result<Vec<u8>> {
    bincode::serialize(data).map_err(|e| SpeculaError::Encode(e.to_string()))
}

/// Decodes and migrates. The returned data is always at [`CURRENT_VERSION`].
pub fn load(bytes: &[u8]) -> Result<PlanarProbeData> {
    let mut data = decode(bytes)?;
    data.version = migrate(data.version, &mut data);
    Ok(data)
}

pub fn load_from_file(path: impl AsRef<Path>) -> Result<PlanarProbeData> {
    let bytes = std::fs::read(path.as_ref())?;
    load(&bytes).map_err(|e| match e {
        SpeculaError::Decode(msg) => {
            SpeculaError::Decode(format!("{}: {}", path.as_ref().display(), msg))
        }
        other => other,
    })
}

pub fn save_to_file(path: impl AsRef<Path>, data: &PlanarProbeData) -> Result<()> {
    std::fs::write(path.as_ref(), encode(data)?)?;
    log::debug!("Saved planar probe data to {}", path.as_ref().display());
    Ok(())
}

impl PlanarReflectionProbe {
    /// Builds a probe from migrated data.
    pub fn from_data(id: ProbeId, data: PlanarProbeData) -> Self {
        if data.version != CURRENT_VERSION {
            log::warn!(
                "Building probe {:?} from unmigrated data (version {})",
                id,
                data.version
            );
        }

        let capture_settings = data.capture_settings();
        PlanarReflectionProbe::from_parts(
            ProbeState::new(id),
            capture_settings,
            data.probe_capture_properties,
            data.influence_volume,
            data.proxy_volume,
            data.custom_texture,
            data.baked_texture,
        )
    }

    pub fn to_data(&self) -> PlanarProbeData {
        let settings = self.capture_settings();
        PlanarProbeData {
            version: CURRENT_VERSION,
            capture_local_position: settings.capture_local_position,
            custom_texture: self.custom_texture(),
            baked_texture: self.baked_texture(),
            frame_settings: settings.frame_settings,
            capture_near_plane: settings.near_plane,
            capture_far_plane: settings.far_plane,
            capture_position_mode: settings.capture_position_mode,
            capture_mirror_plane_local_position: settings.mirror_plane_local_position,
            capture_mirror_plane_local_normal: settings.mirror_plane_local_normal,
            override_field_of_view: settings.override_field_of_view,
            field_of_view_override: settings.field_of_view_override,
            probe_capture_properties: *self.probe_capture_properties(),
            mode: settings.mode,
            refresh_mode: settings.refresh_mode,
            influence_volume: self.influence_volume().clone(),
            proxy_volume: self.proxy_volume().cloned(),
        }
    }

    /// Decodes, migrates and builds a probe in one go.
    pub fn load(id: ProbeId, bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_data(id, load(bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_migrates_legacy_bytes() {
        let mut legacy = PlanarProbeData {
            version: 1,
            influence_volume: InfluenceVolume::new_sphere(1.0),
            ..PlanarProbeData::default()
        };
        legacy.influence_volume.sphere_base_offset = Some(Vec3::new(0.0, 0.0, 2.0));

        let bytes = encode(&legacy).unwrap();
        let raw = decode(&bytes).unwrap();
        assert_eq!(raw.version, 1);

        let loaded = load(&bytes).unwrap();
        assert_eq!(loaded.version, CURRENT_VERSION);
        assert_eq!(loaded.influence_volume.offset, Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn truncated_bytes_fail_to_decode() {
        let bytes = encode(&PlanarProbeData::default()).unwrap();
        let result = decode(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(SpeculaError::Decode(_))));
    }

    #[test]
    fn probe_survives_data_round_trip() {
        let mut probe = PlanarReflectionProbe::new(ProbeId::new(4)).with_capture_settings(
            CaptureSettings::new()
                .with_mode(ReflectionProbeMode::Realtime)
                .with_clip_planes(0.3, 250.0)
                .with_field_of_view_override(60.0)
                .with_frame_settings(FrameSettings::OPAQUE_OBJECTS | FrameSettings::SKY),
        );
        probe.set_local_reference_position(Vec3::new(1.0, 2.0, 3.0));
        probe.set_baked_texture(Some(TextureRef(11)));

        let restored = PlanarReflectionProbe::from_data(ProbeId::new(4), probe.to_data());

        assert_eq!(restored.capture_settings(), probe.capture_settings());
        assert_eq!(
            restored.probe_capture_properties(),
            probe.probe_capture_properties()
        );
        assert_eq!(restored.baked_texture(), Some(TextureRef(11)));
        assert_eq!(restored.compute_bake_hash(), probe.compute_bake_hash());
    }

    #[test]
    fn out_of_range_field_of_view_is_clamped_on_load() {
        let data = PlanarProbeData {
            override_field_of_view: true,
            field_of_view_override: 400.0,
            ..PlanarProbeData::default()
        };
        let probe = PlanarReflectionProbe::from_data(ProbeId::new(1), data);
        assert_eq!(probe.capture_settings().field_of_view(), MAX_FIELD_OF_VIEW);
    }
}
