use glam::{Quat, Vec3};
use specula_core::{Pose, ProbeTransform, SpeculaError};
use specula_probe::persist;
use specula_probe::{
    CapturePositionMode, CaptureProbe, CaptureSettings, CubemapReflectionProbe, FrameSettings,
    InfluenceVolume, PlanarProbeData, PlanarReflectionProbe, ProbeId, ProbeKind,
    ReflectionProbeMode, ReflectionRegistry, ReflectionSystemConfig, RefreshMode,
    CURRENT_VERSION,
};

const EPSILON: f32 = 1e-4;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn mirror_viewer_scenario() {
    init_logging();
    let mut probe = PlanarReflectionProbe::new(ProbeId::new(1));
    probe.set_capture_position_mode(CapturePositionMode::MirrorViewer);

    let capture = probe.compute_capture_transform(
        Pose::new(Vec3::new(0.0, 0.0, -5.0), Quat::IDENTITY),
        &ProbeTransform::default(),
    );

    assert!(capture.position.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), EPSILON));
    assert!(capture.forward().abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPSILON));
}

#[test]
fn mirror_reference_scenario() {
    init_logging();
    let mut probe = PlanarReflectionProbe::new(ProbeId::new(1));
    probe.set_local_reference_position(Vec3::new(2.0, 0.0, -3.0));

    // The viewer is ignored entirely in this mode.
    let capture = probe.compute_capture_transform(
        Pose::looking_at(Vec3::new(10.0, 4.0, 10.0), Vec3::ZERO, Vec3::Y),
        &ProbeTransform::default(),
    );

    assert!(capture.position.abs_diff_eq(Vec3::new(2.0, 0.0, 3.0), EPSILON));
    assert!(capture.forward().z < 0.0);
    assert!(capture.rotation.is_normalized());
}

#[test]
fn lifecycle_keeps_registry_in_step() {
    init_logging();
    let mut registry = ReflectionRegistry::new();
    let transform = ProbeTransform::from_position(Vec3::new(0.0, 1.0, 0.0));
    let mut probe = PlanarReflectionProbe::new(ProbeId::new(5))
        .with_influence_volume(InfluenceVolume::new_box(Vec3::splat(2.0)));

    assert!(!probe.request_realtime_render(&mut registry));

    probe.on_enable(&mut registry, &transform);
    assert!(registry.contains(probe.id()));
    let entry = registry.get(probe.id()).unwrap();
    assert_eq!(entry.kind, ProbeKind::Planar);
    assert!(entry.bounds.contains_point(Vec3::new(0.9, 1.9, 0.9)));

    *probe.influence_volume_mut() = InfluenceVolume::new_box(Vec3::splat(8.0));
    probe.on_validate(&mut registry, &transform);
    assert_eq!(registry.len(), 1);
    assert!(registry
        .get(probe.id())
        .unwrap()
        .bounds
        .contains_point(Vec3::new(3.9, 4.9, 3.9)));

    assert!(probe.request_realtime_render(&mut registry));
    assert_eq!(registry.take_realtime_requests(), vec![probe.id()]);

    probe.on_disable(&mut registry);
    assert!(registry.is_empty());
    assert!(!probe.request_realtime_render(&mut registry));

    probe.on_enable(&mut registry, &transform);
    probe.on_destroy(&mut registry);
    assert!(registry.is_empty());
    assert!(!probe.state().active);
}

#[test]
fn validate_on_disabled_probe_leaves_it_unregistered() {
    let mut registry = ReflectionRegistry::new();
    let mut probe = PlanarReflectionProbe::new(ProbeId::new(2));

    probe.on_validate(&mut registry, &ProbeTransform::default());
    assert!(registry.is_empty());
}

#[test]
fn planar_and_cubemap_share_a_registry() {
    let mut registry = ReflectionRegistry::with_config(
        ReflectionSystemConfig::new().with_max_realtime_renders_per_frame(1),
    );
    let transform = ProbeTransform::default();

    let mut planar = PlanarReflectionProbe::new(ProbeId::new(1));
    let mut cubemap = CubemapReflectionProbe::new(ProbeId::new(2));
    planar.on_enable(&mut registry, &transform);
    cubemap.on_enable(&mut registry, &transform);

    assert_eq!(registry.iter_kind(ProbeKind::Planar).count(), 1);
    assert_eq!(registry.iter_kind(ProbeKind::Cubemap).count(), 1);

    assert!(planar.request_realtime_render(&mut registry));
    assert!(cubemap.request_realtime_render(&mut registry));
    assert_eq!(registry.take_realtime_requests(), vec![ProbeId::new(1)]);
    assert_eq!(registry.take_realtime_requests(), vec![ProbeId::new(2)]);
    assert!(registry.take_realtime_requests().is_empty());
}

#[test]
fn bake_hash_is_deterministic() {
    let build = || {
        let mut probe = PlanarReflectionProbe::new(ProbeId::new(1)).with_capture_settings(
            CaptureSettings::new()
                .with_clip_planes(0.1, 500.0)
                .with_frame_settings(FrameSettings::OPAQUE_OBJECTS),
        );
        probe.set_local_reference_position(Vec3::new(1.0, 2.0, 3.0));
        probe
    };

    assert_eq!(build().compute_bake_hash(), build().compute_bake_hash());
    // Identity does not feed the hash.
    let other = build();
    let mut moved = PlanarReflectionProbe::new(ProbeId::new(99))
        .with_capture_settings(other.capture_settings().clone());
    moved.set_local_reference_position(Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(moved.compute_bake_hash(), other.compute_bake_hash());
}

#[test]
fn every_capture_input_changes_bake_hash() {
    let base = PlanarReflectionProbe::new(ProbeId::new(1));
    let base_hash = base.compute_bake_hash();

    let edits: Vec<(&str, fn(&mut PlanarReflectionProbe))> = vec![
        ("near plane", |p| p.capture_settings_mut().near_plane = 0.5),
        ("far plane", |p| p.capture_settings_mut().far_plane = 20.0),
        ("mode", |p| p.capture_settings_mut().mode = ReflectionProbeMode::Realtime),
        ("refresh mode", |p| {
            p.capture_settings_mut().refresh_mode = RefreshMode::EveryFrame
        }),
        ("settings capture position mode", |p| {
            p.capture_settings_mut().capture_position_mode = CapturePositionMode::MirrorViewer
        }),
        ("capture local position", |p| {
            p.capture_settings_mut().capture_local_position = Vec3::X
        }),
        ("mirror plane position", |p| {
            p.capture_settings_mut().mirror_plane_local_position = Vec3::Y
        }),
        ("mirror plane normal", |p| {
            p.capture_settings_mut().mirror_plane_local_normal = Vec3::Z
        }),
        ("override field of view", |p| {
            p.capture_settings_mut().override_field_of_view = true
        }),
        ("field of view", |p| {
            p.capture_settings_mut().field_of_view_override = 45.0
        }),
        ("frame settings", |p| {
            p.capture_settings_mut().frame_settings = Some(FrameSettings::SKY)
        }),
        ("probe capture position mode", |p| {
            p.set_capture_position_mode(CapturePositionMode::MirrorViewer)
        }),
        ("reference position", |p| {
            p.set_local_reference_position(Vec3::new(0.0, 0.0, -1.0))
        }),
    ];

    for (name, edit) in edits {
        let mut probe = base.clone();
        edit(&mut probe);
        assert_ne!(probe.compute_bake_hash(), base_hash, "{name} did not change the hash");
        assert!(probe.is_bake_stale(Some(base_hash)));
    }

    assert!(!base.is_bake_stale(Some(base_hash)));
    assert!(base.is_bake_stale(None));
}

#[test]
fn hash_ignores_textures_and_volumes() {
    let base = PlanarReflectionProbe::new(ProbeId::new(1));
    let mut probe = base.clone();
    probe.set_baked_texture(Some(specula_probe::TextureRef(3)));
    *probe.influence_volume_mut() = InfluenceVolume::new_sphere(12.0);

    assert_eq!(probe.compute_bake_hash(), base.compute_bake_hash());
}

#[test]
fn legacy_file_loads_as_current_probe() {
    init_logging();
    let mut legacy = PlanarProbeData {
        version: 1,
        influence_volume: InfluenceVolume::new_sphere(2.0),
        ..PlanarProbeData::default()
    };
    legacy.influence_volume.sphere_base_offset = Some(Vec3::new(0.0, 0.5, 0.0));

    let path = std::env::temp_dir().join(format!("specula-legacy-{}.probe", std::process::id()));
    persist::save_to_file(&path, &legacy).unwrap();
    let loaded = persist::load_from_file(&path);
    let _ = std::fs::remove_file(&path);
    let loaded = loaded.unwrap();

    assert_eq!(loaded.version, CURRENT_VERSION);
    assert_eq!(loaded.influence_volume.offset, Vec3::new(0.0, 0.5, 0.0));
    assert_eq!(loaded.influence_volume.sphere_base_offset, None);

    let probe = PlanarReflectionProbe::from_data(ProbeId::new(8), loaded);
    let bounds = probe.bounding_sphere(&ProbeTransform::default());
    assert!(bounds.center.abs_diff_eq(Vec3::new(0.0, 0.5, 0.0), EPSILON));
}

#[test]
fn probe_bytes_round_trip() {
    let mut probe = PlanarReflectionProbe::new(ProbeId::new(3)).with_capture_settings(
        CaptureSettings::new()
            .with_mode(ReflectionProbeMode::Realtime)
            .with_refresh_mode(RefreshMode::EveryFrame),
    );
    probe.set_capture_position_mode(CapturePositionMode::MirrorViewer);

    let bytes = persist::encode(&probe.to_data()).unwrap();
    let restored = PlanarReflectionProbe::load(ProbeId::new(3), &bytes).unwrap();

    assert_eq!(restored.compute_bake_hash(), probe.compute_bake_hash());
    assert_eq!(restored.capture_settings(), probe.capture_settings());
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("specula-does-not-exist.probe");
    assert!(matches!(
        persist::load_from_file(path),
        Err(SpeculaError::IoError(_))
    ));
}
