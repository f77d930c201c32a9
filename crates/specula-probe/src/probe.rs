//! The capture interface shared by all probe kinds, and the lifecycle every
//! probe goes through against a [`ReflectionRegistry`].

use serde::{Deserialize, Serialize};
use specula_core::{Hash128, Pose, ProbeTransform};

use crate::registry::{ReflectionRegistry, RegisteredProbe};
use crate::settings::CaptureSettings;
use crate::volume::InfluenceVolume;

/// Identity of a probe inside a [`ReflectionRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ProbeId(pub u64);

impl ProbeId {
    pub const NULL: Self = Self(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl Default for ProbeId {
    fn default() -> Self {
        Self::NULL
    }
}

/// Handle to a texture owned by the asset system.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TextureRef(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProbeKind {
    Planar,
    Cubemap,
}

/// Enable state of a probe.
///
/// `active` mirrors the hosting entity being alive in the scene, `enabled`
/// the probe component itself. A probe is only ever registered while both
/// are set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeState {
    pub id: ProbeId,
    pub active: bool,
    pub enabled: bool,
}

impl ProbeState {
    /// A fresh probe: its entity is active but the component has not been
    /// enabled yet.
    pub fn new(id: ProbeId) -> Self {
        Self {
            id,
            active: true,
            enabled: false,
        }
    }

    pub fn is_active_and_enabled(&self) -> bool {
        self.active && self.enabled
    }
}

/// A probe that can be captured by the renderer and baked offline.
///
/// Implementors provide the capture math and bake hash; registration
/// lifecycle comes for free through the provided methods.
pub trait CaptureProbe {
    fn kind(&self) -> ProbeKind;

    fn state(&self) -> &ProbeState;

    fn state_mut(&mut self) -> &mut ProbeState;

    fn capture_settings(&self) -> &CaptureSettings;

    fn influence_volume(&self) -> &InfluenceVolume;

    /// Camera pose used to render this probe for a viewer at `viewer`.
    fn compute_capture_transform(&self, viewer: Pose, transform: &ProbeTransform) -> Pose;

    /// Content hash of everything that affects baked output.
    fn compute_bake_hash(&self) -> Hash128;

    fn id(&self) -> ProbeId {
        self.state().id
    }

    fn is_active_and_enabled(&self) -> bool {
        self.state().is_active_and_enabled()
    }

    /// Whether output baked under `stored` no longer matches this probe.
    fn is_bake_stale(&self, stored: Option<Hash128>) -> bool {
        stored != Some(self.compute_bake_hash())
    }

    /// Registry entry describing this probe at `transform`.
    fn registration(&self, transform: &ProbeTransform) -> RegisteredProbe {
        RegisteredProbe::new(
            self.id(),
            self.kind(),
            self.capture_settings().mode,
            self.influence_volume(),
            transform,
        )
    }

    fn on_enable(&mut self, registry: &mut ReflectionRegistry, transform: &ProbeTransform) {
        self.state_mut().enabled = true;
        if self.is_active_and_enabled() {
            registry.register(self.registration(transform));
        }
    }

    fn on_disable(&mut self, registry: &mut ReflectionRegistry) {
        self.state_mut().enabled = false;
        registry.unregister(self.id());
    }

    /// Refreshes the registry entry after the probe's configuration changed.
    fn on_validate(&mut self, registry: &mut ReflectionRegistry, transform: &ProbeTransform) {
        registry.unregister(self.id());
        if self.is_active_and_enabled() {
            registry.register(self.registration(transform));
        }
    }

    fn on_destroy(&mut self, registry: &mut ReflectionRegistry) {
        self.on_disable(registry);
        self.state_mut().active = false;
    }

    /// Asks the renderer to capture this probe. Returns whether a request
    /// is pending afterwards.
    fn request_realtime_render(&self, registry: &mut ReflectionRegistry) -> bool {
        if !self.is_active_and_enabled() {
            return false;
        }
        registry.request_realtime_render(self.id())
    }
}
