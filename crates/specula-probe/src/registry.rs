//! Registry of active reflection probes.
//!
//! The registry is an explicit object owned by the host's rendering system.
//! It stores probe identities and the data derived from them at registration
//! time, never the probes themselves, and queues realtime capture requests
//! for the renderer to drain.
//!
//! Access is single-threaded by contract. Hosts that touch the registry from
//! several threads share it through [`SharedReflectionRegistry`].

use glam::Mat4;
use parking_lot::RwLock;
use specula_core::{Aabb, ProbeTransform, Sphere};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::config::ReflectionSystemConfig;
use crate::probe::{ProbeId, ProbeKind};
use crate::settings::ReflectionProbeMode;
use crate::volume::InfluenceVolume;

pub type SharedReflectionRegistry = Arc<RwLock<ReflectionRegistry>>;

/// What the registry remembers about a probe.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredProbe {
    pub id: ProbeId,
    pub kind: ProbeKind,
    pub mode: ReflectionProbeMode,
    pub bounds: Aabb,
    pub bounding_sphere: Sphere,
    pub influence_to_world: Mat4,
}

impl RegisteredProbe {
    pub fn new(
        id: ProbeId,
        kind: ProbeKind,
        mode: ReflectionProbeMode,
        influence: &InfluenceVolume,
        transform: &ProbeTransform,
    ) -> Self {
        Self {
            id,
            kind,
            mode,
            bounds: influence.bounds_at(transform),
            bounding_sphere: influence.bounding_sphere_at(transform),
            influence_to_world: Mat4::from_rotation_translation(
                transform.rotation,
                influence.world_position(transform),
            ),
        }
    }
}

pub struct ReflectionRegistry {
    config: ReflectionSystemConfig,
    probes: HashMap<ProbeId, RegisteredProbe>,
    realtime_requests: VecDeque<ProbeId>,
}

impl ReflectionRegistry {
    pub fn new() -> Self {
        Self::with_config(ReflectionSystemConfig::default())
    }

    pub fn with_config(config: ReflectionSystemConfig) -> Self {
        Self {
            config,
            probes: HashMap::new(),
            realtime_requests: VecDeque::new(),
        }
    }

    pub fn into_shared(self) -> SharedReflectionRegistry {
        Arc::new(RwLock::new(self))
    }

    pub fn config(&self) -> &ReflectionSystemConfig {
        &self.config
    }

    /// Adds `probe`. Returns `false`, leaving the existing entry untouched,
    /// if its id is already registered.
    pub fn register(&mut self, probe: RegisteredProbe) -> bool {
        if self.probes.contains_key(&probe.id) {
            log::debug!("Probe {:?} already registered", probe.id);
            return false;
        }

        log::debug!("Registered {:?} probe {:?}", probe.kind, probe.id);
        self.probes.insert(probe.id, probe);
        true
    }

    /// Removes `id` and any capture request still queued for it. Returns
    /// whether it was registered.
    pub fn unregister(&mut self, id: ProbeId) -> bool {
        if self.probes.remove(&id).is_none() {
            return false;
        }

        self.realtime_requests.retain(|&queued| queued != id);
        log::debug!("Unregistered probe {:?}", id);
        true
    }

    pub fn contains(&self, id: ProbeId) -> bool {
        self.probes.contains_key(&id)
    }

    pub fn get(&self, id: ProbeId) -> Option<&RegisteredProbe> {
        self.probes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredProbe> {
        self.probes.values()
    }

    pub fn iter_kind(&self, kind: ProbeKind) -> impl Iterator<Item = &RegisteredProbe> {
        self.probes.values().filter(move |probe| probe.kind == kind)
    }

    /// Queues a realtime capture of `id`. Returns whether a request for it
    /// is pending afterwards; unregistered probes are never queued.
    pub fn request_realtime_render(&mut self, id: ProbeId) -> bool {
        if !self.contains(id) {
            log::warn!("Ignoring realtime render request for unregistered probe {:?}", id);
            return false;
        }

        if self.config.deduplicate_realtime_requests && self.realtime_requests.contains(&id) {
            return true;
        }

        log::debug!("Queued realtime render for probe {:?}", id);
        self.realtime_requests.push_back(id);
        true
    }

    pub fn pending_realtime_requests(&self) -> usize {
        self.realtime_requests.len()
    }

    /// Hands this frame's realtime captures to the renderer, oldest first.
    pub fn take_realtime_requests(&mut self) -> Vec<ProbeId> {
        let count = self
            .realtime_requests
            .len()
            .min(self.config.max_realtime_renders_per_frame);
        self.realtime_requests.drain(..count).collect()
    }
}

impl Default for ReflectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
