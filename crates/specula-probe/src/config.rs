/// Configuration for a [`ReflectionRegistry`](crate::ReflectionRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionSystemConfig {
    /// Upper bound on realtime captures handed to the renderer per frame.
    /// Requests beyond it stay queued for the next frame.
    pub max_realtime_renders_per_frame: usize,
    /// Collapse repeated requests for a probe that is already queued.
    pub deduplicate_realtime_requests: bool,
}

impl Default for ReflectionSystemConfig {
    fn default() -> Self {
        Self {
            max_realtime_renders_per_frame: 8,
            deduplicate_realtime_requests: true,
        }
    }
}

impl ReflectionSystemConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-frame realtime capture budget (at least one)
    pub fn with_max_realtime_renders_per_frame(mut self, max: usize) -> Self {
        self.max_realtime_renders_per_frame = max.max(1);
        self
    }

    pub fn with_deduplicated_requests(mut self, deduplicate: bool) -> Self {
        self.deduplicate_realtime_requests = deduplicate;
        self
    }
}
