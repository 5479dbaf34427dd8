use crate::voice::VoiceSpec;

/// One deferred voice: build `spec` once the clock reaches `due_ms`.
#[derive(Debug, Clone)]
pub struct PendingVoice {
    pub due_ms: f64,
    pub spec: VoiceSpec,
}

/// Stagger queue for multi-voice cues.
///
/// Entries come out in due-time order; entries due at the same moment come
/// out in the order they were queued. Nothing can be cancelled once queued.
#[derive(Debug, Default)]
pub struct Scheduler {
    pending: Vec<PendingVoice>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, due_ms: f64, spec: VoiceSpec) {
        let entry = PendingVoice { due_ms, spec };

        // Sorted by due time; new entries go after equal due times
        let index = self
            .pending
            .partition_point(|p| p.due_ms.total_cmp(&due_ms).is_le());
        self.pending.insert(index, entry);
    }

    /// Remove and return every entry due at or before `now_ms`.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<PendingVoice> {
        let split = self.pending.partition_point(|p| p.due_ms <= now_ms);
        self.pending.drain(..split).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Due time of the next entry.
    pub fn next_due(&self) -> Option<f64> {
        self.pending.first().map(|p| p.due_ms)
    }
}
