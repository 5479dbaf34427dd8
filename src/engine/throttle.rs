use std::collections::HashMap;

use crate::cues::CueKind;

/// Last-fire timestamps per cue kind.
///
/// Rate-sensitive cues (hover, keypress, rotation) consult this before
/// building anything. Kinds are tracked independently, so a flood of hovers
/// never blocks a keypress.
#[derive(Debug, Default, Clone)]
pub struct CueThrottle {
    last_fired: HashMap<CueKind, f64>,
}

impl CueThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true and records `now_ms` if at least `min_interval_ms` has
    /// passed since `kind` last fired (or it never has). Otherwise returns
    /// false and leaves the table untouched.
    pub fn should_fire(&mut self, kind: CueKind, min_interval_ms: f64, now_ms: f64) -> bool {
        if let Some(&last) = self.last_fired.get(&kind) {
            if now_ms - last < min_interval_ms {
                return false;
            }
        }
        self.last_fired.insert(kind, now_ms);
        true
    }

    pub fn last_fired(&self, kind: CueKind) -> Option<f64> {
        self.last_fired.get(&kind).copied()
    }
}
