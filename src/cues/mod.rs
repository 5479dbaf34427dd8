//! Named UI sound effects.
//!
//! Each cue is a fixed composition: which voices, at what pitches, how far
//! apart in time, and whether a throttle applies. The builders in the
//! family modules return a [`Cue`] value; the `play_*` methods they add to
//! [`crate::SoundEngine`] hand it to [`crate::SoundEngine::play`].
//!
//! | family        | cues                                                   |
//! | ------------- | ------------------------------------------------------ |
//! | light         | light enter, dispersion, prism rotate                  |
//! | nodes         | node hover, node click, lattice activate               |
//! | mirror        | mirror activate, infinite reflection                   |
//! | verification  | keypress, verification result                          |
//! | forge         | strike, pour, quench                                   |
//! | gallery       | gallery enter, cusp transition                         |
//!
//! Rate-sensitive cues (hover, keypress, rotate, cusp) carry a throttle
//! interval. Cues tied to discrete state changes never do.

pub mod forge;
pub mod gallery;
pub mod light;
pub mod mirror;
pub mod nodes;
pub mod verification;

use crate::voice::VoiceSpec;

pub use light::RotateDirection;

/// Peak level for melodic cues.
pub const TONAL_LEVEL: f32 = 0.06;
/// Peak level for hover ticks.
pub const HOVER_LEVEL: f32 = 0.03;
/// Peak level for key clicks.
pub const KEY_LEVEL: f32 = 0.02;
/// Peak level for noise textures.
pub const NOISE_LEVEL: f32 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    LightEnter,
    Dispersion,
    PrismRotate,
    NodeHover,
    NodeClick,
    LatticeActivate,
    MirrorActivate,
    InfiniteReflection,
    Keypress,
    VerificationResult,
    Strike,
    Pour,
    Quench,
    GalleryEnter,
    CuspTransition,
}

impl CueKind {
    pub const ALL: [CueKind; 15] = [
        CueKind::LightEnter,
        CueKind::Dispersion,
        CueKind::PrismRotate,
        CueKind::NodeHover,
        CueKind::NodeClick,
        CueKind::LatticeActivate,
        CueKind::MirrorActivate,
        CueKind::InfiniteReflection,
        CueKind::Keypress,
        CueKind::VerificationResult,
        CueKind::Strike,
        CueKind::Pour,
        CueKind::Quench,
        CueKind::GalleryEnter,
        CueKind::CuspTransition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CueKind::LightEnter => "light-enter",
            CueKind::Dispersion => "dispersion",
            CueKind::PrismRotate => "prism-rotate",
            CueKind::NodeHover => "node-hover",
            CueKind::NodeClick => "node-click",
            CueKind::LatticeActivate => "lattice-activate",
            CueKind::MirrorActivate => "mirror-activate",
            CueKind::InfiniteReflection => "infinite-reflection",
            CueKind::Keypress => "keypress",
            CueKind::VerificationResult => "verification-result",
            CueKind::Strike => "strike",
            CueKind::Pour => "pour",
            CueKind::Quench => "quench",
            CueKind::GalleryEnter => "gallery-enter",
            CueKind::CuspTransition => "cusp-transition",
        }
    }
}

/// A voice and how long after the cue fires it should start.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledVoice {
    pub offset_ms: f64,
    pub spec: VoiceSpec,
}

/// One invocation's worth of voices, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub kind: CueKind,
    /// Minimum milliseconds between firings of this kind.
    pub throttle_ms: Option<f64>,
    pub schedule: Vec<ScheduledVoice>,
}

impl Cue {
    pub fn new(kind: CueKind) -> Self {
        Self {
            kind,
            throttle_ms: None,
            schedule: Vec::new(),
        }
    }

    /// Cue with a single voice that starts immediately.
    pub fn single(kind: CueKind, spec: VoiceSpec) -> Self {
        Self::new(kind).at(0.0, spec)
    }

    pub fn at(mut self, offset_ms: f64, spec: VoiceSpec) -> Self {
        self.schedule.push(ScheduledVoice { offset_ms, spec });
        self
    }

    pub fn throttled(mut self, min_interval_ms: f64) -> Self {
        self.throttle_ms = Some(min_interval_ms);
        self
    }

    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    pub fn offsets(&self) -> Vec<f64> {
        self.schedule.iter().map(|s| s.offset_ms).collect()
    }

    pub fn frequencies(&self) -> Vec<f32> {
        self.schedule
            .iter()
            .filter_map(|s| s.spec.frequency())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn kind_names_are_unique() {
        let names: HashSet<_> = CueKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), CueKind::ALL.len());
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let cue = Cue::new(CueKind::NodeClick)
            .at(0.0, VoiceSpec::tone(880.0, 0.1))
            .at(40.0, VoiceSpec::tone(1320.0, 0.1))
            .throttled(10.0);

        assert_eq!(cue.offsets(), vec![0.0, 40.0]);
        assert_eq!(cue.frequencies(), vec![880.0, 1320.0]);
        assert_eq!(cue.throttle_ms, Some(10.0));
    }

    #[test]
    fn only_rate_sensitive_cues_are_throttled() {
        let throttled: Vec<CueKind> = [
            light::light_enter(),
            light::dispersion(),
            light::prism_rotate(RotateDirection::Clockwise),
            nodes::node_hover(),
            nodes::node_click(),
            nodes::lattice_activate(),
            mirror::mirror_activate(),
            mirror::infinite_reflection(),
            verification::keypress(),
            verification::verification_result(true),
            verification::verification_result(false),
            forge::strike(),
            forge::pour(),
            forge::quench(),
            gallery::gallery_enter(),
            gallery::cusp_transition(0.5),
        ]
        .into_iter()
        .filter(|cue| cue.throttle_ms.is_some())
        .map(|cue| cue.kind)
        .collect();

        assert_eq!(
            throttled,
            vec![
                CueKind::PrismRotate,
                CueKind::NodeHover,
                CueKind::Keypress,
                CueKind::CuspTransition,
            ]
        );
    }
}
