//! Phase-coherence validation of candidate windows.
//!
//! A window is a physically short temporal slice. More than one phase
//! boundary inside it, or a jump that skips a phase, signals a mislabeled
//! or sparsely annotated run rather than a genuine single transition, and
//! must not poison the transition-label signal. Strict mode rejects such
//! windows; permissive mode accepts everything and exists for callers that
//! explicitly allow multi-phase windows.
//!
//! Rejection is expected, non-fatal filtering — never an error.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::FrameRecord;
use crate::error::Result;
use crate::phase::PhaseVocabulary;

/// Chronology-validation mode for candidate windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChronologyMode {
    /// Reject windows with more than two distinct phases, or with exactly
    /// two that are not chronologically adjacent.
    #[default]
    Strict,
    /// Accept every window unconditionally.
    Permissive,
}

impl ChronologyMode {
    /// Mode selected by the `multiple_phases` configuration flag.
    pub fn from_multiple_phases(allow_multiple: bool) -> Self {
        if allow_multiple {
            Self::Permissive
        } else {
            Self::Strict
        }
    }
}

/// Whether a window's phase content is temporally coherent.
///
/// Strict mode: zero or one distinct phase is trivially coherent; exactly
/// two are coherent iff their dense indices are adjacent; three or more are
/// never coherent. Permissive mode accepts everything.
///
/// Errs only on a phase value missing from the vocabulary, which indicates
/// the vocabulary was not built from this window's dataset.
pub fn is_coherent(
    frames: &[Arc<FrameRecord>],
    vocabulary: &PhaseVocabulary,
    mode: ChronologyMode,
) -> Result<bool> {
    if mode == ChronologyMode::Permissive {
        return Ok(true);
    }

    let mut indices: Vec<usize> = Vec::with_capacity(2);
    for frame in frames {
        let index = vocabulary.index_of(&frame.phase)?;
        if !indices.contains(&index) {
            indices.push(index);
            if indices.len() > 2 {
                return Ok(false);
            }
        }
    }

    if indices.len() < 2 {
        return Ok(true);
    }

    indices.sort_unstable();
    Ok(indices[1] == indices[0] + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(phases: &[&str]) -> Vec<Arc<FrameRecord>> {
        phases
            .iter()
            .enumerate()
            .map(|(i, phase)| {
                Arc::new(FrameRecord::new(
                    "V1",
                    format!("V1_RUN{i}"),
                    format!("/img/{i}.jpg"),
                    *phase,
                ))
            })
            .collect()
    }

    fn vocab() -> PhaseVocabulary {
        PhaseVocabulary::from_phases(["t2", "t3", "t4", "t5"]).unwrap()
    }

    #[test]
    fn single_phase_window_is_coherent() {
        let frames = window(&["t2", "t2", "t2"]);
        assert!(is_coherent(&frames, &vocab(), ChronologyMode::Strict).unwrap());
    }

    #[test]
    fn adjacent_two_phase_window_is_coherent() {
        let frames = window(&["t2", "t2", "t3"]);
        assert!(is_coherent(&frames, &vocab(), ChronologyMode::Strict).unwrap());
        // Order within the window does not matter for the phase set.
        let frames = window(&["t3", "t2", "t3"]);
        assert!(is_coherent(&frames, &vocab(), ChronologyMode::Strict).unwrap());
    }

    #[test]
    fn skipped_phase_is_rejected() {
        let frames = window(&["t2", "t2", "t4"]);
        assert!(!is_coherent(&frames, &vocab(), ChronologyMode::Strict).unwrap());
    }

    #[test]
    fn three_phases_are_rejected_even_when_adjacent() {
        let frames = window(&["t2", "t3", "t4"]);
        assert!(!is_coherent(&frames, &vocab(), ChronologyMode::Strict).unwrap());
    }

    #[test]
    fn permissive_mode_accepts_everything() {
        let frames = window(&["t2", "t4", "t5", "t3"]);
        assert!(is_coherent(&frames, &vocab(), ChronologyMode::Permissive).unwrap());
    }

    #[test]
    fn empty_window_is_coherent() {
        let frames = window(&[]);
        assert!(is_coherent(&frames, &vocab(), ChronologyMode::Strict).unwrap());
    }

    #[test]
    fn lone_frame_of_adjacent_phase_is_accepted() {
        // One frame of t2 against seven of t3: there is no minimum
        // per-phase frame count, so this passes.
        let frames = window(&["t2", "t3", "t3", "t3", "t3", "t3", "t3", "t3"]);
        assert!(is_coherent(&frames, &vocab(), ChronologyMode::Strict).unwrap());
    }

    #[test]
    fn mode_follows_multiple_phases_flag() {
        assert_eq!(
            ChronologyMode::from_multiple_phases(false),
            ChronologyMode::Strict
        );
        assert_eq!(
            ChronologyMode::from_multiple_phases(true),
            ChronologyMode::Permissive
        );
    }
}
