//! Transition-label derivation for windows.
//!
//! The label of a window is a pure function of its first and last frame
//! phases: the dense indices of both, plus a binary flag telling whether
//! they differ. The same derivation backs training labels and the
//! diagnostics reports; there is no learned state anywhere in it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::phase::PhaseVocabulary;

/// Binary transition label for one window.
///
/// `Same` when the first and last frame share a phase, `Transition` when
/// they differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionFlag {
    /// First and last frame are in the same phase.
    Same = 0,
    /// The window straddles a phase boundary.
    Transition = 1,
}

impl TransitionFlag {
    /// Integer representation for ML consumers: 0 (same) or 1 (transition).
    #[inline]
    pub fn as_int(&self) -> u8 {
        *self as u8
    }

    /// Recover a flag from its integer representation.
    pub fn from_int(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Same),
            1 => Some(Self::Transition),
            _ => None,
        }
    }

    /// Flag derived from two dense phase indices.
    #[inline]
    pub fn from_indices(first: usize, last: usize) -> Self {
        if first == last {
            Self::Same
        } else {
            Self::Transition
        }
    }

    /// Human-readable name of this flag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Same => "Same",
            Self::Transition => "Transition",
        }
    }
}

impl fmt::Display for TransitionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The derived label of one window: boundary phase indices plus the flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLabel {
    /// Dense index of the first frame's phase.
    pub first_phase: usize,
    /// Dense index of the last frame's phase.
    pub last_phase: usize,
    /// Whether the window straddles a transition.
    pub flag: TransitionFlag,
}

impl WindowLabel {
    /// Derive the label from a window's boundary phases.
    ///
    /// Errs only when a phase is missing from the vocabulary, which means
    /// the vocabulary was built from different data.
    pub fn derive(
        first_phase: &str,
        last_phase: &str,
        vocabulary: &PhaseVocabulary,
    ) -> Result<Self> {
        let first = vocabulary.index_of(first_phase)?;
        let last = vocabulary.index_of(last_phase)?;
        Ok(Self {
            first_phase: first,
            last_phase: last,
            flag: TransitionFlag::from_indices(first, last),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> PhaseVocabulary {
        PhaseVocabulary::from_phases(["t2", "t3", "t4"]).unwrap()
    }

    #[test]
    fn flag_int_round_trip() {
        assert_eq!(TransitionFlag::Same.as_int(), 0);
        assert_eq!(TransitionFlag::Transition.as_int(), 1);
        assert_eq!(TransitionFlag::from_int(0), Some(TransitionFlag::Same));
        assert_eq!(TransitionFlag::from_int(1), Some(TransitionFlag::Transition));
        assert_eq!(TransitionFlag::from_int(2), None);
    }

    #[test]
    fn flag_display() {
        assert_eq!(TransitionFlag::Same.to_string(), "Same");
        assert_eq!(TransitionFlag::Transition.to_string(), "Transition");
    }

    #[test]
    fn same_boundary_phases_yield_flag_zero() {
        let label = WindowLabel::derive("t3", "t3", &vocab()).unwrap();
        assert_eq!(label.first_phase, 1);
        assert_eq!(label.last_phase, 1);
        assert_eq!(label.flag, TransitionFlag::Same);
    }

    #[test]
    fn differing_boundary_phases_yield_flag_one() {
        let label = WindowLabel::derive("t2", "t3", &vocab()).unwrap();
        assert_eq!(label.first_phase, 0);
        assert_eq!(label.last_phase, 1);
        assert_eq!(label.flag, TransitionFlag::Transition);
    }

    #[test]
    fn flag_iff_indices_differ() {
        for first in 0..3 {
            for last in 0..3 {
                let flag = TransitionFlag::from_indices(first, last);
                assert_eq!(flag == TransitionFlag::Same, first == last);
            }
        }
    }

    #[test]
    fn unknown_phase_propagates() {
        assert!(WindowLabel::derive("t2", "tEB", &vocab()).is_err());
    }
}
