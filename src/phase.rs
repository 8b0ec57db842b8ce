//! Developmental phase chronology and per-dataset phase vocabulary.
//!
//! Embryo development passes through a fixed, biologically ordered set of
//! phases (second polar body extrusion through expanded blastocyst). The
//! chronology is a total order; every label space used downstream is a
//! *present subset* of it: only the phases that actually occur in the loaded
//! records, kept in chronological order and assigned dense zero-based
//! indices.
//!
//! The vocabulary is a value computed once per dataset build and carried
//! alongside the window population. Two concurrently built splits may have
//! different present subsets and must not share index tables.
//!
//! # Example
//!
//! ```
//! use embryo_windowing::phase::PhaseVocabulary;
//!
//! let vocab = PhaseVocabulary::from_phases(["t4", "t2", "t3", "t2"]).unwrap();
//! assert_eq!(vocab.labels(), ["t2", "t3", "t4"]);
//! assert_eq!(vocab.index_of("t3").unwrap(), 1);
//! assert!(vocab.are_adjacent(0, 1));
//! assert!(!vocab.are_adjacent(0, 2));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// The 15 canonical developmental phases in biological order.
///
/// From earliest (second polar body, pronuclear appearance/fade) through
/// cleavage stages, morula, and blastocyst stages.
pub const CHRONOLOGICAL_PHASES: [&str; 15] = [
    "tPB2", "tPNa", "tPNf", "t2", "t3", "t4", "t5", "t6", "t7", "t8", "t9+", "tM", "tSB", "tB",
    "tEB",
];

/// The present subset of the canonical chronology for one dataset build.
///
/// Holds the phases that occur in the loaded records, in chronological
/// order. A phase's position in this list is its dense index, which is the
/// label space for window validation, transition labels, and the
/// diagnostics matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseVocabulary {
    labels: Vec<String>,
}

impl PhaseVocabulary {
    /// Build the vocabulary from the phase values observed in a dataset.
    ///
    /// Duplicates are fine; order of the input does not matter. Fails fast
    /// on a phase outside [`CHRONOLOGICAL_PHASES`] or when nothing canonical
    /// is present at all.
    pub fn from_phases<I, S>(phases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut present = ahash::AHashSet::new();
        for phase in phases {
            let phase = phase.as_ref();
            if !CHRONOLOGICAL_PHASES.contains(&phase) {
                return Err(CoreError::UnknownPhase {
                    phase: phase.to_string(),
                });
            }
            present.insert(phase.to_string());
        }

        let labels: Vec<String> = CHRONOLOGICAL_PHASES
            .iter()
            .filter(|p| present.contains(**p))
            .map(|p| (*p).to_string())
            .collect();

        if labels.is_empty() {
            return Err(CoreError::EmptyVocabulary);
        }

        Ok(Self { labels })
    }

    /// Dense index of a phase in this vocabulary.
    ///
    /// A phase that is canonical but absent from this dataset is still an
    /// error here: its index does not exist in this label space.
    pub fn index_of(&self, phase: &str) -> Result<usize> {
        self.labels
            .iter()
            .position(|l| l == phase)
            .ok_or_else(|| CoreError::UnknownPhase {
                phase: phase.to_string(),
            })
    }

    /// Phase label at a dense index, if in range.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// The present phases in chronological order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of present phases.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no phase is present (unreachable through `from_phases`).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether two dense indices are chronologically adjacent.
    #[inline]
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        a.abs_diff(b) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_subset_keeps_chronological_order() {
        let vocab = PhaseVocabulary::from_phases(["tB", "t2", "tPNf", "t2"]).unwrap();
        assert_eq!(vocab.labels(), ["tPNf", "t2", "tB"]);
        assert_eq!(vocab.len(), 3);
    }

    #[test]
    fn indices_are_dense_and_zero_based() {
        let vocab = PhaseVocabulary::from_phases(["t8", "t2"]).unwrap();
        assert_eq!(vocab.index_of("t2").unwrap(), 0);
        assert_eq!(vocab.index_of("t8").unwrap(), 1);
        assert_eq!(vocab.label(0), Some("t2"));
        assert_eq!(vocab.label(2), None);
    }

    #[test]
    fn unknown_phase_fails_fast() {
        let err = PhaseVocabulary::from_phases(["t2", "tXYZ"]).unwrap_err();
        assert!(matches!(err, CoreError::UnknownPhase { phase } if phase == "tXYZ"));
    }

    #[test]
    fn canonical_but_absent_phase_has_no_index() {
        let vocab = PhaseVocabulary::from_phases(["t2", "t3"]).unwrap();
        assert!(vocab.index_of("tEB").is_err());
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = PhaseVocabulary::from_phases(Vec::<&str>::new()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyVocabulary));
    }

    #[test]
    fn adjacency_is_index_distance_one() {
        let vocab = PhaseVocabulary::from_phases(["t2", "t3", "t5"]).unwrap();
        // t2/t3 are adjacent in this present subset.
        assert!(vocab.are_adjacent(0, 1));
        assert!(vocab.are_adjacent(1, 0));
        // t3/t5 become adjacent once t4 is absent: adjacency is defined on
        // the dense present-subset indices, not the canonical list.
        assert!(vocab.are_adjacent(1, 2));
        assert!(!vocab.are_adjacent(0, 2));
        assert!(!vocab.are_adjacent(1, 1));
    }

    #[test]
    fn full_chronology_round_trips() {
        let vocab = PhaseVocabulary::from_phases(CHRONOLOGICAL_PHASES).unwrap();
        assert_eq!(vocab.len(), 15);
        for (i, phase) in CHRONOLOGICAL_PHASES.iter().enumerate() {
            assert_eq!(vocab.index_of(phase).unwrap(), i);
        }
    }
}
