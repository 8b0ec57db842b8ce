//! Read-only reporting over a window population.
//!
//! Flag counts and the start→end phase transition matrix exist for logging
//! and inspection. Nothing downstream may branch on them.

use std::fmt;

use ndarray::Array2;

use crate::dataset::Window;
use crate::labeling::TransitionFlag;
use crate::phase::PhaseVocabulary;

/// Counts of flag-0 (same boundary phase) vs flag-1 (transition) windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlagCounts {
    /// Windows whose first and last frame share a phase.
    pub same: usize,
    /// Windows straddling a phase boundary.
    pub transition: usize,
}

impl FlagCounts {
    /// Tally the flags of a window list.
    pub fn from_windows(windows: &[Window]) -> Self {
        let mut counts = Self::default();
        for window in windows {
            match window.flag() {
                TransitionFlag::Same => counts.same += 1,
                TransitionFlag::Transition => counts.transition += 1,
            }
        }
        counts
    }

    /// Total number of windows counted.
    #[inline]
    pub fn total(&self) -> usize {
        self.same + self.transition
    }

    /// True when both classes are equally represented and non-empty.
    pub fn is_balanced(&self) -> bool {
        self.same == self.transition && self.total() > 0
    }
}

impl fmt::Display for FlagCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "flag=0 (same start/end phase): {}, flag=1 (different start/end phase): {}",
            self.same, self.transition
        )
    }
}

/// Square start→end phase matrix over the present vocabulary.
///
/// Cell `[i][j]` counts windows whose first phase index is `i` and last
/// phase index is `j`. Purely observational.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionMatrix {
    counts: Array2<u64>,
    labels: Vec<String>,
}

impl TransitionMatrix {
    /// Tally boundary-phase pairs over a window list.
    pub fn from_windows(windows: &[Window], vocabulary: &PhaseVocabulary) -> Self {
        let n = vocabulary.len();
        let mut counts = Array2::<u64>::zeros((n, n));
        for window in windows {
            let label = window.label();
            counts[[label.first_phase, label.last_phase]] += 1;
        }
        Self {
            counts,
            labels: vocabulary.labels().to_vec(),
        }
    }

    /// Count of windows starting in phase `first` and ending in `last`.
    pub fn count(&self, first: usize, last: usize) -> u64 {
        self.counts[[first, last]]
    }

    /// The raw count matrix.
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    /// Phase labels indexing the matrix axes.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Total windows tallied.
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// Sum of the diagonal: windows with no transition.
    pub fn diagonal_total(&self) -> u64 {
        self.counts.diag().sum()
    }
}

impl fmt::Display for TransitionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .labels
            .iter()
            .map(String::len)
            .max()
            .unwrap_or(0)
            .max(5);

        writeln!(f, "phase transition matrix (start -> end):")?;
        write!(f, "{:>width$}", "")?;
        for label in &self.labels {
            write!(f, " {label:>width$}")?;
        }
        writeln!(f)?;
        for (i, label) in self.labels.iter().enumerate() {
            write!(f, "{label:>width$}")?;
            for j in 0..self.labels.len() {
                write!(f, " {:>width$}", self.counts[[i, j]])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
