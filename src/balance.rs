//! Class balancing of the window population.
//!
//! Transition windows are rare relative to same-phase windows, so training
//! on the raw population biases the model toward "no transition". The
//! balancer draws an equal-sized, seeded sample from each flag class and
//! reshuffles the concatenation. Shuffling happens here and only here —
//! population order is otherwise construction order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::Window;
use crate::labeling::TransitionFlag;

/// Subsample the population to an exact 1:1 flag balance.
///
/// Let `n = min(|flag0|, |flag1|)`. Draws exactly `n` windows from each
/// class without replacement, concatenates the draws, and shuffles the
/// result, all driven by `seed`. The output has size `2n`; when either
/// class is empty it is empty, which the caller should read as "not usable
/// for balanced training". The input is never mutated.
pub fn balance_windows(windows: &[Window], seed: u64) -> Vec<Window> {
    let mut flag0: Vec<&Window> = Vec::new();
    let mut flag1: Vec<&Window> = Vec::new();
    for window in windows {
        match window.flag() {
            TransitionFlag::Same => flag0.push(window),
            TransitionFlag::Transition => flag1.push(window),
        }
    }

    let n = flag0.len().min(flag1.len());
    if n == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut balanced: Vec<Window> = flag0
        .choose_multiple(&mut rng, n)
        .map(|w| (*w).clone())
        .collect();
    balanced.extend(flag1.choose_multiple(&mut rng, n).map(|w| (*w).clone()));
    balanced.shuffle(&mut rng);
    balanced
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::FrameRecord;
    use crate::phase::PhaseVocabulary;

    fn vocab() -> PhaseVocabulary {
        PhaseVocabulary::from_phases(["t2", "t3"]).unwrap()
    }

    /// A two-frame window with the given boundary phases and a unique path.
    fn window(first: &str, last: &str, tag: usize) -> Window {
        let frames: Vec<Arc<FrameRecord>> = [first, last]
            .iter()
            .enumerate()
            .map(|(i, phase)| {
                Arc::new(FrameRecord::new(
                    "V",
                    format!("V_RUN{}{i}", tag * 10),
                    format!("/img/{tag}/{i}.jpg"),
                    *phase,
                ))
            })
            .collect();
        Window::from_frames(&frames, &vocab()).unwrap()
    }

    fn mixed_population(flag0: usize, flag1: usize) -> Vec<Window> {
        let mut windows = Vec::new();
        for i in 0..flag0 {
            windows.push(window("t2", "t2", i));
        }
        for i in 0..flag1 {
            windows.push(window("t2", "t3", flag0 + i));
        }
        windows
    }

    fn count_flags(windows: &[Window]) -> (usize, usize) {
        let same = windows
            .iter()
            .filter(|w| w.flag() == TransitionFlag::Same)
            .count();
        (same, windows.len() - same)
    }

    #[test]
    fn output_has_exact_one_to_one_balance() {
        let population = mixed_population(7, 3);
        let balanced = balance_windows(&population, 42);

        assert_eq!(balanced.len(), 6);
        assert_eq!(count_flags(&balanced), (3, 3));
        // Input untouched.
        assert_eq!(population.len(), 10);
    }

    #[test]
    fn balanced_windows_are_drawn_from_the_input_by_identity() {
        let population = mixed_population(5, 4);
        let balanced = balance_windows(&population, 7);

        for window in &balanced {
            let shared = population
                .iter()
                .any(|orig| Arc::ptr_eq(&orig.frames()[0], &window.frames()[0]));
            assert!(shared, "balanced window not drawn from the input");
        }
    }

    #[test]
    fn draws_are_without_replacement() {
        let population = mixed_population(4, 4);
        let balanced = balance_windows(&population, 3);

        let mut seen: Vec<*const FrameRecord> = balanced
            .iter()
            .map(|w| Arc::as_ptr(&w.frames()[0]))
            .collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), balanced.len());
    }

    #[test]
    fn same_seed_same_output_ordering() {
        let population = mixed_population(9, 5);
        let a = balance_windows(&population, 42);
        let b = balance_windows(&population, 42);

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert!(Arc::ptr_eq(&x.frames()[0], &y.frames()[0]));
        }
    }

    #[test]
    fn different_seeds_may_differ() {
        let population = mixed_population(20, 10);
        let a = balance_windows(&population, 1);
        let b = balance_windows(&population, 2);

        let order = |ws: &[Window]| -> Vec<*const FrameRecord> {
            ws.iter().map(|w| Arc::as_ptr(&w.frames()[0])).collect()
        };
        assert_ne!(order(&a), order(&b));
    }

    #[test]
    fn empty_class_yields_empty_population() {
        let only_flag0 = mixed_population(6, 0);
        assert!(balance_windows(&only_flag0, 42).is_empty());

        let only_flag1 = mixed_population(0, 6);
        assert!(balance_windows(&only_flag1, 42).is_empty());

        assert!(balance_windows(&[], 42).is_empty());
    }
}
