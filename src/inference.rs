//! Online sliding-window inference over a live image stack.
//!
//! A doctor-supplied stack arrives as an ordered list of already-decoded
//! frames; the caller's order is authoritative and no ordinal re-derivation
//! happens. The adapter cuts the stack into windows with the *same* offset
//! rule as the training build — via [`crate::windowing::window_offsets`] —
//! with stride fixed at 1, so every sub-window position gets classified for
//! downstream visualization.
//!
//! Each window goes through the model independently. When the model
//! artifact is unavailable the adapter substitutes independently drawn
//! random binary predictions and flags the substitution; no consumer may
//! mistake a guess for a real prediction.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{CoreError, Result};
use crate::labeling::TransitionFlag;
use crate::windowing::window_offsets;

/// Per-window transition classifier boundary.
///
/// Implemented by the external model wrapper; the core only requires one
/// independent binary prediction per window.
pub trait TransitionModel<F> {
    /// Predict whether one window straddles a phase transition.
    fn predict(&self, window: &[F]) -> Result<TransitionFlag>;
}

/// Result of one inference request: one prediction per window, in window
/// order, plus whether the predictions were random substitutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceOutcome {
    /// One prediction per window, in window order.
    pub predictions: Vec<TransitionFlag>,
    /// True when the model artifact was unavailable and predictions were
    /// drawn at random. Always propagate this to consumers.
    pub substituted: bool,
}

/// Sliding-window adapter for live inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnlineWindower {
    frame_count: usize,
}

impl OnlineWindower {
    /// Create an adapter for a model expecting `frame_count` frames.
    pub fn new(frame_count: usize) -> Result<Self> {
        if frame_count == 0 {
            return Err(CoreError::InvalidConfig(
                "frame_count must be > 0".to_string(),
            ));
        }
        Ok(Self { frame_count })
    }

    /// The model's expected input length.
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Number of windows produced over `supplied` frames.
    pub fn window_count(&self, supplied: usize) -> Result<usize> {
        if supplied < self.frame_count {
            return Err(CoreError::InsufficientFrames {
                required: self.frame_count,
                supplied,
            });
        }
        Ok(supplied - self.frame_count + 1)
    }

    /// Cut the stack into `N - frame_count + 1` borrowed windows.
    ///
    /// Window `i` covers frames `[i, i + frame_count - 1]`. Fails with
    /// [`CoreError::InsufficientFrames`] when fewer than `frame_count`
    /// frames are supplied; a partial-window prediction is never attempted.
    pub fn windows<'a, T>(&self, frames: &'a [T]) -> Result<Vec<&'a [T]>> {
        if frames.len() < self.frame_count {
            return Err(CoreError::InsufficientFrames {
                required: self.frame_count,
                supplied: frames.len(),
            });
        }
        let frame_count = self.frame_count;
        Ok(window_offsets(frames.len(), frame_count, 1)
            .map(|offset| &frames[offset..offset + frame_count])
            .collect())
    }

    /// Run the model over every window.
    pub fn predict_with<F, M>(&self, model: &M, frames: &[F]) -> Result<InferenceOutcome>
    where
        M: TransitionModel<F>,
    {
        let predictions = self
            .windows(frames)?
            .into_iter()
            .map(|window| model.predict(window))
            .collect::<Result<Vec<TransitionFlag>>>()?;
        Ok(InferenceOutcome {
            predictions,
            substituted: false,
        })
    }

    /// Run the model when available, otherwise substitute flagged random
    /// predictions.
    ///
    /// The windowing contract is identical either way; only the prediction
    /// source changes, and the substitution is always flagged.
    pub fn predict_or_random<F, M>(
        &self,
        model: Option<&M>,
        frames: &[F],
    ) -> Result<InferenceOutcome>
    where
        M: TransitionModel<F>,
    {
        match model {
            Some(model) => self.predict_with(model, frames),
            None => {
                let count = self.window_count(frames.len())?;
                log::warn!("model artifact unavailable, substituting {count} random predictions");
                let mut rng = rand::thread_rng();
                Ok(self.random_outcome(count, &mut rng))
            }
        }
    }

    /// Flagged random predictions with a fixed seed, for tests and dry runs.
    pub fn random_substitute_seeded<F>(&self, frames: &[F], seed: u64) -> Result<InferenceOutcome> {
        let count = self.window_count(frames.len())?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(self.random_outcome(count, &mut rng))
    }

    fn random_outcome<R: Rng>(&self, count: usize, rng: &mut R) -> InferenceOutcome {
        let predictions = (0..count)
            .map(|_| {
                if rng.gen_bool(0.5) {
                    TransitionFlag::Transition
                } else {
                    TransitionFlag::Same
                }
            })
            .collect();
        InferenceOutcome {
            predictions,
            substituted: true,
        }
    }
}
