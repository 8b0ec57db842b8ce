//! Window population assembly: from flat frame records to training windows.
//!
//! The build pipeline runs eagerly and in order: phase vocabulary →
//! optional seeded video subsampling → frame catalog → window generation →
//! chronology validation → transition-label derivation → optional class
//! balancing. The result is a [`WindowPopulation`]: an indexable,
//! length-queryable sequence of labelled windows plus the vocabulary it was
//! built against.
//!
//! Split filtering and global phase exclusions happen upstream; this module
//! receives records that are already filtered.
//!
//! # Concurrency
//!
//! Construction is single-threaded and side-effect-free; independent splits
//! share no mutable state, so [`build_splits`] fans several builds out over
//! a rayon pool.
//!
//! # Example
//!
//! ```
//! use embryo_windowing::{DatasetConfig, FrameRecord, WindowPopulation};
//!
//! let records: Vec<FrameRecord> = (0..10)
//!     .map(|i| {
//!         let phase = if i < 5 { "t2" } else { "t3" };
//!         FrameRecord::new("E1", format!("E1_RUN{i}"), format!("/img/{i}.jpg"), phase)
//!     })
//!     .collect();
//!
//! let config = DatasetConfig::default(); // window_size 8, stride 1
//! let population = WindowPopulation::build(records, &config).unwrap();
//! assert_eq!(population.len(), 3);
//! ```

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::balance::balance_windows;
use crate::catalog::{FrameCatalog, FrameRecord};
use crate::config::DatasetConfig;
use crate::diagnostics::{FlagCounts, TransitionMatrix};
use crate::error::Result;
use crate::labeling::{TransitionFlag, WindowLabel};
use crate::phase::PhaseVocabulary;
use crate::windowing::{is_coherent, slide, ChronologyMode};

/// One retained window: a run of exactly `window_size` frames plus its
/// derived label.
///
/// Frames are shared `Arc`s, so overlapping windows and balanced copies
/// reference the same records.
#[derive(Debug, Clone)]
pub struct Window {
    frames: Vec<Arc<FrameRecord>>,
    phase_indices: Vec<usize>,
    label: WindowLabel,
}

impl Window {
    /// Build a window from a generated frame slice, deriving per-frame
    /// phase indices and the transition label.
    pub(crate) fn from_frames(
        frames: &[Arc<FrameRecord>],
        vocabulary: &PhaseVocabulary,
    ) -> Result<Self> {
        let phase_indices = frames
            .iter()
            .map(|f| vocabulary.index_of(&f.phase))
            .collect::<Result<Vec<usize>>>()?;
        let label = WindowLabel::derive(
            &frames[0].phase,
            &frames[frames.len() - 1].phase,
            vocabulary,
        )?;
        Ok(Self {
            frames: frames.to_vec(),
            phase_indices,
            label,
        })
    }

    /// The window's frames in temporal order.
    pub fn frames(&self) -> &[Arc<FrameRecord>] {
        &self.frames
    }

    /// Dense phase index of each frame, in temporal order.
    pub fn phase_indices(&self) -> &[usize] {
        &self.phase_indices
    }

    /// The derived label.
    pub fn label(&self) -> WindowLabel {
        self.label
    }

    /// The binary transition flag.
    #[inline]
    pub fn flag(&self) -> TransitionFlag {
        self.label.flag
    }

    /// Number of frames (always the configured window size).
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Windows always hold at least one frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Element view handed to the training/serving boundary.
///
/// Yields the ordered frame paths, the per-frame phase-index list, the
/// transition flag, and the boundary phase indices. Image decoding is the
/// consumer's job, via [`FrameDecoder`].
#[derive(Debug, Clone, Copy)]
pub struct WindowSample<'a> {
    window: &'a Window,
}

impl<'a> WindowSample<'a> {
    /// Ordered image paths of the window's frames.
    pub fn frame_paths(&self) -> Vec<&'a str> {
        self.window
            .frames
            .iter()
            .map(|f| f.image_path.as_str())
            .collect()
    }

    /// Ordered frame identifiers.
    pub fn identifiers(&self) -> Vec<&'a str> {
        self.window
            .frames
            .iter()
            .map(|f| f.identifier.as_str())
            .collect()
    }

    /// Dense phase index per frame; length equals the window size.
    pub fn phase_indices(&self) -> &'a [usize] {
        &self.window.phase_indices
    }

    /// The binary transition flag.
    pub fn transition_flag(&self) -> TransitionFlag {
        self.window.label.flag
    }

    /// Dense index of the first frame's phase.
    pub fn first_phase(&self) -> usize {
        self.window.label.first_phase
    }

    /// Dense index of the last frame's phase.
    pub fn last_phase(&self) -> usize {
        self.window.label.last_phase
    }

    /// The underlying window.
    pub fn window(&self) -> &'a Window {
        self.window
    }

    /// Decode every frame of this window through a decoder collaborator.
    ///
    /// Stops at the first failure and returns it, so a collating layer can
    /// decide to drop, retry, or abort the batch. No sentinel values.
    pub fn decode_with<D: FrameDecoder>(
        &self,
        decoder: &D,
    ) -> std::result::Result<Vec<D::Output>, D::Error> {
        self.window
            .frames
            .iter()
            .map(|f| decoder.decode(&f.image_path))
            .collect()
    }
}

/// Decoding collaborator at the training/serving boundary.
///
/// Consumes an image path, produces a decoded representation. The core is
/// agnostic to the pixel format; it only guarantees an explicit per-item
/// result instead of a silent skip.
pub trait FrameDecoder {
    /// Decoded frame representation (tensor, image buffer, ...).
    type Output;
    /// Decoder-specific failure type.
    type Error;

    /// Decode one frame by its opaque path.
    fn decode(&self, image_path: &str) -> std::result::Result<Self::Output, Self::Error>;
}

/// The ordered list of all retained windows for one dataset split, plus the
/// phase vocabulary they are labelled against.
///
/// Mutated only by construction (the balancer replaces the list during
/// `build`); read-only afterward.
#[derive(Debug, Clone)]
pub struct WindowPopulation {
    windows: Vec<Window>,
    vocabulary: PhaseVocabulary,
}

impl WindowPopulation {
    /// Build the population for one split.
    ///
    /// Fails fast on invalid configuration, unparsable ordinals, or phase
    /// values outside the canonical chronology. Videos shorter than one
    /// window and per-window chronology rejections are normal filtering.
    pub fn build(records: Vec<FrameRecord>, config: &DatasetConfig) -> Result<Self> {
        config.validate()?;

        let vocabulary = PhaseVocabulary::from_phases(records.iter().map(|r| r.phase.as_str()))?;
        log::debug!(
            "phase vocabulary: {} present phases {:?}",
            vocabulary.len(),
            vocabulary.labels()
        );

        let records = match config.max_videos {
            Some(limit) => subsample_videos(records, limit, config.seed),
            None => records,
        };

        let catalog = FrameCatalog::from_records(records)?;
        let window_config = config.window_config();
        let mode = ChronologyMode::from_multiple_phases(config.multiple_phases);

        let mut windows = Vec::new();
        for video in catalog.videos() {
            for slice in slide(video.frames(), &window_config) {
                if !is_coherent(slice, &vocabulary, mode)? {
                    continue;
                }
                windows.push(Window::from_frames(slice, &vocabulary)?);
            }
        }

        log::info!(
            "built {} windows from {} videos ({} frames)",
            windows.len(),
            catalog.len(),
            catalog.frame_count()
        );

        if config.balance_flags {
            windows = balance_windows(&windows, config.seed);
            log::info!("balanced population: {} windows", windows.len());
        }

        Ok(Self {
            windows,
            vocabulary,
        })
    }

    /// Number of retained windows.
    #[inline]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// True when no window survived construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// The retained windows in population order.
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// The vocabulary this population is labelled against.
    pub fn vocabulary(&self) -> &PhaseVocabulary {
        &self.vocabulary
    }

    /// Element view at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<WindowSample<'_>> {
        self.windows.get(index).map(|window| WindowSample { window })
    }

    /// Iterate over all element views in population order.
    pub fn samples(&self) -> impl Iterator<Item = WindowSample<'_>> {
        self.windows.iter().map(|window| WindowSample { window })
    }

    /// Flag-0 vs flag-1 counts, for inspection only.
    pub fn flag_counts(&self) -> FlagCounts {
        FlagCounts::from_windows(&self.windows)
    }

    /// Start-phase by end-phase window counts, for inspection only.
    pub fn transition_matrix(&self) -> TransitionMatrix {
        TransitionMatrix::from_windows(&self.windows, &self.vocabulary)
    }
}

/// Keep at most `limit` distinct videos, drawn with a seeded sample.
///
/// Candidate ids are taken in first-appearance order so the draw depends
/// only on the input order and the seed. Record order is preserved for the
/// retained videos.
fn subsample_videos(records: Vec<FrameRecord>, limit: usize, seed: u64) -> Vec<FrameRecord> {
    let mut seen = ahash::AHashSet::new();
    let mut ids: Vec<&str> = Vec::new();
    for record in &records {
        if seen.insert(record.video_id.as_str()) {
            ids.push(record.video_id.as_str());
        }
    }
    if ids.len() <= limit {
        return records;
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let chosen: ahash::AHashSet<String> = ids
        .choose_multiple(&mut rng, limit)
        .map(|id| (*id).to_string())
        .collect();

    records
        .into_iter()
        .filter(|r| chosen.contains(&r.video_id))
        .collect()
}

/// Build several independent split populations in parallel.
///
/// Each `(records, config)` pair is a disjoint split; builds share nothing
/// mutable, so they run on the rayon pool. The first failing build fails
/// the whole call.
pub fn build_splits(
    inputs: Vec<(Vec<FrameRecord>, DatasetConfig)>,
) -> Result<Vec<WindowPopulation>> {
    inputs
        .into_par_iter()
        .map(|(records, config)| WindowPopulation::build(records, &config))
        .collect()
}
