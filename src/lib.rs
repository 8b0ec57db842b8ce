//! Embryo Windowing
//!
//! Temporal sequence windowing and transition-label derivation for embryo
//! time-lapse analysis.
//!
//! # Overview
//!
//! This library converts an ordered-but-noisy per-frame annotation stream
//! into fixed-length, validated, class-balanced training windows, and
//! applies the *identical* windowing contract to live sliding-window
//! inference over a doctor-supplied image stack. One offset rule backs both
//! paths, which is what rules out silent train/serve windowing skew.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Embryo Windowing                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  phase/        - Canonical chronology, per-dataset vocabulary   │
//! │  catalog/      - Frame records, ordinal parsing, grouping       │
//! │  windowing/    - Shared offset rule, chronology validation      │
//! │  labeling/     - Transition-flag derivation                     │
//! │  balance/      - Seeded 1:1 class balancing                     │
//! │  diagnostics/  - Flag counts, transition matrix (read-only)     │
//! │  dataset/      - WindowPopulation assembly, decode seam         │
//! │  inference/    - Online sliding-window adapter                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use embryo_windowing::{DatasetConfig, FrameRecord, OnlineWindower, WindowPopulation};
//!
//! // Offline: build a training population.
//! let records: Vec<FrameRecord> = (0..12)
//!     .map(|i| {
//!         let phase = if i < 6 { "t2" } else { "t3" };
//!         FrameRecord::new("E1", format!("E1_RUN{i}"), format!("/img/{i}.jpg"), phase)
//!     })
//!     .collect();
//! let population = WindowPopulation::build(records, &DatasetConfig::default()).unwrap();
//! assert_eq!(population.len(), 5);
//!
//! // Online: the same offset rule over a live stack, stride 1.
//! let stack = vec![(); 10];
//! let windower = OnlineWindower::new(8).unwrap();
//! assert_eq!(windower.windows(&stack).unwrap().len(), 3);
//! ```

pub mod balance;
pub mod catalog;
pub mod config;
pub mod dataset;
pub mod diagnostics;
pub mod error;
pub mod inference;
pub mod labeling;
pub mod phase;
pub mod windowing;

// Re-exports - Errors
pub use error::{CoreError, Result};

// Re-exports - Phases
pub use phase::{PhaseVocabulary, CHRONOLOGICAL_PHASES};

// Re-exports - Catalog
pub use catalog::{extract_ordinal, FrameCatalog, FrameRecord, VideoFrames};

// Re-exports - Windowing
pub use windowing::{is_coherent, slide, window_offsets, ChronologyMode, WindowConfig};

// Re-exports - Labeling
pub use labeling::{TransitionFlag, WindowLabel};

// Re-exports - Balancing
pub use balance::balance_windows;

// Re-exports - Diagnostics
pub use diagnostics::{FlagCounts, TransitionMatrix};

// Re-exports - Dataset
pub use dataset::{build_splits, FrameDecoder, Window, WindowPopulation, WindowSample};

// Re-exports - Config
pub use config::{DatasetConfig, ExperimentMetadata};

// Re-exports - Inference
pub use inference::{InferenceOutcome, OnlineWindower, TransitionModel};
