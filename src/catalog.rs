//! Frame records and the per-video ordered frame catalog.
//!
//! The catalog normalizes a flat, unordered collection of annotated frames
//! into per-video sequences sorted by their ordinal. Grouping follows the
//! first appearance of each video id in the input; within a video, frames
//! sort ascending by the ordinal extracted from the identifier.
//!
//! # Ordinal extraction contract
//!
//! The ordinal is the first run of ASCII digits in the *final*
//! underscore-delimited token of the identifier. `"D2013_E7_RUN104"`
//! yields 104; `"frame_007b"` yields 7. An identifier whose final token
//! carries no digits fails the whole build — ordering is load-bearing and
//! must never be guessed.
//!
//! # Sharing
//!
//! Frames are stored behind `Arc` so that overlapping windows reference the
//! same records instead of deep-copying them; cloning a window clones Arc
//! pointers only.

use std::sync::Arc;

use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid literal regex"));

/// One annotated frame of a time-lapse video.
///
/// The core never opens `image_path`; it is an opaque reference handed to
/// the decoding collaborator at the training/serving boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Groups frames belonging to one time-lapse sequence.
    pub video_id: String,
    /// Raw frame identifier; the ordinal is derived from it.
    pub identifier: String,
    /// Opaque reference to pixel data.
    pub image_path: String,
    /// Developmental phase annotation.
    pub phase: String,
}

impl FrameRecord {
    /// Convenience constructor taking anything string-like.
    pub fn new(
        video_id: impl Into<String>,
        identifier: impl Into<String>,
        image_path: impl Into<String>,
        phase: impl Into<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            identifier: identifier.into(),
            image_path: image_path.into(),
            phase: phase.into(),
        }
    }

    /// Extract this frame's ordinal from its identifier.
    pub fn ordinal(&self) -> Result<u64> {
        extract_ordinal(&self.identifier)
    }
}

/// Extract the sort ordinal from a frame identifier.
///
/// Takes the final underscore-delimited token and parses its first run of
/// digits. Fails with [`CoreError::UnparsableOrdinal`] when no digits are
/// found or the run overflows `u64`.
pub fn extract_ordinal(identifier: &str) -> Result<u64> {
    let token = identifier.rsplit('_').next().unwrap_or(identifier);
    let run = DIGIT_RUN
        .find(token)
        .ok_or_else(|| CoreError::UnparsableOrdinal {
            identifier: identifier.to_string(),
        })?;
    run.as_str()
        .parse::<u64>()
        .map_err(|_| CoreError::UnparsableOrdinal {
            identifier: identifier.to_string(),
        })
}

/// One video's frames, sorted ascending by ordinal.
#[derive(Debug, Clone)]
pub struct VideoFrames {
    video_id: String,
    frames: Vec<Arc<FrameRecord>>,
}

impl VideoFrames {
    /// The video this group belongs to.
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Frames in ordinal order.
    pub fn frames(&self) -> &[Arc<FrameRecord>] {
        &self.frames
    }

    /// Number of frames in this video.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True when the video holds no frames.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Per-video ordered view over a flat collection of frame records.
#[derive(Debug, Clone, Default)]
pub struct FrameCatalog {
    videos: Vec<VideoFrames>,
}

impl FrameCatalog {
    /// Group records by video id and sort each group by ordinal.
    ///
    /// Video order follows first appearance in the input. Fails fast on the
    /// first identifier whose ordinal cannot be parsed; no partial catalog
    /// is ever returned.
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = FrameRecord>,
    {
        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut groups: Vec<(String, Vec<(u64, Arc<FrameRecord>)>)> = Vec::new();

        for record in records {
            let ordinal = record.ordinal()?;
            let slot = match index.get(&record.video_id) {
                Some(&i) => i,
                None => {
                    index.insert(record.video_id.clone(), groups.len());
                    groups.push((record.video_id.clone(), Vec::new()));
                    groups.len() - 1
                }
            };
            groups[slot].1.push((ordinal, Arc::new(record)));
        }

        let videos = groups
            .into_iter()
            .map(|(video_id, mut keyed)| {
                keyed.sort_by_key(|(ordinal, _)| *ordinal);
                VideoFrames {
                    video_id,
                    frames: keyed.into_iter().map(|(_, frame)| frame).collect(),
                }
            })
            .collect();

        Ok(Self { videos })
    }

    /// The grouped, sorted videos in first-appearance order.
    pub fn videos(&self) -> &[VideoFrames] {
        &self.videos
    }

    /// Number of distinct videos.
    #[inline]
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    /// True when no records were supplied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Total frames across all videos.
    pub fn frame_count(&self) -> usize {
        self.videos.iter().map(VideoFrames::len).sum()
    }
}
