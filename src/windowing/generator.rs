//! The window generator: one offset rule for training and inference.
//!
//! A window is a contiguous run of exactly `window_size` items, advanced by
//! `stride` between successive windows. The first window starts at offset
//! 0; generation stops once fewer than `window_size` items remain, so
//! partial trailing windows are never emitted. A sequence shorter than one
//! window yields zero windows, which is a normal outcome and not an error.
//!
//! For a sequence of length `L` the generator emits exactly
//! `max(0, (L - window_size) / stride + 1)` windows.
//!
//! # Example
//!
//! ```
//! use embryo_windowing::windowing::{window_offsets, WindowConfig};
//!
//! let offsets: Vec<usize> = window_offsets(7, 3, 2).collect();
//! assert_eq!(offsets, [0, 2, 4]);
//!
//! let config = WindowConfig::new(3, 2);
//! assert_eq!(config.window_count(7), 3);
//! assert_eq!(config.window_count(2), 0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Window size and stride for sliding-window generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Number of consecutive frames per window.
    ///
    /// Must match the input length of the downstream model (8 for the
    /// frame-sequence model, 32 for the video model).
    pub window_size: usize,

    /// Offset advance between consecutive windows.
    ///
    /// Stride 1 is maximum overlap; stride = window_size is no overlap.
    /// Inference always uses stride 1 so every sub-window position is
    /// classified; training stride is a sampling-density hyperparameter.
    pub stride: usize,
}

impl WindowConfig {
    /// Create a new window configuration.
    pub fn new(window_size: usize, stride: usize) -> Self {
        Self {
            window_size,
            stride,
        }
    }

    /// Check that both parameters are at least 1.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(CoreError::InvalidConfig(
                "window_size must be > 0".to_string(),
            ));
        }
        if self.stride == 0 {
            return Err(CoreError::InvalidConfig("stride must be > 0".to_string()));
        }
        Ok(())
    }

    /// Number of windows this configuration emits over `len` items.
    pub fn window_count(&self, len: usize) -> usize {
        match len.checked_sub(self.window_size) {
            Some(slack) => slack / self.stride + 1,
            None => 0,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(8, 1)
    }
}

/// Window start offsets over a sequence of `len` items.
///
/// Offsets are `0, stride, 2·stride, …` while `offset + window_size <= len`.
/// This is the single offset rule shared by the offline dataset build and
/// the online inference adapter.
///
/// # Panics
///
/// Panics if `window_size` or `stride` is zero; validate the configuration
/// first.
pub fn window_offsets(
    len: usize,
    window_size: usize,
    stride: usize,
) -> impl Iterator<Item = usize> {
    assert!(window_size >= 1, "window_size must be > 0");
    assert!(stride >= 1, "stride must be > 0");
    len.checked_sub(window_size)
        .into_iter()
        .flat_map(move |max_start| (0..=max_start).step_by(stride))
}

/// Slide a window configuration across a slice, yielding borrowed windows.
///
/// Each yielded slice has length exactly `config.window_size`.
pub fn slide<'a, T>(items: &'a [T], config: &WindowConfig) -> impl Iterator<Item = &'a [T]> + 'a {
    let window_size = config.window_size;
    window_offsets(items.len(), window_size, config.stride)
        .map(move |offset| &items[offset..offset + window_size])
}
