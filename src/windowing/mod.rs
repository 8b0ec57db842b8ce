//! Sliding-window generation and phase-coherence validation.
//!
//! One offset rule lives here ([`window_offsets`]) and both consumers call
//! it: the offline dataset build (configurable stride) and the online
//! inference adapter (stride fixed at 1). Keeping a single implementation
//! is what rules out train/serve windowing skew.

pub mod generator;
pub mod validator;

pub use generator::{slide, window_offsets, WindowConfig};
pub use validator::{is_coherent, ChronologyMode};
