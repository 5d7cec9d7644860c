//! Synchronized dual-skeleton playback for SwingLab.
//!
//! - `sync` — canonical-index alignment and the play-head transport
//! - `skeleton` — joint connectivity and role colors
//! - `renderer` — stateless overlay/split frame composition

pub mod renderer;
pub mod skeleton;
pub mod sync;

pub use renderer::{RenderInput, RenderMode, Renderer};
pub use skeleton::{DIVIDER_COLOR, IMPACT_COLOR, MODEL_COLOR, SKELETON_EDGES, SUBJECT_COLOR};
pub use sync::{canonical_index, Transport};
