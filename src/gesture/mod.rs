//! Finger classification and gesture resolution.
//!
//! Everything here is pure: a frame of landmarks goes in, an [`Action`]
//! comes out, with no state carried between frames.

mod classifier;
mod profile;
mod resolver;
mod types;


pub use classifier::{count_extended, finger_pattern, hand_state};
pub use profile::{GestureProfile, KeyBindings, ProfileKind};
pub use resolver::{
    assign_hands, resolve_dual, resolve_single, ClassificationMode, GestureResolver, Reading,
    Resolution,
};
pub use types::{Action, FingerPattern, FingerState, Key};
