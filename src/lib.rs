pub mod app;
pub mod config;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod injector;
pub mod landmarks;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support;

pub use app::{HandpadController, RunStats, ShutdownReason};
pub use config::HandpadConfig;
pub use debounce::{
    ActionDebouncer, AmbiguousPolicy, DebounceMode, DebouncePolicy, KeyEvent, KeyEventKind,
};
pub use engine::{FrameOutcome, GestureEngine};
pub use error::{HandpadError, InjectorError, Result, SourceError};
pub use gesture::{
    Action, ClassificationMode, FingerState, GestureProfile, GestureResolver, Key, KeyBindings,
    ProfileKind,
};
pub use injector::{create_injector, InputInjector, LogInjector, RecordingInjector};
pub use landmarks::{Frame, HandObservation, Handedness, Landmark, MirrorPolicy};
pub use source::{create_source, JsonLinesSource, LandmarkSource, ScriptedSource};
