use crate::debounce::{ActionDebouncer, KeyEvent};
use crate::error::InjectorError;
use crate::gesture::{Action, GestureProfile, GestureResolver, Resolution};
use crate::injector::InputInjector;
use crate::landmarks::{Frame, MirrorPolicy};
use std::time::Instant;
use tracing::debug;

/// Result of pushing one frame through the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameOutcome {
    pub resolution: Resolution,
    pub events: Vec<KeyEvent>,
    pub active: Option<Action>,
}

impl FrameOutcome {
    pub fn action(&self) -> Action {
        self.resolution.action
    }
}

/// Per-frame gesture pipeline: resolve the frame, then debounce into keys
#[derive(Debug)]
pub struct GestureEngine {
    profile: GestureProfile,
    resolver: GestureResolver,
    debouncer: ActionDebouncer,
}

impl GestureEngine {
    pub fn new(profile: GestureProfile, mirror: MirrorPolicy) -> Self {
        let resolver = GestureResolver::new(profile.mode(), mirror);
        let debouncer =
            ActionDebouncer::new(profile.policy, profile.ambiguous, profile.bindings.clone());
        Self {
            profile,
            resolver,
            debouncer,
        }
    }

    pub fn profile(&self) -> &GestureProfile {
        &self.profile
    }

    pub fn active(&self) -> Option<Action> {
        self.debouncer.active()
    }

    /// Process one frame to completion
    pub fn process_frame(
        &mut self,
        frame: &Frame,
        now: Instant,
        injector: &mut dyn InputInjector,
    ) -> Result<FrameOutcome, InjectorError> {
        let resolution = self.resolver.resolve(frame);
        let events = self.debouncer.update(resolution.action, now, injector)?;

        if !events.is_empty() {
            debug!("{} -> {:?}", resolution.action, events);
        }

        Ok(FrameOutcome {
            resolution,
            events,
            active: self.debouncer.active(),
        })
    }

    /// Flush due tap releases between frames
    pub fn poll(
        &mut self,
        now: Instant,
        injector: &mut dyn InputInjector,
    ) -> Result<Vec<KeyEvent>, InjectorError> {
        self.debouncer.poll(now, injector)
    }

    /// Release the whole key vocabulary
    pub fn shutdown(
        &mut self,
        injector: &mut dyn InputInjector,
    ) -> Result<Vec<KeyEvent>, InjectorError> {
        self.debouncer.shutdown(injector)
    }
}
