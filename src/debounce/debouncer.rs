use crate::error::InjectorError;
use crate::gesture::{Action, Key, KeyBindings};
use crate::injector::InputInjector;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How resolved actions turn into key activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePolicy {
    /// Keys stay down while the gesture persists
    Hold,
    /// Keys are tapped, at most once per cooldown, and released after `tap_duration`
    Tap {
        cooldown: Duration,
        tap_duration: Duration,
    },
}

impl DebouncePolicy {
    pub fn from_mode(mode: DebounceMode, cooldown: Duration, tap_duration: Duration) -> Self {
        match mode {
            DebounceMode::Hold => DebouncePolicy::Hold,
            DebounceMode::Tap => DebouncePolicy::Tap {
                cooldown,
                tap_duration,
            },
        }
    }

    pub fn mode(&self) -> DebounceMode {
        match self {
            DebouncePolicy::Hold => DebounceMode::Hold,
            DebouncePolicy::Tap { .. } => DebounceMode::Tap,
        }
    }
}

/// Policy selector as written in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebounceMode {
    Hold,
    Tap,
}

/// What an ambiguous (NONE) resolution does to held keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmbiguousPolicy {
    /// Keep the current keys down; only IDLE releases
    #[default]
    Hold,
    /// Treat NONE like IDLE
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyEventKind {
    Press,
    Release,
}

/// One press or release issued to the injector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self {
            key,
            kind: KeyEventKind::Press,
        }
    }

    pub fn release(key: Key) -> Self {
        Self {
            key,
            kind: KeyEventKind::Release,
        }
    }
}

/// Key-state machine owning the active action.
///
/// Call [`ActionDebouncer::update`] once per frame with the resolved action.
/// The pressed keys are always exactly the bindings of the active action.
#[derive(Debug)]
pub struct ActionDebouncer {
    policy: DebouncePolicy,
    ambiguous: AmbiguousPolicy,
    bindings: KeyBindings,
    active: Option<Action>,
    last_press: Option<Instant>,
    release_due: Option<Instant>,
}

impl ActionDebouncer {
    pub fn new(policy: DebouncePolicy, ambiguous: AmbiguousPolicy, bindings: KeyBindings) -> Self {
        Self {
            policy,
            ambiguous,
            bindings,
            active: None,
            last_press: None,
            release_due: None,
        }
    }

    /// Action currently holding keys
    pub fn active(&self) -> Option<Action> {
        self.active
    }

    /// Keys currently held down
    pub fn held_keys(&self) -> &[Key] {
        match self.active {
            Some(action) => self.bindings.keys_for(action),
            None => &[],
        }
    }

    pub fn policy(&self) -> DebouncePolicy {
        self.policy
    }

    /// Apply this frame's action and return the events issued, in order
    pub fn update(
        &mut self,
        action: Action,
        now: Instant,
        injector: &mut dyn InputInjector,
    ) -> Result<Vec<KeyEvent>, InjectorError> {
        match self.policy {
            DebouncePolicy::Hold => self.update_hold(action, injector),
            DebouncePolicy::Tap {
                cooldown,
                tap_duration,
            } => self.update_tap(action, now, cooldown, tap_duration, injector),
        }
    }

    /// Release a tap whose duration has elapsed
    pub fn poll(
        &mut self,
        now: Instant,
        injector: &mut dyn InputInjector,
    ) -> Result<Vec<KeyEvent>, InjectorError> {
        let mut events = Vec::new();
        if let Some(due) = self.release_due {
            if now >= due {
                self.release_active(injector, &mut events)?;
            }
        }
        Ok(events)
    }

    /// Release every key in the vocabulary exactly once, whatever is active
    pub fn shutdown(
        &mut self,
        injector: &mut dyn InputInjector,
    ) -> Result<Vec<KeyEvent>, InjectorError> {
        info!("Releasing all keys");
        self.active = None;
        self.release_due = None;

        let mut events = Vec::with_capacity(Key::ALL.len());
        let mut first_error = None;
        for key in Key::ALL {
            // Every key is attempted, the first failure is reported
            match injector.release(key) {
                Ok(()) => events.push(KeyEvent::release(key)),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(events),
        }
    }

    fn update_hold(
        &mut self,
        action: Action,
        injector: &mut dyn InputInjector,
    ) -> Result<Vec<KeyEvent>, InjectorError> {
        let mut events = Vec::new();

        if self.active == Some(action) {
            return Ok(events);
        }

        if !action.is_actionable() {
            if self.releases_on(action) && self.active.is_some() {
                self.release_active(injector, &mut events)?;
                info!("All controls released ({})", action);
            }
            return Ok(events);
        }

        self.release_active(injector, &mut events)?;
        self.press(action, injector, &mut events)?;
        info!("{} activated", action);

        Ok(events)
    }

    fn update_tap(
        &mut self,
        action: Action,
        now: Instant,
        cooldown: Duration,
        tap_duration: Duration,
        injector: &mut dyn InputInjector,
    ) -> Result<Vec<KeyEvent>, InjectorError> {
        let mut events = self.poll(now, injector)?;

        if !action.is_actionable() {
            return Ok(events);
        }

        let cooled_down = self
            .last_press
            .map_or(true, |last| now.saturating_duration_since(last) >= cooldown);
        if !cooled_down {
            debug!("{} suppressed by cooldown", action);
            return Ok(events);
        }

        self.release_active(injector, &mut events)?;
        self.press(action, injector, &mut events)?;
        self.last_press = Some(now);
        self.release_due = Some(now + tap_duration);
        info!("{} tapped", action);

        Ok(events)
    }

    fn releases_on(&self, action: Action) -> bool {
        match action {
            Action::None => self.ambiguous == AmbiguousPolicy::Release,
            _ => true,
        }
    }

    fn press(
        &mut self,
        action: Action,
        injector: &mut dyn InputInjector,
        events: &mut Vec<KeyEvent>,
    ) -> Result<(), InjectorError> {
        for &key in self.bindings.keys_for(action) {
            injector.press(key)?;
            events.push(KeyEvent::press(key));
        }
        self.active = Some(action);
        Ok(())
    }

    fn release_active(
        &mut self,
        injector: &mut dyn InputInjector,
        events: &mut Vec<KeyEvent>,
    ) -> Result<(), InjectorError> {
        if let Some(active) = self.active.take() {
            for &key in self.bindings.keys_for(active) {
                injector.release(key)?;
                events.push(KeyEvent::release(key));
            }
        }
        self.release_due = None;
        Ok(())
    }
}
