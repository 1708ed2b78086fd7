use super::resolver::ClassificationMode;
use super::types::{Action, Key};
use crate::debounce::{AmbiguousPolicy, DebounceMode, DebouncePolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Target game, which fixes the gesture vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    /// One hand, finger count, keys held (driving game)
    Driving,
    /// Two hands, open/closed, keys tapped (runner game)
    Runner,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Driving => "driving",
            ProfileKind::Runner => "runner",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "driving" => Some(ProfileKind::Driving),
            "runner" => Some(ProfileKind::Runner),
            _ => None,
        }
    }

    pub fn mode(&self) -> ClassificationMode {
        match self {
            ProfileKind::Driving => ClassificationMode::SingleHand,
            ProfileKind::Runner => ClassificationMode::DualHand,
        }
    }

    /// Actions this profile can resolve to
    pub fn vocabulary(&self) -> &'static [Action] {
        match self {
            ProfileKind::Driving => &[
                Action::Brake,
                Action::Gas,
                Action::LeanForward,
                Action::Idle,
                Action::None,
            ],
            ProfileKind::Runner => &[
                Action::Jump,
                Action::Slide,
                Action::MoveLeft,
                Action::MoveRight,
                Action::Idle,
            ],
        }
    }

    pub fn default_bindings(&self) -> KeyBindings {
        let mut bindings = KeyBindings::new();
        match self {
            ProfileKind::Driving => {
                bindings.bind(Action::Brake, vec![Key::Left]);
                bindings.bind(Action::Gas, vec![Key::Right]);
                bindings.bind(Action::LeanForward, vec![Key::Up]);
            }
            ProfileKind::Runner => {
                bindings.bind(Action::Jump, vec![Key::Up]);
                bindings.bind(Action::Slide, vec![Key::Down]);
                bindings.bind(Action::MoveLeft, vec![Key::Left]);
                bindings.bind(Action::MoveRight, vec![Key::Right]);
            }
        }
        bindings
    }

    /// Driving holds keys, the runner taps them
    pub fn default_mode(&self) -> DebounceMode {
        match self {
            ProfileKind::Driving => DebounceMode::Hold,
            ProfileKind::Runner => DebounceMode::Tap,
        }
    }

    pub fn default_policy(&self, cooldown: Duration, tap_duration: Duration) -> DebouncePolicy {
        DebouncePolicy::from_mode(self.default_mode(), cooldown, tap_duration)
    }

    /// Gesture hints shown on startup
    pub fn gesture_hint(&self, action: Action) -> &'static str {
        match action {
            Action::Brake => "fist (0 fingers)",
            Action::Gas => "open hand (5 fingers)",
            Action::LeanForward => "point up (1 finger)",
            Action::Jump => "both hands open",
            Action::Slide => "both hands closed",
            Action::MoveLeft => "left open, right closed",
            Action::MoveRight => "left closed, right open",
            Action::Idle => "no hand in view",
            Action::None => "any other finger count",
        }
    }
}

/// Key-set `K(a)` for every action
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyBindings {
    map: BTreeMap<Action, Vec<Key>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, action: Action, mut keys: Vec<Key>) {
        keys.sort();
        keys.dedup();
        self.map.insert(action, keys);
    }

    /// Keys for an action; unbound actions hold nothing
    pub fn keys_for(&self, action: Action) -> &[Key] {
        self.map.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Action, &Vec<Key>)> {
        self.map.iter()
    }
}

/// Everything that parameterizes the engine for one game
#[derive(Debug, Clone)]
pub struct GestureProfile {
    pub kind: ProfileKind,
    pub bindings: KeyBindings,
    pub policy: DebouncePolicy,
    pub ambiguous: AmbiguousPolicy,
}

impl GestureProfile {
    /// Profile with the default bindings and timings for `kind`
    pub fn new(kind: ProfileKind) -> Self {
        Self {
            kind,
            bindings: kind.default_bindings(),
            policy: kind.default_policy(Duration::from_millis(200), Duration::from_millis(50)),
            ambiguous: AmbiguousPolicy::default(),
        }
    }

    pub fn mode(&self) -> ClassificationMode {
        self.kind.mode()
    }

    /// One line per actionable gesture, for the startup banner
    pub fn legend(&self) -> Vec<String> {
        self.kind
            .vocabulary()
            .iter()
            .filter(|action| action.is_actionable())
            .map(|&action| {
                let keys: Vec<&str> = self
                    .bindings
                    .keys_for(action)
                    .iter()
                    .map(Key::as_str)
                    .collect();
                format!(
                    "{} = {} [{}]",
                    self.kind.gesture_hint(action),
                    action,
                    keys.join("+")
                )
            })
            .collect()
    }
}
