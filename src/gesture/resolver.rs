use super::classifier::{count_extended, hand_state};
use super::types::{Action, FingerState};
use crate::landmarks::{Frame, HandObservation, Handedness, MirrorPolicy};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How many hands a profile reads and how they are classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Finger count of the first hand in view
    SingleHand,
    /// OPEN/CLOSED state of the user's left and right hands
    DualHand,
}

/// What the resolver saw, kept for logging and stats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Single { count: Option<u8> },
    Dual { left: FingerState, right: FingerState },
}

impl Reading {
    pub fn hand_detected(&self) -> bool {
        match self {
            Reading::Single { count } => count.is_some(),
            Reading::Dual { left, right } => {
                *left != FingerState::None || *right != FingerState::None
            }
        }
    }
}

/// Outcome of resolving one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub action: Action,
    pub reading: Reading,
}

/// Finger count to action for the driving profile
pub fn resolve_single(count: Option<u8>) -> Action {
    match count {
        None => Action::Idle,
        Some(0) => Action::Brake,
        Some(1) => Action::LeanForward,
        Some(5) => Action::Gas,
        Some(_) => Action::None,
    }
}

/// (left, right) hand states to action for the runner profile
pub fn resolve_dual(left: FingerState, right: FingerState) -> Action {
    match (left, right) {
        (FingerState::Open, FingerState::Open) => Action::Jump,
        (FingerState::Closed, FingerState::Closed) => Action::Slide,
        (FingerState::Open, FingerState::Closed) => Action::MoveLeft,
        (FingerState::Closed, FingerState::Open) => Action::MoveRight,
        _ => Action::Idle,
    }
}

/// Split up to two mirrored hands into the user's (left, right).
///
/// Labelled hands go to their side first. Unlabelled or duplicate hands fill
/// the remaining side; with both sides free the hand nearer the left edge
/// of the mirrored frame is the user's left.
pub fn assign_hands(
    hands: Vec<HandObservation>,
) -> (Option<HandObservation>, Option<HandObservation>) {
    let mut left = None;
    let mut right = None;
    let mut unplaced = Vec::new();

    for hand in hands.into_iter().take(2) {
        match hand.handedness {
            Some(Handedness::Left) if left.is_none() => left = Some(hand),
            Some(Handedness::Right) if right.is_none() => right = Some(hand),
            _ => unplaced.push(hand),
        }
    }

    unplaced.sort_by(|a, b| a.center_x().total_cmp(&b.center_x()));
    let mut unplaced = unplaced.into_iter();

    if unplaced.len() == 2 {
        return (unplaced.next(), unplaced.next());
    }

    if let Some(hand) = unplaced.next() {
        match (&left, &right) {
            (None, None) if hand.center_x() < 0.5 => left = Some(hand),
            (None, None) => right = Some(hand),
            (None, Some(_)) => left = Some(hand),
            (Some(_), None) => right = Some(hand),
            (Some(_), Some(_)) => {}
        }
    }

    (left, right)
}

/// Stateless frame to action resolution
#[derive(Debug, Clone, Copy)]
pub struct GestureResolver {
    mode: ClassificationMode,
    mirror: MirrorPolicy,
}

impl GestureResolver {
    pub fn new(mode: ClassificationMode, mirror: MirrorPolicy) -> Self {
        Self { mode, mirror }
    }

    pub fn mode(&self) -> ClassificationMode {
        self.mode
    }

    /// Resolve a frame; identical frames always give identical results
    pub fn resolve(&self, frame: &Frame) -> Resolution {
        let hands: Vec<HandObservation> = frame
            .complete_hands()
            .cloned()
            .map(|hand| self.mirror.apply(hand))
            .collect();

        let resolution = match self.mode {
            ClassificationMode::SingleHand => {
                let count = count_extended(hands.first());
                Resolution {
                    action: resolve_single(count),
                    reading: Reading::Single { count },
                }
            }
            ClassificationMode::DualHand => {
                let (left_hand, right_hand) = assign_hands(hands);
                let left = hand_state(left_hand.as_ref());
                let right = hand_state(right_hand.as_ref());
                Resolution {
                    action: resolve_dual(left, right),
                    reading: Reading::Dual { left, right },
                }
            }
        };

        trace!("Resolved {:?} -> {}", resolution.reading, resolution.action);
        resolution
    }
}
