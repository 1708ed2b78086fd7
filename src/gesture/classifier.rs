use super::types::{FingerPattern, FingerState};
use crate::landmarks::{index, Handedness, HandObservation};

/// Decide which fingers of one hand are extended.
///
/// Expects an observation already in the user's mirrored view. Returns
/// `None` for an incomplete skeleton.
pub fn finger_pattern(hand: &HandObservation) -> Option<FingerPattern> {
    if !hand.is_complete() {
        return None;
    }

    let mut fingers = [false; 5];

    // Thumb moves sideways, so it is the only finger tested on x
    let tip = hand.landmark(index::THUMB_TIP)?;
    let joint = hand.landmark(index::THUMB_IP)?;
    fingers[0] = match hand.handedness {
        Some(Handedness::Left) => tip.x > joint.x,
        Some(Handedness::Right) | None => tip.x < joint.x,
    };

    // Tip against the PIP joint, skipping the DIP to tolerate partial curls
    for (finger, &tip_index) in index::TIPS.iter().enumerate().skip(1) {
        let tip = hand.landmark(tip_index)?;
        let pip = hand.landmark(tip_index - 2)?;
        fingers[finger] = tip.y < pip.y;
    }

    Some(FingerPattern(fingers))
}

/// Extended-finger count in [0, 5], `None` when no usable hand is present
pub fn count_extended(hand: Option<&HandObservation>) -> Option<u8> {
    hand.and_then(finger_pattern).map(|pattern| pattern.count())
}

/// Coarse OPEN/CLOSED/PARTIAL/NONE state for the dual-hand rules
pub fn hand_state(hand: Option<&HandObservation>) -> FingerState {
    FingerState::from_count(count_extended(hand))
}
