//! Hand landmark data model.
//!
//! A hand is 21 normalized image-plane points in the standard hand skeleton
//! order (wrist, four thumb joints, four joints per finger). Observations
//! live for a single frame and are never retained.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a complete hand skeleton
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices in skeleton order
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// Fingertips, thumb first
    pub const TIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];
}

/// A single normalized landmark position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// X coordinate (0.0 to 1.0, left to right)
    pub x: f32,
    /// Y coordinate (0.0 to 1.0, top to bottom)
    pub y: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Which of the user's hands an observation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn opposite(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    /// Parse a detector label ("Left"/"Right", case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Some(Handedness::Left),
            "right" => Some(Handedness::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

/// One detected hand for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub landmarks: Vec<Landmark>,
    pub handedness: Option<Handedness>,
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>, handedness: Option<Handedness>) -> Self {
        Self {
            landmarks,
            handedness,
        }
    }

    /// Whether all 21 skeleton points are present
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT
    }

    pub fn landmark(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Mean x of the landmarks, used to tell hands apart when labels are missing
    pub fn center_x(&self) -> f32 {
        if self.landmarks.is_empty() {
            return 0.5;
        }
        self.landmarks.iter().map(|lm| lm.x).sum::<f32>() / self.landmarks.len() as f32
    }
}

/// How the detector's view of the frame relates to the user's mirror view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorPolicy {
    /// Flip x coordinates before classification (source frame was not mirrored)
    pub flip_coordinates: bool,
    /// Swap detector handedness labels (labels refer to the unflipped frame)
    pub swap_handedness: bool,
}

impl Default for MirrorPolicy {
    fn default() -> Self {
        Self {
            flip_coordinates: false,
            swap_handedness: true,
        }
    }
}

impl MirrorPolicy {
    /// Bring a raw detector observation into the user's mirrored view
    pub fn apply(&self, mut hand: HandObservation) -> HandObservation {
        if self.flip_coordinates {
            for lm in &mut hand.landmarks {
                lm.x = 1.0 - lm.x;
            }
        }
        if self.swap_handedness {
            hand.handedness = hand.handedness.map(Handedness::opposite);
        }
        hand
    }
}

/// All hands reported by the landmark source for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub hands: Vec<HandObservation>,
}

impl Frame {
    pub fn new(hands: Vec<HandObservation>) -> Self {
        Self { hands }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Hands carrying a full skeleton; incomplete ones count as not detected
    pub fn complete_hands(&self) -> impl Iterator<Item = &HandObservation> {
        self.hands.iter().filter(|hand| hand.is_complete())
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_with_x(x: f32, handedness: Option<Handedness>) -> HandObservation {
        HandObservation::new(vec![Landmark::new(x, 0.5); LANDMARK_COUNT], handedness)
    }

    #[test]
    fn test_handedness_from_label() {
        assert_eq!(Handedness::from_label("Left"), Some(Handedness::Left));
        assert_eq!(Handedness::from_label(" RIGHT "), Some(Handedness::Right));
        assert_eq!(Handedness::from_label("both"), None);
    }

    #[test]
    fn test_mirror_swaps_detector_label() {
        let policy = MirrorPolicy::default();
        let hand = policy.apply(hand_with_x(0.3, Some(Handedness::Left)));

        assert_eq!(hand.handedness, Some(Handedness::Right));
        assert_eq!(hand.landmarks[0].x, 0.3);
    }

    #[test]
    fn test_mirror_flips_coordinates() {
        let policy = MirrorPolicy {
            flip_coordinates: true,
            swap_handedness: false,
        };
        let hand = policy.apply(hand_with_x(0.25, None));

        assert!((hand.landmarks[0].x - 0.75).abs() < f32::EPSILON);
        assert_eq!(hand.handedness, None);
    }

    #[test]
    fn test_incomplete_hands_are_filtered() {
        let frame = Frame::new(vec![
            HandObservation::new(vec![Landmark::default(); 12], None),
            hand_with_x(0.5, None),
        ]);

        assert_eq!(frame.hand_count(), 2);
        assert_eq!(frame.complete_hands().count(), 1);
    }
}
