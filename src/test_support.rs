//! Hand builders shared by unit tests.

use crate::landmarks::{index, HandObservation, Handedness, Landmark, LANDMARK_COUNT};

pub const OPEN: [bool; 5] = [true; 5];
pub const FIST: [bool; 5] = [false; 5];

/// Build a hand in the mirrored view with the given fingers extended.
///
/// `offset_x` shifts the whole hand horizontally so two hands can share a frame.
pub fn make_hand(
    extended: [bool; 5],
    handedness: Option<Handedness>,
    offset_x: f32,
) -> HandObservation {
    let mut landmarks = vec![Landmark::new(0.5, 0.5); LANDMARK_COUNT];

    let outward = match handedness {
        Some(Handedness::Left) => 1.0,
        _ => -1.0,
    };
    landmarks[index::THUMB_TIP] = if extended[0] {
        Landmark::new(0.5 + 0.2 * outward, 0.5)
    } else {
        Landmark::new(0.5 - 0.1 * outward, 0.5)
    };

    for (finger, &tip) in index::TIPS.iter().enumerate().skip(1) {
        landmarks[tip] = if extended[finger] {
            Landmark::new(0.5, 0.2)
        } else {
            Landmark::new(0.5, 0.7)
        };
    }

    for lm in &mut landmarks {
        lm.x = (lm.x + offset_x).clamp(0.0, 1.0);
    }

    HandObservation::new(landmarks, handedness)
}

/// Unlabelled hand with the first `count` fingers extended, thumb first
pub fn hand_with_count(count: usize) -> HandObservation {
    let mut extended = [false; 5];
    for finger in extended.iter_mut().take(count) {
        *finger = true;
    }
    make_hand(extended, None, 0.0)
}

/// Arguments for `sh` that write the shell's pid to `pidfile`, then sleep in place
#[cfg(target_os = "linux")]
pub fn sleeping_detector_args(pidfile: &std::path::Path) -> Vec<String> {
    vec![
        "-c".to_string(),
        "echo $$ > \"$0\"; exec sleep 30".to_string(),
        pidfile.to_string_lossy().to_string(),
    ]
}

/// Wait until the detector has written its pid
#[cfg(target_os = "linux")]
pub async fn wait_for_pid(pidfile: &std::path::Path) -> u32 {
    for _ in 0..100 {
        if let Ok(text) = tokio::fs::read_to_string(pidfile).await {
            if let Ok(pid) = text.trim().parse() {
                return pid;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("detector never wrote {}", pidfile.display());
}

#[cfg(target_os = "linux")]
pub fn process_exists(pid: u32) -> bool {
    std::path::Path::new(&format!("/proc/{}", pid)).exists()
}
