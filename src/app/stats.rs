use crate::debounce::{KeyEvent, KeyEventKind};
use crate::engine::FrameOutcome;
use crate::gesture::Action;
use std::time::Instant;

/// Counters for one run, logged periodically and at shutdown
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub frames: u64,
    pub frames_with_hands: u64,
    pub presses: u64,
    pub releases: u64,
    pub transitions: u64,
    pub malformed_lines: u64,
    pub started_at: Option<Instant>,
}

impl RunStats {
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn record_frame(&mut self, outcome: &FrameOutcome, previous_active: Option<Action>) {
        self.frames += 1;
        if outcome.resolution.reading.hand_detected() {
            self.frames_with_hands += 1;
        }
        self.record_transition(previous_active, outcome.active);
        self.record_events(&outcome.events);
    }

    /// Account for a tap release flushed between frames
    pub fn record_poll(
        &mut self,
        events: &[KeyEvent],
        previous_active: Option<Action>,
        active: Option<Action>,
    ) {
        self.record_transition(previous_active, active);
        self.record_events(events);
    }

    fn record_transition(&mut self, previous_active: Option<Action>, active: Option<Action>) {
        if active != previous_active {
            self.transitions += 1;
        }
    }

    pub fn record_events(&mut self, events: &[KeyEvent]) {
        for event in events {
            match event.kind {
                KeyEventKind::Press => self.presses += 1,
                KeyEventKind::Release => self.releases += 1,
            }
        }
    }

    /// Frames per second since `start`
    pub fn frame_rate(&self, now: Instant) -> f64 {
        match self.started_at {
            Some(started) => {
                let elapsed = now.saturating_duration_since(started).as_secs_f64();
                if elapsed > 0.0 {
                    self.frames as f64 / elapsed
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    pub fn hand_detection_rate(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.frames_with_hands as f64 / self.frames as f64
        }
    }

    pub fn summary(&self, now: Instant) -> String {
        format!(
            "{} frames ({:.1} fps, hands in {:.0}%), {} presses, {} releases, {} transitions, {} malformed lines",
            self.frames,
            self.frame_rate(now),
            self.hand_detection_rate() * 100.0,
            self.presses,
            self.releases,
            self.transitions,
            self.malformed_lines
        )
    }
}
