use super::LandmarkSource;
use crate::error::SourceError;
use crate::landmarks::Frame;
use async_trait::async_trait;
use std::collections::VecDeque;

/// Source that replays a fixed list of frames, for tests and demos
#[derive(Debug, Default)]
pub struct ScriptedSource {
    frames: VecDeque<Frame>,
    served: u64,
}

impl ScriptedSource {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames: frames.into(),
            served: 0,
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(frame);
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

#[async_trait]
impl LandmarkSource for ScriptedSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        let frame = self.frames.pop_front();
        if frame.is_some() {
            self.served += 1;
        }
        Ok(frame)
    }

    fn describe(&self) -> String {
        format!("scripted ({} served, {} left)", self.served, self.frames.len())
    }

    async fn close(&mut self) {
        self.frames.clear();
    }
}
