use super::LandmarkSource;
use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::landmarks::{Frame, HandObservation, Handedness, Landmark};
use async_trait::async_trait;
use serde::Deserialize;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

const MAX_HANDS: usize = 2;

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: Option<String>,
    #[serde(default)]
    score: Option<f32>,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct FrameJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one detector output line into a frame.
///
/// A reported detector error yields an empty frame. Hands scored below
/// `min_score` are dropped, and at most two hands are kept.
pub fn parse_frame_line(line: &str, min_score: f32) -> Result<Frame, serde_json::Error> {
    let parsed: FrameJson = serde_json::from_str(line)?;

    if let Some(error) = parsed.error {
        warn!("Detector error: {}", error);
        return Ok(Frame::empty());
    }

    let hands = parsed
        .hands
        .into_iter()
        .filter(|hand| {
            let keep = hand.score.map_or(true, |score| score >= min_score);
            if !keep {
                debug!("Dropping hand with score {:?}", hand.score);
            }
            keep
        })
        .take(MAX_HANDS)
        .map(|hand| {
            let handedness = hand.handedness.as_deref().and_then(Handedness::from_label);
            let landmarks = hand
                .landmarks
                .iter()
                .map(|lm| Landmark::new(lm.x, lm.y))
                .collect();
            HandObservation::new(landmarks, handedness)
        })
        .collect();

    Ok(Frame::new(hands))
}

/// Reads frames as JSON lines from stdin, a recorded file, or a detector process
pub struct JsonLinesSource {
    name: String,
    lines: Lines<Box<dyn AsyncBufRead + Unpin + Send>>,
    child: Option<Child>,
    min_score: f32,
    max_consecutive_errors: u32,
    consecutive_errors: u32,
    malformed: u64,
}

impl JsonLinesSource {
    pub fn from_reader<R>(name: impl Into<String>, reader: R, config: &SourceConfig) -> Self
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let reader: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        Self {
            name: name.into(),
            lines: reader.lines(),
            child: None,
            min_score: config.min_score,
            max_consecutive_errors: config.max_consecutive_errors.max(1),
            consecutive_errors: 0,
            malformed: 0,
        }
    }

    pub fn stdin(config: &SourceConfig) -> Self {
        info!("Reading landmark frames from stdin");
        Self::from_reader("stdin", BufReader::new(tokio::io::stdin()), config)
    }

    pub async fn open_file(config: &SourceConfig) -> Result<Self, SourceError> {
        let file = tokio::fs::File::open(&config.path)
            .await
            .map_err(|e| SourceError::Open {
                source_name: config.path.clone(),
                details: e.to_string(),
            })?;

        info!("Replaying landmark frames from {}", config.path);
        Ok(Self::from_reader(
            format!("file {}", config.path),
            BufReader::new(file),
            config,
        ))
    }

    /// Start the detector helper and read its stdout
    pub fn spawn_command(config: &SourceConfig) -> Result<Self, SourceError> {
        let command_line = format!("{} {}", config.command, config.args.join(" "));

        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SourceError::Open {
                source_name: command_line.clone(),
                details: e.to_string(),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| SourceError::Open {
            source_name: command_line.clone(),
            details: "detector stdout not captured".to_string(),
        })?;

        info!("Started detector process: {}", command_line.trim());

        let mut source = Self::from_reader(
            format!("command {}", command_line.trim()),
            BufReader::new(stdout),
            config,
        );
        source.child = Some(child);
        Ok(source)
    }

    async fn end_of_input(&mut self) -> Result<Option<Frame>, SourceError> {
        if let Some(child) = self.child.as_mut() {
            let status = child.wait().await?;
            self.child = None;
            if !status.success() {
                return Err(SourceError::DetectorExited(status.to_string()));
            }
            info!("Detector process finished");
        }
        Ok(None)
    }
}

#[async_trait]
impl LandmarkSource for JsonLinesSource {
    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError> {
        loop {
            let line = match self.lines.next_line().await? {
                Some(line) => line,
                None => return self.end_of_input().await,
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if line.eq_ignore_ascii_case("READY") {
                info!("Detector signalled ready");
                continue;
            }

            match parse_frame_line(line, self.min_score) {
                Ok(frame) => {
                    self.consecutive_errors = 0;
                    return Ok(Some(frame));
                }
                Err(e) => {
                    self.consecutive_errors += 1;
                    self.malformed += 1;

                    if self.consecutive_errors >= self.max_consecutive_errors {
                        return Err(SourceError::Malformed {
                            count: self.consecutive_errors,
                            details: e.to_string(),
                        });
                    }

                    warn!(
                        "Skipping malformed landmark line (attempt {}): {}",
                        self.consecutive_errors, e
                    );
                }
            }
        }
    }

    fn describe(&self) -> String {
        self.name.clone()
    }

    fn malformed_lines(&self) -> u64 {
        self.malformed
    }

    async fn close(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };

        if let Err(e) = child.start_kill() {
            debug!("Detector process already gone: {}", e);
        }

        match child.wait().await {
            Ok(status) => info!("Detector process stopped ({})", status),
            Err(e) => warn!("Failed to reap detector process: {}", e),
        }
        self.child = None;
    }
}
