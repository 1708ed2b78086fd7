//! Landmark sources.
//!
//! A source yields one [`Frame`] per call, in capture order. The hand
//! detector itself runs outside this crate; sources only parse what it
//! reports.

mod json_lines;
mod scripted;


pub use json_lines::{parse_frame_line, JsonLinesSource};
pub use scripted::ScriptedSource;

use crate::config::{SourceConfig, SourceKind};
use crate::error::SourceError;
use crate::landmarks::Frame;
use async_trait::async_trait;

#[async_trait]
pub trait LandmarkSource: Send {
    /// Next frame, or `None` once the input has ended
    async fn next_frame(&mut self) -> Result<Option<Frame>, SourceError>;

    /// Human-readable name for logs
    fn describe(&self) -> String;

    /// Lines skipped because they could not be parsed
    fn malformed_lines(&self) -> u64 {
        0
    }

    /// Stop producing frames and release anything the source owns.
    ///
    /// Called once on shutdown. Must not rely on `Drop`, since the binary
    /// leaves through `std::process::exit`.
    async fn close(&mut self) {}
}

/// Open the source selected in the configuration
pub async fn create_source(config: &SourceConfig) -> Result<Box<dyn LandmarkSource>, SourceError> {
    let source = match config.kind {
        SourceKind::Stdin => JsonLinesSource::stdin(config),
        SourceKind::File => JsonLinesSource::open_file(config).await?,
        SourceKind::Command => JsonLinesSource::spawn_command(config)?,
    };
    Ok(Box::new(source))
}
