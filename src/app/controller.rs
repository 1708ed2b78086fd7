use super::keyboard_input::KeyboardInputHandler;
use super::stats::RunStats;
use super::types::ShutdownReason;
use crate::config::HandpadConfig;
use crate::engine::GestureEngine;
use crate::error::Result;
use crate::injector::{create_injector, InputInjector};
use crate::source::{create_source, LandmarkSource};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Main application coordinator: owns the source, engine and injector
pub struct HandpadController {
    pub(super) config: HandpadConfig,
    pub(super) engine: GestureEngine,
    pub(super) source: Box<dyn LandmarkSource>,
    pub(super) injector: Box<dyn InputInjector>,
    pub(super) stats: RunStats,

    // Lifecycle management
    pub(super) keyboard_handler: Option<KeyboardInputHandler>,
    pub(super) shutdown_sender: mpsc::UnboundedSender<ShutdownReason>,
    pub(super) shutdown_receiver: Option<mpsc::UnboundedReceiver<ShutdownReason>>,
    pub(super) cancellation_token: CancellationToken,
}

impl HandpadController {
    /// Create a controller around an existing source and injector
    pub fn new(
        config: HandpadConfig,
        source: Box<dyn LandmarkSource>,
        injector: Box<dyn InputInjector>,
    ) -> Result<Self> {
        config.validate()?;
        let profile = config.gesture_profile()?;
        let engine = GestureEngine::new(profile, config.mirror);
        let (shutdown_sender, shutdown_receiver) = mpsc::unbounded_channel();
        let cancellation_token = CancellationToken::new();

        let keyboard_handler = config.system.keyboard_quit.then(|| {
            KeyboardInputHandler::new(shutdown_sender.clone(), cancellation_token.child_token())
        });

        info!(
            "Controller ready: profile={}, source={}, injector={}",
            config.profile.kind.as_str(),
            source.describe(),
            injector.name()
        );

        Ok(Self {
            config,
            engine,
            source,
            injector,
            stats: RunStats::default(),
            keyboard_handler,
            shutdown_sender,
            shutdown_receiver: Some(shutdown_receiver),
            cancellation_token,
        })
    }

    /// Create a controller with the source and injector named in the configuration
    pub async fn from_config(config: HandpadConfig, dry_run: bool) -> Result<Self> {
        let injector = create_injector(&config.injector, dry_run)?;
        let source = create_source(&config.source).await?;
        Self::new(config, source, injector)
    }

    /// Sender that stops the run loop when a reason is sent
    pub fn shutdown_handle(&self) -> mpsc::UnboundedSender<ShutdownReason> {
        self.shutdown_sender.clone()
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    pub fn config(&self) -> &HandpadConfig {
        &self.config
    }
}
