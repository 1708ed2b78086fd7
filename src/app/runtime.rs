use super::{HandpadController, ShutdownReason};
use crate::error::{HandpadError, InjectorError, Result};
use crate::landmarks::Frame;
use std::time::{Duration, Instant};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, trace, warn};

const TAP_POLL_INTERVAL: Duration = Duration::from_millis(10);

enum LoopEvent {
    Shutdown(ShutdownReason),
    Frame(Option<Frame>),
    SourceFailed(String),
    Tick,
}

impl HandpadController {
    /// Run until a signal, the quit key, end of input, or a fatal error.
    ///
    /// Every exit path releases all keys. Returns the process exit code.
    pub async fn run(&mut self) -> Result<i32> {
        let mut receiver = self
            .shutdown_receiver
            .take()
            .ok_or_else(|| HandpadError::system("Controller has already run"))?;

        self.setup_signal_handlers();
        self.announce();

        // Raw mode starts after the countdown so stdout stays readable
        let reason = match self.wait_for_startup(&mut receiver).await {
            Some(reason) => reason,
            None => {
                if let Some(handler) = self.keyboard_handler.as_mut() {
                    handler.start();
                }
                self.frame_loop(&mut receiver).await
            }
        };

        self.shutdown(reason).await
    }

    async fn frame_loop(
        &mut self,
        receiver: &mut mpsc::UnboundedReceiver<ShutdownReason>,
    ) -> ShutdownReason {
        info!("Handpad is running ({})", self.source.describe());
        self.stats.start(Instant::now());

        let mut tick = tokio::time::interval(TAP_POLL_INTERVAL);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            let event = tokio::select! {
                biased;
                reason = receiver.recv() => LoopEvent::Shutdown(
                    reason.unwrap_or_else(|| ShutdownReason::Error("Shutdown channel closed".to_string())),
                ),
                frame = self.source.next_frame() => match frame {
                    Ok(frame) => LoopEvent::Frame(frame),
                    Err(e) => LoopEvent::SourceFailed(e.to_string()),
                },
                _ = tick.tick() => LoopEvent::Tick,
            };

            let result = match event {
                LoopEvent::Shutdown(reason) => return reason,
                LoopEvent::Frame(None) => {
                    info!("Landmark input ended");
                    return ShutdownReason::EndOfInput;
                }
                LoopEvent::SourceFailed(details) => {
                    error!("Landmark source failed: {}", details);
                    return ShutdownReason::Error(details);
                }
                LoopEvent::Frame(Some(frame)) => self.handle_frame(&frame),
                LoopEvent::Tick => self.poll_taps(),
            };

            if let Err(e) = result {
                error!("Key injection failed: {}", e);
                return ShutdownReason::Error(e.to_string());
            }
        }
    }

    /// Push one frame through the engine and update the run statistics
    pub(super) fn handle_frame(&mut self, frame: &Frame) -> std::result::Result<(), InjectorError> {
        let previous = self.engine.active();
        let outcome = self
            .engine
            .process_frame(frame, Instant::now(), self.injector.as_mut())?;

        self.stats.record_frame(&outcome, previous);
        self.stats.malformed_lines = self.source.malformed_lines();

        trace!(
            "Frame {}: {:?} -> {} (active: {:?})",
            self.stats.frames,
            outcome.resolution.reading,
            outcome.action(),
            outcome.active
        );

        let interval = self.config.system.status_interval_frames;
        if interval > 0 && self.stats.frames % interval == 0 {
            info!(
                "Frame {} - {}",
                self.stats.frames,
                self.stats.summary(Instant::now())
            );
        }

        Ok(())
    }

    /// Flush due tap releases between frames
    pub(super) fn poll_taps(&mut self) -> std::result::Result<(), InjectorError> {
        let previous = self.engine.active();
        let events = self.engine.poll(Instant::now(), self.injector.as_mut())?;
        self.stats
            .record_poll(&events, previous, self.engine.active());
        Ok(())
    }

    /// Set up signal handlers for graceful shutdown
    fn setup_signal_handlers(&self) {
        // Handle SIGTERM - Unix only
        #[cfg(unix)]
        {
            let sender = self.shutdown_sender.clone();
            let token = self.cancellation_token.clone();
            tokio::spawn(async move {
                let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                    Ok(sigterm) => sigterm,
                    Err(e) => {
                        warn!("Failed to register SIGTERM handler: {}", e);
                        return;
                    }
                };
                tokio::select! {
                    _ = token.cancelled() => {}
                    Some(()) = sigterm.recv() => {
                        info!("Received SIGTERM signal");
                        let _ = sender.send(ShutdownReason::Signal("SIGTERM".to_string()));
                    }
                }
            });
        }

        // Handle SIGINT (Ctrl+C) - Cross-platform
        let sender = self.shutdown_sender.clone();
        let token = self.cancellation_token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                result = signal::ctrl_c() => {
                    if result.is_ok() {
                        info!("Received SIGINT signal (Ctrl+C)");
                        let _ = sender.send(ShutdownReason::Signal("SIGINT".to_string()));
                    }
                }
            }
        });
    }
}
