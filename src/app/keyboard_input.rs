use super::ShutdownReason;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{self, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Terminal quit key listener ('q' or Esc)
pub struct KeyboardInputHandler {
    shutdown_sender: mpsc::UnboundedSender<ShutdownReason>,
    cancellation_token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl KeyboardInputHandler {
    /// Create a new keyboard input handler
    pub fn new(
        shutdown_sender: mpsc::UnboundedSender<ShutdownReason>,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            shutdown_sender,
            cancellation_token,
            task: None,
        }
    }

    /// Start listening for the quit key
    pub fn start(&mut self) {
        debug!("Keyboard quit listener started");

        let shutdown_sender = self.shutdown_sender.clone();
        let cancellation_token = self.cancellation_token.clone();

        // Raw-mode polling blocks, so it gets its own thread
        self.task = Some(task::spawn_blocking(move || {
            if let Err(e) = enable_raw_mode() {
                error!("Failed to enable raw mode for keyboard input: {}", e);
                return;
            }

            debug!("Raw mode enabled - keyboard handler active");

            loop {
                if cancellation_token.is_cancelled() {
                    debug!("Keyboard input handler stopping");
                    break;
                }

                match event::poll(Duration::from_millis(100)) {
                    Ok(true) => {
                        if let Ok(Event::Key(key_event)) = event::read() {
                            if key_event.kind != KeyEventKind::Press {
                                continue;
                            }
                            match key_event.code {
                                KeyCode::Char('q') | KeyCode::Esc => {
                                    info!("Quit key pressed - requesting shutdown");
                                    let _ = shutdown_sender.send(ShutdownReason::UserRequest);
                                    break;
                                }
                                other => debug!("Key pressed: {:?}", other),
                            }
                        }
                    }
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Error polling for keyboard events: {}", e);
                    }
                }
            }

            if let Err(e) = disable_raw_mode() {
                error!("Failed to disable raw mode: {}", e);
            } else {
                debug!("Raw mode disabled");
            }
        }));
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the listener and restore the terminal
    pub async fn stop(&mut self) {
        info!("Stopping keyboard input handler");
        self.cancellation_token.cancel();

        if let Some(task) = self.task.take() {
            if tokio::time::timeout(Duration::from_millis(500), task).await.is_err() {
                warn!("Keyboard input handler did not stop in time");
            }
        }

        // Restore cooked mode even if the task exited early
        let _ = disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keyboard_handler_creation() {
        let (sender, _receiver) = mpsc::unbounded_channel();
        let handler = KeyboardInputHandler::new(sender, CancellationToken::new());

        assert!(!handler.cancellation_token.is_cancelled());
        assert!(!handler.is_running());
    }

    #[tokio::test]
    async fn test_keyboard_handler_stop() {
        let (sender, _receiver) = mpsc::unbounded_channel();
        let mut handler = KeyboardInputHandler::new(sender, CancellationToken::new());

        handler.stop().await;
        assert!(handler.cancellation_token.is_cancelled());
    }
}
