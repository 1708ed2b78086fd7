use super::{HandpadController, ShutdownReason};
use crate::error::Result;
use std::time::Instant;
use tracing::{error, info};

impl HandpadController {
    /// Release every key, stop background tasks and report the run
    pub async fn shutdown(&mut self, reason: ShutdownReason) -> Result<i32> {
        info!("Shutdown initiated: {:?}", reason);

        // Cancel signal listeners and the keyboard task
        self.cancellation_token.cancel();

        if let Some(handler) = self.keyboard_handler.as_mut() {
            handler.stop().await;
        }

        // The detector child is not reaped by Drop on the process::exit path
        self.source.close().await;

        let released = self.engine.shutdown(self.injector.as_mut());
        if let Ok(events) = &released {
            self.stats.record_events(events);
        }

        self.stats.malformed_lines = self.source.malformed_lines();
        info!("Run summary: {}", self.stats.summary(Instant::now()));

        if let Err(e) = released {
            error!("Failed to release keys on shutdown: {}", e);
            return Err(e.into());
        }
        info!("All keys released");

        let exit_code = reason.exit_code();
        info!("Handpad shutdown complete (exit code {})", exit_code);
        Ok(exit_code)
    }
}
