use super::{HandpadController, ShutdownReason};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

impl HandpadController {
    /// Control legend for the active profile, as shown on start
    pub(super) fn banner(&self) -> Vec<String> {
        let profile = self.engine.profile();
        let title = format!("=== {} CONTROLS ===", profile.kind.as_str().to_uppercase());

        let mut lines = vec![title.clone()];
        lines.extend(profile.legend());
        lines.push("=".repeat(title.len()));
        if self.config.system.keyboard_quit {
            lines.push("Press 'q' or Esc to quit".to_string());
        }
        lines
    }

    /// Print the legend; shown regardless of the log filter
    pub(super) fn announce(&self) {
        for line in self.banner() {
            println!("{}", line);
            info!("{}", line);
        }
    }

    /// Give the user time to focus the game window.
    ///
    /// Counts down on stdout once per second. Returns early with the reason
    /// if shutdown is requested meanwhile.
    pub(super) async fn wait_for_startup(
        &self,
        receiver: &mut mpsc::UnboundedReceiver<ShutdownReason>,
    ) -> Option<ShutdownReason> {
        let seconds = self.config.system.startup_delay_seconds;
        if seconds == 0 {
            return None;
        }

        println!("Switch to the game now! Starting in {} seconds...", seconds);
        info!("Startup delay of {}s", seconds);

        for remaining in (1..=seconds).rev() {
            if remaining < seconds {
                println!("{}...", remaining);
            }
            tokio::select! {
                reason = receiver.recv() => return reason,
                _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            }
        }

        println!("Go!");
        None
    }
}
