use super::InputInjector;
use crate::error::InjectorError;
use crate::gesture::Key;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Injector that only logs key transitions, used for dry runs
#[derive(Debug, Default)]
pub struct LogInjector {
    held: BTreeSet<Key>,
}

impl LogInjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held_keys(&self) -> impl Iterator<Item = &Key> {
        self.held.iter()
    }
}

impl InputInjector for LogInjector {
    fn press(&mut self, key: Key) -> Result<(), InjectorError> {
        if self.held.insert(key) {
            info!("[dry-run] press {}", key);
        } else {
            debug!("[dry-run] {} already held", key);
        }
        Ok(())
    }

    fn release(&mut self, key: Key) -> Result<(), InjectorError> {
        if self.held.remove(&key) {
            info!("[dry-run] release {}", key);
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_are_idempotent() {
        let mut injector = LogInjector::new();

        injector.press(Key::Up).unwrap();
        injector.press(Key::Up).unwrap();
        assert_eq!(injector.held_keys().copied().collect::<Vec<_>>(), vec![Key::Up]);

        injector.release(Key::Up).unwrap();
        injector.release(Key::Up).unwrap();
        assert_eq!(injector.held_keys().count(), 0);
    }

    #[test]
    fn test_release_of_unheld_key_succeeds() {
        let mut injector = LogInjector::new();
        injector.press(Key::Left).unwrap();

        injector.release(Key::Right).unwrap();
        assert_eq!(injector.held_keys().copied().collect::<Vec<_>>(), vec![Key::Left]);
    }
}
