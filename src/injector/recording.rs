use super::InputInjector;
use crate::debounce::{KeyEvent, KeyEventKind};
use crate::error::InjectorError;
use crate::gesture::Key;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

/// In-memory injector for testing without a real keyboard.
///
/// Every call is recorded, including idempotent no-ops, so tests can check
/// exactly what the engine asked for. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingInjector {
    log: Arc<Mutex<Vec<KeyEvent>>>,
    held: Arc<Mutex<BTreeSet<Key>>>,
}

impl RecordingInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// All press/release calls in order
    pub fn events(&self) -> Vec<KeyEvent> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn presses(&self) -> Vec<Key> {
        self.filtered(KeyEventKind::Press)
    }

    pub fn releases(&self) -> Vec<Key> {
        self.filtered(KeyEventKind::Release)
    }

    /// Keys currently down from the injector's point of view
    pub fn held_keys(&self) -> Vec<Key> {
        self.held
            .lock()
            .map(|held| held.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut log) = self.log.lock() {
            log.clear();
        }
    }

    fn filtered(&self, kind: KeyEventKind) -> Vec<Key> {
        self.events()
            .into_iter()
            .filter(|event| event.kind == kind)
            .map(|event| event.key)
            .collect()
    }

    fn record(&self, event: KeyEvent) {
        if let Ok(mut log) = self.log.lock() {
            log.push(event);
        }
        if let Ok(mut held) = self.held.lock() {
            match event.kind {
                KeyEventKind::Press => held.insert(event.key),
                KeyEventKind::Release => held.remove(&event.key),
            };
        }
    }
}

impl InputInjector for RecordingInjector {
    fn press(&mut self, key: Key) -> Result<(), InjectorError> {
        self.record(KeyEvent::press(key));
        Ok(())
    }

    fn release(&mut self, key: Key) -> Result<(), InjectorError> {
        self.record(KeyEvent::release(key));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
