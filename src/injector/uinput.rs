use super::InputInjector;
use crate::error::InjectorError;
use crate::gesture::Key;
use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key as EvdevKey};
use std::collections::BTreeSet;
use tracing::{debug, info};

const KEY_DOWN_VALUE: i32 = 1;
const KEY_UP_VALUE: i32 = 0;

/// Virtual keyboard on Linux uinput, visible to every application
pub struct UinputInjector {
    device: VirtualDevice,
    held: BTreeSet<Key>,
}

impl UinputInjector {
    /// Create the virtual keyboard; needs write access to /dev/uinput
    pub fn new(device_name: &str) -> Result<Self, InjectorError> {
        let mut keys = AttributeSet::<EvdevKey>::new();
        for key in Key::ALL {
            keys.insert(Self::evdev_key(key));
        }

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(device_name).with_keys(&keys))
            .and_then(|builder| builder.build())
            .map_err(|e| InjectorError::DeviceCreate {
                details: match e.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        format!("permission denied for /dev/uinput: {}", e)
                    }
                    _ => e.to_string(),
                },
            })?;

        info!("Virtual keyboard '{}' created", device_name);

        Ok(Self {
            device,
            held: BTreeSet::new(),
        })
    }

    fn evdev_key(key: Key) -> EvdevKey {
        match key {
            Key::Up => EvdevKey::KEY_UP,
            Key::Down => EvdevKey::KEY_DOWN,
            Key::Left => EvdevKey::KEY_LEFT,
            Key::Right => EvdevKey::KEY_RIGHT,
        }
    }

    fn emit(&mut self, key: Key, value: i32, action: &'static str) -> Result<(), InjectorError> {
        let event = InputEvent::new(EventType::KEY, Self::evdev_key(key).code(), value);
        self.device
            .emit(&[event])
            .map_err(|e| InjectorError::Emit {
                key: key.to_string(),
                action,
                details: e.to_string(),
            })
    }
}

impl InputInjector for UinputInjector {
    fn press(&mut self, key: Key) -> Result<(), InjectorError> {
        if self.held.contains(&key) {
            debug!("Key {} already held", key);
            return Ok(());
        }
        self.emit(key, KEY_DOWN_VALUE, "press")?;
        self.held.insert(key);
        Ok(())
    }

    fn release(&mut self, key: Key) -> Result<(), InjectorError> {
        // Emitted even for untracked keys; a key-up for an up key is ignored by the kernel
        self.emit(key, KEY_UP_VALUE, "release")?;
        self.held.remove(&key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "uinput"
    }
}
