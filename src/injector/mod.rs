mod log;
mod recording;
#[cfg(all(target_os = "linux", feature = "uinput"))]
mod uinput;

pub use log::LogInjector;
pub use recording::RecordingInjector;
#[cfg(all(target_os = "linux", feature = "uinput"))]
pub use uinput::UinputInjector;

use crate::config::{InjectorBackend, InjectorConfig};
use crate::error::{InjectorError, Result};
use crate::gesture::Key;
use tracing::info;

/// Press/release primitives of the OS keyboard.
///
/// Implementations must be idempotent: pressing a held key or releasing a
/// released key does nothing and succeeds.
pub trait InputInjector: Send {
    fn press(&mut self, key: Key) -> std::result::Result<(), InjectorError>;

    fn release(&mut self, key: Key) -> std::result::Result<(), InjectorError>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// Build the injector selected in the configuration
pub fn create_injector(config: &InjectorConfig, dry_run: bool) -> Result<Box<dyn InputInjector>> {
    if dry_run {
        info!("Dry run - key events are only logged");
        return Ok(Box::new(LogInjector::new()));
    }

    match config.backend {
        InjectorBackend::Log => Ok(Box::new(LogInjector::new())),
        InjectorBackend::Uinput => create_uinput(config),
    }
}

#[cfg(all(target_os = "linux", feature = "uinput"))]
fn create_uinput(config: &InjectorConfig) -> Result<Box<dyn InputInjector>> {
    Ok(Box::new(UinputInjector::new(&config.device_name)?))
}

#[cfg(not(all(target_os = "linux", feature = "uinput")))]
fn create_uinput(_config: &InjectorConfig) -> Result<Box<dyn InputInjector>> {
    Err(InjectorError::NotAvailable.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn injector_config(backend: InjectorBackend) -> InjectorConfig {
        InjectorConfig {
            backend,
            device_name: "handpad test keyboard".to_string(),
        }
    }

    #[test]
    fn test_log_backend() {
        let injector = create_injector(&injector_config(InjectorBackend::Log), false).unwrap();
        assert_eq!(injector.name(), "log");
    }

    #[test]
    fn test_dry_run_forces_log_backend() {
        let injector = create_injector(&injector_config(InjectorBackend::Uinput), true).unwrap();
        assert_eq!(injector.name(), "log");
    }

    #[cfg(not(all(target_os = "linux", feature = "uinput")))]
    #[test]
    fn test_uinput_unavailable_without_feature() {
        let result = create_injector(&injector_config(InjectorBackend::Uinput), false);
        assert!(matches!(
            result,
            Err(crate::error::HandpadError::Injector(InjectorError::NotAvailable))
        ));
    }
}
