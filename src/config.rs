use crate::debounce::{AmbiguousPolicy, DebounceMode, DebouncePolicy};
use crate::gesture::{Action, GestureProfile, Key, KeyBindings, ProfileKind};
use crate::landmarks::MirrorPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HandpadConfig {
    pub profile: ProfileConfig,
    pub mirror: MirrorPolicy,
    pub debounce: DebounceConfig,
    pub source: SourceConfig,
    pub injector: InjectorConfig,
    pub system: SystemConfig,

    /// Per-action key overrides, e.g. `GAS = ["right"]`
    #[serde(default)]
    pub bindings: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProfileConfig {
    /// Target game profile
    #[serde(default = "default_profile_kind")]
    pub kind: ProfileKind,

    /// Whether an ambiguous finger count releases held keys
    #[serde(default)]
    pub ambiguous_policy: AmbiguousPolicy,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DebounceConfig {
    /// "hold" or "tap"; unset uses the profile's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<DebounceMode>,

    /// Minimum time between taps in milliseconds (tap policy)
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,

    /// How long a tap holds its keys in milliseconds (tap policy)
    #[serde(default = "default_tap_duration_ms")]
    pub tap_duration_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Stdin,
    File,
    Command,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    /// Where landmark frames come from
    #[serde(default = "default_source_kind")]
    pub kind: SourceKind,

    /// Recorded JSON lines file for the file source
    #[serde(default = "default_source_path")]
    pub path: String,

    /// Detector helper program for the command source
    #[serde(default = "default_source_command")]
    pub command: String,

    /// Arguments for the detector helper
    #[serde(default = "default_source_args")]
    pub args: Vec<String>,

    /// Hands scored below this are dropped
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Malformed lines tolerated in a row before the source fails
    #[serde(default = "default_max_consecutive_errors")]
    pub max_consecutive_errors: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InjectorBackend {
    Log,
    Uinput,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InjectorConfig {
    /// Key injection backend
    #[serde(default = "default_injector_backend")]
    pub backend: InjectorBackend,

    /// Name of the uinput virtual keyboard
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SystemConfig {
    /// Seconds to wait before the first frame so the game window can be focused
    #[serde(default = "default_startup_delay")]
    pub startup_delay_seconds: u64,

    /// Log a status line every this many frames (0 disables)
    #[serde(default = "default_status_interval")]
    pub status_interval_frames: u64,

    /// Quit when 'q' or Esc is pressed in the terminal
    #[serde(default = "default_keyboard_quit")]
    pub keyboard_quit: bool,
}

impl HandpadConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("handpad.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            // Start with default values
            .set_default("profile.kind", default_profile_kind().as_str())?
            .set_default("profile.ambiguous_policy", "hold")?
            .set_default("mirror.flip_coordinates", false)?
            .set_default("mirror.swap_handedness", true)?
            .set_default("debounce.cooldown_ms", default_cooldown_ms() as i64)?
            .set_default("debounce.tap_duration_ms", default_tap_duration_ms() as i64)?
            .set_default("source.kind", "stdin")?
            .set_default("source.path", default_source_path())?
            .set_default("source.command", default_source_command())?
            .set_default("source.args", default_source_args())?
            .set_default("source.min_score", default_min_score() as f64)?
            .set_default(
                "source.max_consecutive_errors",
                default_max_consecutive_errors() as i64,
            )?
            .set_default("injector.backend", "log")?
            .set_default("injector.device_name", default_device_name())?
            .set_default(
                "system.startup_delay_seconds",
                default_startup_delay() as i64,
            )?
            .set_default(
                "system.status_interval_frames",
                default_status_interval() as i64,
            )?
            .set_default("system.keyboard_quit", default_keyboard_quit())?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables, e.g. HANDPAD_PROFILE__KIND=runner
            .add_source(
                Environment::with_prefix("HANDPAD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: HandpadConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debounce_mode() == DebounceMode::Tap {
            if self.debounce.cooldown_ms == 0 {
                return Err(ConfigError::Message(
                    "Debounce cooldown_ms must be greater than 0".to_string(),
                ));
            }

            if self.debounce.tap_duration_ms == 0 {
                return Err(ConfigError::Message(
                    "Debounce tap_duration_ms must be greater than 0".to_string(),
                ));
            }

            if self.debounce.tap_duration_ms >= self.debounce.cooldown_ms {
                return Err(ConfigError::Message(
                    "Debounce tap_duration_ms must be shorter than cooldown_ms".to_string(),
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.source.min_score) {
            return Err(ConfigError::Message(
                "Source min_score must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.source.max_consecutive_errors == 0 {
            return Err(ConfigError::Message(
                "Source max_consecutive_errors must be greater than 0".to_string(),
            ));
        }

        match self.source.kind {
            SourceKind::Command if self.source.command.trim().is_empty() => {
                return Err(ConfigError::Message(
                    "Source command must not be empty for the command source".to_string(),
                ));
            }
            SourceKind::File if self.source.path.trim().is_empty() => {
                return Err(ConfigError::Message(
                    "Source path must not be empty for the file source".to_string(),
                ));
            }
            _ => {}
        }

        self.key_bindings()?;

        Ok(())
    }

    /// Profile defaults merged with the `[bindings]` overrides
    pub fn key_bindings(&self) -> Result<KeyBindings, ConfigError> {
        let kind = self.profile.kind;
        let mut bindings = kind.default_bindings();

        for (name, key_names) in &self.bindings {
            let action = Action::from_name(name)
                .ok_or_else(|| ConfigError::Message(format!("Unknown action in bindings: {}", name)))?;

            if !action.is_actionable() || !kind.vocabulary().contains(&action) {
                return Err(ConfigError::Message(format!(
                    "Action {} cannot be bound in the {} profile",
                    action,
                    kind.as_str()
                )));
            }

            let keys = key_names
                .iter()
                .map(|key_name| {
                    Key::from_name(key_name).ok_or_else(|| {
                        ConfigError::Message(format!(
                            "Unknown key '{}' bound to {}",
                            key_name, action
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            bindings.bind(action, keys);
        }

        Ok(bindings)
    }

    /// Configured debounce mode, falling back to the profile default
    pub fn debounce_mode(&self) -> DebounceMode {
        self.debounce
            .policy
            .unwrap_or_else(|| self.profile.kind.default_mode())
    }

    /// Build the gesture profile the engine runs with
    pub fn gesture_profile(&self) -> Result<GestureProfile, ConfigError> {
        let kind = self.profile.kind;
        Ok(GestureProfile {
            kind,
            bindings: self.key_bindings()?,
            policy: DebouncePolicy::from_mode(
                self.debounce_mode(),
                Duration::from_millis(self.debounce.cooldown_ms),
                Duration::from_millis(self.debounce.tap_duration_ms),
            ),
            ambiguous: self.profile.ambiguous_policy,
        })
    }

    /// Default configuration rendered as TOML
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }
}

impl Default for HandpadConfig {
    fn default() -> Self {
        Self {
            profile: ProfileConfig {
                kind: default_profile_kind(),
                ambiguous_policy: AmbiguousPolicy::default(),
            },
            mirror: MirrorPolicy::default(),
            debounce: DebounceConfig {
                policy: None,
                cooldown_ms: default_cooldown_ms(),
                tap_duration_ms: default_tap_duration_ms(),
            },
            source: SourceConfig {
                kind: default_source_kind(),
                path: default_source_path(),
                command: default_source_command(),
                args: default_source_args(),
                min_score: default_min_score(),
                max_consecutive_errors: default_max_consecutive_errors(),
            },
            injector: InjectorConfig {
                backend: default_injector_backend(),
                device_name: default_device_name(),
            },
            system: SystemConfig {
                startup_delay_seconds: default_startup_delay(),
                status_interval_frames: default_status_interval(),
                keyboard_quit: default_keyboard_quit(),
            },
            bindings: BTreeMap::new(),
        }
    }
}

// Default value functions
fn default_profile_kind() -> ProfileKind {
    ProfileKind::Driving
}

fn default_cooldown_ms() -> u64 {
    200
}
fn default_tap_duration_ms() -> u64 {
    50
}

fn default_source_kind() -> SourceKind {
    SourceKind::Stdin
}
fn default_source_path() -> String {
    "landmarks.jsonl".to_string()
}
fn default_source_command() -> String {
    "python3".to_string()
}
fn default_source_args() -> Vec<String> {
    vec!["hand_detect.py".to_string()]
}
fn default_min_score() -> f32 {
    0.7
}
fn default_max_consecutive_errors() -> u32 {
    5
}

fn default_injector_backend() -> InjectorBackend {
    InjectorBackend::Log
}
fn default_device_name() -> String {
    "handpad virtual keyboard".to_string()
}

fn default_startup_delay() -> u64 {
    5
}
fn default_status_interval() -> u64 {
    60
}
fn default_keyboard_quit() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = HandpadConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.profile.kind, ProfileKind::Driving);
        assert_eq!(config.debounce.cooldown_ms, 200);
        assert_eq!(config.debounce.tap_duration_ms, 50);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[profile]
kind = "runner"

[debounce]
cooldown_ms = 300

[source]
kind = "file"
path = "capture.jsonl"

[bindings]
JUMP = ["up", "right"]
"#
        )
        .unwrap();

        let config = HandpadConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.profile.kind, ProfileKind::Runner);
        assert_eq!(config.profile.ambiguous_policy, AmbiguousPolicy::Hold);
        assert_eq!(config.debounce.cooldown_ms, 300);
        assert_eq!(config.debounce.tap_duration_ms, 50);
        assert_eq!(config.source.kind, SourceKind::File);
        assert_eq!(config.source.path, "capture.jsonl");
        assert!(config.mirror.swap_handedness);

        let bindings = config.key_bindings().unwrap();
        assert_eq!(bindings.keys_for(Action::Jump), &[Key::Up, Key::Right]);
        assert_eq!(bindings.keys_for(Action::Slide), &[Key::Down]);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HandpadConfig::load_from_file(dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.source.kind, SourceKind::Stdin);
        assert_eq!(config.injector.backend, InjectorBackend::Log);
        assert_eq!(config.system.status_interval_frames, 60);
    }

    #[test]
    fn test_config_validation() {
        let mut config = HandpadConfig::default();
        config.profile.kind = ProfileKind::Runner;
        config.debounce.tap_duration_ms = 250;

        // Tap longer than the cooldown
        assert!(config.validate().is_err());

        config.debounce.tap_duration_ms = 50;
        assert!(config.validate().is_ok());

        config.source.min_score = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_hold_profile_ignores_tap_timings() {
        let mut config = HandpadConfig::default();
        config.debounce.cooldown_ms = 0;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bindings_outside_vocabulary_rejected() {
        let mut config = HandpadConfig::default();
        config
            .bindings
            .insert("JUMP".to_string(), vec!["up".to_string()]);
        assert!(config.validate().is_err());

        config.bindings.clear();
        config
            .bindings
            .insert("GAS".to_string(), vec!["space".to_string()]);
        assert!(config.validate().is_err());

        config.bindings.clear();
        config
            .bindings
            .insert("IDLE".to_string(), vec!["up".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gesture_profile_from_config() {
        let mut config = HandpadConfig::default();
        config.profile.kind = ProfileKind::Runner;

        let profile = config.gesture_profile().unwrap();
        assert_eq!(
            profile.policy,
            DebouncePolicy::Tap {
                cooldown: Duration::from_millis(200),
                tap_duration: Duration::from_millis(50),
            }
        );
    }

    #[test]
    fn test_debounce_policy_override() {
        let mut config = HandpadConfig::default();
        assert_eq!(config.debounce_mode(), DebounceMode::Hold);

        config.debounce.policy = Some(DebounceMode::Tap);
        assert_eq!(
            config.gesture_profile().unwrap().policy,
            DebouncePolicy::Tap {
                cooldown: Duration::from_millis(200),
                tap_duration: Duration::from_millis(50),
            }
        );

        // Tap timings are checked whenever the tap policy is in effect
        config.debounce.cooldown_ms = 0;
        assert!(config.validate().is_err());

        config.profile.kind = ProfileKind::Runner;
        config.debounce.policy = Some(DebounceMode::Hold);
        assert!(config.validate().is_ok());
        assert_eq!(config.gesture_profile().unwrap().policy, DebouncePolicy::Hold);
    }

    #[test]
    fn test_debounce_policy_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[debounce]
policy = "tap"
"#
        )
        .unwrap();

        let config = HandpadConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.profile.kind, ProfileKind::Driving);
        assert_eq!(config.debounce.policy, Some(DebounceMode::Tap));
        assert_eq!(config.debounce_mode(), DebounceMode::Tap);
    }

    #[test]
    fn test_default_toml_parses_back() {
        let rendered = HandpadConfig::default_toml().unwrap();
        let parsed: HandpadConfig = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed.profile.kind, ProfileKind::Driving);
        assert_eq!(parsed.source.args, vec!["hand_detect.py".to_string()]);
    }
}
