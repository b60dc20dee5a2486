//! Host Settings
//!
//! Loaded from an optional TOML file, then overridden by `IRRIGATION_*`
//! environment variables (nested keys use `__`, e.g.
//! `IRRIGATION_SERIAL__DEVICE=/dev/ttyACM0`).

use crate::error::HostError;
use config::{Config, Environment, File};
use controller::ControllerConfig;
use serde::Deserialize;
use std::time::Duration;

/// Serial link settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Serial port device path (e.g., "/dev/ttyUSB0" or "COM3")
    pub device: String,
    pub baud_rate: u32,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            device: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
        }
    }
}

/// Everything the host binary needs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Max tracing level ("error" through "trace")
    pub log_level: String,
    /// Control loop period in milliseconds
    pub tick_ms: u64,
    /// Simulated sensor readings go stale after this many milliseconds
    pub sensor_max_age_ms: u64,
    pub serial: SerialSettings,
    pub controller: ControllerConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            tick_ms: 10,
            sensor_max_age_ms: 5_000,
            serial: SerialSettings::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from `path` (if given) and the environment
    pub fn load(path: Option<&str>) -> Result<Self, HostError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix("IRRIGATION")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    pub fn sensor_max_age(&self) -> Duration {
        Duration::from_millis(self.sensor_max_age_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.tick(), Duration::from_millis(10));
        assert_eq!(settings.serial.baud_rate, 115_200);
        assert_eq!(settings.controller, ControllerConfig::default());
    }

    #[test]
    fn test_file_overrides() {
        let path = std::env::temp_dir().join(format!("irrigation-settings-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "tick_ms = 25\n[serial]\ndevice = \"/dev/ttyACM0\"\n[controller]\nliveness_timeout_ms = 3000"
        )
        .unwrap();

        let settings = Settings::load(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.tick_ms, 25);
        assert_eq!(settings.serial.device, "/dev/ttyACM0");
        assert_eq!(settings.serial.baud_rate, 115_200);
        assert_eq!(settings.controller.liveness_timeout_ms, 3000);
        assert_eq!(settings.controller.reboot_delay_ms, 100);
    }
}
