//! Startup configuration
//!
//! Defaults reproduce the stock piHome wiring (MQ-135 on BCM 19, PIR on
//! BCM 20, DHT disabled). Values are layered: compiled defaults, then an
//! optional JSON file named by `PIHOME_CONFIG`, then `PIHOME_*` environment
//! variables. [`Config::validate`] runs once before any hardware is touched.

use std::collections::HashSet;
use std::fs;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Highest BCM GPIO number exposed on the 40-pin header.
pub const MAX_BCM_PIN: u8 = 27;

/// The DHT frame needs 83 level changes to clock out all 40 data bits.
pub const MIN_DHT_TIMINGS: u32 = 83;
pub const MAX_DHT_TIMINGS: u32 = 1000;

/// Largest still the HQ camera sensor produces.
pub const MAX_CAMERA_WIDTH: u32 = 4056;
pub const MAX_CAMERA_HEIGHT: u32 = 3040;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sensors: SensorConfig,
    pub polling: PollingConfig,
    pub display: DisplayConfig,
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub gas_pin: u8,
    /// MQ-135 breakouts pull DO low once the threshold is crossed.
    pub gas_active_low: bool,
    pub motion_pin: u8,
    pub motion_active_low: bool,
    /// `None` leaves the DHT11/DHT22 sensor out of the registry.
    pub temp_humidity_pin: Option<u8>,
    pub temp_humidity_max_timings: u32,
    pub camera: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub interval_ms: u32,
    /// Poll sensors on a worker thread and render from snapshots.
    pub background: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Fixed logical size; `None` probes the native video mode.
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub scale: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub program: String,
    pub width: u32,
    pub height: u32,
    pub timeout_ms: u32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            gas_pin: 19,
            gas_active_low: true,
            motion_pin: 20,
            motion_active_low: false,
            temp_humidity_pin: None,
            temp_humidity_max_timings: 85,
            camera: true,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            background: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: 1,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            program: "rpicam-still".to_string(),
            width: 320,
            height: 240,
            timeout_ms: 1000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sensors: SensorConfig::default(),
            polling: PollingConfig::default(),
            display: DisplayConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl Config {
    /// Load the layered configuration and validate it.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("PIHOME_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file. Missing sections keep their defaults.
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Apply `PIHOME_*` overrides read through `lookup`.
    ///
    /// `PIHOME_TEMP_HUMIDITY_PIN=off` removes a pin set by the file.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = env_value(&lookup, "PIHOME_GAS_PIN")? {
            self.sensors.gas_pin = v;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_GAS_ACTIVE_LOW")? {
            self.sensors.gas_active_low = v;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_MOTION_PIN")? {
            self.sensors.motion_pin = v;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_MOTION_ACTIVE_LOW")? {
            self.sensors.motion_active_low = v;
        }
        if let Some(raw) = lookup("PIHOME_TEMP_HUMIDITY_PIN") {
            self.sensors.temp_humidity_pin = match raw.trim() {
                "" | "off" | "none" => None,
                value => Some(parse_env("PIHOME_TEMP_HUMIDITY_PIN", value)?),
            };
        }
        if let Some(v) = env_value(&lookup, "PIHOME_TEMP_HUMIDITY_MAX_TIMINGS")? {
            self.sensors.temp_humidity_max_timings = v;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_CAMERA")? {
            self.sensors.camera = v;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_POLL_INTERVAL_MS")? {
            self.polling.interval_ms = v;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_BACKGROUND_POLLING")? {
            self.polling.background = v;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_DISPLAY_WIDTH")? {
            self.display.width = Some(v);
        }
        if let Some(v) = env_value(&lookup, "PIHOME_DISPLAY_HEIGHT")? {
            self.display.height = Some(v);
        }
        if let Some(v) = env_value(&lookup, "PIHOME_DISPLAY_SCALE")? {
            self.display.scale = v;
        }
        if let Some(program) = lookup("PIHOME_CAMERA_PROGRAM") {
            self.camera.program = program;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_CAMERA_WIDTH")? {
            self.camera.width = v;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_CAMERA_HEIGHT")? {
            self.camera.height = v;
        }
        if let Some(v) = env_value(&lookup, "PIHOME_CAMERA_TIMEOUT_MS")? {
            self.camera.timeout_ms = v;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sensors = &self.sensors;
        let mut pins = HashSet::new();

        let mut check_pin = |field: &'static str, pin: u8| {
            if pin > MAX_BCM_PIN {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("BCM pin {pin} is outside 0..={MAX_BCM_PIN}"),
                });
            }
            if !pins.insert(pin) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("BCM pin {pin} is already assigned to another sensor"),
                });
            }
            Ok(())
        };

        check_pin("sensors.gas_pin", sensors.gas_pin)?;
        check_pin("sensors.motion_pin", sensors.motion_pin)?;
        if let Some(pin) = sensors.temp_humidity_pin {
            check_pin("sensors.temp_humidity_pin", pin)?;
        }

        if !(MIN_DHT_TIMINGS..=MAX_DHT_TIMINGS).contains(&sensors.temp_humidity_max_timings) {
            return Err(ConfigError::Invalid {
                field: "sensors.temp_humidity_max_timings",
                reason: format!(
                    "{} is outside {MIN_DHT_TIMINGS}..={MAX_DHT_TIMINGS}",
                    sensors.temp_humidity_max_timings
                ),
            });
        }

        if !(1..=10_000).contains(&self.polling.interval_ms) {
            return Err(ConfigError::Invalid {
                field: "polling.interval_ms",
                reason: format!("{} is outside 1..=10000", self.polling.interval_ms),
            });
        }

        if self.display.width.is_some() != self.display.height.is_some() {
            return Err(ConfigError::Invalid {
                field: "display",
                reason: "width and height must be set together".to_string(),
            });
        }
        if matches!(self.display.width, Some(0)) || matches!(self.display.height, Some(0)) {
            return Err(ConfigError::Invalid {
                field: "display",
                reason: "size must be non-zero".to_string(),
            });
        }
        if !(1..=8).contains(&self.display.scale) {
            return Err(ConfigError::Invalid {
                field: "display.scale",
                reason: format!("{} is outside 1..=8", self.display.scale),
            });
        }

        let camera = &self.camera;
        if camera.width == 0
            || camera.height == 0
            || camera.width > MAX_CAMERA_WIDTH
            || camera.height > MAX_CAMERA_HEIGHT
        {
            return Err(ConfigError::Invalid {
                field: "camera",
                reason: format!(
                    "{}x{} is not a valid still size (max {MAX_CAMERA_WIDTH}x{MAX_CAMERA_HEIGHT})",
                    camera.width, camera.height
                ),
            });
        }
        if sensors.camera && camera.program.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "camera.program",
                reason: "must name the capture program".to_string(),
            });
        }

        Ok(())
    }
}

fn env_value<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name)
        .map(|raw| parse_env(name, raw.trim()))
        .transpose()
}

fn parse_env<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_match_stock_wiring() {
        let config = Config::default();
        assert_eq!(config.sensors.gas_pin, 19);
        assert_eq!(config.sensors.motion_pin, 20);
        assert_eq!(config.sensors.temp_humidity_pin, None);
        assert_eq!(config.sensors.temp_humidity_max_timings, 85);
        assert_eq!(config.polling.interval_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn duplicate_pins_are_rejected() {
        let mut config = Config::default();
        config.sensors.motion_pin = config.sensors.gas_pin;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "sensors.motion_pin",
                ..
            }
        ));
    }

    #[test]
    fn out_of_range_pin_is_rejected() {
        let mut config = Config::default();
        config.sensors.temp_humidity_pin = Some(40);
        assert!(config.validate().is_err());
    }

    #[test]
    fn too_few_dht_timings_are_rejected() {
        let mut config = Config::default();
        config.sensors.temp_humidity_max_timings = 40;
        assert!(config.validate().is_err());
    }

    #[test]
    fn half_specified_display_size_is_rejected() {
        let mut config = Config::default();
        config.display.width = Some(800);
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = Config::default();
        config
            .apply_env(lookup_from(&[
                ("PIHOME_GAS_PIN", "5"),
                ("PIHOME_TEMP_HUMIDITY_PIN", "4"),
                ("PIHOME_BACKGROUND_POLLING", "true"),
                ("PIHOME_CAMERA_PROGRAM", "libcamera-still"),
            ]))
            .unwrap();

        assert_eq!(config.sensors.gas_pin, 5);
        assert_eq!(config.sensors.temp_humidity_pin, Some(4));
        assert!(config.polling.background);
        assert_eq!(config.camera.program, "libcamera-still");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn env_can_disable_temp_humidity() {
        let mut config = Config::default();
        config.sensors.temp_humidity_pin = Some(4);
        config
            .apply_env(lookup_from(&[("PIHOME_TEMP_HUMIDITY_PIN", "off")]))
            .unwrap();
        assert_eq!(config.sensors.temp_humidity_pin, None);
    }

    #[test]
    fn malformed_env_value_is_an_error() {
        let mut config = Config::default();
        let err = config
            .apply_env(lookup_from(&[("PIHOME_MOTION_PIN", "twenty")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                name: "PIHOME_MOTION_PIN",
                ..
            }
        ));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{ "sensors": { "motion_pin": 21 } }"#).unwrap();
        assert_eq!(config.sensors.motion_pin, 21);
        assert_eq!(config.sensors.gas_pin, 19);
        assert_eq!(config.camera.width, 320);
    }
}
