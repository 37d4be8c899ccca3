//! Scanner configuration, loaded from TOML. Every field has a default, so a partial file
//! (or none at all) is valid.

use anyhow::{ensure, Context, Result};
use door_inference::DetectorConfig;
use door_motion::protocol::MAX_VELOCITY;
use door_motion::MotionTiming;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub serial: SerialConfig,
    pub navigation: NavigationConfig,
    pub detector: DetectorConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Raspberry Pi GPIO UART by default
    pub port: String,
    /// 115200 for Roomba 5xx, 57600 for 3xx
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyAMA0".to_string(),
            baud_rate: 115_200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// mm/s
    pub velocity: i16,
    /// Degrees per turn
    pub angle_steps: i16,
    /// mm per advance
    pub distance_steps: i16,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            velocity: 20,
            angle_steps: 10,
            distance_steps: 150,
        }
    }
}

/// Delays in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    pub settle: f64,
    pub correction_settle: f64,
    pub start_delay: f64,
    pub control_delay: f64,
    pub stop_delay: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle: 1.0,
            correction_settle: 2.0,
            start_delay: 1.0,
            control_delay: 2.0,
            stop_delay: 0.2,
        }
    }
}

impl TimingConfig {
    pub fn motion_timing(&self) -> MotionTiming {
        MotionTiming {
            settle: Duration::from_secs_f64(self.settle),
            correction_settle: Duration::from_secs_f64(self.correction_settle),
            start_delay: Duration::from_secs_f64(self.start_delay),
            control_delay: Duration::from_secs_f64(self.control_delay),
            stop_delay: Duration::from_secs_f64(self.stop_delay),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from a TOML file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: ScannerConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let nav = &self.navigation;
        ensure!(
            nav.velocity > 0 && nav.velocity <= MAX_VELOCITY,
            "navigation.velocity must be in 1..={MAX_VELOCITY} mm/s, got {}",
            nav.velocity
        );
        ensure!(nav.angle_steps > 0, "navigation.angle_steps must be positive");
        ensure!(
            nav.angle_steps.checked_mul(2).is_some(),
            "navigation.angle_steps is too large to double"
        );
        ensure!(nav.distance_steps > 0, "navigation.distance_steps must be positive");

        let detector = &self.detector;
        ensure!(
            (0.0..1.0).contains(&detector.threshold),
            "detector.threshold must be in [0, 1), got {}",
            detector.threshold
        );
        ensure!(
            detector.input_width > 0 && detector.input_height > 0,
            "detector input size must be non-zero"
        );
        ensure!(detector.intra_threads > 0, "detector.intra_threads must be positive");

        let t = &self.timing;
        for (name, secs) in [
            ("settle", t.settle),
            ("correction_settle", t.correction_settle),
            ("start_delay", t.start_delay),
            ("control_delay", t.control_delay),
            ("stop_delay", t.stop_delay),
        ] {
            ensure!(
                secs.is_finite() && secs >= 0.0,
                "timing.{name} must be a non-negative number of seconds, got {secs}"
            );
        }

        ensure!(self.serial.baud_rate > 0, "serial.baud_rate must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use door_inference::TensorLayout;

    #[test]
    fn stock_defaults_validate() -> Result<()> {
        let config = ScannerConfig::default();
        config.validate()?;

        assert_eq!(config.navigation, NavigationConfig { velocity: 20, angle_steps: 10, distance_steps: 150 });
        assert_eq!(config.detector.threshold, 0.70);
        assert_eq!(config.serial.port, "/dev/ttyAMA0");
        assert_eq!(config.serial.baud_rate, 115_200);
        assert_eq!(config.timing.motion_timing(), MotionTiming::default());
        Ok(())
    }

    #[test]
    fn partial_toml_keeps_defaults() -> Result<()> {
        let config: ScannerConfig = toml::from_str(
            r#"
            [serial]
            baud_rate = 57600

            [navigation]
            angle_steps = 15

            [detector]
            layout = "nchw"
            "#,
        )?;
        config.validate()?;

        assert_eq!(config.serial.baud_rate, 57_600);
        assert_eq!(config.serial.port, "/dev/ttyAMA0");
        assert_eq!(config.navigation.angle_steps, 15);
        assert_eq!(config.navigation.velocity, 20);
        assert_eq!(config.detector.layout, TensorLayout::Nchw);
        assert_eq!(config.detector.input_width, 28);
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = ScannerConfig::default();
        config.navigation.velocity = 0;
        assert!(config.validate().is_err());

        let mut config = ScannerConfig::default();
        config.navigation.velocity = 501;
        assert!(config.validate().is_err());

        let mut config = ScannerConfig::default();
        config.detector.threshold = 1.0;
        assert!(config.validate().is_err());

        let mut config = ScannerConfig::default();
        config.timing.settle = -1.0;
        assert!(config.validate().is_err());

        let mut config = ScannerConfig::default();
        config.navigation.angle_steps = i16::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ScannerConfig::load("/nonexistent/door-scanner.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
