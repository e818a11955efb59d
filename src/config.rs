use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::dsp::window::WindowKind;
use crate::error::{RadarError, Result};
use crate::waveform::echo::Target;

/// Raw chirp parameters as they appear in a scenario file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChirpSettings {
    pub f_start_hz: f64,
    pub bandwidth_hz: f64,
    pub chirp_duration_s: f64,
    pub sample_rate_hz: f64,
}

impl Default for ChirpSettings {
    /// 24 GHz ISM-band chirp: 250 MHz over 256 µs, sampled at 1 MHz.
    fn default() -> Self {
        Self {
            f_start_hz: 24.0e9,
            bandwidth_hz: 250.0e6,
            chirp_duration_s: 256.0e-6,
            sample_rate_hz: 1.0e6,
        }
    }
}

fn default_snr_db() -> f64 {
    20.0
}

fn default_max_peaks() -> usize {
    10
}

/// Detection settings: window applied before the range FFT, margin above the
/// estimated noise floor, and cap on returned candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default)]
    pub window: WindowKind,
    #[serde(default = "default_snr_db")]
    pub snr_db: f64,
    #[serde(default = "default_max_peaks")]
    pub max_peaks: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window: WindowKind::default(),
            snr_db: default_snr_db(),
            max_peaks: default_max_peaks(),
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.snr_db.is_finite() {
            let msg = format!("snr_db must be finite, got {}", self.snr_db);
            return Err(RadarError::InvalidDetection(msg));
        }
        if self.max_peaks == 0 {
            return Err(RadarError::InvalidDetection("max_peaks must be at least 1".into()));
        }
        Ok(())
    }
}

/// One target entry of a scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub range_m: f64,
    pub rcs: f64,
    #[serde(default)]
    pub velocity_mps: f64,
}

impl From<&TargetSpec> for Target {
    fn from(spec: &TargetSpec) -> Self {
        Target {
            name: spec.name.clone(),
            range_m: spec.range_m,
            rcs: spec.rcs,
            velocity_mps: spec.velocity_mps,
        }
    }
}

/// A complete simulation scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub chirp: ChirpSettings,
    pub targets: Vec<TargetSpec>,
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub noise_std: f64,
}

impl Default for Scenario {
    fn default() -> Self {
        let target = |name: &str, range_m: f64, rcs: f64| TargetSpec {
            name: Some(name.to_string()),
            range_m,
            rcs,
            velocity_mps: 0.0,
        };
        Self {
            chirp: ChirpSettings::default(),
            targets: vec![
                target("drone (near)", 30.0, 0.08),
                target("drone (mid)", 50.0, 0.12),
                target("drone (far)", 70.0, 0.08),
            ],
            // Only the near drone clears a 20 dB margin
            detection: DetectionConfig { snr_db: 15.0, ..Default::default() },
            noise_std: 0.0,
        }
    }
}

impl Scenario {
    /// Read and validate a JSON scenario file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(text)?;
        scenario.detection.validate()?;
        if !scenario.noise_std.is_finite() || scenario.noise_std < 0.0 {
            return Err(RadarError::InvalidNoise(scenario.noise_std));
        }
        Ok(scenario)
    }

    pub fn targets(&self) -> Vec<Target> {
        self.targets.iter().map(Target::from).collect()
    }
}
