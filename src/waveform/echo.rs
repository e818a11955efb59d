//! Point-target echo simulation.
//!
//! A target at range `R` returns the transmit chirp delayed by the round
//! trip `tau = 2R/c` and scaled by the two-way radar equation:
//!
//! ```text
//! A_rx = sqrt(rcs) * lambda^2 / ((4*pi)^1.5 * R^2)
//! rx(t) = A_rx * cos(phi(t - tau))
//! ```
//!
//! Velocity is carried on [`Target`] but produces no Doppler shift.

use log::warn;
use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{RadarError, Result};
use crate::radar_config::C;
use crate::waveform::chirp::{ChirpWaveform, WaveformGenerator};

/// Zero-range targets are moved out to this distance (m).
pub const MIN_TARGET_RANGE_M: f64 = 0.01;

/// A point scatterer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Target {
    pub name: Option<String>,
    pub range_m: f64,
    /// Radar cross-section (m^2)
    pub rcs: f64,
    /// Accepted for completeness; Doppler is not modelled.
    pub velocity_mps: f64,
}

impl Target {
    pub fn new(range_m: f64, rcs: f64) -> Self {
        Self { name: None, range_m, rcs, velocity_mps: 0.0 }
    }

    pub fn named(name: &str, range_m: f64, rcs: f64) -> Self {
        Self { name: Some(name.to_string()), range_m, rcs, velocity_mps: 0.0 }
    }

    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("target@{:.1}m", self.range_m),
        }
    }
}

/// Transmit chirp and the matching received signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Echo {
    pub time: Vec<f64>,
    pub tx: Vec<f64>,
    pub rx: Vec<f64>,
}

/// Builds delayed, attenuated echoes of the generator's chirp.
pub struct TargetEchoModel<'a> {
    generator: &'a WaveformGenerator,
}

impl<'a> TargetEchoModel<'a> {
    pub fn new(generator: &'a WaveformGenerator) -> Self {
        Self { generator }
    }

    /// Validate the target and return the range actually simulated.
    fn effective_range(&self, target: &Target) -> Result<f64> {
        if !target.range_m.is_finite() || target.range_m < 0.0 {
            return Err(RadarError::DegenerateRange(target.range_m));
        }
        if !target.rcs.is_finite() || target.rcs < 0.0 {
            return Err(RadarError::InvalidRcs(target.rcs));
        }
        if target.range_m == 0.0 {
            warn!(
                "{} at zero range; clamping to {} m",
                target.label(),
                MIN_TARGET_RANGE_M
            );
            return Ok(MIN_TARGET_RANGE_M);
        }
        Ok(target.range_m)
    }

    /// Two-way radar-equation amplitude for a target at `range_m`.
    pub fn rx_amplitude(&self, range_m: f64, rcs: f64) -> f64 {
        let wavelength = self.generator.config().wavelength();
        rcs.sqrt() * wavelength.powi(2) / ((4.0 * PI).powf(1.5) * range_m.powi(2))
    }

    /// Received signal for one target against an already generated chirp.
    pub fn echo_for(&self, waveform: &ChirpWaveform, target: &Target) -> Result<Vec<f64>> {
        let range_m = self.effective_range(target)?;
        let tau = 2.0 * range_m / C;
        let amplitude = self.rx_amplitude(range_m, target.rcs);

        Ok(waveform
            .time
            .iter()
            .map(|&t| amplitude * self.generator.phase_at(t - tau).cos())
            .collect())
    }

    /// Complex received signal `A_rx * exp(j*phi(t - tau))`.
    pub fn analytic_echo(
        &self,
        waveform: &ChirpWaveform,
        target: &Target,
    ) -> Result<Vec<Complex64>> {
        let range_m = self.effective_range(target)?;
        let tau = 2.0 * range_m / C;
        let amplitude = self.rx_amplitude(range_m, target.rcs);

        Ok(waveform
            .time
            .iter()
            .map(|&t| Complex64::from_polar(amplitude, self.generator.phase_at(t - tau)))
            .collect())
    }

    /// Generate the transmit chirp and the echo from a single target.
    pub fn simulate_target(&self, target: &Target) -> Result<Echo> {
        let waveform = self.generator.generate_chirp();
        let rx = self.echo_for(&waveform, target)?;
        Ok(Echo { time: waveform.time, tx: waveform.signal, rx })
    }

    /// Echo of a whole scene: per-target echoes summed sample by sample.
    pub fn simulate_targets(&self, targets: &[Target]) -> Result<Echo> {
        let waveform = self.generator.generate_chirp();
        let echoes = targets
            .iter()
            .map(|target| self.echo_for(&waveform, target))
            .collect::<Result<Vec<_>>>()?;
        let rx = superpose(waveform.len(), &echoes)?;
        Ok(Echo { time: waveform.time, tx: waveform.signal, rx })
    }
}

/// Elementwise sum of equal-length echoes. No echoes gives silence.
pub fn superpose(len: usize, echoes: &[Vec<f64>]) -> Result<Vec<f64>> {
    let mut total = vec![0.0; len];
    for echo in echoes {
        if echo.len() != len {
            return Err(RadarError::LengthMismatch { expected: len, actual: echo.len() });
        }
        for (acc, s) in total.iter_mut().zip(echo) {
            *acc += s;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChirpSettings;
    use crate::radar_config::ChirpConfig;
    use approx::assert_relative_eq;

    fn generator() -> WaveformGenerator {
        WaveformGenerator::new(ChirpConfig::new(ChirpSettings::default()).unwrap())
    }

    fn peak_abs(signal: &[f64]) -> f64 {
        signal.iter().fold(0.0f64, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_simulate_target_shapes() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        let echo = model.simulate_target(&Target::new(50.0, 0.1)).unwrap();
        assert_eq!(echo.time.len(), 256);
        assert_eq!(echo.tx.len(), 256);
        assert_eq!(echo.rx.len(), 256);
        assert!(peak_abs(&echo.tx) <= 1.0);
        assert!(peak_abs(&echo.rx) < peak_abs(&echo.tx));
    }

    #[test]
    fn test_echo_uses_delayed_phase_law() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        let target = Target::new(50.0, 1.0);
        let echo = model.simulate_target(&target).unwrap();
        let tau = 2.0 * 50.0 / C;
        let amplitude = model.rx_amplitude(50.0, 1.0);
        for i in [0usize, 17, 128, 255] {
            let expected = amplitude * gen.phase_at(echo.time[i] - tau).cos();
            assert_relative_eq!(echo.rx[i], expected, epsilon = 1e-24, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_radar_equation_amplitude() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        let expected = 0.1f64.sqrt() * 0.0125f64.powi(2) / ((4.0 * PI).powf(1.5) * 2500.0);
        assert_relative_eq!(model.rx_amplitude(50.0, 0.1), expected, max_relative = 1e-12);
        // Inverse-square in range
        assert_relative_eq!(
            model.rx_amplitude(25.0, 0.1) / model.rx_amplitude(50.0, 0.1),
            4.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_larger_rcs_gives_stronger_echo() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        let mut previous = 0.0;
        for rcs in [0.001, 0.01, 0.1, 1.0, 100.0] {
            let echo = model.simulate_target(&Target::new(50.0, rcs)).unwrap();
            let peak = peak_abs(&echo.rx);
            assert!(peak > previous, "rcs {} gave {} <= {}", rcs, peak, previous);
            previous = peak;
        }
    }

    #[test]
    fn test_velocity_has_no_effect() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        let still = model.simulate_target(&Target::new(40.0, 0.5)).unwrap();
        let moving = Target { velocity_mps: 30.0, ..Target::new(40.0, 0.5) };
        assert_eq!(model.simulate_target(&moving).unwrap(), still);
    }

    #[test]
    fn test_zero_range_is_clamped() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        let echo = model.simulate_target(&Target::new(0.0, 0.1)).unwrap();
        let clamped = model.simulate_target(&Target::new(MIN_TARGET_RANGE_M, 0.1)).unwrap();
        assert_eq!(echo.rx.len(), echo.tx.len());
        assert!(echo.rx.iter().all(|s| s.is_finite()));
        assert_eq!(echo, clamped);
    }

    #[test]
    fn test_negative_range_rejected() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        assert!(matches!(
            model.simulate_target(&Target::new(-1.0, 0.1)),
            Err(RadarError::DegenerateRange(_))
        ));
        assert!(matches!(
            model.simulate_target(&Target::new(f64::NAN, 0.1)),
            Err(RadarError::DegenerateRange(_))
        ));
        // A rejected call leaves the model usable
        assert!(model.simulate_target(&Target::new(10.0, 0.1)).is_ok());
    }

    #[test]
    fn test_negative_rcs_rejected() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        assert!(matches!(
            model.simulate_target(&Target::new(10.0, -0.1)),
            Err(RadarError::InvalidRcs(_))
        ));
    }

    #[test]
    fn test_superposition_sums_echoes() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        let targets = [Target::new(30.0, 0.05), Target::new(50.0, 0.1), Target::new(70.0, 0.08)];
        let scene = model.simulate_targets(&targets).unwrap();
        let waveform = gen.generate_chirp();
        let parts: Vec<Vec<f64>> = targets
            .iter()
            .map(|t| model.echo_for(&waveform, t).unwrap())
            .collect();
        for i in 0..scene.rx.len() {
            let sum: f64 = parts.iter().map(|p| p[i]).sum();
            assert_relative_eq!(scene.rx[i], sum, epsilon = 1e-24);
        }
        assert_eq!(scene.tx, waveform.signal);
    }

    #[test]
    fn test_empty_scene_is_silent() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        let scene = model.simulate_targets(&[]).unwrap();
        assert_eq!(scene.rx, vec![0.0; 256]);
    }

    #[test]
    fn test_superpose_rejects_ragged_input() {
        let echoes = vec![vec![1.0; 4], vec![1.0; 3]];
        assert!(matches!(
            superpose(4, &echoes),
            Err(RadarError::LengthMismatch { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_analytic_echo_real_part_matches() {
        let gen = generator();
        let model = TargetEchoModel::new(&gen);
        let waveform = gen.generate_chirp();
        let target = Target::new(20.0, 0.5);
        let real = model.echo_for(&waveform, &target).unwrap();
        let analytic = model.analytic_echo(&waveform, &target).unwrap();
        for (z, r) in analytic.iter().zip(&real) {
            assert_relative_eq!(z.re, *r, epsilon = 1e-20, max_relative = 1e-9);
        }
    }
}
