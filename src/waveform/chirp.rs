//! Linear FMCW chirp synthesis.
//!
//! The transmitted sweep starts at `f_start` and ramps linearly to
//! `f_start + B` over the chirp duration `T`:
//!
//! ```text
//! f(t)   = f_start + k*t                      k = B / T
//! phi(t) = 2*pi * (f_start*t + 0.5*k*t^2)
//! s(t)   = cos(phi(t))
//! ```

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::radar_config::ChirpConfig;

/// One sampled transmit chirp. Produced fresh by [`WaveformGenerator::generate_chirp`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChirpWaveform {
    /// Sample instants spanning `[0, T]`, both endpoints included
    pub time: Vec<f64>,
    /// Real transmit signal `cos(phi(t))`
    pub signal: Vec<f64>,
    /// Instantaneous phase in radians
    pub phase: Vec<f64>,
}

impl ChirpWaveform {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Unit-amplitude complex chirp `exp(j*phi(t))`.
    pub fn analytic(&self) -> Vec<Complex64> {
        self.phase.iter().map(|&phi| Complex64::from_polar(1.0, phi)).collect()
    }

    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        (self.time, self.signal, self.phase)
    }
}

/// Synthesises the transmit chirp described by a [`ChirpConfig`].
#[derive(Debug, Clone)]
pub struct WaveformGenerator {
    config: ChirpConfig,
}

impl WaveformGenerator {
    pub fn new(config: ChirpConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChirpConfig {
        &self.config
    }

    /// Phase law of the sweep evaluated at an arbitrary instant.
    ///
    /// Echoes are built by evaluating this at `t - tau`, which is the exact
    /// form of a delayed linear chirp.
    pub fn phase_at(&self, t: f64) -> f64 {
        2.0 * PI * (self.config.f_start() * t + 0.5 * self.config.chirp_rate() * t * t)
    }

    /// Sample the chirp on an endpoint-inclusive grid of `n_samples` points.
    pub fn generate_chirp(&self) -> ChirpWaveform {
        let n = self.config.n_samples();
        let dt = self.config.sample_spacing();

        let time: Vec<f64> = (0..n).map(|i| i as f64 * dt).collect();
        let phase: Vec<f64> = time.iter().map(|&t| self.phase_at(t)).collect();
        let signal: Vec<f64> = phase.iter().map(|phi| phi.cos()).collect();

        ChirpWaveform { time, signal, phase }
    }

    /// Linear-ramp frequency `f_start + k*t` for any time sequence.
    pub fn get_instantaneous_frequency(&self, time: &[f64]) -> Vec<f64> {
        time.iter()
            .map(|&t| self.config.f_start() + self.config.chirp_rate() * t)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChirpSettings;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn wideband_generator() -> WaveformGenerator {
        let config = ChirpConfig::new(ChirpSettings {
            f_start_hz: 24.0e9,
            bandwidth_hz: 200.0e6,
            chirp_duration_s: 100.0e-6,
            sample_rate_hz: 500.0e6,
        })
        .unwrap();
        WaveformGenerator::new(config)
    }

    #[test]
    fn test_chirp_spans_duration() {
        let gen = wideband_generator();
        let chirp = gen.generate_chirp();
        assert_eq!(chirp.time.len(), 50_000);
        assert_eq!(chirp.signal.len(), 50_000);
        assert_eq!(chirp.phase.len(), 50_000);
        assert_eq!(chirp.time[0], 0.0);
        assert_relative_eq!(chirp.time[chirp.len() - 1], 100.0e-6, max_relative = 1e-12);
    }

    #[test]
    fn test_amplitude_bounded() {
        let chirp = wideband_generator().generate_chirp();
        let max = chirp.signal.iter().cloned().fold(f64::MIN, f64::max);
        let min = chirp.signal.iter().cloned().fold(f64::MAX, f64::min);
        assert!(chirp.signal.iter().all(|s| s.abs() <= 1.0));
        assert_abs_diff_eq!(max, 1.0, epsilon = 0.01);
        assert_abs_diff_eq!(min, -1.0, epsilon = 0.01);
    }

    #[test]
    fn test_phase_derivative_follows_ramp() {
        let gen = wideband_generator();
        let chirp = gen.generate_chirp();
        let n = chirp.len();
        let diff_freq = |i: usize| {
            (chirp.phase[i + 1] - chirp.phase[i]) / (2.0 * PI * (chirp.time[i + 1] - chirp.time[i]))
        };
        // Forward difference is biased by k*dt/2 (~2 kHz here)
        assert_relative_eq!(diff_freq(0), gen.config().f_start(), max_relative = 1e-6);
        assert_relative_eq!(diff_freq(n - 2), gen.config().f_stop(), max_relative = 1e-6);
    }

    #[test]
    fn test_instantaneous_frequency_on_external_grid() {
        let gen = wideband_generator();
        let freqs = gen.get_instantaneous_frequency(&[0.0, 50.0e-6, 100.0e-6, 200.0e-6]);
        assert_relative_eq!(freqs[0], 24.0e9);
        assert_relative_eq!(freqs[1], 24.1e9, max_relative = 1e-12);
        assert_relative_eq!(freqs[2], 24.2e9, max_relative = 1e-12);
        // Formula keeps ramping outside the sweep
        assert_relative_eq!(freqs[3], 24.4e9, max_relative = 1e-12);
        assert!(gen.get_instantaneous_frequency(&[]).is_empty());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let gen = WaveformGenerator::new(ChirpConfig::new(ChirpSettings::default()).unwrap());
        assert_eq!(gen.generate_chirp(), gen.generate_chirp());
    }

    #[test]
    fn test_analytic_matches_real_part() {
        let gen = WaveformGenerator::new(ChirpConfig::new(ChirpSettings::default()).unwrap());
        let chirp = gen.generate_chirp();
        for (z, s) in chirp.analytic().iter().zip(&chirp.signal) {
            assert_abs_diff_eq!(z.re, *s, epsilon = 1e-9);
            assert_abs_diff_eq!(z.norm(), 1.0, epsilon = 1e-12);
        }
    }
}
