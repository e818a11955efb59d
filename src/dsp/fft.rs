// src/dsp/fft.rs

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner, Length};
use std::sync::Arc;

use crate::dsp::window::{apply_window, WindowKind};
use crate::error::{RadarError, Result};
use crate::radar_config::ChirpConfig;

/// Added to FFT magnitudes before taking the log so silent bins stay finite.
pub const MAGNITUDE_EPSILON: f64 = 1e-10;

/// Positive-frequency half of a range FFT.
///
/// The three vectors run in parallel and all hold `n_samples / 2` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeProfile {
    pub freq_bins_hz: Vec<f64>,
    pub range_bins_m: Vec<f64>,
    pub magnitude_db: Vec<f64>,
}

impl RangeProfile {
    pub fn len(&self) -> usize {
        self.magnitude_db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitude_db.is_empty()
    }

    /// Index of the strongest bin, if any.
    pub fn peak_index(&self) -> Option<usize> {
        self.magnitude_db
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
    }
}

/// Forward FFT plan sized for one chirp.
pub fn plan_forward(config: &ChirpConfig) -> Arc<dyn Fft<f64>> {
    FftPlanner::<f64>::new().plan_fft_forward(config.n_samples())
}

/// Turns beat signals into range profiles for one chirp configuration.
pub struct SpectralRangeAnalyzer<'a> {
    config: &'a ChirpConfig,
    fft: Arc<dyn Fft<f64>>,
}

impl<'a> SpectralRangeAnalyzer<'a> {
    pub fn new(config: &'a ChirpConfig) -> Self {
        Self { config, fft: plan_forward(config) }
    }

    /// Reuse an existing forward plan. Its length must be `n_samples`.
    pub fn with_plan(config: &'a ChirpConfig, fft: Arc<dyn Fft<f64>>) -> Self {
        Self { config, fft }
    }

    pub fn config(&self) -> &ChirpConfig {
        self.config
    }

    pub fn plan(&self) -> &Arc<dyn Fft<f64>> {
        &self.fft
    }

    fn check_length(&self, len: usize) -> Result<()> {
        let expected = self.config.n_samples();
        for actual in [len, self.fft.len()] {
            if actual != expected {
                return Err(RadarError::LengthMismatch { expected, actual });
            }
        }
        Ok(())
    }

    /// Window, transform and convert a real beat signal.
    pub fn range_fft(&self, beat_signal: &[f64], window: WindowKind) -> Result<RangeProfile> {
        self.check_length(beat_signal.len())?;

        let mut buffer: Vec<Complex64> = apply_window(beat_signal, window)
            .into_iter()
            .map(|re| Complex64::new(re, 0.0))
            .collect();
        self.fft.process(&mut buffer);
        Ok(self.profile_from_spectrum(&buffer))
    }

    /// Range FFT of a quadrature (complex) beat signal.
    pub fn range_fft_iq(
        &self,
        beat_signal: &[Complex64],
        window: WindowKind,
    ) -> Result<RangeProfile> {
        self.check_length(beat_signal.len())?;

        let mut buffer: Vec<Complex64> = beat_signal
            .iter()
            .zip(window.coefficients(beat_signal.len()))
            .map(|(z, w)| *z * w)
            .collect();
        self.fft.process(&mut buffer);
        Ok(self.profile_from_spectrum(&buffer))
    }

    fn profile_from_spectrum(&self, spectrum: &[Complex64]) -> RangeProfile {
        let n = self.config.n_samples();
        let half = n / 2;
        let bin_hz = self.config.bin_spacing_hz();

        let magnitude_db: Vec<f64> = spectrum[..half]
            .iter()
            .map(|z| 20.0 * (z.norm() + MAGNITUDE_EPSILON).log10())
            .collect();
        let freq_bins_hz: Vec<f64> = (0..half).map(|k| k as f64 * bin_hz).collect();
        let range_bins_m = self.freq_to_range(&freq_bins_hz);

        RangeProfile { freq_bins_hz, range_bins_m, magnitude_db }
    }

    /// `R = f_beat * c * T / (2B)`.
    pub fn freq_to_range(&self, freq_hz: &[f64]) -> Vec<f64> {
        freq_hz.iter().map(|&f| self.config.range_for_beat(f)).collect()
    }

    /// `f_beat = 2 * B * R / (c * T)`.
    pub fn range_to_freq(&self, range_m: &[f64]) -> Vec<f64> {
        range_m.iter().map(|&r| self.config.beat_frequency(r)).collect()
    }
}
