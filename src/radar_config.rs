use crate::config::ChirpSettings;
use crate::error::{RadarError, Result};

/// Speed of light used throughout the chain (m/s).
pub const C: f64 = 3.0e8;

/// Validated chirp parameters with the radar performance figures derived
/// from them. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChirpConfig {
    f_start: f64,
    bandwidth: f64,
    chirp_duration: f64,
    sample_rate: f64,
    f_stop: f64,
    chirp_rate: f64,
    n_samples: usize,
    range_resolution: f64,
    max_range: f64,
    max_velocity: f64,
}

fn require_positive(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(RadarError::InvalidConfig { field, value })
    }
}

impl ChirpConfig {
    pub fn new(settings: ChirpSettings) -> Result<Self> {
        let f_start = require_positive("f_start", settings.f_start_hz)?;
        let bandwidth = require_positive("bandwidth", settings.bandwidth_hz)?;
        let chirp_duration = require_positive("chirp_duration", settings.chirp_duration_s)?;
        let sample_rate = require_positive("sample_rate", settings.sample_rate_hz)?;

        let n_samples = (sample_rate * chirp_duration).floor() as usize;
        if n_samples < 2 {
            return Err(RadarError::TooFewSamples(n_samples));
        }

        // Undersampled beat spectrum: the Nyquist limit caps the range.
        let max_range = if sample_rate < bandwidth / 2.0 {
            (sample_rate / 2.0) * C * chirp_duration / (2.0 * bandwidth)
        } else {
            C * chirp_duration / 2.0
        };

        Ok(Self {
            f_start,
            bandwidth,
            chirp_duration,
            sample_rate,
            f_stop: f_start + bandwidth,
            chirp_rate: bandwidth / chirp_duration,
            n_samples,
            range_resolution: C / (2.0 * bandwidth),
            max_range,
            max_velocity: (C / f_start) / (4.0 * chirp_duration),
        })
    }

    pub fn settings(&self) -> ChirpSettings {
        ChirpSettings {
            f_start_hz: self.f_start,
            bandwidth_hz: self.bandwidth,
            chirp_duration_s: self.chirp_duration,
            sample_rate_hz: self.sample_rate,
        }
    }

    pub fn f_start(&self) -> f64 {
        self.f_start
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn chirp_duration(&self) -> f64 {
        self.chirp_duration
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn f_stop(&self) -> f64 {
        self.f_stop
    }

    /// Sweep slope in Hz/s.
    pub fn chirp_rate(&self) -> f64 {
        self.chirp_rate
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// `c / (2B)` in metres.
    pub fn range_resolution(&self) -> f64 {
        self.range_resolution
    }

    pub fn max_range(&self) -> f64 {
        self.max_range
    }

    /// Unambiguous velocity for a single chirp period. Informational only.
    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    pub fn wavelength(&self) -> f64 {
        C / self.f_start
    }

    /// Spacing of the endpoint-inclusive time grid, `T / (n - 1)`.
    ///
    /// Slightly larger than `1 / sample_rate`; the FFT bins still assume the
    /// nominal rate, which shifts the beat tone by a fraction of one bin.
    pub fn sample_spacing(&self) -> f64 {
        self.chirp_duration / (self.n_samples - 1) as f64
    }

    /// Width of one FFT bin in Hz.
    pub fn bin_spacing_hz(&self) -> f64 {
        self.sample_rate / self.n_samples as f64
    }

    /// Beat frequency produced by a point target at `range_m`.
    pub fn beat_frequency(&self, range_m: f64) -> f64 {
        2.0 * self.bandwidth * range_m / (C * self.chirp_duration)
    }

    /// Range corresponding to a beat frequency; inverse of [`Self::beat_frequency`].
    pub fn range_for_beat(&self, freq_hz: f64) -> f64 {
        freq_hz * C * self.chirp_duration / (2.0 * self.bandwidth)
    }
}
