//! DSP processor chaining echo simulation, dechirp and range detection.

use log::trace;
use num_complex::Complex64;
use rustfft::Fft;
use std::sync::Arc;
use std::time::Instant;

use crate::config::DetectionConfig;
use crate::dsp::fft::{plan_forward, RangeProfile, SpectralRangeAnalyzer};
use crate::dsp::mixer;
use crate::dsp::peaks::PeakDetector;
use crate::error::Result;
use crate::radar_config::ChirpConfig;
use crate::waveform::chirp::WaveformGenerator;
use crate::waveform::echo::{Target, TargetEchoModel};

/// A detected range bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub bin: usize,
    pub range_m: f64,
    pub beat_hz: f64,
    pub magnitude_db: f64,
}

/// Nearest detection to an expected target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetMatch {
    pub expected_m: f64,
    /// `None` when no detection fell within tolerance
    pub detection: Option<Detection>,
}

impl TargetMatch {
    pub fn error_m(&self) -> Option<f64> {
        self.detection.map(|d| (d.range_m - self.expected_m).abs())
    }
}

/// Result of processing one beat signal.
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    pub profile: RangeProfile,
    /// Strongest first
    pub detections: Vec<Detection>,
    pub noise_floor_db: f64,
    pub threshold_db: f64,
    pub tier: Option<&'static str>,
}

impl Scan {
    pub fn ranges(&self) -> Vec<f64> {
        self.detections.iter().map(|d| d.range_m).collect()
    }

    /// Pair every expected range with the closest detection within `tolerance_m`.
    pub fn match_targets(&self, expected_m: &[f64], tolerance_m: f64) -> Vec<TargetMatch> {
        expected_m
            .iter()
            .map(|&expected| {
                let detection = self
                    .detections
                    .iter()
                    .filter(|d| (d.range_m - expected).abs() < tolerance_m)
                    .min_by(|a, b| {
                        let da = (a.range_m - expected).abs();
                        da.total_cmp(&(b.range_m - expected).abs())
                    })
                    .copied();
                TargetMatch { expected_m: expected, detection }
            })
            .collect()
    }
}

/// Processor for turning target scenes or recorded beat signals into range detections.
pub struct Processor {
    generator: WaveformGenerator,
    detection: DetectionConfig,
    detector: PeakDetector,
    fft: Arc<dyn Fft<f64>>,
}

impl Processor {
    pub fn new(generator: WaveformGenerator, detection: DetectionConfig) -> Self {
        let fft = plan_forward(generator.config());
        Self { generator, detection, detector: PeakDetector::new(), fft }
    }

    pub fn with_detector(mut self, detector: PeakDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &ChirpConfig {
        self.generator.config()
    }

    pub fn generator(&self) -> &WaveformGenerator {
        &self.generator
    }

    pub fn detection(&self) -> &DetectionConfig {
        &self.detection
    }

    /// Range analyzer sharing this processor's FFT plan.
    pub fn analyzer(&self) -> SpectralRangeAnalyzer<'_> {
        SpectralRangeAnalyzer::with_plan(self.generator.config(), Arc::clone(&self.fft))
    }

    /// Superpose the targets' echoes and dechirp against the transmit chirp.
    pub fn simulate_beat(&self, targets: &[Target]) -> Result<Vec<f64>> {
        let start = Instant::now();
        let echo = TargetEchoModel::new(&self.generator).simulate_targets(targets)?;
        let beat = mixer::mix_signals(&echo.tx, &echo.rx)?;
        trace!("simulate_beat took {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);
        Ok(beat)
    }

    /// Range FFT and peak search on one beat signal.
    pub fn process_beat(&self, beat: &[f64]) -> Result<Scan> {
        let start = Instant::now();
        let profile = self.analyzer().range_fft(beat, self.detection.window)?;
        trace!("range_fft took {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);
        Ok(self.detect(profile))
    }

    /// Full chain for a target scene.
    pub fn run(&self, targets: &[Target]) -> Result<Scan> {
        let beat = self.simulate_beat(targets)?;
        self.process_beat(&beat)
    }

    /// Quadrature variant of [`Self::run`]: complex echoes and `tx * conj(rx)` mixing.
    pub fn run_quadrature(&self, targets: &[Target]) -> Result<Scan> {
        let start = Instant::now();
        let waveform = self.generator.generate_chirp();
        let model = TargetEchoModel::new(&self.generator);
        let mut rx = vec![Complex64::new(0.0, 0.0); waveform.len()];
        for target in targets {
            for (acc, s) in rx.iter_mut().zip(model.analytic_echo(&waveform, target)?) {
                *acc += s;
            }
        }
        let beat = mixer::mix_quadrature(&waveform.analytic(), &rx)?;
        let profile = self.analyzer().range_fft_iq(&beat, self.detection.window)?;
        trace!("run_quadrature took {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);
        Ok(self.detect(profile))
    }

    fn detect(&self, profile: RangeProfile) -> Scan {
        let start = Instant::now();
        let search = self
            .detector
            .search(&profile.magnitude_db, self.detection.snr_db, self.detection.max_peaks);
        let detections = search
            .peaks
            .iter()
            .map(|&bin| Detection {
                bin,
                range_m: profile.range_bins_m[bin],
                beat_hz: profile.freq_bins_hz[bin],
                magnitude_db: profile.magnitude_db[bin],
            })
            .collect();
        trace!("detect took {:.3}ms", start.elapsed().as_secs_f64() * 1000.0);

        Scan {
            profile,
            detections,
            noise_floor_db: search.noise_floor_db,
            threshold_db: search.threshold_db,
            tier: search.tier,
        }
    }
}
