//! FMCW radar range chain: chirp synthesis, point-target echoes, dechirp
//! mixing, windowed range FFT and adaptive peak detection.
//!
//! ```text
//! ChirpConfig -> WaveformGenerator -> TargetEchoModel (per target, summed)
//!             -> mixer -> SpectralRangeAnalyzer -> PeakDetector
//! ```

pub mod config;
pub mod dsp;
pub mod error;
pub mod radar_config;
pub mod report;
pub mod util;
pub mod waveform;

pub use config::{ChirpSettings, DetectionConfig, Scenario};
pub use dsp::fft::{RangeProfile, SpectralRangeAnalyzer};
pub use dsp::peaks::PeakDetector;
pub use dsp::processor::{Detection, Processor, Scan};
pub use dsp::window::WindowKind;
pub use error::{RadarError, Result};
pub use radar_config::ChirpConfig;
pub use waveform::{ChirpWaveform, Target, TargetEchoModel, WaveformGenerator};
