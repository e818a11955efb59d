//! Transmit chirp synthesis and point-target echo modelling.

pub mod chirp;
pub mod echo;
pub mod noise;

pub use chirp::{ChirpWaveform, WaveformGenerator};
pub use echo::{Echo, Target, TargetEchoModel};
