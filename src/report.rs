//! Human-readable reporting of chirp parameters and scan results.
//!
//! The processing chain stays silent; callers hand whatever they want shown
//! to a [`Reporter`].

use log::info;

use crate::dsp::processor::Scan;
use crate::radar_config::ChirpConfig;
use crate::waveform::echo::Target;

/// Tolerance used when pairing detections with scene targets (m).
pub const MATCH_TOLERANCE_M: f64 = 3.0;

pub trait Reporter {
    fn chirp_parameters(&self, config: &ChirpConfig);
    fn scan(&self, frame_id: u64, scan: &Scan, expected: &[Target]);
}

/// Reporter writing through the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

/// Text lines describing the chirp and the performance it implies.
pub fn chirp_summary(config: &ChirpConfig) -> Vec<String> {
    vec![
        format!(
            "Frequency range:   {:.2} - {:.2} GHz",
            config.f_start() / 1e9,
            config.f_stop() / 1e9
        ),
        format!("Bandwidth:         {:.1} MHz", config.bandwidth() / 1e6),
        format!("Chirp duration:    {:.1} us", config.chirp_duration() * 1e6),
        format!("Sample rate:       {:.1} MHz", config.sample_rate() / 1e6),
        format!("Samples per chirp: {}", config.n_samples()),
        format!("Range resolution:  {:.2} m", config.range_resolution()),
        format!("Max range:         {:.2} m", config.max_range()),
        format!(
            "Max velocity:      {:.2} m/s ({:.1} km/h)",
            config.max_velocity(),
            config.max_velocity() * 3.6
        ),
    ]
}

/// Text lines describing one scan and, when a scene is known, how its
/// targets were matched.
pub fn scan_summary(frame_id: u64, scan: &Scan, expected: &[Target]) -> Vec<String> {
    let mut lines = vec![format!(
        "Frame {}: {} detection(s), noise floor {:.1} dB, threshold {:.1} dB, tier {}",
        frame_id,
        scan.detections.len(),
        scan.noise_floor_db,
        scan.threshold_db,
        scan.tier.unwrap_or("none")
    )];
    for d in &scan.detections {
        lines.push(format!(
            "  Detection: range {:.2} m, beat {:.1} kHz, {:.1} dB",
            d.range_m,
            d.beat_hz / 1e3,
            d.magnitude_db
        ));
    }
    if expected.is_empty() {
        return lines;
    }

    let ranges: Vec<f64> = expected.iter().map(|t| t.range_m).collect();
    let matches = scan.match_targets(&ranges, MATCH_TOLERANCE_M);
    let mut matched = 0;
    for (target, m) in expected.iter().zip(&matches) {
        match (m.detection, m.error_m()) {
            (Some(d), Some(error)) => {
                matched += 1;
                lines.push(format!(
                    "  {} at {:.1} m -> detected at {:.2} m (error {:.2} m)",
                    target.label(),
                    target.range_m,
                    d.range_m,
                    error
                ));
            }
            _ => lines.push(format!(
                "  {} at {:.1} m -> not detected",
                target.label(),
                target.range_m
            )),
        }
    }
    lines.push(format!("  Matched {} of {} targets", matched, expected.len()));
    lines
}

impl Reporter for LogReporter {
    fn chirp_parameters(&self, config: &ChirpConfig) {
        for line in chirp_summary(config) {
            info!("{}", line);
        }
    }

    fn scan(&self, frame_id: u64, scan: &Scan, expected: &[Target]) {
        for line in scan_summary(frame_id, scan, expected) {
            info!("{}", line);
        }
    }
}
