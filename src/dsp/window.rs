//! Window functions for range FFT leakage control.
//!
//! | Window         | Sidelobe level |
//! |----------------|----------------|
//! | Rectangular    | -13 dB         |
//! | Hann           | -32 dB         |
//! | Hamming        | -43 dB         |
//! | Blackman       | -58 dB         |
//! | Blackman-Harris| -92 dB         |
//!
//! Coefficients use the DFT-periodic form (`2*pi*n/N`), the usual choice for
//! spectral analysis.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Rectangular,
    #[default]
    Hann,
    Hamming,
    Blackman,
    BlackmanHarris,
}

impl WindowKind {
    /// Window coefficients for a frame of `length` samples.
    pub fn coefficients(&self, length: usize) -> Vec<f64> {
        match length {
            0 => return vec![],
            1 => return vec![1.0],
            _ => {}
        }
        let n = length as f64;
        (0..length)
            .map(|i| {
                let x = 2.0 * PI * i as f64 / n;
                match self {
                    WindowKind::Rectangular => 1.0,
                    WindowKind::Hann => 0.5 - 0.5 * x.cos(),
                    WindowKind::Hamming => 0.54 - 0.46 * x.cos(),
                    WindowKind::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                    WindowKind::BlackmanHarris => {
                        0.35875 - 0.48829 * x.cos() + 0.14128 * (2.0 * x).cos()
                            - 0.01168 * (3.0 * x).cos()
                    }
                }
            })
            .collect()
    }

    /// Mean coefficient value; scales a windowed tone's FFT magnitude.
    pub fn coherent_gain(&self, length: usize) -> f64 {
        if length == 0 {
            return 0.0;
        }
        self.coefficients(length).iter().sum::<f64>() / length as f64
    }

    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Hann => "hann",
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
            WindowKind::BlackmanHarris => "blackman_harris",
        }
    }
}

/// Multiply a signal by the selected window.
pub fn apply_window(signal: &[f64], kind: WindowKind) -> Vec<f64> {
    signal
        .iter()
        .zip(kind.coefficients(signal.len()))
        .map(|(s, w)| s * w)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [WindowKind; 5] = [
        WindowKind::Rectangular,
        WindowKind::Hann,
        WindowKind::Hamming,
        WindowKind::Blackman,
        WindowKind::BlackmanHarris,
    ];

    #[test]
    fn test_degenerate_lengths() {
        for kind in ALL {
            assert!(kind.coefficients(0).is_empty());
            assert_eq!(kind.coefficients(1), vec![1.0]);
        }
    }

    #[test]
    fn test_periodic_hann_shape() {
        let w = WindowKind::Hann.coefficients(8);
        assert_abs_diff_eq!(w[0], 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(w[4], 1.0, epsilon = 1e-15);
        // Periodic: symmetric about N/2, not about (N-1)/2
        assert_abs_diff_eq!(w[1], w[7], epsilon = 1e-15);
        assert_abs_diff_eq!(w[3], w[5], epsilon = 1e-15);
    }

    #[test]
    fn test_peak_and_edge_values() {
        let n = 256;
        for kind in ALL {
            let w = kind.coefficients(n);
            assert_eq!(w.len(), n);
            assert_abs_diff_eq!(w[n / 2], 1.0, epsilon = 1e-12);
            assert!(w.iter().all(|c| (-1e-12..=1.0 + 1e-12).contains(c)), "{:?}", kind);
        }
        assert_abs_diff_eq!(WindowKind::Hamming.coefficients(n)[0], 0.08, epsilon = 1e-12);
        assert_abs_diff_eq!(WindowKind::Blackman.coefficients(n)[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_coherent_gain() {
        assert_abs_diff_eq!(WindowKind::Rectangular.coherent_gain(64), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(WindowKind::Hann.coherent_gain(64), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(WindowKind::Hamming.coherent_gain(64), 0.54, epsilon = 1e-12);
        assert_abs_diff_eq!(WindowKind::Blackman.coherent_gain(64), 0.42, epsilon = 1e-12);
        assert_eq!(WindowKind::Hann.coherent_gain(0), 0.0);
    }

    #[test]
    fn test_apply_window() {
        let signal = vec![2.0; 8];
        let windowed = apply_window(&signal, WindowKind::Hann);
        let coeffs = WindowKind::Hann.coefficients(8);
        for (w, c) in windowed.iter().zip(&coeffs) {
            assert_abs_diff_eq!(*w, 2.0 * c, epsilon = 1e-15);
        }
        assert_eq!(apply_window(&signal, WindowKind::Rectangular), signal);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&WindowKind::BlackmanHarris).unwrap();
        assert_eq!(json, "\"blackman_harris\"");
        let kind: WindowKind = serde_json::from_str("\"hamming\"").unwrap();
        assert_eq!(kind, WindowKind::Hamming);
        for kind in ALL {
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{}\"", kind.name()));
        }
    }
}
