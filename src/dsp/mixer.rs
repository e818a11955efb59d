//! Dechirp mixing.
//!
//! The real mixer multiplies TX and RX sample by sample:
//!
//! ```text
//! cos(a) * cos(b) = 0.5*cos(a - b) + 0.5*cos(a + b)
//! ```
//!
//! Only the difference term carries range. The sum term sits near
//! `2*f_start` and sweeps `2*B`, so at baseband sample rates it aliases
//! across the whole band many times per chirp and lands as a broadband
//! floor rather than a tone. [`mix_quadrature`] removes it entirely.

use num_complex::Complex64;

use crate::error::{RadarError, Result};

fn check_lengths(tx: usize, rx: usize) -> Result<()> {
    if tx != rx {
        return Err(RadarError::LengthMismatch { expected: tx, actual: rx });
    }
    Ok(())
}

/// Real heterodyne mixer: `beat[n] = tx[n] * rx[n]`.
pub fn mix_signals(tx: &[f64], rx: &[f64]) -> Result<Vec<f64>> {
    check_lengths(tx.len(), rx.len())?;
    Ok(tx.iter().zip(rx).map(|(t, r)| t * r).collect())
}

/// Quadrature mixer: `beat[n] = tx[n] * conj(rx[n])`.
///
/// Leaves a single positive tone at the beat frequency.
pub fn mix_quadrature(tx: &[Complex64], rx: &[Complex64]) -> Result<Vec<Complex64>> {
    check_lengths(tx.len(), rx.len())?;
    Ok(tx.iter().zip(rx).map(|(t, r)| t * r.conj()).collect())
}
