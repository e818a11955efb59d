use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{RadarError, Result};

/// Add white Gaussian receiver noise with standard deviation `std_dev`.
pub fn add_receiver_noise<R: Rng + ?Sized>(
    signal: &mut [f64],
    std_dev: f64,
    rng: &mut R,
) -> Result<()> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(RadarError::InvalidNoise(std_dev));
    }
    if std_dev == 0.0 {
        return Ok(());
    }
    let normal = Normal::new(0.0, std_dev).map_err(|_| RadarError::InvalidNoise(std_dev))?;
    for s in signal.iter_mut() {
        *s += normal.sample(rng);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_noise_is_noop() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut signal = vec![0.5; 16];
        add_receiver_noise(&mut signal, 0.0, &mut rng).unwrap();
        assert_eq!(signal, vec![0.5; 16]);
    }

    #[test]
    fn test_noise_statistics() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut signal = vec![0.0; 20_000];
        add_receiver_noise(&mut signal, 2.0, &mut rng).unwrap();
        let n = signal.len() as f64;
        let mean = signal.iter().sum::<f64>() / n;
        let var = signal.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.1, "mean {}", mean);
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std {}", var.sqrt());
    }

    #[test]
    fn test_same_seed_same_noise() {
        let mut a = vec![0.0; 64];
        let mut b = vec![0.0; 64];
        add_receiver_noise(&mut a, 1.0, &mut StdRng::seed_from_u64(3)).unwrap();
        add_receiver_noise(&mut b, 1.0, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_std_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut signal = vec![0.0; 4];
        assert!(matches!(
            add_receiver_noise(&mut signal, -1.0, &mut rng),
            Err(RadarError::InvalidNoise(_))
        ));
        assert!(matches!(
            add_receiver_noise(&mut signal, f64::INFINITY, &mut rng),
            Err(RadarError::InvalidNoise(_))
        ));
    }
}
