//! Adaptive peak search over dB range profiles.
//!
//! The noise floor is the median of the weakest quarter of the profile, so a
//! few strong targets cannot drag it upwards. Candidates must clear
//! `noise_floor + snr_db` and are then searched with a ladder of
//! increasingly permissive tiers:
//!
//! | Tier        | Constraints                                  | Accepts when |
//! |-------------|----------------------------------------------|--------------|
//! | strict      | spacing >= 5, prominence >= 5 dB, width >= 1 | >= 2 peaks   |
//! | relaxed     | spacing >= 3                                 | >= 1 peak    |
//! | height-only | local maxima above threshold                 | >= 1 peak    |
//! | above-threshold | every bin above threshold                | >= 1 peak    |
//!
//! Peak primitives follow the usual `find_peaks` conventions: plateaus report
//! their middle sample, distance filtering keeps the taller peak, prominence
//! is measured against the higher of the two flanking minima, and width is
//! taken at half prominence.

use log::debug;

/// Constraints applied on top of the height threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeakConstraints {
    /// Minimum spacing between kept peaks, in bins
    pub distance: Option<usize>,
    /// Minimum prominence, in dB
    pub prominence: Option<f64>,
    /// Minimum width at half prominence, in bins
    pub width: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PeakStrategy {
    /// Local maxima above the threshold that also satisfy the constraints
    Constrained(PeakConstraints),
    /// Every bin above the threshold, local maximum or not
    AboveThreshold,
}

/// One rung of the search ladder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTier {
    pub name: &'static str,
    pub strategy: PeakStrategy,
    /// The tier's result is accepted once it holds at least this many peaks
    pub min_peaks: usize,
}

impl SearchTier {
    /// Candidate indices for this tier, in ascending index order.
    pub fn run(&self, profile: &[f64], threshold: f64) -> Vec<usize> {
        match &self.strategy {
            PeakStrategy::Constrained(constraints) => find_peaks(profile, threshold, constraints),
            PeakStrategy::AboveThreshold => profile
                .iter()
                .enumerate()
                .filter(|&(_, &v)| v > threshold)
                .map(|(i, _)| i)
                .collect(),
        }
    }
}

pub fn default_ladder() -> Vec<SearchTier> {
    vec![
        SearchTier {
            name: "strict",
            strategy: PeakStrategy::Constrained(PeakConstraints {
                distance: Some(5),
                prominence: Some(5.0),
                width: Some(1.0),
            }),
            min_peaks: 2,
        },
        SearchTier {
            name: "relaxed",
            strategy: PeakStrategy::Constrained(PeakConstraints {
                distance: Some(3),
                ..Default::default()
            }),
            min_peaks: 1,
        },
        SearchTier {
            name: "height-only",
            strategy: PeakStrategy::Constrained(PeakConstraints::default()),
            min_peaks: 1,
        },
        SearchTier {
            name: "above-threshold",
            strategy: PeakStrategy::AboveThreshold,
            min_peaks: 1,
        },
    ]
}

/// Outcome of one detection pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakSearch {
    /// Peak indices, strongest first
    pub peaks: Vec<usize>,
    pub noise_floor_db: f64,
    pub threshold_db: f64,
    /// Name of the tier that produced `peaks`, `None` when nothing was found
    pub tier: Option<&'static str>,
}

#[derive(Debug, Clone)]
pub struct PeakDetector {
    ladder: Vec<SearchTier>,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl PeakDetector {
    pub fn new() -> Self {
        Self { ladder: default_ladder() }
    }

    pub fn with_ladder(ladder: Vec<SearchTier>) -> Self {
        Self { ladder }
    }

    pub fn ladder(&self) -> &[SearchTier] {
        &self.ladder
    }

    /// Peak indices, strongest first, at most `max_peaks`. Empty when no bin
    /// clears the adaptive threshold.
    pub fn detect_peaks(&self, profile_db: &[f64], snr_db: f64, max_peaks: usize) -> Vec<usize> {
        self.search(profile_db, snr_db, max_peaks).peaks
    }

    pub fn search(&self, profile_db: &[f64], snr_db: f64, max_peaks: usize) -> PeakSearch {
        let Some(noise_floor_db) = noise_floor(profile_db) else {
            return PeakSearch {
                peaks: vec![],
                noise_floor_db: f64::NAN,
                threshold_db: f64::NAN,
                tier: None,
            };
        };
        let threshold_db = noise_floor_db + snr_db;

        let mut accepted = None;
        let mut fallback = None;
        for tier in &self.ladder {
            let found = tier.run(profile_db, threshold_db);
            debug!("peak tier '{}' found {} candidate(s)", tier.name, found.len());
            if !found.is_empty() && found.len() >= tier.min_peaks {
                accepted = Some((tier.name, found));
                break;
            }
            if fallback.is_none() && !found.is_empty() {
                fallback = Some((tier.name, found));
            }
        }

        let (tier, mut peaks) = match accepted.or(fallback) {
            Some((name, peaks)) => (Some(name), peaks),
            None => (None, vec![]),
        };
        peaks.sort_by(|&a, &b| profile_db[b].total_cmp(&profile_db[a]));
        peaks.truncate(max_peaks);

        PeakSearch { peaks, noise_floor_db, threshold_db, tier }
    }
}

fn median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

/// Median of the lowest quarter of the profile. Profiles shorter than four
/// bins use every bin. `None` for an empty profile.
pub fn noise_floor(profile_db: &[f64]) -> Option<f64> {
    if profile_db.is_empty() {
        return None;
    }
    let mut sorted = profile_db.to_vec();
    sorted.sort_by(f64::total_cmp);
    let quarter = sorted.len() / 4;
    let lower = if quarter == 0 { &sorted[..] } else { &sorted[..quarter] };
    Some(median(lower))
}

/// Indices of local maxima. Plateaus report their middle sample; the first
/// and last samples never qualify.
pub fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }
    let i_max = x.len() - 1;
    let mut i = 1;
    while i < i_max {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < i_max && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Drop peaks closer than `distance` bins to a taller kept peak.
pub fn select_by_distance(x: &[f64], peaks: &[usize], distance: usize) -> Vec<usize> {
    let n = peaks.len();
    let mut keep = vec![true; n];
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| x[peaks[a]].total_cmp(&x[peaks[b]]));

    for &j in order.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < n && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }
    peaks.iter().zip(keep).filter(|(_, kept)| *kept).map(|(&p, _)| p).collect()
}

/// Prominence of `peak` together with its left and right base indices.
fn prominence_with_bases(x: &[f64], peak: usize) -> (f64, usize, usize) {
    let height = x[peak];

    let mut left_min = height;
    let mut left_base = peak;
    let mut i = peak as isize;
    while i >= 0 && x[i as usize] <= height {
        if x[i as usize] < left_min {
            left_min = x[i as usize];
            left_base = i as usize;
        }
        i -= 1;
    }

    let mut right_min = height;
    let mut right_base = peak;
    let mut i = peak;
    while i < x.len() && x[i] <= height {
        if x[i] < right_min {
            right_min = x[i];
            right_base = i;
        }
        i += 1;
    }

    (height - left_min.max(right_min), left_base, right_base)
}

/// Height of `peak` above the higher of its two flanking minima.
pub fn peak_prominence(x: &[f64], peak: usize) -> f64 {
    prominence_with_bases(x, peak).0
}

/// Width of `peak` at half its prominence, with linearly interpolated crossings.
pub fn peak_width(x: &[f64], peak: usize) -> f64 {
    let (prominence, left_base, right_base) = prominence_with_bases(x, peak);
    let height = x[peak] - 0.5 * prominence;

    let mut i = peak;
    while left_base < i && height < x[i] {
        i -= 1;
    }
    let mut left_ip = i as f64;
    if x[i] < height {
        left_ip += (height - x[i]) / (x[i + 1] - x[i]);
    }

    let mut i = peak;
    while i < right_base && height < x[i] {
        i += 1;
    }
    let mut right_ip = i as f64;
    if x[i] < height {
        right_ip -= (height - x[i]) / (x[i - 1] - x[i]);
    }

    right_ip - left_ip
}

/// Local maxima at or above `height`, then filtered by spacing, prominence
/// and width in that order. Ascending index order.
pub fn find_peaks(x: &[f64], height: f64, constraints: &PeakConstraints) -> Vec<usize> {
    let mut peaks: Vec<usize> = local_maxima(x).into_iter().filter(|&p| x[p] >= height).collect();

    if let Some(distance) = constraints.distance {
        if distance > 1 {
            peaks = select_by_distance(x, &peaks, distance);
        }
    }
    if let Some(min_prominence) = constraints.prominence {
        peaks.retain(|&p| peak_prominence(x, p) >= min_prominence);
    }
    if let Some(min_width) = constraints.width {
        peaks.retain(|&p| peak_width(x, p) >= min_width);
    }
    peaks
}
