// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/scrubcore

//! Least-significant-bit anomaly detection and scrubbing.
//!
//! LSB steganography hides payload bits in the lowest-order bit of pixel
//! samples. A loaded bit plane looks like a fair coin (binary entropy near
//! 1 bit), while natural images show correlated, lower-entropy LSB planes.
//! [`detect_lsb_anomaly`] scores the distance between the observed plane
//! entropy and a natural-image baseline; [`scrub_lsb`] destroys any single
//! bit-plane payload by replacing every LSB with a fresh random bit, which
//! changes no sample by more than ±1.
//!
//! Both operations trust the caller to pass pixel-aligned channel data; a
//! wrong stride is a caller contract violation, not a detected error.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Natural-image LSB plane entropy baseline, in bits.
///
/// Heuristic, not derived from a documented corpus: natural photographic
/// content typically lands in the 0.5-0.9 bit range, so scores are measured
/// from the top of that range. Treat as a tunable constant and calibrate
/// against your own corpus via [`detect_lsb_anomaly_with_baseline`].
pub const LSB_ENTROPY_BASELINE: f64 = 0.85;

/// Binary entropy of the LSB plane of `samples`, in bits (0 to 1).
///
/// Returns 0.0 for an empty slice.
pub fn lsb_plane_entropy(samples: &[u8]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let ones = samples.iter().filter(|&&s| s & 1 == 1).count();
    binary_entropy(ones as f64 / samples.len() as f64)
}

/// Binary entropy `H(p)` in bits, with the 0·log(0) = 0 convention.
pub(crate) fn binary_entropy(p: f64) -> f64 {
    let mut h = 0.0;
    if p > 0.0 {
        h -= p * p.log2();
    }
    if p < 1.0 {
        h -= (1.0 - p) * (1.0 - p).log2();
    }
    h
}

/// Score the likelihood that the LSB plane carries a hidden payload.
///
/// Returns the observed plane entropy's distance above
/// [`LSB_ENTROPY_BASELINE`], normalized to [0, 1]: 0.0 at or below the
/// baseline, 1.0 at the 1-bit ceiling of a perfectly random plane.
pub fn detect_lsb_anomaly(samples: &[u8]) -> f64 {
    detect_lsb_anomaly_with_baseline(samples, LSB_ENTROPY_BASELINE)
}

/// [`detect_lsb_anomaly`] with a caller-calibrated baseline in (0, 1).
pub fn detect_lsb_anomaly_with_baseline(samples: &[u8], baseline: f64) -> f64 {
    let h = lsb_plane_entropy(samples);
    ((h - baseline) / (1.0 - baseline)).clamp(0.0, 1.0)
}

/// Replace every sample's LSB with a uniform random bit.
///
/// The upper 7 bits are untouched, so no sample moves by more than one
/// intensity level. The generator is reseeded from OS entropy on every
/// invocation so that repeated runs never reproduce a bit pattern.
pub fn scrub_lsb(samples: &[u8]) -> Vec<u8> {
    scrub_lsb_with_rng(samples, &mut ChaCha20Rng::from_entropy())
}

/// [`scrub_lsb`] drawing bits from a caller-owned generator.
///
/// Batch workers use this with independently seeded per-worker generators
/// so that concurrent sanitization never serializes on shared RNG state.
pub fn scrub_lsb_with_rng<R: Rng>(samples: &[u8], rng: &mut R) -> Vec<u8> {
    samples.iter().map(|&s| (s & !1) | (rng.gen::<u8>() & 1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn scrub_changes_at_most_one_level() {
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        let mut samples = vec![0u8; 10_000];
        rng.fill_bytes(&mut samples);
        let out = scrub_lsb(&samples);
        assert_eq!(out.len(), samples.len());
        for (a, b) in samples.iter().zip(&out) {
            assert!((*a as i16 - *b as i16).abs() <= 1);
            assert_eq!(a >> 1, b >> 1, "upper bits must be untouched");
        }
    }

    #[test]
    fn scrubbed_plane_entropy_near_one() {
        let samples = vec![128u8; 100_000];
        let out = scrub_lsb(&samples);
        let h = lsb_plane_entropy(&out);
        assert!(h > 0.99, "scrubbed LSB entropy {h} not near 1 bit");
    }

    #[test]
    fn double_scrub_statistically_indistinguishable() {
        let samples = vec![200u8; 100_000];
        let once = scrub_lsb(&samples);
        let twice = scrub_lsb(&once);
        let h1 = lsb_plane_entropy(&once);
        let h2 = lsb_plane_entropy(&twice);
        assert!((h1 - h2).abs() < 0.01, "h1={h1} h2={h2}");
        // Not bit-exact: independent random draws.
        assert_ne!(once, twice);
    }

    #[test]
    fn constant_image_scores_low() {
        // All LSBs are 0: plane entropy 0, well under the baseline.
        let samples = vec![128u8; 10_000];
        assert_eq!(detect_lsb_anomaly(&samples), 0.0);
    }

    #[test]
    fn random_plane_scores_high() {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        let mut samples = vec![0u8; 50_000];
        rng.fill_bytes(&mut samples);
        let score = detect_lsb_anomaly(&samples);
        assert!(score > 0.9, "score {score} too low for a random plane");
    }

    #[test]
    fn score_is_clamped() {
        for samples in [vec![], vec![0u8; 3], vec![1u8; 3]] {
            let score = detect_lsb_anomaly(&samples);
            assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn custom_baseline_shifts_score() {
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        let mut samples = vec![0u8; 50_000];
        rng.fill_bytes(&mut samples);
        let strict = detect_lsb_anomaly_with_baseline(&samples, 0.5);
        let lax = detect_lsb_anomaly_with_baseline(&samples, 0.99);
        assert!(strict >= lax);
    }

    #[test]
    fn binary_entropy_endpoints() {
        assert_eq!(binary_entropy(0.0), 0.0);
        assert_eq!(binary_entropy(1.0), 0.0);
        assert!((binary_entropy(0.5) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn owned_rng_is_deterministic() {
        let samples = vec![77u8; 1024];
        let mut a = ChaCha20Rng::from_seed([5u8; 32]);
        let mut b = ChaCha20Rng::from_seed([5u8; 32]);
        assert_eq!(scrub_lsb_with_rng(&samples, &mut a), scrub_lsb_with_rng(&samples, &mut b));
    }
}
