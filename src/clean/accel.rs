// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/scrubcore

//! Accelerated (rayon-parallel) kernels.
//!
//! These mirror the reference implementations in [`entropy`](super::entropy),
//! [`pattern`](super::pattern), [`lsb`](super::lsb) and [`noise`](super::noise)
//! with the same observable contracts. `scrub` and `analyze` produce
//! byte-identical output on both paths; the randomized kernels (`scrub_lsb`,
//! `add_noise`) use per-chunk ChaCha20 streams instead of one sequential
//! draw, so they agree statistically but not bitwise with the reference
//! path.
//!
//! Callers never invoke this module directly; [`dispatch`](super::dispatch)
//! routes here when the accelerated path probed available, inside its own
//! thread pool.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use super::entropy::{entropy_from_hist, shannon_entropy, EntropyReport, RiskLevel, BLOCK_SIZE};
use super::noise::NoiseParameters;
use super::pattern::PatternSet;

/// Chunk size for parallel histogram accumulation and RNG stream splitting.
const CHUNK: usize = 64 * 1024;

/// Parallel [`super::entropy::analyze`]. Caller guarantees `data` is
/// non-empty (the dispatcher shape-checks before routing).
pub fn analyze(data: &[u8]) -> EntropyReport {
    let hist = data
        .par_chunks(CHUNK)
        .fold(
            || [0u64; 256],
            |mut hist, chunk| {
                for &b in chunk {
                    hist[b as usize] += 1;
                }
                hist
            },
        )
        .reduce(
            || [0u64; 256],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b.iter()) {
                    *x += y;
                }
                a
            },
        );
    let overall_entropy = entropy_from_hist(&hist, data.len());
    let per_block: Vec<f64> = data.par_chunks(BLOCK_SIZE).map(shannon_entropy).collect();
    EntropyReport {
        overall_entropy,
        per_block,
        risk_level: RiskLevel::from_entropy(overall_entropy),
    }
}

/// Accelerated [`super::pattern::scrub`].
///
/// The cursor walk is inherently sequential (each match moves the cursor by
/// a data-dependent amount), so this kernel speeds up the common case with a
/// first-byte occupancy table: positions whose byte can't start any pattern
/// are copied without touching the pattern list. Output is byte-identical
/// to the reference path.
pub fn scrub(data: &[u8], patterns: &PatternSet) -> Vec<u8> {
    if patterns.is_empty() {
        return data.to_vec();
    }
    let mut first = [false; 256];
    for p in patterns.iter() {
        first[p[0] as usize] = true;
    }
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    'outer: while i < data.len() {
        let b = data[i];
        if first[b as usize] {
            for p in patterns.iter() {
                if data[i..].starts_with(p) {
                    i += p.len();
                    continue 'outer;
                }
            }
        }
        out.push(b);
        i += 1;
    }
    out
}

/// Parallel [`super::lsb::detect_lsb_anomaly_with_baseline`].
pub fn detect_lsb_anomaly(samples: &[u8], baseline: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let ones: usize = samples
        .par_chunks(CHUNK)
        .map(|chunk| chunk.iter().filter(|&&s| s & 1 == 1).count())
        .sum();
    let h = super::lsb::binary_entropy(ones as f64 / samples.len() as f64);
    ((h - baseline) / (1.0 - baseline)).clamp(0.0, 1.0)
}

/// Parallel [`super::lsb::scrub_lsb`].
///
/// Draws one 32-byte base seed from OS entropy per invocation, then gives
/// each chunk its own ChaCha20 stream so workers never contend on shared
/// RNG state and the chunk decomposition doesn't change the distribution.
pub fn scrub_lsb(samples: &[u8]) -> Vec<u8> {
    let base = fresh_seed();
    samples
        .par_chunks(CHUNK)
        .enumerate()
        .flat_map_iter(|(idx, chunk)| {
            let mut rng = stream_rng(base, idx);
            chunk
                .iter()
                .map(move |&s| (s & !1) | (rng.gen::<u8>() & 1))
                .collect::<Vec<u8>>()
        })
        .collect()
}

/// Parallel [`super::noise::add_noise`], same per-chunk stream scheme as
/// [`scrub_lsb`].
pub fn add_noise(samples: &[u8], params: &NoiseParameters) -> Vec<u8> {
    let base = fresh_seed();
    let intensity = params.intensity;
    samples
        .par_chunks(CHUNK)
        .enumerate()
        .flat_map_iter(|(idx, chunk)| {
            let mut rng = stream_rng(base, idx);
            chunk
                .iter()
                .map(move |&s| {
                    let delta = (rng.gen_range(-128i32..=127) as f64 * intensity) as i32;
                    (s as i32 + delta).clamp(0, 255) as u8
                })
                .collect::<Vec<u8>>()
        })
        .collect()
}

/// A fresh 32-byte seed from OS entropy, drawn once per invocation.
fn fresh_seed() -> [u8; 32] {
    let mut seed = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut seed);
    seed
}

/// Independent ChaCha20 stream for one chunk of a parallel draw.
fn stream_rng(base: [u8; 32], chunk_idx: usize) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::from_seed(base);
    rng.set_stream(chunk_idx as u64);
    rng
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clean::{entropy, lsb, noise, pattern};
    use rand::SeedableRng;

    fn random_buffer(len: usize, seed: u8) -> Vec<u8> {
        let mut rng = ChaCha20Rng::from_seed([seed; 32]);
        let mut data = vec![0u8; len];
        rng.fill_bytes(&mut data);
        data
    }

    #[test]
    fn analyze_matches_reference_exactly() {
        for len in [1, 100, BLOCK_SIZE, BLOCK_SIZE * 3 + 17, CHUNK + 1] {
            let data = random_buffer(len, 42);
            let fast = analyze(&data);
            let slow = entropy::analyze(&data).unwrap();
            assert_eq!(fast.overall_entropy.to_bits(), slow.overall_entropy.to_bits(), "len={len}");
            assert_eq!(fast.per_block.len(), slow.per_block.len());
            for (a, b) in fast.per_block.iter().zip(&slow.per_block) {
                assert_eq!(a.to_bits(), b.to_bits());
            }
            assert_eq!(fast.risk_level, slow.risk_level);
        }
    }

    #[test]
    fn scrub_matches_reference_exactly() {
        let mut patterns = PatternSet::known_signatures();
        patterns.insert(b"\xDE\xAD\xBE\xEF");
        let mut data = random_buffer(CHUNK * 2, 7);
        data[100..104].copy_from_slice(b"\xDE\xAD\xBE\xEF");
        assert_eq!(scrub(&data, &patterns), pattern::scrub(&data, &patterns));
    }

    #[test]
    fn scrub_empty_set_is_identity() {
        let data = random_buffer(1000, 3);
        assert_eq!(scrub(&data, &PatternSet::new()), data);
    }

    #[test]
    fn detect_matches_reference() {
        let data = random_buffer(CHUNK * 2 + 31, 9);
        let fast = detect_lsb_anomaly(&data, lsb::LSB_ENTROPY_BASELINE);
        let slow = lsb::detect_lsb_anomaly(&data);
        assert!((fast - slow).abs() < 1e-12);
    }

    #[test]
    fn scrub_lsb_contract_holds() {
        let data = random_buffer(CHUNK + 500, 5);
        let out = scrub_lsb(&data);
        assert_eq!(out.len(), data.len());
        for (a, b) in data.iter().zip(&out) {
            assert_eq!(a >> 1, b >> 1);
        }
        let h = lsb::lsb_plane_entropy(&out);
        assert!(h > 0.99, "parallel scrub plane entropy {h}");
    }

    #[test]
    fn add_noise_statistically_equivalent() {
        let data = vec![128u8; CHUNK * 2];
        let params = NoiseParameters::new(0.5);
        let fast = add_noise(&data, &params);
        let slow = noise::add_noise(&data, &params);
        let mean = |v: &[u8]| v.iter().map(|&s| s as f64).sum::<f64>() / v.len() as f64;
        // Same distribution on both paths: means within a few levels.
        assert!((mean(&fast) - mean(&slow)).abs() < 2.0);
        for &s in &fast {
            assert!((s as i32 - 128).abs() <= 65);
        }
    }

    #[test]
    fn add_noise_zero_intensity_identity() {
        let data = random_buffer(CHUNK + 99, 1);
        assert_eq!(add_noise(&data, &NoiseParameters::new(0.0)), data);
    }
}
