// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/scrubcore

//! Shannon entropy analysis and risk classification.
//!
//! Builds a 256-bin frequency histogram over the buffer and computes
//! `H = -Σ p·log2(p)` in bits per byte (0 to 8). Well-compressed, encrypted
//! or steganographically loaded data approaches the 8.0 ceiling; typical
//! uncompressed media regions sit well below it. Per-block entropies (4 KiB
//! blocks, last block may be shorter) localize anomalous regions inside an
//! otherwise unremarkable buffer.
//!
//! This module is the reference (portable scalar) implementation;
//! [`crate::clean::accel`] provides the parallel kernel with identical output.

use super::error::CleanError;

/// Block size in bytes for per-block entropy reporting.
pub const BLOCK_SIZE: usize = 4096;

/// Overall entropy at or above this is classified [`RiskLevel::Medium`].
pub const MEDIUM_ENTROPY: f64 = 7.0;

/// Overall entropy at or above this is classified [`RiskLevel::High`].
pub const HIGH_ENTROPY: f64 = 7.5;

/// Coarse classification of how likely a buffer is to carry hidden data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Classify an overall entropy value against the fixed cut points.
    pub fn from_entropy(entropy: f64) -> Self {
        if entropy >= HIGH_ENTROPY {
            Self::High
        } else if entropy >= MEDIUM_ENTROPY {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Entropy statistics for one buffer.
#[derive(Debug, Clone)]
pub struct EntropyReport {
    /// Shannon entropy over the full buffer, independent of block size.
    pub overall_entropy: f64,
    /// Entropy of each [`BLOCK_SIZE`] block in buffer order.
    pub per_block: Vec<f64>,
    /// Classification of `overall_entropy` against the fixed cut points.
    pub risk_level: RiskLevel,
}

/// Compute Shannon entropy of a byte slice in bits per byte.
///
/// Returns 0.0 for an empty slice; the public [`analyze`] entry point
/// rejects empty buffers before this is reached.
pub fn shannon_entropy(data: &[u8]) -> f64 {
    let mut hist = [0u64; 256];
    for &b in data {
        hist[b as usize] += 1;
    }
    entropy_from_hist(&hist, data.len())
}

/// Entropy from a prebuilt 256-bin histogram over `len` bytes.
pub(crate) fn entropy_from_hist(hist: &[u64; 256], len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    let n = len as f64;
    let mut h = 0.0;
    for &count in hist {
        if count > 0 {
            let p = count as f64 / n;
            h -= p * p.log2();
        }
    }
    h
}

/// Analyze a buffer: overall entropy, per-block entropies, risk level.
///
/// # Errors
/// Returns [`CleanError::InvalidInput`] for an empty buffer — entropy is
/// undefined over zero bytes, and callers are expected to skip such files
/// with a reported reason rather than sanitize them.
pub fn analyze(data: &[u8]) -> Result<EntropyReport, CleanError> {
    if data.is_empty() {
        return Err(CleanError::InvalidInput("empty buffer: entropy undefined"));
    }
    let overall_entropy = shannon_entropy(data);
    let per_block = data.chunks(BLOCK_SIZE).map(shannon_entropy).collect();
    Ok(EntropyReport {
        overall_entropy,
        per_block,
        risk_level: RiskLevel::from_entropy(overall_entropy),
    })
}
