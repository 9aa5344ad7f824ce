// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/scrubcore

//! Whole-buffer sanitize pipeline and parallel batch driver.
//!
//! One buffer's pipeline is strictly sequential: entropy analysis decides
//! whether the destructive stages run at all, then the noise pass runs
//! unconditionally as the final step:
//!
//! 1. `analyze` → risk level (and signature occurrence report).
//! 2. If risk ≥ the configured trigger: pattern `scrub`, then `scrub_lsb`.
//!    Pattern removal runs first so the reported occurrences are exactly
//!    what gets removed; LSB randomization afterwards cannot hide a
//!    signature from the scrubber.
//! 3. `add_noise` always.
//!
//! A buffer that cannot be analyzed (zero-length) is reported as a typed
//! failure so batch callers can skip the file with a reason; it never
//! panics. Buffers are independent, so [`sanitize_batch`] fans out over
//! rayon with no coordination beyond collecting per-buffer results.
//!
//! The LSB and noise stages assume pixel-aligned channel data; feeding raw
//! container bytes through them is a caller contract violation (see the
//! [`lsb`](super::lsb) module docs).

use rayon::prelude::*;

use super::dispatch;
use super::entropy::{EntropyReport, RiskLevel};
use super::error::CleanError;
use super::noise::NoiseParameters;
use super::pattern::PatternSet;

/// A sanitization stage that ran on a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LsbScrub,
    PatternScrub,
    NoiseInject,
}

/// Configuration for one sanitize pass, supplied by the caller.
#[derive(Debug, Clone)]
pub struct SanitizeOptions {
    /// Signature patterns to elide when the destructive stages trigger.
    pub patterns: PatternSet,
    /// Noise parameters for the unconditional final pass.
    pub noise: NoiseParameters,
    /// Minimum risk level at which the LSB and pattern stages run.
    pub trigger: RiskLevel,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            patterns: PatternSet::known_signatures(),
            noise: NoiseParameters::default(),
            trigger: RiskLevel::Medium,
        }
    }
}

/// What one sanitize pass found and did.
#[derive(Debug, Clone)]
pub struct SanitizeReport {
    /// Entropy analysis of the input buffer (before any mutation).
    pub entropy: EntropyReport,
    /// Signature occurrences found in the input, as `(offset, pattern_index)`.
    pub signature_hits: Vec<(usize, usize)>,
    /// Stages that ran, in execution order.
    pub applied: Vec<Stage>,
    /// Anomaly score of the input LSB plane, in [0, 1].
    pub lsb_anomaly: f64,
}

/// Run the full sanitize pipeline on one buffer.
///
/// Returns the sanitized buffer and a report of what was found and applied.
/// The output length equals the input length unless the pattern stage
/// removed signature bytes.
///
/// # Errors
/// [`CleanError::InvalidInput`] if the buffer is empty (entropy undefined);
/// the caller should skip the file and report the reason.
pub fn sanitize(data: &[u8], opts: &SanitizeOptions) -> Result<(Vec<u8>, SanitizeReport), CleanError> {
    let entropy = dispatch::analyze(data)?;
    let signature_hits = opts.patterns.occurrences(data);
    let lsb_anomaly = dispatch::detect_lsb_anomaly(data);

    let mut applied = Vec::new();
    let mut buf;
    if entropy.risk_level >= opts.trigger {
        buf = dispatch::scrub(data, &opts.patterns);
        applied.push(Stage::PatternScrub);
        buf = dispatch::scrub_lsb(&buf);
        applied.push(Stage::LsbScrub);
    } else {
        buf = data.to_vec();
    }

    buf = dispatch::add_noise(&buf, &opts.noise);
    applied.push(Stage::NoiseInject);

    let report = SanitizeReport { entropy, signature_hits, applied, lsb_anomaly };
    Ok((buf, report))
}

/// Sanitize a batch of independent buffers on parallel workers.
///
/// Each buffer runs the same pipeline as [`sanitize`]; per-buffer random
/// state is owned by the invocation (reseeded inside each primitive), so
/// workers never serialize on a shared generator. Failures are per buffer:
/// one empty buffer yields one `Err` entry without affecting the rest.
pub fn sanitize_batch(
    buffers: &[Vec<u8>],
    opts: &SanitizeOptions,
) -> Vec<Result<(Vec<u8>, SanitizeReport), CleanError>> {
    buffers.par_iter().map(|data| sanitize(data, opts)).collect()
}
