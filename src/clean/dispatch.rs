// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/scrubcore

//! Dual-path dispatcher.
//!
//! Exposes the four sanitization primitives behind one interface that
//! prefers the accelerated (rayon) kernels and falls back to the portable
//! reference implementations. Availability is probed exactly once per
//! process by building a dedicated thread pool; a failed probe is terminal
//! (REFERENCE_ACTIVE for the process lifetime, no retry). A runtime failure
//! of a single accelerated call — a worker panic — degrades that one call
//! to the reference path with a warning; it does not change the active
//! state.
//!
//! Both paths honor identical semantic contracts. `scrub` and `analyze`
//! outputs are byte-identical across paths; the randomized primitives agree
//! in distribution only, since each path owns its own random streams.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::OnceLock;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{info, warn};

use super::accel;
use super::entropy::{self, EntropyReport};
use super::error::CleanError;
use super::lsb;
use super::noise::{self, NoiseParameters};
use super::pattern::{self, PatternSet};

static NATIVE_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

/// Probe (once) and return the accelerated path's thread pool.
fn native_pool() -> Option<&'static ThreadPool> {
    NATIVE_POOL
        .get_or_init(|| match ThreadPoolBuilder::new().build() {
            Ok(pool) => {
                info!("accelerated path active ({} threads)", pool.current_num_threads());
                Some(pool)
            }
            Err(e) => {
                warn!("accelerated path unavailable: {e}; using reference implementations");
                None
            }
        })
        .as_ref()
}

/// Whether the accelerated path is active in this process.
///
/// Diagnostic only: callers get identical semantics either way. The first
/// call triggers the one-time probe.
pub fn native_active() -> bool {
    native_pool().is_some()
}

/// Run one accelerated call, absorbing worker panics as
/// [`CleanError::NativeCallFailed`].
fn run_accel<T, F>(f: F) -> Result<T, CleanError>
where
    F: FnOnce() -> T + Send,
    T: Send,
{
    let pool = native_pool().ok_or(CleanError::NativeUnavailable)?;
    catch_unwind(AssertUnwindSafe(|| pool.install(f))).map_err(|_| CleanError::NativeCallFailed)
}

/// Dispatch one primitive: accelerated when active, reference otherwise,
/// reference retry when the accelerated call fails.
fn dispatch<T>(op: &'static str, fast: impl FnOnce() -> T + Send, slow: impl FnOnce() -> T) -> T
where
    T: Send,
{
    match run_accel(fast) {
        Ok(out) => out,
        Err(CleanError::NativeCallFailed) => {
            warn!("accelerated {op} failed; retrying on reference path");
            slow()
        }
        // Probe already reported unavailability once; just take the slow path.
        Err(_) => slow(),
    }
}

/// Entropy analysis over the buffer. See [`entropy::analyze`].
///
/// # Errors
/// [`CleanError::InvalidInput`] for an empty buffer.
pub fn analyze(data: &[u8]) -> Result<EntropyReport, CleanError> {
    if data.is_empty() {
        return Err(CleanError::InvalidInput("empty buffer: entropy undefined"));
    }
    Ok(dispatch(
        "entropy analysis",
        || accel::analyze(data),
        || entropy::analyze(data).expect("non-empty buffer"),
    ))
}

/// Remove known signature patterns. See [`pattern::scrub`].
pub fn scrub(data: &[u8], patterns: &PatternSet) -> Vec<u8> {
    dispatch(
        "pattern scrub",
        || accel::scrub(data, patterns),
        || pattern::scrub(data, patterns),
    )
}

/// Score the LSB plane for hidden payload. See [`lsb::detect_lsb_anomaly`].
pub fn detect_lsb_anomaly(samples: &[u8]) -> f64 {
    dispatch(
        "LSB detection",
        || accel::detect_lsb_anomaly(samples, lsb::LSB_ENTROPY_BASELINE),
        || lsb::detect_lsb_anomaly(samples),
    )
}

/// Randomize every sample's LSB. See [`lsb::scrub_lsb`].
pub fn scrub_lsb(samples: &[u8]) -> Vec<u8> {
    dispatch(
        "LSB scrub",
        || accel::scrub_lsb(samples),
        || lsb::scrub_lsb(samples),
    )
}

/// Inject bounded pixel noise. See [`noise::add_noise`].
pub fn add_noise(samples: &[u8], params: &NoiseParameters) -> Vec<u8> {
    dispatch(
        "noise injection",
        || accel::add_noise(samples, params),
        || noise::add_noise(samples, params),
    )
}
