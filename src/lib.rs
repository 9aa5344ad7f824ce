// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/scrubcore

//! # scrub-core
//!
//! Buffer-level media sanitization engine. Detects and destroys identifying
//! data hidden in raw file bytes or decoded pixel buffers:
//!
//! - **Entropy analysis**: Shannon entropy over the whole buffer and per
//!   4 KiB block, classified into a coarse steganography risk level.
//! - **LSB scrubbing**: detects anomalous least-significant-bit planes and
//!   overwrites every LSB with a fresh random bit (±1 intensity level max).
//! - **Signature removal**: drops known fingerprint byte sequences in a
//!   single forward pass.
//! - **Noise injection**: bounded pseudo-random pixel perturbation to defeat
//!   exact-match fingerprinting.
//!
//! Every primitive has a portable scalar implementation and a rayon-parallel
//! accelerated implementation. The [`clean::dispatch`] layer probes thread
//! availability once per process and routes each call to the fastest path,
//! degrading transparently to the scalar code on failure.
//!
//! Detection here is heuristic, not adversarially robust. Container parsing,
//! metadata tag semantics and file I/O are collaborator concerns; this crate
//! only ever sees in-memory buffers.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use scrub_core::{sanitize, SanitizeOptions};
//!
//! let pixels = std::fs::read("frame.raw").unwrap();
//! let (cleaned, report) = sanitize(&pixels, &SanitizeOptions::default()).unwrap();
//! println!("risk: {:?}, stages: {:?}", report.entropy.risk_level, report.applied);
//! ```

pub mod clean;

pub use clean::error::CleanError;
pub use clean::entropy::{EntropyReport, RiskLevel, BLOCK_SIZE};
pub use clean::pattern::PatternSet;
pub use clean::noise::NoiseParameters;
pub use clean::dispatch::{add_noise, analyze, detect_lsb_anomaly, native_active, scrub, scrub_lsb};
pub use clean::pipeline::{sanitize, sanitize_batch, SanitizeOptions, SanitizeReport, Stage};
