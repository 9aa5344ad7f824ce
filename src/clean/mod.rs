// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/scrubcore

//! Sanitization engine.
//!
//! Four buffer primitives plus the dual-path dispatcher that routes each call
//! to either the accelerated (rayon-parallel) or the reference (portable
//! scalar) implementation:
//!
//! - [`entropy`]: Shannon entropy analysis and risk classification.
//! - [`pattern`]: known-signature byte sequence removal.
//! - [`lsb`]: least-significant-bit anomaly detection and scrubbing.
//! - [`noise`]: bounded pseudo-random pixel perturbation.
//! - [`accel`]: rayon-parallel kernels for all of the above.
//! - [`dispatch`]: one-time path probe and per-call routing.
//! - [`pipeline`]: whole-buffer sanitize sequence and parallel batch driver.
//!
//! All primitives are stateless per call; no data survives an invocation.
//! Random-bit sources are reseeded from OS entropy on every call (or owned
//! explicitly by the caller via the `_with_rng` variants), so no two files
//! ever receive the same noise pattern.

pub mod error;
pub mod entropy;
pub mod pattern;
pub mod lsb;
pub mod noise;
pub mod accel;
pub mod dispatch;
pub mod pipeline;

pub use error::CleanError;
