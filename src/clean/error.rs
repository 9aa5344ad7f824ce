// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/scrubcore

//! Error types for the sanitization engine.
//!
//! [`CleanError`] covers input-shape violations and accelerated-path
//! failures. The dispatcher absorbs the latter two variants internally;
//! callers of the public primitives only ever see [`CleanError::InvalidInput`].

use core::fmt;

/// Errors that can occur during buffer analysis or sanitization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    /// The input buffer violates a primitive's shape contract
    /// (e.g. entropy over an empty buffer is undefined).
    InvalidInput(&'static str),
    /// The accelerated path is not available in this process.
    /// Reported once at dispatcher initialization, never per call.
    NativeUnavailable,
    /// A single accelerated call failed; the dispatcher retries that call
    /// on the reference path and never surfaces this to the caller.
    NativeCallFailed,
}

impl fmt::Display for CleanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(reason) => write!(f, "invalid input: {reason}"),
            Self::NativeUnavailable => write!(f, "accelerated path unavailable"),
            Self::NativeCallFailed => write!(f, "accelerated call failed"),
        }
    }
}

impl std::error::Error for CleanError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = CleanError::InvalidInput("empty buffer");
        assert_eq!(e.to_string(), "invalid input: empty buffer");
        assert_eq!(CleanError::NativeUnavailable.to_string(), "accelerated path unavailable");
        assert_eq!(CleanError::NativeCallFailed.to_string(), "accelerated call failed");
    }
}
