// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/scrubcore

//! Known-signature byte pattern removal.
//!
//! [`scrub`] scans the buffer left to right with a single cursor. At each
//! position the patterns are tested in insertion order; the first match is
//! dropped entirely (not replaced) and the cursor jumps past it. Unmatched
//! bytes are copied through, so the output is always a subsequence of the
//! input.
//!
//! The single forward pass is a deliberate simplification: a pattern that
//! only becomes contiguous after an earlier removal is NOT detected (no
//! backtracking, no re-scan). Caller pattern sets are chosen assuming
//! exactly this behavior.

/// An ordered set of distinct, non-empty byte sequences to elide.
///
/// Insertion order defines match priority: when two patterns would match at
/// the same offset, the first inserted wins.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Vec<u8>>,
}

impl PatternSet {
    /// Create an empty pattern set.
    pub fn new() -> Self {
        Self { patterns: Vec::new() }
    }

    /// The built-in signature list: JPEG APPn marker prefixes commonly
    /// carrying camera and software fingerprints (APP0, APP1/EXIF,
    /// APP2/ICC, APP13/IPTC, APP14/Adobe).
    ///
    /// The sequences are matched as opaque bytes; no JPEG structure is
    /// parsed here.
    pub fn known_signatures() -> Self {
        let mut set = Self::new();
        set.insert(&[0xFF, 0xE0]);
        set.insert(&[0xFF, 0xE1]);
        set.insert(&[0xFF, 0xE2]);
        set.insert(&[0xFF, 0xED]);
        set.insert(&[0xFF, 0xEE]);
        set
    }

    /// Append a pattern, preserving insertion order.
    ///
    /// Empty patterns and exact duplicates of an already-inserted pattern
    /// are ignored; returns `true` if the pattern was added.
    pub fn insert(&mut self, pattern: &[u8]) -> bool {
        if pattern.is_empty() || self.patterns.iter().any(|p| p == pattern) {
            return false;
        }
        self.patterns.push(pattern.to_vec());
        true
    }

    /// Number of patterns in the set.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the set contains no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Iterate patterns in insertion (priority) order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.patterns.iter().map(|p| p.as_slice())
    }

    /// Locate non-overlapping pattern occurrences without removing them.
    ///
    /// Uses the same single-pass, leftmost-first, first-pattern-wins scan as
    /// [`scrub`], so the result is exactly the set of removals `scrub` would
    /// perform. Returns `(offset, pattern_index)` pairs in buffer order.
    pub fn occurrences(&self, data: &[u8]) -> Vec<(usize, usize)> {
        let mut hits = Vec::new();
        if self.is_empty() {
            return hits;
        }
        let mut i = 0;
        'outer: while i < data.len() {
            for (idx, p) in self.patterns.iter().enumerate() {
                if data[i..].starts_with(p) {
                    hits.push((i, idx));
                    i += p.len();
                    continue 'outer;
                }
            }
            i += 1;
        }
        hits
    }
}

/// Remove all non-overlapping pattern occurrences from `data`.
///
/// Single forward pass, leftmost-first, first-pattern-wins on offset ties.
/// Matched bytes are dropped, so the output may be shorter than the input.
/// An empty pattern set returns the input unchanged; a pattern longer than
/// the remaining tail never matches.
///
/// Worst case O(n·p·k) with n = buffer length, p = pattern count, k = max
/// pattern length. Pattern sets are small (tens of entries), so this is
/// never the bottleneck.
pub fn scrub(data: &[u8], patterns: &PatternSet) -> Vec<u8> {
    if patterns.is_empty() {
        return data.to_vec();
    }
    let mut out = Vec::with_capacity(data.len());
    let mut i = 0;
    'outer: while i < data.len() {
        for p in patterns.iter() {
            if data[i..].starts_with(p) {
                i += p.len();
                continue 'outer;
            }
        }
        out.push(data[i]);
        i += 1;
    }
    out
}
