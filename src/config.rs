//! Compile-time configuration constants for the compressor core.
//!
//! These values size the per-block scratch arrays and bound the work the
//! parser and the match sources perform.  They are deliberately compile-time:
//! every buffer is allocated once per [`crate::shrink::Compressor`] at its
//! maximum size and reused block to block.

/// Maximum number of input bytes compressed per block.
///
/// The bit-emitter cursor, the rep-offset and any pending literals carry
/// across block boundaries, so larger inputs still encode as one seamless
/// stream.
pub const BLOCK_SIZE: usize = 65_536;

/// Number of arrival slots physically allocated per input position (the
/// array stride).  The first parser pass runs with half this capacity, the
/// final pass with all of it.
pub const NARRIVALS_PER_POSITION: usize = 16;

/// log2 of [`NMATCHES_PER_INDEX`]; match-table rows are addressed as
/// `relative_position << MATCHES_PER_INDEX_SHIFT`.
pub const MATCHES_PER_INDEX_SHIFT: usize = 4;

/// Number of match slots per input position.  A zero-length entry terminates
/// the row.
pub const NMATCHES_PER_INDEX: usize = 1 << MATCHES_PER_INDEX_SHIFT;

/// Matches at least this long are only considered at their full length by the
/// parser; shorter truncations are not enumerated.  Keeps the DP cost linear
/// on long repetitions.
pub const LEAVE_ALONE_MATCH_SIZE: usize = 120;

/// Upper bound on any single match length produced by the match sources
/// (finder, augmenters, rep-insertion).
pub const LCP_MAX: usize = 32_767;

/// Upper bound on the length of an emitted match after the reducer joins
/// adjacent matches.
pub const MAX_VARLEN: usize = 65_535;

/// Maximum hash-chain steps the match finder walks per position.
pub const MATCH_FINDER_MAX_ATTEMPTS: usize = 1024;
