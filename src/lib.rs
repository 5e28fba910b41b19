//! `zx0` — a pure-Rust compressor for the ZX0 bitstream format.
//!
//! ZX0 (designed by Einar Saukas) is a variable-length LZ77-style code aimed
//! at extremely constrained decoders — 8-bit home computers with a few dozen
//! bytes of decompressor.  Squeezing competitive ratios out of so small a
//! format is entirely the encoder's job; this crate's core is a forward
//! multi-arrival optimal parser that tracks, per input position, the
//! cheapest partial parses distinguished by their most recent rep offset.
//!
//! # Crate layout
//!
//! | Module   | Contents |
//! |----------|----------|
//! | `shrink` | Compressor context, forward parser, command reducer, bit emitter, `compress` API. |
//! | `finder` | Hash-chain match source feeding the parser's candidate table. |
//! | `format` | ZX0 wire-format constants and compression flags. |
//! | `config` | Compile-time tunables (block size, arrival/slot counts, thresholds). |
//! | `stats`  | Compression statistics reported to callers. |
//! | `cli`    | Argument parsing for the `zx0r` binary. |
//!
//! # Example
//!
//! ```
//! let input = b"alpha beta alpha beta alpha";
//! let mut output = vec![0u8; zx0::compress_bound(input.len())];
//! let size = zx0::compress(
//!     input,
//!     &mut output,
//!     zx0::FLG_IS_INVERTED,
//!     0,
//!     0,
//!     None,
//!     None,
//! )
//! .unwrap();
//! assert!(size <= zx0::compress_bound(input.len()));
//! ```

pub mod cli;
pub mod config;
pub mod finder;
pub mod format;
pub mod shrink;
pub mod stats;

// ── Top-level re-exports ──────────────────────────────────────────────────────

pub use format::{FLG_IS_INVERTED, MAX_OFFSET, MIN_OFFSET};
pub use shrink::{compress, compress_bound, Compressor, ShrinkError};
pub use stats::Stats;

/// Crate version, as compiled in.
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");
