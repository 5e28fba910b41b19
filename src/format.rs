//! ZX0 bitstream format constants and compression flags.
//!
//! The ZX0 format (designed by Einar Saukas for extremely small 8-bit
//! decoders) interleaves three kinds of commands in a single bit stream:
//!
//! | Token | Command | Payload |
//! |-------|---------|---------|
//! | `0` after a match | literals | Elias-gamma run length, then raw bytes |
//! | `0` after literals | rep-match | Elias-gamma of `length` (reuses last offset) |
//! | `1` | match with offset | Elias-gamma high offset bits, one raw low-offset byte, Elias-gamma of `length − 1` |
//!
//! The very first command of a stream is always a literal run and carries no
//! token bit.  A with-offset token whose high part decodes to
//! [`EOD_MARKER`] terminates the stream.  In the V2 ("inverted") variant the
//! data bits of offset Elias codes and of the end marker are complemented;
//! length codes are never inverted.

// ─────────────────────────────────────────────────────────────────────────────
// Offsets
// ─────────────────────────────────────────────────────────────────────────────

/// Smallest encodable back-reference distance.
pub const MIN_OFFSET: u32 = 1;

/// Largest encodable back-reference distance.
///
/// The high part of an offset is Elias-coded as `((offset − 1) >> 7) + 1` and
/// the value 256 is reserved as the end-of-data marker, which caps distances
/// at `255 · 128 = 32640`.
pub const MAX_OFFSET: u32 = 32_640;

// ─────────────────────────────────────────────────────────────────────────────
// Match lengths and tokens
// ─────────────────────────────────────────────────────────────────────────────

/// Smallest match length a with-offset match can encode.  Rep-matches can go
/// one shorter (a single byte) because their length code carries `length`
/// directly instead of `length − 1`.
pub const MIN_ENCODED_MATCH_SIZE: i32 = 2;

/// Size in bits of a command token.
pub const TOKEN_SIZE: u32 = 1;

/// Reserved high-offset Elias value marking end-of-data.
pub const EOD_MARKER: u32 = 256;

// ─────────────────────────────────────────────────────────────────────────────
// Compression flags
// ─────────────────────────────────────────────────────────────────────────────

/// Emit the V2 bitstream variant: data bits of offset Elias codes and of the
/// end-of-data marker are complemented.
pub const FLG_IS_INVERTED: u32 = 1 << 0;

// ─────────────────────────────────────────────────────────────────────────────
// Block flags (internal, passed through the per-block pipeline)
// ─────────────────────────────────────────────────────────────────────────────

/// First block of the stream: the leading literal-run token is omitted and
/// position 0 cannot start a match.
pub const BLOCK_FLAG_FIRST: u32 = 1 << 0;

/// Last block of the stream: trailing literals are flushed and the
/// end-of-data marker is emitted.
pub const BLOCK_FLAG_LAST: u32 = 1 << 1;
