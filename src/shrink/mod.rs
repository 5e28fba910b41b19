//! Compressor context, per-block pipeline and the one-shot `compress` API.
//!
//! Per block the pipeline is:
//!
//! 1. hash-chain match enumeration over the window ([`crate::finder`]),
//! 2. augmenter pass A and the RLE table,
//! 3. parser pass 1 at half capacity, planting forward rep candidates,
//! 4. augmenter pass B (deeper chain walk, confirmed offsets only),
//! 5. parser pass 2 at full capacity, with traceback into `best_match`,
//! 6. the command reducer, re-run to a fixpoint (at most 20 passes),
//! 7. bit emission.
//!
//! Three pieces of state survive a block: the running rep offset, the bit
//! writer's cursor (carrier bytes straddle block boundaries), and any
//! trailing literals, which are rolled into the next block so every block
//! after the first may begin mid-run.

pub mod cost;
pub mod emit;
pub mod matches;
pub mod parser;
pub mod reduce;
pub mod rle;

use std::error::Error;
use std::fmt;

use crate::config::{BLOCK_SIZE, NARRIVALS_PER_POSITION};
use crate::finder::MatchFinder;
use crate::format::{BLOCK_FLAG_FIRST, BLOCK_FLAG_LAST, MAX_OFFSET};
use crate::stats::Stats;

use emit::{write_block, BitWriter};
use matches::{supplement_nearby_matches, supplement_small_matches, MatchTable};
use parser::{optimize_forward, Arrival, Visited};
use reduce::{reduce_commands, FinalMatch};
use rle::build_rle_table;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors surfaced by [`compress`].  There is no partial-output mode: on any
/// error the output buffer contents are unspecified and must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkError {
    /// The output buffer cannot hold the compressed stream.
    OutputTooSmall,
    /// An emitted match carried an offset outside the encodable range.
    InvalidOffset,
    /// The first command of the stream was not a literal run.
    FirstCommandNotLiterals,
    /// A non-final block consumed no input (its whole range stayed pending
    /// literals), so the stream cannot make progress.
    NoBlockProgress,
}

impl fmt::Display for ShrinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ShrinkError::OutputTooSmall => "output buffer too small",
            ShrinkError::InvalidOffset => "match offset outside the encodable range",
            ShrinkError::FirstCommandNotLiterals => "stream does not start with literals",
            ShrinkError::NoBlockProgress => "block consumed no input",
        };
        f.write_str(msg)
    }
}

impl Error for ShrinkError {}

// ─────────────────────────────────────────────────────────────────────────────
// Compressor context
// ─────────────────────────────────────────────────────────────────────────────

/// Owns every per-block scratch array, allocated once at construction and
/// reused for each block.
pub struct Compressor {
    /// Maximum bytes compressed per block (sizes the arrays).
    pub block_size: usize,
    /// Effective back-reference cap for this run.
    pub max_offset: u32,
    /// Compression flags ([`crate::format::FLG_IS_INVERTED`]).
    pub flags: u32,

    pub finder: MatchFinder,
    pub match_table: MatchTable,
    /// `(block_size + 1) × NARRIVALS_PER_POSITION` arrival slots.
    pub arrivals: Vec<Arrival>,
    /// Chosen command per position; one extra zeroed slot simplifies the
    /// reducer's end-of-block probes.
    pub best_match: Vec<FinalMatch>,
    /// Rep-insertion dedupe marks, block-relative.
    pub visited: Vec<Visited>,
    /// Equal-byte run lengths, window-absolute.
    pub rle: Vec<u32>,
    /// Bigram → most recent block position, or −1.
    pub first_offset_for_bigram: Vec<i32>,
    /// Block-relative position → previous position of the same bigram.
    pub next_offset_for_pos: Vec<i32>,
    /// Offset-recency cache for augmenter pass B.
    pub offset_cache: Vec<i32>,
    /// Work stack reused by the rep-insertion helper.
    pub rep_work: Vec<(u32, u32)>,

    pub writer: BitWriter,
    /// Offset the next rep-match would reuse (1 at stream start).
    pub cur_rep_offset: u32,
    pub stats: Stats,
}

impl Compressor {
    /// Allocate a context for blocks of up to `block_size` bytes over
    /// windows of up to `max_window_size` bytes.
    pub fn new(block_size: usize, max_window_size: usize, flags: u32, max_offset: u32) -> Self {
        Compressor {
            block_size,
            max_offset,
            flags,
            finder: MatchFinder::new(max_window_size),
            match_table: MatchTable::new(block_size),
            arrivals: vec![Arrival::vacant(); (block_size + 1) * NARRIVALS_PER_POSITION],
            best_match: vec![FinalMatch::default(); block_size + 1],
            visited: vec![Visited::default(); block_size],
            rle: vec![0; max_window_size],
            first_offset_for_bigram: vec![-1; 65536],
            next_offset_for_pos: vec![-1; block_size],
            offset_cache: vec![-1; 2048],
            rep_work: Vec::with_capacity(64),
            writer: BitWriter::new(),
            cur_rep_offset: 1,
            stats: Stats::new(),
        }
    }

    /// Run the per-block pipeline up to (but excluding) emission: match
    /// enumeration, augmentation, both parser passes and the reducer loop.
    /// The chosen parse is left in `best_match`.
    pub fn optimize_block(
        &mut self,
        window: &[u8],
        previous_block_size: usize,
        data_size: usize,
        block_flags: u32,
    ) {
        let start = previous_block_size;
        let end = previous_block_size + data_size;

        self.finder.reset();
        if start > 0 {
            self.finder.skip(window, 0, start);
        }
        let max_offset = self.max_offset.min(MAX_OFFSET) as usize;
        self.finder
            .find_all_matches(window, &mut self.match_table, start, end, max_offset);

        self.best_match.fill(FinalMatch::default());

        supplement_small_matches(self, window, start, end);
        build_rle_table(&window[..end], &mut self.rle[..end]);

        let rep_offset = self.cur_rep_offset;
        optimize_forward(
            self,
            window,
            start,
            end,
            true,
            rep_offset,
            NARRIVALS_PER_POSITION / 2,
            block_flags,
        );

        supplement_nearby_matches(self, window, start, end);

        optimize_forward(
            self,
            window,
            start,
            end,
            false,
            rep_offset,
            NARRIVALS_PER_POSITION,
            block_flags,
        );

        let mut passes = 0;
        loop {
            let did_reduce = reduce_commands(
                window,
                &mut self.best_match,
                start,
                end,
                rep_offset,
                block_flags,
            );
            passes += 1;
            if !did_reduce || passes >= 20 {
                break;
            }
        }
    }

    /// Optimize and emit one block.  Returns the count of trailing literals
    /// deferred to the next block.
    pub fn shrink_block(
        &mut self,
        window: &[u8],
        previous_block_size: usize,
        data_size: usize,
        out: &mut [u8],
        block_flags: u32,
    ) -> Result<usize, ShrinkError> {
        self.optimize_block(window, previous_block_size, data_size, block_flags);

        let block_out_start = self.writer.pos;
        write_block(
            self,
            window,
            previous_block_size,
            previous_block_size + data_size,
            out,
            block_out_start,
            block_flags,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot API
// ─────────────────────────────────────────────────────────────────────────────

/// Worst-case compressed size for `input_size` input bytes.
#[inline]
pub fn compress_bound(input_size: usize) -> usize {
    ((input_size + 65_535) >> 16) * 128 + input_size
}

/// Compress `input` into `output`, returning the compressed size.
///
/// - `flags`: [`crate::format::FLG_IS_INVERTED`] selects the V2 bitstream.
/// - `max_window_size`: caps back-reference distances (0 = format maximum).
/// - `dictionary_size`: the leading bytes of `input` are parse context only;
///   emission starts after them.
/// - `progress`: invoked as `(original_bytes, compressed_bytes)` after each
///   block and once at the end.
/// - `stats_out`: receives the run's [`Stats`] on success.
#[allow(clippy::too_many_arguments)]
pub fn compress(
    input: &[u8],
    output: &mut [u8],
    flags: u32,
    max_window_size: usize,
    dictionary_size: usize,
    mut progress: Option<&mut dyn FnMut(u64, u64)>,
    stats_out: Option<&mut Stats>,
) -> Result<usize, ShrinkError> {
    let block_size = if input.len() < BLOCK_SIZE {
        input.len().max(1024)
    } else {
        BLOCK_SIZE
    };
    let max_out_block_size = compress_bound(block_size);
    let max_offset = if max_window_size != 0 {
        (max_window_size.min(MAX_OFFSET as usize)) as u32
    } else {
        MAX_OFFSET
    };

    let mut ctx = Compressor::new(block_size, block_size * 2, flags, max_offset);

    let mut original = dictionary_size.min(input.len());
    // Only the trailing window's worth of dictionary can be referenced.
    let mut previous_block_size = original.min(block_size);
    let mut compressed = 0usize;
    let mut block_flags = BLOCK_FLAG_FIRST;

    loop {
        let in_data_size = (input.len() - original).min(block_size);
        if original + in_data_size >= input.len() {
            block_flags |= BLOCK_FLAG_LAST;
        }

        let out_limit = compressed + (output.len() - compressed).min(max_out_block_size);
        let window = &input[original - previous_block_size..original + in_data_size];

        let final_literals = ctx.shrink_block(
            window,
            previous_block_size,
            in_data_size,
            &mut output[..out_limit],
            block_flags,
        )?;
        let consumed = in_data_size - final_literals;
        if in_data_size > 0 && consumed == 0 {
            return Err(ShrinkError::NoBlockProgress);
        }

        original += consumed;
        compressed = ctx.writer.pos;
        previous_block_size = consumed;

        if block_flags & BLOCK_FLAG_LAST != 0 {
            break;
        }
        block_flags &= !BLOCK_FLAG_FIRST;

        if let Some(callback) = progress.as_mut() {
            callback(original as u64, compressed as u64);
        }
    }

    if let Some(callback) = progress.as_mut() {
        callback(original as u64, compressed as u64);
    }
    if let Some(stats) = stats_out {
        *stats = ctx.stats.clone();
    }

    Ok(compressed)
}
