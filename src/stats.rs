//! Compression statistics collected while emitting blocks.
//!
//! All aggregates are cumulative over the whole `compress` call.  Minima use
//! `-1` as the "nothing recorded yet" sentinel so that a first observation of
//! any magnitude registers.

/// Per-run compression statistics.
///
/// `*_divisor` fields count how many samples contributed to the matching
/// totals, so callers can derive means without the library imposing a
/// floating-point representation.
#[derive(Clone, Debug)]
pub struct Stats {
    pub min_literals: i32,
    pub max_literals: i32,
    pub total_literals: i64,
    /// Number of literal runs emitted (including the final, possibly empty,
    /// run of the last block).
    pub literals_divisor: i32,

    pub min_offset: i32,
    pub max_offset: i32,
    pub total_offsets: i64,
    /// Number of match commands emitted.
    pub match_divisor: i32,

    pub min_match_len: i32,
    pub max_match_len: i32,
    pub total_match_lens: i64,

    /// Aggregates over matches with offset 1 (byte runs).
    pub min_rle1_len: i32,
    pub max_rle1_len: i32,
    pub total_rle1_lens: i64,
    pub rle1_divisor: i32,

    /// Aggregates over matches with offset 2 (two-byte-period runs).
    pub min_rle2_len: i32,
    pub max_rle2_len: i32,
    pub total_rle2_lens: i64,
    pub rle2_divisor: i32,

    /// Minimum observed distance between the decoder's write head and the
    /// compressed read head, for callers that decompress in place over a
    /// single buffer.
    pub safe_dist: i32,
    /// Matches that reused the previous offset.
    pub num_rep_matches: i32,
    /// Total emitted commands (matches; literal runs are counted by
    /// `literals_divisor`).
    pub commands_divisor: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Stats {
            min_literals: -1,
            max_literals: 0,
            total_literals: 0,
            literals_divisor: 0,
            min_offset: -1,
            max_offset: 0,
            total_offsets: 0,
            match_divisor: 0,
            min_match_len: -1,
            max_match_len: 0,
            total_match_lens: 0,
            min_rle1_len: -1,
            max_rle1_len: 0,
            total_rle1_lens: 0,
            rle1_divisor: 0,
            min_rle2_len: -1,
            max_rle2_len: 0,
            total_rle2_lens: 0,
            rle2_divisor: 0,
            safe_dist: 0,
            num_rep_matches: 0,
            commands_divisor: 0,
        }
    }

    /// Record one literal run of `len` bytes (0 is valid for the final run
    /// of the last block).
    pub(crate) fn record_literal_run(&mut self, len: usize) {
        let len = len as i32;
        if len < self.min_literals || self.min_literals == -1 {
            self.min_literals = len;
        }
        if len > self.max_literals {
            self.max_literals = len;
        }
        self.total_literals += i64::from(len);
        self.literals_divisor += 1;
    }

    /// Record one emitted match command.
    pub(crate) fn record_match(&mut self, offset: u32, len: usize) {
        let offset = offset as i32;
        let len = len as i32;

        if offset < self.min_offset || self.min_offset == -1 {
            self.min_offset = offset;
        }
        if offset > self.max_offset {
            self.max_offset = offset;
        }
        self.total_offsets += i64::from(offset);

        if len < self.min_match_len || self.min_match_len == -1 {
            self.min_match_len = len;
        }
        if len > self.max_match_len {
            self.max_match_len = len;
        }
        self.total_match_lens += i64::from(len);
        self.match_divisor += 1;

        if offset == 1 {
            if len < self.min_rle1_len || self.min_rle1_len == -1 {
                self.min_rle1_len = len;
            }
            if len > self.max_rle1_len {
                self.max_rle1_len = len;
            }
            self.total_rle1_lens += i64::from(len);
            self.rle1_divisor += 1;
        } else if offset == 2 {
            if len < self.min_rle2_len || self.min_rle2_len == -1 {
                self.min_rle2_len = len;
            }
            if len > self.max_rle2_len {
                self.max_rle2_len = len;
            }
            self.total_rle2_lens += i64::from(len);
            self.rle2_divisor += 1;
        }
    }
}
