//! Hash-chain match source.
//!
//! Supplies the parser's raw match candidates: for every position of the
//! block, up to [`NMATCHES_PER_INDEX`]` − 1` back-references, longest first,
//! found by walking a most-recent-first hash chain over 3-byte keys.  The
//! chain covers the whole window, so candidates may reach into the retained
//! bytes of the previous block (or a pre-seeded dictionary).
//!
//! Short (two-byte) matches and offsets only worth reaching once a rep-chain
//! exists are deliberately out of scope here; the augmentation passes in
//! [`crate::shrink::matches`] supply those.

use crate::config::{LCP_MAX, MATCH_FINDER_MAX_ATTEMPTS, NMATCHES_PER_INDEX};
use crate::shrink::matches::{match_length, Match, MatchTable};

/// log2 of the hash-table size.
const HASH_LOG: u32 = 15;
const HASH_TABLE_SIZE: usize = 1 << HASH_LOG;

/// Smallest match length the finder reports.
const MIN_FINDER_MATCH: usize = 3;

/// Knuth multiplicative hash over the 3 bytes at `pos`.
#[inline(always)]
fn hash3(window: &[u8], pos: usize) -> usize {
    let v = u32::from(window[pos])
        | u32::from(window[pos + 1]) << 8
        | u32::from(window[pos + 2]) << 16;
    (v.wrapping_mul(2_654_435_761) >> (32 - HASH_LOG)) as usize
}

/// Hash-chain search tables over one input window.
pub struct MatchFinder {
    /// Hash → most recent window position, or −1.
    head: Vec<i32>,
    /// Window position → previous position with the same hash, or −1.
    prev: Vec<i32>,
    /// Next window position to thread into the tables.
    next_to_index: usize,
    /// Candidate accumulator reused across positions.
    scratch: Vec<Match>,
}

impl MatchFinder {
    pub fn new(max_window_size: usize) -> Self {
        MatchFinder {
            head: vec![-1; HASH_TABLE_SIZE],
            prev: vec![-1; max_window_size],
            next_to_index: 0,
            scratch: Vec::with_capacity(NMATCHES_PER_INDEX * 4),
        }
    }

    /// Forget the previous window; the next block starts a fresh chain set.
    pub fn reset(&mut self) {
        self.head.fill(-1);
        self.next_to_index = 0;
    }

    /// Thread window positions `[next_to_index, target)` into the tables.
    fn index_up_to(&mut self, window: &[u8], target: usize) {
        let limit = target.min(window.len().saturating_sub(MIN_FINDER_MATCH - 1));
        while self.next_to_index < limit {
            let h = hash3(window, self.next_to_index);
            self.prev[self.next_to_index] = self.head[h];
            self.head[h] = self.next_to_index as i32;
            self.next_to_index += 1;
        }
        if target > self.next_to_index {
            self.next_to_index = target;
        }
    }

    /// Index the prefix `[from, to)` without querying it (previous-block or
    /// dictionary bytes).
    pub fn skip(&mut self, window: &[u8], from: usize, to: usize) {
        debug_assert!(from == self.next_to_index);
        self.index_up_to(window, to);
    }

    /// Populate the match rows for positions `[from, to)` of the window.
    pub fn find_all_matches(
        &mut self,
        window: &[u8],
        table: &mut MatchTable,
        from: usize,
        to: usize,
        max_offset: usize,
    ) {
        for pos in from..to {
            table.clear_row(pos - from);
            self.index_up_to(window, pos);

            if pos + MIN_FINDER_MATCH > window.len() {
                continue;
            }

            let limit = (window.len() - pos).min(LCP_MAX);
            self.scratch.clear();
            let mut best_len = MIN_FINDER_MATCH - 1;
            let mut attempts = MATCH_FINDER_MAX_ATTEMPTS;
            let mut candidate = self.head[hash3(window, pos)];

            while candidate >= 0 && attempts > 0 {
                let match_pos = candidate as usize;
                let offset = pos - match_pos;
                if offset > max_offset {
                    // Chain positions only get older; every further offset
                    // is longer still.
                    break;
                }

                let len = match_length(window, match_pos, pos, limit);
                if len > best_len {
                    best_len = len;
                    self.scratch.push(Match {
                        length: len as u16,
                        offset: offset as u16,
                    });
                    if len >= limit {
                        break;
                    }
                }

                candidate = self.prev[match_pos];
                attempts -= 1;
            }

            // Longest first; the tail of the walk found the longest ones.
            let keep = self.scratch.len().min(NMATCHES_PER_INDEX - 1);
            let row = MatchTable::row_base(pos - from);
            for (slot, m) in self.scratch.iter().rev().take(keep).enumerate() {
                table.matches[row + slot] = *m;
                table.depths[row + slot] = 0;
            }
        }
    }
}
