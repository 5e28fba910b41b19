//! Command-reducing post-pass over the chosen parse.
//!
//! The forward parser decides with per-position knowledge; a few wins only
//! become visible once whole command boundaries are fixed.  This pass
//! rewrites `best_match` in place, left to right, applying greedily:
//!
//! 1. absorb a trailing literal into the following match when lengthening
//!    the match is free,
//! 2. retarget a match's offset onto the running rep offset when the payload
//!    allows it,
//! 3. retarget a match's offset onto the *next* match's offset so the next
//!    one becomes a rep-match (with a partial variant that trades the tail
//!    of the match for literals when the bit count says so),
//! 4. turn short matches back into literals when merging the surrounding
//!    runs is cheaper,
//! 5. join back-to-back matches into one when a single length code is at
//!    least as cheap and the payload still matches.
//!
//! The driver re-runs the pass until it reports no change (bounded at 20
//! iterations).

use crate::config::{LEAVE_ALONE_MATCH_SIZE, MAX_VARLEN};
use crate::format::{BLOCK_FLAG_FIRST, TOKEN_SIZE};
use crate::shrink::cost::{
    literals_run_bits, match_len_bits_norep, match_len_bits_rep, offset_bits,
};

/// One slot of the chosen parse.  `length == 0` marks a literal position,
/// `-1` a position consumed by a joined match, and `≥ 1` a match starting
/// here.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct FinalMatch {
    pub length: i32,
    pub offset: u32,
}

/// Bits of a full match command (token, offset if not a rep, length code).
#[inline]
fn match_command_bits(offset: u32, length: i32, is_rep: bool) -> u32 {
    if is_rep {
        TOKEN_SIZE + match_len_bits_rep(length - 2)
    } else {
        TOKEN_SIZE + offset_bits(offset) + match_len_bits_norep(length - 2)
    }
}

/// One reduction pass over `best_match` (indexed relative to `start`).
/// Returns whether anything changed.
///
/// `best_match` must extend one zeroed slot past `end − start`; the join
/// rule probes the slot just after a block-final match.
pub fn reduce_commands(
    window: &[u8],
    best_match: &mut [FinalMatch],
    start: usize,
    end: usize,
    initial_rep_offset: u32,
    block_flags: u32,
) -> bool {
    debug_assert!(best_match.len() > end - start);
    let first_block = block_flags & BLOCK_FLAG_FIRST != 0;
    let mut num_literals: usize = usize::from(first_block);
    let mut rep_match_offset = initial_rep_offset;
    let mut follows_literal = false;
    let mut did_reduce = false;

    let mut i = start + usize::from(first_block);
    while i < end {
        // ── Rule 1: absorb a literal into the following match ────────────
        if follows_literal && best_match[i - start].length == 0 && i + 1 < end {
            let next = best_match[i + 1 - start];
            if next.length >= 2
                && (next.length as usize) < MAX_VARLEN
                && next.offset != 0
                && i >= next.offset as usize
                && i + next.length as usize + 1 <= end
                && window[i - next.offset as usize..i - next.offset as usize + next.length as usize + 1]
                    == window[i..i + next.length as usize + 1]
            {
                let is_rep = rep_match_offset != 0 && next.offset == rep_match_offset;
                let (cur_len_bits, grown_len_bits) = if is_rep {
                    (
                        match_len_bits_rep(next.length - 2),
                        match_len_bits_rep(next.length - 1),
                    )
                } else {
                    (
                        match_len_bits_norep(next.length - 2),
                        match_len_bits_norep(next.length - 1),
                    )
                };

                if grown_len_bits as i32 - cur_len_bits as i32 <= 8 {
                    best_match[i - start] = FinalMatch {
                        length: next.length + 1,
                        offset: next.offset,
                    };
                    best_match[i + 1 - start] = FinalMatch::default();
                    did_reduce = true;
                    follows_literal = false;
                    continue;
                }
            }
        }

        let current = best_match[i - start];

        if current.length >= 2 {
            let match_len = current.length as usize;

            if follows_literal && i + match_len < end {
                // A match between other commands; find the command after it.
                let mut next_index = i + match_len;
                let mut next_literals = 0usize;
                while next_index < end && best_match[next_index - start].length == 0 {
                    next_literals += 1;
                    next_index += 1;
                }

                if next_index < end && best_match[next_index - start].length >= 2 {
                    // ── Rule 2: retarget onto the running rep offset ──────
                    {
                        let m = best_match[i - start];
                        let next = best_match[next_index - start];
                        if rep_match_offset != 0
                            && m.offset != rep_match_offset
                            && (next.offset != m.offset
                                || next.offset == rep_match_offset
                                || offset_bits(m.offset) > offset_bits(next.offset))
                        {
                            let rep = rep_match_offset as usize;
                            if i >= rep
                                && i >= m.offset as usize
                                && i - rep + match_len <= end
                                && window[i - rep..i - rep + match_len]
                                    == window
                                        [i - m.offset as usize..i - m.offset as usize + match_len]
                            {
                                best_match[i - start].offset = rep_match_offset;
                                did_reduce = true;
                            }
                        }
                    }

                    // ── Rule 3: retarget onto the next match's offset ─────
                    {
                        let m = best_match[i - start];
                        let next = best_match[next_index - start];
                        if next.offset != 0
                            && m.offset != next.offset
                            && rep_match_offset != next.offset
                            && next_literals > 0
                        {
                            let next_off = next.offset as usize;
                            if i >= next_off
                                && i - next_off + match_len <= end
                                && m.offset != rep_match_offset
                            {
                                let mut max_len = 0usize;
                                while max_len < match_len
                                    && window[i - next_off + max_len]
                                        == window[i - m.offset as usize + max_len]
                                {
                                    max_len += 1;
                                }
                                if max_len >= match_len {
                                    best_match[i - start].offset = next.offset;
                                    did_reduce = true;
                                } else if max_len >= 2 {
                                    // Partial: a shorter rep-match plus extra
                                    // literals, kept only when the bits say so.
                                    let before = match_len_bits_norep(m.length - 2)
                                        + offset_bits(m.offset)
                                        + literals_run_bits(next_literals as u32);
                                    let after = match_len_bits_rep(max_len as i32 - 2)
                                        + literals_run_bits(
                                            (next_literals + match_len - max_len) as u32,
                                        )
                                        + (((match_len - max_len) as u32) << 3);
                                    if after < before {
                                        best_match[i - start].offset = next.offset;
                                        for p in max_len..match_len {
                                            best_match[i + p - start].length = 0;
                                        }
                                        best_match[i - start].length = max_len as i32;
                                        did_reduce = true;
                                    }
                                }
                            }
                        }
                    }

                    // ── Rule 4: short match back into literals ────────────
                    let m = best_match[i - start];
                    if m.length < 9 {
                        let next = best_match[next_index - start];

                        let mut cur_cost = 0u32;
                        if num_literals != 0 {
                            cur_cost += literals_run_bits(num_literals as u32)
                                + ((num_literals as u32) << 3);
                        }
                        cur_cost += match_command_bits(
                            m.offset,
                            m.length,
                            rep_match_offset != 0
                                && m.offset == rep_match_offset
                                && num_literals != 0,
                        );

                        let mut next_cost = 0u32;
                        if next_literals != 0 {
                            next_cost += literals_run_bits(next_literals as u32)
                                + ((next_literals as u32) << 3);
                        }
                        next_cost += match_command_bits(
                            next.offset,
                            next.length,
                            m.offset != 0 && next.offset == m.offset && next_literals != 0,
                        );

                        let original_cost = cur_cost + next_cost;

                        let merged_literals =
                            num_literals + m.length as usize + next_literals;
                        let mut reduced_cost = (m.length as u32) << 3;
                        reduced_cost += literals_run_bits(merged_literals as u32);
                        reduced_cost += ((num_literals + next_literals) as u32) << 3;
                        reduced_cost += match_command_bits(
                            next.offset,
                            next.length,
                            rep_match_offset != 0
                                && next.offset == rep_match_offset
                                && merged_literals != 0,
                        );

                        if original_cost >= reduced_cost {
                            for p in 0..m.length as usize {
                                best_match[i + p - start].length = 0;
                            }
                            did_reduce = true;
                            follows_literal = false;
                            continue;
                        }
                    }
                }
            }

            // ── Rule 5: join back-to-back matches ─────────────────────────
            let m = best_match[i - start];
            let match_len = m.length as usize;
            if i + match_len <= end && m.offset > 0 && m.length >= 2 {
                let second = best_match[i + match_len - start];
                if second.offset > 0
                    && second.length >= 2
                    && (m.length + second.length) as usize >= LEAVE_ALONE_MATCH_SIZE
                    && (m.length + second.length) as usize <= MAX_VARLEN
                    && i + match_len > m.offset as usize
                    && i + match_len > second.offset as usize
                    && i + match_len + second.length as usize <= end
                    && window[i - m.offset as usize + match_len
                        ..i - m.offset as usize + match_len + second.length as usize]
                        == window[i + match_len - second.offset as usize
                            ..i + match_len - second.offset as usize + second.length as usize]
                {
                    let mut next_index = i + match_len + second.length as usize;
                    let mut next_literals = 0usize;
                    while next_index < end && best_match[next_index - start].length == 0 {
                        next_index += 1;
                        next_literals += 1;
                    }

                    let first_is_rep = rep_match_offset != 0
                        && m.offset == rep_match_offset
                        && num_literals != 0;

                    let mut cur_cost = match_command_bits(m.offset, m.length, first_is_rep);
                    cur_cost += match_command_bits(second.offset, second.length, false);

                    let mut joined_cost =
                        match_command_bits(m.offset, m.length + second.length, first_is_rep);

                    let mut cannot_reduce = false;
                    if next_index < end {
                        let following = best_match[next_index - start];

                        cur_cost += match_command_bits(
                            following.offset,
                            following.length,
                            second.offset != 0
                                && following.offset == second.offset
                                && next_literals != 0,
                        );

                        if m.offset != 0 && following.offset == m.offset && next_literals != 0 {
                            joined_cost += match_command_bits(following.offset, following.length, true);
                        } else if following.length >= 2 {
                            joined_cost +=
                                match_command_bits(following.offset, following.length, false);
                        } else {
                            cannot_reduce = true;
                        }
                    }

                    if cur_cost >= joined_cost && !cannot_reduce {
                        best_match[i - start].length += second.length;
                        best_match[i + match_len - start] = FinalMatch {
                            length: -1,
                            offset: 0,
                        };
                        did_reduce = true;
                        follows_literal = false;
                        continue;
                    }
                }
            }

            let m = best_match[i - start];
            rep_match_offset = m.offset;
            i += m.length as usize;
            num_literals = 0;
            follows_literal = false;
        } else if current.length == 1 {
            // A one-byte rep-match; fold it into the surrounding literal
            // runs when the three commands cost at least as much as one.
            if num_literals > 0 {
                let mut next_index = i + 1;
                let mut next_literals = 0usize;
                while next_index < end && best_match[next_index - start].length == 0 {
                    next_literals += 1;
                    next_index += 1;
                }

                if next_literals > 0 {
                    let cur_cost = literals_run_bits(num_literals as u32)
                        + TOKEN_SIZE
                        + match_len_bits_rep(current.length - 2)
                        + literals_run_bits(next_literals as u32);
                    let reduced_cost =
                        literals_run_bits((num_literals + 1 + next_literals) as u32) + 8;

                    if cur_cost >= reduced_cost {
                        best_match[i - start] = FinalMatch::default();
                        did_reduce = true;
                        continue;
                    }
                }
            }

            num_literals = 0;
            follows_literal = false;
            i += 1;
        } else {
            follows_literal = true;
            num_literals += 1;
            i += 1;
        }
    }

    did_reduce
}
