//! Multi-arrival forward optimal parser.
//!
//! The parser sweeps each block once per pass, carrying per-position
//! *arrival sets*: the cheapest known partial parses reaching that position,
//! distinguished by their most-recent rep offset.  Three extension kinds
//! feed the sets:
//!
//! - literal extension into the next position,
//! - with-offset match extension for every candidate `(offset, length)` in
//!   the position's match row (and every useful truncation of it),
//! - rep-match extension reusing an arrival's rep offset, allowed only after
//!   at least one literal.
//!
//! Arrival sets are kept sorted by cost (score breaks ties) and hold at most
//! one entry per rep offset.  The first pass runs at half capacity and feeds
//! newly discovered offsets to [`insert_forward_match`], which plants
//! synthetic match-table entries at earlier rep positions so the second,
//! full-capacity pass can chain rep-matches the raw match source never
//! surfaces.  The second pass ends with a traceback that writes the chosen
//! command at each start position into `best_match`.

use crate::config::{
    LCP_MAX, LEAVE_ALONE_MATCH_SIZE, NARRIVALS_PER_POSITION, NMATCHES_PER_INDEX,
};
use crate::format::{BLOCK_FLAG_FIRST, TOKEN_SIZE};
use crate::shrink::cost::{
    literals_run_bits, match_len_bits_norep, match_len_bits_rep, offset_bits,
};
use crate::shrink::matches::{
    match_length, Match, MatchTable, DEPTH_FLAG_PENALTY, DEPTH_MASK,
};
use crate::shrink::Compressor;

// ─────────────────────────────────────────────────────────────────────────────
// Arrival state
// ─────────────────────────────────────────────────────────────────────────────

/// Back-pointer of an arrival.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum ArrivalSource {
    /// Vacant slot.
    #[default]
    Empty,
    /// The block-start state.
    Start,
    /// Reached from slot `slot` of the arrival set at position `pos`.
    Prev { pos: u32, slot: u16 },
}

/// Cost value stored in vacant slots; larger than any reachable real cost,
/// so the threshold comparisons of the insertion rule need no special case.
pub const VACANT_COST: u32 = 0x4000_0000;

/// One dynamic-programming state: a candidate parse of the block prefix
/// ending at this arrival's position.
#[derive(Clone, Copy, Debug)]
pub struct Arrival {
    /// Accumulated bit cost from the block start.
    pub cost: u32,
    /// Secondary tiebreak approximating decoder-side command effort.
    pub score: u32,
    /// Offset a rep-match emitted next would reuse.
    pub rep_offset: u32,
    /// Position at which `rep_offset` was last established.
    pub rep_pos: u32,
    pub source: ArrivalSource,
    /// 0 when reached by a literal, otherwise the length of the arriving
    /// match.
    pub match_len: u16,
    /// Length of the literal run ending here (0 when reached by a match).
    pub num_literals: u32,
}

impl Arrival {
    /// A vacant slot.
    pub const fn vacant() -> Self {
        Arrival {
            cost: VACANT_COST,
            score: 0,
            rep_offset: 0,
            rep_pos: 0,
            source: ArrivalSource::Empty,
            match_len: 0,
            num_literals: 0,
        }
    }
}

/// Per-position dedupe marks used by [`insert_forward_match`].
#[derive(Clone, Copy, Default, Debug)]
pub struct Visited {
    pub inner: u32,
    pub outer: u32,
}

/// Penalty added when a parse branch switches between literal and match
/// emission.  The format carries no explicit mode switch, so this is zero;
/// it is kept as a named term because both extension costs account for it.
const MODE_SWITCH_PENALTY: u32 = 0;

// ─────────────────────────────────────────────────────────────────────────────
// Arrival-set insertion
// ─────────────────────────────────────────────────────────────────────────────

/// Insert `cand` into the destination arrival set, preserving cost order,
/// score tiebreak and rep-offset uniqueness.
///
/// `dest` is the full [`NARRIVALS_PER_POSITION`]-slot row; only the first
/// `n_arrivals` slots are in use this pass.  With-offset insertions pass
/// `reserve_last` so one tail slot stays available for the rep-match arrival
/// the same source will produce.
///
/// The caller must already have checked `cand` against the pass's worst
/// retained slot; this function only resolves placement and deduplication.
fn insert_arrival(dest: &mut [Arrival], n_arrivals: usize, reserve_last: bool, cand: Arrival) {
    let max_slot = n_arrivals - usize::from(reserve_last);
    let rep_offset = cand.rep_offset;

    // Slots strictly cheaper than the candidate: an entry with the same rep
    // offset there dominates the candidate outright.
    let mut n = 0;
    while dest[n].cost < cand.cost {
        if dest[n].rep_offset == rep_offset {
            return;
        }
        n += 1;
    }
    // Equal-cost slots with a better or equal score sort before it.
    while dest[n].cost == cand.cost && cand.score >= dest[n].score {
        if dest[n].rep_offset == rep_offset {
            return;
        }
        n += 1;
    }

    if n >= max_slot {
        return;
    }

    // Remaining equal-cost slots after the insertion point.
    let mut nn = n;
    while nn < n_arrivals && dest[nn].cost == cand.cost {
        if dest[nn].rep_offset == rep_offset {
            return;
        }
        nn += 1;
    }

    // Shift the tail right, dropping either the first vacant slot, the worst
    // slot, or a costlier entry carrying the same rep offset.
    let mut z = n;
    while z < n_arrivals - 1 && dest[z].source != ArrivalSource::Empty {
        if dest[z].rep_offset == rep_offset {
            break;
        }
        z += 1;
    }
    dest.copy_within(n..z, n + 1);
    dest[n] = cand;
}

// ─────────────────────────────────────────────────────────────────────────────
// Forward rep-offset propagation
// ─────────────────────────────────────────────────────────────────────────────

/// Propagate a newly discovered `match_offset` to positions where an
/// outstanding rep could have used it.
///
/// For every arrival at `pos` that follows a literal run with a different
/// rep offset, the position that established that rep offset is a candidate:
/// if its byte also matches at `match_offset`, a synthetic match-table entry
/// is planted there so the next parser pass can establish `match_offset`
/// earlier and turn the match at `pos` into a rep-match.  Propagation
/// continues transitively through an explicit work stack, bounded at depth 9.
pub fn insert_forward_match(
    ctx: &mut Compressor,
    window: &[u8],
    pos: usize,
    match_offset: u32,
    start: usize,
    end: usize,
    initial_depth: u32,
) {
    let mut work = std::mem::take(&mut ctx.rep_work);
    work.clear();
    work.push((pos as u32, initial_depth));

    while let Some((p, depth)) = work.pop() {
        propagate_rep_target(ctx, window, p as usize, match_offset, start, end, depth, &mut work);
    }

    ctx.rep_work = work;
}

#[allow(clippy::too_many_arguments)]
fn propagate_rep_target(
    ctx: &mut Compressor,
    window: &[u8],
    pos: usize,
    match_offset: u32,
    start: usize,
    end: usize,
    depth: u32,
    work: &mut Vec<(u32, u32)>,
) {
    let base = (pos - start) * NARRIVALS_PER_POSITION;

    for j in 0..NARRIVALS_PER_POSITION {
        let arrival = ctx.arrivals[base + j];
        if arrival.source == ArrivalSource::Empty {
            break;
        }
        if arrival.num_literals == 0 {
            continue;
        }
        let rep_offset = arrival.rep_offset;
        if rep_offset == 0 || rep_offset == match_offset {
            continue;
        }

        let rep_pos = arrival.rep_pos as usize;
        if rep_pos < start || rep_pos + 1 >= end {
            continue;
        }
        if ctx.visited[rep_pos - start].outer == match_offset {
            continue;
        }
        ctx.visited[rep_pos - start].outer = match_offset;

        if ctx.visited[rep_pos - start].inner == match_offset || rep_pos < match_offset as usize {
            continue;
        }
        let row = MatchTable::row_base(rep_pos - start);
        if ctx.match_table.matches[row + NMATCHES_PER_INDEX - 1].length != 0 {
            // The row is saturated with real matches; enumeration already
            // covers this position.
            continue;
        }
        let offset = match_offset as usize;
        if window[rep_pos] != window[rep_pos - offset] {
            continue;
        }
        ctx.visited[rep_pos - start].inner = match_offset;

        let max_rep_len = (end - rep_pos).min(LCP_MAX);
        let min_len =
            (ctx.rle[rep_pos - offset].min(ctx.rle[rep_pos]) as usize).min(max_rep_len);
        let rep_len = min_len
            + match_length(
                window,
                rep_pos - offset + min_len,
                rep_pos + min_len,
                max_rep_len - min_len,
            );

        let mut slot = 0;
        let mut handled = false;
        while ctx.match_table.matches[row + slot].length != 0 {
            if u32::from(ctx.match_table.matches[row + slot].offset) == match_offset {
                if usize::from(ctx.match_table.matches[row + slot].length) < rep_len
                    && ctx.match_table.depths[row + slot] & DEPTH_MASK == 0
                {
                    ctx.match_table.matches[row + slot].length = rep_len as u16;
                    ctx.match_table.depths[row + slot] = 0;
                }
                handled = true;
                break;
            }
            slot += 1;
        }

        if !handled {
            ctx.match_table.matches[row + slot] = Match {
                length: rep_len as u16,
                offset: match_offset as u16,
            };
            ctx.match_table.depths[row + slot] = 0;

            if depth < 9 {
                work.push((rep_pos as u32, depth + 1));
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Forward parse
// ─────────────────────────────────────────────────────────────────────────────

/// One parser pass over `[start, end)` of the window.
///
/// `arrivals_per_position` is the effective set capacity this pass (the
/// physical stride stays [`NARRIVALS_PER_POSITION`]).  When
/// `insert_forward_reps` is set, every enumerated offset is propagated via
/// [`insert_forward_match`] and no traceback happens; the final pass runs
/// with it clear and writes the chosen parse into `ctx.best_match`.
#[allow(clippy::too_many_arguments)]
pub fn optimize_forward(
    ctx: &mut Compressor,
    window: &[u8],
    start: usize,
    end: usize,
    insert_forward_reps: bool,
    cur_rep_offset: u32,
    arrivals_per_position: usize,
    block_flags: u32,
) {
    const STRIDE: usize = NARRIVALS_PER_POSITION;

    if end - start > ctx.block_size {
        return;
    }

    let used_slots = (end - start + 1) * STRIDE;
    ctx.arrivals[..used_slots].fill(Arrival::vacant());
    ctx.arrivals[0] = Arrival {
        cost: 0,
        score: 0,
        rep_offset: cur_rep_offset,
        rep_pos: 0,
        source: ArrivalSource::Start,
        match_len: 0,
        num_literals: 0,
    };

    if insert_forward_reps {
        ctx.visited[..end - start].fill(Visited::default());
    }

    for i in start..end {
        let base = (i - start) * STRIDE;

        let mut cur = [Arrival::vacant(); STRIDE];
        cur.copy_from_slice(&ctx.arrivals[base..base + STRIDE]);

        let mut num_live = 0;
        while num_live < arrivals_per_position
            && cur[num_live].source != ArrivalSource::Empty
        {
            num_live += 1;
        }

        // ── Literal extension into i + 1 ─────────────────────────────────
        for (j, src) in cur.iter().enumerate().take(num_live) {
            let num_literals = src.num_literals + 1;
            let mut cost = src.cost + 8;
            if num_literals > 1 {
                cost -= literals_run_bits(num_literals - 1);
            }
            cost += literals_run_bits(num_literals);
            if num_literals == 1 {
                cost += MODE_SWITCH_PENALTY;
            }
            let score = src.score + 1;

            let dest = &mut ctx.arrivals[base + STRIDE..base + 2 * STRIDE];
            let worst = dest[arrivals_per_position - 1];
            if cost < worst.cost || (cost == worst.cost && score < worst.score) {
                insert_arrival(
                    dest,
                    arrivals_per_position,
                    false,
                    Arrival {
                        cost,
                        score,
                        rep_offset: src.rep_offset,
                        rep_pos: src.rep_pos,
                        source: ArrivalSource::Prev {
                            pos: i as u32,
                            slot: j as u16,
                        },
                        match_len: 0,
                        num_literals,
                    },
                );
            }
        }

        // The stream must open with a literal run.
        if i == start && block_flags & BLOCK_FLAG_FIRST != 0 {
            continue;
        }

        // ── Rep-match reach of every live arrival at this position ────────
        let mut rep_arrivals = [(0usize, 0usize); NARRIVALS_PER_POSITION];
        let mut num_rep_arrivals = 0;
        let mut overall_min_rep_len = 0usize;
        let mut overall_max_rep_len = 0usize;
        {
            let max_rep_len_for_pos = (end - i).min(LCP_MAX);
            for (j, src) in cur.iter().enumerate().take(num_live) {
                if src.num_literals == 0 {
                    continue;
                }
                let rep_offset = src.rep_offset as usize;
                if rep_offset == 0 || i < rep_offset {
                    continue;
                }
                if window[i] != window[i - rep_offset] {
                    continue;
                }
                let min_len = (ctx.rle[i - rep_offset].min(ctx.rle[i]) as usize)
                    .min(max_rep_len_for_pos);
                let rep_len = min_len
                    + match_length(
                        window,
                        i - rep_offset + min_len,
                        i + min_len,
                        max_rep_len_for_pos - min_len,
                    );
                if rep_len > overall_max_rep_len {
                    overall_max_rep_len = rep_len;
                }
                rep_arrivals[num_rep_arrivals] = (j, rep_len);
                num_rep_arrivals += 1;
            }
        }

        // ── Match extensions ──────────────────────────────────────────────
        let row = MatchTable::row_base(i - start);
        for m in 0..NMATCHES_PER_INDEX {
            let entry = ctx.match_table.matches[row + m];
            if entry.length == 0 {
                break;
            }
            let orig_len = usize::from(entry.length);
            let orig_offset = usize::from(entry.offset);
            let depth_word = ctx.match_table.depths[row + m];
            let orig_depth = usize::from(depth_word & DEPTH_MASK);
            let score_penalty = 3 + u32::from((depth_word & DEPTH_FLAG_PENALTY) >> 15);

            let variants = if orig_depth > 0 { 2 } else { 1 };
            for variant in 0..variants {
                let d = if variant == 0 { 0 } else { orig_depth };
                debug_assert!(d < orig_offset && d < orig_len);
                let match_offset = orig_offset - d;
                let mut match_len = orig_len - d;
                if i + match_len > end {
                    match_len = end - i;
                }

                if insert_forward_reps {
                    insert_forward_match(ctx, window, i, match_offset as u32, start, end, 0);
                }

                // Cheapest source arrival for a with-offset use of this
                // match; arrivals already carrying the same rep offset after
                // literals would double-count the offset.
                let mut no_rep_cost = offset_bits(match_offset as u32);
                let mut no_rep_score = 0;
                let mut no_rep_src = None;
                for (j, src) in cur.iter().enumerate().take(num_live) {
                    if match_offset as u32 != src.rep_offset || src.num_literals == 0 {
                        no_rep_cost += src.cost;
                        if src.num_literals == 0 {
                            no_rep_cost += MODE_SWITCH_PENALTY;
                        }
                        no_rep_score = src.score + score_penalty;
                        no_rep_src = Some(j);
                        break;
                    }
                }

                let starting_len = if match_len >= LEAVE_ALONE_MATCH_SIZE {
                    match_len
                } else {
                    1
                };

                for k in starting_len..=match_len {
                    let dest_base = base + k * STRIDE;

                    // With-offset candidate.
                    if k >= 2 {
                        if let Some(j) = no_rep_src {
                            let cost =
                                match_len_bits_norep(k as i32 - 2) + TOKEN_SIZE + no_rep_cost;
                            let dest = &mut ctx.arrivals[dest_base..dest_base + STRIDE];
                            let worst = dest[arrivals_per_position - 2];
                            if cost < worst.cost
                                || (cost == worst.cost && no_rep_score < worst.score)
                            {
                                insert_arrival(
                                    dest,
                                    arrivals_per_position,
                                    true,
                                    Arrival {
                                        cost,
                                        score: no_rep_score,
                                        rep_offset: match_offset as u32,
                                        rep_pos: i as u32,
                                        source: ArrivalSource::Prev {
                                            pos: i as u32,
                                            slot: j as u16,
                                        },
                                        match_len: k as u16,
                                        num_literals: 0,
                                    },
                                );
                            }
                        }
                    }

                    // Rep-match candidates, inserted once per k across the
                    // whole match row.
                    if k > overall_min_rep_len && k <= overall_max_rep_len {
                        let len_cost = match_len_bits_rep(k as i32 - 2) + TOKEN_SIZE;
                        if k <= LEAVE_ALONE_MATCH_SIZE {
                            overall_min_rep_len = k;
                        } else if overall_max_rep_len == k {
                            overall_max_rep_len -= 1;
                        }

                        for &(j, rep_len) in rep_arrivals.iter().take(num_rep_arrivals) {
                            if rep_len < k {
                                continue;
                            }
                            let src = &cur[j];
                            let cost = src.cost + len_cost;
                            let score = src.score + 2;
                            let dest = &mut ctx.arrivals[dest_base..dest_base + STRIDE];
                            let worst = dest[arrivals_per_position - 1];
                            if cost < worst.cost || (cost == worst.cost && score < worst.score)
                            {
                                insert_arrival(
                                    dest,
                                    arrivals_per_position,
                                    false,
                                    Arrival {
                                        cost,
                                        score,
                                        rep_offset: src.rep_offset,
                                        rep_pos: i as u32,
                                        source: ArrivalSource::Prev {
                                            pos: i as u32,
                                            slot: j as u16,
                                        },
                                        match_len: k as u16,
                                        num_literals: 0,
                                    },
                                );
                            } else {
                                // Rep sources are cost-ordered; later ones
                                // cannot pass the threshold either.
                                break;
                            }
                        }
                    }
                }
            }

            if orig_len >= 512 {
                break;
            }
        }
    }

    // ── Traceback (final pass only) ──────────────────────────────────────
    if !insert_forward_reps {
        let mut index = (end - start) * STRIDE;
        while let ArrivalSource::Prev { pos, slot } = ctx.arrivals[index].source {
            let arrival = ctx.arrivals[index];
            let from_pos = pos as usize;
            if from_pos >= end {
                break;
            }
            let rel = from_pos - start;
            ctx.best_match[rel].length = i32::from(arrival.match_len);
            ctx.best_match[rel].offset = if arrival.match_len > 0 {
                arrival.rep_offset
            } else {
                0
            };
            index = rel * STRIDE + usize::from(slot);
        }
    }
}
