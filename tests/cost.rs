// Unit tests for the bit-cost model.
//
// Coverage:
//   - elias_gamma_bits at the power-of-two boundaries
//   - literals_run_bits including the empty run
//   - match_len_bits_norep / match_len_bits_rep including the encoded −1
//     case (one-byte rep-matches)
//   - offset_bits at the 128/129 boundary and further Elias steps

use zx0::shrink::cost::{
    elias_gamma_bits, literals_run_bits, match_len_bits_norep, match_len_bits_rep, offset_bits,
};

// ═════════════════════════════════════════════════════════════════════════════
// elias_gamma_bits
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn elias_one_is_single_bit() {
    assert_eq!(elias_gamma_bits(1), 1);
}

#[test]
fn elias_power_of_two_boundaries() {
    assert_eq!(elias_gamma_bits(2), 3);
    assert_eq!(elias_gamma_bits(3), 3);
    assert_eq!(elias_gamma_bits(4), 5);
    assert_eq!(elias_gamma_bits(7), 5);
    assert_eq!(elias_gamma_bits(8), 7);
    assert_eq!(elias_gamma_bits(255), 15);
    assert_eq!(elias_gamma_bits(256), 17);
}

#[test]
fn elias_matches_log_formula() {
    for value in 1u32..=4096 {
        assert_eq!(elias_gamma_bits(value), value.ilog2() * 2 + 1, "value {value}");
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// literals_run_bits
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn literal_run_zero_costs_nothing() {
    assert_eq!(literals_run_bits(0), 0);
}

#[test]
fn literal_run_token_plus_elias() {
    assert_eq!(literals_run_bits(1), 1 + 1);
    assert_eq!(literals_run_bits(2), 1 + 3);
    assert_eq!(literals_run_bits(4), 1 + 5);
    assert_eq!(literals_run_bits(255), 1 + 15);
}

// ═════════════════════════════════════════════════════════════════════════════
// match length codes
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn norep_length_carries_len_minus_one() {
    // encoded_len = actual − 2; the wire carries actual − 1.
    assert_eq!(match_len_bits_norep(0), elias_gamma_bits(1)); // actual 2
    assert_eq!(match_len_bits_norep(1), elias_gamma_bits(2)); // actual 3
    assert_eq!(match_len_bits_norep(5), elias_gamma_bits(6)); // actual 7
}

#[test]
fn rep_length_carries_len_directly() {
    assert_eq!(match_len_bits_rep(-1), elias_gamma_bits(1)); // actual 1
    assert_eq!(match_len_bits_rep(0), elias_gamma_bits(2)); // actual 2
    assert_eq!(match_len_bits_rep(5), elias_gamma_bits(7)); // actual 7
}

#[test]
fn rep_code_is_never_cheaper_than_norep_for_same_length() {
    for actual in 2i32..200 {
        assert!(
            match_len_bits_rep(actual - 2) >= match_len_bits_norep(actual - 2),
            "actual {actual}"
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// offset_bits
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn short_offsets_cost_eight_bits() {
    assert_eq!(offset_bits(1), 8);
    assert_eq!(offset_bits(64), 8);
    assert_eq!(offset_bits(128), 8);
}

#[test]
fn offset_cost_grows_at_high_part_boundaries() {
    // 129 → high part 2 → 7 + 3
    assert_eq!(offset_bits(129), 10);
    assert_eq!(offset_bits(256), 10);
    // 257 → high part 3 → still 3 Elias bits
    assert_eq!(offset_bits(257), 10);
    // 385 → high part 4 → 7 + 5
    assert_eq!(offset_bits(385), 12);
    // format maximum, high part 255 → 7 + 15
    assert_eq!(offset_bits(32_640), 22);
}

#[test]
fn short_offset_formula_is_continuous() {
    // The flat 8 for offsets ≤ 128 equals the general 7 + elias(high) form.
    for offset in 1u32..=128 {
        assert_eq!(7 + elias_gamma_bits(((offset - 1) >> 7) + 1), 8, "offset {offset}");
    }
}
