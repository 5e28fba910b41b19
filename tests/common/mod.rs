// Shared test support: a reference ZX0 decoder (bit-exact mirror of the
// emitter's stream layout) and deterministic corpus generators.
//
// Decompression is deliberately not a library feature; this decoder exists
// only so the tests can prove round-trips.

#![allow(dead_code)]

// ─────────────────────────────────────────────────────────────────────────────
// Bit reader
// ─────────────────────────────────────────────────────────────────────────────

/// Mirror of the emitter's cursor: carrier bytes are consumed lazily from the
/// byte stream the moment a bit is needed and none is open, so raw bytes
/// (literals, low-offset bytes) interleave at exactly the positions the
/// writer allocated them.
pub struct BitReader<'a> {
    data: &'a [u8],
    pub pos: usize,
    bit_byte: Option<usize>,
    bit_shift: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            pos: 0,
            bit_byte: None,
            bit_shift: 0,
        }
    }

    pub fn bit(&mut self) -> u8 {
        let index = match self.bit_byte {
            Some(index) => index,
            None => {
                let index = self.pos;
                self.pos += 1;
                self.bit_byte = Some(index);
                self.bit_shift = 7;
                index
            }
        };
        let bit = (self.data[index] >> self.bit_shift) & 1;
        if self.bit_shift == 0 {
            self.bit_byte = None;
        } else {
            self.bit_shift -= 1;
        }
        bit
    }

    pub fn byte(&mut self) -> u8 {
        let value = self.data[self.pos];
        self.pos += 1;
        value
    }

    /// Interleaved Elias-gamma: value starts at 1; each 0 control bit is
    /// followed by one data bit; a 1 control bit terminates.
    pub fn elias(&mut self, inverted: bool) -> u32 {
        let mut value = 1u32;
        while self.bit() == 0 {
            let data = self.bit() ^ u8::from(inverted);
            value = value << 1 | u32::from(data);
        }
        value
    }

    /// Elias-gamma whose first control bit was carried in another byte's LSB.
    pub fn elias_with_first(&mut self, first_control: u8) -> u32 {
        let mut value = 1u32;
        let mut control = first_control;
        while control == 0 {
            let data = self.bit();
            value = value << 1 | u32::from(data);
            control = self.bit();
        }
        value
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reference decoder
// ─────────────────────────────────────────────────────────────────────────────

fn copy_match(out: &mut Vec<u8>, offset: usize, len: usize) {
    assert!(offset >= 1 && offset <= out.len(), "offset out of range");
    for _ in 0..len {
        let byte = out[out.len() - offset];
        out.push(byte);
    }
}

/// Read one with-offset match.  Returns `false` on the end-of-data marker.
fn read_offset_match(
    reader: &mut BitReader<'_>,
    out: &mut Vec<u8>,
    last_offset: &mut usize,
    inverted: bool,
) -> bool {
    let high = reader.elias(inverted);
    if high == 256 {
        return false;
    }
    let low_byte = reader.byte();
    *last_offset = ((high as usize - 1) << 7) + (127 - usize::from(low_byte >> 1)) + 1;
    let len = reader.elias_with_first(low_byte & 1) as usize + 1;
    copy_match(out, *last_offset, len);
    true
}

/// Decode a whole stream produced by `zx0::compress`.  `dict` pre-seeds the
/// output window (it is not part of the returned payload).
pub fn decompress(data: &[u8], inverted: bool, dict: &[u8]) -> Vec<u8> {
    // An empty payload compresses to the end marker alone, which the
    // literals-first state machine below cannot represent; probe for it.
    if !data.is_empty() {
        let mut probe = BitReader::new(data);
        if probe.bit() == 1 && probe.elias(inverted) == 256 && probe.pos == data.len() {
            return Vec::new();
        }
    }

    let mut out = dict.to_vec();
    let mut reader = BitReader::new(data);
    let mut last_offset = 1usize;
    let mut in_literal_state = true;

    loop {
        if in_literal_state {
            let run = reader.elias(false) as usize;
            for _ in 0..run {
                let byte = reader.byte();
                out.push(byte);
            }
            if reader.bit() == 0 {
                // Rep-match: reuse the last offset; the code carries the
                // length directly.
                let len = reader.elias(false) as usize;
                copy_match(&mut out, last_offset, len);
            } else if !read_offset_match(&mut reader, &mut out, &mut last_offset, inverted) {
                break;
            }
            in_literal_state = false;
        } else if reader.bit() == 0 {
            in_literal_state = true;
        } else if !read_offset_match(&mut reader, &mut out, &mut last_offset, inverted) {
            break;
        }
    }

    out.split_off(dict.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Compress into a fresh buffer sized by `compress_bound`.
pub fn compress_to_vec(input: &[u8], flags: u32, max_window: usize, dict_size: usize) -> Vec<u8> {
    let mut output = vec![0u8; zx0::compress_bound(input.len())];
    let size = zx0::compress(input, &mut output, flags, max_window, dict_size, None, None)
        .expect("compression failed");
    output.truncate(size);
    output
}

/// Assert that `input` survives compress→decompress in both bitstream
/// variants and stays within the size bound.
pub fn assert_roundtrip(input: &[u8]) {
    for flags in [0, zx0::FLG_IS_INVERTED] {
        let compressed = compress_to_vec(input, flags, 0, 0);
        assert!(
            compressed.len() <= zx0::compress_bound(input.len()),
            "bound exceeded for len {}",
            input.len()
        );
        let decoded = decompress(&compressed, flags != 0, &[]);
        assert_eq!(decoded, input, "round-trip mismatch (flags {flags})");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Deterministic corpora
// ─────────────────────────────────────────────────────────────────────────────

/// Deterministic pseudo-random bytes (64-bit LCG, high byte taken).
pub fn lcg_bytes(mut seed: u64, len: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        out.push((seed >> 56) as u8);
    }
    out
}

/// Compressible text-like data: phrases repeated with pseudo-random
/// variation, so literals, matches and rep-matches all occur.
pub fn mixed_corpus(len: usize) -> Vec<u8> {
    const PHRASES: &[&[u8]] = &[
        b"the quick brown fox jumps over the lazy dog. ",
        b"pack my box with five dozen liquor jugs. ",
        b"sphinx of black quartz, judge my vow. ",
        b"0123456789",
        b"aaaaaaaaaaaaaaaa",
        b"ababababab",
    ];
    let mut out = Vec::with_capacity(len + 64);
    let mut seed = 0x5eed_u64;
    while out.len() < len {
        seed = seed
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        let pick = (seed >> 56) as usize % (PHRASES.len() + 1);
        if pick < PHRASES.len() {
            out.extend_from_slice(PHRASES[pick]);
        } else {
            out.push((seed >> 40) as u8);
        }
    }
    out.truncate(len);
    out
}
