//! Binary entry point for the `zx0r` command-line compressor.
//!
//! Reads the whole input file (optionally prefixed by a dictionary file as
//! pre-seeded context), compresses it as a single ZX0 stream and writes the
//! result.  With `-v`, the collected [`zx0::Stats`] are printed after the
//! summary line.

use std::fs;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use zx0::cli::{parse_args, ParseError, ParsedArgs, USAGE};
use zx0::{compress, compress_bound, Stats, FLG_IS_INVERTED};

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(ParseError::HelpRequested) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("zx0r: {err}");
            eprint!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("zx0r: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: ParsedArgs) -> Result<()> {
    let mut data = Vec::new();
    let mut dictionary_size = 0;

    if let Some(dict_path) = &args.dictionary {
        data = fs::read(dict_path)
            .with_context(|| format!("cannot read dictionary '{}'", dict_path.display()))?;
        dictionary_size = data.len();
    }

    let payload = fs::read(&args.input)
        .with_context(|| format!("cannot read '{}'", args.input.display()))?;
    let payload_size = payload.len();
    data.extend_from_slice(&payload);

    let flags = if args.classic { 0 } else { FLG_IS_INVERTED };
    let mut output = vec![0u8; compress_bound(data.len())];
    let mut stats = Stats::new();

    let compressed_size = match compress(
        &data,
        &mut output,
        flags,
        args.max_window,
        dictionary_size,
        None,
        Some(&mut stats),
    ) {
        Ok(size) => size,
        Err(err) => bail!("compression failed: {err}"),
    };

    fs::write(&args.output, &output[..compressed_size])
        .with_context(|| format!("cannot write '{}'", args.output.display()))?;

    let ratio = if payload_size > 0 {
        100.0 * compressed_size as f64 / payload_size as f64
    } else {
        100.0
    };
    println!(
        "Compressed '{}' ({} bytes) -> '{}' ({} bytes, {:.2}%)",
        args.input.display(),
        payload_size,
        args.output.display(),
        compressed_size,
        ratio
    );

    if args.verbose {
        print_stats(&stats);
    }
    Ok(())
}

fn mean(total: i64, divisor: i32) -> i64 {
    if divisor > 0 {
        total / i64::from(divisor)
    } else {
        0
    }
}

fn print_stats(stats: &Stats) {
    println!(
        "Literals: min {} avg {} max {} count {}",
        stats.min_literals.max(0),
        mean(stats.total_literals, stats.literals_divisor),
        stats.max_literals,
        stats.literals_divisor
    );
    println!(
        "Offsets: min {} avg {} max {} count {}",
        stats.min_offset.max(0),
        mean(stats.total_offsets, stats.match_divisor),
        stats.max_offset,
        stats.match_divisor
    );
    println!(
        "Match lens: min {} avg {} max {}",
        stats.min_match_len.max(0),
        mean(stats.total_match_lens, stats.match_divisor),
        stats.max_match_len
    );
    println!(
        "RLE1 lens: min {} avg {} max {} count {}",
        stats.min_rle1_len.max(0),
        mean(stats.total_rle1_lens, stats.rle1_divisor),
        stats.max_rle1_len,
        stats.rle1_divisor
    );
    println!(
        "RLE2 lens: min {} avg {} max {} count {}",
        stats.min_rle2_len.max(0),
        mean(stats.total_rle2_lens, stats.rle2_divisor),
        stats.max_rle2_len,
        stats.rle2_divisor
    );
    println!(
        "Rep matches: {}  commands: {}  safe distance: {}",
        stats.num_rep_matches, stats.commands_divisor, stats.safe_dist
    );
}
