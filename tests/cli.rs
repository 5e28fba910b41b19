// Tests for the CLI layer: argument parsing (library) and one end-to-end
// binary invocation over temp files.

mod common;

use std::path::PathBuf;
use std::process::Command;

use zx0::cli::{parse_args, ParseError, ParsedArgs};

fn parse(args: &[&str]) -> Result<ParsedArgs, ParseError> {
    parse_args(args.iter().map(|s| s.to_string()))
}

// ═════════════════════════════════════════════════════════════════════════════
// parse_args
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn plain_invocation() {
    let args = parse(&["in.bin", "out.zx0"]).unwrap();
    assert_eq!(args.input, PathBuf::from("in.bin"));
    assert_eq!(args.output, PathBuf::from("out.zx0"));
    assert!(!args.verbose);
    assert!(!args.classic);
    assert_eq!(args.max_window, 0);
    assert_eq!(args.dictionary, None);
}

#[test]
fn flags_in_any_order() {
    let args = parse(&["-v", "in.bin", "-classic", "out.zx0", "-w", "2048"]).unwrap();
    assert!(args.verbose);
    assert!(args.classic);
    assert_eq!(args.max_window, 2048);
}

#[test]
fn dictionary_flag_takes_a_path() {
    let args = parse(&["-D", "dict.bin", "in.bin", "out.zx0"]).unwrap();
    assert_eq!(args.dictionary, Some(PathBuf::from("dict.bin")));
}

#[test]
fn help_is_reported_distinctly() {
    assert_eq!(parse(&["-h"]), Err(ParseError::HelpRequested));
}

#[test]
fn missing_files_are_errors() {
    assert_eq!(parse(&[]), Err(ParseError::MissingInput));
    assert_eq!(parse(&["only.bin"]), Err(ParseError::MissingOutput));
}

#[test]
fn unknown_flag_is_an_error() {
    assert_eq!(
        parse(&["-q", "a", "b"]),
        Err(ParseError::UnknownFlag("-q".to_string()))
    );
}

#[test]
fn window_value_must_be_numeric() {
    assert_eq!(
        parse(&["-w", "lots", "a", "b"]),
        Err(ParseError::InvalidValue("-w", "lots".to_string()))
    );
}

#[test]
fn third_positional_is_rejected() {
    assert_eq!(
        parse(&["a", "b", "c"]),
        Err(ParseError::ExtraArgument("c".to_string()))
    );
}

// ═════════════════════════════════════════════════════════════════════════════
// Binary end-to-end
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn binary_compresses_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.bin");
    let output_path = dir.path().join("output.zx0");
    let data = common::mixed_corpus(5000);
    std::fs::write(&input_path, &data).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_zx0r"))
        .arg(&input_path)
        .arg(&output_path)
        .status()
        .unwrap();
    assert!(status.success());

    let compressed = std::fs::read(&output_path).unwrap();
    assert!(!compressed.is_empty());
    // The binary defaults to the V2 (inverted) bitstream.
    assert_eq!(common::decompress(&compressed, true, &[]), data);
}

#[test]
fn binary_classic_flag_selects_v1() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.bin");
    let output_path = dir.path().join("output.zx0");
    let data = common::mixed_corpus(2000);
    std::fs::write(&input_path, &data).unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_zx0r"))
        .arg("-classic")
        .arg(&input_path)
        .arg(&output_path)
        .status()
        .unwrap();
    assert!(status.success());

    let compressed = std::fs::read(&output_path).unwrap();
    assert_eq!(common::decompress(&compressed, false, &[]), data);
}
