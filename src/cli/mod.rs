//! Command-line argument parsing for the `zx0r` binary.
//!
//! Flags may appear in any order; the first two non-flag arguments are the
//! input and output paths.  Parsing is deliberately dependency-free; the
//! binary's `main` turns a [`ParseError`] into the usage text.

use std::path::PathBuf;

/// Usage text printed on `-h` or a parse error.
pub const USAGE: &str = "\
Usage: zx0r [options] <infile> <outfile>

Options:
  -v            print compression statistics
  -classic      emit the original (V1) bitstream instead of V2
  -w <size>     cap the match window at <size> bytes (default 32640)
  -D <file>     prepend <file> as a compression dictionary
  -h            show this help
";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub verbose: bool,
    /// Emit the V1 (non-inverted) bitstream variant.
    pub classic: bool,
    /// 0 means the format default.
    pub max_window: usize,
    pub dictionary: Option<PathBuf>,
}

/// Why parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// `-h` was given; print usage and exit successfully.
    HelpRequested,
    UnknownFlag(String),
    MissingValue(&'static str),
    InvalidValue(&'static str, String),
    MissingInput,
    MissingOutput,
    ExtraArgument(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::HelpRequested => f.write_str("help requested"),
            ParseError::UnknownFlag(flag) => write!(f, "unknown option '{flag}'"),
            ParseError::MissingValue(flag) => write!(f, "option '{flag}' needs a value"),
            ParseError::InvalidValue(flag, value) => {
                write!(f, "invalid value '{value}' for option '{flag}'")
            }
            ParseError::MissingInput => f.write_str("no input file given"),
            ParseError::MissingOutput => f.write_str("no output file given"),
            ParseError::ExtraArgument(arg) => write!(f, "unexpected argument '{arg}'"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse the arguments following the program name.
pub fn parse_args<I>(args: I) -> Result<ParsedArgs, ParseError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut verbose = false;
    let mut classic = false;
    let mut max_window = 0usize;
    let mut dictionary = None;
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err(ParseError::HelpRequested),
            "-v" => verbose = true,
            "-classic" => classic = true,
            "-w" => {
                let value = args.next().ok_or(ParseError::MissingValue("-w"))?;
                max_window = value
                    .parse()
                    .map_err(|_| ParseError::InvalidValue("-w", value))?;
            }
            "-D" => {
                let value = args.next().ok_or(ParseError::MissingValue("-D"))?;
                dictionary = Some(PathBuf::from(value));
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(ParseError::UnknownFlag(other.to_string()));
            }
            path => {
                if input.is_none() {
                    input = Some(PathBuf::from(path));
                } else if output.is_none() {
                    output = Some(PathBuf::from(path));
                } else {
                    return Err(ParseError::ExtraArgument(path.to_string()));
                }
            }
        }
    }

    Ok(ParsedArgs {
        input: input.ok_or(ParseError::MissingInput)?,
        output: output.ok_or(ParseError::MissingOutput)?,
        verbose,
        classic,
        max_window,
        dictionary,
    })
}
