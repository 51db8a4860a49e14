// Command-line front end for the Z85 codec.
//
// Subcommands read a whole input (file or stdin), transcode it in memory and
// write the result (file or stdout). Stats go to stderr, as text with -v or
// as JSON with --json.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use log::debug;

use crate::codec::{DecodeMode, Padding};
use crate::io::{self as z85io, EncodeOptions};

const BUF_SIZE: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Z85 (ZeroMQ spec:32) base-85 encoder/decoder.
#[derive(Parser, Debug)]
#[command(
    name = "z85",
    version,
    about = "Z85 base-85 encoder/decoder",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Encode binary input as Z85 text.
    Encode(EncodeArgs),
    /// Decode Z85 text back to binary.
    Decode(DecodeArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Args, Debug)]
struct IoArgs {
    /// Input file (default: stdin). A single positional then names the output.
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "output_pos")]
    output: Option<PathBuf>,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Input file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    input_pos: Option<PathBuf>,

    /// Output file (positional form).
    #[arg(value_hint = ValueHint::FilePath)]
    output_pos: Option<PathBuf>,
}

impl IoArgs {
    /// Input and output paths after merging flags with positionals.
    fn paths(self) -> (Option<PathBuf>, Option<PathBuf>) {
        match self.input {
            Some(input) => (Some(input), self.output.or(self.input_pos)),
            None => (self.input_pos, self.output.or(self.output_pos)),
        }
    }
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Zero-pad input whose length is not a multiple of 4 and append the
    /// padding count as a trailing digit.
    #[arg(short = 'p', long)]
    pad: bool,

    /// Break encoded output into lines of this many characters (0 disables).
    #[arg(short = 'w', long, default_value_t = 0)]
    wrap: usize,

    #[command(flatten)]
    io: IoArgs,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Reject characters outside the Z85 alphabet instead of decoding them
    /// leniently.
    #[arg(long)]
    strict: bool,

    #[command(flatten)]
    io: IoArgs,
}

// ---------------------------------------------------------------------------
// Resolved command + options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Encode,
    Decode,
    Config,
}

struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    padding: Padding,
    wrap: usize,
    mode: DecodeMode,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    let base = Options {
        command: Command::Config,
        use_stdout: false,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        padding: Padding::Disabled,
        wrap: 0,
        mode: DecodeMode::Compatible,
        input_file: None,
        output_file: None,
        json_output: cli.json_output,
    };

    match cli.command {
        Cmd::Encode(args) => {
            let use_stdout = args.io.stdout;
            let (input_file, output_file) = args.io.paths();
            Options {
                command: Command::Encode,
                use_stdout,
                padding: if args.pad {
                    Padding::Auto
                } else {
                    Padding::Disabled
                },
                wrap: args.wrap,
                input_file,
                output_file,
                ..base
            }
        }
        Cmd::Decode(args) => {
            let use_stdout = args.io.stdout;
            let (input_file, output_file) = args.io.paths();
            Options {
                command: Command::Decode,
                use_stdout,
                mode: if args.strict {
                    DecodeMode::Strict
                } else {
                    DecodeMode::Compatible
                },
                input_file,
                output_file,
                ..base
            }
        }
        Cmd::Config => base,
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("z85".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config() -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!("z85 version {version} (Rust)");
    eprintln!("Licensed under the MIT License");

    let file_io = cfg!(feature = "file-io") as u8;
    let parallel = cfg!(feature = "parallel") as u8;

    eprintln!("FILE_IO={file_io}");
    eprintln!("PARALLEL={parallel}");
    #[cfg(feature = "parallel")]
    eprintln!("PARALLEL_THRESHOLD={}", crate::codec::PARALLEL_THRESHOLD);
    eprintln!("ALPHABET={}", String::from_utf8_lossy(crate::alphabet::ALPHABET));

    0
}

// ---------------------------------------------------------------------------
// Input/output plumbing
// ---------------------------------------------------------------------------

fn open_input(opts: &Options) -> Result<Box<dyn Read>, i32> {
    match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Ok(Box::new(BufReader::with_capacity(BUF_SIZE, f))),
            Err(e) => {
                eprintln!("z85: input file: {}: {e}", path.display());
                Err(1)
            }
        },
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Resolve the output target; `None` means stdout.
fn output_path(opts: &Options) -> Result<Option<&Path>, i32> {
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Ok(None),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                eprintln!(
                    "z85: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return Err(1);
            }
            Ok(Some(path.as_path()))
        }
    }
}

/// Write `data` to the resolved output, creating the file only now so a
/// failed transcode leaves nothing behind.
fn write_output(path: Option<&Path>, data: &[u8]) -> i32 {
    let mut writer: Box<dyn Write> = match path {
        None => Box::new(BufWriter::with_capacity(BUF_SIZE, io::stdout().lock())),
        Some(path) => match File::create(path) {
            Ok(f) => Box::new(BufWriter::with_capacity(BUF_SIZE, f)),
            Err(e) => {
                eprintln!("z85: output file: {}: {e}", path.display());
                return 1;
            }
        },
    };
    if let Err(e) = writer.write_all(data).and_then(|()| writer.flush()) {
        eprintln!("z85: write error: {e}");
        return 1;
    }
    0
}

fn hex(digest: &[u8]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Encode command
// ---------------------------------------------------------------------------

fn cmd_encode(opts: &Options) -> i32 {
    let reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let out_path = match output_path(opts) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let mut text = Vec::new();
    let encode_opts = EncodeOptions {
        padding: opts.padding,
        wrap: opts.wrap,
    };
    let stats = match z85io::encode_stream(reader, &mut text, encode_opts) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("z85: {e}");
            return 1;
        }
    };

    let code = write_output(out_path, &text);
    if code != 0 {
        return code;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "z85: encoder: input size: {}, output size: {}, padding: {}",
            stats.input_size, stats.output_size, stats.padding
        );
        if opts.verbose > 1
            && let Some(digest) = stats.input_sha256
        {
            eprintln!("z85: encoder: input sha256: {}", hex(&digest));
        }
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "encode",
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "padding": stats.padding,
            "wrap": opts.wrap,
            "input_sha256": stats.input_sha256.map(|d| hex(&d)),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Decode command
// ---------------------------------------------------------------------------

fn cmd_decode(opts: &Options) -> i32 {
    let reader = match open_input(opts) {
        Ok(r) => r,
        Err(code) => return code,
    };
    let out_path = match output_path(opts) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let mut data = Vec::new();
    let stats = match z85io::decode_stream(reader, &mut data, opts.mode) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("z85: {e}");
            return 1;
        }
    };

    let code = write_output(out_path, &data);
    if code != 0 {
        return code;
    }

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "z85: decoder: input size: {}, output size: {}, padding: {}",
            stats.input_size, stats.output_size, stats.padding
        );
        if opts.verbose > 1
            && let Some(digest) = stats.output_sha256
        {
            eprintln!("z85: decoder: output sha256: {}", hex(&digest));
        }
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "decode",
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "padding": stats.padding,
            "strict": opts.mode == DecodeMode::Strict,
            "output_sha256": stats.output_sha256.map(|d| hex(&d)),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    // Warn if -c overrides output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        eprintln!(
            "z85: warning: -c option overrides output filename: {}",
            path.display()
        );
    }
    debug!("z85: dispatching {:?}", opts.command);

    let exit_code = match opts.command {
        Command::Encode => cmd_encode(&opts),
        Command::Decode => cmd_decode(&opts),
        Command::Config => cmd_config(),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
