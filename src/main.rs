//! Purpose: `jsonconv` CLI entry point: parse, query, and extract quote data from JSON.
//! Role: Binary crate root; parses args, reads a file or stdin, emits results on stdout.
//! Invariants: Results go to stdout; diagnostics and logs go to stderr only.
//! Invariants: Non-interactive errors are emitted as JSON on stderr.
//! Invariants: Process exit code is derived from `to_exit_code`.
use std::error::Error as StdError;
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path as FsPath, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue, json};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod color_json;

use color_json::colorize_json;
use jsonconv::json::parse::{categorize_error, from_slice_with, hint_for_error};
use jsonconv::lookup::Path;
use jsonconv::quote::{Contract, OptionChain, expiration_date};
use jsonconv::{Error, ErrorKind, ParseOptions, Value, to_exit_code};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "jsonconv",
    version,
    about = "Parse JSON responses, query values by path, and extract option-chain quotes"
)]
struct Cli {
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "Colorize stderr diagnostics and pretty JSON output: auto|always|never"
    )]
    color: ColorMode,
    #[command(flatten)]
    parse: ParseArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ParseArgs {
    #[arg(
        long,
        global = true,
        help = "Drop unknown escapes and ignore text after the root value"
    )]
    lenient: bool,
    #[arg(
        long,
        global = true,
        default_value_t = jsonconv::core::options::DEFAULT_MAX_DEPTH,
        help = "Maximum nesting depth (0 selects the hard ceiling of 600)"
    )]
    max_depth: usize,
}

impl ParseArgs {
    fn options(&self) -> ParseOptions {
        let base = if self.lenient {
            ParseOptions::lenient()
        } else {
            ParseOptions::strict()
        };
        base.with_max_depth((self.max_depth > 0).then_some(self.max_depth))
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a document and print it back as JSON.
    Parse {
        #[arg(help = "Input file (stdin when omitted or `-`)", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        #[arg(long, help = "Indent output (colored when --color allows)")]
        pretty: bool,
    },
    /// Print the value at a path such as `optionChain.result[0].quote`.
    Get {
        path: String,
        #[arg(help = "Input file (stdin when omitted or `-`)", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        #[arg(long, help = "Indent output (colored when --color allows)")]
        pretty: bool,
    },
    /// Print the kind of the root value (object, array, string, ...).
    Kind {
        #[arg(help = "Input file (stdin when omitted or `-`)", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },
    /// Print option-chain contracts as JSON lines.
    Contracts {
        #[arg(help = "Input file (stdin when omitted or `-`)", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        #[arg(long, conflicts_with = "puts", help = "Only call contracts")]
        calls: bool,
        #[arg(long, help = "Only put contracts")]
        puts: bool,
        #[arg(
            long,
            help = "Only contracts expiring on this date (YYYY-MM-DD) or 1-based position"
        )]
        expiry: Option<String>,
        #[arg(long, help = "Add a Black-Scholes `delta` field to each contract")]
        delta: bool,
        #[arg(long, requires = "delta", help = "Unix time used for time to expiry (default: now)")]
        now: Option<i64>,
    },
    /// List expiration dates with their 1-based positions.
    Expirations {
        #[arg(help = "Input file (stdin when omitted or `-`)", value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct ContractRow<'a> {
    #[serde(flatten)]
    contract: &'a Contract,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta: Option<f64>,
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err((err, color_mode)) => {
            emit_error(&err, color_mode);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run() -> Result<RunOutcome, (Error, ColorMode)> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    (
                        Error::new(ErrorKind::Io)
                            .with_message("failed to write help")
                            .with_source(io_err),
                        ColorMode::Auto,
                    )
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                let message = clap_error_summary(&err);
                return Err((
                    Error::new(ErrorKind::Usage)
                        .with_message(message)
                        .with_hint("Run `jsonconv --help` for usage."),
                    ColorMode::Auto,
                ));
            }
        },
    };

    let color_mode = cli.color;
    let options = cli.parse.options();
    dispatch(cli.command, &options, color_mode).map_err(|err| (err, color_mode))
}

fn clap_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    rendered
        .lines()
        .next()
        .map(|line| line.trim_start_matches("error: ").to_string())
        .unwrap_or_else(|| "invalid arguments".to_string())
}

fn dispatch(command: Command, options: &ParseOptions, color_mode: ColorMode) -> Result<RunOutcome, Error> {
    match command {
        Command::Parse { file, pretty } => {
            let value = load(file.as_deref(), options)?;
            emit_value(&value, pretty, color_mode);
        }
        Command::Get { path, file, pretty } => {
            let path = Path::parse(&path)?;
            let value = load(file.as_deref(), options)?;
            let found = path.resolve(&value)?;
            emit_value(found, pretty, color_mode);
        }
        Command::Kind { file } => {
            let value = load(file.as_deref(), options)?;
            println!("{}", value.kind());
        }
        Command::Contracts {
            file,
            calls,
            puts,
            expiry,
            delta,
            now,
        } => {
            let value = load(file.as_deref(), options)?;
            let chain = OptionChain::from_value(&value)?;
            let expiration = expiry
                .as_deref()
                .and_then(|choice| chain.select_expiration(Some(choice)));
            let now = match (delta, now) {
                (false, _) => 0,
                (true, Some(now)) => now,
                (true, None) => unix_now()?,
            };
            let spot = chain.underlying.regular_market_price;
            let selected = chain
                .calls
                .iter()
                .filter(|_| !puts)
                .chain(chain.puts.iter().filter(|_| !calls))
                .filter(|contract| expiration.is_none_or(|exp| contract.expiration == exp));
            for contract in selected {
                let row = ContractRow {
                    contract,
                    delta: delta.then(|| contract.delta(spot, now)),
                };
                let line = serde_json::to_string(&row).map_err(|err| {
                    Error::new(ErrorKind::Internal)
                        .with_message("failed to encode contract")
                        .with_source(err)
                })?;
                println!("{line}");
            }
        }
        Command::Expirations { file } => {
            let value = load(file.as_deref(), options)?;
            let chain = OptionChain::from_value(&value)?;
            for (idx, ts) in chain.expiration_dates.iter().enumerate() {
                let date = expiration_date(*ts)
                    .map(|date| date.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!("{}\t{date}\t{ts}", idx + 1);
            }
        }
    }
    Ok(RunOutcome::ok())
}

fn unix_now() -> Result<i64, Error> {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("system clock is before the unix epoch")
            .with_source(err)
    })?;
    i64::try_from(elapsed.as_secs()).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("system clock out of range")
            .with_source(err)
    })
}

fn input_label(file: Option<&FsPath>) -> String {
    match file {
        Some(path) if path != FsPath::new("-") => path.display().to_string(),
        _ => "stdin".to_string(),
    }
}

fn read_input(file: Option<&FsPath>) -> Result<Vec<u8>, Error> {
    match file {
        Some(path) if path != FsPath::new("-") => fs::read(path).map_err(|err| {
            let kind = if err.kind() == io::ErrorKind::NotFound {
                ErrorKind::Usage
            } else {
                ErrorKind::Io
            };
            Error::new(kind)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        }),
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(buf)
        }
    }
}

fn load(file: Option<&FsPath>, options: &ParseOptions) -> Result<Value, Error> {
    let label = input_label(file);
    let bytes = read_input(file)?;
    debug!(input = %label, bytes = bytes.len(), "read input");
    from_slice_with(&bytes, options).map_err(|err| {
        if err.hint().is_some() {
            return err;
        }
        let hint = hint_for_error(&err, &label);
        err.with_hint(hint)
    })
}

fn emit_value(value: &Value, pretty: bool, color_mode: ColorMode) {
    if pretty {
        let use_color = color_mode.use_color(io::stdout().is_terminal());
        println!("{}", colorize_json(value, use_color));
    } else {
        println!("{value}");
    }
}

fn emit_error(err: &Error, color_mode: ColorMode) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("{}", error_text(err, color_mode.use_color(is_tty)));
        return;
    }

    let value = error_json(err);
    let json = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = err.source();
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> JsonValue {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    inner.insert("message".to_string(), json!(err.message()));
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    if let Some(position) = err.position() {
        inner.insert("position".to_string(), json!(position));
    }
    if let Some(found) = err.found() {
        inner.insert("found".to_string(), json!(found.to_string()));
    }
    if let Some(key) = err.key() {
        inner.insert("key".to_string(), json!(key));
    }
    if let Some(index) = err.index() {
        inner.insert("index".to_string(), json!(index));
    }
    if err.kind().is_parse() {
        inner.insert(
            "category".to_string(),
            json!(categorize_error(err).label()),
        );
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), JsonValue::Object(inner));
    JsonValue::Object(outer)
}

fn error_text(err: &Error, use_color: bool) -> String {
    let label = if use_color {
        "\u{1b}[31merror:\u{1b}[0m"
    } else {
        "error:"
    };
    let mut lines = vec![format!("{label} {}", err.message())];
    if let Some(hint) = err.hint() {
        lines.push(format!("hint: {hint}"));
    }
    for cause in error_causes(err) {
        lines.push(format!("caused by: {cause}"));
    }
    lines.join("\n")
}
