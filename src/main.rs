use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sqlfmt::dialect::registry_from_name;
use sqlfmt::mode::Mode;
use sqlfmt::options::CommaStyle;
use sqlfmt::report::{FileStatus, Report};

/// sqlfmt - A clause-group SQL pretty-printer.
/// Reindents SQL without changing its content.
#[derive(Parser, Debug)]
#[command(name = "sqlfmt", version, about)]
struct Cli {
    /// Files or directories to format. Use "-" to read from stdin.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Check formatting without writing changes.
    #[arg(long)]
    check: bool,

    /// Show formatting diff.
    #[arg(long)]
    diff: bool,

    /// Print the paths of files that would be reformatted.
    #[arg(short = 'l', long)]
    list: bool,

    /// Left-pad every formatted line by this many spaces.
    #[arg(long)]
    distance: Option<usize>,

    /// Where commas go in column lists.
    #[arg(long, value_enum)]
    comma_style: Option<CommaStyle>,

    /// Emit keywords, types and functions in lower case.
    #[arg(long)]
    lower: bool,

    /// Colorize keywords, functions, types, reserved values and strings.
    #[arg(long)]
    color: bool,

    /// Extra vocabulary: postgresql, postgis. May be repeated.
    #[arg(short = 'd', long = "dialect")]
    dialects: Vec<String>,

    /// Glob patterns to exclude.
    #[arg(long)]
    exclude: Vec<String>,

    /// Verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only).
    #[arg(short, long)]
    quiet: bool,

    /// Number of threads for parallel processing (0 = all cores).
    #[arg(short = 't', long, default_value_t = 0)]
    threads: usize,

    /// Disable multi-threaded processing.
    #[arg(long)]
    single_process: bool,

    /// Path to a sqlfmt.toml config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "sqlfmt=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    let is_stdin = cli.files.len() == 1 && cli.files[0].to_string_lossy() == "-";
    let mode = build_mode(&cli)?;

    if is_stdin {
        let mut source = Vec::new();
        io::stdin()
            .read_to_end(&mut source)
            .context("reading stdin")?;
        let formatted = sqlfmt::format_document(&source, &mode.format)?;
        print!("{}", formatted);
        return Ok(ExitCode::SUCCESS);
    }

    let report = sqlfmt::run(&cli.files, &mode);

    if mode.list {
        for path in report.changed_paths() {
            println!("{}", path.display());
        }
    }

    if !mode.quiet {
        print_verbose_results(&report, &mode);
        eprintln!("{}", report.summary());
    }

    report.print_errors();

    if report.has_errors() {
        Ok(ExitCode::from(2))
    } else if mode.check && report.has_changes() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Config file values first, then command-line flags on top.
fn build_mode(cli: &Cli) -> anyhow::Result<Mode> {
    let mut mode = sqlfmt::load_config(&cli.files, cli.config.as_deref())
        .context("loading configuration")?;

    if let Some(distance) = cli.distance {
        mode.format.distance = distance;
    }
    if let Some(style) = cli.comma_style {
        mode.format.comma_style = style;
    }
    mode.format.lower_cased |= cli.lower;
    mode.format.colorized |= cli.color;
    for name in &cli.dialects {
        mode.format.dialects.push(registry_from_name(name)?);
    }
    if !cli.exclude.is_empty() {
        mode.exclude = cli.exclude.clone();
    }

    mode.check = cli.check;
    mode.diff = cli.diff;
    mode.list = cli.list;
    mode.verbose = cli.verbose;
    mode.quiet = cli.quiet;
    mode.threads = cli.threads;
    mode.single_process = cli.single_process;
    Ok(mode)
}

fn print_verbose_results(report: &Report, mode: &Mode) {
    if !mode.verbose {
        return;
    }
    for result in &report.results {
        if result.status == FileStatus::Changed {
            let verb = if mode.writes_files() {
                "reformatted"
            } else {
                "would reformat"
            };
            eprintln!("{} {}", verb, result.path.display());
        }
    }
}
