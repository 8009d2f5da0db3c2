use blockpatch_core::{
    MarkerConfig, MatchMode, PatchConfig, PatchOptions, PatchReport, Preset, apply,
};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Patch(blockpatch_core::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Patch(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl From<blockpatch_core::Error> for CliError {
    fn from(value: blockpatch_core::Error) -> Self {
        Self::Patch(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Apply,
    Check,
    Presets,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    config: Option<PathBuf>,
    overrides: PatchConfig,
    strict: bool,
    dry_run: bool,
    json: bool,
    pretty: bool,
    verbose: u8,
}

#[derive(Serialize)]
struct PresetOut<'a> {
    name: &'a str,
    description: &'a str,
    header: &'a str,
}

fn usage() -> &'static str {
    "blockpatch\n\
\n\
USAGE:\n\
  blockpatch [apply] [--config <file>] [--preset <name>] [--header <text>] [--open <text>] [--close <text>] [--regex] [--replacement <file>|--replacement-text <text>] [--strict] [--dry-run] [--json [--pretty]] [-v] [<path>]\n\
  blockpatch check [same options as apply] [<path>]\n\
  blockpatch presets [--json [--pretty]]\n\
\n\
NOTES:\n\
  - The first line containing the header arms the scan; the next line containing the\n\
    opening delimiter starts the block and the next line containing the closing\n\
    delimiter ends it. The whole block is replaced.\n\
  - --open defaults to '<div class=\"mermaid\">' and --close to '</div>'.\n\
  - Flags override values from --config, which override --preset.\n\
  - Without --strict a missing header or an unclosed block is reported, not an error.\n\
  - The replacement should end with a newline; otherwise its last line is joined to the\n\
    line after the block (a warning, or an error with --strict).\n\
  - check never writes and exits with status 3 when the file would change.\n\
  - Log filter: BLOCKPATCH_LOG (falls back to RUST_LOG, default 'warn').\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut path: Option<PathBuf> = None;
    let mut markers = MarkerConfig::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "apply" => args.command = Command::Apply,
            "check" => args.command = Command::Check,
            "presets" => args.command = Command::Presets,
            "--strict" => args.strict = true,
            "--dry-run" => args.dry_run = true,
            "--json" => args.json = true,
            "--pretty" => args.pretty = true,
            "--regex" => markers.mode = Some(MatchMode::Regex),
            "-v" | "--verbose" => args.verbose = args.verbose.saturating_add(1),
            "-vv" => args.verbose = args.verbose.saturating_add(2),
            "--config" => {
                let Some(cfg) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(PathBuf::from(cfg));
            }
            "--preset" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.overrides.preset = Some(name.clone());
            }
            "--header" => {
                let Some(text) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                markers.header = Some(text.clone());
            }
            "--open" => {
                let Some(text) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                markers.open = Some(text.clone());
            }
            "--close" => {
                let Some(text) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                markers.close = Some(text.clone());
            }
            "--replacement" => {
                let Some(file) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if args.overrides.replacement.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.overrides.replacement_file = Some(PathBuf::from(file));
            }
            "--replacement-text" => {
                let Some(text) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                if args.overrides.replacement_file.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.overrides.replacement = Some(text.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if path.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    path = Some(PathBuf::from(rest));
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            other => {
                if path.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                path = Some(PathBuf::from(other));
            }
        }
    }

    if args.command == Command::Check {
        args.dry_run = true;
    }
    args.overrides.path = path;
    args.overrides.markers = markers;
    Ok(args)
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::try_from_env("BLOCKPATCH_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    use std::io::Write;

    let mut out = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut out, value)?;
    } else {
        serde_json::to_writer(&mut out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn print_summary(report: &PatchReport, dry_run: bool) {
    let path = report.path.display();
    let outcome = &report.outcome;
    if !outcome.header_found {
        println!("Header not found in {path}; nothing replaced.");
        return;
    }
    if outcome.blocks_replaced == 0 {
        println!("No block after the header in {path}; nothing replaced.");
        return;
    }
    if outcome.unterminated {
        println!(
            "Block starting at line {} in {path} is never closed; {} trailing lines dropped.",
            outcome.block_start_line.unwrap_or_default(),
            outcome.lines_removed
        );
    }
    match (report.changed, dry_run) {
        (false, _) => println!("{path} is already up to date."),
        (true, true) => println!("Would replace 1 block in {path}."),
        (true, false) => println!("Replaced 1 block in {path}."),
    }
}

/// Returns the process exit code on success.
fn run(args: Args) -> Result<i32, CliError> {
    if args.command == Command::Presets {
        if args.json {
            let out: Vec<PresetOut<'_>> = Preset::all()
                .iter()
                .map(|p| PresetOut {
                    name: p.name,
                    description: p.description,
                    header: p.header,
                })
                .collect();
            write_json(&out, args.pretty)?;
        } else {
            for p in Preset::all() {
                println!("{:<16} {}", p.name, p.description);
            }
        }
        return Ok(0);
    }

    let mut cfg = match &args.config {
        Some(path) => PatchConfig::load(path)?,
        None => PatchConfig::default(),
    };
    cfg.merge(args.overrides);
    if cfg.path.is_none() {
        return Err(CliError::Usage(usage()));
    }
    let request = cfg.resolve()?;
    tracing::debug!(
        path = %request.path.display(),
        header = request.markers.header.as_str(),
        open = request.markers.open.as_str(),
        close = request.markers.close.as_str(),
        "resolved patch request"
    );

    let options = PatchOptions {
        dry_run: args.dry_run,
        strict: args.strict,
    };
    let report = apply(&request, options)?;

    if args.json {
        write_json(&report, args.pretty)?;
    } else {
        print_summary(&report, options.dry_run);
    }

    if args.command == Command::Check && report.changed {
        return Ok(3);
    }
    Ok(0)
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_tracing(args.verbose);

    match run(args) {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
