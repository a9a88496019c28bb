use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use tracing_subscriber::EnvFilter;

use capcheck::core::analysis::AnalysisOptions;
use capcheck::core::lint::noncapturing::{DEFAULT_MARKER, MatchMode, RuleConfig};
use capcheck::driver::{
    CheckOptions, DumpFlags, check_path, render_compile_error, render_human, render_json,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MatchModeArg {
    Simple,
    Qualified,
}

impl From<MatchModeArg> for MatchMode {
    fn from(arg: MatchModeArg) -> Self {
        match arg {
            MatchModeArg::Simple => MatchMode::SimpleName,
            MatchModeArg::Qualified => MatchMode::Qualified,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
}

#[derive(ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Source files to check
    #[clap(required = true)]
    files: Vec<PathBuf>,

    /// Marker attribute, optionally qualified (e.g. Perf.NonCapturing)
    #[clap(long, default_value = DEFAULT_MARKER)]
    marker: String,

    #[clap(long, value_enum, default_value = "simple")]
    match_mode: MatchModeArg,

    /// Worker threads for the analysis pass
    #[clap(long, short = 'j', default_value_t = 1)]
    jobs: usize,

    #[clap(long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Also check code inside @[generated] declarations
    #[clap(long)]
    include_generated: bool,

    /// Comma-separated list of things to dump: tree,symbols
    #[clap(long)]
    dump: Option<String>,

    /// Log filter (overrides RUST_LOG), e.g. debug or capcheck=trace
    #[clap(long)]
    log_level: Option<String>,
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.log_level.as_deref());

    let options = CheckOptions {
        analysis: AnalysisOptions {
            rule: RuleConfig::with_marker(args.marker.clone()).match_mode(args.match_mode.into()),
            parallelism: args.jobs,
            include_generated: args.include_generated,
        },
        dump: args.dump.as_deref().map(DumpFlags::parse).unwrap_or_default(),
    };

    let mut failed = false;
    for path in &args.files {
        match check_path(path, &options) {
            Ok((source, output)) => {
                if let Some(dump) = &output.tree_dump {
                    println!("{dump}");
                }
                if let Some(dump) = &output.symbols_dump {
                    println!("{dump}");
                }
                for diagnostic in &output.report.diagnostics {
                    failed = true;
                    match args.format {
                        OutputFormat::Human => println!("{}", render_human(path, &source, diagnostic)),
                        OutputFormat::Json => match render_json(path, diagnostic) {
                            Ok(line) => println!("{line}"),
                            Err(e) => eprintln!("[ERROR] failed to serialize diagnostic: {e}"),
                        },
                    }
                }
            }
            Err((source, errors)) => {
                failed = true;
                for error in &errors {
                    eprintln!("{}", render_compile_error(path, source.as_deref(), error));
                }
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
