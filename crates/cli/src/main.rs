// ballotcheck - check poll results against the membership roster

mod exit_codes;
mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use log::{info, warn};

use ballotcheck_io::ballots::{load_ballots, BallotSources};
use ballotcheck_io::report::{render_json, write_report, ReportFormat};
use ballotcheck_io::roster::{load_roster, RosterSources};
use ballotcheck_io::source::check_readable;
use ballotcheck_io::LoadError;
use ballotcheck_recon::{CheckConfig, ReconError, ReconInput, Report};

use exit_codes::{
    load_exit_code, EXIT_CHECK_BUSY, EXIT_CHECK_CONFIG, EXIT_CHECK_MALFORMED, EXIT_CHECK_NOT_FOUND,
    EXIT_ERROR, EXIT_SUCCESS,
};

#[derive(Parser)]
#[command(name = "ballotcheck")]
#[command(about = "Check poll results against the membership roster and tally the ballots")]
#[command(version)]
#[command(after_help = "\
Examples:
  ballotcheck membership.xlsx votes.xlsx
  ballotcheck membership.xlsx votes.xlsx results.xlsx aliases.xlsx manual.xlsx
  ballotcheck membership.xlsx votes.csv results.json --config meeting.toml

Optional lists not given as files are read from the sheets of the same name
in the membership workbook (aliases, outsiders, late); manual votes from the
'manual' sheet of the poll workbook. A check whose list cannot be found is
skipped. An existing output file is never overwritten.")]
struct Cli {
    /// Membership workbook ('members' sheet, or the first sheet)
    membership: PathBuf,

    /// Poll results export ('zoom' sheet, or the first sheet)
    poll: PathBuf,

    /// Report to write (.xlsx or .json)
    #[arg(default_value = "results.xlsx")]
    output: PathBuf,

    /// Known aliases of members
    aliases: Option<PathBuf>,

    /// Manually entered votes
    manual: Option<PathBuf>,

    /// Members living outside the district
    outsiders: Option<PathBuf>,

    /// Members who missed the registration deadline
    late: Option<PathBuf>,

    /// TOML file overriding checks, sheet names and layout
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Print the full report as JSON to stdout
    #[arg(long)]
    json: bool,

    /// No summary on stderr
    #[arg(long, short = 'q')]
    quiet: bool,

    /// More log output (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cmd_check(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// `RUST_LOG` wins over the flags.
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    /// Create error from a loader/writer error with the registry's exit code.
    pub fn load(err: LoadError) -> Self {
        let code = load_exit_code(&err);
        let hint = match &err {
            LoadError::SourceNotFound { .. } => {
                Some("arguments are: membership poll [output] [aliases] [manual] [outsiders] [late]".to_string())
            }
            LoadError::Busy { .. } => Some("close the file in Excel and run again".to_string()),
            LoadError::MalformedRecord { .. } => {
                Some("fix the row, or adjust [layout] in the --config file".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    pub fn recon(err: ReconError) -> Self {
        let code = match &err {
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_CHECK_CONFIG,
            ReconError::EmptyVoter { .. } | ReconError::EmptyBallot { .. } => EXIT_CHECK_MALFORMED,
        };
        Self { code, message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn cmd_check(cli: Cli) -> Result<(), CliError> {
    let mut config = load_config(cli.config.as_deref())?;
    let columns = config
        .layout
        .primary_columns()
        .map_err(CliError::recon)?;
    ReportFormat::from_path(&cli.output)
        .map_err(|e| CliError::load(e).with_hint("use a .xlsx or .json output file"))?;

    // Every input is checked before any of them is read.
    let inputs = [Some(&cli.membership), Some(&cli.poll), cli.aliases.as_ref(), cli.manual.as_ref()]
        .into_iter()
        .chain([cli.outsiders.as_ref(), cli.late.as_ref()])
        .flatten();
    for path in inputs {
        check_readable(path).map_err(CliError::load)?;
    }

    let roster = load_roster(
        &RosterSources {
            members: cli.membership.clone(),
            aliases: cli.aliases.clone(),
            out_of_district: cli.outsiders.clone(),
            missed_deadline: cli.late.clone(),
        },
        &config.sheets,
    )
    .map_err(CliError::load)?;
    if config.checks.district && !roster.has_district {
        info!("district check skipped: no out-of-district list");
        config.checks.district = false;
    }
    if config.checks.deadline && !roster.has_deadline {
        info!("deadline check skipped: no missed-deadline list");
        config.checks.deadline = false;
    }

    let ballots = load_ballots(
        &BallotSources { poll: cli.poll.clone(), manual: cli.manual.clone() },
        &config.sheets,
        &config.layout,
        &columns,
    )
    .map_err(CliError::load)?;

    let input = ReconInput {
        roster: roster.roster,
        manual_votes: ballots.manual,
        primary_votes: ballots.primary,
    };
    let report = ballotcheck_recon::run(&config, &input).map_err(CliError::recon)?;

    let output = output::unique_output_path(&cli.output, chrono::Local::now().naive_local());
    if output != cli.output {
        warn!("{} exists, writing {} instead", cli.output.display(), output.display());
    }
    write_report(&report, &output).map_err(CliError::load)?;

    if cli.json {
        let json = render_json(&report).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("JSON serialization error: {e}"),
            hint: None,
        })?;
        println!("{json}");
    }

    if !cli.quiet {
        print_summary(&report, &output);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<CheckConfig, CliError> {
    let Some(path) = path else {
        return Ok(CheckConfig::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        let err = LoadError::from_io(path, e);
        let code = match &err {
            LoadError::SourceNotFound { .. } => EXIT_CHECK_NOT_FOUND,
            LoadError::Busy { .. } => EXIT_CHECK_BUSY,
            _ => EXIT_CHECK_CONFIG,
        };
        CliError { code, message: format!("cannot read config: {err}"), hint: None }
    })?;
    let config = CheckConfig::from_toml(&text).map_err(CliError::recon)?;
    info!("config loaded from {}", path.display());
    Ok(config)
}

/// Human summary to stderr
fn print_summary(report: &Report, output: &Path) {
    let s = &report.summary;
    eprintln!(
        "{} votes ({} manual) on {} ballot(s): {} suspect record(s) covering {} vote(s), {} duplicate(s)",
        s.votes, s.manual_votes, s.ballots, s.suspect_records, s.suspect_votes, s.duplicates,
    );
    for (reason, count) in &s.reason_counts {
        eprintln!("  {reason}: {count}");
    }
    let skipped: Vec<&str> = [
        ("membership", s.checks.membership),
        ("district", s.checks.district),
        ("deadline", s.checks.deadline),
    ]
    .into_iter()
    .filter(|(_, ran)| !ran)
    .map(|(name, _)| name)
    .collect();
    if !skipped.is_empty() {
        eprintln!("  skipped checks: {}", skipped.join(", "));
    }
    eprintln!("wrote {}", output.display());
}
