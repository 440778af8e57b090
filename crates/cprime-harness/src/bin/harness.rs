//! CLI entrypoint for the cprime scenario harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cprime_core::except::{Exception, ExceptionCode};
use cprime_core::stdio::FileTokenizer;
use cprime_core::{get_int, get_string, input, throw};
use cprime_harness::structured_log::{LogEmitter, validate_log_file};
use cprime_harness::{HarnessError, SCENARIOS, ScenarioRunner};

/// Scenario and reader tooling for the cprime runtime.
#[derive(Debug, Parser)]
#[command(name = "cprime-harness")]
#[command(about = "Runs exception-channel scenarios and reader tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the built-in scenarios.
    Scenarios {
        /// Run only the named scenario.
        #[arg(long)]
        name: Option<String>,
        /// Write the JSONL log here instead of stdout.
        #[arg(long)]
        log: Option<PathBuf>,
        /// List scenarios without running them.
        #[arg(long)]
        list: bool,
    },
    /// Print every space-separated token of a file, one per line.
    Tokens {
        path: PathBuf,
    },
    /// Print every line of a file with its number.
    Lines {
        path: PathBuf,
    },
    /// Prompt for a name, an age and a score on stdin.
    Ask,
    /// Print the exception code table.
    Codes,
    /// Validate a JSONL scenario log.
    ValidateLog {
        path: PathBuf,
    },
}

fn run_scenarios(
    name: Option<String>,
    log: Option<PathBuf>,
    list: bool,
) -> Result<(), HarnessError> {
    if list {
        for scenario in SCENARIOS {
            println!("{:<20} {}", scenario.name, scenario.description);
        }
        return Ok(());
    }
    let mut emitter = match &log {
        Some(path) => LogEmitter::to_file(path, "scenarios")?,
        None => LogEmitter::to_stdout("scenarios"),
    };
    let mut runner = ScenarioRunner::new("scenarios");
    if let Some(name) = name {
        runner = runner.only(name);
    }
    let (summary, reports) = runner.run(&mut emitter)?;
    for report in &reports {
        eprintln!("[{:?}] {}", report.outcome, report.name);
        for line in &report.transcript {
            eprintln!("    {line}");
        }
    }
    eprintln!(
        "{} scenarios: {} passed, {} failed",
        summary.total, summary.passed, summary.failed
    );
    if !summary.all_passed() {
        throw!(ExceptionCode::Failure, "{} scenario(s) failed", summary.failed);
    }
    Ok(())
}

fn print_tokens(path: PathBuf) -> Result<(), Exception> {
    let mut reader = FileTokenizer::open(&path)?;
    while let Some(token) = reader.next_token()? {
        println!("{token}");
    }
    reader.close();
    Ok(())
}

fn print_lines(path: PathBuf) -> Result<(), Exception> {
    let mut reader = FileTokenizer::open(&path)?;
    let mut number = 0usize;
    while reader.has_next()? {
        let Some(line) = reader.next_line()? else {
            break;
        };
        number += 1;
        println!("{number:>6}  {line}");
    }
    reader.close();
    Ok(())
}

fn ask() -> Result<(), Exception> {
    let name = get_string!("Name: ")?.unwrap_or_else(|| "stranger".into());
    let age = get_int!("Age: ")?;
    let score = input!(f64, "Score for {}: ", name)?;
    match (age, score) {
        (Some(age), Some(score)) => println!("{name}, {age}, scored {score}"),
        (None, _) => throw!(ExceptionCode::InvalidFormat, "age is not an integer"),
        (_, None) => throw!(ExceptionCode::InvalidFormat, "score is not a number"),
    }
    Ok(())
}

fn print_codes() {
    for code in ExceptionCode::ALL {
        println!("{:>3}  {:<28} {}", code.as_raw(), format!("{code:?}"), code.describe());
    }
}

fn validate_log(path: PathBuf) -> Result<(), HarnessError> {
    let (lines, errors) = validate_log_file(&path)?;
    for err in &errors {
        eprintln!("{err}");
    }
    if !errors.is_empty() {
        throw!(
            ExceptionCode::InvalidFormat,
            "{} of {lines} line(s) failed validation",
            errors.len()
        );
    }
    println!("{}: {lines} valid line(s)", path.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    cprime_abi::main(move || match cli.command {
        Command::Scenarios { name, log, list } => Ok(run_scenarios(name, log, list)?),
        Command::Tokens { path } => print_tokens(path),
        Command::Lines { path } => print_lines(path),
        Command::Ask => ask(),
        Command::Codes => {
            print_codes();
            Ok(())
        }
        Command::ValidateLog { path } => Ok(validate_log(path)?),
    })
}
