//! Circuit Lab - replay lab scripts against the circuit engine.
//!
//! # Usage
//!
//! ```bash
//! circuit-lab parallel.lab
//! circuit-lab --gate-switches --json switch.lab
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use circuit_lab::{
    analysis::{AnalyzerConfig, SwitchConduction, DEFAULT_MAX_PATHS, DEFAULT_MAX_STEPS},
    dsl,
    error::{LabError, Result},
    runner::ScriptRunner,
};

/// Circuit lab script runner
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the lab script
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Treat open switches as breaking the circuit
    #[arg(long)]
    gate_switches: bool,

    /// Print each snapshot as one JSON object per line
    #[arg(long)]
    json: bool,

    /// Node expansion budget per path enumeration
    #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// Path cap per enumeration
    #[arg(long, default_value_t = DEFAULT_MAX_PATHS)]
    max_paths: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let script = dsl::parse_file(&args.script)?;

    let conduction = if args.gate_switches {
        SwitchConduction::OpenSwitchBreaks
    } else {
        SwitchConduction::IgnoreState
    };
    let config = AnalyzerConfig::new()
        .with_switch_conduction(conduction)
        .with_max_steps(args.max_steps)
        .with_max_paths(args.max_paths);

    let mut runner = ScriptRunner::new(config);
    let snapshots = runner.run(&script)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for snapshot in &snapshots {
        let written = if args.json {
            writeln!(out, "{}", snapshot.state.to_json()?)
        } else {
            match snapshot.line {
                Some(line) => writeln!(out, "-- line {} --\n{}", line, snapshot.state),
                None => writeln!(out, "{}", snapshot.state),
            }
        };
        written.map_err(|e| LabError::OutputError {
            message: e.to_string(),
        })?;
    }

    Ok(())
}
