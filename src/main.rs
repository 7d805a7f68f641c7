mod config;
mod error;
mod io;
mod lookup;
mod protocol;
mod state;
mod types;

use clap::Parser;
use config::Config;
use env_logger::Env;
use error::PipelineError;
use std::{fs::File, io::Write, path::PathBuf};

/// Count flow log records per tag and per destination port/protocol pair.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Protocol number reference file
    #[arg(long, default_value = config::DEFAULT_PROTOCOL_PATH)]
    protocols: PathBuf,

    /// Port/protocol to tag lookup table
    #[arg(long, default_value = config::DEFAULT_LOOKUP_PATH)]
    lookup: PathBuf,

    /// Flow log to aggregate
    #[arg(long, default_value = config::DEFAULT_FLOW_LOG_PATH)]
    flow_logs: PathBuf,

    /// Report to write, replaced if it exists
    #[arg(long, default_value = config::DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Append the number of skipped rows per input to the report
    #[arg(long)]
    report_skipped: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            protocol_path: args.protocols,
            lookup_path: args.lookup,
            flow_log_path: args.flow_logs,
            output_path: args.output,
            report_skipped: args.report_skipped,
        }
    }
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    if let Err(err) = run(&args.into()) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), PipelineError> {
    let protocols = protocol::ProtocolDictionary::load(&config.protocol_path)?;
    let lookup = lookup::TagLookupTable::load(&config.lookup_path)?;
    let state = state::State::aggregate(&config.flow_log_path, &protocols, &lookup)?;

    let skipped = state::SkipSummary::new(&protocols, &lookup, &state);
    if skipped != state::SkipSummary::default() {
        log::info!(
            "Skipped malformed rows: {} protocol, {} lookup, {} flow log",
            skipped.protocols,
            skipped.lookup,
            skipped.flow_logs
        );
    }

    // Nothing is written unless every input was read successfully
    let write_failure = |source: std::io::Error| PipelineError::WriteFailure {
        path: config.output_path.clone(),
        source,
    };

    let file = File::create(&config.output_path).map_err(write_failure)?;
    let mut writer = std::io::BufWriter::new(file);
    state.write(&mut writer).map_err(write_failure)?;
    if config.report_skipped {
        skipped.write(&mut writer).map_err(write_failure)?;
    }
    writer.flush().map_err(write_failure)?;

    log::info!(
        "Wrote {} flow records to {}",
        state.records(),
        config.output_path.display()
    );

    Ok(())
}
