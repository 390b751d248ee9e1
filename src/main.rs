//! `agi-session` binary.
//!
//! stdout carries nothing but directives; log echo goes to stderr.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;

use agi_session::config::Cli;
use agi_session::sink::{LogSink, TracingSink};
use agi_session::{logging, script, ProtocolSession};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("AGI error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let sink: Arc<dyn LogSink> = Arc::new(TracingSink);
    match run(&cli, sink.clone()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            sink.error(&format!("AGI error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(cli: &Cli) -> anyhow::Result<logging::LoggingGuard> {
    let config = cli.log_config();
    logging::ensure_log_dir(&config.dir).context("creating log directory")?;
    logging::init(&config).context("opening audit log")
}

fn run(cli: &Cli, sink: Arc<dyn LogSink>) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("starting runtime")?;

    runtime.block_on(async {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut session = ProtocolSession::new(stdin, tokio::io::stdout(), sink);
        script::run(&mut session, &cli.script_args())
            .await
            .context("processing call")?;
        Ok(())
    })
}
