//! Volley command-line entry point.
//!
//! Loads a YAML suite folder, runs it against its declared base URL, and
//! exits 0 when every item passed. All setup failures print to stderr and
//! exit 1; item failures are the reporter's to render.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use volley_application::{SetupError, SuiteRunner};
use volley_infrastructure::{load_suite, reporter_named, ReqwestExecutor};

#[derive(Debug, Parser)]
#[command(name = "volley", version, about = "Runs declarative HTTP test suites")]
struct Args {
    /// Suite folder holding options.yml and tests/*.yml.
    #[arg(default_value = "./spec")]
    folder: PathBuf,

    /// Reporter to use, overriding the suite's own `output` setting.
    #[arg(long)]
    output: Option<String>,

    /// Render nothing; shorthand for --output silent.
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<bool, SetupError> {
    let suite = load_suite(&args.folder)?;
    let output = if args.quiet {
        "silent".to_string()
    } else {
        args.output
            .clone()
            .or_else(|| suite.output.clone())
            .unwrap_or_else(|| "console".to_string())
    };
    let reporter = reporter_named(&output)?;
    let runner = SuiteRunner::new(Arc::new(ReqwestExecutor::new())).with_reporter(reporter);
    let report = runner.run(suite).await?;
    Ok(report.is_success())
}
