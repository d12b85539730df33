use std::{io, path::PathBuf, process::ExitCode};

use clap::{CommandFactory, Parser, ValueHint};
use ocplist::{ConnectOptions, claputil};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    name = "ocplist",
    version,
    about = "List the APIRequestCounts and Consoles of an OpenShift cluster"
)]
struct Cli {
    /// Path to the kubeconfig file to use instead of the default one.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    kubeconfig: Option<PathBuf>,

    #[arg(long, value_name = "CONTEXT", add = claputil::context_value_completer())]
    /// Override the Kubernetes context to target.
    context: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    clap_complete::CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();

    // stdout carries the report; logs go to stderr.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ocplist=warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let options = ConnectOptions {
        kubeconfig: cli.kubeconfig,
        context: cli.context,
    };

    match ocplist::inspect(&options, &mut io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => {
            tracing::debug!(step = ?failure.step, "aborting");
            ocplist::write_failure(&mut io::stdout().lock(), &failure);
            ExitCode::FAILURE
        }
    }
}
