use std::process::ExitCode;

use blogfeed_cli::shell;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("blogfeed=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = blogfeed_cli::run().await {
        shell().error(format!("{err:#}"));
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
