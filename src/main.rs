use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use onepdf::cli::Cli;
use onepdf::host;
use onepdf::output::OutputFormatter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let formatter = OutputFormatter::new(cli.quiet, cli.verbose);
    if let Err(err) = host::run(&cli, &formatter).await {
        error!(error = %err, "onepdf failed");
        std::process::exit(err.exit_code());
    }

    Ok(())
}

fn init_tracing(cli: &Cli) {
    let default_level = if cli.verbose {
        "onepdf=debug"
    } else if cli.quiet {
        "onepdf=warn"
    } else {
        "onepdf=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
