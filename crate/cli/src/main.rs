use std::{path::PathBuf, process};

use clap::{Parser, Subcommand};
use parameter_manager_cli::{
    actions::parameters::ParameterCommands,
    error::result::{CliResult, CliResultHelper},
};
use parameter_manager_client::ClientConf;
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file location.
    /// Defaults to the `PM_CLI_CONF` environment variable, then `~/.cosmian/pmctl.json`
    #[arg(short, long)]
    conf: Option<PathBuf>,

    /// The Parameter Manager endpoint, overriding the configuration file
    #[arg(long)]
    url: Option<String>,

    #[command(subcommand)]
    command: CliCommands,
}

#[derive(Subcommand)]
enum CliCommands {
    #[command(subcommand)]
    Parameters(ParameterCommands),
}

#[tokio::main]
async fn main() {
    if let Some(err) = main_().await.err() {
        eprintln!("ERROR: {err}");
        process::exit(1);
    }
}

async fn main_() -> CliResult<()> {
    parameter_manager_logger::log_init("warn");
    let opts = Cli::parse();

    let conf_path = ClientConf::location(opts.conf)?;
    let mut conf = ClientConf::load(&conf_path)
        .with_context(|| format!("Unable to load the configuration at {conf_path:?}"))?;
    if let Some(url) = opts.url {
        conf.parameter_manager_url = url;
    }
    debug!("Parameter Manager endpoint: {}", conf.parameter_manager_url);

    match opts.command {
        CliCommands::Parameters(command) => command.process(&conf).await?,
    };

    Ok(())
}
