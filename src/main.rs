use clap::Parser;
use jobsweep::app::{handle_fatal_error, init_logging, AppConfig};
use jobsweep::cli::{execute_command, Cli};

// Work is strictly sequential, so one thread is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = AppConfig::new(cli.verbose);
    init_logging(&config);

    if let Err(e) = execute_command(cli.command).await {
        handle_fatal_error(e, config.verbose);
    }
}
