mod cli;
mod logging;

use clap::Parser;

use cli::Cli;
use logging::{LoggingConfig, init_logging};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::verbose(cli.verbose));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    cli::execute(cli.command, &mut out)
}
