use anyhow::Result;
use clap::Parser;
use par_grid::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Routes log::info!() etc. to the debug log file; mirrors to stderr when RUST_LOG is set.
    // The --log-level flag takes precedence over RUST_LOG.
    par_grid::debug::init_log_bridge(cli.log_level.map(Into::into));

    let code = cli::run(cli)?;
    if code != 0 {
        // Nothing is left to clean up, so skipping destructors is fine here
        std::process::exit(code);
    }
    Ok(())
}
