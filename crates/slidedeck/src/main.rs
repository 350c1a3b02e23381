use clap::Parser;

use slidedeck::cli::Cli;
use slidedeck::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet)?;

    cli.run()
}
