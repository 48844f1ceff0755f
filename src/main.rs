use clap::Parser;
use tracing_subscriber::EnvFilter;

use army_sheet::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("army_sheet=debug,info")
    } else {
        EnvFilter::new("army_sheet=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let heuristics = cli::load_heuristics(cli.heuristics.as_deref())?;

    match cli.command {
        cli::Commands::Parse(args) => {
            cli::parse::run(args, cli.format, cli.verbose, &heuristics)?;
        }
        cli::Commands::Resolve(args) => {
            cli::resolve::run(args, cli.format, cli.verbose, &heuristics)?;
        }
        cli::Commands::Generate(args) => {
            cli::generate::run(args, cli.format, cli.verbose, &heuristics)?;
        }
    }

    Ok(())
}
