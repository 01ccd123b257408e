//! Formlink CLI - Link Form 471 work items to their establishing Form 470.

use clap::Parser;
use formlink_cli::commands;
use formlink_cli::{config, Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(cli)) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> formlink_cli::Result<()> {
    let config = config::load(cli.config.as_deref(), cli.dry_run)?;
    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Run => commands::execute_run(&config, &formatter).await?,
        Command::Watch(args) => commands::execute_watch(args, &config, &formatter).await?,
        Command::Process(args) => commands::execute_process(args, &config, &formatter).await?,
        Command::Seed => commands::execute_seed(&config, &formatter).await?,
        Command::Show(args) => commands::execute_show(args, &config, &formatter).await?,
    }

    Ok(())
}
