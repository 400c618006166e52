use clap::Parser;

use release_propagator::{
    ReleaseEvent, Result,
    cli::{Args, Command},
    command,
};

fn initialize_logger(debug: bool) -> Result<()> {
    let filter = if debug {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };

    let config = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("release_propagator")
        .build();

    simplelog::TermLogger::init(
        filter,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli_args = Args::parse();

    initialize_logger(cli_args.debug)?;

    let propagator = command::common::build_propagator(&cli_args)?;

    match cli_args.command {
        Command::Serve { addr } => {
            command::serve::execute(propagator, addr).await
        }
        Command::Propagate {
            org,
            repo,
            tag,
            default_branch,
        } => {
            let event = ReleaseEvent {
                organization: org,
                repository: repo,
                tag,
                default_branch,
            };
            command::propagate::execute(&propagator, event).await
        }
    }
}
