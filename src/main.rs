use clap::Parser;
use registry_hub::cli::Args;
use registry_hub::{logging, server};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose, args.quiet);

    let config = match args.into_config() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = server::serve(config).await {
        tracing::error!("{}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
