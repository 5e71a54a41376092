//! live-server entry point.
//!
//! Parses arguments, sets up logging and runs the serve command.

use clap::Parser;
use live_server::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::set_quiet(args.quiet);
    ui::set_color(!args.no_color && logger::should_use_colors());

    commands::serve_execute(args)
        .await
        .map_err(error::cli_error_to_miette)
}
