//! md2blocks CLI - render Markdown into block descriptors.
//!
//! Entry point: argument parsing, logging initialization and command dispatch.

use clap::Parser;
use md2blocks_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match &args.command {
        cli::Command::Convert(convert_args) => {
            commands::convert_execute(convert_args, args.config.as_deref())
        }
        cli::Command::Check(check_args) => {
            commands::check_execute(check_args, args.config.as_deref())
        }
    };

    result.map_err(error::cli_error_to_miette)
}
