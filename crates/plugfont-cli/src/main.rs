//! plugfont CLI - drive a font host from the command line

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use plugfont::{FontHost, HostConfig};

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let host = build_host(&cli)?;
    match &cli.command {
        Commands::Families => commands::families::run(&host),
        Commands::Describe(args) => commands::describe::run(&host, args),
        Commands::Measure(args) => commands::measure::run(&host, args),
        Commands::Hit(args) => commands::hit::run(&host, args),
        Commands::Render(args) => commands::render::run(&host, args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn build_host(cli: &Cli) -> Result<FontHost> {
    let mut config = HostConfig::from_env();
    if cli.no_system_fonts {
        config = config.with_system_fonts(false);
    }
    if let Commands::Render(args) = &cli.command {
        if args.no_antialias {
            config = config.with_antialias(false);
        }
    }

    let mut builder = FontHost::builder().config(config);
    for path in &cli.fonts {
        builder = builder.font_file(path);
    }
    builder.build().context("Failed to set up the font host")
}
