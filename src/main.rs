mod cli;
mod config;
mod domain;
mod error;
mod infra;
mod media;
mod workflows;

use anyhow::Result;
use clap::Parser;
use log::{info, LevelFilter};

use cli::{Cli, Command};
use config::ConfigFile;
use workflows::{add_subtitles, merge_audio, strip_subtitles};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .format_timestamp(None)
        .target(env_logger::Target::Stdout)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let file = ConfigFile::load(cli.config.as_deref())?;
    let tool = file.tool();

    let report = match &cli.command {
        Command::AddSubtitles(args) => {
            let config = file.add_subtitles(args)?;
            add_subtitles::run(&config, &tool, cli.dry_run)?
        }
        Command::MergeAudio(args) => {
            let config = file.merge_audio(args)?;
            merge_audio::run(&config, &tool, cli.dry_run)?
        }
        Command::StripSubtitles(args) => {
            let config = file.strip_subtitles(args)?;
            strip_subtitles::run(&config, &tool, cli.dry_run)?
        }
    };

    info!("Done: {report}");
    Ok(())
}
