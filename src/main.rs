use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use photometa::{strip_path_quotes, Cli, MetadataAggregator, SaveChoice};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();

    let config = cli.config();
    config.validate()?;

    let input = match &cli.input {
        Some(path) => path.clone(),
        None => {
            let answer = prompt("Enter the path of the photo to analyze: ")?;
            PathBuf::from(strip_path_quotes(&answer))
        }
    };

    if !input.exists() {
        eprintln!("❌ File not found!");
        return Ok(ExitCode::FAILURE);
    }

    let mut aggregator = MetadataAggregator::new(&input).with_config(config);
    aggregator.extract_all();

    let save = match cli.save_choice() {
        SaveChoice::Always => true,
        SaveChoice::Never => false,
        SaveChoice::Ask => prompt("\n💾 Save metadata to a JSON file? (y/n): ")?
            .trim()
            .eq_ignore_ascii_case("y"),
    };

    // save_to_json reports the outcome itself
    if save && aggregator.save_to_json(cli.output.as_deref()).is_err() {
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line)
}
