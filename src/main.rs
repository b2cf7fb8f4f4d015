use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use pdf_outline::{flatten_outline_with, outline_levels_with_page_destination, Document};
use std::io::{self, Write};
use std::path::PathBuf;

mod config;
use config::{Config, OutputFormat};
mod report;
use report::{write_flat_outline, write_levels};

/// A program to list the bookmarks of PDF files with the pages they point at
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration File
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output format, overrides the configuration file
    #[arg(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the flattened outline of each file
    Flatten {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the outline levels holding at least one resolvable bookmark
    Levels {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Unable to load configuration {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(format) = args.format {
        config.format = format;
    }
    let options = config.flatten_options();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.command {
        Command::Flatten { files } => {
            for file in files {
                let doc = Document::load(file)
                    .with_context(|| format!("Unable to load {}", file.display()))?;
                let entries = flatten_outline_with(&doc, &options);
                log::info!("{}: {} bookmarks", file.display(), entries.len());
                write_flat_outline(&mut out, file, &entries, config.format)?;
            }
        }
        Command::Levels { files } => {
            for file in files {
                let doc = Document::load(file)
                    .with_context(|| format!("Unable to load {}", file.display()))?;
                let levels = outline_levels_with_page_destination(&doc);
                write_levels(&mut out, file, &levels, config.format)?;
            }
        }
    }
    out.flush()?;

    Ok(())
}
