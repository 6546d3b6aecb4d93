//! Braid CLI - draw commit graphs in the terminal.

use braid::source::{self, GitHistory};
use braid::{CommitStore, ConfigFile, GlyphRenderer, LayoutOptions, NodeId, compute, deploy};
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

mod cli;

use cli::{Cli, Command, LayoutFlags};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("braid")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("braid.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn load_options(cli: &Cli, flags: &LayoutFlags) -> Result<LayoutOptions> {
    let config = match cli.config.clone().or_else(ConfigFile::default_path) {
        Some(path) => ConfigFile::load(&path)?,
        None => ConfigFile::default(),
    };

    let mut options = config.apply(LayoutOptions::default());
    options.mingle |= flags.mingle;
    options.flip |= flags.flip;
    options.hflip |= flags.hflip;
    options.vflip |= flags.vflip;
    if cli.no_color {
        options.color = false;
        colored::control::set_override(false);
    }
    Ok(options)
}

fn load_store(file: &Path, heads: &[String]) -> Result<(CommitStore, Vec<NodeId>)> {
    let commits = if file == Path::new("-") {
        source::read_jsonl(BufReader::new(io::stdin().lock())).context("Failed to read commits from stdin")?
    } else {
        source::load_jsonl(file)?
    };

    let store = CommitStore::from_commits(commits).context("Failed to load commits")?;
    let heads = if heads.is_empty() {
        store.heads()
    } else {
        store.resolve(heads).context("Unknown head")?
    };
    Ok((store, heads))
}

fn draw(store: &mut CommitStore, heads: &[NodeId], options: &LayoutOptions) -> Result<()> {
    let renderer = GlyphRenderer::new(options);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    deploy(store, heads, options, &renderer, &mut out)?;
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Show { file, heads, flags } => {
            let options = load_options(&cli, flags)?;
            let (mut store, heads) = load_store(file, heads)?;
            draw(&mut store, &heads, &options)?;
        }

        Command::Git {
            repo,
            max_count,
            revs,
            flags,
        } => {
            let options = load_options(&cli, flags)?;
            let GitHistory { commits, heads } =
                source::git_log(repo, revs, *max_count).context("Failed to read git history")?;

            let mut store = CommitStore::from_commits(commits).context("Failed to load commits")?;
            let heads = store.resolve(&heads)?;
            draw(&mut store, &heads, &options)?;
        }

        Command::Coords { file, heads, flags } => {
            let options = load_options(&cli, flags)?;
            let (mut store, heads) = load_store(file, heads)?;
            let layout = compute(&mut store, &heads, &options)?;
            let stdout = io::stdout();
            let mut out = io::BufWriter::new(stdout.lock());
            layout.report(&store).write_json(&mut out)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
