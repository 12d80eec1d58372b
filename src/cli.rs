//! CLI parsing and orchestration. Looks up comics and What If? articles, prints or downloads them. Maps errors to exit codes.

use crate::api::comic::DownloadOptions;
use crate::api::{parse_number, Endpoints, HttpClient, XkcdClient, XkcdError};
use crate::config;
use crate::model::{open_in_browser, Comic, WhatIf};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Xkcd(#[from] XkcdError),

    #[error("{0}")]
    Output(String),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) | CliRunError::NotFound(_) => 1,
            CliRunError::Xkcd(XkcdError::Validation { .. }) => 1,
            CliRunError::Xkcd(XkcdError::Io { .. }) | CliRunError::Output(_) => 3,
            CliRunError::Xkcd(_) => 2,
        }
    }
}

/// Which comic or article to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Latest,
    Random,
    Number(i64),
}

#[derive(Parser, Debug)]
#[command(name = "xkcd")]
#[command(about = "Look up xkcd comics and What If? articles")]
#[command(
    after_help = "Config file keys (download_dir, user_agent, timeout_secs, [endpoints]) are read from ./xkcd.toml or ~/.config/xkcd/config.toml. CLI flags override config."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Print records as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress progress output and warnings (errors only).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging and the full error chain.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// HTTP User-Agent (overrides config).
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (overrides config; default 30).
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a comic: latest (default), random, or a number.
    Comic {
        #[arg(default_value = "latest", value_parser = parse_pick, allow_negative_numbers = true)]
        which: Pick,

        /// Open the comic page in the browser.
        #[arg(long)]
        open: bool,

        /// Print (or with --open, open) the explainxkcd page instead.
        #[arg(long)]
        explain: bool,

        /// Download the comic image.
        #[arg(short, long)]
        download: bool,

        /// Directory for the image. Default: config download_dir, else ~/Downloads.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// File name for the image. Default: xkcd-{number}-{image name}.
        #[arg(long)]
        output_file: Option<String>,

        /// Download the double-resolution image.
        #[arg(long)]
        x2: bool,
    },
    /// Show a What If? article: latest (default), random, or a number.
    Whatif {
        #[arg(default_value = "latest", value_parser = parse_pick, allow_negative_numbers = true)]
        which: Pick,

        /// Open the article in the browser.
        #[arg(long)]
        open: bool,
    },
    /// List every What If? article in the archive.
    Archive,
}

fn parse_pick(s: &str) -> Result<Pick, String> {
    match s.trim().to_lowercase().as_str() {
        "latest" => Ok(Pick::Latest),
        "random" => Ok(Pick::Random),
        other => parse_number(other)
            .map(Pick::Number)
            .map_err(|_| format!("Invalid value '{}'. Use latest, random, or a number.", s)),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), CliRunError> {
    let s = serde_json::to_string_pretty(value)
        .map_err(|e| CliRunError::Output(format!("Failed to write JSON: {}", e)))?;
    println!("{}", s);
    Ok(())
}

fn print_comic(comic: &Comic) {
    println!("{}: {}", comic.number, comic.title);
    println!("{}", comic.link);
    println!("Image: {}", comic.image_url);
    println!("Date: {:04}-{:02}-{:02}", comic.year, comic.month, comic.day);
    println!("Alt: {}", comic.alt_text);
}

fn print_whatif(whatif: &WhatIf) {
    println!("{}: {}", whatif.number, whatif.title);
    println!("{}", whatif.link);
}

fn spinner(message: &str) -> indicatif::ProgressBar {
    let bar = indicatif::ProgressBar::new_spinner();
    bar.set_style(
        indicatif::ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Entry point for the CLI. Returns Ok(()) on success; Err with exit code and message on failure.
pub fn run(args: &Args) -> Result<(), CliRunError> {
    let config = config::load_config().map_err(CliRunError::InvalidInput)?;

    let timeout_secs = args
        .timeout
        .or_else(|| config.as_ref().and_then(|c| c.timeout_secs))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let user_agent = args
        .user_agent
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.user_agent.clone()));
    let endpoints: Endpoints = config
        .as_ref()
        .and_then(|c| c.endpoints.clone())
        .unwrap_or_default();

    let mut builder = HttpClient::builder().timeout_secs(timeout_secs);
    if let Some(ua) = user_agent {
        builder = builder.user_agent(ua);
    }
    let http = builder
        .build()
        .map_err(|e| XkcdError::Client { source: e })?;
    let client = XkcdClient::with_fetcher(http, endpoints);

    match &args.command {
        Command::Comic {
            which,
            open,
            explain,
            download,
            output_dir,
            output_file,
            x2,
        } => {
            let comic = match *which {
                Pick::Latest => client.latest_comic()?,
                Pick::Random => client.random_comic()?,
                Pick::Number(n) => client.comic(n, args.quiet)?,
            };
            if !comic.is_valid() {
                return Err(CliRunError::NotFound(
                    "You have requested an invalid comic.".to_string(),
                ));
            }

            if *explain {
                let link = client.explanation_link(&comic).unwrap_or_default();
                if *open {
                    open_in_browser(&link);
                } else {
                    println!("{}", link);
                }
            } else if args.json {
                print_json(&comic)?;
            } else {
                print_comic(&comic);
            }
            if *open && !*explain {
                comic.show();
            }

            if *download {
                let options = DownloadOptions {
                    output_dir: output_dir
                        .clone()
                        .or_else(|| config.as_ref().and_then(|c| c.download_dir.clone())),
                    output_file: output_file.clone(),
                    x2: *x2,
                    silent: args.quiet,
                };
                let bar = (!args.quiet).then(|| spinner("Downloading image"));
                let result = client.download_image(&comic, &options);
                if let Some(bar) = bar {
                    bar.finish_and_clear();
                }
                match result? {
                    Some(path) => {
                        if !args.quiet {
                            eprintln!("Wrote {}", path.display());
                        }
                    }
                    None => {
                        return Err(CliRunError::Output(format!(
                            "Could not save the image for comic {}.",
                            comic.number
                        )))
                    }
                }
            }
        }
        Command::Whatif { which, open } => {
            let archive = client.fetch_whatif_archive()?;
            let whatif = match *which {
                Pick::Latest => client.latest_whatif(Some(&archive))?,
                Pick::Random => client.random_whatif(Some(&archive))?,
                Pick::Number(n) => client
                    .whatif_by_number(n, Some(&archive))?
                    .ok_or_else(|| {
                        CliRunError::NotFound(format!("No What If? article number {}.", n))
                    })?,
            };
            if args.json {
                print_json(&whatif)?;
            } else {
                print_whatif(&whatif);
            }
            if *open {
                whatif.show();
            }
        }
        Command::Archive => {
            let archive = client.fetch_whatif_archive()?;
            if archive.is_empty() {
                return Err(CliRunError::Xkcd(XkcdError::EmptyArchive));
            }
            if args.json {
                let entries: Vec<&WhatIf> = archive.values().collect();
                print_json(&entries)?;
            } else {
                for whatif in archive.values() {
                    println!("{:>4}  {}", whatif.number, whatif.title);
                }
            }
        }
    }
    Ok(())
}
