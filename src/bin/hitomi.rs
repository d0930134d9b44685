//! hitomi - search and download galleries from the command line
//!
//! ```bash
//! # ids of english doujinshi by an artist, tagged with glasses
//! hitomi search --artist foo --tags female:glasses --worktype doujinshi --language english
//!
//! # download them
//! hitomi search --artist foo | hitomi download --threads 8
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use clap::{Parser, Subcommand};
use hitomi::prelude::*;
use hitomi::types::{DEFAULT_SAVEDIR, DEFAULT_THREADS};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hitomi", version)]
#[command(about = "Search and download hitomi.la galleries")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ids of galleries matching all given filters
    Search(SearchArgs),
    /// Download galleries by id
    Download(DownloadArgs),
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Artist name
    #[arg(short, long)]
    artist: Option<String>,

    /// Series
    #[arg(short, long)]
    series: Option<String>,

    /// Character
    #[arg(short, long)]
    character: Option<String>,

    /// Type of work
    #[arg(short, long, value_enum)]
    worktype: Option<ArtType>,

    /// Tags; you can specify more than one
    #[arg(short, long, num_args = 1.., default_value = "index")]
    tags: Vec<String>,

    /// Language
    #[arg(short, long, default_value = "all")]
    language: String,

    /// Do not print "no items found."
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::Args, Debug)]
struct DownloadArgs {
    /// Gallery ids; read from stdin when none are given
    galleryids: Vec<String>,

    /// Directory to save pictures in
    #[arg(short, long, default_value = DEFAULT_SAVEDIR, env = "HITOMI_SAVEDIR")]
    savedir: PathBuf,

    /// Number of parallel downloads
    #[arg(short = 'j', long, default_value_t = DEFAULT_THREADS, env = "HITOMI_THREADS")]
    threads: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hitomi=info")),
        )
        .init();

    let cli = Cli::parse();
    let client = Hitomi::new();

    match cli.command {
        Command::Search(args) => run_search(&client, args).await,
        Command::Download(args) => run_download(&client, args).await,
    }
}

async fn run_search(client: &Hitomi, args: SearchArgs) -> ExitCode {
    let params = SearchParams {
        artist: args.artist,
        series: args.series,
        character: args.character,
        art_type: args.worktype,
        tags: args.tags,
        language: args.language,
    };

    match client.search(&params).await {
        Ok(ids) => {
            let line: Vec<String> = ids.iter().map(ToString::to_string).collect();
            println!("{}", line.join(" "));
            ExitCode::SUCCESS
        }
        Err(e) => {
            let (message, code) = search_failure(&e, args.quiet);
            match message {
                Some(Message::Stdout(line)) => println!("{}", line),
                Some(Message::Stderr(line)) => eprintln!("{}", line),
                None => {}
            }
            ExitCode::from(code)
        }
    }
}

/// A line to print, and where it goes.
#[derive(Debug, PartialEq, Eq)]
enum Message {
    Stdout(String),
    Stderr(String),
}

/// What a failed search prints and its exit code.
///
/// `--quiet` only hides "no items found."; the exit code is 1 either way.
fn search_failure(error: &hitomi::Error, quiet: bool) -> (Option<Message>, u8) {
    if error.is_not_found() {
        let message = (!quiet).then(|| Message::Stdout("no items found.".to_string()));
        (message, 1)
    } else {
        (Some(Message::Stderr(format!("search failed: {}", error))), 1)
    }
}

async fn run_download(client: &Hitomi, args: DownloadArgs) -> ExitCode {
    let raw = if args.galleryids.is_empty() {
        let mut input = String::new();
        if let Err(e) = tokio::io::stdin().read_to_string(&mut input).await {
            eprintln!("failed to read gallery ids from stdin: {}", e);
            return ExitCode::FAILURE;
        }
        input.split_whitespace().map(str::to_string).collect()
    } else {
        args.galleryids
    };

    let ids = match parse_ids(&raw) {
        Ok(ids) => ids,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = DownloadOptions {
        savedir: args.savedir,
        threads: args.threads,
    };

    let mut status = ExitCode::SUCCESS;
    for id in ids {
        match download_gallery(client, id, &options).await {
            Ok(report) => {
                for failure in &report.failures {
                    eprintln!(
                        "gallery {}: {} failed: {}",
                        id,
                        failure.name.as_deref().unwrap_or("worker"),
                        failure.error
                    );
                }
                if !report.is_complete() {
                    status = ExitCode::FAILURE;
                }
            }
            Err(e) => {
                eprintln!("gallery {}: {}", id, e);
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}

/// Downloads one gallery, printing each saved path as its image completes.
async fn download_gallery(
    client: &Hitomi,
    id: GalleryId,
    options: &DownloadOptions,
) -> hitomi::Result<DownloadReport> {
    let gallery = client.gallery(id).await?;

    let (tx, mut rx) = mpsc::unbounded_channel::<PathBuf>();
    let printer = async {
        while let Some(path) = rx.recv().await {
            println!("{}", path.display());
        }
    };

    let (report, ()) = tokio::join!(client.download_with_progress(&gallery, options, tx), printer);
    report
}

/// Parses gallery ids, ignoring thousands separators such as `1,234,567`.
fn parse_ids(raw: &[String]) -> Result<Vec<GalleryId>, String> {
    raw.iter()
        .map(|token| token.replace([',', ' '], ""))
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<GalleryId>()
                .map_err(|_| format!("invalid gallery id: {}", token))
        })
        .collect()
}
