//! vibeboard: build a cover-art mood board from the command line.
//!
//! Prints the board (and the narrative, when requested) as JSON on stdout.
//! With `--covers`, prints cover art URLs for the matched artist instead.

use clap::Parser;
use tracing::info;

use vibeboard::{BoardRequest, CoverSearchRequest};
use vibeboard::config::{Config, Secrets};
use vibeboard::service::DEFAULT_LIMIT;

/// Cover-art mood boards for MusicBrainz release groups.
#[derive(Parser)]
#[command(name = "vibeboard")]
#[command(version = vibeboard::PKG_VERSION)]
#[command(about = "Group album covers by the mood of their palettes")]
struct Args {
    /// Free-form query, e.g. "albums by Portishead" or "doom metal covers".
    query: String,

    /// Maximum number of release groups (1-50).
    #[arg(short, long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Include fetch attempts and chosen URLs (board) or query routing (covers).
    #[arg(short, long)]
    debug: bool,

    /// Request a narrative in this style (poetic, plain, neutral or free text).
    #[arg(short, long, value_name = "STYLE", num_args = 0..=1, default_missing_value = "neutral")]
    narrate: Option<String>,

    /// List cover art URLs instead of building a board.
    #[arg(long, conflicts_with = "narrate")]
    covers: bool,

    /// Path to configuration file.
    #[arg(short, long, env = "VIBEBOARD_CONFIG")]
    config: Option<std::path::PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;

    let json = if args.covers {
        let search = config.build_cover_search()?;
        info!(version = vibeboard::PKG_VERSION, "vibeboard cover search starting");

        let request = CoverSearchRequest::new(args.query)
            .limit(args.limit)
            .debug(args.debug);
        let response = search.search(&request).await?;
        to_json(&response, args.pretty)?
    } else {
        let secrets = Secrets::load()?;
        let service = config.build_service(&secrets)?;
        info!(
            version = vibeboard::PKG_VERSION,
            narrative = service.narrative().backend_name().unwrap_or("none"),
            "vibeboard starting"
        );

        let mut request = BoardRequest::new(args.query)
            .limit(args.limit)
            .debug(args.debug);
        if let Some(style) = args.narrate {
            request = request.narrate(style);
        }
        let response = service.run(&request).await?;
        to_json(&response, args.pretty)?
    };
    println!("{json}");

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
