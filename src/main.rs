//! Tabletop Deck - MTG decklist to Tabletop Simulator converter
//!
//! Reads a decklist from a file or stdin and writes the TTS saved object, or
//! serves the same conversion over HTTP with `--web-port`.

use clap::Parser;
use std::path::{Path, PathBuf};
use tabletop_deck::{
    web, BuildOutcome, Config, DeckBuilder, DeckRequest, DirectorySink, DownloadSink, StdoutSink,
};

/// Convert an MTG decklist into a Tabletop Simulator deck
#[derive(Parser, Debug)]
#[command(name = "tabletop_deck")]
#[command(version, about, long_about = None)]
struct Args {
    /// Decklist file, one card per line ("-" or omitted reads stdin).
    /// The first line may be a Moxfield / Archidekt / plain text URL.
    decklist: Option<PathBuf>,

    /// Commander name
    #[arg(short, long, default_value = "")]
    commander: String,

    /// Partner / second commander name
    #[arg(short, long, default_value = "")]
    partner: String,

    /// Directory the deck file is written to (default: download folder)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the deck JSON instead of writing a file
    #[arg(long, default_value_t = false)]
    stdout: bool,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Card back image URL
    #[arg(long)]
    card_back: Option<String>,

    /// Maximum number of card lookups in flight
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Per lookup timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Serve the converter on this port instead of converting a file
    #[arg(long)]
    web_port: Option<u16>,
}

fn load_config(args: &Args) -> tabletop_deck::Result<Config> {
    let mut config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(ref card_back) = args.card_back {
        config.card_back_url = card_back.clone();
    }
    if let Some(max) = args.max_concurrent {
        config.max_concurrent_lookups = max;
    }
    if let Some(secs) = args.timeout_secs {
        config.lookup_timeout_secs = secs;
    }
    Ok(config)
}

fn read_decklist(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
        _ => std::io::read_to_string(std::io::stdin()),
    }
}

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };
    let builder = DeckBuilder::from_config(&config);

    if let Some(port) = args.web_port {
        if let Err(e) = web::serve(builder, port).await {
            log::error!("Web server error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let decklist = match read_decklist(args.decklist.as_deref()) {
        Ok(decklist) => decklist,
        Err(e) => {
            log::error!("Failed to read decklist: {}", e);
            std::process::exit(1);
        }
    };

    let request = DeckRequest {
        commander: args.commander.clone(),
        partner: args.partner.clone(),
        decklist,
    };

    match builder.build(&request).await {
        Ok(BuildOutcome::Empty) => {
            log::info!("Nothing to convert");
        }
        Ok(BuildOutcome::Unresolved(names)) => {
            eprintln!("Cards not found:\n{}", names);
            std::process::exit(2);
        }
        Ok(BuildOutcome::Built(deck)) => {
            let sink: Box<dyn DownloadSink> = if args.stdout {
                Box::new(StdoutSink)
            } else {
                let dir = args
                    .output_dir
                    .clone()
                    .unwrap_or_else(DirectorySink::default_dir);
                Box::new(DirectorySink::new(dir))
            };
            if let Err(e) = sink.deliver(&deck.file_name, &deck.document) {
                log::error!("Failed to save deck: {}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            log::error!("Failed to build deck: {}", e);
            std::process::exit(1);
        }
    }
}
