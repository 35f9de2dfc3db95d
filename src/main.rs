use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use env_logger::Env;

use yt_top_views::commands;
use yt_top_views::commands::top::TopOptions;
use yt_top_views::config::{DEFAULT_CACHE_FILE, load_env};
use yt_top_views::pipeline::DEFAULT_TOP_N;

#[derive(Parser)]
#[command(name = "yt-top-views")]
#[command(about = "List a YouTube channel's most-viewed videos of the current year")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank this year's uploads of a channel by views (default)
    Top(TopArgs),

    /// Save the YouTube Data API key
    Init {
        /// YouTube Data API key
        #[arg(short = 'k', long)]
        api_key: Option<String>,

        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args)]
struct TopArgs {
    /// Channel ID or channel URL (prompted for when omitted)
    #[arg(short, long)]
    channel: Option<String>,

    /// Number of videos to show (default: 10)
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    limit: usize,

    /// Channel -> uploads playlist cache file
    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    cache: PathBuf,

    /// Exit right after printing instead of waiting for Enter
    #[arg(long)]
    no_wait: bool,
}

impl Default for TopArgs {
    fn default() -> Self {
        Self {
            channel: None,
            limit: DEFAULT_TOP_N,
            cache: PathBuf::from(DEFAULT_CACHE_FILE),
            no_wait: false,
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Load environment variables
    load_env();

    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Commands::Top(TopArgs::default())) {
        Commands::Top(args) => {
            commands::top::run(TopOptions {
                channel: args.channel,
                limit: args.limit,
                cache: args.cache,
                wait: !args.no_wait,
            })
            .await
        }
        Commands::Init { api_key, force } => commands::init::run(api_key, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
