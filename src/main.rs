use clap::{Parser, Subcommand};
use lexitrial::config::WordsConfig;
use std::process;
use tracing::{error, info};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, short, long, default_value = "data/words_config.json")]
    words: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the experiment session interactively.
    Run(cmd::run::RunArgs),
    /// Audit a words configuration without running anything.
    Validate(cmd::validate::ValidateArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    info!("🧪 Initializing LexiTrial...");
    info!("📂 Loading words configuration: {}", cli.words);
    let words = WordsConfig::load_from_file(&cli.words).unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });

    let result = match cli.command {
        Commands::Run(args) => cmd::run::run(args, words),
        Commands::Validate(args) => cmd::validate::run(args, &words),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
