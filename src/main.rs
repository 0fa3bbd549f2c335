use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use feedkeep::commands;
use feedkeep::error::AppError;
use feedkeep::fetcher::Fetcher;
use feedkeep::store::Store;

#[derive(Parser)]
#[command(name = "feedkeep")]
#[command(about = "Track read/unread state across RSS and Atom subscriptions", long_about = None)]
struct Cli {
    /// Path of the JSON store (default: ~/.feedkeep.json)
    #[arg(long, global = true)]
    store: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List subscriptions with unread counts
    Feeds,
    /// Add a feed to the collection
    Subscribe { url: String },
    /// Remove a feed by index
    Unsubscribe { index: String },
    /// Poll due feeds and reconcile read/unread state
    Check {
        /// Check every feed regardless of when it was last polled
        #[arg(short, long)]
        force: bool,
    },
    /// Move one unread item to read and print its link
    Next { index: Option<String> },
    /// Mark every unread item of a feed as read
    Read { index: String },
    /// Move the most recently published read item back to unread
    Unread { index: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return;
        }
        Err(err) => {
            let usage = AppError::Usage(err.to_string());
            eprintln!("{usage}");
            std::process::exit(usage.exit_code());
        }
    };

    if let Err(err) = run(cli).await {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let store = Store::resolve(cli.store.as_deref());
    let mut data = store.load()?;

    match cli.command {
        Commands::Feeds => commands::list_feeds(&data),
        Commands::Subscribe { url } => commands::subscribe(&mut data, &url),
        Commands::Unsubscribe { index } => commands::unsubscribe(&mut data, &index)?,
        Commands::Check { force } => {
            let fetcher = Fetcher::new()?;
            commands::check(&mut data, &fetcher, force).await;
        }
        Commands::Next { index } => commands::next_item(&mut data, index.as_deref())?,
        Commands::Read { index } => commands::mark_read(&mut data, &index)?,
        Commands::Unread { index } => commands::mark_unread(&mut data, &index)?,
    }

    if data.dirty {
        store.save(&data)?;
    }
    Ok(())
}
