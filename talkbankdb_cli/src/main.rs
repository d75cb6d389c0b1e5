mod commands;
mod output;
mod prompt;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use talkbankdb_api::transport::DEFAULT_BASE_URL;
use talkbankdb_api::{Client, Operation};

use crate::output::OutputFormat;
use crate::prompt::TerminalPrompt;

#[derive(Parser)]
#[command(name = "tbdb")]
#[command(about = "Query transcripts, speakers and words from TalkBankDB")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// TalkBankDB service URL
    #[arg(long, env = "TALKBANKDB_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Give up on a request after this many seconds
    #[arg(long, global = true)]
    deadline_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transcript metadata, one row per transcript
    Transcripts(commands::query::QueryArgs),
    /// Participant details, one row per speaker
    Participants(commands::query::QueryArgs),
    /// Tokens (words) with stem and part of speech
    Tokens(commands::query::QueryArgs),
    /// Token types with counts
    TokenTypes(commands::query::QueryArgs),
    /// Utterance text and timings
    Utterances(commands::query::QueryArgs),
    /// N-gram frequencies
    Ngrams(commands::query::NgramArgs),
    /// Corpus Query Language pattern search
    Cql(commands::query::CqlArgs),
    /// Browse the tree of valid corpus paths
    PathTrees(commands::paths::PathTreesArgs),
    /// Check whether a corpus path exists
    ValidPath(commands::paths::ValidPathArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("talkbankdb=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let format: OutputFormat = cli.output.parse()?;

    let mut client = Client::with_base_url(&cli.base_url)
        .with_context(|| format!("cannot use service URL {}", cli.base_url))?
        .with_credentials(TerminalPrompt);
    if let Some(secs) = cli.deadline_secs {
        client = client.with_deadline(Duration::from_secs(secs));
    }

    match &cli.command {
        Commands::Transcripts(args) => {
            commands::query::run(args, Operation::Transcripts, &client, &format).await?
        }
        Commands::Participants(args) => {
            commands::query::run(args, Operation::Participants, &client, &format).await?
        }
        Commands::Tokens(args) => {
            commands::query::run(args, Operation::Tokens, &client, &format).await?
        }
        Commands::TokenTypes(args) => {
            commands::query::run(args, Operation::TokenTypes, &client, &format).await?
        }
        Commands::Utterances(args) => {
            commands::query::run(args, Operation::Utterances, &client, &format).await?
        }
        Commands::Ngrams(args) => commands::query::run_ngrams(args, &client, &format).await?,
        Commands::Cql(args) => commands::query::run_cql(args, &client, &format).await?,
        Commands::PathTrees(args) => commands::paths::run_path_trees(args, &client, &format).await?,
        Commands::ValidPath(args) => commands::paths::run_valid_path(args, &client).await?,
    }

    Ok(())
}
