//! Cookbot CLI
//!
//! Entry point for the scheduler. `cookbot run` performs one posting attempt.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cookbot::{
    error::{AppError, Result},
    models::{Config, Credentials, RecipeId},
    pipeline::{Pipeline, RunMode, RunOutcome},
    services::{CandidateSearch, CandidateSource, RecipeExtractor, RecipeSource, build_renderer},
    storage::{LocalPostedStore, PostedStore},
    utils::http,
};

/// Cookbot - Cookpad recipe poster
#[derive(Parser, Debug)]
#[command(
    name = "cookbot",
    version,
    about = "Posts a fresh Cookpad recipe to a Facebook page"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "cookbot.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Gemini API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true, default_value = "")]
    google_api_key: String,

    /// Facebook page id
    #[arg(long, env = "FACEBOOK_PAGE_ID", default_value = "")]
    page_id: String,

    /// Facebook page access token
    #[arg(
        long,
        env = "FACEBOOK_PAGE_ACCESS_TOKEN",
        hide_env_values = true,
        default_value = ""
    )]
    page_access_token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Select, compose, publish and record one recipe
    Run {
        /// Compose the post and print it without publishing
        #[arg(long)]
        dry_run: bool,
    },

    /// List candidates for a keyword, marking the ones already posted
    Search { keyword: String },

    /// Extract one recipe page and print the result
    Extract { url: String },

    /// Print the posted set
    Posted,

    /// Validate the configuration and report which credentials are set
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;
    log::debug!("Loaded configuration from {}", cli.config.display());

    let credentials = Credentials::new(
        cli.google_api_key,
        cli.page_id,
        cli.page_access_token,
    );
    let store = LocalPostedStore::new(&config.storage.posted_file);

    match cli.command {
        Command::Run { dry_run } => {
            credentials.validate(dry_run)?;
            let mode = if dry_run {
                RunMode::DryRun
            } else {
                RunMode::Live
            };

            let pipeline = Pipeline::from_config(&config, &credentials)?;
            let outcome = pipeline.run(mode).await;
            if let RunOutcome::DryRun { post, .. } = &outcome {
                println!("{}", post);
            }

            return Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }

        Command::Search { keyword } => {
            let client = http::create_async_client(&config.http)?;
            let renderer = build_renderer(&config, client)?;
            let search = CandidateSearch::new(config.search.clone(), renderer)?;
            let posted = store.load().await?;

            let candidates = search.search(&keyword).await;
            if candidates.is_empty() {
                log::warn!("No candidates for '{}'", keyword);
            }
            for id in candidates {
                let mark = if posted.contains(&id) { "posted" } else { "new" };
                println!("[{mark:>6}] {id}");
            }
        }

        Command::Extract { url } => {
            let client = http::create_async_client(&config.http)?;
            let extractor = RecipeExtractor::cookpad(client);

            let Some(recipe) = extractor.extract(&RecipeId::new(url.clone())).await else {
                return Err(AppError::validation(format!(
                    "no complete recipe could be extracted from {url}"
                )));
            };
            println!("{}", serde_json::to_string_pretty(&recipe)?);
        }

        Command::Posted => {
            let posted = store.load().await?;
            log::info!("{} recipe(s) in {}", posted.len(), store.location());
            for id in posted.iter() {
                println!("{id}");
            }
        }

        Command::Validate => {
            log::info!("✓ Config OK ({} keyword(s))", config.selection.keywords.len());

            let missing = credentials.missing();
            if missing.is_empty() {
                log::info!("✓ All credentials set");
            } else {
                log::warn!("Missing credentials: {}", missing.join(", "));
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
