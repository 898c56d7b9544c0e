use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use affinity::config::Config;
use affinity::engine::Engine;
use affinity::RecommendError;

/// Affinity: recommend users, tags and clusters from profile data.
///
/// Reads a corpus of user profiles (bio, behaviour, social graph) and ranks
/// similar users, suggests new tags, and groups users into clusters.
#[derive(Parser)]
#[command(name = "affinity", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the user ids in the corpus
    Users,

    /// Rebuild the embedding store from the corpus
    Build,

    /// Recommend users similar to the given user
    Recommend {
        /// The user id to find matches for
        user: String,

        /// Number of users to return (default: 5)
        #[arg(long, default_value = "5")]
        top_k: usize,
    },

    /// Recommend tags the given user doesn't have yet
    Tags {
        /// The user id to suggest tags for
        user: String,

        /// Number of tags to return (default: 10)
        #[arg(long, default_value = "10")]
        top_k: usize,
    },

    /// Show which cluster the given user falls into
    Cluster {
        /// The user id to locate
        user: String,

        /// Number of clusters (default: 3)
        #[arg(long, default_value = "3")]
        clusters: usize,

        /// k-means seed (defaults to AFFINITY_CLUSTER_SEED, then 42)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show corpus size and embedding store freshness
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("affinity=info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        // Unknown users and bad cluster counts are user errors, not crashes
        if let Some(err) = e.downcast_ref::<RecommendError>() {
            eprintln!("{} {}", "Error:".red().bold(), err);
            std::process::exit(2);
        }
        return Err(e);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Users => {
            let engine = Engine::open(&config)?;
            affinity::output::terminal::display_user_list(engine.corpus());
        }

        Commands::Build => {
            let engine = Engine::open(&config)?;
            println!(
                "Building embeddings for {} users...",
                engine.corpus().len()
            );

            let pb = ProgressBar::new(engine.corpus().len() as u64);
            pb.set_style(
                ProgressStyle::default_bar().template("  Encoding [{bar:30}] {pos}/{len}")?,
            );
            let count = engine.rebuild_embeddings_with(|_| pb.inc(1))?;
            pb.finish_and_clear();

            println!(
                "{}",
                format!(
                    "Embeddings for {count} users saved to {}",
                    engine.store_path().display()
                )
                .bold()
            );
        }

        Commands::Recommend { user, top_k } => {
            config.require_store()?;
            let engine = Engine::open(&config)?;
            let recs = engine.recommend_users(&user, top_k)?;
            affinity::output::terminal::display_recommendations(&user, &recs);
        }

        Commands::Tags { user, top_k } => {
            let engine = Engine::open(&config)?;
            let tags = engine.recommend_tags(&user, top_k)?;
            affinity::output::terminal::display_tags(&user, &tags);
        }

        Commands::Cluster {
            user,
            clusters,
            seed,
        } => {
            let engine = Engine::open(&config)?;
            let seed = seed.unwrap_or(config.cluster_seed);
            info!(seed, clusters, "Clustering corpus");
            let assignment = engine.cluster_for(&user, clusters, seed)?;
            affinity::output::terminal::display_cluster(&assignment, clusters);
        }

        Commands::Status => {
            let engine = Engine::open(&config)?;
            let status = affinity::status::collect(&engine)?;
            affinity::status::show(&engine, &status);
        }
    }

    Ok(())
}
