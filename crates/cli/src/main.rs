//! playlens command line interface.
//!
//! Runs every query and recommendation operation directly over the
//! dataset export, with the same engines as the HTTP server.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{DatasetStore, ItemId};
use query_engine::QueryEngine;
use recommender::{ContentRecommender, UserItemMatrix, UserNeighborRecommender};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// playlens - analytics and recommendations over the platform usage export
#[derive(Parser)]
#[command(name = "playlens")]
#[command(about = "Query and recommendation engine for game-platform usage data", long_about = None)]
struct Cli {
    /// Path to the dataset export (CSV)
    #[arg(short, long, default_value = "data/interactions.csv")]
    data: PathBuf,

    /// Print raw JSON instead of formatted output
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Release year with the most accumulated hours for a genre
    PlaytimeGenre {
        /// Genre token, case as it appears in the data
        genre: String,
    },

    /// Top user by hours for a genre, plus the genre's yearly totals
    UserForGenre {
        genre: String,
    },

    /// Most recommended games for a review year
    UsersRecommend {
        year: i32,

        /// Ranking length
        #[arg(long, default_value = "3")]
        top: usize,
    },

    /// Least recommended games for a review year
    UsersNotRecommend {
        year: i32,

        #[arg(long, default_value = "3")]
        top: usize,
    },

    /// Review counts per sentiment category for a release year
    Sentiment {
        year: i32,
    },

    /// Games whose name and genres read like the given game's
    RecommendGame {
        item_id: ItemId,

        /// Number of recommendations
        #[arg(long, default_value = "5")]
        count: usize,
    },

    /// Games drawn from the libraries of the user's nearest neighbors
    RecommendUser {
        user_id: String,
    },

    /// Dataset summary
    Stats,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    // Load the dataset (this may take a moment on large exports)
    eprintln!("Loading dataset from {}...", cli.data.display());
    let start = Instant::now();
    let store = Arc::new(
        DatasetStore::load_from_csv(&cli.data).context("Failed to load dataset export")?,
    );
    eprintln!("{} Loaded dataset in {:?}", "✓".green(), start.elapsed());

    let engine = QueryEngine::new(store.clone());

    match cli.command {
        Commands::PlaytimeGenre { genre } => {
            let result = engine.year_with_most_playtime(&genre)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "{} {} -> {} ({:.1} hours)",
                    "Most played year for".bold(),
                    result.genre.cyan(),
                    result.year.to_string().green(),
                    result.total_hours
                );
            }
        }

        Commands::UserForGenre { genre } => {
            match engine.top_user_for_genre(&genre)? {
                None => println!("{}", "No qualifying records for that genre".yellow()),
                Some(report) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
                Some(report) => {
                    println!(
                        "{} {}: {} ({:.1} hours total)",
                        "Top user for".bold(),
                        report.genre.cyan(),
                        report.user_id.green(),
                        report.total_hours
                    );
                    println!("Hours by year (all users):");
                    for entry in &report.hours_by_year {
                        println!("  {}: {:.1}h", entry.year, entry.hours);
                    }
                }
            }
        }

        Commands::UsersRecommend { year, top } => {
            let items = engine.top_recommended_items(year, top)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print_ranking(&items, &format!("Most recommended games of {year}"));
            }
        }

        Commands::UsersNotRecommend { year, top } => {
            let items = engine.top_not_recommended_items(year, top)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print_ranking(&items, &format!("Least recommended games of {year}"));
            }
        }

        Commands::Sentiment { year } => {
            let breakdown = engine.sentiment_breakdown(year)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else if breakdown.counts.is_empty() {
                println!("{}", format!("No reviews for games released in {year}").yellow());
            } else {
                println!("{} {}", "Sentiment for releases of".bold(), year);
                for (sentiment, count) in &breakdown.counts {
                    println!("  {}: {}", sentiment, count);
                }
            }
        }

        Commands::RecommendGame { item_id, count } => {
            let content = ContentRecommender::new(store.clone());
            let recs = content.recommend(item_id, count)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&recs)?);
            } else {
                println!(
                    "{} {} ({})",
                    "Games similar to".bold(),
                    recs.item_name.cyan(),
                    recs.item_id
                );
                for (i, name) in recs.items.iter().enumerate() {
                    println!("  {}. {}", i + 1, name);
                }
                if recs.partial {
                    println!(
                        "{}",
                        format!("only {} distinct games available", recs.items.len()).yellow()
                    );
                }
            }
        }

        Commands::RecommendUser { user_id } => {
            let matrix = Arc::new(UserItemMatrix::from_store(&store));
            let neighbors = UserNeighborRecommender::new(matrix);
            let mut recs: Vec<String> = neighbors.recommend(&user_id)?.into_iter().collect();
            recs.sort();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&recs)?);
            } else {
                println!("{} {}:", "Recommendations for".bold(), user_id.cyan());
                for name in &recs {
                    println!("  {} {}", "•".green(), name);
                }
                if recs.is_empty() {
                    println!("{}", "no similar users with play history".yellow());
                }
            }
        }

        Commands::Stats => {
            let (rows, users, items) = store.counts();
            let genres = store.genres().count();
            println!("{}", "Dataset summary".bold().blue());
            println!("  {} rows: {}", "•".green(), rows);
            println!("  {} users: {}", "•".green(), users);
            println!("  {} games: {}", "•".green(), items);
            println!("  {} genres: {}", "•".green(), genres);
        }
    }

    Ok(())
}

/// Print a top-k ranking with positions
fn print_ranking(items: &[query_engine::RankedItem], header: &str) {
    if items.is_empty() {
        println!("{}", "No qualifying reviews for that year".yellow());
        return;
    }
    println!("{}", header.bold().blue());
    for item in items {
        println!(
            "  {}. {} ({} reviews)",
            item.rank.to_string().green(),
            item.item_name,
            item.review_count
        );
    }
}
