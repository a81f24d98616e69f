use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use analytics::{format::crores, BudgetAdvice, Outcome, RiskCategory};
use classifier::{ForestConfig, TrainingConfig};
use data_loader::DataIndex;
use pipeline::{explore, ExploreQuery};
use server::{PredictionRequest, PredictionService, RiskLevel};

/// CineIntel - movie investment analytics
#[derive(Parser)]
#[command(name = "cineintel")]
#[command(about = "Genre analytics and hit prediction over the Bollywood movie dataset", long_about = None)]
struct Cli {
    /// Directory holding the movie and genre statistics CSV files
    #[arg(short, long, env = "CINEINTEL_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dashboard KPIs and the strategic insight
    Summary,

    /// Risk score for every genre, safest first
    Risk,

    /// Best and worst multi-genre combinations
    Combinations,

    /// Best release months for a genre
    Timing {
        #[arg(long)]
        genre: String,
    },

    /// Compare a planned budget with the genre's history
    Budget {
        #[arg(long)]
        genre: String,

        #[arg(long)]
        budget: f64,
    },

    /// Search movie titles
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Train the model and predict one plan
    Predict {
        #[arg(long)]
        genre: String,

        #[arg(long)]
        budget: f64,

        #[arg(long)]
        year: i32,

        #[arg(long)]
        rating: f64,

        #[arg(long)]
        runtime: f64,

        #[arg(long)]
        release_month: Option<u32>,

        /// Show feature explanations and similar movies
        #[arg(long)]
        explain: bool,
    },

    /// Time concurrent predictions against a trained model
    Benchmark {
        /// Number of predictions to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Predictions allowed in flight at once
        #[arg(long, default_value = "10")]
        concurrent: usize,

        /// Trees in the forest
        #[arg(long, default_value = "100")]
        trees: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    println!("Loading dataset from {}...", cli.data_dir.display());
    let start = Instant::now();
    let data_index = Arc::new(
        DataIndex::load_from_dir(&cli.data_dir).context("Failed to load movie dataset")?,
    );
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        data_index.movies().len(),
        start.elapsed()
    );

    match cli.command {
        Commands::Summary => handle_summary(&data_index)?,
        Commands::Risk => handle_risk(&data_index)?,
        Commands::Combinations => handle_combinations(&data_index),
        Commands::Timing { genre } => handle_timing(&data_index, &genre),
        Commands::Budget { genre, budget } => handle_budget(&data_index, &genre, budget),
        Commands::Search { title, limit } => handle_search(&data_index, title, limit)?,
        Commands::Predict {
            genre,
            budget,
            year,
            rating,
            runtime,
            release_month,
            explain,
        } => {
            let request = PredictionRequest {
                genre,
                budget,
                year,
                imdb_rating: rating,
                runtime,
                release_month,
            };
            handle_predict(data_index, &request, explain)?
        }
        Commands::Benchmark {
            requests,
            concurrent,
            trees,
        } => handle_benchmark(data_index, requests, concurrent, trees).await?,
    }

    Ok(())
}

fn handle_summary(data_index: &DataIndex) -> Result<()> {
    let summary = analytics::dashboard_summary(data_index)?;

    println!("{}", "Market Summary".bold().blue());
    println!("{}Movies analysed: {}", "• ".green(), summary.total_movies);
    println!("{}Industry success rate: {:.1}%", "• ".green(), summary.overall_success_rate);
    println!("{}Total revenue: {}", "• ".green(), crores(summary.total_revenue as f64));
    println!(
        "{}Highest ROI genre: {} ({:.2}x)",
        "• ".green(),
        summary.highest_roi_genre.genre,
        summary.highest_roi_genre.avg_roi
    );
    println!("{}Safest genre: {}", "• ".green(), summary.strategic_insight.safest_genre);

    if let Some(trend) = &summary.latest_trend {
        println!(
            "{}Latest trend: {} led {} with {}",
            "• ".cyan(),
            trend.top_genre,
            trend.year,
            crores(trend.revenue as f64)
        );
    }
    let allocation = &summary.capital_allocation;
    println!(
        "{}Capital allocation: core {}%, growth {}%, speculative {}%",
        "• ".cyan(),
        allocation.core,
        allocation.growth,
        allocation.speculative
    );
    println!();
    println!("{}", summary.strategic_insight.text.italic());

    let pulse = analytics::market_pulse(data_index);
    println!();
    println!(
        "Market pulse: {:?}, ROI velocity {:+.1}%, growing segment {}",
        pulse.sentiment, pulse.roi_velocity, pulse.top_growing_segment
    );
    Ok(())
}

fn handle_risk(data_index: &DataIndex) -> Result<()> {
    let report = analytics::risk_analysis(data_index)?;

    println!("{}", "Genre Risk (safest first)".bold().blue());
    for genre in &report.genres {
        let category = match genre.risk_category {
            RiskCategory::Safe => "Safe".green(),
            RiskCategory::ModerateRisk => "Moderate Risk".yellow(),
            RiskCategory::HighRisk => "High Risk".red(),
        };
        println!(
            "{:<14} {:>6.2}  {:<14} success {:>5.1}%  volatility {:>5.2}  ({} movies, {} confidence)",
            genre.genre,
            genre.risk_score,
            category,
            genre.success_rate,
            genre.roi_volatility,
            genre.total_movies,
            genre.confidence.as_str()
        );
    }
    println!();
    println!("Industry risk index: {:.2}", report.industry_risk_index);
    Ok(())
}

fn handle_combinations(data_index: &DataIndex) {
    let report = analytics::genre_combinations(data_index);

    println!("{}", "Top Combinations".bold().blue());
    for (rank, combo) in report.top_10.iter().enumerate() {
        println!(
            "{}. {} - {:.1}% success, ROI {:.2}x ({} movies)",
            (rank + 1).to_string().green(),
            combo.combination,
            combo.success_rate,
            combo.avg_roi,
            combo.total_movies
        );
    }
    println!();
    println!("{}", "Bottom Combinations".bold().red());
    for combo in &report.bottom_10 {
        println!(
            "   {} - {:.1}% success, ROI {:.2}x ({} movies)",
            combo.combination, combo.success_rate, combo.avg_roi, combo.total_movies
        );
    }
}

fn handle_timing(data_index: &DataIndex, genre: &str) {
    match analytics::release_timing(data_index, genre) {
        Outcome::Ready(timing) => {
            println!("{}", timing.message.bold());
            for month in &timing.monthly_data {
                println!("  {:<10} ROI {:.2}x", month.month, month.avg_roi);
            }
        }
        Outcome::Unavailable { error } => println!("{} {}", "✗".red(), error),
    }
}

fn handle_budget(data_index: &DataIndex, genre: &str, budget: f64) {
    match analytics::budget_optimization(data_index, genre, budget) {
        Outcome::Ready(BudgetAdvice::AboveAverage {
            message, warning, ..
        }) => {
            if let Some(w) = warning {
                println!("{} {}", "!".red().bold(), w.red());
            }
            println!("{}", message.yellow());
        }
        Outcome::Ready(BudgetAdvice::WithinRange { message, .. }) => {
            println!("{} {}", "✓".green(), message)
        }
        Outcome::Unavailable { error } => println!("{} {}", "✗".red(), error),
    }
}

fn handle_search(data_index: &DataIndex, title: String, limit: usize) -> Result<()> {
    let query = ExploreQuery {
        search: Some(title.clone()),
        limit,
        ..Default::default()
    };
    let page = explore(data_index, &query)?;

    println!(
        "{}",
        format!("Search results for '{}' ({} matches):", title, page.total_count)
            .bold()
            .blue()
    );
    for movie in &page.movies {
        println!(
            "{} ({}) [{}] ROI {:.2}x, IMDb {:.1}, {}",
            movie.title, movie.year, movie.genres, movie.roi, movie.imdb_rating, movie.success_label
        );
    }
    Ok(())
}

fn train(data_index: Arc<DataIndex>, trees: usize) -> Result<PredictionService> {
    let config = TrainingConfig {
        forest: ForestConfig {
            n_trees: trees,
            ..Default::default()
        },
        ..Default::default()
    };
    let start = Instant::now();
    let service = PredictionService::train(data_index, &config)?;
    println!(
        "{} Trained model ({:.2}% held-out accuracy) in {:?}",
        "✓".green(),
        service.accuracy() * 100.0,
        start.elapsed()
    );
    Ok(service)
}

fn handle_predict(data_index: Arc<DataIndex>, request: &PredictionRequest, explain: bool) -> Result<()> {
    let service = train(data_index, ForestConfig::default().n_trees)?;
    let prediction = service.predict(request);
    if let Some(error) = &prediction.error {
        bail!("Prediction failed: {}", error);
    }

    let risk = match prediction.risk_level {
        RiskLevel::Low => "Low".green(),
        RiskLevel::Moderate => "Moderate".yellow(),
        RiskLevel::High => "High".red(),
        RiskLevel::Unknown => "Unknown".normal(),
    };
    println!("{}", "Prediction".bold().blue());
    println!("{}Outcome: {}", "• ".green(), prediction.prediction.bold());
    println!("{}Hit probability: {:.2}%", "• ".green(), prediction.hit_probability);
    println!("{}Expected ROI: {:.2}x", "• ".green(), prediction.expected_roi);
    println!("{}Risk: {}", "• ".green(), risk);
    if let Some(warning) = &prediction.budget_warning {
        println!("{} {}", "!".red().bold(), warning.red());
    }

    if explain {
        println!();
        println!("{}", "Why".bold());
        for e in &prediction.explanations {
            println!("  {:?}: {}", e.impact, e.description);
        }
        println!("{}", "Similar movies".bold());
        for m in &prediction.similar_movies {
            println!(
                "  {} ({}) ROI {:.2}x, similarity {:.1}",
                m.title,
                m.year.map_or_else(|| "-".to_string(), |y| y.to_string()),
                m.roi,
                m.similarity_score
            );
        }
    }
    Ok(())
}

async fn handle_benchmark(
    data_index: Arc<DataIndex>,
    requests: usize,
    concurrent: usize,
    trees: usize,
) -> Result<()> {
    if requests == 0 || concurrent == 0 {
        bail!("requests and concurrent must be positive");
    }
    let genres = data_index.all_genres();
    let service = Arc::new(train(data_index, trees)?);

    // Random plans drawn across the genre list and typical budgets
    let mut rng = rand::rng();
    let plans: Vec<PredictionRequest> = (0..requests)
        .map(|_| PredictionRequest {
            genre: genres.choose(&mut rng).cloned().unwrap_or_else(|| "Drama".to_string()),
            budget: rng.random_range(1.0e7..2.0e9),
            year: rng.random_range(2000..=2024),
            imdb_rating: rng.random_range(3.0..9.0),
            runtime: rng.random_range(90.0..180.0),
            release_month: Some(rng.random_range(1..=12)),
        })
        .collect();

    let wall = Instant::now();
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for batch in plans.chunks(concurrent) {
        let mut handles = Vec::with_capacity(batch.len());
        for plan in batch.iter().cloned() {
            let service = service.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                let prediction = service.predict(&plan);
                (start.elapsed(), prediction.is_error())
            }));
        }
        for handle in handles {
            let (elapsed, failed) = handle.await?;
            if failed {
                bail!("a benchmark prediction failed");
            }
            timings.push(elapsed);
        }
    }
    let total_time = wall.elapsed();

    timings.sort();
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!(
        "Throughput: {:.2} predictions/second",
        requests as f64 / total_time.as_secs_f64()
    );
    Ok(())
}
