//! Per-genre lookups: benchmarks, budget guidance and the trend tables.

use crate::first_max_by;
use crate::format::{crores, thousands};
use crate::outcome::Outcome;
use data_loader::numeric::{mean, round2};
use data_loader::{split_genres, DataIndex, GenreOverallStat, GenreYearStat};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

/// Budgets above this multiple of the genre average trigger a warning.
const WARNING_MULTIPLE: f64 = 1.5;
/// Suggested cap as a multiple of the genre average.
const CAP_MULTIPLE: f64 = 1.2;

/// Inclusive year bounds.
pub type YearRange = (i32, i32);

fn in_range(year: i32, range: Option<YearRange>) -> bool {
    range.map_or(true, |(start, end)| year >= start && year <= end)
}

fn in_genres(genre: &str, genres: Option<&[String]>) -> bool {
    genres.map_or(true, |list| list.iter().any(|g| g == genre))
}

// =============================================================================
// Benchmark
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkSide {
    pub genre: String,
    pub avg_roi: f64,
    pub success_rate: f64,
    pub avg_budget: i64,
    pub volatility: f64,
}

impl BenchmarkSide {
    fn from_stat(stat: &GenreOverallStat) -> Self {
        Self {
            genre: stat.genre.clone(),
            avg_roi: round2(stat.avg_roi),
            success_rate: round2(stat.success_rate),
            avg_budget: stat.avg_budget as i64,
            volatility: round2(stat.roi_volatility),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkDelta {
    pub roi_diff: f64,
    pub success_diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Benchmark {
    pub genre_a: BenchmarkSide,
    pub genre_b: BenchmarkSide,
    /// A minus B
    pub comparison: BenchmarkDelta,
}

/// Side-by-side comparison of two genres from the overall table.
pub fn benchmark(index: &DataIndex, genre_a: &str, genre_b: &str) -> Outcome<Benchmark> {
    let (Some(a), Some(b)) = (index.get_overall_stat(genre_a), index.get_overall_stat(genre_b))
    else {
        return Outcome::unavailable("One or both genres not found");
    };

    Outcome::Ready(Benchmark {
        genre_a: BenchmarkSide::from_stat(a),
        genre_b: BenchmarkSide::from_stat(b),
        comparison: BenchmarkDelta {
            roi_diff: round2(a.avg_roi - b.avg_roi),
            success_diff: round2(a.success_rate - b.success_rate),
        },
    })
}

// =============================================================================
// Budget guidance
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BudgetAdvice {
    AboveAverage {
        message: String,
        avg_budget: f64,
        suggested_cap: f64,
        risk_increase: f64,
        warning: Option<String>,
    },
    WithinRange {
        message: String,
        avg_budget: f64,
        success_rate: f64,
        avg_roi: f64,
    },
}

/// Compare a planned budget against the genre's historical average.
#[instrument(skip(index))]
pub fn budget_optimization(index: &DataIndex, genre: &str, budget: f64) -> Outcome<BudgetAdvice> {
    let Some(stat) = index.get_overall_stat(genre) else {
        return Outcome::unavailable("Genre not found");
    };
    let avg = stat.avg_budget;
    if !(avg > 0.0) {
        return Outcome::unavailable(format!("No budget history for '{}'", genre));
    }

    let warning = (budget > avg * WARNING_MULTIPLE).then(|| {
        "You are investing 150% above historical average. Risk increases significantly.".to_string()
    });

    if budget > avg {
        let risk_increase = (budget - avg) / avg * 100.0;
        let suggested_cap = avg * CAP_MULTIPLE;
        let mut message = format!(
            "Risk increases by {:.1}% above historical average. Suggested budget cap: ₹{}.",
            risk_increase,
            thousands(suggested_cap)
        );
        if let Some(w) = &warning {
            message = format!("{} {}", w, message);
        }
        Outcome::Ready(BudgetAdvice::AboveAverage {
            message,
            avg_budget: round2(avg),
            suggested_cap: round2(suggested_cap),
            risk_increase: round2(risk_increase),
            warning,
        })
    } else {
        Outcome::Ready(BudgetAdvice::WithinRange {
            message: format!(
                "Budget is within safe range. Historical success rate: {:.1}%, Average ROI: {:.2}x",
                stat.success_rate, stat.avg_roi
            ),
            avg_budget: round2(avg),
            success_rate: round2(stat.success_rate),
            avg_roi: round2(stat.avg_roi),
        })
    }
}

/// Warning attached to predictions when the budget is far above the norm.
///
/// Uses the exact genre row when present, else the mean average budget of
/// the genre's individual tokens.
pub fn budget_warning(index: &DataIndex, genre: &str, budget: f64) -> Option<String> {
    let avg = match index.get_overall_stat(genre) {
        Some(stat) => stat.avg_budget,
        None => {
            let budgets: Vec<f64> = split_genres(genre)
                .filter_map(|token| index.get_overall_stat(token))
                .map(|s| s.avg_budget)
                .collect();
            mean(&budgets)?
        }
    };

    (budget > avg * WARNING_MULTIPLE).then(|| {
        format!(
            "Warning: Budget exceeds 150% of historical average (₹{}) for {}.",
            thousands(avg),
            genre
        )
    })
}

// =============================================================================
// Yearly tables
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularityPoint {
    pub year: i32,
    pub genre: String,
    pub total_movies: u32,
    pub avg_rating: f64,
}

/// Movie counts and ratings per (genre, year), in table order.
pub fn popularity(
    index: &DataIndex,
    years: Option<YearRange>,
    genres: Option<&[String]>,
) -> Vec<PopularityPoint> {
    index
        .genre_year_stats()
        .iter()
        .filter(|s| in_range(s.year, years) && in_genres(&s.genre, genres))
        .map(|s| PopularityPoint {
            year: s.year,
            genre: s.genre.clone(),
            total_movies: s.total_movies,
            avg_rating: s.avg_rating,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGenre {
    pub rank: usize,
    pub genre: String,
    pub total_box_office: i64,
    pub formatted_revenue: String,
}

/// Highest-grossing genres of one year.
pub fn top_genres_by_year(index: &DataIndex, year: i32, limit: usize) -> Vec<RankedGenre> {
    let mut rows: Vec<&GenreYearStat> = index.year_stats_for(year).collect();
    rows.sort_by(|a, b| b.total_box_office.total_cmp(&a.total_box_office));

    rows.into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, s)| {
            let revenue = s.total_box_office as i64;
            RankedGenre {
                rank: i + 1,
                genre: s.genre.clone(),
                total_box_office: revenue,
                formatted_revenue: crores(revenue as f64),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearLeader {
    pub year: i32,
    pub genre: String,
    pub total_box_office: i64,
    /// Highest-grossing movie of that year carrying the genre, or "N/A"
    pub top_movie: String,
}

/// The top box-office genre of every year, oldest first.
#[instrument(skip(index))]
pub fn highest_grossing_per_year(index: &DataIndex, years: Option<YearRange>) -> Vec<YearLeader> {
    let mut by_year: BTreeMap<i32, Vec<&GenreYearStat>> = BTreeMap::new();
    for stat in index.genre_year_stats().iter().filter(|s| in_range(s.year, years)) {
        by_year.entry(stat.year).or_default().push(stat);
    }

    by_year
        .into_iter()
        .filter_map(|(year, rows)| {
            let leader = first_max_by(rows, |s| s.total_box_office)?;
            let top_movie = first_max_by(
                index
                    .get_movies_by_year(year)
                    .iter()
                    .filter_map(|&i| index.get_movie(i))
                    .filter(|m| m.box_office.is_some() && m.genre.contains(&leader.genre)),
                |m| m.box_office.unwrap_or(0.0),
            )
            .map_or_else(|| "N/A".to_string(), |m| m.title.clone());

            Some(YearLeader {
                year,
                genre: leader.genre.clone(),
                total_box_office: leader.total_box_office as i64,
                top_movie,
            })
        })
        .collect()
}

// =============================================================================
// Overall table projections
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreSuccess {
    pub genre: String,
    pub success_rate: f64,
    pub total_movies: u32,
}

pub fn success_rate_by_genre(index: &DataIndex, genres: Option<&[String]>) -> Vec<GenreSuccess> {
    index
        .genre_overall_stats()
        .iter()
        .filter(|s| in_genres(&s.genre, genres))
        .map(|s| GenreSuccess {
            genre: s.genre.clone(),
            success_rate: s.success_rate,
            total_movies: s.total_movies,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreReturn {
    pub genre: String,
    pub avg_roi: f64,
    pub roi_volatility: f64,
    pub total_movies: u32,
}

pub fn roi_by_genre(index: &DataIndex, genres: Option<&[String]>) -> Vec<GenreReturn> {
    index
        .genre_overall_stats()
        .iter()
        .filter(|s| in_genres(&s.genre, genres))
        .map(|s| GenreReturn {
            genre: s.genre.clone(),
            avg_roi: s.avg_roi,
            roi_volatility: s.roi_volatility,
            total_movies: s.total_movies,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSpan {
    pub min_year: i32,
    pub max_year: i32,
}

pub fn year_span(index: &DataIndex) -> Option<YearSpan> {
    index
        .year_range()
        .map(|(min_year, max_year)| YearSpan { min_year, max_year })
}
