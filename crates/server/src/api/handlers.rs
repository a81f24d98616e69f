//! Request handlers. Each one is a thin adapter from query/body to a
//! library call; the statistics live in `analytics`, `pipeline` and the
//! prediction service.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use analytics::{
    AiRecommendation, Benchmark, BudgetAdvice, CombinationReport, DashboardSummary, GenreReturn,
    GenreSuccess, MarketPulse, Outcome, PopularityPoint, RankedGenre, ReleaseTiming, RiskReport,
    TopPerformer, YearLeader, YearRange, YearSpan, DEFAULT_TOP_PERFORMERS,
};
use data_loader::{GenreOverallStat, GenreYearStat};
use pipeline::{explore, ExplorePage, ExploreQuery, SortOrder};

use super::state::AppState;
use crate::error::{AppError, AppResult};
use crate::orchestrator::{
    Comparison, ComparisonRequest, Prediction, PredictionRequest, PredictionService, Simulation,
    SimulationRequest, Transparency,
};

/// Genres ranked per year by `/api/genre/top-by-year`
const TOP_GENRES_PER_YEAR: usize = 3;

// ============================================================================
// Query parameters
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct YearWindow {
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
}

impl YearWindow {
    /// A range only when both bounds are present.
    fn range(&self) -> Option<YearRange> {
        self.year_start.zip(self.year_end)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GenreList {
    pub genres: Option<String>,
}

impl GenreList {
    fn split(&self) -> Option<Vec<String>> {
        self.genres
            .as_deref()
            .filter(|g| !g.is_empty())
            .map(|g| g.split(',').map(str::to_string).collect())
    }
}

#[derive(Debug, Deserialize)]
pub struct PopularityParams {
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    pub genres: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct YearParam {
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct GenreParam {
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub struct BudgetParams {
    pub genre: String,
    pub budget: f64,
}

#[derive(Debug, Deserialize)]
pub struct BenchmarkParams {
    pub genre_a: String,
    pub genre_b: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitParam {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ExploreParams {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub search: Option<String>,
    pub genre: Option<String>,
    pub success_label: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
}

impl From<ExploreParams> for ExploreQuery {
    fn from(p: ExploreParams) -> Self {
        let defaults = ExploreQuery::default();
        ExploreQuery {
            page: p.page.unwrap_or(defaults.page),
            limit: p.limit.unwrap_or(defaults.limit),
            search: p.search,
            genre: p.genre,
            success_label: p.success_label,
            sort_by: p.sort_by.unwrap_or(defaults.sort_by),
            sort_order: p
                .sort_order
                .as_deref()
                .map_or(defaults.sort_order, SortOrder::parse),
            year_start: p.year_start,
            year_end: p.year_end,
        }
    }
}

// ============================================================================
// Service
// ============================================================================

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "CineIntel API - Bollywood Investment Intelligence Platform",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "operational",
        "data_loaded": !state.data.movies().is_empty(),
        "ml_model_ready": true,
        "endpoints": {
            "dashboard": "/api/dashboard/*",
            "genre": "/api/genre/*",
            "risk": "/api/risk/*",
            "combinations": "/api/combinations",
            "explore": "/api/movies/explore",
            "predict": "/api/predict",
        },
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let accuracy = (state.predictor.accuracy() * 1.0e4).round() / 1.0e4;
    Json(json!({
        "status": "healthy",
        "services": {
            "data_service": !state.data.movies().is_empty(),
            "ml_service": true,
            "model_accuracy": accuracy,
        },
    }))
}

// ============================================================================
// Dashboard
// ============================================================================

pub async fn dashboard_summary(State(state): State<AppState>) -> AppResult<Json<DashboardSummary>> {
    Ok(Json(analytics::dashboard_summary(&state.data)?))
}

pub async fn ai_recommendation(State(state): State<AppState>) -> Json<AiRecommendation> {
    Json(analytics::ai_recommendation(&state.data))
}

pub async fn budget_optimization(
    State(state): State<AppState>,
    Query(params): Query<BudgetParams>,
) -> AppResult<Json<Outcome<BudgetAdvice>>> {
    if !params.budget.is_finite() {
        return Err(AppError::InvalidInput("budget must be a number".to_string()));
    }
    Ok(Json(analytics::budget_optimization(
        &state.data,
        &params.genre,
        params.budget,
    )))
}

pub async fn release_timing(
    State(state): State<AppState>,
    Query(params): Query<GenreParam>,
) -> Json<Outcome<ReleaseTiming>> {
    Json(analytics::release_timing(&state.data, &params.genre))
}

pub async fn market_pulse(State(state): State<AppState>) -> Json<MarketPulse> {
    Json(analytics::market_pulse(&state.data))
}

pub async fn top_performers(
    State(state): State<AppState>,
    Query(params): Query<LimitParam>,
) -> Json<Vec<TopPerformer>> {
    let limit = params.limit.unwrap_or(DEFAULT_TOP_PERFORMERS);
    Json(analytics::top_performers(&state.data, limit))
}

// ============================================================================
// Genre
// ============================================================================

pub async fn genre_popularity(
    State(state): State<AppState>,
    Query(params): Query<PopularityParams>,
) -> Json<Vec<PopularityPoint>> {
    let years = YearWindow {
        year_start: params.year_start,
        year_end: params.year_end,
    };
    let genres = GenreList {
        genres: params.genres,
    }
    .split();
    Json(analytics::popularity(
        &state.data,
        years.range(),
        genres.as_deref(),
    ))
}

pub async fn top_genres_by_year(
    State(state): State<AppState>,
    Query(params): Query<YearParam>,
) -> Json<Vec<RankedGenre>> {
    Json(analytics::top_genres_by_year(
        &state.data,
        params.year,
        TOP_GENRES_PER_YEAR,
    ))
}

pub async fn genre_revenue(
    State(state): State<AppState>,
    Query(window): Query<YearWindow>,
) -> Json<Vec<YearLeader>> {
    Json(analytics::highest_grossing_per_year(&state.data, window.range()))
}

pub async fn genre_success_rate(
    State(state): State<AppState>,
    Query(params): Query<GenreList>,
) -> Json<Vec<GenreSuccess>> {
    Json(analytics::success_rate_by_genre(
        &state.data,
        params.split().as_deref(),
    ))
}

pub async fn genre_roi(
    State(state): State<AppState>,
    Query(params): Query<GenreList>,
) -> Json<Vec<GenreReturn>> {
    Json(analytics::roi_by_genre(&state.data, params.split().as_deref()))
}

#[derive(Debug, Serialize)]
pub struct GenreNames {
    pub genres: Vec<String>,
}

pub async fn genre_list(State(state): State<AppState>) -> Json<GenreNames> {
    Json(GenreNames {
        genres: state.data.all_genres(),
    })
}

pub async fn year_range(State(state): State<AppState>) -> Json<Outcome<YearSpan>> {
    let span = match analytics::year_span(&state.data) {
        Some(span) => Outcome::Ready(span),
        None => Outcome::unavailable("No release years in the movie table"),
    };
    Json(span)
}

pub async fn genre_yearly(State(state): State<AppState>) -> Json<Vec<GenreYearStat>> {
    Json(state.data.genre_year_stats().to_vec())
}

pub async fn genre_overall(State(state): State<AppState>) -> Json<Vec<GenreOverallStat>> {
    Json(state.data.genre_overall_stats().to_vec())
}

pub async fn genre_benchmark(
    State(state): State<AppState>,
    Query(params): Query<BenchmarkParams>,
) -> Json<Outcome<Benchmark>> {
    Json(analytics::benchmark(
        &state.data,
        &params.genre_a,
        &params.genre_b,
    ))
}

// ============================================================================
// Risk, combinations, explorer
// ============================================================================

pub async fn risk_analysis(State(state): State<AppState>) -> AppResult<Json<RiskReport>> {
    Ok(Json(analytics::risk_analysis(&state.data)?))
}

pub async fn combinations(State(state): State<AppState>) -> Json<CombinationReport> {
    Json(analytics::genre_combinations(&state.data))
}

pub async fn explore_movies(
    State(state): State<AppState>,
    Query(params): Query<ExploreParams>,
) -> AppResult<Json<ExplorePage>> {
    // Every explorer failure is a rejected parameter
    explore(&state.data, &ExploreQuery::from(params))
        .map(Json)
        .map_err(|e| AppError::InvalidInput(format!("{:#}", e)))
}

// ============================================================================
// Prediction
// ============================================================================

/// Run forest inference and the similarity scan off the async workers.
async fn with_predictor<T, F>(state: &AppState, job: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&PredictionService) -> T + Send + 'static,
{
    let predictor = state.predictor.clone();
    Ok(tokio::task::spawn_blocking(move || job(&predictor)).await?)
}

pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> AppResult<Json<Prediction>> {
    with_predictor(&state, move |p| p.predict(&request))
        .await
        .map(Json)
}

pub async fn compare_plans(
    State(state): State<AppState>,
    Json(request): Json<ComparisonRequest>,
) -> AppResult<Json<Comparison>> {
    with_predictor(&state, move |p| p.compare(&request))
        .await
        .map(Json)
}

pub async fn simulate(
    State(state): State<AppState>,
    Json(request): Json<SimulationRequest>,
) -> AppResult<Json<Simulation>> {
    with_predictor(&state, move |p| p.simulate(&request))
        .await?
        .map(Json)
        .map_err(|e| AppError::InvalidInput(format!("{:#}", e)))
}

pub async fn transparency(State(state): State<AppState>) -> Json<Transparency> {
    Json(state.predictor.transparency())
}
