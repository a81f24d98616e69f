use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Dashboard
        .route("/api/dashboard/summary", get(handlers::dashboard_summary))
        .route("/api/dashboard/ai-recommendation", get(handlers::ai_recommendation))
        .route("/api/dashboard/budget-optimization", get(handlers::budget_optimization))
        .route("/api/dashboard/release-timing", get(handlers::release_timing))
        .route("/api/dashboard/market-pulse", get(handlers::market_pulse))
        .route("/api/dashboard/top-performers", get(handlers::top_performers))
        // Genre
        .route("/api/genre/popularity", get(handlers::genre_popularity))
        .route("/api/genre/top-by-year", get(handlers::top_genres_by_year))
        .route("/api/genre/revenue", get(handlers::genre_revenue))
        .route("/api/genre/success-rate", get(handlers::genre_success_rate))
        .route("/api/genre/roi", get(handlers::genre_roi))
        .route("/api/genre/list", get(handlers::genre_list))
        .route("/api/genre/year-range", get(handlers::year_range))
        .route("/api/genre/yearly", get(handlers::genre_yearly))
        .route("/api/genre/overall", get(handlers::genre_overall))
        .route("/api/genre/benchmark", get(handlers::genre_benchmark))
        // Risk
        .route("/api/risk/genre", get(handlers::genre_overall))
        .route("/api/risk/analysis", get(handlers::risk_analysis))
        .route("/api/combinations", get(handlers::combinations))
        .route("/api/movies/explore", get(handlers::explore_movies))
        // Prediction
        .route("/api/predict", post(handlers::predict))
        .route("/api/predict/compare", post(handlers::compare_plans))
        .route("/api/predict/simulate", post(handlers::simulate))
        .route("/api/predict/transparency", get(handlers::transparency))
        .with_state(state)
}
