//! End-to-end tests for the HTTP routes over an in-memory index.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use classifier::{ForestConfig, TrainingConfig};
use data_loader::{DataIndex, GenreOverallStat, MovieRecord};
use server::{create_router, AppState};

// ============================================================================
// Test Fixtures
// ============================================================================

/// 25 hits (action dramas) and 25 flops (comedies), plus a thriller
/// benchmark row with a round average budget.
fn build_test_data_index() -> Arc<DataIndex> {
    let movies = (0..50)
        .map(|i| {
            let hit = i % 2 == 0;
            let mut m = MovieRecord::new(
                format!("Movie {:02}", i),
                if hit { "Action|Drama" } else { "Comedy" },
            );
            m.year = Some(2000 + (i % 20));
            m.budget = Some(if hit { 1.0e8 } else { 5.0e7 } + f64::from(i) * 1.0e6);
            m.imdb_rating = Some(if hit { 7.5 } else { 4.5 } + f64::from(i % 5) * 0.1);
            m.runtime = Some(if hit { 140.0 } else { 100.0 });
            m.release_month = Some((i % 12) as u32 + 1);
            m.roi = if hit { 2.5 } else { 0.4 };
            m.box_office = m.budget.map(|b| b * m.roi);
            m.success_label = Some(if hit { "Hit" } else { "Flop" }.to_string());
            m
        })
        .collect();

    let mut thriller = GenreOverallStat::empty("Thriller");
    thriller.avg_budget = 1000.0;
    thriller.total_movies = 3;
    thriller.success_rate = 40.0;

    Arc::new(DataIndex::from_parts(movies, vec![], vec![thriller]).expect("fixture is valid"))
}

fn build_app() -> Router {
    let config = TrainingConfig {
        forest: ForestConfig {
            n_trees: 15,
            ..Default::default()
        },
        ..Default::default()
    };
    let state = AppState::build(build_test_data_index(), &config).expect("training succeeds");
    create_router(state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

// ============================================================================
// Service
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get(build_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["data_service"], true);
    let accuracy = body["services"]["model_accuracy"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[tokio::test]
async fn test_root_banner() {
    let (status, body) = get(build_app(), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "operational");
    assert_eq!(body["endpoints"]["predict"], "/api/predict");
}

// ============================================================================
// Analytics routes
// ============================================================================

#[tokio::test]
async fn test_budget_optimization_above_average() {
    let (status, body) = get(
        build_app(),
        "/api/dashboard/budget-optimization?genre=Thriller&budget=1200",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "above_average");
    assert_eq!(body["risk_increase"], 20.0);
    assert_eq!(body["suggested_cap"], 1200.0);
}

#[tokio::test]
async fn test_budget_optimization_unknown_genre() {
    let (status, body) = get(
        build_app(),
        "/api/dashboard/budget-optimization?genre=Western&budget=1200",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "error": "Genre not found" }));
}

#[tokio::test]
async fn test_budget_optimization_missing_param() {
    let (status, _) = get(build_app(), "/api/dashboard/budget-optimization?genre=Thriller").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_release_timing_insufficient_data() {
    let (status, body) = get(build_app(), "/api/dashboard/release-timing?genre=Western").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Insufficient data for 'Western' (0 movies)");
}

#[tokio::test]
async fn test_genre_list_and_year_range() {
    let app = build_app();
    let (_, body) = get(app.clone(), "/api/genre/list").await;
    assert_eq!(body["genres"], json!(["Action", "Comedy", "Drama", "Thriller"]));

    let (_, body) = get(app, "/api/genre/year-range").await;
    assert_eq!(body, json!({ "min_year": 2000, "max_year": 2019 }));
}

#[tokio::test]
async fn test_risk_analysis_scores_in_range() {
    let (status, body) = get(build_app(), "/api/risk/analysis").await;
    assert_eq!(status, StatusCode::OK);
    let genres = body["genres"].as_array().unwrap();
    assert_eq!(genres.len(), 4);
    assert!(genres.iter().all(|g| {
        let score = g["risk_score"].as_f64().unwrap();
        (0.0..=100.0).contains(&score)
    }));
}

#[tokio::test]
async fn test_combinations() {
    let (status, body) = get(build_app(), "/api/combinations").await;
    assert_eq!(status, StatusCode::OK);
    let all = body["all_combinations"].as_array().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["combination"], "Action|Drama");
    assert_eq!(all[0]["total_movies"], 25);
}

// ============================================================================
// Explorer
// ============================================================================

#[tokio::test]
async fn test_explore_second_page() {
    let (status, body) = get(
        build_app(),
        "/api/movies/explore?success_label=Hit&page=2&limit=20",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 25);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["movies"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_explore_rejects_limit_out_of_range() {
    let (status, body) = get(build_app(), "/api/movies/explore?limit=101").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("limit"));

    let (status, _) = get(build_app(), "/api/movies/explore?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Prediction
// ============================================================================

#[tokio::test]
async fn test_predict_hit_like_plan() {
    let (status, body) = post(
        build_app(),
        "/api/predict",
        json!({
            "genre": "Action|Drama",
            "budget": 1.2e8,
            "year": 2010,
            "imdb_rating": 7.6,
            "runtime": 140,
            "release_month": 5
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("error").is_none());
    assert_eq!(body["prediction"], "Hit");
    assert_eq!(body["risk_level"], "Low");
    assert_eq!(body["similar_movies"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_predict_invalid_month_returns_error_payload() {
    let (status, body) = post(
        build_app(),
        "/api/predict",
        json!({
            "genre": "Comedy",
            "budget": 5.0e7,
            "year": 2010,
            "rating": 5.0,
            "runtime": 100,
            "release_month": 14
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
    assert_eq!(body["prediction"], "Unknown");
    assert_eq!(body["risk_level"], "Unknown");
    assert_eq!(body["probabilities"], json!({}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_predictions_agree() {
    let app = build_app();
    let plan = json!({
        "genre": "Action|Drama",
        "budget": 1.2e8,
        "year": 2010,
        "imdb_rating": 7.6,
        "runtime": 140,
        "release_month": 5
    });

    let requests = (0..8).map(|_| {
        let app = app.clone();
        let plan = plan.clone();
        tokio::spawn(async move { post(app, "/api/predict", plan).await })
    });
    let mut responses = Vec::new();
    for handle in requests.collect::<Vec<_>>() {
        responses.push(handle.await.unwrap());
    }
    let (health, _) = get(app, "/health").await;
    assert_eq!(health, StatusCode::OK);

    assert!(responses.iter().all(|(status, _)| *status == StatusCode::OK));
    let first = &responses[0].1;
    assert_eq!(first["prediction"], "Hit");
    assert!(responses.iter().all(|(_, body)| body == first));
}

#[tokio::test]
async fn test_compare_plans() {
    let plan = |genre: &str, rating: f64| {
        json!({ "genre": genre, "budget": 8.0e7, "year": 2012, "rating": rating, "runtime": 120 })
    };
    let (status, body) = post(
        build_app(),
        "/api/predict/compare",
        json!({ "plan_a": plan("Action|Drama", 7.8), "plan_b": plan("Comedy", 4.2) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["better_option"], "Plan A");
    assert_eq!(body["comparison_note"], "Plan A offers better risk-adjusted returns.");
}

#[tokio::test]
async fn test_simulate() {
    let app = build_app();
    let (status, body) = post(
        app.clone(),
        "/api/predict/simulate",
        json!({ "genre": "Comedy", "budget": 6.0e7, "runtime": 100, "release_month": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["similar_movies"].as_array().unwrap().len(), 5);
    assert_eq!(body["expected_roi"], 0.4);

    let (status, _) = post(
        app,
        "/api/predict/simulate",
        json!({ "genre": "Comedy", "budget": 6.0e7, "runtime": 100, "release_month": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transparency() {
    let (status, body) = get(build_app(), "/api/predict/transparency").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["classes"], json!(["Flop", "Hit"]));
    assert_eq!(body["dataset_info"]["total_samples"], 50);
    assert_eq!(body["dataset_info"]["features_count"], 8);
    assert!(body["feature_importance"].as_array().unwrap().len() <= 10);
}
