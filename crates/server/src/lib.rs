//! HTTP facade for the CineIntel analytics and prediction engine.
//!
//! - `orchestrator`: the trained prediction service
//! - `api`: axum router, shared state and handlers
//! - `config`: flags and environment
//! - `error`: HTTP error mapping

pub mod api;
pub mod config;
pub mod error;
pub mod orchestrator;

pub use api::{create_router, AppState};
pub use config::ServerConfig;
pub use error::{AppError, AppResult};
pub use orchestrator::{
    Comparison, ComparisonRequest, Prediction, PredictionRequest, PredictionService, RiskLevel,
    Simulation, SimulationRequest, Transparency,
};
