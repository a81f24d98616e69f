use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use classifier::TrainingConfig;
use data_loader::DataIndex;
use tracing::info;

use crate::orchestrator::PredictionService;

/// Everything a handler can read. Built once, never mutated.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<DataIndex>,
    pub predictor: Arc<PredictionService>,
}

impl AppState {
    pub fn new(data: Arc<DataIndex>, predictor: Arc<PredictionService>) -> Self {
        Self { data, predictor }
    }

    /// Train the predictor over an already loaded index.
    pub fn build(data: Arc<DataIndex>, config: &TrainingConfig) -> Result<Self> {
        let predictor = PredictionService::train(data.clone(), config)
            .context("Failed to train prediction model")?;
        Ok(Self::new(data, Arc::new(predictor)))
    }

    /// Load the CSV tables from `data_dir`, then train.
    pub fn load(data_dir: &Path, config: &TrainingConfig) -> Result<Self> {
        info!("Loading data from {}", data_dir.display());
        let data = DataIndex::load_from_dir(data_dir)
            .with_context(|| format!("Failed to load data from {}", data_dir.display()))?;
        Self::build(Arc::new(data), config)
    }
}
