//! # Prediction Service
//!
//! Coordinates everything behind the prediction endpoints:
//! 1. Select and impute training rows from the movie table
//! 2. Fit the feature encoder and train the forest (once, at startup)
//! 3. Encode a request against the frozen schema
//! 4. Score it with the forest
//! 5. Attach similar movies, expected ROI, explanations and warnings
//!
//! Prediction failures never surface as errors: the caller gets a zeroed
//! payload with `error` set.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use classifier::{TrainedClassifier, TrainingConfig};
use data_loader::numeric::{mean, median, round2};
use data_loader::parser::normalize_genre_separators;
use data_loader::{DataIndex, NumericField, HIT_LABEL};
use pipeline::{Feature, FeatureEncoder, MovieFeatures};
use similarity::{BudgetClusterScorer, BudgetNeighbor, MovieQuery, SimilarMovie, WeightedScorer};

/// Similar movies shown next to a prediction, also used for expected ROI
const SIMILAR_MOVIES: usize = 5;
/// Features explained per prediction
const EXPLAINED_FEATURES: usize = 4;
/// Features listed in the importance chart
const TOP_IMPORTANCES: usize = 10;
/// Year the simulator assumes for a new release
const SIMULATION_YEAR: i32 = 2024;
/// Hit probabilities closer than this compare on expected ROI instead
const TIE_MARGIN: f64 = 5.0;

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionRequest {
    pub genre: String,
    pub budget: f64,
    pub year: i32,
    #[serde(alias = "rating")]
    pub imdb_rating: f64,
    pub runtime: f64,
    #[serde(default)]
    pub release_month: Option<u32>,
}

impl PredictionRequest {
    fn validate(&self) -> Result<()> {
        ensure!(!self.genre.trim().is_empty(), "genre must not be empty");
        ensure!(
            self.budget.is_finite() && self.budget >= 0.0,
            "budget must be a non-negative number"
        );
        ensure!(self.imdb_rating.is_finite(), "imdb_rating must be a number");
        ensure!(
            self.runtime.is_finite() && self.runtime >= 0.0,
            "runtime must be a non-negative number"
        );
        if let Some(month) = self.release_month {
            ensure!((1..=12).contains(&month), "release_month must be between 1 and 12");
        }
        Ok(())
    }

    fn features(&self) -> MovieFeatures {
        MovieFeatures {
            genre: normalize_genre_separators(&self.genre),
            budget: Some(self.budget),
            year: Some(f64::from(self.year)),
            imdb_rating: Some(self.imdb_rating),
            runtime: Some(self.runtime),
            release_month: self.release_month.map(f64::from),
        }
    }

    fn query(&self) -> MovieQuery {
        MovieQuery::new(&self.genre, self.budget, self.year, self.imdb_rating, self.runtime)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparisonRequest {
    pub plan_a: PredictionRequest,
    pub plan_b: PredictionRequest,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationRequest {
    pub genre: String,
    pub budget: f64,
    pub runtime: f64,
    pub release_month: u32,
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Unknown,
}

impl RiskLevel {
    /// Tier from the Hit probability in percent.
    pub fn from_hit_probability(hit: f64) -> Self {
        if hit > 60.0 {
            RiskLevel::Low
        } else if hit > 35.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    pub fn color(self) -> Option<&'static str> {
        match self {
            RiskLevel::Low => Some("#10b981"),
            RiskLevel::Moderate => Some("#f59e0b"),
            RiskLevel::High => Some("#ef4444"),
            RiskLevel::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    pub feature: String,
    pub impact: Impact,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub feature: String,
    /// Percent of total importance
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub prediction: String,
    /// Class name to probability in percent
    pub probabilities: BTreeMap<String, f64>,
    pub hit_probability: f64,
    pub expected_roi: f64,
    pub risk_level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_color: Option<&'static str>,
    pub explanations: Vec<Explanation>,
    pub similar_movies: Vec<SimilarMovie>,
    pub feature_importance: Vec<FeatureWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_warning: Option<String>,
}

impl Prediction {
    /// Zeroed payload reporting why no prediction was made.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            prediction: "Unknown".to_string(),
            probabilities: BTreeMap::new(),
            hit_probability: 0.0,
            expected_roi: 0.0,
            risk_level: RiskLevel::Unknown,
            risk_color: None,
            explanations: Vec::new(),
            similar_movies: Vec::new(),
            feature_importance: Vec::new(),
            budget_warning: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub prediction: String,
    pub hit_probability: f64,
    pub expected_roi: f64,
    pub risk_level: RiskLevel,
}

impl From<&Prediction> for PlanSummary {
    fn from(p: &Prediction) -> Self {
        Self {
            prediction: p.prediction.clone(),
            hit_probability: p.hit_probability,
            expected_roi: p.expected_roi,
            risk_level: p.risk_level,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub plan_a: PlanSummary,
    pub plan_b: PlanSummary,
    pub better_option: String,
    pub comparison_note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Simulation {
    pub success_probability: f64,
    pub expected_roi: f64,
    /// 100 minus the Hit probability
    pub risk_score: f64,
    pub similar_movies: Vec<BudgetNeighbor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetInfo {
    pub total_samples: usize,
    pub features_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transparency {
    /// Held-out accuracy in percent
    pub accuracy: f64,
    pub confusion_matrix: Vec<Vec<u32>>,
    pub classes: Vec<String>,
    pub feature_importance: Vec<FeatureWeight>,
    pub dataset_info: DatasetInfo,
}

// =============================================================================
// Service
// =============================================================================

/// Trained model plus everything needed to explain its output.
///
/// Built once before the server accepts requests and shared read-only.
pub struct PredictionService {
    data_index: Arc<DataIndex>,
    encoder: FeatureEncoder,
    model: TrainedClassifier,
    scorer: WeightedScorer,
    cluster: BudgetClusterScorer,
    /// Features by importance (percent, rounded), highest first
    ranked_features: Vec<(Feature, f64)>,
}

impl PredictionService {
    /// Select training rows, fit the encoder and train the forest.
    ///
    /// Rows missing a label, budget, runtime or release month are dropped;
    /// a missing IMDb rating takes the median of the remaining rows.
    #[instrument(skip(data_index, config))]
    pub fn train(data_index: Arc<DataIndex>, config: &TrainingConfig) -> Result<Self> {
        let start = Instant::now();

        let usable: Vec<_> = data_index
            .movies()
            .iter()
            .filter(|m| {
                m.success_label.is_some()
                    && m.budget.is_some()
                    && m.runtime.is_some()
                    && m.release_month.is_some()
            })
            .collect();
        ensure!(!usable.is_empty(), "no movie has a label, budget, runtime and release month");

        let ratings: Vec<f64> = usable.iter().filter_map(|m| m.imdb_rating).collect();
        let rating_median = median(&ratings).unwrap_or(0.0);

        let rows: Vec<MovieFeatures> = usable
            .iter()
            .map(|m| {
                let mut row = MovieFeatures::from_record(m);
                row.imdb_rating = row.imdb_rating.or(Some(rating_median));
                row
            })
            .collect();
        let labels: Vec<&str> = usable
            .iter()
            .filter_map(|m| m.success_label.as_deref())
            .collect();
        info!(
            "Training on {} of {} movies ({} dropped for missing fields)",
            rows.len(),
            data_index.movies().len(),
            data_index.movies().len() - rows.len()
        );

        let encoder = FeatureEncoder::fit(&rows, true).context("Failed to fit feature encoder")?;
        let matrix = encoder.encode_batch(&rows);
        let model =
            TrainedClassifier::train(&matrix, &labels, config).context("Failed to train classifier")?;

        let mut ranked_features: Vec<(Feature, f64)> = encoder
            .schema()
            .features()
            .iter()
            .cloned()
            .zip(model.feature_importances().iter().map(|v| round2(v * 100.0)))
            .collect();
        ranked_features.sort_by(|a, b| b.1.total_cmp(&a.1));

        info!(
            "ML model trained with accuracy {:.2}% in {:.2?}, classes {:?}",
            model.evaluation().accuracy * 100.0,
            start.elapsed(),
            model.labels().classes()
        );

        Ok(Self {
            scorer: WeightedScorer::new(data_index.clone()),
            cluster: BudgetClusterScorer::new(data_index.clone()),
            data_index,
            encoder,
            model,
            ranked_features,
        })
    }

    /// Held-out accuracy as a fraction
    pub fn accuracy(&self) -> f64 {
        self.model.evaluation().accuracy
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Predict a plan; failures come back as [`Prediction::failed`].
    #[instrument(skip(self), fields(genre = %request.genre))]
    pub fn predict(&self, request: &PredictionRequest) -> Prediction {
        match self.try_predict(request) {
            Ok(prediction) => prediction,
            Err(e) => {
                warn!("Prediction failed: {:#}", e);
                Prediction::failed(format!("{:#}", e))
            }
        }
    }

    fn try_predict(&self, request: &PredictionRequest) -> Result<Prediction> {
        request.validate()?;
        let features = request.features();

        let probabilities = self.class_probabilities(&features)?;
        let hit_probability = probabilities.get(HIT_LABEL).copied().unwrap_or(0.0);
        let row = self.encoder.encode(&features);
        let prediction = self.model.predict(&row)?;

        let similar_movies = self.scorer.top_similar(&request.query(), SIMILAR_MOVIES);
        let rois: Vec<f64> = similar_movies.iter().map(|m| m.roi).collect();
        let expected_roi = round2(mean(&rois).unwrap_or(0.0));

        let risk_level = RiskLevel::from_hit_probability(hit_probability);

        Ok(Prediction {
            error: None,
            prediction,
            probabilities,
            hit_probability,
            expected_roi,
            risk_level,
            risk_color: risk_level.color(),
            explanations: self.explain(&features),
            similar_movies,
            feature_importance: self.top_importances(),
            budget_warning: analytics::budget_warning(
                &self.data_index,
                &features.genre,
                request.budget,
            ),
        })
    }

    /// Class probabilities in percent, rounded to two decimals.
    fn class_probabilities(&self, features: &MovieFeatures) -> Result<BTreeMap<String, f64>> {
        let row = self.encoder.encode(features);
        let proba = self.model.predict_proba(&row)?;
        Ok(proba
            .into_iter()
            .map(|(class, p)| (class, round2(p * 100.0)))
            .collect())
    }

    /// Plain-language notes for the most important features.
    ///
    /// Numeric features compare against the movie-table median; genre
    /// features are mentioned only when the plan switches them on.
    fn explain(&self, features: &MovieFeatures) -> Vec<Explanation> {
        let mut explanations = Vec::new();
        for (feature, _) in self.ranked_features.iter().take(EXPLAINED_FEATURES) {
            match feature {
                Feature::Numeric(field) => {
                    let Some(value) = features.get(*field).or_else(|| self.encoder.median(*field))
                    else {
                        continue;
                    };
                    let Some(market) = self.data_index.median(*field) else {
                        continue;
                    };
                    let above = value >= market;
                    let mut impact = if above { Impact::Positive } else { Impact::Negative };
                    if *field == NumericField::Budget && value > market * 1.5 {
                        impact = Impact::Negative;
                    }
                    let name = capitalize(field.name());
                    explanations.push(Explanation {
                        description: format!(
                            "{} is {} market median.",
                            name,
                            if above { "above" } else { "below" }
                        ),
                        feature: name,
                        impact,
                    });
                }
                Feature::Genre(genre) => {
                    if self.encoder.activates(features, genre) {
                        explanations.push(Explanation {
                            feature: genre.clone(),
                            impact: Impact::Positive,
                            description: format!("Targeting high-impact {} segment.", genre),
                        });
                    }
                }
            }
        }
        explanations
    }

    fn top_importances(&self) -> Vec<FeatureWeight> {
        self.ranked_features
            .iter()
            .take(TOP_IMPORTANCES)
            .map(|(feature, importance)| FeatureWeight {
                feature: feature.display_name().to_string(),
                importance: *importance,
            })
            .collect()
    }

    /// Predict two plans and pick the better one.
    ///
    /// Higher Hit probability wins unless the two are within five points,
    /// in which case higher expected ROI wins.
    #[instrument(skip(self, request))]
    pub fn compare(&self, request: &ComparisonRequest) -> Comparison {
        let a = self.predict(&request.plan_a);
        let b = self.predict(&request.plan_b);

        let a_wins = if (a.hit_probability - b.hit_probability).abs() < TIE_MARGIN {
            a.expected_roi > b.expected_roi
        } else {
            a.hit_probability > b.hit_probability
        };
        let better = if a_wins { "Plan A" } else { "Plan B" };

        Comparison {
            plan_a: PlanSummary::from(&a),
            plan_b: PlanSummary::from(&b),
            better_option: better.to_string(),
            comparison_note: format!("{} offers better risk-adjusted returns.", better),
        }
    }

    /// Success odds for a release in the simulation year at median rating.
    #[instrument(skip(self), fields(genre = %request.genre))]
    pub fn simulate(&self, request: &SimulationRequest) -> Result<Simulation> {
        ensure!(
            (1..=12).contains(&request.release_month),
            "release_month must be between 1 and 12"
        );
        ensure!(
            request.budget.is_finite() && request.budget >= 0.0,
            "budget must be a non-negative number"
        );

        let rating = self
            .data_index
            .median(NumericField::ImdbRating)
            .context("no IMDb ratings in the movie table")?;
        let features = MovieFeatures {
            genre: normalize_genre_separators(&request.genre),
            budget: Some(request.budget),
            year: Some(f64::from(SIMULATION_YEAR)),
            imdb_rating: Some(rating),
            runtime: Some(request.runtime),
            release_month: Some(f64::from(request.release_month)),
        };

        let probabilities = self.class_probabilities(&features)?;
        let hit = probabilities.get(HIT_LABEL).copied().unwrap_or(0.0);

        let mut neighbours = self.cluster.nearest(&request.genre, request.budget);
        let rois: Vec<f64> = neighbours.iter().map(|n| n.roi).collect();
        let expected_roi = round2(mean(&rois).unwrap_or(0.0));
        neighbours.truncate(SIMILAR_MOVIES);

        Ok(Simulation {
            success_probability: hit,
            expected_roi,
            risk_score: round2(100.0 - hit),
            similar_movies: neighbours,
        })
    }

    pub fn transparency(&self) -> Transparency {
        let evaluation = self.model.evaluation();
        Transparency {
            accuracy: round2(evaluation.accuracy * 100.0),
            confusion_matrix: evaluation.confusion_matrix.clone(),
            classes: self.model.labels().classes().to_vec(),
            feature_importance: self.top_importances(),
            dataset_info: DatasetInfo {
                total_samples: self.data_index.movies().len(),
                features_count: self.encoder.schema().len(),
            },
        }
    }
}

/// `imdb_rating` -> `Imdb_rating`
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classifier::ForestConfig;
    use data_loader::MovieRecord;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    /// Hits are well-rated action dramas, flops are poorly rated comedies.
    fn build_test_data_index() -> Arc<DataIndex> {
        let movies = (0..40)
            .map(|i| {
                let hit = i % 2 == 0;
                let mut m = MovieRecord::new(
                    format!("Movie {}", i),
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
        Arc::new(DataIndex::from_parts(movies, vec![], vec![]).expect("fixture is valid"))
    }

    fn small_config() -> TrainingConfig {
        TrainingConfig {
            forest: ForestConfig {
                n_trees: 15,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn build_service() -> PredictionService {
        PredictionService::train(build_test_data_index(), &small_config()).expect("training succeeds")
    }

    fn hit_like() -> PredictionRequest {
        PredictionRequest {
            genre: "Action|Drama".to_string(),
            budget: 1.2e8,
            year: 2010,
            imdb_rating: 7.6,
            runtime: 140.0,
            release_month: Some(5),
        }
    }

    fn flop_like() -> PredictionRequest {
        PredictionRequest {
            genre: "Comedy".to_string(),
            budget: 6.0e7,
            year: 2010,
            imdb_rating: 4.6,
            runtime: 100.0,
            release_month: Some(5),
        }
    }

    // ============================================================================
    // Training
    // ============================================================================

    #[test]
    fn test_training_drops_incomplete_rows() {
        let mut movies: Vec<MovieRecord> = build_test_data_index().movies().to_vec();
        let mut unlabeled = MovieRecord::new("No label", "Action");
        unlabeled.budget = Some(1.0);
        movies.push(unlabeled);
        let index = Arc::new(DataIndex::from_parts(movies, vec![], vec![]).unwrap());

        let service = PredictionService::train(index, &small_config()).unwrap();
        let info = service.transparency();
        assert_eq!(info.dataset_info.total_samples, 41);
        // Action, Comedy, Drama + 5 numeric columns
        assert_eq!(info.dataset_info.features_count, 8);
        assert_eq!(info.classes, vec!["Flop", "Hit"]);
        let evaluated: u32 = info.confusion_matrix.iter().flatten().sum();
        assert_eq!(evaluated, 8);
    }

    #[test]
    fn test_training_fails_without_usable_rows() {
        let index = Arc::new(
            DataIndex::from_parts(vec![MovieRecord::new("Bare", "Drama")], vec![], vec![]).unwrap(),
        );
        assert!(PredictionService::train(index, &small_config()).is_err());
    }

    // ============================================================================
    // Prediction
    // ============================================================================

    #[test]
    fn test_predict_hit_like_plan() {
        let service = build_service();
        let prediction = service.predict(&hit_like());

        assert!(!prediction.is_error());
        assert_eq!(prediction.prediction, "Hit");
        assert!(prediction.hit_probability > 60.0);
        assert_eq!(prediction.risk_level, RiskLevel::Low);
        assert_eq!(prediction.risk_color, Some("#10b981"));
        let total: f64 = prediction.probabilities.values().sum();
        assert!((total - 100.0).abs() < 0.05);

        assert_eq!(prediction.similar_movies.len(), 5);
        assert_eq!(prediction.expected_roi, 2.5);
        assert!(prediction.explanations.len() <= 4);
        assert!(prediction.feature_importance.len() <= 10);
        assert!(prediction
            .feature_importance
            .windows(2)
            .all(|w| w[0].importance >= w[1].importance));
    }

    #[test]
    fn test_predict_flop_like_plan() {
        let prediction = build_service().predict(&flop_like());
        assert_eq!(prediction.prediction, "Flop");
        assert_eq!(prediction.risk_level, RiskLevel::High);
        assert_eq!(prediction.expected_roi, 0.4);
    }

    #[test]
    fn test_predict_without_release_month_uses_median() {
        let service = build_service();
        let mut request = hit_like();
        request.release_month = None;
        let prediction = service.predict(&request);
        assert!(!prediction.is_error());
        assert_eq!(prediction.prediction, "Hit");
    }

    #[test]
    fn test_invalid_input_yields_error_payload() {
        let service = build_service();
        let mut request = hit_like();
        request.release_month = Some(13);
        let prediction = service.predict(&request);

        assert!(prediction.is_error());
        assert_eq!(prediction.prediction, "Unknown");
        assert!(prediction.probabilities.is_empty());
        assert_eq!(prediction.hit_probability, 0.0);
        assert_eq!(prediction.risk_level, RiskLevel::Unknown);
        assert!(prediction.similar_movies.is_empty());

        let mut request = hit_like();
        request.budget = f64::NAN;
        assert!(service.predict(&request).is_error());
    }

    #[test]
    fn test_budget_warning_is_attached() {
        let service = build_service();
        let mut request = hit_like();
        request.budget = 1.0e9;
        let prediction = service.predict(&request);
        let warning = prediction.budget_warning.expect("warning for a 1B budget");
        assert!(warning.starts_with("Warning: Budget exceeds 150% of historical average"));
        assert!(warning.ends_with("for Action|Drama."));
    }

    #[test]
    fn test_genre_explanations_need_active_genre() {
        let service = build_service();
        let comedy = service.predict(&flop_like());
        assert!(comedy
            .explanations
            .iter()
            .all(|e| e.feature != "Action" && e.feature != "Drama"));
    }

    // ============================================================================
    // Comparison, simulation, transparency
    // ============================================================================

    #[test]
    fn test_compare_prefers_higher_hit_probability() {
        let service = build_service();
        let comparison = service.compare(&ComparisonRequest {
            plan_a: flop_like(),
            plan_b: hit_like(),
        });
        assert_eq!(comparison.better_option, "Plan B");
        assert_eq!(comparison.comparison_note, "Plan B offers better risk-adjusted returns.");
    }

    #[test]
    fn test_compare_equal_plans_fall_back_to_roi() {
        let service = build_service();
        let comparison = service.compare(&ComparisonRequest {
            plan_a: hit_like(),
            plan_b: hit_like(),
        });
        // Same probability and ROI: A does not beat B
        assert_eq!(comparison.better_option, "Plan B");
    }

    #[test]
    fn test_simulate() {
        let service = build_service();
        let simulation = service
            .simulate(&SimulationRequest {
                genre: "Comedy".to_string(),
                budget: 6.0e7,
                runtime: 100.0,
                release_month: 3,
            })
            .unwrap();
        assert_eq!(simulation.similar_movies.len(), 5);
        assert_eq!(simulation.expected_roi, 0.4);
        assert!((simulation.risk_score + simulation.success_probability - 100.0).abs() < 0.011);

        assert!(service
            .simulate(&SimulationRequest {
                genre: "Comedy".to_string(),
                budget: 6.0e7,
                runtime: 100.0,
                release_month: 0,
            })
            .is_err());
    }

    #[test]
    fn test_transparency_importances_are_percentages() {
        let info = build_service().transparency();
        assert!(info.accuracy >= 0.0 && info.accuracy <= 100.0);
        let total: f64 = info.feature_importance.iter().map(|f| f.importance).sum();
        assert!(total <= 100.05);
        assert!(info
            .feature_importance
            .iter()
            .all(|f| !f.feature.starts_with("genre_")));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("imdb_rating"), "Imdb_rating");
        assert_eq!(capitalize("budget"), "Budget");
        assert_eq!(capitalize(""), "");
    }
}
