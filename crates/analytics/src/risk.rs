//! Genre risk scoring.
//!
//! ## Algorithm
//! For every genre in the overall table:
//! 1. `budget_norm` = min-max normalised avg_budget
//! 2. `success_norm` = success_rate / 100
//! 3. `volatility_norm` = min-max normalised roi_volatility
//! 4. `risk_score` = (0.3 × budget_norm + 0.4 × (1 − success_norm) + 0.3 × volatility_norm) × 100
//!
//! A column with zero range normalises to 0.5 for every genre.

use crate::error::{AnalyticsError, Result};
use data_loader::numeric::round2;
use data_loader::{DataIndex, GenreOverallStat};
use serde::Serialize;
use tracing::instrument;

const BUDGET_WEIGHT: f64 = 0.3;
const FAILURE_WEIGHT: f64 = 0.4;
const VOLATILITY_WEIGHT: f64 = 0.3;

/// Reliability tier derived from sample size alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Moderate,
    Low,
}

impl Confidence {
    /// ≥ 10 samples High, ≥ 5 Moderate, else Low
    pub fn from_sample_size(n: u32) -> Self {
        if n >= 10 {
            Confidence::High
        } else if n >= 5 {
            Confidence::Moderate
        } else {
            Confidence::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Moderate => "Moderate",
            Confidence::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskCategory {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Moderate Risk")]
    ModerateRisk,
    Safe,
}

impl RiskCategory {
    /// > 60 High Risk, > 30 Moderate Risk, else Safe
    pub fn from_score(score: f64) -> Self {
        if score > 60.0 {
            RiskCategory::HighRisk
        } else if score > 30.0 {
            RiskCategory::ModerateRisk
        } else {
            RiskCategory::Safe
        }
    }
}

/// Weighted risk score in [0, 100] from inputs in [0, 1].
pub fn risk_score(budget_norm: f64, success_norm: f64, volatility_norm: f64) -> f64 {
    (budget_norm * BUDGET_WEIGHT
        + (1.0 - success_norm) * FAILURE_WEIGHT
        + volatility_norm * VOLATILITY_WEIGHT)
        * 100.0
}

/// Min-max normaliser over a column; zero range maps everything to 0.5.
struct MinMax {
    min: f64,
    range: f64,
}

impl MinMax {
    fn fit(values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        Self {
            min,
            range: max - min,
        }
    }

    fn apply(&self, value: f64) -> f64 {
        if self.range > 0.0 && self.range.is_finite() {
            (value - self.min) / self.range
        } else {
            0.5
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreRisk {
    pub genre: String,
    pub avg_budget: f64,
    pub success_rate: f64,
    pub roi_volatility: f64,
    pub avg_roi: f64,
    pub risk_score: f64,
    pub risk_category: RiskCategory,
    pub confidence: Confidence,
    pub total_movies: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    /// Safest first
    pub genres: Vec<GenreRisk>,
    /// Mean risk score over all genres
    pub industry_risk_index: f64,
}

fn score_genres(stats: &[GenreOverallStat]) -> Vec<(f64, &GenreOverallStat)> {
    let budget = MinMax::fit(stats.iter().map(|s| s.avg_budget));
    let volatility = MinMax::fit(stats.iter().map(|s| s.roi_volatility));

    let mut scored: Vec<(f64, &GenreOverallStat)> = stats
        .iter()
        .map(|s| {
            let score = risk_score(
                budget.apply(s.avg_budget),
                s.success_rate / 100.0,
                volatility.apply(s.roi_volatility),
            );
            (score, s)
        })
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));
    scored
}

/// Risk score, category and confidence for every genre, safest first.
#[instrument(skip(index))]
pub fn risk_analysis(index: &DataIndex) -> Result<RiskReport> {
    let stats = index.genre_overall_stats();
    if stats.is_empty() {
        return Err(AnalyticsError::EmptyTable("genre_overall_statistics"));
    }

    let scored = score_genres(stats);
    let industry = scored.iter().map(|(score, _)| score).sum::<f64>() / scored.len() as f64;

    let genres = scored
        .into_iter()
        .map(|(score, s)| GenreRisk {
            genre: s.genre.clone(),
            avg_budget: s.avg_budget,
            success_rate: s.success_rate,
            roi_volatility: s.roi_volatility,
            avg_roi: s.avg_roi,
            risk_score: round2(score),
            risk_category: RiskCategory::from_score(score),
            confidence: Confidence::from_sample_size(s.total_movies),
            total_movies: s.total_movies,
        })
        .collect();

    Ok(RiskReport {
        genres,
        industry_risk_index: round2(industry),
    })
}
