//! Dashboard KPIs and the generated market narratives.

use crate::error::{AnalyticsError, Result};
use crate::first_max_by;
use crate::risk::Confidence;
use data_loader::numeric::{mean, round2};
use data_loader::{DataIndex, GenreOverallStat};
use serde::Serialize;
use tracing::{debug, instrument};

/// Genres with fewer movies are ignored by the strategic insight when possible.
const RELIABLE_SAMPLE_SIZE: u32 = 5;
const DEFAULT_RISING_STAR: &str = "Drama";
const RECOMMENDATION_YEAR: i32 = 2019;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreRoi {
    pub genre: String,
    pub avg_roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestTrend {
    pub year: i32,
    pub top_genre: String,
    pub revenue: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketPhase {
    Expansion,
    Consolidation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategicInsight {
    pub text: String,
    pub top_roi_genre: String,
    pub safest_genre: String,
    pub rising_star: String,
    pub market_phase: MarketPhase,
}

/// Fixed portfolio split, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapitalAllocation {
    #[serde(rename = "Core (Low Risk)")]
    pub core: u8,
    #[serde(rename = "Growth (Moderate)")]
    pub growth: u8,
    #[serde(rename = "Speculative (High)")]
    pub speculative: u8,
}

impl Default for CapitalAllocation {
    fn default() -> Self {
        Self {
            core: 45,
            growth: 35,
            speculative: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_movies: usize,
    pub overall_success_rate: f64,
    pub total_revenue: i64,
    pub highest_roi_genre: GenreRoi,
    pub latest_trend: Option<LatestTrend>,
    pub strategic_insight: StrategicInsight,
    pub capital_allocation: CapitalAllocation,
}

/// Headline KPIs for the executive dashboard.
#[instrument(skip(index))]
pub fn dashboard_summary(index: &DataIndex) -> Result<DashboardSummary> {
    let movies = index.movies();
    let total_movies = movies.len();
    let hits = movies.iter().filter(|m| m.is_hit()).count();
    let success_rate = if total_movies > 0 {
        hits as f64 / total_movies as f64 * 100.0
    } else {
        0.0
    };
    let total_revenue: f64 = movies.iter().filter_map(|m| m.box_office).sum();

    let top = first_max_by(index.genre_overall_stats(), |s| s.avg_roi)
        .ok_or(AnalyticsError::EmptyTable("genre_overall_statistics"))?;

    Ok(DashboardSummary {
        total_movies,
        overall_success_rate: round2(success_rate),
        total_revenue: total_revenue as i64,
        highest_roi_genre: GenreRoi {
            genre: top.genre.clone(),
            avg_roi: round2(top.avg_roi),
        },
        latest_trend: latest_trend(index),
        strategic_insight: strategic_insight(index)?,
        capital_allocation: CapitalAllocation::default(),
    })
}

/// Top box-office genre of the latest movie year, or of the year before it
/// when the latest year has no statistics yet.
fn latest_trend(index: &DataIndex) -> Option<LatestTrend> {
    let max_year = index.max_year()?;
    let mut top = first_max_by(index.year_stats_for(max_year), |s| s.total_box_office);
    if top.is_none() && max_year > 2000 {
        debug!("No genre statistics for {}, falling back a year", max_year);
        top = first_max_by(index.year_stats_for(max_year - 1), |s| s.total_box_office);
    }
    top.map(|s| LatestTrend {
        year: s.year,
        top_genre: s.genre.clone(),
        revenue: s.total_box_office as i64,
    })
}

/// Genre with the largest box-office growth from 2018 to 2019.
pub fn rising_star(index: &DataIndex) -> String {
    let growth = index.year_stats_for(2018).flat_map(|prev| {
        index
            .year_stats_for(2019)
            .filter(move |next| next.genre == prev.genre)
            .map(move |next| {
                let base = if prev.total_box_office == 0.0 {
                    1.0
                } else {
                    prev.total_box_office
                };
                (prev.genre.as_str(), (next.total_box_office - prev.total_box_office) / base)
            })
    });

    let mut best: Option<(&str, f64)> = None;
    for (genre, g) in growth {
        if best.map_or(true, |(_, b)| g > b) {
            best = Some((genre, g));
        }
    }
    best.map_or_else(|| DEFAULT_RISING_STAR.to_string(), |(g, _)| g.to_string())
}

/// Narrative combining the best-ROI, most volatile, safest and rising genres.
pub fn strategic_insight(index: &DataIndex) -> Result<StrategicInsight> {
    let all = index.genre_overall_stats();
    let mut reliable: Vec<&GenreOverallStat> = all
        .iter()
        .filter(|s| s.total_movies >= RELIABLE_SAMPLE_SIZE)
        .collect();
    if reliable.is_empty() {
        reliable = all.iter().collect();
    }

    let top_roi = first_max_by(reliable.iter().copied(), |s| s.avg_roi)
        .ok_or(AnalyticsError::EmptyTable("genre_overall_statistics"))?;
    let most_volatile = first_max_by(reliable.iter().copied(), |s| s.roi_volatility)
        .ok_or(AnalyticsError::EmptyTable("genre_overall_statistics"))?;

    let mut by_safety = reliable.clone();
    by_safety.sort_by(|a, b| {
        b.success_rate
            .total_cmp(&a.success_rate)
            .then(a.roi_volatility.total_cmp(&b.roi_volatility))
    });
    let safest = by_safety[0];

    let rising = rising_star(index);
    let mean_roi = mean(&reliable.iter().map(|s| s.avg_roi).collect::<Vec<_>>()).unwrap_or(0.0);

    let text = format!(
        "Market Analysis: {} leads ROI at {:.1}x. Risk Alert: {} shows highest volatility (σ={:.1}). \
         Recommended Strategy: Allocate 50% to {} for stability and 20% to {} for growth.",
        top_roi.genre,
        top_roi.avg_roi,
        most_volatile.genre,
        most_volatile.roi_volatility,
        safest.genre,
        rising
    );

    Ok(StrategicInsight {
        text,
        top_roi_genre: top_roi.genre.clone(),
        safest_genre: safest.genre.clone(),
        rising_star: rising,
        market_phase: if mean_roi > 1.2 {
            MarketPhase::Expansion
        } else {
            MarketPhase::Consolidation
        },
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiRecommendation {
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi_volatility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl AiRecommendation {
    fn text_only(recommendation: String) -> Self {
        Self {
            recommendation,
            top_genre: None,
            roi_volatility: None,
            success_rate: None,
            risk_level: None,
            confidence: None,
        }
    }
}

fn volatility_level(volatility: f64) -> &'static str {
    if volatility > 2.0 {
        "High"
    } else if volatility > 1.0 {
        "Moderate"
    } else {
        "Low"
    }
}

/// Recommendation for the genre that led box office in 2019.
#[instrument(skip(index))]
pub fn ai_recommendation(index: &DataIndex) -> AiRecommendation {
    let Some(top) = first_max_by(index.year_stats_for(RECOMMENDATION_YEAR), |s| s.total_box_office)
    else {
        return AiRecommendation::text_only("Insufficient data for 2019 analysis".to_string());
    };
    let genre = &top.genre;

    let Some(overall) = index.get_overall_stat(genre) else {
        return AiRecommendation::text_only(format!("{} dominated 2019 revenue.", genre));
    };

    let mut recent: Vec<_> = index
        .genre_year_stats()
        .iter()
        .filter(|s| &s.genre == genre && (2017..=2019).contains(&s.year))
        .collect();
    recent.sort_by_key(|s| s.year);

    let mut trend = "stable".to_string();
    if let (Some(first), Some(last)) = (recent.first(), recent.last()) {
        if recent.len() >= 2 {
            let diff = last.success_rate - first.success_rate;
            if diff < -5.0 {
                trend = format!("declined {:.1}%", diff.abs());
            } else if diff > 5.0 {
                trend = format!("increased {:.1}%", diff);
            }
        }
    }

    let risk_level = volatility_level(overall.roi_volatility);
    let confidence = Confidence::from_sample_size(overall.total_movies);
    let recommendation = format!(
        "{} dominated 2019 revenue. However, ROI volatility is {} (σ = {:.1}). \
         Success rate {} in the last 3 years. {} investment recommended. ({} Confidence)",
        genre,
        risk_level.to_lowercase(),
        overall.roi_volatility,
        trend,
        risk_level,
        confidence.as_str()
    );

    AiRecommendation {
        recommendation,
        top_genre: Some(genre.clone()),
        roi_volatility: Some(round2(overall.roi_volatility)),
        success_rate: Some(round2(overall.success_rate)),
        risk_level: Some(risk_level),
        confidence: Some(confidence),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketPulse {
    /// Mean ROI of movies from the last three years
    pub roi_velocity: f64,
    pub sentiment: Sentiment,
    pub top_growing_segment: String,
    /// Mean ROI volatility across genres
    pub risk_index: f64,
}

#[instrument(skip(index))]
pub fn market_pulse(index: &DataIndex) -> MarketPulse {
    let roi_velocity = index
        .max_year()
        .and_then(|current| {
            let recent: Vec<f64> = index
                .movies()
                .iter()
                .filter(|m| m.year.is_some_and(|y| y >= current - 2))
                .map(|m| m.roi)
                .collect();
            mean(&recent)
        })
        .unwrap_or(0.0);

    let sentiment = if roi_velocity > 1.2 {
        Sentiment::Bullish
    } else if roi_velocity > 0.8 {
        Sentiment::Neutral
    } else {
        Sentiment::Bearish
    };

    let volatilities: Vec<f64> = index
        .genre_overall_stats()
        .iter()
        .map(|s| s.roi_volatility)
        .collect();

    MarketPulse {
        roi_velocity: round2(roi_velocity),
        sentiment,
        top_growing_segment: rising_star(index),
        risk_index: round2(mean(&volatilities).unwrap_or(0.0)),
    }
}
