//! # Analytics Crate
//!
//! Stateless statistics over a loaded [`DataIndex`].
//!
//! ## Modules
//!
//! - **summary**: dashboard KPIs, strategic insight, AI recommendation, market pulse
//! - **risk**: per-genre risk score, category and confidence
//! - **combinations**: multi-genre strings analysed as atomic categories
//! - **timing**: best release months for a genre
//! - **genre**: benchmarks, budget guidance and yearly/overall projections
//! - **movies**: top performers
//!
//! Lookups that can legitimately find nothing return an [`Outcome`]; a
//! missing table is an [`AnalyticsError`].
//!
//! ## Example Usage
//!
//! ```ignore
//! use analytics::{budget_optimization, release_timing, risk_analysis};
//!
//! let report = risk_analysis(&index)?;
//! let advice = budget_optimization(&index, "Drama", 1.2e8);
//! let timing = release_timing(&index, "Action|Thriller");
//! ```

pub mod combinations;
pub mod error;
pub mod format;
pub mod genre;
pub mod movies;
pub mod outcome;
pub mod risk;
pub mod summary;
pub mod timing;

pub use combinations::{genre_combinations, CombinationReport, CombinationStat};
pub use error::{AnalyticsError, Result};
pub use genre::{
    benchmark, budget_optimization, budget_warning, highest_grossing_per_year, popularity,
    roi_by_genre, success_rate_by_genre, top_genres_by_year, year_span, Benchmark, BudgetAdvice,
    GenreReturn, GenreSuccess, PopularityPoint, RankedGenre, YearLeader, YearRange, YearSpan,
};
pub use movies::{top_performers, TopPerformer, DEFAULT_TOP_PERFORMERS};
pub use outcome::Outcome;
pub use risk::{risk_analysis, risk_score, Confidence, GenreRisk, RiskCategory, RiskReport};
pub use summary::{
    ai_recommendation, dashboard_summary, market_pulse, rising_star, strategic_insight,
    AiRecommendation, CapitalAllocation, DashboardSummary, MarketPulse, StrategicInsight,
};
pub use timing::{release_timing, ReleaseTiming};

pub use data_loader::DataIndex;

/// First item with the largest key. NaN keys never win.
pub(crate) fn first_max_by<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    key: impl Fn(&T) -> f64,
) -> Option<&'a T> {
    let mut best: Option<(&'a T, f64)> = None;
    for item in items {
        let k = key(item);
        if k.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| k > b) {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}
