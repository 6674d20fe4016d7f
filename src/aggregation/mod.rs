//! Pure transforms from backend records into chart-ready shapes.

pub mod genres;
pub mod heatmap;
pub mod listening;
pub mod percentile;
pub mod promoter;
pub mod targeting;
pub mod timeseries;
pub mod trends;

pub use genres::{genre_evolution, top_genres, FrameGenres, GenreEvolution, GenreShare};
pub use listening::{monthly_hours_series, reference_year, trend_points, weekly_points, MonthHours};
pub use percentile::{FanStanding, FanTier};
pub use promoter::{best_save_rate, filter_by_date_range, top_events};
pub use targeting::{targeting_effectiveness, TargetGroup, TargetingEffectiveness};
pub use timeseries::{peak_days, weekly_trend, TrendDirection, WeeklyTrend};
pub use trends::{detect_trends, percent_change, RatedEvent, TrendClassification, Trends};
