//! Chart state machines and the view tracker.

pub mod charts;
pub mod state;
pub mod tracker;

pub use charts::{
    load_fan_standing, load_genre_evolution, load_listening_streak, load_listening_trends,
    load_promoter_report, load_time_series, PromoterReport, StreakReport, TimeSeriesReport,
};
pub use state::{ChartController, ChartState, FetchTicket, Phase};
pub use tracker::ViewTracker;
