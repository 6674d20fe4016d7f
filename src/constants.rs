//! Backend endpoint paths and the fixed numbers the analytics views agree on.

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_CONFIG_PATH: &str = "rewrapped.toml";
pub const DEFAULT_TOKEN_FILE: &str = ".rewrapped/token.json";

// Cookie tier lifetime in the web client: one day.
pub const TOKEN_MAX_AGE_SECS: u64 = 60 * 60 * 24;

pub const VIEW_TRACKING_DEBOUNCE_MS: u64 = 500;

// Genre evolution
pub const GENRE_EVOLUTION_ARTIST_LIMIT: u32 = 50;
pub const TOP_GENRE_COUNT: usize = 10;

// Promoter analytics
pub const TREND_THRESHOLD: f64 = 0.10;
pub const DEFAULT_TOP_EVENTS: usize = 5;
pub const MIN_VIEWS_FOR_SAVE_RATE: u64 = 10;
pub const WEEKLY_TREND_THRESHOLD_PCT: f64 = 5.0;
pub const PEAK_DAY_COUNT: usize = 3;

// Query defaults mirrored from the web client
pub const DEFAULT_TRENDS_DAYS: u32 = 30;
pub const DEFAULT_HEATMAP_DAYS: u32 = 90;
pub const DEFAULT_TIME_SERIES_DAYS: u32 = 30;

// Endpoint paths
pub const HOME_DATA: &str = "/home/data";
pub const SPOTIFY_TOP_TRACKS: &str = "/spotify/top-tracks";
pub const SPOTIFY_TOP_ALBUMS: &str = "/spotify/top-albums";
pub const SPOTIFY_TOP_ARTISTS: &str = "/spotify/top-artists";
pub const SPOTIFY_RECENTLY_PLAYED: &str = "/spotify/recently-played";

pub const EVENTS_LIST: &str = "/events/list";
pub const EVENTS_ALL: &str = "/events/all";
pub const EVENTS_SAVED: &str = "/events/saved";
pub const EVENTS_SAVE: &str = "/events/save";
pub const EVENTS_DELETE: &str = "/events/delete";
pub const EVENTS_PROMOTER: &str = "/events/promoter";
pub const EVENTS_TRACK_VIEW: &str = "/events/track/view";
pub const EVENTS_PROMOTER_ANALYTICS: &str = "/events/analytics/promoter";
pub const EVENTS_TIME_SERIES: &str = "/events/analytics/time-series";
pub const EVENTS_EXPORT: &str = "/events/export/analytics";

pub const ANALYTICS_LISTENING_TRENDS: &str = "/analytics/user/listening-trends";
pub const ANALYTICS_LISTENING_HEATMAP: &str = "/analytics/user/listening-heatmap";
pub const ANALYTICS_GENRE_DISTRIBUTION: &str = "/analytics/user/genre-distribution";
pub const ANALYTICS_ARTIST_GENRE_MATRIX: &str = "/analytics/user/artist-genre-matrix";
pub const ANALYTICS_LISTENING_STREAK: &str = "/analytics/user/listening-streak";
pub const ANALYTICS_TOP_LISTENERS: &str = "/analytics/user/top-listeners-percentile";

pub const AUTH_LOGIN: &str = "/auth/rewrapped/login";
pub const AUTH_REGISTER: &str = "/auth/rewrapped/register";
pub const AUTH_LOGOUT: &str = "/auth/logout";
pub const AUTH_PREFERENCES: &str = "/auth/user/preferences";
pub const AUTH_CHANGE_PASSWORD: &str = "/auth/change-password";
