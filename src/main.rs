use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rewrapped::aggregation::{FanStanding, TargetGroup};
use rewrapped::api::{Credentials, ExportPayload};
use rewrapped::auth::LayeredTokenStore;
use rewrapped::constants::{DEFAULT_HEATMAP_DAYS, DEFAULT_TIME_SERIES_DAYS, DEFAULT_TRENDS_DAYS};
use rewrapped::controller::{
    load_fan_standing, load_genre_evolution, load_listening_streak, load_listening_trends,
    load_promoter_report, load_time_series, ChartController,
};
use rewrapped::render::{band_share, StackLayout};
use rewrapped::types::{
    DateRange, ExportFormat, ListeningTrendPoint, TimeFrameSelection, TrendBucket, HEATMAP_DAYS,
    HEATMAP_HOURS,
};
use rewrapped::{logging, ApiClient, Config};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

// Nominal plot height used when reporting on-screen band shares.
const PLOT_HEIGHT: f64 = 260.0;

#[derive(Parser)]
#[command(name = "rewrapped")]
#[command(about = "Re-Wrapped listening and promoter analytics client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Genre evolution across short, medium and long term
    Genres {
        #[arg(long)]
        user_id: i64,
    },
    /// Tracks played and minutes listened per day, week or month
    Listening {
        #[arg(long)]
        user_id: i64,
        #[arg(long, default_value = "daily")]
        bucket: TrendBucket,
        #[arg(long, default_value_t = DEFAULT_TRENDS_DAYS)]
        days: u32,
    },
    /// Lifetime listening totals and hours per month
    Streak {
        #[arg(long)]
        user_id: i64,
    },
    /// Listener percentile and fan tier
    FanTier {
        #[arg(long)]
        user_id: i64,
    },
    /// Improving and declining promoter events
    Trends {
        #[arg(long)]
        user_id: i64,
        /// Inclusive start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Inclusive end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Engagement by target country, genre and artist
    Targeting {
        #[arg(long)]
        user_id: i64,
    },
    /// Listening activity by weekday and hour
    Heatmap {
        #[arg(long)]
        user_id: i64,
        #[arg(long, default_value_t = DEFAULT_HEATMAP_DAYS)]
        days: u32,
    },
    /// Week-over-week views and peak days
    Timeseries {
        #[arg(long)]
        user_id: i64,
        /// A single event instead of all promoter events
        #[arg(long)]
        event_id: Option<i64>,
        #[arg(long, default_value_t = DEFAULT_TIME_SERIES_DAYS)]
        days: u32,
    },
    /// Download analytics as CSV or JSON
    Export {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        event_id: Option<i64>,
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        #[arg(long, default_value_t = DEFAULT_TIME_SERIES_DAYS)]
        days: u32,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the session and forget the stored token
    Logout,
}

fn build_client(config: &Config) -> anyhow::Result<ApiClient> {
    let tokens = Arc::new(LayeredTokenStore::standard(
        config.auth.token_file.clone(),
        config.auth.token_max_age_secs,
    ));
    let client = ApiClient::new(&config.api, tokens).context("Failed to create API client")?;
    Ok(client)
}

fn print_groups(title: &str, groups: &BTreeMap<String, TargetGroup>) {
    println!("\n{}:", title);
    if groups.is_empty() {
        println!("   (none)");
    }
    for (name, group) in groups {
        println!(
            "   {:<24} events {:>3}  views {:>6}  saves {:>5}  \
             avg engagement {:>8.1}  save rate {:>5.1}%",
            name,
            group.events,
            group.views,
            group.saves,
            group.avg_engagement(),
            group.save_rate()
        );
    }
}

async fn run(command: Commands, client: ApiClient) -> anyhow::Result<()> {
    match command {
        Commands::Genres { user_id } => {
            let evolution = load_genre_evolution(&client, user_id).await?;
            let layout = StackLayout::streamgraph(&evolution.frames, &evolution.top_genres);
            println!("🎧 Genre evolution for user {}", user_id);
            for (column, frame) in evolution.frames.iter().enumerate() {
                println!("\n{}:", frame.label);
                for share in &frame.shares {
                    println!(
                        "   {:<24} {:>3} plays  {:>5.1}%  {} artists  avg rank {:.1}",
                        share.genre,
                        share.count,
                        band_share(&layout, &share.genre, column, PLOT_HEIGHT),
                        share.meta.num_artists,
                        share.meta.avg_rank
                    );
                }
            }
        }
        Commands::Listening {
            user_id,
            bucket,
            days,
        } => {
            let controller: ChartController<TimeFrameSelection, Vec<ListeningTrendPoint>> =
                ChartController::new(
                    "listening-trends",
                    TimeFrameSelection::Days(days),
                    "Failed to load listening trends data",
                );
            controller
                .refresh(|selection| {
                    let client = client.clone();
                    async move { load_listening_trends(&client, user_id, bucket, selection).await }
                })
                .await;
            let state = controller.state().await;
            if let Some(message) = state.error {
                anyhow::bail!(message);
            }
            let points = state.data.unwrap_or_default();
            println!("🎵 Listening trends, last {} days ({})", days, bucket.as_str());
            if points.is_empty() {
                println!("No listening data for this period");
            }
            for point in &points {
                println!(
                    "   {}  {:>4} tracks  {:>7.1} min",
                    point.date, point.track_count, point.minutes
                );
            }
        }
        Commands::Streak { user_id } => {
            let report = load_listening_streak(&client, user_id).await?;
            println!(
                "🔥 {} minutes across {} tracks",
                report.total_minutes, report.total_tracks
            );
            if let Some(day) = report.biggest_listening_day {
                println!("   Biggest listening day: {}", day);
            }
            for month in &report.months {
                println!("   {} {:>7.2} hrs", month.month, month.hours);
            }
            println!("   Year total: {:.2} hrs", report.total_hours());
        }
        Commands::FanTier { user_id } => {
            let controller: ChartController<i64, FanStanding> =
                ChartController::new("fan-tier", user_id, "Failed to load percentile ranking");
            controller
                .refresh(|user| {
                    let client = client.clone();
                    async move { load_fan_standing(&client, user).await }
                })
                .await;
            let state = controller.state().await;
            match (state.data, state.error) {
                (Some(standing), _) => {
                    let top = 100 - standing.display_percent.min(100);
                    println!("🏆 Top {}% of listeners: {}", top, standing.tier);
                    if let Some(artist) = standing.favorite_artist {
                        println!("   Favorite artist: {}", artist);
                    }
                }
                (None, Some(message)) => anyhow::bail!(message),
                (None, None) => println!("No data available"),
            }
        }
        Commands::Trends {
            user_id,
            start,
            end,
        } => {
            let report = load_promoter_report(&client, user_id, DateRange::new(start, end)).await?;
            println!("📈 Improving events:");
            for event in &report.trends.improving {
                println!(
                    "   {} ({:.2} engagement/view)",
                    event.record.title, event.engagement_rate
                );
            }
            println!("📉 Declining events:");
            for event in &report.trends.declining {
                println!(
                    "   {} ({:.2} engagement/view)",
                    event.record.title, event.engagement_rate
                );
            }
            println!("\n⭐ Top events:");
            for event in &report.top_events {
                println!("   {:<32} engagement {:.0}", event.title, event.engagement);
            }
            println!("💾 Best save rate:");
            for event in &report.best_save_rate {
                println!("   {:<32} {:.1}%", event.title, event.save_rate);
            }
        }
        Commands::Targeting { user_id } => {
            let report = load_promoter_report(&client, user_id, DateRange::default()).await?;
            print_groups("Countries", &report.targeting.countries);
            print_groups("Genres", &report.targeting.genres);
            print_groups("Artists", &report.targeting.artists);
        }
        Commands::Heatmap { user_id, days } => {
            let grid = client.listening_heatmap(user_id, days).await?;
            println!("🗓️  Listening heatmap, last {} days ({} plays)", days, grid.total());
            if grid.total() == 0 {
                println!("No listening data for this period");
                return Ok(());
            }
            let mut busiest = (0, 0, 0);
            for day in 0..HEATMAP_DAYS {
                for hour in 0..HEATMAP_HOURS {
                    let value = grid.get(day, hour);
                    if value > busiest.2 {
                        busiest = (day, hour, value);
                    }
                }
            }
            println!(
                "   Busiest slot: {}, {}:00 with {} plays",
                rewrapped::render::heatmap::DAY_LABELS[busiest.0],
                busiest.1,
                busiest.2
            );
        }
        Commands::Timeseries {
            user_id,
            event_id,
            days,
        } => {
            let report = load_time_series(&client, user_id, event_id, days).await?;
            println!(
                "Views this week: {:?} {}% (total views {}, saves {})",
                report.trend.direction,
                report.trend.percentage,
                report.summary.total_views,
                report.summary.total_saves
            );
            println!("Peak days:");
            for day in &report.peak_days {
                println!("   {}  {} views", day.date, day.views);
            }
        }
        Commands::Export {
            user_id,
            event_id,
            format,
            days,
            output,
        } => {
            let payload = match event_id {
                Some(id) => client.export_event_analytics(id, user_id, format, days).await?,
                None => client.export_promoter_analytics(user_id, format).await?,
            };
            let body = match payload {
                ExportPayload::Csv(text) => text,
                ExportPayload::Json(value) => serde_json::to_string_pretty(&value)?,
            };
            match output {
                Some(path) => {
                    std::fs::write(&path, body)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote export to {}", path.display());
                }
                None => println!("{}", body),
            }
        }
        Commands::Login { email, password } => {
            let session = client
                .login(&Credentials {
                    email: &email,
                    password: &password,
                })
                .await?;
            let greeting = session
                .message
                .map(|m| format!(": {}", m))
                .unwrap_or_default();
            println!("✅ Logged in{}", greeting);
        }
        Commands::Logout => {
            client.logout().await?;
            println!("👋 Logged out");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();
    rewrapped::metrics::describe_metrics();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;
    let client = build_client(&config)?;
    info!(base_url = client.base_url(), "Starting rewrapped");

    if let Err(e) = run(cli.command, client).await {
        error!("Command failed: {:#}", e);
        return Err(e);
    }
    Ok(())
}
