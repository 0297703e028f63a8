//! Scheduled keyword analysis
//!
//! Runs the expansion engine over the disaster seed keywords once shortly
//! after startup and then every day at a fixed local time. Results are only
//! logged.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime, NaiveTime};
use tracing::{error, info};

use radar_core::{Depth, ExpansionResult, RadarError};

use crate::expansion::{ExpansionEngine, ExpansionError};

/// Seed keywords for the scheduled run
pub const DISASTER_SEED_KEYWORDS: &[&str] = &["지진", "태풍", "홍수", "산불", "폭염"];

/// Configuration for AnalysisScheduler
#[derive(Debug, Clone)]
pub struct AnalysisScheduleConfig {
    /// Local time of the daily run
    pub daily_at: NaiveTime,
    /// Delay before the startup run
    pub startup_delay: Duration,
    /// Expansion depth for scheduled runs
    pub depth: Depth,
    /// Seed keywords for scheduled runs
    pub seed_keywords: Vec<String>,
}

impl Default for AnalysisScheduleConfig {
    fn default() -> Self {
        Self {
            daily_at: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            startup_delay: Duration::from_secs(10),
            depth: Depth::default(),
            seed_keywords: DISASTER_SEED_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl AnalysisScheduleConfig {
    /// Load schedule overrides from environment variables
    ///
    /// Reads:
    /// - ANALYSIS_SCHEDULE_TIME: daily run time as `HH:MM` (local time)
    /// - ANALYSIS_STARTUP_DELAY_SECS: delay before the startup run
    pub fn from_env() -> Result<Self, RadarError> {
        let mut config = Self::default();

        if let Ok(time) = env::var("ANALYSIS_SCHEDULE_TIME") {
            config.daily_at = NaiveTime::parse_from_str(time.trim(), "%H:%M").map_err(|e| {
                RadarError::config(format!("ANALYSIS_SCHEDULE_TIME '{}': {}", time, e))
            })?;
        }

        if let Ok(delay) = env::var("ANALYSIS_STARTUP_DELAY_SECS") {
            let secs: u64 = delay.trim().parse().map_err(|e| {
                RadarError::config(format!("ANALYSIS_STARTUP_DELAY_SECS '{}': {}", delay, e))
            })?;
            config.startup_delay = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Time from `now` until the next occurrence of `at` (strictly in the future)
pub fn duration_until_next(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let mut next = now.date().and_time(at);
    if next <= now {
        next += chrono::Duration::days(1);
    }
    (next - now).to_std().unwrap_or_default()
}

/// Background trigger for scheduled expansion runs
pub struct AnalysisScheduler {
    engine: Arc<ExpansionEngine>,
    config: AnalysisScheduleConfig,
}

impl AnalysisScheduler {
    pub fn new(engine: Arc<ExpansionEngine>, config: AnalysisScheduleConfig) -> Self {
        Self { engine, config }
    }

    /// Spawn the startup run and the daily loop
    pub fn start(self: Arc<Self>) {
        info!(
            "Starting analysis scheduler: daily at {}, startup run in {:?}, depth {}",
            self.config.daily_at, self.config.startup_delay, self.config.depth
        );

        let self_startup = Arc::clone(&self);
        tokio::spawn(async move {
            tokio::time::sleep(self_startup.config.startup_delay).await;
            info!("Running startup keyword analysis");
            self_startup.run_logged().await;
        });

        tokio::spawn(async move {
            self.daily_loop().await;
        });
    }

    async fn daily_loop(&self) {
        loop {
            let wait = duration_until_next(Local::now().naive_local(), self.config.daily_at);
            info!("Next scheduled keyword analysis in {:?}", wait);
            tokio::time::sleep(wait).await;

            info!("Running scheduled keyword analysis");
            self.run_logged().await;
        }
    }

    /// Run one scheduled expansion
    pub async fn run_once(&self) -> Result<ExpansionResult, ExpansionError> {
        self.engine
            .expand(self.config.seed_keywords.clone(), self.config.depth)
            .await
    }

    async fn run_logged(&self) {
        match self.run_once().await {
            Ok(result) => {
                for (depth, keywords) in result.history.iter() {
                    info!(depth, ?keywords, "Scheduled analysis depth result");
                }
                info!(
                    final_keywords = ?result.final_keywords,
                    termination = %result.termination,
                    "Scheduled analysis complete"
                );
            }
            Err(e) => {
                error!("Scheduled analysis failed: {}", e);
            }
        }
    }
}
