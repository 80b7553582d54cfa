//! Askama templates for the dashboard.

use askama::Template;
use chrono::{DateTime, Utc};

use crate::scheduler::TaskSnapshot;
use crate::store::StoreStats;

/// Dashboard page: task controls and dataset freshness.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub tasks: Vec<TaskView>,
    pub datasets: Vec<DatasetView>,
}

/// Task view model for the dashboard table.
#[derive(Debug, Clone)]
pub struct TaskView {
    pub id: String,
    pub interval: String,
    pub running: bool,
    pub enabled: bool,
}

impl TaskView {
    /// Create from a scheduler snapshot.
    pub fn from_snapshot(task: &TaskSnapshot) -> Self {
        Self {
            id: task.id.clone(),
            interval: format_interval(task.interval.as_secs()),
            running: task.running,
            enabled: task.enabled,
        }
    }

    /// One-word execution state for the status cell.
    pub fn state_label(&self) -> &'static str {
        if self.running { "running" } else { "idle" }
    }

    /// One-word driver state.
    pub fn cadence_label(&self) -> &'static str {
        if self.enabled { "enabled" } else { "disabled" }
    }
}

/// Dataset view model for the freshness cards.
#[derive(Debug, Clone)]
pub struct DatasetView {
    pub name: &'static str,
    pub count: usize,
    pub refreshed: String,
}

impl DatasetView {
    /// One card per stored dataset.
    pub fn from_stats(stats: &StoreStats) -> Vec<Self> {
        vec![
            Self::card("Stops", stats.stop_count, stats.stops_refreshed_at),
            Self::card("Services", stats.service_count, stats.services_refreshed_at),
            Self::card("Routes", stats.route_count, stats.routes_refreshed_at),
        ]
    }

    fn card(name: &'static str, count: usize, refreshed: Option<DateTime<Utc>>) -> Self {
        Self {
            name,
            count,
            refreshed: refreshed
                .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "never".to_string()),
        }
    }
}

/// Render seconds as a compact interval: whole hours as "24h", whole
/// minutes as "15m", anything else as seconds.
fn format_interval(secs: u64) -> String {
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}
