use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One driver pick in a pick slot (`position`) for a race week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Pick {
    #[serde(default)]
    pub id: Option<i64>,
    pub position: u32,
    pub driver_id: i64,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct WeekPicks {
    pub league_id: i64,
    pub week: u32,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub picks: Vec<Pick>,
}
