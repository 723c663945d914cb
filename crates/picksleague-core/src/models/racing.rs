use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub car_number: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Race {
    pub id: i64,
    pub week: u32,
    pub name: String,
    #[serde(default)]
    pub track: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    pub driver_id: i64,
    pub finish_position: u32,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub points: Option<f64>,
}
