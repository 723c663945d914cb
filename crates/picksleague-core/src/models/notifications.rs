use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "lowercase")]
pub enum DevicePlatform {
    Ios,
    Android,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    #[serde(default = "enabled")]
    pub pick_reminders: bool,
    #[serde(default = "enabled")]
    pub race_results: bool,
    #[serde(default = "enabled")]
    pub chat_messages: bool,
    #[serde(default)]
    pub league_activity: bool,
}

fn enabled() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            pick_reminders: true,
            race_results: true,
            chat_messages: true,
            league_activity: false,
        }
    }
}
