//! Payload models for the picks league API.
//!
//! The client never interprets these beyond deserializing them; fields are
//! lenient so the server can add or omit data without breaking callers.
//!
//! - `User`, `AuthPayload`: account and credential payloads
//! - `League`, `LeagueMember`, `Standing`: league membership and tables
//! - `Pick`, `WeekPicks`: per-week driver picks
//! - `Driver`, `Race`, `RaceResult`: the racing calendar
//! - `ActivityItem`, `ChatMessage`: feeds
//! - `NotificationPreferences`: push settings

pub mod activity;
pub mod league;
pub mod notifications;
pub mod picks;
pub mod racing;
pub mod user;

pub use activity::{ActivityItem, ChatMessage, Page};
pub use league::{League, LeagueMember, NewLeague, Standing};
pub use notifications::{DevicePlatform, NotificationPreferences};
pub use picks::{Pick, WeekPicks};
pub use racing::{Driver, Race, RaceResult};
pub use user::{AuthPayload, ProfileUpdate, User};
