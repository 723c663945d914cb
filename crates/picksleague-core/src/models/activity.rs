use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    pub id: i64,
    /// e.g. "pick_submitted", "member_joined", "results_posted"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub username: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Offset pagination for feed endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub fn first(limit: u32) -> Self {
        Self { limit, offset: 0 }
    }

    pub fn next(self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset.saturating_add(self.limit),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(20)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_page_advances_by_limit() {
        let page = Page::first(20).next().next();
        assert_eq!(page, Page { limit: 20, offset: 40 });
    }

    #[test]
    fn test_next_page_saturates() {
        let page = Page {
            limit: 50,
            offset: u32::MAX - 10,
        };
        assert_eq!(page.next().offset, u32::MAX);
    }
}
