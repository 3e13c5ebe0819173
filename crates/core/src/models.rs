use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three independently searched record sets. Results are grouped
/// by collection, never merged into a single ranked list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Jobs,
    Items,
    Posts,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Collection::Jobs => "jobs",
            Collection::Items => "marketplace_items",
            Collection::Posts => "forum_posts",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.table())
    }
}

/// Fetch privilege for one request, resolved once by the caller and passed
/// down to the store. `Elevated` bypasses row-level security, `CallerScoped`
/// carries the caller's bearer token, `Anonymous` uses only the publishable
/// key and may see row-filtered results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessMode {
    Elevated,
    CallerScoped { bearer: String },
    Anonymous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayType {
    Hourly,
    Fixed,
    Negotiable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub pay_rate: Option<f64>,
    pub pay_type: Option<PayType>,
    pub category: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceItem {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub condition: Option<String>,
    pub category: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumPost {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub category: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResultCounts {
    pub jobs: usize,
    pub items: usize,
    pub posts: usize,
}

impl ResultCounts {
    pub fn total(&self) -> usize {
        self.jobs + self.items + self.posts
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    pub used_service_key: bool,
    pub using_user_token: bool,
    pub counts: ResultCounts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// The assembled reply: three independently ranked lists in fixed order plus
/// request metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub jobs: Vec<Job>,
    pub items: Vec<MarketplaceItem>,
    pub posts: Vec<ForumPost>,
    pub meta: SearchMeta,
}
