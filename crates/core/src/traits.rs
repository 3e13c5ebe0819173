use crate::error::SearchError;
use crate::filter::CollectionFilter;
use crate::models::{AccessMode, ForumPost, Job, MarketplaceItem};
use async_trait::async_trait;

/// Read-only access to the three searched collections. Each fetch applies the
/// given OR filter, orders by `updated_at` descending with `created_at` as
/// tie-break, and returns at most `filter.limit` rows.
#[async_trait]
pub trait EntityStore {
    async fn fetch_jobs(
        &self,
        filter: &CollectionFilter,
        access: &AccessMode,
    ) -> Result<Vec<Job>, SearchError>;

    async fn fetch_items(
        &self,
        filter: &CollectionFilter,
        access: &AccessMode,
    ) -> Result<Vec<MarketplaceItem>, SearchError>;

    async fn fetch_posts(
        &self,
        filter: &CollectionFilter,
        access: &AccessMode,
    ) -> Result<Vec<ForumPost>, SearchError>;
}
