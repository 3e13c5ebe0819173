use crate::error::SearchError;
use crate::filter::{CollectionFilter, ITEM_FIELDS, JOB_FIELDS, POST_FIELDS};
use crate::models::{AccessMode, Collection, ResultCounts, SearchMeta, SearchResponse};
use crate::query::NormalizedQuery;
use crate::ranking::rank;
use crate::traits::EntityStore;
use chrono::Utc;
use std::future::Future;

/// Records returned per collection after re-ranking.
pub const MAX_RESULTS: usize = 10;

const RLS_WARNING: &str =
    "No results returned; if your tables use RLS, add SUPABASE_SERVICE_ROLE_KEY to enable search.";

/// Runs one federated search: normalize the query, fetch the three
/// collections concurrently, rank each independently, and assemble the
/// grouped response. Stateless between requests.
pub struct SearchService<S: EntityStore> {
    store: S,
}

impl<S: EntityStore + Send + Sync> SearchService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All-or-nothing: if any collection fetch fails the whole request fails,
    /// so a partial result set is never mistaken for "few matches".
    pub async fn search(
        &self,
        raw_query: &str,
        access: &AccessMode,
    ) -> Result<SearchResponse, SearchError> {
        let query = NormalizedQuery::parse(raw_query)?;

        let jobs_filter = CollectionFilter::build(&query, JOB_FIELDS);
        let items_filter = CollectionFilter::build(&query, ITEM_FIELDS);
        let posts_filter = CollectionFilter::build(&query, POST_FIELDS);

        let (jobs, items, posts) = tokio::try_join!(
            tag(self.store.fetch_jobs(&jobs_filter, access), Collection::Jobs),
            tag(
                self.store.fetch_items(&items_filter, access),
                Collection::Items
            ),
            tag(
                self.store.fetch_posts(&posts_filter, access),
                Collection::Posts
            ),
        )?;

        let now = Utc::now();
        let jobs = rank(jobs, &query, now, MAX_RESULTS);
        let items = rank(items, &query, now, MAX_RESULTS);
        let posts = rank(posts, &query, now, MAX_RESULTS);

        let counts = ResultCounts {
            jobs: jobs.len(),
            items: items.len(),
            posts: posts.len(),
        };

        // An empty result under anonymous access is ambiguous: it may be a
        // true miss or row-level security filtering everything out.
        let warning = (*access == AccessMode::Anonymous && counts.total() == 0)
            .then(|| RLS_WARNING.to_string());

        Ok(SearchResponse {
            jobs,
            items,
            posts,
            meta: SearchMeta {
                used_service_key: *access == AccessMode::Elevated,
                using_user_token: matches!(access, AccessMode::CallerScoped { .. }),
                counts,
                warning,
            },
        })
    }
}

async fn tag<T>(
    fetch: impl Future<Output = Result<T, SearchError>>,
    collection: Collection,
) -> Result<T, SearchError> {
    fetch.await.map_err(|error| error.for_collection(collection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForumPost, Job, MarketplaceItem};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration};

    #[derive(Default)]
    struct FakeStore {
        jobs: Vec<Job>,
        items: Vec<MarketplaceItem>,
        posts: Vec<ForumPost>,
        fail: Option<Collection>,
    }

    impl FakeStore {
        fn check(&self, collection: Collection) -> Result<(), SearchError> {
            if self.fail == Some(collection) {
                return Err(SearchError::Backend {
                    collection,
                    details: "store unavailable".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EntityStore for FakeStore {
        async fn fetch_jobs(
            &self,
            _filter: &CollectionFilter,
            _access: &AccessMode,
        ) -> Result<Vec<Job>, SearchError> {
            self.check(Collection::Jobs)?;
            Ok(self.jobs.clone())
        }

        async fn fetch_items(
            &self,
            _filter: &CollectionFilter,
            _access: &AccessMode,
        ) -> Result<Vec<MarketplaceItem>, SearchError> {
            self.check(Collection::Items)?;
            Ok(self.items.clone())
        }

        async fn fetch_posts(
            &self,
            _filter: &CollectionFilter,
            _access: &AccessMode,
        ) -> Result<Vec<ForumPost>, SearchError> {
            self.check(Collection::Posts)?;
            Ok(self.posts.clone())
        }
    }

    fn job(id: &str, title: &str, description: &str, stamp: DateTime<Utc>) -> Job {
        Job {
            id: id.to_string(),
            title: title.to_string(),
            description: Some(description.to_string()),
            location: None,
            pay_rate: Some(15.0),
            pay_type: None,
            category: None,
            updated_at: Some(stamp),
            created_at: Some(stamp),
        }
    }

    fn item(id: &str, title: &str, description: &str, stamp: DateTime<Utc>) -> MarketplaceItem {
        MarketplaceItem {
            id: id.to_string(),
            title: title.to_string(),
            description: Some(description.to_string()),
            price: Some(100.0),
            condition: Some("used".to_string()),
            category: None,
            updated_at: Some(stamp),
            created_at: Some(stamp),
        }
    }

    #[tokio::test]
    async fn blank_query_is_rejected_before_any_fetch() {
        let service = SearchService::new(FakeStore::default());

        let result = service.search("   ", &AccessMode::Anonymous).await;
        assert!(matches!(result, Err(SearchError::InvalidQuery)));
    }

    #[tokio::test]
    async fn one_failing_collection_fails_the_whole_request() {
        let stamp = Utc::now();
        let store = FakeStore {
            jobs: vec![job("j1", "math tutor", "", stamp)],
            items: vec![item("i1", "math textbook", "", stamp)],
            fail: Some(Collection::Posts),
            ..FakeStore::default()
        };
        let service = SearchService::new(store);

        let result = service.search("math", &AccessMode::Elevated).await;
        match result {
            Err(SearchError::Backend { collection, .. }) => {
                assert_eq!(collection, Collection::Posts)
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn each_collection_is_capped_at_ten_results() {
        let stamp = Utc::now();
        let store = FakeStore {
            jobs: (0..25)
                .map(|index| job(&format!("j{index}"), "barista shift", "", stamp))
                .collect(),
            ..FakeStore::default()
        };
        let service = SearchService::new(store);

        let response = service
            .search("barista", &AccessMode::Elevated)
            .await
            .expect("search should succeed");

        assert_eq!(response.jobs.len(), 10);
        assert_eq!(response.meta.counts.jobs, 10);
        assert_eq!(response.meta.counts.items, 0);
        assert_eq!(response.meta.counts.posts, 0);
    }

    #[tokio::test]
    async fn anonymous_empty_result_carries_the_rls_warning() {
        let service = SearchService::new(FakeStore::default());

        let response = service
            .search("macbook", &AccessMode::Anonymous)
            .await
            .expect("search should succeed");

        assert_eq!(response.meta.counts.total(), 0);
        assert!(!response.meta.used_service_key);
        assert!(!response.meta.using_user_token);
        assert!(response.meta.warning.is_some());
    }

    #[tokio::test]
    async fn elevated_empty_result_has_no_warning() {
        let service = SearchService::new(FakeStore::default());

        let response = service
            .search("macbook", &AccessMode::Elevated)
            .await
            .expect("search should succeed");

        assert_eq!(response.meta.counts.total(), 0);
        assert!(response.meta.used_service_key);
        assert!(response.meta.warning.is_none());
    }

    #[tokio::test]
    async fn caller_scoped_empty_result_has_no_warning() {
        let service = SearchService::new(FakeStore::default());

        let access = AccessMode::CallerScoped {
            bearer: "user-jwt".to_string(),
        };
        let response = service
            .search("macbook", &access)
            .await
            .expect("search should succeed");

        assert!(!response.meta.used_service_key);
        assert!(response.meta.using_user_token);
        assert!(response.meta.warning.is_none());
    }

    #[tokio::test]
    async fn title_match_outranks_description_match_within_a_collection() {
        let stamp = Utc::now() - Duration::days(5);
        let store = FakeStore {
            items: vec![
                item("desc-hit", "laptop stand", "fits any macbook model", stamp),
                item("title-hit", "MacBook Air M1 8GB/256GB", "lightly used", stamp),
            ],
            ..FakeStore::default()
        };
        let service = SearchService::new(store);

        let response = service
            .search("macbook", &AccessMode::Elevated)
            .await
            .expect("search should succeed");

        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].id, "title-hit");
        assert_eq!(response.items[1].id, "desc-hit");
    }

    #[tokio::test]
    async fn description_only_match_still_surfaces_the_job() {
        let stamp = Utc::now();
        let store = FakeStore {
            jobs: vec![job(
                "j1",
                "Math Tutor Needed",
                "help with Calculus II homework",
                stamp,
            )],
            ..FakeStore::default()
        };
        let service = SearchService::new(store);

        let response = service
            .search("calculus", &AccessMode::Elevated)
            .await
            .expect("search should succeed");

        assert_eq!(response.jobs.len(), 1);
        assert_eq!(response.jobs[0].id, "j1");
        assert_eq!(response.meta.counts.jobs, 1);
    }
}
