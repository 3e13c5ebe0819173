use crate::error::SearchError;
use crate::filter::CollectionFilter;
use crate::models::{AccessMode, Collection, ForumPost, Job, MarketplaceItem};
use crate::query::MatchKind;
use crate::traits::EntityStore;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use url::Url;

const JOB_SELECT: &str =
    "id,title,description,location,pay_rate,pay_type,category,updated_at,created_at";
const ITEM_SELECT: &str = "id,title,description,price,condition,category,updated_at,created_at";
const POST_SELECT: &str = "id,title,content,category,updated_at,created_at";

/// Entity store backed by a Supabase/PostgREST endpoint. Holds the project's
/// service-role and publishable keys; which one a request uses is decided by
/// the `AccessMode` passed to each fetch.
pub struct PostgrestStore {
    client: Arc<Client>,
    endpoint: Url,
    service_key: Option<String>,
    anon_key: String,
}

impl PostgrestStore {
    pub fn new(
        endpoint: &str,
        service_key: Option<String>,
        anon_key: impl Into<String>,
    ) -> Result<Self, SearchError> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self {
            client: Arc::new(Client::new()),
            endpoint,
            service_key,
            anon_key: anon_key.into(),
        })
    }

    pub fn has_service_key(&self) -> bool {
        self.service_key.is_some()
    }

    fn authorize(
        &self,
        request: RequestBuilder,
        collection: Collection,
        access: &AccessMode,
    ) -> Result<RequestBuilder, SearchError> {
        match access {
            AccessMode::Elevated => {
                let key = self.service_key.as_deref().ok_or_else(|| {
                    SearchError::Backend {
                        collection,
                        details: "elevated access requested without a service key".to_string(),
                    }
                })?;
                Ok(request.header("apikey", key).bearer_auth(key))
            }
            AccessMode::CallerScoped { bearer } => {
                Ok(request.header("apikey", &self.anon_key).bearer_auth(bearer))
            }
            AccessMode::Anonymous => Ok(request
                .header("apikey", &self.anon_key)
                .bearer_auth(&self.anon_key)),
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        collection: Collection,
        select: &str,
        filter: &CollectionFilter,
        access: &AccessMode,
    ) -> Result<Vec<T>, SearchError> {
        let table = self
            .endpoint
            .join(&format!("rest/v1/{}", collection.table()))?;

        let request = self.client.get(table).query(&[
            ("select", select),
            ("or", compile_or_filter(filter).as_str()),
            ("order", "updated_at.desc,created_at.desc"),
            ("limit", filter.limit.to_string().as_str()),
        ]);
        let request = self.authorize(request, collection, access)?;

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SearchError::Backend {
                collection,
                details: response.status().to_string(),
            });
        }

        Ok(response.json::<Vec<T>>().await?)
    }
}

#[async_trait]
impl EntityStore for PostgrestStore {
    async fn fetch_jobs(
        &self,
        filter: &CollectionFilter,
        access: &AccessMode,
    ) -> Result<Vec<Job>, SearchError> {
        self.fetch(Collection::Jobs, JOB_SELECT, filter, access)
            .await
    }

    async fn fetch_items(
        &self,
        filter: &CollectionFilter,
        access: &AccessMode,
    ) -> Result<Vec<MarketplaceItem>, SearchError> {
        self.fetch(Collection::Items, ITEM_SELECT, filter, access)
            .await
    }

    async fn fetch_posts(
        &self,
        filter: &CollectionFilter,
        access: &AccessMode,
    ) -> Result<Vec<ForumPost>, SearchError> {
        self.fetch(Collection::Posts, POST_SELECT, filter, access)
            .await
    }
}

/// PostgREST disjunction syntax: `(field.ilike.*pat*,field.ilike.pat*,...)`.
/// `ilike` makes the match case-insensitive and `*` is the wildcard.
fn compile_or_filter(filter: &CollectionFilter) -> String {
    let clauses = filter
        .clauses
        .iter()
        .map(|clause| {
            let pattern = match clause.pattern.kind {
                MatchKind::Contains => format!("*{}*", clause.pattern.text),
                MatchKind::StartsWith => format!("{}*", clause.pattern.text),
            };
            format!("{}.ilike.{}", clause.field, pattern)
        })
        .collect::<Vec<_>>()
        .join(",");

    format!("({clauses})")
}
