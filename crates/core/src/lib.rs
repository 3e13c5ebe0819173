pub mod error;
pub mod filter;
pub mod models;
pub mod orchestrator;
pub mod query;
pub mod ranking;
pub mod stores;
pub mod traits;

pub use error::SearchError;
pub use filter::{CollectionFilter, FilterClause, ITEM_FIELDS, JOB_FIELDS, MAX_FETCH, POST_FIELDS};
pub use models::{
    AccessMode, Collection, ForumPost, Job, MarketplaceItem, PayType, ResultCounts, SearchMeta,
    SearchResponse,
};
pub use orchestrator::{SearchService, MAX_RESULTS};
pub use query::{tokenize, MatchKind, NormalizedQuery, Pattern};
pub use ranking::{rank, relevance_score, Rankable, Scored};
pub use stores::PostgrestStore;
pub use traits::EntityStore;
