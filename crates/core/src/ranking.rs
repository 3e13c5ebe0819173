use crate::models::{ForumPost, Job, MarketplaceItem};
use crate::query::NormalizedQuery;
use chrono::{DateTime, Utc};

const PRIORITY_WEIGHT: f64 = 2.5;
const SECONDARY_WEIGHT: f64 = 1.0;

const FULL_QUERY_BONUS: f64 = 4.0;
const PREFIX_BONUS: f64 = 2.5;
const SUBSTRING_BONUS: f64 = 1.5;

const RECENCY_PEAK: f64 = 1.6;
const RECENCY_FLOOR: f64 = 0.6;
const RECENCY_DECAY_DAYS: f64 = 60.0;

/// A record the relevance ranker can score: a recency timestamp plus its
/// searchable field values split by scoring weight.
pub trait Rankable {
    fn recency(&self) -> Option<DateTime<Utc>>;
    fn priority_fields(&self) -> Vec<&str>;
    fn secondary_fields(&self) -> Vec<&str>;
}

impl Rankable for Job {
    fn recency(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    fn priority_fields(&self) -> Vec<&str> {
        [
            Some(self.title.as_str()),
            self.location.as_deref(),
            self.category.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn secondary_fields(&self) -> Vec<&str> {
        self.description.as_deref().into_iter().collect()
    }
}

impl Rankable for MarketplaceItem {
    fn recency(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    fn priority_fields(&self) -> Vec<&str> {
        [Some(self.title.as_str()), self.category.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn secondary_fields(&self) -> Vec<&str> {
        [self.description.as_deref(), self.condition.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl Rankable for ForumPost {
    fn recency(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.created_at)
    }

    fn priority_fields(&self) -> Vec<&str> {
        [Some(self.title.as_str()), self.category.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn secondary_fields(&self) -> Vec<&str> {
        self.content.as_deref().into_iter().collect()
    }
}

/// Request-scoped pairing of a record with its computed score; discarded once
/// the ranked list is assembled.
#[derive(Debug, Clone)]
pub struct Scored<T> {
    pub record: T,
    pub score: f64,
}

/// Recency boost plus weighted field matches. The boost decays linearly from
/// 1.6 at zero age to a floor of 0.6 after 60 days; records without any
/// timestamp get no boost at all. Each field contributes weight x 4 when it
/// contains the full query, and per token weight x 2.5 for a prefix match or
/// weight x 1.5 for a plain substring match, prefix taking precedence.
pub fn relevance_score<R: Rankable>(
    record: &R,
    query: &NormalizedQuery,
    now: DateTime<Utc>,
) -> f64 {
    let mut score = 0.0;

    if let Some(stamp) = record.recency() {
        let age_days = (now - stamp).num_milliseconds() as f64 / 86_400_000.0;
        score += (RECENCY_PEAK - age_days / RECENCY_DECAY_DAYS).max(RECENCY_FLOOR);
    }

    score += field_matches(&record.priority_fields(), query, PRIORITY_WEIGHT);
    score += field_matches(&record.secondary_fields(), query, SECONDARY_WEIGHT);

    score
}

fn field_matches(fields: &[&str], query: &NormalizedQuery, weight: f64) -> f64 {
    let mut score = 0.0;

    for field in fields {
        let value = field.to_lowercase();
        if value.is_empty() {
            continue;
        }

        if value.contains(&query.full) {
            score += weight * FULL_QUERY_BONUS;
        }

        for token in &query.tokens {
            if value.starts_with(token.as_str()) {
                score += weight * PREFIX_BONUS;
            } else if value.contains(token.as_str()) {
                score += weight * SUBSTRING_BONUS;
            }
        }
    }

    score
}

/// Score every record, sort descending, and keep the top `cap`. The sort is
/// stable, so records with equal scores keep the store's recency order.
pub fn rank<R: Rankable>(
    records: Vec<R>,
    query: &NormalizedQuery,
    now: DateTime<Utc>,
    cap: usize,
) -> Vec<R> {
    let mut scored: Vec<Scored<R>> = records
        .into_iter()
        .map(|record| {
            let score = relevance_score(&record, query, now);
            Scored { record, score }
        })
        .collect();

    scored.sort_by(|left, right| right.score.total_cmp(&left.score));
    scored.truncate(cap);

    scored.into_iter().map(|scored| scored.record).collect()
}
