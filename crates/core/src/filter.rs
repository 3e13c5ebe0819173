use crate::query::{NormalizedQuery, Pattern};

/// Rows requested per collection at fetch time. Larger than the final result
/// cap so the ranker has material to reorder.
pub const MAX_FETCH: usize = 40;

pub const JOB_FIELDS: &[&str] = &["title", "description", "location", "category"];
pub const ITEM_FIELDS: &[&str] = &["title", "description", "category", "condition"];
pub const POST_FIELDS: &[&str] = &["title", "content", "category"];

/// One field/pattern pair; a row matches the clause when the field value
/// matches the pattern case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    pub field: &'static str,
    pub pattern: Pattern,
}

/// An OR of clauses over one collection, together with the fetch limit. The
/// store adapter compiles this into its native query syntax.
#[derive(Debug, Clone)]
pub struct CollectionFilter {
    pub clauses: Vec<FilterClause>,
    pub limit: usize,
}

impl CollectionFilter {
    /// Cross product of the query's patterns and the collection's searchable
    /// fields, OR semantics.
    pub fn build(query: &NormalizedQuery, fields: &[&'static str]) -> Self {
        let mut clauses = Vec::with_capacity(query.patterns.len() * fields.len());
        for pattern in &query.patterns {
            for field in fields {
                clauses.push(FilterClause {
                    field,
                    pattern: pattern.clone(),
                });
            }
        }

        Self {
            clauses,
            limit: MAX_FETCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::MatchKind;

    #[test]
    fn filter_covers_every_field_pattern_pair() {
        let query = NormalizedQuery::parse("math tutor").expect("query should parse");
        let filter = CollectionFilter::build(&query, POST_FIELDS);

        // 5 patterns (phrase + 2 per token) x 3 fields.
        assert_eq!(filter.clauses.len(), 15);
        assert_eq!(filter.limit, MAX_FETCH);

        assert!(filter.clauses.contains(&FilterClause {
            field: "content",
            pattern: Pattern {
                text: "math tutor".to_string(),
                kind: MatchKind::Contains
            },
        }));
        assert!(filter.clauses.contains(&FilterClause {
            field: "title",
            pattern: Pattern {
                text: "tutor".to_string(),
                kind: MatchKind::StartsWith
            },
        }));
    }

    #[test]
    fn fetch_limit_never_exceeds_the_overfetch_cap() {
        let query = NormalizedQuery::parse("anything at all here").expect("query should parse");
        for fields in [JOB_FIELDS, ITEM_FIELDS, POST_FIELDS] {
            assert_eq!(CollectionFilter::build(&query, fields).limit, 40);
        }
    }
}
