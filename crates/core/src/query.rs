use crate::error::SearchError;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Contains,
    StartsWith,
}

/// A single substring or prefix match expression derived from the query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern {
    pub text: String,
    pub kind: MatchKind,
}

/// The normalized form of one free-text query: the lowercased full phrase,
/// its deduplicated tokens, and the match patterns used both for store-side
/// filtering and for in-process scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub full: String,
    pub tokens: Vec<String>,
    pub patterns: Vec<Pattern>,
}

impl NormalizedQuery {
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        let full = trimmed.to_lowercase();
        let tokens = tokenize(&full);

        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(tokens.len() * 2 + 1);
        let mut push = |patterns: &mut Vec<Pattern>, pattern: Pattern| {
            if seen.insert(pattern.clone()) {
                patterns.push(pattern);
            }
        };

        push(
            &mut patterns,
            Pattern {
                text: full.clone(),
                kind: MatchKind::Contains,
            },
        );
        for token in &tokens {
            push(
                &mut patterns,
                Pattern {
                    text: token.clone(),
                    kind: MatchKind::Contains,
                },
            );
            push(
                &mut patterns,
                Pattern {
                    text: token.clone(),
                    kind: MatchKind::StartsWith,
                },
            );
        }

        Ok(Self {
            full,
            tokens,
            patterns,
        })
    }
}

/// Lowercase, split on whitespace, drop single-character fragments, and
/// deduplicate while keeping first-seen order.
pub fn tokenize(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();

    for part in query.to_lowercase().split_whitespace() {
        if part.chars().count() < 2 {
            continue;
        }
        if seen.insert(part.to_string()) {
            tokens.push(part.to_string());
        }
    }

    tokens
}
