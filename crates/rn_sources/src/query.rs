use rn_core::{normalize_domain, ProviderQuery, SearchTerms};
use url::Url;

/// How a multi-word key phrase is written into the boolean query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhrasePolicy {
    /// `(w1 AND w2)`: every word must appear somewhere in the article
    AllWords,
    /// `"w1 w2"`: the words must appear together
    Exact,
}

/// Provider specific names of the three parameters every search carries.
#[derive(Debug, Clone, Copy)]
pub struct ParamNames {
    pub query: &'static str,
    pub sources: &'static str,
    pub exclude: &'static str,
}

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoint: Url,
    names: ParamNames,
    policy: PhrasePolicy,
}

impl QueryBuilder {
    pub fn new(endpoint: Url, names: ParamNames, policy: PhrasePolicy) -> Self {
        Self {
            endpoint,
            names,
            policy,
        }
    }

    /// Query, source allow-list and exclusion for `terms`. The allow-list
    /// parameter is left out when nothing remains after exclusion.
    pub fn build(&self, terms: &SearchTerms) -> ProviderQuery {
        let mut query = ProviderQuery::new(self.endpoint.clone());
        query.push(self.names.query, keyword_query(&terms.keywords, self.policy));

        let sources = allowed_sources(&terms.candidate_domains, &terms.exclude_domain);
        if !sources.is_empty() {
            query.push(self.names.sources, sources.join(","));
        }

        let exclude = normalize_domain(&terms.exclude_domain);
        if !exclude.is_empty() {
            query.push(self.names.exclude, exclude);
        }
        query
    }
}

/// OR of the distinct phrases, each written according to `policy`.
pub fn keyword_query(keywords: &[String], policy: PhrasePolicy) -> String {
    let mut seen: Vec<String> = Vec::new();
    let mut terms: Vec<String> = Vec::new();

    for keyword in keywords {
        let words: Vec<&str> = keyword
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| matches!(c, '"' | '(' | ')')))
            .filter(|word| !word.is_empty())
            .collect();
        if words.is_empty() {
            continue;
        }

        let key = words.join(" ").to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);

        terms.push(match policy {
            PhrasePolicy::AllWords => format!("({})", words.join(" AND ")),
            PhrasePolicy::Exact => format!("\"{}\"", words.join(" ")),
        });
    }

    terms.join(" OR ")
}

/// Candidates minus the excluded domain, normalized and deduplicated.
pub fn allowed_sources(candidates: &[String], exclude: &str) -> Vec<String> {
    let exclude = normalize_domain(exclude);
    let mut allowed: Vec<String> = Vec::new();
    for domain in candidates.iter().map(|d| normalize_domain(d)) {
        if !domain.is_empty() && domain != exclude && !allowed.contains(&domain) {
            allowed.push(domain);
        }
    }
    allowed
}
