use crate::config::toml_config::SearchConfig;
use crate::core::parser::parse_feed;
use crate::domain::model::{provided, FeedRecord, SearchCriteria, SearchResult};
use crate::domain::ports::FeedSource;
use crate::utils::error::{AppError, Result};
use std::sync::Arc;

pub const MISSING_CRITERIA_MESSAGE: &str =
    "At least one search parameter (nama, nim, or ymd) is required";

/// Fetch → parse → filter over the external feed.
///
/// Every call fetches the whole feed again; nothing is cached between calls.
/// Validation always happens before the fetch.
#[derive(Clone)]
pub struct FeedSearchEngine {
    source: Arc<dyn FeedSource>,
    fields: SearchConfig,
}

impl FeedSearchEngine {
    pub fn new(source: Arc<dyn FeedSource>, fields: SearchConfig) -> Self {
        Self { source, fields }
    }

    pub fn fields(&self) -> &SearchConfig {
        &self.fields
    }

    async fn load_records(&self) -> Result<Vec<FeedRecord>> {
        let raw = self.source.fetch().await?;
        Ok(parse_feed(&raw))
    }

    /// Records whose `field` equals `value` exactly.
    pub async fn search_exact(&self, field: &str, value: &str) -> Result<SearchResult> {
        let records = self.load_records().await?;
        let records = filter_exact(records, field, value);

        tracing::debug!("Exact search {}={:?} matched {} records", field, value, records.len());
        Ok(SearchResult { records })
    }

    /// Exact search where the target comes from a request parameter that must be present.
    pub async fn search_by_param(&self, field: &str, value: Option<&str>) -> Result<SearchResult> {
        let value = value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AppError::validation("The value parameter is required"))?;

        if field.is_empty() {
            return Err(AppError::validation("The field parameter must not be empty"));
        }

        self.search_exact(field, value).await
    }

    /// Substring search combined with AND: a record must contain every provided criterion.
    pub async fn search_criteria(&self, criteria: &SearchCriteria) -> Result<SearchResult> {
        if criteria.is_empty() {
            return Err(AppError::validation(MISSING_CRITERIA_MESSAGE));
        }

        let records = self.load_records().await?;
        let records = filter_all_substrings(records, &self.criteria_fields(criteria));

        tracing::debug!("Criteria search {:?} matched {} records", criteria, records.len());
        Ok(SearchResult { records })
    }

    fn criteria_fields<'a>(&'a self, criteria: &'a SearchCriteria) -> Vec<(&'a str, &'a str)> {
        [
            (self.fields.name_field.as_str(), &criteria.nama),
            (self.fields.nim_field.as_str(), &criteria.nim),
            (self.fields.ymd_field.as_str(), &criteria.ymd),
        ]
        .into_iter()
        .filter_map(|(field, value)| provided(value).map(|v| (field, v)))
        .collect()
    }
}

pub fn filter_exact(records: Vec<FeedRecord>, field: &str, value: &str) -> Vec<FeedRecord> {
    records
        .into_iter()
        .filter(|record| record.get(field) == Some(value))
        .collect()
}

/// Case-sensitive containment; a null or missing field never matches.
pub fn contains(record: &FeedRecord, field: &str, needle: &str) -> bool {
    !needle.is_empty() && record.get(field).is_some_and(|v| v.contains(needle))
}

/// Applies each `(field, needle)` filter in turn, narrowing the previous result.
pub fn filter_all_substrings(
    mut records: Vec<FeedRecord>,
    filters: &[(&str, &str)],
) -> Vec<FeedRecord> {
    for (field, needle) in filters {
        records.retain(|record| contains(record, field, needle));
    }
    records
}
