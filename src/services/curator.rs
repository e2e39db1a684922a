// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resource curator: search, a saved-resource library and search history.

use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::api::CuratorQuery;
use super::{require, ServiceContext};
use crate::error::{AppError, Result};
use crate::models::flex;
use crate::models::{Resource, SearchFilters, SearchRecord};
use crate::storage::{keys, Inserted, UserCollection};

/// Searches kept in the history.
pub const SEARCH_HISTORY_LIMIT: usize = 10;

/// Resource entry as the curator agent sends it. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct RawResource {
    #[serde(default, deserialize_with = "flex::opt_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "flex::opt_string")]
    resource_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    tags: Option<Vec<String>>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    relevance_score: Option<f64>,
    #[serde(default)]
    recommendation: Option<String>,
    #[serde(default)]
    why_recommended: Option<String>,
}

fn parse_entries(items: &[Value]) -> Vec<RawResource> {
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<RawResource>(item.clone()) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed resource entry");
                None
            }
        })
        .collect()
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Normalize a curator `result` into resources.
///
/// Accepts `curated_resources[]`, `resources[]`, or a plain string (turned
/// into a single AI-generated entry). Anything else yields no resources.
pub fn parse_resources(result: &Value, query: &str) -> Vec<Resource> {
    if let Some(items) = result.get("curated_resources").and_then(Value::as_array) {
        return parse_entries(items)
            .into_iter()
            .map(|raw| Resource {
                id: raw.id.unwrap_or_else(fresh_id),
                title: raw.title.unwrap_or_default(),
                description: raw.description,
                url: raw.url,
                kind: raw.kind,
                tags: raw.tags.unwrap_or_else(|| vec![query.to_string()]),
                source: Some(raw.source.unwrap_or_else(|| "Web".to_string())),
                rating: Some(raw.rating.unwrap_or(4.0)),
                difficulty: raw.difficulty,
                relevance_score: raw.relevance_score,
                recommendation: raw.why_recommended,
                saved_at: None,
            })
            .collect();
    }

    if let Value::String(text) = result {
        return vec![Resource {
            id: fresh_id(),
            title: format!("AI Generated Resources for {}", query),
            description: Some(text.clone()),
            url: Some("#".to_string()),
            kind: Some("ai-generated".to_string()),
            tags: vec![query.to_string()],
            source: Some("AI Assistant".to_string()),
            rating: Some(5.0),
            difficulty: None,
            relevance_score: None,
            recommendation: None,
            saved_at: None,
        }];
    }

    if let Some(items) = result.get("resources").and_then(Value::as_array) {
        return parse_entries(items)
            .into_iter()
            .map(|raw| Resource {
                id: raw.id.or(raw.resource_id).unwrap_or_else(fresh_id),
                title: raw.title.unwrap_or_default(),
                description: raw.description,
                url: raw.url,
                kind: raw.kind,
                tags: raw.tags.unwrap_or_default(),
                source: Some(raw.source.unwrap_or_else(|| "Web".to_string())),
                rating: raw.rating,
                difficulty: raw.difficulty,
                relevance_score: raw.relevance_score,
                recommendation: raw.recommendation,
                saved_at: None,
            })
            .collect();
    }

    Vec::new()
}

pub struct CuratorService {
    ctx: ServiceContext,
    saved: UserCollection<Resource>,
    history: UserCollection<SearchRecord>,
}

impl CuratorService {
    pub fn new(ctx: ServiceContext) -> Self {
        let saved = ctx.collection(keys::SAVED_RESOURCES);
        let history = ctx.collection(keys::RESOURCE_SEARCH_HISTORY);
        Self { ctx, saved, history }
    }

    /// Search for resources and record the search.
    pub async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<Resource>> {
        require(query, "Search query")?;
        let query = query.trim();

        let resource_type = Some(filters.resource_type.clone())
            .filter(|t| !t.is_empty() && t != "all");
        let request = CuratorQuery {
            query: Some(query.to_string()),
            subject: Some(filters.subject.clone()),
            resource_type,
            ..Default::default()
        };

        let envelope = match self.ctx.api.search_resources(&request).await {
            Ok(envelope) => envelope,
            Err(e) => {
                let message = match &e {
                    AppError::Api(detail) | AppError::RateLimited(detail) => {
                        format!("Search failed: {}", detail)
                    }
                    _ => "Failed to search resources".to_string(),
                };
                tracing::warn!(error = %e, "Resource search failed");
                self.ctx.notifier.error(&message);
                return Err(e);
            }
        };

        let resources = match (envelope.success, envelope.result.as_ref()) {
            (true, Some(result)) => parse_resources(result, query),
            _ => Vec::new(),
        };

        if resources.is_empty() {
            self.ctx.notifier.info("No resources found for your search");
        } else {
            self.ctx
                .notifier
                .success(&format!("Found {} resources", resources.len()));
        }

        self.record_search(query, filters, resources.len())?;
        Ok(resources)
    }

    fn record_search(&self, query: &str, filters: &SearchFilters, results_count: usize) -> Result<()> {
        let mut history = self.history.list()?;
        history.insert(
            0,
            SearchRecord {
                query: query.to_string(),
                filters: filters.clone(),
                timestamp: Utc::now(),
                results_count,
            },
        );
        history.truncate(SEARCH_HISTORY_LIMIT);
        self.history.replace(&history)
    }

    pub fn saved(&self) -> Result<Vec<Resource>> {
        self.saved.list()
    }

    /// Add a resource to the library. A resource with the same id is not
    /// added twice.
    pub fn save(&self, resource: &Resource) -> Result<Inserted> {
        let mut resource = resource.clone();
        resource.saved_at = Some(Utc::now());

        let inserted = self.saved.insert_unique(resource)?;
        match inserted {
            Inserted::Added => self.ctx.notifier.success("Resource saved successfully!"),
            Inserted::Duplicate => self.ctx.notifier.info("Resource already saved"),
        }
        Ok(inserted)
    }

    pub fn remove(&self, resource_id: &str) -> Result<bool> {
        let removed = self.saved.delete(resource_id)?;
        if removed {
            self.ctx.notifier.success("Resource removed");
        }
        Ok(removed)
    }

    /// Recent searches, newest first.
    pub fn search_history(&self) -> Result<Vec<SearchRecord>> {
        self.history.list()
    }
}
