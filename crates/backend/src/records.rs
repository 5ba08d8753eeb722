//! Game records: the [`RecordStore`] seam and its PostgREST implementation.

use async_trait::async_trait;
use playora_core::catalog::CatalogQuery;
use playora_core::game::{Game, NewGame};
use playora_core::status::GameStatus;
use reqwest::Method;

use crate::error::BackendError;
use crate::http::RestClient;

/// Sort applied to every listing.
const ORDER_NEWEST_FIRST: &str = "created_at.desc";

/// Read and write access to game records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Public catalog read: approved records matching `query`, newest first.
    async fn list_catalog(&self, query: &CatalogQuery) -> Result<Vec<Game>, BackendError>;

    /// Every record regardless of status, newest first. Requires a reviewer
    /// session.
    async fn list_all(&self, access_token: &str) -> Result<Vec<Game>, BackendError>;

    /// One record by identifier. An identifier the backend cannot interpret
    /// is reported as absent.
    async fn get(&self, id: &str) -> Result<Option<Game>, BackendError>;

    /// Insert a new record and return it as stored.
    async fn insert(&self, game: &NewGame) -> Result<Game, BackendError>;

    /// Set the status of one record. Returns [`BackendError::NotFound`] when
    /// the update matched no row, either because no record has `id` or
    /// because a row policy filtered it out.
    async fn update_status(
        &self,
        id: &str,
        status: GameStatus,
        access_token: &str,
    ) -> Result<Game, BackendError>;

    /// Cheap reachability probe.
    async fn health_check(&self) -> Result<(), BackendError>;
}

// ---------------------------------------------------------------------------
// Query rendering
// ---------------------------------------------------------------------------

/// PostgREST query parameters for a catalog read.
pub fn catalog_params(query: &CatalogQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("select", "*".to_string()),
        ("status", format!("eq.{}", query.status().as_str())),
    ];
    if let Some(category) = query.category() {
        params.push(("category", format!("ilike.{}", escape_like(category))));
    }
    if let Some(text) = query.text() {
        params.push(("title", format!("ilike.*{}*", escape_like(text))));
    }
    params.push(("order", ORDER_NEWEST_FIRST.to_string()));
    params
}

/// Escape LIKE metacharacters so `value` matches literally.
///
/// PostgREST turns `*` into `%` unconditionally, so a literal asterisk is
/// widened to the single-character wildcard `_`. Callers re-check results
/// with [`CatalogQuery::matches`].
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '*' => escaped.push('_'),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Decode a list of rows, skipping (and logging) any that fail validation.
pub fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<Game> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<Game>(row.clone()) {
            Ok(game) => Some(game),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    id = ?row.get("id"),
                    "Skipping malformed game record"
                );
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// SupabaseRecords
// ---------------------------------------------------------------------------

/// [`RecordStore`] over the PostgREST endpoint of a Supabase project.
pub struct SupabaseRecords {
    rest: RestClient,
    path: String,
}

impl SupabaseRecords {
    pub(crate) fn new(rest: RestClient, table: &str) -> Self {
        Self {
            rest,
            path: format!("/rest/v1/{table}"),
        }
    }

    async fn fetch_rows(
        &self,
        params: &[(&str, String)],
        access_token: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, BackendError> {
        let response = self
            .rest
            .request(Method::GET, &self.path, access_token)
            .query(params)
            .send()
            .await?;
        RestClient::parse_response(response).await
    }
}

/// Take the single row a `return=representation` write sends back.
fn single_row(rows: Vec<serde_json::Value>) -> Result<Game, BackendError> {
    let row = rows.into_iter().next().ok_or(BackendError::NotFound)?;
    serde_json::from_value(row).map_err(|e| BackendError::Decode(e.to_string()))
}

#[async_trait]
impl RecordStore for SupabaseRecords {
    async fn list_catalog(&self, query: &CatalogQuery) -> Result<Vec<Game>, BackendError> {
        let rows = self.fetch_rows(&catalog_params(query), None).await?;
        Ok(decode_rows(rows))
    }

    async fn list_all(&self, access_token: &str) -> Result<Vec<Game>, BackendError> {
        let params = [
            ("select", "*".to_string()),
            ("order", ORDER_NEWEST_FIRST.to_string()),
        ];
        let rows = self.fetch_rows(&params, Some(access_token)).await?;
        Ok(decode_rows(rows))
    }

    async fn get(&self, id: &str) -> Result<Option<Game>, BackendError> {
        let params = [("select", "*".to_string()), ("id", format!("eq.{id}"))];
        let rows = match self.fetch_rows(&params, None).await {
            Ok(rows) => rows,
            // 400 is 22P02 when `id` is not a valid uuid. 401 and 403 still
            // surface.
            Err(BackendError::Api { status, message }) if matches!(status, 400 | 404) => {
                tracing::debug!(id, status, message = %message, "Record lookup refused");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        Ok(decode_rows(rows).into_iter().next())
    }

    async fn insert(&self, game: &NewGame) -> Result<Game, BackendError> {
        let response = self
            .rest
            .request(Method::POST, &self.path, None)
            .header("Prefer", "return=representation")
            .json(game)
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = RestClient::parse_response(response).await?;
        single_row(rows).map_err(|e| match e {
            BackendError::NotFound => {
                BackendError::Decode("insert returned no representation".into())
            }
            other => other,
        })
    }

    async fn update_status(
        &self,
        id: &str,
        status: GameStatus,
        access_token: &str,
    ) -> Result<Game, BackendError> {
        let response = self
            .rest
            .request(Method::PATCH, &self.path, Some(access_token))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({ "status": status }))
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = RestClient::parse_response(response).await?;
        single_row(rows)
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        let params = [("select", "id".to_string()), ("limit", "1".to_string())];
        self.fetch_rows(&params, None).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn unfiltered_catalog_still_requires_approved() {
        let params = catalog_params(&CatalogQuery::default());
        assert_eq!(param(&params, "status"), Some("eq.approved"));
        assert_eq!(param(&params, "order"), Some("created_at.desc"));
        assert_eq!(param(&params, "category"), None);
        assert_eq!(param(&params, "title"), None);
    }

    #[test]
    fn category_renders_case_insensitive_equality() {
        let params = catalog_params(&CatalogQuery::new(Some("Puzzle"), None));
        assert_eq!(param(&params, "category"), Some("ilike.puzzle"));
    }

    #[test]
    fn all_sentinel_renders_no_category_filter() {
        let params = catalog_params(&CatalogQuery::new(Some("all"), None));
        assert_eq!(param(&params, "category"), None);
    }

    #[test]
    fn search_renders_substring_match() {
        let params = catalog_params(&CatalogQuery::new(None, Some("Super Dash")));
        assert_eq!(param(&params, "title"), Some("ilike.*super dash*"));
    }

    #[test]
    fn like_metacharacters_are_escaped() {
        assert_eq!(escape_like("100%_done"), "100\\%\\_done");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("star*"), "star_");
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let good = serde_json::json!({
            "id": "a",
            "title": "Galaxy Blaster",
            "description": "",
            "category": "arcade",
            "thumbnail_url": null,
            "game_url": "https://example.com/g",
            "developer_email": null,
            "status": "approved",
            "created_at": "2026-02-01T00:00:00Z"
        });
        let mut bad = good.clone();
        bad["category"] = serde_json::json!("shooter");

        let games = decode_rows(vec![good, bad]);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, "a");
    }
}
