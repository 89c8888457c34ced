use std::time::Duration;

use log::{debug, warn};
use repl_domain::{Row, TableDescriptor, FieldDescriptor, ReplicationError, Value};
use serde_json::json;

use crate::wire::{
    DatasetQuery, DatasetResponse, InnerQuery, MetadataResponse, PageSpec, SessionRequest, SessionResponse,
    SESSION_HEADER,
};

/// One page of rows returned by [`UpstreamClient::fetch_page`], already
/// converted into domain [`Row`]s.
#[derive(Debug, Clone)]
pub struct Page {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Thin, owned wrapper over a `reqwest::blocking::Client` and the
/// current session token. Constructed explicitly by the Executor and
/// passed around — no process-wide singleton, per `spec.md` §9.
pub struct UpstreamClient {
    http: reqwest::blocking::Client,
    base_url: String,
    database_id: i64,
    token: Option<String>,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>, database_id: i64, connect_timeout_ms: u64) -> Result<Self, ReplicationError> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_millis(connect_timeout_ms))
            .timeout(Duration::from_millis(connect_timeout_ms.saturating_mul(4)))
            .build()
            .map_err(|e| ReplicationError::connect_failed(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, base_url: base_url.into(), database_id, token: None })
    }

    fn session_token(&self) -> Result<&str, ReplicationError> {
        self.token
            .as_deref()
            .ok_or_else(|| ReplicationError::auth_failed("no active session; call authenticate() first"))
    }

    /// `POST {base}/api/session` — exchanges credentials for an opaque
    /// token. Fails `auth-failed` on any non-success response.
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<(), ReplicationError> {
        let url = format!("{}/api/session", self.base_url);
        let resp = self
            .http
            .post(&url)
            .json(&SessionRequest { username, password })
            .send()
            .map_err(|e| ReplicationError::auth_failed(format!("session request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(ReplicationError::auth_failed(format!("upstream rejected credentials: HTTP {}", resp.status())));
        }

        let body: SessionResponse = resp
            .json()
            .map_err(|e| ReplicationError::auth_failed(format!("malformed session response: {e}")))?;
        self.token = Some(body.id);
        debug!("upstream session established");
        Ok(())
    }

    /// `GET {base}/api/database/{dbId}/metadata` — every table visible to
    /// the session in the configured database.
    pub fn list_tables(&self) -> Result<Vec<TableDescriptor>, ReplicationError> {
        let token = self.session_token()?;
        let url = format!("{}/api/database/{}/metadata", self.base_url, self.database_id);
        let resp = self
            .http
            .get(&url)
            .header(SESSION_HEADER, token)
            .send()
            .map_err(|e| ReplicationError::extract_failed(format!("metadata request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(ReplicationError::extract_failed(format!("metadata request returned HTTP {}", resp.status())));
        }

        let body: MetadataResponse = resp
            .json()
            .map_err(|e| ReplicationError::extract_failed(format!("malformed metadata response: {e}")))?;

        Ok(body
            .tables
            .into_iter()
            .map(|t| {
                TableDescriptor::new(
                    t.id,
                    t.name,
                    t.fields
                        .into_iter()
                        .map(|f| FieldDescriptor { name: f.name, base_type: f.base_type, semantic_type: f.semantic_type })
                        .collect(),
                )
            })
            .collect())
    }

    /// `POST {base}/api/dataset` with a `count` aggregation. Returns 0 on
    /// any recoverable error but logs the condition — §4.2 explicitly
    /// forbids this from being fatal.
    pub fn count_rows(&self, table_id: i64) -> i64 {
        let token = match self.session_token() {
            Ok(t) => t.to_string(),
            Err(_) => {
                warn!("count_rows({table_id}): no session token, returning 0");
                return 0;
            }
        };

        let query = DatasetQuery {
            database: self.database_id,
            query_type: "query",
            query: InnerQuery { source_table: table_id, limit: None, page: None, aggregation: Some(&[["count"]]) },
        };

        let url = format!("{}/api/dataset", self.base_url);
        let result = self.http.post(&url).header(SESSION_HEADER, token).json(&query).send();

        let resp = match result {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!("count_rows({table_id}): upstream returned HTTP {}", r.status());
                return 0;
            }
            Err(e) => {
                warn!("count_rows({table_id}): request failed: {e}");
                return 0;
            }
        };

        match resp.json::<DatasetResponse>() {
            Ok(body) => body
                .data
                .rows
                .first()
                .and_then(|row| row.first())
                .and_then(|v| v.as_i64())
                .unwrap_or(0),
            Err(e) => {
                warn!("count_rows({table_id}): malformed response: {e}");
                0
            }
        }
    }

    /// `POST {base}/api/dataset` with a page spec. The server is assumed
    /// stable-ordered across pages within a run; the engine never supplies
    /// its own `ORDER BY` (§4.2).
    ///
    /// `offset` must be a multiple of `limit` — the Executor's fetch loop
    /// only ever requests sequential full pages, so `page = offset/limit + 1`
    /// round-trips exactly.
    pub fn fetch_page(&self, table_id: i64, offset: i64, limit: i64) -> Result<Page, ReplicationError> {
        let token = self.session_token()?;
        let page_number = offset / limit.max(1) + 1;

        let query = DatasetQuery {
            database: self.database_id,
            query_type: "query",
            query: InnerQuery {
                source_table: table_id,
                limit: Some(limit),
                page: Some(PageSpec { page: page_number, items: limit }),
                aggregation: None,
            },
        };

        let url = format!("{}/api/dataset", self.base_url);
        let resp = self
            .http
            .post(&url)
            .header(SESSION_HEADER, token)
            .json(&query)
            .send()
            .map_err(|e| ReplicationError::extract_failed(format!("dataset request failed for table {table_id}: {e}")))?;

        if !resp.status().is_success() {
            return Err(ReplicationError::extract_failed(format!(
                "dataset request for table {table_id} returned HTTP {}",
                resp.status()
            )));
        }

        let body: DatasetResponse = resp
            .json()
            .map_err(|e| ReplicationError::extract_failed(format!("malformed dataset response for table {table_id}: {e}")))?;

        let columns: Vec<String> = body.data.cols.into_iter().map(|c| c.name).collect();
        let rows = body
            .data
            .rows
            .into_iter()
            .map(|cells| row_from_json_cells(&columns, cells))
            .collect();

        debug!("fetch_page(table={table_id}, offset={offset}, limit={limit}) -> {} rows", rows.len());
        Ok(Page { columns, rows })
    }

    /// `DELETE {base}/api/session` — best-effort; errors are swallowed.
    pub fn logout(&mut self) {
        if let Some(token) = self.token.take() {
            let url = format!("{}/api/session", self.base_url);
            if let Err(e) = self.http.delete(&url).header(SESSION_HEADER, token).send() {
                warn!("logout failed (ignored): {e}");
            }
        }
    }
}

/// Converts one raw dataset row (a `Vec<serde_json::Value>` aligned
/// positionally with `columns`) into a domain [`Row`]. This is plain JSON
/// ingestion, not type coercion — `repl-transform` still has the only
/// authority over target-typed values (enums, coerced integers/booleans/
/// temporals); this step merely gives each cell its natural tag.
fn row_from_json_cells(columns: &[String], cells: Vec<serde_json::Value>) -> Row {
    let mut row = Row::with_capacity(columns.len());
    for (name, cell) in columns.iter().zip(cells.into_iter()) {
        let value = match cell {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::Text(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::Text(s),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Value::Json(json!(other).to_string())
            }
        };
        row.insert(name.clone(), value);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_cells_map_to_tagged_values() {
        let columns = vec!["id".to_string(), "active".to_string(), "tags".to_string(), "name".to_string()];
        let cells = vec![
            serde_json::json!(1),
            serde_json::json!(true),
            serde_json::json!(["a", "b"]),
            serde_json::Value::Null,
        ];
        let row = row_from_json_cells(&columns, cells);
        assert_eq!(row.get("id"), Some(&Value::Int(1)));
        assert_eq!(row.get("active"), Some(&Value::Bool(true)));
        assert_eq!(row.get("tags"), Some(&Value::Json("[\"a\",\"b\"]".to_string())));
        assert_eq!(row.get("name"), Some(&Value::Null));
    }
}
