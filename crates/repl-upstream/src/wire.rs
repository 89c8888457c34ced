//! JSON wire shapes for the Upstream API (`spec.md` §6). Field names match
//! the API verbatim; this module has no opinions about target semantics.

use serde::{Deserialize, Serialize};

pub const SESSION_HEADER: &str = "X-Metabase-Session";

#[derive(Debug, Serialize)]
pub struct SessionRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct MetadataResponse {
    pub tables: Vec<WireTable>,
}

#[derive(Debug, Deserialize)]
pub struct WireTable {
    pub id: i64,
    pub name: String,
    pub fields: Vec<WireField>,
}

#[derive(Debug, Deserialize)]
pub struct WireField {
    pub name: String,
    pub base_type: String,
    pub semantic_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DatasetQuery<'a> {
    pub database: i64,
    #[serde(rename = "type")]
    pub query_type: &'a str,
    pub query: InnerQuery<'a>,
}

#[derive(Debug, Serialize)]
pub struct InnerQuery<'a> {
    #[serde(rename = "source-table")]
    pub source_table: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<&'a [[&'a str; 1]]>,
}

#[derive(Debug, Serialize)]
pub struct PageSpec {
    pub page: i64,
    pub items: i64,
}

#[derive(Debug, Deserialize)]
pub struct DatasetResponse {
    pub data: DatasetData,
}

#[derive(Debug, Deserialize)]
pub struct DatasetData {
    pub rows: Vec<Vec<serde_json::Value>>,
    pub cols: Vec<WireCol>,
}

#[derive(Debug, Deserialize)]
pub struct WireCol {
    pub name: String,
}
