//! RCSB PDB search and structure retrieval.

use super::error::RemoteError;
use crate::core::models::structure::{StructureDocument, StructureFormat};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

pub const DEFAULT_SEARCH_URL: &str = "https://search.rcsb.org/rcsbsearch/v2/query";
pub const DEFAULT_ENTRY_URL: &str = "https://data.rcsb.org/rest/v1/core/entry";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://files.rcsb.org/download";
pub const DEFAULT_MAX_RESULTS: usize = 10;

const ORGANISM_ATTRIBUTE: &str = "rcsb_entity_source_organism.taxonomy_lineage.name";
const NO_DESCRIPTION: &str = "No description";
const UNKNOWN_TITLE: &str = "Unknown title";

/// A search hit: entry identifier and its human-readable title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub pdb_id: String,
    pub title: String,
}

/// Base URLs of the three RCSB services used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcsbEndpoints {
    pub search_url: String,
    pub entry_url: String,
    pub download_url: String,
}

impl Default for RcsbEndpoints {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            entry_url: DEFAULT_ENTRY_URL.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result_set: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    identifier: String,
}

/// Client for searching and fetching entries from RCSB.
///
/// Non-success HTTP statuses are not errors: a search yields no hits and a
/// fetch yields `None`. Only transport failures surface as [`RemoteError`].
#[derive(Debug, Clone)]
pub struct RcsbClient {
    client: Client,
    endpoints: RcsbEndpoints,
}

impl RcsbClient {
    pub fn new() -> Result<Self, RemoteError> {
        Self::with_endpoints(RcsbEndpoints::default())
    }

    pub fn with_endpoints(endpoints: RcsbEndpoints) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(concat!("pathohost/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(RemoteError::ClientBuild)?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &RcsbEndpoints {
        &self.endpoints
    }

    /// Searches entries whose source organism lineage exactly matches `organism`,
    /// then resolves each hit's title.
    pub async fn search_by_organism(
        &self,
        organism: &str,
        max_results: usize,
    ) -> Result<Vec<EntrySummary>, RemoteError> {
        let organism = organism.trim();
        if organism.is_empty() || max_results == 0 {
            return Ok(Vec::new());
        }

        info!("Searching RCSB for organism '{}'", organism);
        let query = build_organism_query(organism, max_results);
        let response = self
            .client
            .post(&self.endpoints.search_url)
            .json(&query)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!("Search returned status {}; treating as no hits.", status);
            return Ok(Vec::new());
        }
        let body = response.text().await?;
        let ids = parse_search_ids(&body);
        debug!("Search returned {} identifier(s).", ids.len());

        let mut entries = Vec::with_capacity(ids.len());
        for pdb_id in ids {
            let title = self.entry_title(&pdb_id).await;
            entries.push(EntrySummary { pdb_id, title });
        }
        Ok(entries)
    }

    /// Title of an entry; falls back to a placeholder when the lookup fails.
    pub async fn entry_title(&self, pdb_id: &str) -> String {
        let url = format!("{}/{}", self.endpoints.entry_url, pdb_id);
        let response = match self.client.get(&url).send().await {
            Ok(r) if r.status() == StatusCode::OK => r,
            Ok(r) => {
                debug!("Metadata lookup for {} returned {}", pdb_id, r.status());
                return UNKNOWN_TITLE.to_string();
            }
            Err(e) => {
                warn!("Metadata lookup for {} failed: {}", pdb_id, e);
                return UNKNOWN_TITLE.to_string();
            }
        };
        match response.text().await {
            Ok(body) => parse_entry_title(&body),
            Err(e) => {
                warn!("Failed to read metadata for {}: {}", pdb_id, e);
                UNKNOWN_TITLE.to_string()
            }
        }
    }

    /// Downloads the coordinate file of `pdb_id` in PDB format.
    pub async fn fetch_structure(
        &self,
        pdb_id: &str,
    ) -> Result<Option<StructureDocument>, RemoteError> {
        let pdb_id = normalize_identifier(pdb_id)?;
        let url = format!("{}/{}.pdb", self.endpoints.download_url, pdb_id);

        info!("Fetching PDB {} from RCSB", pdb_id);
        let response = self.client.get(&url).send().await?;
        if response.status() != StatusCode::OK {
            debug!("Download of {} returned status {}", pdb_id, response.status());
            return Ok(None);
        }
        let text = response.text().await?;
        Ok(Some(StructureDocument::new(pdb_id, StructureFormat::Pdb, text)))
    }
}

/// Upper-cases an entry identifier and rejects characters that cannot appear in one.
pub fn normalize_identifier(pdb_id: &str) -> Result<String, RemoteError> {
    let trimmed = pdb_id.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(RemoteError::InvalidIdentifier(pdb_id.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Builds the search-service request body for an exact organism-lineage match.
pub fn build_organism_query(organism: &str, max_results: usize) -> Value {
    json!({
        "query": {
            "type": "terminal",
            "service": "text",
            "parameters": {
                "attribute": ORGANISM_ATTRIBUTE,
                "operator": "exact_match",
                "value": organism
            }
        },
        "return_type": "entry",
        "request_options": {
            "paginate": {
                "start": 0,
                "rows": max_results
            },
            "scoring_strategy": "combined"
        }
    })
}

/// Identifiers of a search response, in ranked order. Unreadable bodies yield none.
pub fn parse_search_ids(body: &str) -> Vec<String> {
    match serde_json::from_str::<SearchResponse>(body) {
        Ok(response) => response
            .result_set
            .into_iter()
            .map(|hit| hit.identifier)
            .collect(),
        Err(e) => {
            warn!("Unreadable search response: {}", e);
            Vec::new()
        }
    }
}

/// `struct.title` of an entry metadata document.
pub fn parse_entry_title(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return UNKNOWN_TITLE.to_string();
    };
    value
        .get("struct")
        .and_then(|s| s.get("title"))
        .and_then(Value::as_str)
        .unwrap_or(NO_DESCRIPTION)
        .to_string()
}
