use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const API_KEY_HEADER: &str = "x-typesense-api-key";

/// Denormalized, per-tenant-partitioned projection of a candidate profile
/// carrying only the fields lexical retrieval needs. Keyed by the profile id;
/// eventually consistent with the profile store via upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndexDocument {
	pub id: String,
	pub source_doc_id: String,
	pub job_title: String,
	pub industry: String,
	pub location_city: String,
	pub location_country: String,
	pub skills: Vec<String>,
	pub languages: Vec<String>,
	pub degree: String,
	pub major: String,
	pub level: String,
	pub gpa: f32,
	pub years_of_experience: i32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UpsertReport {
	pub indexed: usize,
	pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct SearchHit {
	pub score: f32,
	pub document: SearchIndexDocument,
}

#[derive(Debug, Deserialize)]
struct ImportLine {
	success: bool,
	#[serde(default)]
	error: Option<String>,
	#[serde(default)]
	document: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
	#[serde(default)]
	hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
	#[serde(default)]
	text_match: Option<f64>,
	document: SearchIndexDocument,
}

/// Explicitly constructed, injected handle on the external search index. One
/// collection per tenant, named "{prefix}_{tenant}"; cross-tenant isolation is
/// enforced at the collection-naming boundary, never by a runtime filter.
pub struct SearchIndex {
	client: Client,
	base_url: String,
	api_key: String,
	collection_prefix: String,
}
impl SearchIndex {
	pub fn new(cfg: &vitae_config::SearchIndex) -> Result<Self> {
		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;

		Ok(Self {
			client,
			base_url: cfg.url.clone(),
			api_key: cfg.api_key.clone(),
			collection_prefix: cfg.collection_prefix.clone(),
		})
	}

	pub fn collection_name(&self, tenant_id: &str) -> String {
		format!("{}_{tenant_id}", self.collection_prefix)
	}

	/// Idempotent: retrieves collection metadata and creates the collection
	/// with the fixed schema when absent. A concurrent creation racing this
	/// call reports "already exists" and is treated as success.
	pub async fn ensure_collection(&self, tenant_id: &str) -> Result<()> {
		let name = self.collection_name(tenant_id);
		let url = format!("{}/collections/{name}", self.base_url);
		let res = self
			.client
			.get(&url)
			.header(API_KEY_HEADER, &self.api_key)
			.send()
			.await?;

		match res.status() {
			status if status.is_success() => return Ok(()),
			StatusCode::NOT_FOUND => {},
			status => {
				return Err(Error::Index(format!(
					"Collection metadata fetch for {name} returned {status}."
				)));
			},
		}

		let create_url = format!("{}/collections", self.base_url);
		let res = self
			.client
			.post(&create_url)
			.header(API_KEY_HEADER, &self.api_key)
			.json(&collection_schema(&name))
			.send()
			.await?;

		match res.status() {
			status if status.is_success() => Ok(()),
			// Another request created the collection first.
			StatusCode::CONFLICT => Ok(()),
			status => {
				Err(Error::Index(format!("Collection create for {name} returned {status}.")))
			},
		}
	}

	/// Bulk upsert, idempotent by document id. Individual document failures are
	/// logged and counted, never fatal to the batch.
	pub async fn upsert(
		&self,
		tenant_id: &str,
		documents: &[SearchIndexDocument],
	) -> Result<UpsertReport> {
		if documents.is_empty() {
			return Ok(UpsertReport::default());
		}

		let name = self.collection_name(tenant_id);
		let url = format!("{}/collections/{name}/documents/import?action=upsert", self.base_url);
		let mut body = String::new();

		for document in documents {
			let line = serde_json::to_string(document)
				.map_err(|err| Error::Index(format!("Failed to encode index document: {err}")))?;

			body.push_str(&line);
			body.push('\n');
		}

		let res = self
			.client
			.post(&url)
			.header(API_KEY_HEADER, &self.api_key)
			.body(body)
			.send()
			.await?;

		if !res.status().is_success() {
			return Err(Error::Index(format!(
				"Bulk import into {name} returned {}.",
				res.status()
			)));
		}

		let raw = res.text().await?;
		let mut report = UpsertReport::default();

		for line in raw.lines().filter(|line| !line.trim().is_empty()) {
			match serde_json::from_str::<ImportLine>(line) {
				Ok(result) if result.success => report.indexed += 1,
				Ok(result) => {
					report.failed += 1;
					tracing::warn!(
						collection = %name,
						error = result.error.as_deref().unwrap_or("unknown"),
						document = result.document.as_deref().unwrap_or(""),
						"Index upsert skipped a document."
					);
				},
				Err(err) => {
					report.failed += 1;
					tracing::warn!(
						collection = %name,
						error = %err,
						"Index upsert returned an unreadable result line."
					);
				},
			}
		}

		Ok(report)
	}

	/// Free-text search with per-field boosts; returns one relevance score per
	/// hit plus the matching document.
	pub async fn search(
		&self,
		tenant_id: &str,
		query: &str,
		query_by: &str,
		query_by_weights: &str,
		per_page: u32,
	) -> Result<Vec<SearchHit>> {
		let name = self.collection_name(tenant_id);
		let url = format!("{}/collections/{name}/documents/search", self.base_url);
		let per_page = per_page.to_string();
		let params = search_params(query, query_by, query_by_weights, &per_page);
		let res = self
			.client
			.get(&url)
			.header(API_KEY_HEADER, &self.api_key)
			.query(&params)
			.send()
			.await?;

		if !res.status().is_success() {
			return Err(Error::Index(format!("Search in {name} returned {}.", res.status())));
		}

		let parsed: SearchResponse = res.json().await?;

		Ok(parsed
			.hits
			.into_iter()
			.map(|hit| SearchHit {
				score: hit.text_match.unwrap_or(0.0) as f32,
				document: hit.document,
			})
			.collect())
	}

	/// Removes a tenant's collection. An absent collection is treated as
	/// success.
	pub async fn delete_collection(&self, tenant_id: &str) -> Result<()> {
		let name = self.collection_name(tenant_id);
		let url = format!("{}/collections/{name}", self.base_url);
		let res = self
			.client
			.delete(&url)
			.header(API_KEY_HEADER, &self.api_key)
			.send()
			.await?;

		match res.status() {
			status if status.is_success() => Ok(()),
			StatusCode::NOT_FOUND => Ok(()),
			status => Err(Error::Index(format!("Collection delete for {name} returned {status}."))),
		}
	}
}

/// Query tokens combine with OR so a single matching field keeps recall high;
/// typo tolerance stays at two edits.
fn search_params<'a>(
	query: &'a str,
	query_by: &'a str,
	query_by_weights: &'a str,
	per_page: &'a str,
) -> [(&'static str, &'a str); 7] {
	[
		("q", query),
		("query_by", query_by),
		("query_by_weights", query_by_weights),
		("num_typos", "2"),
		("operator", "or"),
		("per_page", per_page),
		("sort_by", "years_of_experience:desc"),
	]
}

fn collection_schema(name: &str) -> serde_json::Value {
	serde_json::json!({
		"name": name,
		"fields": [
			{ "name": "id", "type": "string" },
			{ "name": "source_doc_id", "type": "string" },
			{ "name": "job_title", "type": "string" },
			{ "name": "industry", "type": "string" },
			{ "name": "location_city", "type": "string" },
			{ "name": "location_country", "type": "string" },
			{ "name": "skills", "type": "string[]" },
			{ "name": "languages", "type": "string[]" },
			{ "name": "degree", "type": "string" },
			{ "name": "major", "type": "string" },
			{ "name": "level", "type": "string" },
			{ "name": "gpa", "type": "float" },
			{ "name": "years_of_experience", "type": "int32" }
		],
		"default_sorting_field": "years_of_experience"
	})
}
