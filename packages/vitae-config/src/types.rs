use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub ranking: Ranking,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub search_index: SearchIndex,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchIndex {
	pub url: String,
	pub api_key: String,
	/// Tenant collections are named "{collection_prefix}_{tenant_id}".
	pub collection_prefix: String,
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	/// Lexical share of the two-channel blend; the semantic channel gets 1 - alpha.
	pub blend_alpha: f32,
	pub fuzzy_threshold: f32,
	pub channel_timeout_ms: u64,
	pub max_hits: u32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self { blend_alpha: 0.5, fuzzy_threshold: 0.3, channel_timeout_ms: 3_000, max_hits: 100 }
	}
}
