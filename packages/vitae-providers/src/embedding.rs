use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
	data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
	#[serde(default)]
	index: Option<usize>,
	embedding: Vec<f32>,
}

/// One request per call; the ranking engine embeds the query text exactly once
/// per search, never per candidate.
pub async fn embed(
	cfg: &vitae_config::EmbeddingProviderConfig,
	texts: &[String],
) -> Result<Vec<Vec<f32>>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": texts,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let parsed: EmbeddingResponse = res.error_for_status()?.json().await?;

	order_vectors(parsed, texts.len())
}

fn order_vectors(response: EmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
	if response.data.len() != expected {
		return Err(eyre::eyre!(
			"Embedding provider returned {} vectors for {} inputs.",
			response.data.len(),
			expected
		));
	}

	let mut indexed: Vec<(usize, Vec<f32>)> = response
		.data
		.into_iter()
		.enumerate()
		.map(|(fallback, item)| (item.index.unwrap_or(fallback), item.embedding))
		.collect();

	indexed.sort_by_key(|(index, _)| *index);

	Ok(indexed.into_iter().map(|(_, vec)| vec).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn orders_vectors_by_provider_index() {
		let response: EmbeddingResponse = serde_json::from_value(serde_json::json!({
			"data": [
				{ "index": 1, "embedding": [2.0, 3.0] },
				{ "index": 0, "embedding": [0.5, 1.5] }
			]
		}))
		.expect("Response must parse.");
		let ordered = order_vectors(response, 2).expect("Ordering must succeed.");

		assert_eq!(ordered[0], vec![0.5, 1.5]);
		assert_eq!(ordered[1], vec![2.0, 3.0]);
	}

	#[test]
	fn rejects_mismatched_vector_count() {
		let response: EmbeddingResponse = serde_json::from_value(serde_json::json!({
			"data": [{ "index": 0, "embedding": [1.0] }]
		}))
		.expect("Response must parse.");

		assert!(order_vectors(response, 2).is_err());
	}

	#[test]
	fn missing_index_falls_back_to_position() {
		let response: EmbeddingResponse = serde_json::from_value(serde_json::json!({
			"data": [
				{ "embedding": [1.0] },
				{ "embedding": [2.0] }
			]
		}))
		.expect("Response must parse.");
		let ordered = order_vectors(response, 2).expect("Ordering must succeed.");

		assert_eq!(ordered[0], vec![1.0]);
		assert_eq!(ordered[1], vec![2.0]);
	}
}
