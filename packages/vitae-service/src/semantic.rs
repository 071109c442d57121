use std::collections::HashMap;

use vitae_domain::vector;
use vitae_storage::models::ProfileRecord;

use crate::channel::ScoredCandidate;

/// Cosine similarity of the query vector against each candidate's stored
/// embedding. Candidates without an embedding are not scorable here; they can
/// still reach the results through the lexical channel.
pub fn cosine_scores(query_vec: &[f32], pool: &[ProfileRecord]) -> Vec<ScoredCandidate> {
	pool.iter()
		.filter_map(|record| {
			let embedding = record.profile.embedding.as_deref()?;

			Some(ScoredCandidate {
				profile_id: record.profile.profile_id,
				source_doc_id: record.profile.source_doc_id,
				score: vector::cosine_similarity(query_vec, embedding),
				criteria: HashMap::new(),
			})
		})
		.collect()
}
