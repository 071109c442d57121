use std::collections::{HashMap, HashSet};

use uuid::Uuid;
use vitae_domain::vector::EPSILON;

use crate::{channel::ScoredCandidate, query::Field};

/// A candidate after both channels have been normalized and blended, ordered
/// but not yet hydrated.
#[derive(Debug, Clone)]
pub struct FusedCandidate {
	pub profile_id: Uuid,
	pub source_doc_id: Uuid,
	/// Normalized per-channel scores; None when the channel did not score the
	/// candidate or was degraded.
	pub lexical: Option<f32>,
	pub semantic: Option<f32>,
	pub fused: f32,
	pub criteria: HashMap<Field, f32>,
}

/// Scales a channel's scores into [0, 1] by its own maximum. An empty or
/// all-zero channel is left as is, which is the same as normalizing by 1.0.
pub fn max_normalize(scored: &mut [ScoredCandidate]) {
	let max = scored.iter().map(|s| s.score).fold(0.0, f32::max);

	if max <= EPSILON {
		return;
	}

	for s in scored {
		s.score /= max;
	}
}

/// Blends the two channels: `alpha` weights the lexical side, `1 - alpha` the
/// semantic side, and a candidate missing from one channel contributes zero
/// there. When a whole channel is degraded (`None`), the other channel's
/// normalized score is the fused score, unscaled. The result is sorted by
/// fused score descending with ties broken by profile id, then deduplicated by
/// source document so each CV appears once, at its best rank.
pub fn fuse(
	lexical: Option<Vec<ScoredCandidate>>,
	semantic: Option<Vec<ScoredCandidate>>,
	alpha: f32,
) -> Vec<FusedCandidate> {
	let both = lexical.is_some() && semantic.is_some();
	let mut merged: HashMap<Uuid, FusedCandidate> = HashMap::new();
	let mut lexical = lexical;
	let mut semantic = semantic;

	if let Some(scored) = lexical.as_deref_mut() {
		max_normalize(scored);
	}
	if let Some(scored) = semantic.as_deref_mut() {
		max_normalize(scored);
	}

	for candidate in lexical.into_iter().flatten() {
		let entry = merged.entry(candidate.profile_id).or_insert_with(|| FusedCandidate {
			profile_id: candidate.profile_id,
			source_doc_id: candidate.source_doc_id,
			lexical: None,
			semantic: None,
			fused: 0.0,
			criteria: HashMap::new(),
		});

		entry.lexical = Some(candidate.score);
		entry.criteria.extend(candidate.criteria);
	}
	for candidate in semantic.into_iter().flatten() {
		let entry = merged.entry(candidate.profile_id).or_insert_with(|| FusedCandidate {
			profile_id: candidate.profile_id,
			source_doc_id: candidate.source_doc_id,
			lexical: None,
			semantic: None,
			fused: 0.0,
			criteria: HashMap::new(),
		});

		entry.semantic = Some(candidate.score);
	}

	let mut fused: Vec<FusedCandidate> = merged
		.into_values()
		.map(|mut candidate| {
			let lex = candidate.lexical.unwrap_or(0.0);
			let sem = candidate.semantic.unwrap_or(0.0);

			candidate.fused = if both {
				alpha * lex + (1.0 - alpha) * sem
			} else {
				// Single surviving channel; its score stands alone.
				lex + sem
			};

			candidate
		})
		.collect();

	fused.sort_by(|a, b| {
		b.fused
			.partial_cmp(&a.fused)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.profile_id.cmp(&b.profile_id))
	});

	let mut seen_docs: HashSet<Uuid> = HashSet::new();

	fused.retain(|candidate| seen_docs.insert(candidate.source_doc_id));

	fused
}
