use std::collections::HashMap;

use uuid::Uuid;
use vitae_domain::{requirement::RangeBound, trigram};
use vitae_storage::{index::SearchHit, models::ProfileRecord};

use crate::{
	channel::ScoredCandidate,
	query::{Criterion, Field, QueryPlan},
};

/// Trigram-based fallback strategy. A candidate is included when at least one
/// criterion matches at or above `threshold`; its score is the weighted sum of
/// the matching criteria over the total weight of the requested ones. Numeric
/// ranges are hard filters, applied before any scoring.
pub fn fuzzy_scores(
	plan: &QueryPlan,
	pool: &[ProfileRecord],
	threshold: f32,
) -> Vec<ScoredCandidate> {
	let total_weight: f32 = plan.criteria.iter().map(|c| c.weight).sum();
	let mut scored = Vec::new();

	for record in pool {
		if !passes_ranges(plan, record) {
			continue;
		}
		// With no text criteria every surviving candidate is an equally good
		// match; numeric ranges have already done the filtering.
		if plan.criteria.is_empty() {
			scored.push(ScoredCandidate {
				profile_id: record.profile.profile_id,
				source_doc_id: record.profile.source_doc_id,
				score: 1.0,
				criteria: HashMap::new(),
			});

			continue;
		}

		let mut matched_weight = 0.0;
		let mut criteria = HashMap::new();
		let mut any_match = false;

		for criterion in &plan.criteria {
			let score = criterion_score(criterion, record);

			criteria.insert(criterion.field, score);

			if score >= threshold {
				matched_weight += criterion.weight * score;
				any_match = true;
			}
		}

		if !any_match {
			continue;
		}

		scored.push(ScoredCandidate {
			profile_id: record.profile.profile_id,
			source_doc_id: record.profile.source_doc_id,
			score: matched_weight / total_weight,
			criteria,
		});
	}

	scored
}

/// Converts hits from the delegated index strategy. Documents whose ids fail
/// to parse are logged and skipped; they indicate index corruption, not a
/// request problem.
pub fn hits_to_scored(hits: Vec<SearchHit>) -> Vec<ScoredCandidate> {
	let mut scored = Vec::with_capacity(hits.len());

	for hit in hits {
		let parsed = Uuid::parse_str(&hit.document.id)
			.and_then(|profile_id| {
				Uuid::parse_str(&hit.document.source_doc_id)
					.map(|source_doc_id| (profile_id, source_doc_id))
			});

		match parsed {
			Ok((profile_id, source_doc_id)) => {
				scored.push(ScoredCandidate {
					profile_id,
					source_doc_id,
					score: hit.score,
					criteria: HashMap::new(),
				});
			},
			Err(err) => {
				tracing::warn!(
					document_id = %hit.document.id,
					error = %err,
					"Dropped an index hit with an unparseable id."
				);
			},
		}
	}

	scored
}

/// Scores from the delegated index strategy, constrained to the request's
/// candidate pool. The index is tenant-wide, so hits outside a narrowed pool
/// are discarded, and numeric ranges are re-applied here because relevance
/// search never enforces them.
pub fn delegated_scores(
	plan: &QueryPlan,
	pool: &[ProfileRecord],
	hits: Vec<SearchHit>,
) -> Vec<ScoredCandidate> {
	let by_id: HashMap<Uuid, &ProfileRecord> =
		pool.iter().map(|r| (r.profile.profile_id, r)).collect();

	hits_to_scored(hits)
		.into_iter()
		.filter(|scored| {
			by_id.get(&scored.profile_id).is_some_and(|record| passes_ranges(plan, record))
		})
		.collect()
}

fn passes_ranges(plan: &QueryPlan, record: &ProfileRecord) -> bool {
	in_range(plan.experience_years.as_ref(), record.profile.years_of_experience)
		&& in_range(plan.score_points.as_ref(), record.profile.score_points)
}

/// A candidate with no value for a bounded field fails the bound.
fn in_range(range: Option<&RangeBound>, value: Option<i32>) -> bool {
	match range {
		None => true,
		Some(range) => value.map(|v| range.contains(v)).unwrap_or(false),
	}
}

fn criterion_score(criterion: &Criterion, record: &ProfileRecord) -> f32 {
	let candidate_texts = candidate_texts(criterion.field, record);

	match criterion.field {
		// Multi-valued requirements score as coverage: each requested value
		// finds its best candidate match, then the matches are averaged, so a
		// candidate with extra skills is never penalized for them.
		Field::Skills | Field::Language => coverage(&criterion.values, &candidate_texts),
		_ => best_similarity(&criterion.values, &candidate_texts),
	}
}

fn candidate_texts(field: Field, record: &ProfileRecord) -> Vec<String> {
	let profile = &record.profile;

	match field {
		Field::Title => {
			let mut texts: Vec<String> = profile.job_title.iter().cloned().collect();

			texts.extend(record.experience.iter().filter_map(|e| e.job_title.clone()));

			texts
		},
		Field::Industry => {
			let mut texts: Vec<String> = profile.industry.iter().cloned().collect();

			texts.extend(record.experience.iter().filter_map(|e| e.industry.clone()));

			texts
		},
		Field::Level => {
			let mut texts: Vec<String> = profile.level.iter().cloned().collect();

			texts.extend(record.experience.iter().filter_map(|e| e.level.clone()));

			texts
		},
		Field::City => profile.city.iter().cloned().collect(),
		Field::Country => profile.country.iter().cloned().collect(),
		Field::Skills => profile.skills.clone(),
		Field::Degree => record.education.iter().filter_map(|e| e.degree.clone()).collect(),
		Field::Major => record.education.iter().filter_map(|e| e.major.clone()).collect(),
		Field::Language => record
			.certificates
			.iter()
			.filter(|c| c.kind.as_deref() == Some("language"))
			.filter_map(|c| c.language.clone())
			.collect(),
	}
}

fn best_similarity(values: &[String], texts: &[String]) -> f32 {
	values
		.iter()
		.flat_map(|value| texts.iter().map(move |text| trigram::similarity(value, text)))
		.fold(0.0, f32::max)
}

fn coverage(values: &[String], texts: &[String]) -> f32 {
	if values.is_empty() {
		return 0.0;
	}

	let sum: f32 = values
		.iter()
		.map(|value| {
			texts.iter().map(|text| trigram::similarity(value, text)).fold(0.0, f32::max)
		})
		.sum();

	sum / values.len() as f32
}
