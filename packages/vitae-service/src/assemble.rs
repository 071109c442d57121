use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;
use vitae_storage::{models::ProfileRecord, profiles};

use crate::{Result, fusion::FusedCandidate};

#[derive(Debug, Clone, serde::Serialize)]
pub struct CriterionScore {
	pub field: &'static str,
	pub score: f32,
}

/// Everything that went into a candidate's position, surfaced with the result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScoreBreakdown {
	pub fused: f32,
	pub lexical: Option<f32>,
	pub semantic: Option<f32>,
	pub criteria: Vec<CriterionScore>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct RankedCandidate {
	/// 1-based position in the final ordering.
	pub rank: usize,
	pub scores: ScoreBreakdown,
	pub record: ProfileRecord,
}

/// Hydrates the fused ordering in one batched read. Ids the store no longer
/// resolves are dropped from the results, logged, and counted; a stale index
/// must never surface a phantom candidate.
pub async fn assemble(
	pool: &PgPool,
	tenant_id: &str,
	fused: Vec<FusedCandidate>,
) -> Result<(Vec<RankedCandidate>, usize)> {
	let ids: Vec<Uuid> = fused.iter().map(|c| c.profile_id).collect();
	let records = profiles::get_profile_records(pool, tenant_id, &ids).await?;

	Ok(hydrate_ordered(fused, records))
}

pub fn hydrate_ordered(
	fused: Vec<FusedCandidate>,
	records: Vec<ProfileRecord>,
) -> (Vec<RankedCandidate>, usize) {
	let mut by_id: HashMap<Uuid, ProfileRecord> =
		records.into_iter().map(|r| (r.profile.profile_id, r)).collect();
	let mut ranked = Vec::with_capacity(fused.len());
	let mut dropped = 0;

	for candidate in fused {
		let Some(record) = by_id.remove(&candidate.profile_id) else {
			dropped += 1;

			tracing::warn!(
				profile_id = %candidate.profile_id,
				"Dropped a ranked candidate that no longer hydrates."
			);

			continue;
		};

		ranked.push(RankedCandidate {
			rank: ranked.len() + 1,
			scores: breakdown(&candidate),
			record,
		});
	}

	(ranked, dropped)
}

fn breakdown(candidate: &FusedCandidate) -> ScoreBreakdown {
	let mut criteria: Vec<(f32, CriterionScore)> = candidate
		.criteria
		.iter()
		.map(|(field, score)| {
			(field.weight(), CriterionScore { field: field.label(), score: *score })
		})
		.collect();

	// Heaviest criteria first, label as the stable tie-breaker.
	criteria.sort_by(|a, b| {
		b.0.partial_cmp(&a.0)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.1.field.cmp(b.1.field))
	});

	ScoreBreakdown {
		fused: candidate.fused,
		lexical: candidate.lexical,
		semantic: candidate.semantic,
		criteria: criteria.into_iter().map(|(_, score)| score).collect(),
	}
}

#[cfg(test)]
mod tests {
	use vitae_storage::models::CandidateProfile;

	use super::*;
	use crate::query::Field;

	fn record(profile_id: Uuid) -> ProfileRecord {
		ProfileRecord {
			profile: CandidateProfile {
				profile_id,
				tenant_id: "t1".to_string(),
				source_doc_id: Uuid::new_v4(),
				job_title: None,
				industry: None,
				level: None,
				city: None,
				country: None,
				date_of_birth: None,
				years_of_experience: None,
				score_points: None,
				summary: None,
				objective: None,
				skills: Vec::new(),
				embedding: None,
				created_at: time::OffsetDateTime::UNIX_EPOCH,
				updated_at: time::OffsetDateTime::UNIX_EPOCH,
			},
			education: Vec::new(),
			experience: Vec::new(),
			certificates: Vec::new(),
			projects: Vec::new(),
			awards: Vec::new(),
		}
	}

	fn fused(profile_id: Uuid, score: f32) -> FusedCandidate {
		FusedCandidate {
			profile_id,
			source_doc_id: Uuid::new_v4(),
			lexical: Some(score),
			semantic: None,
			fused: score,
			criteria: HashMap::new(),
		}
	}

	#[test]
	fn stale_ids_are_dropped_and_counted() {
		let live = Uuid::new_v4();
		let stale = Uuid::new_v4();
		let (ranked, dropped) =
			hydrate_ordered(vec![fused(stale, 0.9), fused(live, 0.5)], vec![record(live)]);

		assert_eq!(dropped, 1);
		assert_eq!(ranked.len(), 1);
		assert_eq!(ranked[0].record.profile.profile_id, live);
		assert_eq!(ranked[0].rank, 1);
	}

	#[test]
	fn ranks_follow_the_fused_order_not_the_fetch_order() {
		let first = Uuid::new_v4();
		let second = Uuid::new_v4();
		let (ranked, dropped) = hydrate_ordered(
			vec![fused(first, 0.9), fused(second, 0.5)],
			vec![record(second), record(first)],
		);

		assert_eq!(dropped, 0);
		assert_eq!(ranked[0].record.profile.profile_id, first);
		assert_eq!(ranked[1].record.profile.profile_id, second);
		assert_eq!(ranked[1].rank, 2);
	}

	#[test]
	fn breakdown_orders_criteria_by_weight() {
		let mut candidate = fused(Uuid::new_v4(), 0.8);

		candidate.criteria.insert(Field::City, 0.4);
		candidate.criteria.insert(Field::Title, 0.9);
		candidate.criteria.insert(Field::Skills, 0.7);

		let scores = breakdown(&candidate);
		let fields: Vec<&str> = scores.criteria.iter().map(|c| c.field).collect();

		assert_eq!(fields, vec!["title", "skills", "city"]);
	}
}
