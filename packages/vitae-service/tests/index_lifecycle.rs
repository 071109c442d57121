use std::env;

use uuid::Uuid;

use vitae_service::lifecycle;
use vitae_storage::{
	index::{SearchHit, SearchIndex},
	models::{CandidateProfile, ProfileRecord},
};

/// Index-backed tests skip unless VITAE_TYPESENSE_URL points at a live
/// search index. Each run uses a fresh collection prefix so concurrent runs
/// never collide.
fn env_index() -> Option<vitae_config::SearchIndex> {
	let url = env::var("VITAE_TYPESENSE_URL").ok()?;

	Some(vitae_config::SearchIndex {
		url,
		api_key: env::var("VITAE_TYPESENSE_API_KEY").unwrap_or_else(|_| "xyz".to_string()),
		collection_prefix: format!("vitae_test_{}", Uuid::new_v4().simple()),
		timeout_ms: 5_000,
	})
}

fn record(job_title: &str, skills: &[&str], years: i32) -> ProfileRecord {
	ProfileRecord {
		profile: CandidateProfile {
			profile_id: Uuid::new_v4(),
			tenant_id: "t1".to_string(),
			source_doc_id: Uuid::new_v4(),
			job_title: Some(job_title.to_string()),
			industry: None,
			level: None,
			city: None,
			country: None,
			date_of_birth: None,
			years_of_experience: Some(years),
			score_points: None,
			summary: None,
			objective: None,
			skills: skills.iter().map(|s| s.to_string()).collect(),
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

fn hit_ids(hits: &[SearchHit]) -> Vec<String> {
	let mut ids: Vec<String> = hits.iter().map(|h| h.document.id.clone()).collect();

	ids.sort();

	ids
}

#[tokio::test]
async fn repeated_reindex_is_indistinguishable_by_search() {
	let Some(cfg) = env_index() else {
		eprintln!("Skipping index-backed test; set VITAE_TYPESENSE_URL to run it.");

		return;
	};

	let index = SearchIndex::new(&cfg).expect("Index client must build.");
	let pool = [
		record("Backend Engineer", &["Go", "SQL"], 5),
		record("Data Analyst", &["Python"], 2),
	];
	let first = lifecycle::reindex(&index, "t1", &pool)
		.await
		.expect("First reindex must succeed.");

	assert_eq!(first.indexed, 2);
	assert_eq!(first.failed, 0);

	let hits_once = index
		.search("t1", "backend engineer", "job_title", "1", 100)
		.await
		.expect("Search after first reindex must succeed.");

	assert!(!hits_once.is_empty());

	// Upsert keys on the document id, so a second pass with identical input
	// must leave search results unchanged.
	let second = lifecycle::reindex(&index, "t1", &pool)
		.await
		.expect("Second reindex must succeed.");

	assert_eq!(second.indexed, 2);
	assert_eq!(second.failed, 0);

	let hits_twice = index
		.search("t1", "backend engineer", "job_title", "1", 100)
		.await
		.expect("Search after second reindex must succeed.");

	assert_eq!(hit_ids(&hits_once), hit_ids(&hits_twice));

	// And no document appears twice.
	let ids = hit_ids(&hits_twice);
	let mut deduped = ids.clone();

	deduped.dedup();

	assert_eq!(ids, deduped);

	index.delete_collection("t1").await.expect("Collection cleanup must succeed.");
}

#[tokio::test]
async fn ensure_collection_tolerates_repeated_calls() {
	let Some(cfg) = env_index() else {
		eprintln!("Skipping index-backed test; set VITAE_TYPESENSE_URL to run it.");

		return;
	};

	let index = SearchIndex::new(&cfg).expect("Index client must build.");

	index.ensure_collection("t1").await.expect("First ensure must succeed.");
	index.ensure_collection("t1").await.expect("Repeated ensure must succeed.");

	index.delete_collection("t1").await.expect("Collection cleanup must succeed.");

	// Deleting an already-absent collection is also fine.
	index.delete_collection("t1").await.expect("Repeated delete must succeed.");
}
