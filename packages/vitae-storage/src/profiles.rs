use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
	Result,
	models::{Award, CandidateProfile, Certificate, Education, Experience, ProfileRecord, Project},
};

/// Lists a tenant's profiles, optionally narrowed to a set of source
/// documents. An empty `source_doc_ids` slice means the whole tenant pool.
pub async fn list_profiles(
	pool: &PgPool,
	tenant_id: &str,
	source_doc_ids: &[Uuid],
) -> Result<Vec<CandidateProfile>> {
	let profiles = if source_doc_ids.is_empty() {
		sqlx::query_as::<_, CandidateProfile>(
			"\
SELECT *
FROM candidate_profiles
WHERE tenant_id = $1
ORDER BY profile_id",
		)
		.bind(tenant_id)
		.fetch_all(pool)
		.await?
	} else {
		sqlx::query_as::<_, CandidateProfile>(
			"\
SELECT *
FROM candidate_profiles
WHERE tenant_id = $1 AND source_doc_id = ANY($2)
ORDER BY profile_id",
		)
		.bind(tenant_id)
		.bind(source_doc_ids)
		.fetch_all(pool)
		.await?
	};

	Ok(profiles)
}

/// Hydrates full records for exactly the given profile ids. Ids that no longer
/// resolve are simply absent from the result; the caller decides how to treat
/// the gap.
pub async fn get_profile_records(
	pool: &PgPool,
	tenant_id: &str,
	profile_ids: &[Uuid],
) -> Result<Vec<ProfileRecord>> {
	if profile_ids.is_empty() {
		return Ok(Vec::new());
	}

	let profiles = sqlx::query_as::<_, CandidateProfile>(
		"\
SELECT *
FROM candidate_profiles
WHERE tenant_id = $1 AND profile_id = ANY($2)",
	)
	.bind(tenant_id)
	.bind(profile_ids)
	.fetch_all(pool)
	.await?;

	if profiles.is_empty() {
		return Ok(Vec::new());
	}

	let live_ids: Vec<Uuid> = profiles.iter().map(|p| p.profile_id).collect();
	let mut education = group_by_profile(
		sqlx::query_as::<_, Education>(
			"SELECT * FROM profile_education WHERE profile_id = ANY($1) ORDER BY start_date",
		)
		.bind(&live_ids)
		.fetch_all(pool)
		.await?,
		|row: &Education| row.profile_id,
	);
	let mut experience = group_by_profile(
		sqlx::query_as::<_, Experience>(
			"SELECT * FROM profile_experience WHERE profile_id = ANY($1) ORDER BY start_date",
		)
		.bind(&live_ids)
		.fetch_all(pool)
		.await?,
		|row: &Experience| row.profile_id,
	);
	let mut certificates = group_by_profile(
		sqlx::query_as::<_, Certificate>(
			"SELECT * FROM profile_certificates WHERE profile_id = ANY($1) ORDER BY start_date",
		)
		.bind(&live_ids)
		.fetch_all(pool)
		.await?,
		|row: &Certificate| row.profile_id,
	);
	let mut projects = group_by_profile(
		sqlx::query_as::<_, Project>(
			"SELECT * FROM profile_projects WHERE profile_id = ANY($1) ORDER BY start_date",
		)
		.bind(&live_ids)
		.fetch_all(pool)
		.await?,
		|row: &Project| row.profile_id,
	);
	let mut awards = group_by_profile(
		sqlx::query_as::<_, Award>(
			"SELECT * FROM profile_awards WHERE profile_id = ANY($1) ORDER BY awarded_on",
		)
		.bind(&live_ids)
		.fetch_all(pool)
		.await?,
		|row: &Award| row.profile_id,
	);

	Ok(profiles
		.into_iter()
		.map(|profile| {
			let id = profile.profile_id;

			ProfileRecord {
				profile,
				education: education.remove(&id).unwrap_or_default(),
				experience: experience.remove(&id).unwrap_or_default(),
				certificates: certificates.remove(&id).unwrap_or_default(),
				projects: projects.remove(&id).unwrap_or_default(),
				awards: awards.remove(&id).unwrap_or_default(),
			}
		})
		.collect())
}

/// Stores a freshly computed embedding on a profile.
pub async fn set_embedding(pool: &PgPool, profile_id: Uuid, embedding: &[f32]) -> Result<()> {
	sqlx::query(
		"\
UPDATE candidate_profiles
SET embedding = $2, updated_at = $3
WHERE profile_id = $1",
	)
	.bind(profile_id)
	.bind(embedding)
	.bind(time::OffsetDateTime::now_utc())
	.execute(pool)
	.await?;

	Ok(())
}

fn group_by_profile<T, F>(rows: Vec<T>, key: F) -> HashMap<Uuid, Vec<T>>
where
	F: Fn(&T) -> Uuid,
{
	let mut out: HashMap<Uuid, Vec<T>> = HashMap::new();

	for row in rows {
		out.entry(key(&row)).or_default().push(row);
	}

	out
}
