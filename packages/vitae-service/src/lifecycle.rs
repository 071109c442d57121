use vitae_storage::{
	index::{SearchIndex, SearchIndexDocument, UpsertReport},
	models::ProfileRecord,
};

use crate::Result;

/// Projects a hydrated profile into the denormalized document the search index
/// stores. Index schemas reject nulls, so absent fields flatten to empty
/// strings and zeroes.
pub fn index_document(record: &ProfileRecord) -> SearchIndexDocument {
	let profile = &record.profile;
	let first_education = record.education.first();

	SearchIndexDocument {
		id: profile.profile_id.to_string(),
		source_doc_id: profile.source_doc_id.to_string(),
		job_title: profile.job_title.clone().unwrap_or_default(),
		industry: profile.industry.clone().unwrap_or_default(),
		location_city: profile.city.clone().unwrap_or_default(),
		location_country: profile.country.clone().unwrap_or_default(),
		skills: profile.skills.clone(),
		languages: record
			.certificates
			.iter()
			.filter(|c| c.kind.as_deref() == Some("language"))
			.filter_map(|c| c.language.clone())
			.collect(),
		degree: first_education.and_then(|e| e.degree.clone()).unwrap_or_default(),
		major: first_education.and_then(|e| e.major.clone()).unwrap_or_default(),
		level: profile.level.clone().unwrap_or_default(),
		gpa: first_education.and_then(|e| e.gpa).unwrap_or(0.0),
		years_of_experience: profile.years_of_experience.unwrap_or(0),
	}
}

/// Makes the tenant's collection current before a delegated search: creates it
/// when absent and upserts the whole candidate pool. Per-document failures are
/// counted, not fatal.
pub async fn reindex(
	index: &SearchIndex,
	tenant_id: &str,
	pool: &[ProfileRecord],
) -> Result<UpsertReport> {
	index.ensure_collection(tenant_id).await?;

	let documents: Vec<SearchIndexDocument> = pool.iter().map(index_document).collect();
	let report = index.upsert(tenant_id, &documents).await?;

	if report.failed > 0 {
		tracing::warn!(
			tenant_id,
			indexed = report.indexed,
			failed = report.failed,
			"Reindex finished with per-document failures."
		);
	}

	Ok(report)
}
