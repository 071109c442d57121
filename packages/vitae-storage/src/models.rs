use time::Date;
use uuid::Uuid;

/// One candidate's extracted information. At most one profile exists per
/// source document within a tenant; re-extraction rewrites the row in place.
#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct CandidateProfile {
	pub profile_id: Uuid,
	pub tenant_id: String,
	pub source_doc_id: Uuid,
	pub job_title: Option<String>,
	pub industry: Option<String>,
	pub level: Option<String>,
	pub city: Option<String>,
	pub country: Option<String>,
	pub date_of_birth: Option<Date>,
	pub years_of_experience: Option<i32>,
	pub score_points: Option<i32>,
	pub summary: Option<String>,
	pub objective: Option<String>,
	pub skills: Vec<String>,
	/// Fixed-length embedding computed once at ingestion from
	/// [`CandidateProfile::embedding_text`]. Absent until the extraction
	/// pipeline has embedded the profile.
	pub embedding: Option<Vec<f32>>,
	pub created_at: time::OffsetDateTime,
	pub updated_at: time::OffsetDateTime,
}

impl CandidateProfile {
	/// Canonical concatenation of the profile's textual fields, in a fixed
	/// order so re-extraction produces the same embedding input.
	pub fn embedding_text(&self) -> String {
		let mut parts: Vec<String> = Vec::new();

		if let Some(title) = self.job_title.as_deref().filter(|s| !s.trim().is_empty()) {
			parts.push(format!("job title: {title}"));
		}
		if let Some(industry) = self.industry.as_deref().filter(|s| !s.trim().is_empty()) {
			parts.push(format!("industry: {industry}"));
		}
		if let Some(city) = self.city.as_deref().filter(|s| !s.trim().is_empty()) {
			parts.push(format!("city: {city}"));
		}
		if let Some(country) = self.country.as_deref().filter(|s| !s.trim().is_empty()) {
			parts.push(format!("country: {country}"));
		}
		if !self.skills.is_empty() {
			parts.push(format!("skills: {}", self.skills.join(", ")));
		}
		if let Some(summary) = self.summary.as_deref().filter(|s| !s.trim().is_empty()) {
			parts.push(summary.to_string());
		}
		if let Some(objective) = self.objective.as_deref().filter(|s| !s.trim().is_empty()) {
			parts.push(objective.to_string());
		}

		parts.join(" . ")
	}
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Education {
	pub education_id: Uuid,
	pub profile_id: Uuid,
	pub degree: Option<String>,
	pub institution_name: Option<String>,
	pub major: Option<String>,
	pub gpa: Option<f32>,
	pub start_date: Option<Date>,
	/// None means ongoing.
	pub end_date: Option<Date>,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Experience {
	pub experience_id: Uuid,
	pub profile_id: Uuid,
	pub company_name: Option<String>,
	pub job_title: Option<String>,
	pub industry: Option<String>,
	pub level: Option<String>,
	pub description: Vec<String>,
	pub start_date: Option<Date>,
	pub end_date: Option<Date>,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Certificate {
	pub certificate_id: Uuid,
	pub profile_id: Uuid,
	/// "language" or "other".
	pub kind: Option<String>,
	pub language: Option<String>,
	pub name: Option<String>,
	pub grade: Option<String>,
	pub start_date: Option<Date>,
	pub end_date: Option<Date>,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Project {
	pub project_id: Uuid,
	pub profile_id: Uuid,
	pub name: Option<String>,
	pub description: Vec<String>,
	pub start_date: Option<Date>,
	pub end_date: Option<Date>,
}

#[derive(Debug, Clone, serde::Serialize, sqlx::FromRow)]
pub struct Award {
	pub award_id: Uuid,
	pub profile_id: Uuid,
	pub name: Option<String>,
	pub description: Option<String>,
	pub awarded_on: Option<Date>,
}

/// A profile plus its sub-records, as returned by batched hydration.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProfileRecord {
	pub profile: CandidateProfile,
	pub education: Vec<Education>,
	pub experience: Vec<Experience>,
	pub certificates: Vec<Certificate>,
	pub projects: Vec<Project>,
	pub awards: Vec<Award>,
}
