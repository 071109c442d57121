use vitae_domain::requirement::{JobRequirement, RangeBound};

/// Downstream retrieval never receives an empty query.
pub const FALLBACK_QUERY: &str = "general candidate search";

const QUERY_DELIMITER: &str = " . ";

/// A matchable field of the job requirement, with its fixed relative weight.
/// Weights for absent criteria are omitted, never redistributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
	Title,
	Skills,
	Industry,
	Level,
	Degree,
	Major,
	Language,
	City,
	Country,
}
impl Field {
	pub fn weight(self) -> f32 {
		match self {
			Self::Title => 0.25,
			Self::Skills => 0.20,
			Self::Industry => 0.15,
			Self::Level => 0.10,
			Self::Degree => 0.10,
			Self::Major => 0.08,
			Self::Language => 0.05,
			Self::City => 0.04,
			Self::Country => 0.03,
		}
	}

	/// Name of the corresponding field in the external index schema.
	pub fn index_field(self) -> &'static str {
		match self {
			Self::Title => "job_title",
			Self::Skills => "skills",
			Self::Industry => "industry",
			Self::Level => "level",
			Self::Degree => "degree",
			Self::Major => "major",
			Self::Language => "languages",
			Self::City => "location_city",
			Self::Country => "location_country",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Title => "title",
			Self::Skills => "skills",
			Self::Industry => "industry",
			Self::Level => "level",
			Self::Degree => "degree",
			Self::Major => "major",
			Self::Language => "language",
			Self::City => "city",
			Self::Country => "country",
		}
	}
}

/// One per-field match condition actually present in the request.
#[derive(Debug, Clone)]
pub struct Criterion {
	pub field: Field,
	/// The query value; multi-valued fields (skills, languages) keep their
	/// individual values.
	pub values: Vec<String>,
	pub weight: f32,
}

/// What the retrieval channels consume: one free-text query string plus the
/// weighted per-field criteria, with numeric ranges kept aside as hard filters.
#[derive(Debug, Clone)]
pub struct QueryPlan {
	pub free_text: String,
	pub criteria: Vec<Criterion>,
	pub experience_years: Option<RangeBound>,
	pub score_points: Option<RangeBound>,
}

pub fn build_plan(req: &JobRequirement) -> QueryPlan {
	let mut text_parts: Vec<String> = Vec::new();
	let mut criteria: Vec<Criterion> = Vec::new();
	let mut push = |field: Field, values: Vec<String>, in_text: bool| {
		let values: Vec<String> =
			values.into_iter().map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).collect();

		if values.is_empty() {
			return;
		}
		if in_text {
			text_parts.push(format!("{}: {}", field.label(), values.join(", ")));
		}

		criteria.push(Criterion { field, values, weight: field.weight() });
	};

	// Fixed, deterministic free-text field order: title, industry, location,
	// skills, languages, degree, major. Level is a criterion only.
	push(Field::Title, req.job_title.iter().cloned().collect(), true);
	push(Field::Industry, req.industry.iter().cloned().collect(), true);
	push(Field::City, req.city().map(str::to_string).into_iter().collect(), true);
	push(Field::Country, req.country().map(str::to_string).into_iter().collect(), true);
	push(Field::Skills, req.skills.clone(), true);
	push(Field::Language, req.languages.clone(), true);
	push(Field::Degree, req.degree.iter().cloned().collect(), true);
	push(Field::Major, req.major.iter().cloned().collect(), true);
	push(Field::Level, req.level.iter().cloned().collect(), false);

	let free_text = if text_parts.is_empty() {
		FALLBACK_QUERY.to_string()
	} else {
		text_parts.join(QUERY_DELIMITER)
	};

	QueryPlan {
		free_text,
		criteria,
		experience_years: req.experience_years,
		score_points: req.score_points,
	}
}

/// Comma-separated `query_by` / `query_by_weights` parameter pair for the
/// delegated index strategy, derived from the present criteria. Weights are
/// scaled to small integers as the index engine expects.
pub fn index_boosts(criteria: &[Criterion]) -> (String, String) {
	if criteria.is_empty() {
		// Boost-neutral search across every text field.
		let fields = [
			Field::Title,
			Field::Industry,
			Field::City,
			Field::Country,
			Field::Skills,
			Field::Language,
			Field::Degree,
			Field::Major,
			Field::Level,
		];
		let names: Vec<&str> = fields.iter().map(|f| f.index_field()).collect();
		let weights = vec!["1"; names.len()];

		return (names.join(","), weights.join(","));
	}

	let names: Vec<&str> = criteria.iter().map(|c| c.field.index_field()).collect();
	let weights: Vec<String> = criteria
		.iter()
		.map(|c| (((c.weight * 100.0).round() as i64).max(1)).to_string())
		.collect();

	(names.join(","), weights.join(","))
}
