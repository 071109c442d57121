use serde::{Deserialize, Serialize};

/// The structured shape of one search request. Every field is optional; absent
/// fields simply contribute no criterion. Constructed per request, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobRequirement {
	pub job_title: Option<String>,
	pub industry: Option<String>,
	pub location: Option<Location>,
	pub skills: Vec<String>,
	pub languages: Vec<String>,
	pub degree: Option<String>,
	pub major: Option<String>,
	pub level: Option<String>,
	pub experience_years: Option<RangeBound>,
	pub score_points: Option<RangeBound>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
	pub city: Option<String>,
	pub country: Option<String>,
}

/// Inclusive numeric range; either bound may be open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeBound {
	pub min: Option<i32>,
	pub max: Option<i32>,
}
impl RangeBound {
	pub fn contains(&self, value: i32) -> bool {
		if let Some(min) = self.min
			&& value < min
		{
			return false;
		}
		if let Some(max) = self.max
			&& value > max
		{
			return false;
		}

		true
	}
}

impl JobRequirement {
	pub fn city(&self) -> Option<&str> {
		self.location.as_ref().and_then(|loc| loc.city.as_deref()).filter(|c| !c.trim().is_empty())
	}

	pub fn country(&self) -> Option<&str> {
		self.location
			.as_ref()
			.and_then(|loc| loc.country.as_deref())
			.filter(|c| !c.trim().is_empty())
	}
}
