use std::collections::HashMap;

use uuid::Uuid;

use crate::query::Field;

/// The two retrieval channels. Either may degrade on its own; the search only
/// fails when both do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
	Lexical,
	Semantic,
}
impl Channel {
	pub fn name(self) -> &'static str {
		match self {
			Self::Lexical => "lexical",
			Self::Semantic => "semantic",
		}
	}
}

/// A channel failure carried as a value through fusion and into the response,
/// never raised as an error.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ChannelDegraded {
	pub channel: Channel,
	pub reason: String,
}

/// One candidate as scored by a single channel, before normalization.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
	pub profile_id: Uuid,
	pub source_doc_id: Uuid,
	pub score: f32,
	/// Per-criterion match scores where the channel computed them; empty for
	/// channels that only produce a single relevance score.
	pub criteria: HashMap<Field, f32>,
}

#[derive(Debug, Clone)]
pub enum ChannelOutcome {
	Scored(Vec<ScoredCandidate>),
	Degraded(ChannelDegraded),
}
impl ChannelOutcome {
	pub fn degraded(channel: Channel, reason: impl Into<String>) -> Self {
		Self::Degraded(ChannelDegraded { channel, reason: reason.into() })
	}
}
