use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::timeout;
use uuid::Uuid;
use vitae_domain::requirement::JobRequirement;
use vitae_storage::{
	index::SearchHit,
	models::{CandidateProfile, ProfileRecord},
	profiles,
};

use crate::{
	Error, RankService, Result,
	assemble::{self, RankedCandidate},
	channel::{Channel, ChannelDegraded, ChannelOutcome},
	fusion, lexical, lifecycle,
	query::{self, QueryPlan},
	semantic,
};

#[derive(Debug, Clone, Deserialize)]
pub struct RankRequest {
	pub tenant_id: String,
	/// Narrows the candidate pool to these source documents; empty means the
	/// tenant's whole pool.
	#[serde(default)]
	pub source_doc_ids: Vec<Uuid>,
	pub requirement: JobRequirement,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SearchStats {
	pub pool_size: usize,
	pub returned: usize,
	/// Candidates the index still knew but the profile store no longer did.
	pub dropped_stale: usize,
	pub avg_fused: f32,
	pub max_fused: f32,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
	pub query_text: String,
	pub results: Vec<RankedCandidate>,
	pub degraded: Vec<ChannelDegraded>,
	pub stats: SearchStats,
}

impl RankService {
	/// Runs the full ranking pipeline: build the query plan, load the tenant's
	/// candidate pool, score it through both retrieval channels concurrently,
	/// fuse, and hydrate. A degraded channel narrows the search; only losing
	/// both is an error.
	pub async fn rank(&self, request: RankRequest) -> Result<RankResponse> {
		let tenant_id = request.tenant_id.trim();

		if tenant_id.is_empty() {
			return Err(Error::InvalidRequest {
				message: "tenant_id must not be empty.".to_string(),
			});
		}

		let plan = query::build_plan(&request.requirement);

		tracing::info!(
			tenant_id,
			criteria = plan.criteria.len(),
			scoped_docs = request.source_doc_ids.len(),
			"Ranking requested."
		);

		let listed =
			profiles::list_profiles(&self.db.pool, tenant_id, &request.source_doc_ids).await?;
		let ids: Vec<Uuid> = listed.iter().map(|p| p.profile_id).collect();
		let pool = profiles::get_profile_records(&self.db.pool, tenant_id, &ids).await?;

		// An empty pool is a legitimate empty result, not a failure.
		if pool.is_empty() {
			return Ok(RankResponse {
				query_text: plan.free_text,
				results: Vec::new(),
				degraded: Vec::new(),
				stats: SearchStats::default(),
			});
		}

		let budget = Duration::from_millis(self.cfg.ranking.channel_timeout_ms);
		let (lexical_outcome, semantic_outcome) = tokio::join!(
			self.lexical_channel(tenant_id, &plan, &pool, budget),
			self.semantic_channel(&plan, &pool, budget),
		);
		let mut degraded = Vec::new();
		let lexical_scores = collect_outcome(lexical_outcome, &mut degraded);
		let semantic_scores = collect_outcome(semantic_outcome, &mut degraded);

		if lexical_scores.is_none() && semantic_scores.is_none() {
			let message = degraded
				.iter()
				.map(|d| format!("{}: {}", d.channel.name(), d.reason))
				.collect::<Vec<_>>()
				.join("; ");

			return Err(Error::AllChannelsDegraded { message });
		}

		let mut fused =
			fusion::fuse(lexical_scores, semantic_scores, self.cfg.ranking.blend_alpha);

		fused.truncate(self.cfg.ranking.max_hits as usize);

		let max_fused = fused.first().map(|c| c.fused).unwrap_or(0.0);
		let avg_fused = if fused.is_empty() {
			0.0
		} else {
			fused.iter().map(|c| c.fused).sum::<f32>() / fused.len() as f32
		};
		let pool_size = pool.len();
		let (results, dropped_stale) =
			assemble::assemble(&self.db.pool, tenant_id, fused).await?;
		let stats = SearchStats {
			pool_size,
			returned: results.len(),
			dropped_stale,
			avg_fused,
			max_fused,
		};

		tracing::info!(
			tenant_id,
			pool_size,
			returned = stats.returned,
			dropped_stale,
			degraded = degraded.len(),
			"Ranking finished."
		);

		Ok(RankResponse { query_text: plan.free_text, results, degraded, stats })
	}

	/// Embeds every profile in the tenant's pool that does not yet carry a
	/// vector, in a single provider call, and stores the results. Searches
	/// tolerate missing embeddings, so this can run on any schedule.
	pub async fn backfill_embeddings(&self, tenant_id: &str) -> Result<usize> {
		let tenant_id = tenant_id.trim();

		if tenant_id.is_empty() {
			return Err(Error::InvalidRequest {
				message: "tenant_id must not be empty.".to_string(),
			});
		}

		let listed = profiles::list_profiles(&self.db.pool, tenant_id, &[]).await?;
		let missing: Vec<&CandidateProfile> =
			listed.iter().filter(|p| p.embedding.is_none()).collect();

		if missing.is_empty() {
			return Ok(0);
		}

		let texts: Vec<String> = missing.iter().map(|p| p.embedding_text()).collect();
		let vectors =
			self.providers.embedding.embed(&self.cfg.providers.embedding, &texts).await?;

		if vectors.len() != missing.len() {
			return Err(Error::Provider {
				message: "Embedding provider returned a mismatched vector count.".to_string(),
			});
		}

		for (profile, vector) in missing.iter().zip(vectors) {
			profiles::set_embedding(&self.db.pool, profile.profile_id, &vector).await?;
		}

		tracing::info!(tenant_id, embedded = missing.len(), "Embedding backfill finished.");

		Ok(missing.len())
	}

	/// Delegated index strategy with an in-process fallback: any index error
	/// or timeout downgrades to trigram matching over the already-loaded pool
	/// instead of degrading the whole channel.
	async fn lexical_channel(
		&self,
		tenant_id: &str,
		plan: &QueryPlan,
		pool: &[ProfileRecord],
		budget: Duration,
	) -> ChannelOutcome {
		match timeout(budget, self.delegated_search(tenant_id, plan, pool)).await {
			Ok(Ok(hits)) => ChannelOutcome::Scored(lexical::delegated_scores(plan, pool, hits)),
			Ok(Err(err)) => {
				tracing::warn!(
					tenant_id,
					error = %err,
					"Delegated index search failed; falling back to fuzzy matching."
				);

				ChannelOutcome::Scored(lexical::fuzzy_scores(
					plan,
					pool,
					self.cfg.ranking.fuzzy_threshold,
				))
			},
			Err(_) => {
				tracing::warn!(
					tenant_id,
					budget_ms = budget.as_millis() as u64,
					"Delegated index search timed out; falling back to fuzzy matching."
				);

				ChannelOutcome::Scored(lexical::fuzzy_scores(
					plan,
					pool,
					self.cfg.ranking.fuzzy_threshold,
				))
			},
		}
	}

	async fn delegated_search(
		&self,
		tenant_id: &str,
		plan: &QueryPlan,
		pool: &[ProfileRecord],
	) -> Result<Vec<SearchHit>> {
		lifecycle::reindex(&self.index, tenant_id, pool).await?;

		let (query_by, query_by_weights) = query::index_boosts(&plan.criteria);
		let hits = self
			.index
			.search(
				tenant_id,
				&plan.free_text,
				&query_by,
				&query_by_weights,
				self.cfg.ranking.max_hits,
			)
			.await?;

		Ok(hits)
	}

	/// Embeds the query text exactly once, then scores the pool by cosine
	/// similarity. Provider failure or timeout degrades the channel.
	async fn semantic_channel(
		&self,
		plan: &QueryPlan,
		pool: &[ProfileRecord],
		budget: Duration,
	) -> ChannelOutcome {
		let texts = [plan.free_text.clone()];
		let embedded =
			timeout(budget, self.providers.embedding.embed(&self.cfg.providers.embedding, &texts))
				.await;

		match embedded {
			Ok(Ok(vectors)) => match vectors.into_iter().next() {
				Some(query_vec) => {
					ChannelOutcome::Scored(semantic::cosine_scores(&query_vec, pool))
				},
				None => ChannelOutcome::degraded(
					Channel::Semantic,
					"Embedding provider returned no vectors.",
				),
			},
			Ok(Err(err)) => ChannelOutcome::degraded(Channel::Semantic, err.to_string()),
			Err(_) => ChannelOutcome::degraded(
				Channel::Semantic,
				format!("Embedding call exceeded {}ms.", budget.as_millis()),
			),
		}
	}
}

fn collect_outcome(
	outcome: ChannelOutcome,
	degraded: &mut Vec<ChannelDegraded>,
) -> Option<Vec<crate::channel::ScoredCandidate>> {
	match outcome {
		ChannelOutcome::Scored(scored) => Some(scored),
		ChannelOutcome::Degraded(d) => {
			tracing::warn!(
				channel = d.channel.name(),
				reason = %d.reason,
				"Retrieval channel degraded."
			);
			degraded.push(d);

			None
		},
	}
}
