pub mod assemble;
pub mod channel;
pub mod fusion;
pub mod lexical;
pub mod lifecycle;
pub mod query;
pub mod rank;
pub mod semantic;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

pub use assemble::{CriterionScore, RankedCandidate, ScoreBreakdown};
pub use channel::{Channel, ChannelDegraded, ChannelOutcome, ScoredCandidate};
pub use rank::{RankRequest, RankResponse, SearchStats};

use vitae_config::{Config, EmbeddingProviderConfig};
use vitae_providers::embedding;
use vitae_storage::{db::Db, index::SearchIndex};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

/// The ranking engine's single entry point; everything it talks to is injected
/// at construction.
pub struct RankService {
	pub cfg: Config,
	pub db: Db,
	pub index: SearchIndex,
	pub providers: Providers,
}
impl RankService {
	pub fn new(cfg: Config, db: Db, index: SearchIndex) -> Self {
		Self { cfg, db, index, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, db: Db, index: SearchIndex, providers: Providers) -> Self {
		Self { cfg, db, index, providers }
	}
}
