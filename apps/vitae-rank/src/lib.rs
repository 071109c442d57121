use std::{fs, path::PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use vitae_service::{RankRequest, RankService};

#[derive(Debug, Parser)]
#[command(
	version = vitae_cli::VERSION,
	rename_all = "kebab",
	styles = vitae_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Tenant whose candidate pool is searched.
	#[arg(long, short = 't', value_name = "TENANT")]
	pub tenant: String,
	/// Path to a job requirement JSON file.
	#[arg(long, short = 'r', value_name = "FILE")]
	pub requirement: PathBuf,
	/// Source document ids narrowing the pool; repeatable, empty means the
	/// whole tenant pool.
	#[arg(long = "doc", value_name = "UUID")]
	pub docs: Vec<Uuid>,
	/// Embed profiles still missing a vector before ranking.
	#[arg(long)]
	pub embed_missing: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = vitae_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = vitae_storage::db::Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let index = vitae_storage::index::SearchIndex::new(&config.storage.search_index)?;
	let raw = fs::read_to_string(&args.requirement)?;
	let requirement = serde_json::from_str(&raw)?;
	let service = RankService::new(config, db, index);

	if args.embed_missing {
		service.backfill_embeddings(&args.tenant).await?;
	}

	let response = service
		.rank(RankRequest {
			tenant_id: args.tenant,
			source_doc_ids: args.docs,
			requirement,
		})
		.await?;

	println!("{}", serde_json::to_string_pretty(&response)?);

	Ok(())
}
