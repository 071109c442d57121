mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Postgres, Providers, Ranking, SearchIndex, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.search_index.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.search_index.url must be non-empty.".to_string(),
		});
	}
	if cfg.storage.search_index.collection_prefix.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.search_index.collection_prefix must be non-empty.".to_string(),
		});
	}
	if cfg.storage.search_index.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.search_index.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !cfg.ranking.blend_alpha.is_finite() || !(0.0..=1.0).contains(&cfg.ranking.blend_alpha) {
		return Err(Error::Validation {
			message: "ranking.blend_alpha must be in the range 0.0-1.0.".to_string(),
		});
	}
	if !cfg.ranking.fuzzy_threshold.is_finite()
		|| !(0.0..=1.0).contains(&cfg.ranking.fuzzy_threshold)
	{
		return Err(Error::Validation {
			message: "ranking.fuzzy_threshold must be in the range 0.0-1.0.".to_string(),
		});
	}
	if cfg.ranking.channel_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "ranking.channel_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.ranking.max_hits == 0 {
		return Err(Error::Validation {
			message: "ranking.max_hits must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let url = &mut cfg.storage.search_index.url;

	while url.ends_with('/') {
		url.pop();
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
