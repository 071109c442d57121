use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use vitae_config::Error;

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with<F>(mutate: F) -> String
where
	F: FnOnce(&mut toml::Table),
{
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let root = value.as_table_mut().expect("Sample config must be a table.");

	mutate(root);

	toml::to_string(&value).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("vitae_config_{pid}_{nanos}_{ordinal}.toml"));
	fs::write(&path, payload).expect("Failed to write temp config.");

	path
}

fn ranking_table(root: &mut toml::Table) -> &mut toml::Table {
	root.get_mut("ranking")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [ranking].")
}

#[test]
fn loads_sample_config() {
	let path = write_temp_config(sample_with(|_| {}));
	let cfg = vitae_config::load(&path).expect("Sample config must load.");

	assert_eq!(cfg.ranking.blend_alpha, 0.5);
	assert_eq!(cfg.ranking.fuzzy_threshold, 0.3);
	// Trailing slash on the index URL is normalized away.
	assert_eq!(cfg.storage.search_index.url, "http://localhost:8108");

	fs::remove_file(path).ok();
}

#[test]
fn ranking_defaults_apply_when_section_absent() {
	let path = write_temp_config(sample_with(|root| {
		root.remove("ranking");
	}));
	let cfg = vitae_config::load(&path).expect("Config without [ranking] must load.");

	assert_eq!(cfg.ranking.blend_alpha, 0.5);
	assert_eq!(cfg.ranking.channel_timeout_ms, 3_000);
	assert_eq!(cfg.ranking.max_hits, 100);

	fs::remove_file(path).ok();
}

#[test]
fn rejects_alpha_out_of_range() {
	let path = write_temp_config(sample_with(|root| {
		ranking_table(root).insert("blend_alpha".to_string(), Value::Float(1.5));
	}));
	let err = vitae_config::load(&path).expect_err("Alpha above 1.0 must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));

	fs::remove_file(path).ok();
}

#[test]
fn rejects_zero_channel_timeout() {
	let path = write_temp_config(sample_with(|root| {
		ranking_table(root).insert("channel_timeout_ms".to_string(), Value::Integer(0));
	}));
	let err = vitae_config::load(&path).expect_err("Zero channel timeout must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));

	fs::remove_file(path).ok();
}

#[test]
fn rejects_empty_collection_prefix() {
	let path = write_temp_config(sample_with(|root| {
		root.get_mut("storage")
			.and_then(Value::as_table_mut)
			.and_then(|storage| storage.get_mut("search_index"))
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [storage.search_index].")
			.insert("collection_prefix".to_string(), Value::String("  ".to_string()));
	}));
	let err = vitae_config::load(&path).expect_err("Empty collection prefix must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));

	fs::remove_file(path).ok();
}

#[test]
fn rejects_zero_embedding_dimensions() {
	let path = write_temp_config(sample_with(|root| {
		root.get_mut("providers")
			.and_then(Value::as_table_mut)
			.and_then(|providers| providers.get_mut("embedding"))
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [providers.embedding].")
			.insert("dimensions".to_string(), Value::Integer(0));
	}));
	let err = vitae_config::load(&path).expect_err("Zero dimensions must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));

	fs::remove_file(path).ok();
}
