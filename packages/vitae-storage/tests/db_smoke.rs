use uuid::Uuid;

use vitae_storage::{db::Db, models::CandidateProfile, profiles};

fn pg_cfg(dsn: &str) -> vitae_config::Postgres {
	vitae_config::Postgres { dsn: dsn.to_string(), pool_max_conns: 2 }
}

async fn insert_profile(
	pool: &sqlx::PgPool,
	tenant_id: &str,
	source_doc_id: Uuid,
	job_title: &str,
	skills: &[&str],
) -> Uuid {
	let profile_id = Uuid::new_v4();
	let now = time::OffsetDateTime::now_utc();
	let skills: Vec<String> = skills.iter().map(|s| s.to_string()).collect();

	sqlx::query(
		"\
INSERT INTO candidate_profiles (
	profile_id, tenant_id, source_doc_id, job_title, skills, created_at, updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $6)",
	)
	.bind(profile_id)
	.bind(tenant_id)
	.bind(source_doc_id)
	.bind(job_title)
	.bind(&skills)
	.bind(now)
	.execute(pool)
	.await
	.expect("Profile insert must succeed.");

	profile_id
}

#[tokio::test]
async fn schema_round_trips_profiles_and_sub_records() {
	let Some(base_dsn) = vitae_testkit::env_dsn() else {
		eprintln!("Skipping Pg-backed test; set VITAE_PG_DSN to run it.");

		return;
	};

	vitae_testkit::with_test_db(&base_dsn, |dsn| async move {
		let db = Db::connect(&pg_cfg(&dsn))
			.await
			.map_err(|err| vitae_testkit::Error::Message(err.to_string()))?;

		db.ensure_schema()
			.await
			.map_err(|err| vitae_testkit::Error::Message(err.to_string()))?;
		// Repeat to prove the schema script is idempotent.
		db.ensure_schema()
			.await
			.map_err(|err| vitae_testkit::Error::Message(err.to_string()))?;

		let doc_a = Uuid::new_v4();
		let doc_b = Uuid::new_v4();
		let id_a = insert_profile(&db.pool, "t1", doc_a, "Backend Engineer", &["Go", "SQL"]).await;
		let _ = insert_profile(&db.pool, "t1", doc_b, "Backend Developer", &["Go"]).await;
		let _ = insert_profile(&db.pool, "t2", Uuid::new_v4(), "Designer", &[]).await;

		sqlx::query(
			"\
INSERT INTO profile_education (education_id, profile_id, degree, major)
VALUES ($1, $2, 'BSc', 'Computer Science')",
		)
		.bind(Uuid::new_v4())
		.bind(id_a)
		.execute(&db.pool)
		.await?;

		let pool: Vec<CandidateProfile> = profiles::list_profiles(&db.pool, "t1", &[])
			.await
			.map_err(|err| vitae_testkit::Error::Message(err.to_string()))?;

		assert_eq!(pool.len(), 2, "Tenant t1 must only see its own profiles.");

		let scoped = profiles::list_profiles(&db.pool, "t1", &[doc_a])
			.await
			.map_err(|err| vitae_testkit::Error::Message(err.to_string()))?;

		assert_eq!(scoped.len(), 1);
		assert_eq!(scoped[0].profile_id, id_a);

		let records = profiles::get_profile_records(&db.pool, "t1", &[id_a, Uuid::new_v4()])
			.await
			.map_err(|err| vitae_testkit::Error::Message(err.to_string()))?;

		// The unknown id is silently absent; the live one carries sub-records.
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].education.len(), 1);
		assert_eq!(records[0].education[0].degree.as_deref(), Some("BSc"));

		Ok(())
	})
	.await
	.expect("Pg-backed smoke test must pass.");
}
