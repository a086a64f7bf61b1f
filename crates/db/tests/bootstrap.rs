use sqlx::PgPool;

/// Connect, migrate, verify the lookup tables are seeded.
#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_full_bootstrap(pool: PgPool) {
    postboard_db::health_check(&pool).await.unwrap();

    let expected = [
        ("idea_statuses", 3_i64),
        ("idea_sub_statuses", 10),
        ("claim_approval_statuses", 3),
    ];

    for (table, rows) in expected {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, rows, "{table} seed data");
    }
}

/// Lookup names line up with the application enums.
#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_sub_status_seed_matches_enum(pool: PgPool) {
    use postboard_core::status::SubStatus;

    for sub in SubStatus::ALL {
        let name: String = sqlx::query_scalar("SELECT name FROM idea_sub_statuses WHERE id = $1")
            .bind(sub.id())
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(name, sub.as_str());
    }
}
