//! Integration tests against a live PostgreSQL database
//!
//! These tests need `DATABASE_URL` to point at a disposable database and are
//! ignored by default. Run them with `cargo test -- --ignored`.

use common::{
    database::{DatabaseConfig, health_check, init_pool, run_migrations},
    error::DatabaseError,
};
use sqlx::Row;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_schema_is_applied() -> Result<(), Box<dyn std::error::Error>> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;
    // Applying the schema twice is a no-op
    run_migrations(&pool).await?;

    let rows = sqlx::query(
        r#"
        SELECT table_name::text AS name
        FROM information_schema.tables
        WHERE table_schema = 'public'
          AND table_name IN ('users', 'movies', 'actors', 'producers')
        ORDER BY table_name
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let tables: Vec<String> = rows.iter().map(|row| row.get("name")).collect();
    assert_eq!(tables, ["actors", "movies", "producers", "users"]);

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_duplicate_email_maps_to_conflict() -> Result<(), Box<dyn std::error::Error>> {
    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;

    let email = format!("{}@example.com", Uuid::new_v4());
    let insert = || {
        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind("integration")
        .bind(email.clone())
        .bind("$argon2id$placeholder")
    };

    insert().execute(&pool).await?;
    let err = insert()
        .execute(&pool)
        .await
        .expect_err("second insert should violate the unique email index");

    let mapped = DatabaseError::from_query(err, "taken");
    assert!(matches!(mapped, DatabaseError::Conflict(msg) if msg == "taken"));

    sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(&email)
        .execute(&pool)
        .await?;

    Ok(())
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_catalog_rows_keep_owner_without_user_row() -> Result<(), Box<dyn std::error::Error>>
{
    let pool = init_pool(&DatabaseConfig::from_env()?).await?;
    run_migrations(&pool).await?;

    // Owners are identities from tokens and need not have a users row
    let movie_id = Uuid::new_v4();
    sqlx::query("INSERT INTO movies (id, title, user_id) VALUES ($1, $2, $3)")
        .bind(movie_id)
        .bind("Orphaned")
        .bind(Uuid::new_v4())
        .execute(&pool)
        .await?;

    let actor_id = Uuid::new_v4();
    sqlx::query("INSERT INTO actors (id, name, user_id) VALUES ($1, $2, $3)")
        .bind(actor_id)
        .bind("Orphaned")
        .bind(Uuid::new_v4())
        .execute(&pool)
        .await?;

    sqlx::query("DELETE FROM movies WHERE id = $1")
        .bind(movie_id)
        .execute(&pool)
        .await?;
    sqlx::query("DELETE FROM actors WHERE id = $1")
        .bind(actor_id)
        .execute(&pool)
        .await?;

    Ok(())
}
