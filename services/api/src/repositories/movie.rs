//! Movie repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{Movie, UpdateMovie},
    query::{MovieFilter, Pagination},
};

/// Persistence operations on movies
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Store a new movie
    async fn create(&self, movie: Movie) -> DatabaseResult<Movie>;

    /// Get a movie by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Movie>>;

    /// Get the movies matching a filter within a page window, oldest first
    async fn find(&self, filter: &MovieFilter, pagination: Pagination)
    -> DatabaseResult<Vec<Movie>>;

    /// Count every movie matching a filter
    async fn count(&self, filter: &MovieFilter) -> DatabaseResult<u64>;

    /// Get the movies owned by a user, oldest first
    async fn find_by_owner(&self, owner: Uuid) -> DatabaseResult<Vec<Movie>>;

    /// Apply an update; `None` if no movie has this ID
    async fn update(&self, id: Uuid, changes: UpdateMovie) -> DatabaseResult<Option<Movie>>;

    /// Delete a movie; `false` if no movie has this ID
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

/// PostgreSQL-backed movie repository
#[derive(Clone)]
pub struct PgMovieRepository {
    pool: PgPool,
}

impl PgMovieRepository {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MOVIE_COLUMNS: &str = "id, title, lang, release_date, genre, overview, actors, producers, \
     photolink, vote, user_id, created_at, updated_at";

// $1 is the ILIKE pattern, NULL for the empty filter
const SEARCH_CLAUSE: &str = "($1::text IS NULL \
     OR title ILIKE $1 OR overview ILIKE $1 OR actors ILIKE $1 \
     OR producers ILIKE $1 OR genre ILIKE $1)";

fn movie_from_row(row: &PgRow) -> Movie {
    Movie {
        id: row.get("id"),
        title: row.get("title"),
        lang: row.get("lang"),
        release_date: row.get("release_date"),
        genre: row.get("genre"),
        overview: row.get("overview"),
        actors: row.get("actors"),
        producers: row.get("producers"),
        photo_link: row.get("photolink"),
        vote: row.get("vote"),
        user_id: row.get("user_id"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl MovieStore for PgMovieRepository {
    async fn create(&self, movie: Movie) -> DatabaseResult<Movie> {
        info!("Creating movie {} for user {}", movie.id, movie.user_id);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO movies ({MOVIE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.lang)
        .bind(movie.release_date)
        .bind(&movie.genre)
        .bind(&movie.overview)
        .bind(&movie.actors)
        .bind(&movie.producers)
        .bind(&movie.photo_link)
        .bind(movie.vote)
        .bind(movie.user_id)
        .bind(movie.created_at)
        .bind(movie.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(movie_from_row(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Movie>> {
        let row = sqlx::query(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(movie_from_row))
    }

    async fn find(
        &self,
        filter: &MovieFilter,
        pagination: Pagination,
    ) -> DatabaseResult<Vec<Movie>> {
        let offset = i64::try_from(pagination.skip()).unwrap_or(i64::MAX);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {MOVIE_COLUMNS}
            FROM movies
            WHERE {SEARCH_CLAUSE}
            ORDER BY created_at, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(filter.like_pattern())
        .bind(i64::from(pagination.limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(movie_from_row).collect())
    }

    async fn count(&self, filter: &MovieFilter) -> DatabaseResult<u64> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM movies WHERE {SEARCH_CLAUSE}"
        ))
        .bind(filter.like_pattern())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(count.max(0) as u64)
    }

    async fn find_by_owner(&self, owner: Uuid) -> DatabaseResult<Vec<Movie>> {
        let rows = sqlx::query(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE user_id = $1 ORDER BY created_at, id"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(rows.iter().map(movie_from_row).collect())
    }

    async fn update(&self, id: Uuid, changes: UpdateMovie) -> DatabaseResult<Option<Movie>> {
        info!("Updating movie {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE movies SET
                title = COALESCE($2, title),
                lang = COALESCE($3, lang),
                release_date = COALESCE($4, release_date),
                genre = COALESCE($5, genre),
                overview = COALESCE($6, overview),
                actors = COALESCE($7, actors),
                producers = COALESCE($8, producers),
                photolink = COALESCE($9, photolink),
                vote = COALESCE($10, vote),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.title)
        .bind(changes.lang)
        .bind(changes.release_date)
        .bind(changes.genre)
        .bind(changes.overview)
        .bind(changes.actors)
        .bind(changes.producers)
        .bind(changes.photo_link)
        .bind(changes.vote)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(row.as_ref().map(movie_from_row))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        info!("Deleting movie {}", id);

        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}

/// In-memory movie repository, kept in insertion order
#[derive(Clone, Default)]
pub struct MemoryMovieRepository {
    movies: Arc<RwLock<Vec<Movie>>>,
}

impl MemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for MemoryMovieRepository {
    async fn create(&self, movie: Movie) -> DatabaseResult<Movie> {
        self.movies.write().await.push(movie.clone());
        Ok(movie)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.id == id).cloned())
    }

    async fn find(
        &self,
        filter: &MovieFilter,
        pagination: Pagination,
    ) -> DatabaseResult<Vec<Movie>> {
        let skip = usize::try_from(pagination.skip()).unwrap_or(usize::MAX);
        let movies = self.movies.read().await;

        Ok(movies
            .iter()
            .filter(|m| filter.matches(m))
            .skip(skip)
            .take(pagination.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &MovieFilter) -> DatabaseResult<u64> {
        let movies = self.movies.read().await;
        Ok(movies.iter().filter(|m| filter.matches(m)).count() as u64)
    }

    async fn find_by_owner(&self, owner: Uuid) -> DatabaseResult<Vec<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies
            .iter()
            .filter(|m| m.user_id == owner)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, changes: UpdateMovie) -> DatabaseResult<Option<Movie>> {
        let mut movies = self.movies.write().await;
        let Some(movie) = movies.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };

        changes.apply_to(movie);
        Ok(Some(movie.clone()))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut movies = self.movies.write().await;
        let before = movies.len();
        movies.retain(|m| m.id != id);
        Ok(movies.len() < before)
    }
}
