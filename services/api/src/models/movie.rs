//! Movie models for the API service

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const MAX_TITLE_LEN: usize = 200;
const MAX_VOTE: f64 = 10.0;

/// Movie record
///
/// Actors and producers are free text, not references to person records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub lang: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub overview: Option<String>,
    pub actors: Option<String>,
    pub producers: Option<String>,
    #[serde(rename = "photolink")]
    pub photo_link: Option<String>,
    pub vote: Option<f64>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Movie creation payload
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovie {
    pub title: Option<String>,
    pub lang: Option<String>,
    #[serde(default, deserialize_with = "super::date::deserialize_optional_date")]
    pub release_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub overview: Option<String>,
    pub actors: Option<String>,
    pub producers: Option<String>,
    #[serde(rename = "photolink")]
    pub photo_link: Option<String>,
    pub vote: Option<f64>,
}

impl NewMovie {
    /// Validate the payload and build the record to store
    pub fn into_movie(self, owner: Uuid) -> Result<Movie, String> {
        let title = self.title.ok_or_else(|| "Title is required".to_string())?;
        validate_title(&title)?;
        validate_vote(self.vote)?;

        let now = Utc::now();
        Ok(Movie {
            id: Uuid::new_v4(),
            title,
            lang: self.lang,
            release_date: self.release_date,
            genre: self.genre,
            overview: self.overview,
            actors: self.actors,
            producers: self.producers,
            photo_link: self.photo_link,
            vote: self.vote,
            user_id: owner,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Movie update payload; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub lang: Option<String>,
    #[serde(default, deserialize_with = "super::date::deserialize_optional_date")]
    pub release_date: Option<NaiveDate>,
    pub genre: Option<String>,
    pub overview: Option<String>,
    pub actors: Option<String>,
    pub producers: Option<String>,
    #[serde(rename = "photolink")]
    pub photo_link: Option<String>,
    pub vote: Option<f64>,
}

impl UpdateMovie {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        validate_vote(self.vote)
    }

    /// Apply the supplied fields onto a stored movie
    pub fn apply_to(self, movie: &mut Movie) {
        if let Some(title) = self.title {
            movie.title = title;
        }
        if self.lang.is_some() {
            movie.lang = self.lang;
        }
        if self.release_date.is_some() {
            movie.release_date = self.release_date;
        }
        if self.genre.is_some() {
            movie.genre = self.genre;
        }
        if self.overview.is_some() {
            movie.overview = self.overview;
        }
        if self.actors.is_some() {
            movie.actors = self.actors;
        }
        if self.producers.is_some() {
            movie.producers = self.producers;
        }
        if self.photo_link.is_some() {
            movie.photo_link = self.photo_link;
        }
        if self.vote.is_some() {
            movie.vote = self.vote;
        }
        movie.updated_at = Utc::now();
    }
}

fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(format!(
            "Title must be at most {} characters long",
            MAX_TITLE_LEN
        ));
    }
    Ok(())
}

fn validate_vote(vote: Option<f64>) -> Result<(), String> {
    match vote {
        Some(v) if !v.is_finite() || !(0.0..=MAX_VOTE).contains(&v) => {
            Err(format!("Vote must be between 0 and {}", MAX_VOTE))
        }
        _ => Ok(()),
    }
}

/// Query parameters for movie listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieQuery {
    /// Free-text search
    pub query: Option<String>,
    /// Page number (1-based)
    pub page: Option<u32>,
    /// Number of items per page
    pub limit: Option<u32>,
}

/// Response for movie listing with pagination
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieListResponse {
    pub data: Vec<Movie>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_results: u64,
}
