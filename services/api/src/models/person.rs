//! Actor and producer models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Gender of an actor or producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(format!("Unknown gender: {}", other)),
        }
    }
}

/// Which collection a person record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonKind {
    Actor,
    Producer,
}

impl PersonKind {
    /// Backing table name
    pub fn table(&self) -> &'static str {
        match self {
            PersonKind::Actor => "actors",
            PersonKind::Producer => "producers",
        }
    }
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonKind::Actor => write!(f, "Actor"),
            PersonKind::Producer => write!(f, "Producer"),
        }
    }
}

/// Actor or producer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: Uuid,
    pub name: String,
    pub gender: Option<Gender>,
    pub dob: Option<NaiveDate>,
    pub bio: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Actor or producer creation payload
#[derive(Debug, Clone, Deserialize)]
pub struct NewPerson {
    pub name: String,
    pub gender: Option<Gender>,
    #[serde(default, deserialize_with = "super::date::deserialize_optional_date")]
    pub dob: Option<NaiveDate>,
    pub bio: Option<String>,
}

impl NewPerson {
    /// Validate the payload and build the record to store
    pub fn into_person(self, owner: Uuid) -> Result<Person, String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }

        let now = Utc::now();
        Ok(Person {
            id: Uuid::new_v4(),
            name: self.name,
            gender: self.gender,
            dob: self.dob,
            bio: self.bio,
            user_id: owner,
            created_at: now,
            updated_at: now,
        })
    }
}
